/// Database configuration and connection management
pub mod database;

/// Application settings loaded from config.toml
pub mod settings;

/// Signed-in user identity from environment variables
pub mod users;

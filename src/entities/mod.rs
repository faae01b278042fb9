//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the store tables the dashboard reads from.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod profile;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};

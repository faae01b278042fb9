//! Signed-in user configuration.
//!
//! Authentication lives with the hosted backend; the daemon just needs to know whose
//! dashboard to keep live, which it reads from `BUDGET_PULSE_USER`.

use crate::errors::{Error, Result};

/// Environment variable naming the signed-in user id
pub const USER_ENV_VAR: &str = "BUDGET_PULSE_USER";

/// Returns the configured user id, trimmed.
///
/// # Errors
/// `Error::MissingUser` when the variable is unset or blank.
pub fn current_user_id() -> Result<String> {
    normalize_user_id(std::env::var(USER_ENV_VAR).ok())
}

fn normalize_user_id(raw: Option<String>) -> Result<String> {
    raw.map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(Error::MissingUser)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_normalize_user_id_trims() {
        let id = normalize_user_id(Some("  user-42 \n".to_string())).unwrap();
        assert_eq!(id, "user-42");
    }

    #[test]
    fn test_normalize_user_id_rejects_blank() {
        assert!(matches!(
            normalize_user_id(Some("   ".to_string())),
            Err(Error::MissingUser)
        ));
        assert!(matches!(normalize_user_id(None), Err(Error::MissingUser)));
    }
}

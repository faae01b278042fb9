//! Profile business logic - the declared monthly salary.
//!
//! The salary, when set, replaces the forecast's income baseline. Changes publish a
//! `Profiles` event so live dashboards pick them up.

use crate::{
    core::store::{ChangeKind, Store, Table},
    entities::{Profile, profile},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Retrieves the user's profile row, if any.
pub async fn get_profile(store: &Store, user_id: &str) -> Result<Option<profile::Model>> {
    Profile::find_by_id(user_id.to_string())
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// The user's declared monthly salary, `None` when never set or cleared.
pub async fn monthly_salary(store: &Store, user_id: &str) -> Result<Option<f64>> {
    Ok(get_profile(store, user_id)
        .await?
        .and_then(|profile| profile.monthly_salary))
}

/// Sets or clears the monthly salary, creating the profile if needed.
///
/// # Errors
/// `Error::InvalidAmount` for negative or non-finite salaries.
#[instrument(skip(store))]
pub async fn set_monthly_salary(
    store: &Store,
    user_id: &str,
    salary: Option<f64>,
) -> Result<profile::Model> {
    if let Some(amount) = salary {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
    }
    if user_id.trim().is_empty() {
        return Err(Error::MissingUser);
    }

    let now = Utc::now();
    let (model, kind) = match get_profile(store, user_id).await? {
        Some(existing) => {
            let mut active_model: profile::ActiveModel = existing.into();
            active_model.monthly_salary = Set(salary);
            active_model.updated_at = Set(now);
            (active_model.update(store.db()).await?, ChangeKind::Update)
        }
        None => {
            let new_profile = profile::ActiveModel {
                id: Set(user_id.to_string()),
                monthly_salary: Set(salary),
                updated_at: Set(now),
            };
            (new_profile.insert(store.db()).await?, ChangeKind::Insert)
        }
    };

    info!("Monthly salary for {} set to {:?}", user_id, salary);
    store.notify(Table::Profiles, user_id, kind);
    Ok(model)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::setup_test_store;

    #[tokio::test]
    async fn test_salary_unset_by_default() -> Result<()> {
        let store = setup_test_store().await?;
        assert_eq!(monthly_salary(&store, "alice").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_update_and_clear_salary() -> Result<()> {
        let store = setup_test_store().await?;
        let mut sub = store.subscribe(Table::Profiles, "alice");

        set_monthly_salary(&store, "alice", Some(90000.0)).await?;
        assert_eq!(monthly_salary(&store, "alice").await?, Some(90000.0));

        set_monthly_salary(&store, "alice", Some(95000.0)).await?;
        assert_eq!(monthly_salary(&store, "alice").await?, Some(95000.0));

        set_monthly_salary(&store, "alice", None).await?;
        assert_eq!(monthly_salary(&store, "alice").await?, None);

        assert_eq!(sub.drain(), 3);
        // Other users are unaffected
        assert_eq!(monthly_salary(&store, "bob").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_invalid_salary() -> Result<()> {
        let store = setup_test_store().await?;
        let result = set_monthly_salary(&store, "alice", Some(-1.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        let result = set_monthly_salary(&store, "alice", Some(f64::NAN)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        Ok(())
    }
}

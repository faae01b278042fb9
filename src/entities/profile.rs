//! Profile entity - Per-user settings that feed the dashboard.
//!
//! Currently only the optional monthly salary, which overrides the forecast's
//! income baseline when set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// User id this profile belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Declared monthly salary, if the user entered one
    pub monthly_salary: Option<f64>,
    /// When the profile was last modified
    pub updated_at: DateTimeUtc,
}

/// `Profile` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

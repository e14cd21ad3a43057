//! Currency entity - Currencies the desk trades, keyed by ISO-style code.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Currency database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "US Dollar")
    pub name: String,
    /// Upper-case three letter code (e.g., `"USD"`)
    #[sea_orm(unique)]
    pub code: String,
    /// Display symbol (e.g., "$")
    pub symbol: String,
}

/// `Currency` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

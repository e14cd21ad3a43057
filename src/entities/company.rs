//! Company entity - The single record describing the exchange business itself.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Registered company name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Name of the administrator
    pub administrator_name: String,
    /// Local currency the company reports in
    pub exchange_currency: String,
    /// Postal address
    pub address: String,
    /// Compliance officer shown on KYC forms
    pub compliance_officer: String,
}

/// `Company` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

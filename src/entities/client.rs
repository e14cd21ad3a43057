//! Client entity - A person or company the exchange transacts with.
//!
//! The client's processes are not stored on this row; they are every process whose
//! `client_id` points here (see `core::client::process_ids_for_client`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Compliance band of a client, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ClientType {
    /// Transacts amounts of 10000 or more; extra financial fields are required
    #[sea_orm(string_value = "greater than 10000")]
    #[serde(rename = "greater than 10000")]
    Greater,
    /// Transacts amounts below 10000
    #[sea_orm(string_value = "less than 10000")]
    #[serde(rename = "less than 10000")]
    Less,
}

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full legal name
    pub full_name: String,
    /// Phone number, unique across clients
    #[sea_orm(unique)]
    pub phone: String,
    /// National identity number, unique across clients
    #[sea_orm(unique)]
    pub national_id: String,
    /// Date of birth
    pub date_of_birth: Date,
    /// Current address: country
    pub current_country: String,
    /// Current address: district
    pub current_district: String,
    /// Current address: building
    pub current_building: String,
    /// Current address: street
    pub current_street: String,
    /// Birth address: country
    pub birth_country: String,
    /// Birth address: district
    pub birth_district: String,
    /// Birth address: building
    pub birth_building: String,
    /// Birth address: street
    pub birth_street: String,
    /// Compliance band
    pub client_type: ClientType,
    /// Declared yearly income, required for `Greater` clients
    pub yearly_income: Option<f64>,
    /// Declared financial status, required for `Greater` clients
    pub financial_status: Option<String>,
    /// Banks the client works with, required for `Greater` clients
    pub banks_dealing_with: Option<String>,
    /// Lower bound of the expected transaction band
    pub minimum: f64,
    /// Upper bound of the expected transaction band
    pub maximum: f64,
    /// Employee who created or last edited the client
    pub employee_id: i64,
    /// When the client was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many processes
    #[sea_orm(has_many = "super::process::Entity")]
    Processes,
}

impl Related<super::process::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Processes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

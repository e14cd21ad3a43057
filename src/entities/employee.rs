//! Employee entity - Staff members and their capability flags.
//!
//! Credentials live with the external login service; this table only holds the
//! identity the bearer token refers to and the permissions read by the core.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee role
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Holds every capability
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Limited to the flags set on the record
    #[sea_orm(string_value = "employee")]
    Employee,
}

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login e-mail, unique
    #[sea_orm(unique)]
    pub email: String,
    /// `admin` or `employee`
    pub role: Role,
    /// Inactive employees cannot authenticate
    pub is_active: bool,
    /// May register "greater than 10000" clients
    pub can_create_greater: bool,
    /// May register "less than 10000" clients
    pub can_create_less: bool,
    /// May view "greater than 10000" clients
    pub can_access_greater: bool,
    /// May view "less than 10000" clients
    pub can_access_less: bool,
    /// May edit "greater than 10000" clients
    pub can_edit_greater: bool,
    /// May edit "less than 10000" clients
    pub can_edit_less: bool,
    /// May delete "greater than 10000" records
    pub can_delete_greater: bool,
    /// May delete "less than 10000" records
    pub can_delete_less: bool,
    /// May edit processes created by anyone
    pub can_edit_process: bool,
    /// May run process queries and reports
    pub can_access_processes: bool,
    /// May delete clients (and their processes)
    pub can_delete_client: bool,
}

/// Employees are not linked by foreign key: deleting one keeps their history
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

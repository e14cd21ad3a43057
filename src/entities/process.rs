//! Process entity - One buy or sell event recorded for a client.
//!
//! `client_name` is copied from the client whenever the process is written and is
//! not refreshed afterwards, so it records the name at the time of the transaction.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a process, stored as `"Buy"` or `"Sell"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ProcessType {
    /// The company buys currency from the client
    #[sea_orm(string_value = "Buy")]
    Buy,
    /// The company sells currency to the client
    #[sea_orm(string_value = "Sell")]
    Sell,
}

impl ProcessType {
    /// Parses the exact wire value. Anything other than `"Buy"` or `"Sell"` is rejected.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Buy" => Some(Self::Buy),
            "Sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

/// Process database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "processes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the process
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning client
    pub client_id: i64,
    /// Employee who created the process
    pub employee_id: i64,
    /// Client name captured when the process was written
    pub client_name: String,
    /// When the exchange happened
    pub process_date: DateTimeUtc,
    /// Amount handed over by the company
    pub process_amount_sell: f64,
    /// Amount received by the company
    pub process_amount_buy: f64,
    /// Rate applied between the two currencies
    pub exchange_rate: f64,
    /// `Buy` or `Sell`
    pub process_type: ProcessType,
    /// Currency code of the bought amount
    pub from_currency: String,
    /// Currency code of the sold amount
    pub to_currency: String,
    /// Where the client's money came from
    pub money_source: Option<String>,
    /// Where the exchanged money is going
    pub money_destination: Option<String>,
}

/// Defines relationships between Process and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each process belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

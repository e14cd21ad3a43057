//! Company business logic - the singleton company record.

use crate::{
    core::permission::{Actor, require_admin},
    entities::{Company, company},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request body for creating the company record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    /// Company name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Name of the administrator
    pub administrator_name: String,
    /// Currency the company reports in
    pub exchange_currency: String,
    /// Postal address
    pub address: String,
    /// Name of the compliance officer
    pub compliance_officer: String,
}

/// Creates the company record. Admin only; a second record is a `Conflict`.
pub async fn create_company<C>(db: &C, actor: &Actor, input: &CompanyInput) -> Result<company::Model>
where
    C: ConnectionTrait,
{
    require_admin(actor)?;
    if input.name.trim().is_empty() {
        return Err(Error::bad_request("company name is required"));
    }
    if Company::find().count(db).await? > 0 {
        return Err(Error::Conflict {
            message: "company already exists".to_string(),
        });
    }

    let created = company::ActiveModel {
        name: Set(input.name.trim().to_string()),
        phone: Set(input.phone.trim().to_string()),
        administrator_name: Set(input.administrator_name.trim().to_string()),
        exchange_currency: Set(input.exchange_currency.trim().to_uppercase()),
        address: Set(input.address.trim().to_string()),
        compliance_officer: Set(input.compliance_officer.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(company_id = created.id, "Company created");
    Ok(created)
}

/// The company record, if one was created.
pub async fn get_company<C>(db: &C) -> Result<Option<company::Model>>
where
    C: ConnectionTrait,
{
    Company::find().one(db).await.map_err(Into::into)
}

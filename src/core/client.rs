//! Client business logic - registration, edits, lookups and cascading deletes.
//!
//! Every operation is gated by the capability matching the client's type. A client's
//! processes are looked up by `client_id`; deleting a client removes them in the same
//! database transaction.

use crate::{
    core::permission::{Actor, Capability, require},
    entities::{Client, ClientType, Process, client, process},
    errors::{Error, Result},
    notify::{Event, Notifier, publish_serialized},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    DbErr, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Postal address as entered on the KYC form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Country name
    pub country: String,
    /// District or city
    pub district: String,
    /// Building name or number
    pub building: String,
    /// Street name
    pub street: String,
}

/// Request body for creating or editing a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    /// Full legal name
    pub full_name: String,
    /// Phone number, unique across clients
    pub phone: String,
    /// National id, unique across clients
    pub national_id: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Where the client lives now
    #[serde(default)]
    pub current_address: Address,
    /// Where the client was born
    #[serde(default)]
    pub birth_address: Address,
    /// Classification that decides which capabilities apply
    pub client_type: ClientType,
    /// Declared yearly income
    #[serde(default)]
    pub yearly_income: Option<f64>,
    /// Free-form financial status
    #[serde(default)]
    pub financial_status: Option<String>,
    /// Banks the client works with
    #[serde(default)]
    pub banks_dealing_with: Option<String>,
    /// Lower bound of the expected transaction band
    pub minimum: f64,
    /// Upper bound of the expected transaction band
    pub maximum: f64,
}

/// A client together with the ids of its processes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWithProcesses {
    #[serde(flatten)]
    pub client: client::Model,
    /// Process ids in creation order
    pub processes: Vec<i64>,
}

/// Payload of the `client:deleted` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedClient {
    /// Id of the removed client
    pub client_id: i64,
    /// Processes removed along with the client
    pub deleted_processes: Vec<i64>,
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn filled(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ClientInput {
    fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.national_id.trim().is_empty()
        {
            return Err(Error::bad_request("fullName, phone and nationalId are required"));
        }
        if !self.minimum.is_finite() || !self.maximum.is_finite() || self.minimum > self.maximum {
            return Err(Error::bad_request("minimum must not exceed maximum"));
        }
        if self.client_type == ClientType::Greater {
            let income_ok = self.yearly_income.is_some_and(f64::is_finite);
            if !income_ok
                || filled(self.financial_status.as_ref()).is_none()
                || filled(self.banks_dealing_with.as_ref()).is_none()
            {
                return Err(Error::bad_request(
                    "yearlyIncome, financialStatus and banksDealingWith are required for clients greater than 10000",
                ));
            }
        }
        Ok(())
    }

    fn apply(&self, model: &mut client::ActiveModel) {
        model.full_name = Set(trimmed(&self.full_name));
        model.phone = Set(trimmed(&self.phone));
        model.national_id = Set(trimmed(&self.national_id));
        model.date_of_birth = Set(self.date_of_birth);
        model.current_country = Set(trimmed(&self.current_address.country));
        model.current_district = Set(trimmed(&self.current_address.district));
        model.current_building = Set(trimmed(&self.current_address.building));
        model.current_street = Set(trimmed(&self.current_address.street));
        model.birth_country = Set(trimmed(&self.birth_address.country));
        model.birth_district = Set(trimmed(&self.birth_address.district));
        model.birth_building = Set(trimmed(&self.birth_address.building));
        model.birth_street = Set(trimmed(&self.birth_address.street));
        model.yearly_income = Set(self.yearly_income);
        model.financial_status = Set(filled(self.financial_status.as_ref()));
        model.banks_dealing_with = Set(filled(self.banks_dealing_with.as_ref()));
        model.minimum = Set(self.minimum);
        model.maximum = Set(self.maximum);
    }
}

async fn ensure_unique<C>(db: &C, input: &ClientInput, except: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let phone = input.phone.trim();
    let national_id = input.national_id.trim();
    let mut query = Client::find().filter(
        Condition::any()
            .add(client::Column::Phone.eq(phone))
            .add(client::Column::NationalId.eq(national_id)),
    );
    if let Some(id) = except {
        query = query.filter(client::Column::Id.ne(id));
    }

    match query.one(db).await? {
        Some(existing) if existing.phone == phone => Err(Error::Conflict {
            message: format!("a client with phone {phone} already exists"),
        }),
        Some(_) => Err(Error::Conflict {
            message: format!("a client with national id {national_id} already exists"),
        }),
        None => Ok(()),
    }
}

/// Maps a unique-index violation that slipped past [`ensure_unique`] to `Conflict`.
fn conflict_on_unique(err: DbErr) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => Error::Conflict {
            message: format!("a client with this phone or national id already exists ({detail})"),
        },
        _ => Error::Database(err),
    }
}

async fn find_client<C>(db: &C, client_id: i64) -> Result<client::Model>
where
    C: ConnectionTrait,
{
    Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("client", client_id))
}

/// Ids of every process belonging to the client, in creation order.
pub async fn process_ids_for_client<C>(db: &C, client_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    let processes = Process::find()
        .filter(process::Column::ClientId.eq(client_id))
        .order_by_asc(process::Column::Id)
        .all(db)
        .await?;
    Ok(processes.into_iter().map(|p| p.id).collect())
}

/// Registers a client owned by the actor.
#[instrument(skip(db, notifier, actor, input), fields(employee_id = actor.id()))]
pub async fn create_client(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    actor: &Actor,
    input: &ClientInput,
) -> Result<client::Model> {
    require(actor, Capability::create(input.client_type))?;
    input.validate()?;
    ensure_unique(db, input, None).await?;

    let mut model = client::ActiveModel {
        client_type: Set(input.client_type),
        employee_id: Set(actor.id()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    input.apply(&mut model);
    let created = model.insert(db).await.map_err(conflict_on_unique)?;

    info!(client_id = created.id, "Client created");
    publish_serialized(notifier, Event::ClientCreated, &created);
    Ok(created)
}

/// Fetches a client the actor may access.
pub async fn get_client(db: &DatabaseConnection, actor: &Actor, client_id: i64) -> Result<client::Model> {
    let client = find_client(db, client_id).await?;
    require(actor, Capability::access(client.client_type))?;
    Ok(client)
}

/// Fetches a client along with its process ids.
pub async fn get_client_with_processes(
    db: &DatabaseConnection,
    actor: &Actor,
    client_id: i64,
) -> Result<ClientWithProcesses> {
    let client = get_client(db, actor, client_id).await?;
    let processes = process_ids_for_client(db, client.id).await?;
    Ok(ClientWithProcesses { client, processes })
}

/// Lists the clients whose type the actor may access, ordered by name.
pub async fn list_accessible_clients(
    db: &DatabaseConnection,
    actor: &Actor,
) -> Result<Vec<client::Model>> {
    let clients = Client::find()
        .order_by_asc(client::Column::FullName)
        .all(db)
        .await?;
    Ok(clients
        .into_iter()
        .filter(|c| actor.can(Capability::access(c.client_type)))
        .collect())
}

/// Replaces a client's details and makes the actor its owning employee.
///
/// The client type is fixed at creation; a different type is rejected. Existing
/// processes keep the client name they were recorded with.
#[instrument(skip(db, notifier, actor, input), fields(employee_id = actor.id()))]
pub async fn edit_client(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    actor: &Actor,
    client_id: i64,
    input: &ClientInput,
) -> Result<client::Model> {
    let existing = find_client(db, client_id).await?;
    require(actor, Capability::edit(existing.client_type))?;
    if input.client_type != existing.client_type {
        return Err(Error::bad_request("clientType cannot be changed"));
    }
    input.validate()?;
    ensure_unique(db, input, Some(client_id)).await?;

    let mut model: client::ActiveModel = existing.into();
    input.apply(&mut model);
    model.employee_id = Set(actor.id());
    let updated = model.update(db).await.map_err(conflict_on_unique)?;

    info!(client_id, "Client edited");
    publish_serialized(notifier, Event::ClientEdited, &updated);
    Ok(updated)
}

/// Deletes a client and all of its processes in one transaction.
///
/// Requires `DeleteClient`.
#[instrument(skip(db, notifier, actor), fields(employee_id = actor.id()))]
pub async fn delete_client(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    actor: &Actor,
    client_id: i64,
) -> Result<DeletedClient> {
    require(actor, Capability::DeleteClient)?;

    let txn = db.begin().await?;
    let client = find_client(&txn, client_id).await?;
    let deleted_processes = process_ids_for_client(&txn, client.id).await?;

    Process::delete_many()
        .filter(process::Column::ClientId.eq(client.id))
        .exec(&txn)
        .await?;
    Client::delete_by_id(client.id).exec(&txn).await?;
    txn.commit().await?;

    let deleted = DeletedClient {
        client_id,
        deleted_processes,
    };
    info!(
        client_id,
        processes = deleted.deleted_processes.len(),
        "Client deleted"
    );
    publish_serialized(notifier, Event::ClientDeleted, &deleted);
    Ok(deleted)
}

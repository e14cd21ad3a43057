//! Process business logic - the lifecycle of buy/sell transactions.
//!
//! A process is created against an existing client, edited in place with full-replace
//! semantics, and deleted only by the employee who created it. The client's list of
//! processes is derived from `processes.client_id`, so creating or deleting a process
//! row is the only write needed to keep both sides consistent.
//!
//! Every mutation publishes its notification after the database commit.

use crate::{
    core::{
        permission::{Actor, Capability, require},
        report::normalize_currency,
    },
    entities::{Client, Process, ProcessType, client, process},
    errors::{Error, Result},
    notify::{Event, Notifier, publish_serialized},
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Buy amount separating the "lesser" and "greater" report scopes.
pub const LARGE_AMOUNT_THRESHOLD: f64 = 10_000.0;

const ALL_FIELDS_REQUIRED: &str = "all fields required";

/// Request body for creating or editing a process.
///
/// Every field is optional at the type level so that missing fields can be reported
/// as a `BadRequest` instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInput {
    /// Client the process belongs to
    pub client_id: Option<i64>,
    /// Amount handed over by the company
    pub process_amount_sell: Option<f64>,
    /// Amount received by the company
    pub process_amount_buy: Option<f64>,
    /// Rate applied between the two currencies
    pub exchange_rate: Option<f64>,
    /// Exactly `"Buy"` or `"Sell"`
    pub process_type: Option<String>,
    /// Currency of the bought amount
    pub from_currency: Option<String>,
    /// Currency of the sold amount
    pub to_currency: Option<String>,
    /// Where the client's money came from
    pub money_source: Option<String>,
    /// Where the exchanged money is going
    pub money_destination: Option<String>,
    /// RFC 3339 timestamp; missing, `null` or blank means now
    #[serde(default, deserialize_with = "blank_as_none")]
    pub process_date: Option<DateTime<Utc>>,
}

/// Reads an optional RFC 3339 timestamp, treating an empty or blank string as absent.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|date| Some(date.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

/// A [`ProcessInput`] that passed validation.
#[derive(Debug, Clone, PartialEq)]
struct ValidProcess {
    client_id: i64,
    process_amount_sell: f64,
    process_amount_buy: f64,
    exchange_rate: f64,
    process_type: ProcessType,
    from_currency: String,
    to_currency: String,
    money_source: Option<String>,
    money_destination: Option<String>,
    process_date: DateTime<Utc>,
}

fn required_amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ProcessInput {
    /// Checks required fields, then the process type, then the currency pair.
    fn validate(&self) -> Result<ValidProcess> {
        let (
            Some(client_id),
            Some(process_amount_sell),
            Some(process_amount_buy),
            Some(exchange_rate),
            Some(process_type),
            Some(from_currency),
            Some(to_currency),
        ) = (
            self.client_id,
            required_amount(self.process_amount_sell),
            required_amount(self.process_amount_buy),
            required_amount(self.exchange_rate),
            non_blank(self.process_type.as_ref()),
            non_blank(self.from_currency.as_ref()),
            non_blank(self.to_currency.as_ref()),
        )
        else {
            return Err(Error::bad_request(ALL_FIELDS_REQUIRED));
        };

        let process_type =
            ProcessType::parse(&process_type).ok_or_else(|| Error::bad_request("invalid process type"))?;

        if normalize_currency(&from_currency) == normalize_currency(&to_currency) {
            return Err(Error::bad_request("fromCurrency and toCurrency must differ"));
        }

        Ok(ValidProcess {
            client_id,
            process_amount_sell,
            process_amount_buy,
            exchange_rate,
            process_type,
            from_currency,
            to_currency,
            money_source: non_blank(self.money_source.as_ref()),
            money_destination: non_blank(self.money_destination.as_ref()),
            process_date: self.process_date.unwrap_or_else(Utc::now),
        })
    }
}

/// Which processes a client report covers, by buy amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyScope {
    /// `process_amount_buy < 10000`
    Lesser,
    /// `process_amount_buy >= 10000`
    Greater,
}

impl BuyScope {
    /// Whether a buy amount falls in this scope.
    #[must_use]
    pub fn contains(self, amount_buy: f64) -> bool {
        match self {
            Self::Lesser => amount_buy < LARGE_AMOUNT_THRESHOLD,
            Self::Greater => amount_buy >= LARGE_AMOUNT_THRESHOLD,
        }
    }

    fn apply(self, query: Select<Process>) -> Select<Process> {
        match self {
            Self::Lesser => query.filter(process::Column::ProcessAmountBuy.lt(LARGE_AMOUNT_THRESHOLD)),
            Self::Greater => query.filter(process::Column::ProcessAmountBuy.gte(LARGE_AMOUNT_THRESHOLD)),
        }
    }
}

/// Inclusive range of calendar days (UTC) used by every report query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end_exclusive: DateTime<Utc>,
}

impl DateRange {
    /// Builds a range covering `start_date` through the whole of `end_date`.
    ///
    /// Both dates are required and `start_date` may not come after `end_date`.
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Result<Self> {
        let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
            return Err(Error::bad_request("startDate and endDate are required"));
        };
        if start_date > end_date {
            return Err(Error::bad_request("startDate must not be after endDate"));
        }
        let next_day = end_date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::bad_request("endDate is out of range"))?;

        Ok(Self {
            start: start_date.and_time(NaiveTime::MIN).and_utc(),
            end_exclusive: next_day.and_time(NaiveTime::MIN).and_utc(),
        })
    }

    /// Whether `instant` falls inside the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end_exclusive
    }

    fn apply(self, query: Select<Process>) -> Select<Process> {
        query
            .filter(process::Column::ProcessDate.gte(self.start))
            .filter(process::Column::ProcessDate.lt(self.end_exclusive))
    }
}

/// A process with its owning client populated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessWithClient {
    /// The process itself
    #[serde(flatten)]
    pub process: process::Model,
    /// The client the process belongs to
    pub client: Option<client::Model>,
}

/// Identifiers of a deleted process, also used as the `processDeleted` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProcess {
    /// Id of the removed process
    pub process_id: i64,
    /// Client it belonged to
    pub client_id: i64,
    /// Employee who created it
    pub employee_id: i64,
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

/// Creates a process for an existing client.
///
/// Validation runs in order: required fields, process type, currency pair, client
/// existence. Nothing is written unless every check passes. The new process takes
/// the client's current name and the actor as its creator.
#[instrument(skip(db, notifier, actor, input), fields(employee_id = actor.id()))]
pub async fn create_process(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    actor: &Actor,
    input: &ProcessInput,
) -> Result<process::Model> {
    let valid = input.validate()?;

    let txn = db.begin().await?;
    let client = find_client(&txn, valid.client_id).await?;

    let model = process::ActiveModel {
        client_id: Set(client.id),
        employee_id: Set(actor.id()),
        client_name: Set(client.full_name),
        process_date: Set(valid.process_date),
        process_amount_sell: Set(valid.process_amount_sell),
        process_amount_buy: Set(valid.process_amount_buy),
        exchange_rate: Set(valid.exchange_rate),
        process_type: Set(valid.process_type),
        from_currency: Set(valid.from_currency),
        to_currency: Set(valid.to_currency),
        money_source: Set(valid.money_source),
        money_destination: Set(valid.money_destination),
        ..Default::default()
    };
    let created = model.insert(&txn).await?;
    txn.commit().await?;

    info!(process_id = created.id, client_id = created.client_id, "Process created");
    publish_serialized(notifier, Event::ProcessCreated, &created);
    Ok(created)
}

/// Replaces every field of an existing process.
///
/// Requires the `EditProcess` capability. The creator is kept as `employee_id` and
/// is not required to be the editor.
#[instrument(skip(db, notifier, actor, input), fields(employee_id = actor.id()))]
pub async fn edit_process(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    actor: &Actor,
    process_id: i64,
    input: &ProcessInput,
) -> Result<process::Model> {
    require(actor, Capability::EditProcess)?;
    let valid = input.validate()?;

    let txn = db.begin().await?;
    let existing = Process::find_by_id(process_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("process", process_id))?;
    let client = find_client(&txn, valid.client_id).await?;

    let mut model: process::ActiveModel = existing.into();
    model.client_id = Set(client.id);
    model.client_name = Set(client.full_name);
    model.process_date = Set(valid.process_date);
    model.process_amount_sell = Set(valid.process_amount_sell);
    model.process_amount_buy = Set(valid.process_amount_buy);
    model.exchange_rate = Set(valid.exchange_rate);
    model.process_type = Set(valid.process_type);
    model.from_currency = Set(valid.from_currency);
    model.to_currency = Set(valid.to_currency);
    model.money_source = Set(valid.money_source);
    model.money_destination = Set(valid.money_destination);

    let updated = model.update(&txn).await?;
    txn.commit().await?;

    info!(process_id = updated.id, "Process edited");
    publish_serialized(notifier, Event::ProcessEdited, &updated);
    Ok(updated)
}

/// Deletes a process. Only its creator may do so.
///
/// A caller other than the creator gets `Forbidden` and nothing is written.
#[instrument(skip(db, notifier, actor), fields(employee_id = actor.id()))]
pub async fn delete_process(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    actor: &Actor,
    process_id: i64,
) -> Result<DeletedProcess> {
    let existing = Process::find_by_id(process_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("process", process_id))?;

    if existing.employee_id != actor.id() {
        warn!(
            process_id,
            owner = existing.employee_id,
            "Rejected delete of a process created by another employee"
        );
        return Err(Error::forbidden(
            "only the employee who created this process can delete it",
        ));
    }

    let deleted = DeletedProcess {
        process_id: existing.id,
        client_id: existing.client_id,
        employee_id: existing.employee_id,
    };
    Process::delete_by_id(process_id).exec(db).await?;

    info!(process_id, client_id = deleted.client_id, "Process deleted");
    publish_serialized(notifier, Event::ProcessDeleted, &deleted);
    Ok(deleted)
}

/// Fetches a process together with its client.
pub async fn get_process_with_client(
    db: &DatabaseConnection,
    process_id: i64,
) -> Result<ProcessWithClient> {
    let (process, client) = Process::find_by_id(process_id)
        .find_also_related(Client)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("process", process_id))?;
    Ok(ProcessWithClient { process, client })
}

/// Query shared by the report endpoints and the aggregator.
///
/// Results are ordered by process date, then id.
pub async fn find_processes<C>(
    db: &C,
    client_id: Option<i64>,
    range: DateRange,
    scope: Option<BuyScope>,
) -> Result<Vec<process::Model>>
where
    C: ConnectionTrait,
{
    let mut query = range.apply(Process::find());
    if let Some(client_id) = client_id {
        query = query.filter(process::Column::ClientId.eq(client_id));
    }
    if let Some(scope) = scope {
        query = scope.apply(query);
    }
    query
        .order_by_asc(process::Column::ProcessDate)
        .order_by_asc(process::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A client's processes in `range` whose buy amount falls in `scope`.
///
/// Requires `AccessProcesses`. An unknown client is `NotFound`; a client with no
/// matching processes yields an empty list.
pub async fn get_client_processes_for_report(
    db: &DatabaseConnection,
    actor: &Actor,
    client_id: i64,
    range: DateRange,
    scope: BuyScope,
) -> Result<Vec<process::Model>> {
    require(actor, Capability::AccessProcesses)?;
    find_client(db, client_id).await?;
    find_processes(db, Some(client_id), range, Some(scope)).await
}

/// Every process in `range`, regardless of client. Requires `AccessProcesses`.
pub async fn get_processes_in_range(
    db: &DatabaseConnection,
    actor: &Actor,
    range: DateRange,
) -> Result<Vec<process::Model>> {
    require(actor, Capability::AccessProcesses)?;
    find_processes(db, None, range, None).await
}

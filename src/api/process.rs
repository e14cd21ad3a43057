//! Process endpoints under `/api/employee`.

use crate::{
    api::{
        AppState,
        response::{created, listing, ok},
    },
    core::{
        permission::Actor,
        process::{self, BuyScope, DateRange, ProcessInput},
    },
    errors::{Error, Result},
};
use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

/// Date-range body shared by the query and report endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeRequest {
    /// Client whose processes are wanted
    pub client_id: Option<i64>,
    /// First day of the range, inclusive
    pub start_date: Option<NaiveDate>,
    /// Last day of the range, inclusive
    pub end_date: Option<NaiveDate>,
}

impl RangeRequest {
    pub(crate) fn range(&self) -> Result<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }

    pub(crate) fn client_id(&self) -> Result<i64> {
        self.client_id
            .ok_or_else(|| Error::bad_request("clientId is required"))
    }
}

const NO_PROCESSES: &str = "no processes found for the selected period";

/// Records a new process for a client.
#[post("/api/employee/create-process")]
pub async fn create_process(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<ProcessInput>,
) -> Result<HttpResponse> {
    let created_process =
        process::create_process(&state.database, state.notifier.as_ref(), &actor, &body).await?;
    Ok(created(json!({ "process": created_process })))
}

/// Replaces the fields of an existing process.
#[put("/api/employee/edit-process/{process_id}")]
pub async fn edit_process(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
    body: web::Json<ProcessInput>,
) -> Result<HttpResponse> {
    let updated = process::edit_process(
        &state.database,
        state.notifier.as_ref(),
        &actor,
        path.into_inner(),
        &body,
    )
    .await?;
    Ok(ok(json!({ "process": updated })))
}

/// Deletes a process; only its creator may do so.
#[delete("/api/employee/delete-process/{process_id}")]
pub async fn delete_process(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let deleted =
        process::delete_process(&state.database, state.notifier.as_ref(), &actor, path.into_inner())
            .await?;
    Ok(ok(json!({ "deleted": deleted })))
}

/// Public lookup; no bearer token required.
#[get("/api/employee/get-process-by-id/{id}")]
pub async fn get_process_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let found = process::get_process_with_client(&state.database, path.into_inner()).await?;
    Ok(ok(json!({ "process": found })))
}

/// Client processes within an optional date range.
#[post("/api/employee/get-processes")]
pub async fn get_processes(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<RangeRequest>,
) -> Result<HttpResponse> {
    let processes = process::get_processes_in_range(&state.database, &actor, body.range()?).await?;
    let is_empty = processes.is_empty();
    Ok(listing(json!({ "processes": processes }), is_empty, NO_PROCESSES))
}

async fn client_processes(
    state: &AppState,
    actor: &Actor,
    body: &RangeRequest,
    scope: BuyScope,
) -> Result<HttpResponse> {
    let client_id = body.client_id()?;
    let processes =
        process::get_client_processes_for_report(&state.database, actor, client_id, body.range()?, scope)
            .await?;
    let is_empty = processes.is_empty();
    Ok(listing(json!({ "processes": processes }), is_empty, NO_PROCESSES))
}

/// Client processes with a buy amount below 10000.
#[post("/api/employee/get-processes-for-report")]
pub async fn get_processes_for_report(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<RangeRequest>,
) -> Result<HttpResponse> {
    client_processes(&state, &actor, &body, BuyScope::Lesser).await
}

/// Client processes with a buy amount of 10000 or more.
#[post("/api/employee/get-processes-for-report-greater")]
pub async fn get_processes_for_report_greater(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<RangeRequest>,
) -> Result<HttpResponse> {
    client_processes(&state, &actor, &body, BuyScope::Greater).await
}

//! Report endpoints under `/api/employee`.

use crate::{
    api::{AppState, process::RangeRequest, response::ok},
    core::{
        permission::Actor,
        process::BuyScope,
        report::{self, StatusBasis},
    },
    errors::Result,
};
use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use serde_json::json;

/// Body of the report endpoints. `scope` defaults to `lesser`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    /// Client and date range
    #[serde(flatten)]
    pub range: RangeRequest,
    /// Which buy amounts to include
    pub scope: Option<BuyScope>,
    /// Which total decides the status
    pub status_basis: Option<StatusBasis>,
}

/// Totals and status for one client.
#[post("/api/employee/client-report")]
pub async fn client_report(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<ReportRequest>,
) -> Result<HttpResponse> {
    let generated = report::generate_client_report(
        &state.database,
        &actor,
        body.range.client_id()?,
        body.range.range()?,
        body.scope.unwrap_or(BuyScope::Lesser),
        body.status_basis.unwrap_or_default(),
    )
    .await?;
    Ok(ok(json!({ "report": generated })))
}

/// Totals across every client.
#[post("/api/employee/general-report")]
pub async fn general_report(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<ReportRequest>,
) -> Result<HttpResponse> {
    let generated = report::generate_general_report(
        &state.database,
        &actor,
        body.range.range()?,
        body.scope.unwrap_or(BuyScope::Lesser),
    )
    .await?;
    Ok(ok(json!({ "report": generated })))
}

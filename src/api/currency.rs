//! Currency endpoints under `/api/currency`.

use crate::{
    api::{
        AppState,
        response::{created, listing, ok},
    },
    core::{
        currency::{self, CurrencyInput},
        permission::Actor,
    },
    errors::Result,
};
use actix_web::{HttpResponse, get, post, put, web};
use serde_json::json;

/// Adds a currency.
#[post("/api/currency/add")]
pub async fn add_currency(
    state: web::Data<AppState>,
    _actor: Actor,
    body: web::Json<CurrencyInput>,
) -> Result<HttpResponse> {
    let added = currency::add_currency(&state.database, state.notifier.as_ref(), &body).await?;
    Ok(created(json!({ "currency": added })))
}

/// Updates the currency with the given code.
#[put("/api/currency/edit/{code}")]
pub async fn edit_currency(
    state: web::Data<AppState>,
    _actor: Actor,
    path: web::Path<String>,
    body: web::Json<CurrencyInput>,
) -> Result<HttpResponse> {
    let updated =
        currency::update_currency(&state.database, state.notifier.as_ref(), &path, &body).await?;
    Ok(ok(json!({ "currency": updated })))
}

/// Every recorded currency.
#[get("/api/currency/all")]
pub async fn all_currencies(state: web::Data<AppState>) -> Result<HttpResponse> {
    let currencies = currency::list_currencies(&state.database).await?;
    let is_empty = currencies.is_empty();
    Ok(listing(json!({ "currencies": currencies }), is_empty, "no currencies found"))
}

//! Client endpoints under `/api/employee`.

use crate::{
    api::{
        AppState,
        response::{created, listing, ok},
    },
    core::{
        client::{self, ClientInput},
        permission::Actor,
    },
    errors::Result,
};
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde_json::json;

/// Registers a client.
#[post("/api/employee/create-client")]
pub async fn create_client(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse> {
    let new_client =
        client::create_client(&state.database, state.notifier.as_ref(), &actor, &body).await?;
    Ok(created(json!({ "client": new_client })))
}

/// Updates a client's details.
#[put("/api/employee/edit-client/{id}")]
pub async fn edit_client(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse> {
    let updated = client::edit_client(
        &state.database,
        state.notifier.as_ref(),
        &actor,
        path.into_inner(),
        &body,
    )
    .await?;
    Ok(ok(json!({ "client": updated })))
}

/// Deletes a client and its processes.
#[delete("/api/employee/delete-client/{id}")]
pub async fn delete_client(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let deleted =
        client::delete_client(&state.database, state.notifier.as_ref(), &actor, path.into_inner())
            .await?;
    Ok(ok(json!({ "deleted": deleted })))
}

/// One client with its processes.
#[get("/api/employee/get-client/{id}")]
pub async fn get_client(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let found =
        client::get_client_with_processes(&state.database, &actor, path.into_inner()).await?;
    Ok(ok(json!({ "client": found })))
}

/// Every client whose type the actor can access.
#[get("/api/employee/get-clients")]
pub async fn get_clients(state: web::Data<AppState>, actor: Actor) -> Result<HttpResponse> {
    let clients = client::list_accessible_clients(&state.database, &actor).await?;
    let is_empty = clients.is_empty();
    Ok(listing(json!({ "clients": clients }), is_empty, "no clients found"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::tests::{authorized, bearer, test_app, test_state};
    use crate::test_utils::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_client_crud_over_http() {
        let (state, admin) = test_state().await;
        let token = bearer(&state, &admin);
        let app = test::init_service(test_app(state)).await;

        let req = authorized(test::TestRequest::post(), &token)
            .uri("/api/employee/create-client")
            .set_json(client_input("Layla", "0301"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["client"]["id"].as_i64().unwrap();
        assert_eq!(body["client"]["clientType"], json!("less than 10000"));

        let req = authorized(test::TestRequest::post(), &token)
            .uri("/api/employee/create-client")
            .set_json(client_input("Layla Again", "0301"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = authorized(test::TestRequest::get(), &token)
            .uri(&format!("/api/employee/get-client/{id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["client"]["fullName"], json!("Layla"));
        assert_eq!(body["client"]["processes"], json!([]));

        let req = authorized(test::TestRequest::delete(), &token)
            .uri(&format!("/api/employee/delete-client/{id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["deleted"]["clientId"], json!(id));

        let req = authorized(test::TestRequest::get(), &token)
            .uri("/api/employee/get-clients")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["clients"], json!([]));
        assert_eq!(body["message"], json!("no clients found"));
    }

    #[actix_web::test]
    async fn test_unknown_client_is_not_found() {
        let (state, admin) = test_state().await;
        let token = bearer(&state, &admin);
        let app = test::init_service(test_app(state)).await;

        let req = authorized(test::TestRequest::get(), &token)
            .uri("/api/employee/get-client/404")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], json!("not_found"));
    }
}

//! HTTP boundary - actix-web handlers, the bearer-token gate and the response envelope.
//!
//! Handlers stay thin: extract, call into [`crate::core`], wrap the result. Every
//! error, including malformed JSON and path segments, leaves through
//! [`crate::errors::Error`]'s `ResponseError` impl.

use crate::{config::AuthConfig, errors::Error, notify::Notifier};
use actix_web::web;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Bearer token issuance and the `Actor` extractor
pub mod auth;
/// Client endpoints
pub mod client;
/// Company endpoints
pub mod company;
/// Currency endpoints
pub mod currency;
/// Process endpoints
pub mod process;
/// Report endpoints
pub mod report;
/// Success and error envelopes
pub mod response;

/// Shared state handed to every handler
pub struct AppState {
    /// Connection pool
    pub database: DatabaseConnection,
    /// Where mutations publish their events
    pub notifier: Arc<dyn Notifier>,
    /// Token signing settings
    pub auth: AuthConfig,
}

/// Registers every route plus the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::bad_request(format!("invalid request body: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        Error::bad_request(format!("invalid path: {err}")).into()
    }))
    .service(process::create_process)
    .service(process::edit_process)
    .service(process::delete_process)
    .service(process::get_process_by_id)
    .service(process::get_processes)
    .service(process::get_processes_for_report)
    .service(process::get_processes_for_report_greater)
    .service(report::client_report)
    .service(report::general_report)
    .service(client::create_client)
    .service(client::edit_client)
    .service(client::delete_client)
    .service(client::get_client)
    .service(client::get_clients)
    .service(currency::add_currency)
    .service(currency::edit_currency)
    .service(currency::all_currencies)
    .service(company::create_company)
    .service(company::get_company);
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        api::auth::issue_token, core::permission::Actor, notify::BroadcastNotifier,
        test_utils::setup_with_admin,
    };
    use actix_web::{
        App,
        body::MessageBody,
        dev::{ServiceFactory, ServiceRequest, ServiceResponse},
        http::header,
        test::TestRequest,
    };

    /// State over a fresh database, plus the admin it was seeded with.
    pub(crate) async fn test_state() -> (web::Data<AppState>, Actor) {
        let (database, _notifier, admin) = setup_with_admin().await.unwrap();
        let state = AppState {
            database,
            notifier: Arc::new(BroadcastNotifier::default()),
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_lifetime_secs: 300,
            },
        };
        (web::Data::new(state), admin)
    }

    pub(crate) fn test_app(
        state: web::Data<AppState>,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(state).configure(configure)
    }

    pub(crate) fn bearer(state: &AppState, actor: &Actor) -> String {
        issue_token(actor.employee(), &state.auth).unwrap()
    }

    pub(crate) fn authorized(request: TestRequest, token: &str) -> TestRequest {
        request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
    }

    #[actix_web::test]
    async fn test_bad_path_segment_is_bad_request() {
        let (state, _admin) = test_state().await;
        let app = actix_web::test::init_service(test_app(state)).await;

        let req = TestRequest::get()
            .uri("/api/employee/get-process-by-id/not-a-number")
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unknown_process_is_not_found() {
        let (state, _admin) = test_state().await;
        let app = actix_web::test::init_service(test_app(state)).await;

        let req = TestRequest::get()
            .uri("/api/employee/get-process-by-id/12345")
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}

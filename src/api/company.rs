//! Company endpoints.

use crate::{
    api::{
        AppState,
        response::{created, listing},
    },
    core::{
        company::{self, CompanyInput},
        permission::Actor,
    },
    errors::Result,
};
use actix_web::{HttpResponse, get, post, web};
use serde_json::json;

/// Registers the company; admin only.
#[post("/api/admin/create-company")]
pub async fn create_company(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CompanyInput>,
) -> Result<HttpResponse> {
    let new_company = company::create_company(&state.database, &actor, &body).await?;
    Ok(created(json!({ "company": new_company })))
}

/// The registered company, if any.
#[get("/api/company")]
pub async fn get_company(state: web::Data<AppState>) -> Result<HttpResponse> {
    let found = company::get_company(&state.database).await?;
    let is_empty = found.is_none();
    Ok(listing(json!({ "company": found }), is_empty, "no company registered yet"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::tests::{authorized, bearer, test_app, test_state};
    use crate::core::employee::resolve_actor;
    use crate::test_utils::create_test_employee;
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    fn company_body() -> Value {
        json!({
            "name": "Desk Exchange",
            "phone": "0111",
            "administratorName": "Root",
            "exchangeCurrency": "TRY",
            "address": "Main Street 1",
            "complianceOfficer": "Officer",
        })
    }

    #[actix_web::test]
    async fn test_create_company_admin_only() {
        let (state, admin) = test_state().await;
        let admin_token = bearer(&state, &admin);
        let staff = create_test_employee(&state.database, "staff@example.com", Vec::new())
            .await
            .unwrap();
        let staff = resolve_actor(&state.database, staff.id).await.unwrap();
        let staff_token = bearer(&state, &staff);
        let app = test::init_service(test_app(state)).await;

        let req = authorized(test::TestRequest::post(), &staff_token)
            .uri("/api/admin/create-company")
            .set_json(company_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = authorized(test::TestRequest::post(), &admin_token)
            .uri("/api/admin/create-company")
            .set_json(company_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = authorized(test::TestRequest::post(), &admin_token)
            .uri("/api/admin/create-company")
            .set_json(company_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get().uri("/api/company").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["company"]["name"], json!("Desk Exchange"));
    }
}

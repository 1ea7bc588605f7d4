use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use super::state_and_txn;
use crate::common::{assert_jsonapi_error, linkage, read_jsonapi, ExpectedError};
use crate::support::create_test_app;
use crate::support::factory::{CountryFactory, UserFactory};
use crate::support::requests;

#[actix_web::test]
async fn create_returns_created_with_location() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let user = UserFactory::new().create(shared.transaction()).await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;

    let resp = test::call_service(
        &app,
        requests::post(
            "/api/v1/countries",
            &json!({
                "data": {
                    "type": "countries",
                    "attributes": { "name": "Iceland", "code": "IS" },
                    "relationships": {
                        "users": { "data": [{ "type": "users", "id": user.id.to_string() }] }
                    }
                }
            }),
        )
        .to_request(),
    )
    .await;

    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Location header");
    let body = read_jsonapi(resp, 201).await;
    let id = body["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(location, format!("/api/v1/countries/{id}"));
    assert_eq!(body["data"]["attributes"]["code"], "IS");

    let resp = test::call_service(
        &app,
        requests::get(&format!("/api/v1/countries/{id}/relationships/users")).to_request(),
    )
    .await;
    let linkage_body = read_jsonapi(resp, 200).await;
    assert_eq!(
        linkage(&linkage_body),
        vec![("users".to_string(), user.id.to_string())]
    );

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn read_and_update_a_resource() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let country = CountryFactory::new().name("Chile").code("CL").create(shared.transaction()).await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;
    let uri = format!("/api/v1/countries/{}", country.id);

    let resp = test::call_service(&app, requests::get(&uri).to_request()).await;
    let body = read_jsonapi(resp, 200).await;
    assert_eq!(body["data"]["type"], "countries");
    assert_eq!(body["data"]["attributes"]["name"], "Chile");
    assert_eq!(body["data"]["links"]["self"], uri);

    let resp = test::call_service(
        &app,
        requests::patch(
            &uri,
            &json!({
                "data": {
                    "type": "countries",
                    "id": country.id.to_string(),
                    "attributes": { "name": "Republic of Chile" }
                }
            }),
        )
        .to_request(),
    )
    .await;
    let body = read_jsonapi(resp, 200).await;
    assert_eq!(body["data"]["attributes"]["name"], "Republic of Chile");
    assert_eq!(body["data"]["attributes"]["code"], "CL");

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn create_validation_errors_carry_pointers() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;

    let resp = test::call_service(
        &app,
        requests::post(
            "/api/v1/countries",
            &json!({ "data": { "type": "countries", "attributes": { "name": "Nowhere" } } }),
        )
        .to_request(),
    )
    .await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            .detail("The code field is required.")
            .pointer("/data/attributes/code"),
    )
    .await;

    let resp = test::call_service(
        &app,
        requests::post(
            "/api/v1/countries",
            &json!({ "data": { "type": "users", "attributes": { "name": "Nowhere", "code": "NW" } } }),
        )
        .to_request(),
    )
    .await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::CONFLICT, "CONFLICT").pointer("/data/type"),
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

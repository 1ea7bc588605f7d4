//! Media type negotiation and body parsing.

use actix_web::http::header::{ACCEPT, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::json;

use super::state_and_txn;
use crate::common::{assert_jsonapi_error, read_jsonapi, ExpectedError};
use crate::support::create_test_app;
use crate::support::factory::CountryFactory;
use crate::support::requests::{self, JSON_API};

fn empty_linkage() -> String {
    json!({ "data": [] }).to_string()
}

#[actix_web::test]
async fn plain_json_bodies_are_unsupported() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let country = CountryFactory::new().create(shared.transaction()).await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;
    let uri = format!("/api/v1/countries/{}/relationships/users", country.id);

    let req = TestRequest::patch()
        .uri(&uri)
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload(empty_linkage())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE"),
    )
    .await;

    let req = TestRequest::patch()
        .uri(&uri)
        .insert_header((CONTENT_TYPE, "application/vnd.api+json; charset=utf-8"))
        .set_payload(empty_linkage())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
            .detail("must not carry parameters"),
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn accept_with_only_parameterised_jsonapi_is_not_acceptable() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let country = CountryFactory::new().create(shared.transaction()).await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;
    let uri = format!("/api/v1/countries/{}/relationships/users", country.id);

    let req = TestRequest::get()
        .uri(&uri)
        .insert_header((ACCEPT, "application/vnd.api+json; ext=bulk"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_jsonapi_error(resp, ExpectedError::new(StatusCode::NOT_ACCEPTABLE, "NOT_ACCEPTABLE")).await;

    let req = TestRequest::get()
        .uri(&uri)
        .insert_header((ACCEPT, format!("application/vnd.api+json; ext=bulk, {JSON_API}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    read_jsonapi(resp, 200).await;

    let req = TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    read_jsonapi(resp, 200).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn malformed_json_is_an_invalid_document() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let country = CountryFactory::new().create(shared.transaction()).await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;

    let req = TestRequest::post()
        .uri(&format!("/api/v1/countries/{}/relationships/users", country.id))
        .insert_header((CONTENT_TYPE, JSON_API))
        .set_payload("{\"data\": [")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::BAD_REQUEST, "INVALID_DOCUMENT").detail("Invalid JSON"),
    )
    .await;

    let resp = test::call_service(
        &app,
        requests::post(
            &format!("/api/v1/countries/{}/relationships/users", country.id),
            &json!({ "data": [{ "type": "users" }] }),
        )
        .to_request(),
    )
    .await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::BAD_REQUEST, "INVALID_DOCUMENT")
            .detail("The member id is required.")
            .pointer("/data/0"),
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

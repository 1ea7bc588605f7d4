//! Addressing failures: unknown types, relationships, ids and parameters.

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use super::state_and_txn;
use crate::common::{assert_jsonapi_error, ExpectedError};
use crate::support::create_test_app;
use crate::support::factory::CountryFactory;
use crate::support::requests;

#[actix_web::test]
async fn unknown_resource_type_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;

    let resp = test::call_service(&app, requests::get("/api/v1/planets/1/relationships/moons").to_request()).await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::NOT_FOUND, "RESOURCE_TYPE_NOT_FOUND").detail("planets"),
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn unknown_relationship_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let country = CountryFactory::new().create(shared.transaction()).await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;

    let resp = test::call_service(
        &app,
        requests::get(&format!("/api/v1/countries/{}/relationships/cities", country.id)).to_request(),
    )
    .await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::NOT_FOUND, "RELATIONSHIP_NOT_FOUND")
            .detail("Relationship cities does not exist on resource type countries."),
    )
    .await;

    let resp = test::call_service(
        &app,
        requests::patch(
            &format!("/api/v1/countries/{}/cities", country.id),
            &json!({ "data": [] }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    drop(resp);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn unknown_owner_id_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;

    let resp = test::call_service(
        &app,
        requests::delete(
            "/api/v1/countries/999999/relationships/users",
            &json!({ "data": [] }),
        )
        .to_request(),
    )
    .await;
    assert_jsonapi_error(resp, ExpectedError::new(StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND")).await;

    let resp = test::call_service(&app, requests::get("/api/v1/tags/not-a-uuid").to_request()).await;
    assert_jsonapi_error(resp, ExpectedError::new(StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND")).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn unknown_query_parameter_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let (state, shared) = state_and_txn().await?;
    let country = CountryFactory::new().create(shared.transaction()).await?;
    let app = create_test_app(state).with_prod_routes().build_in_txn(&shared).await;

    let resp = test::call_service(
        &app,
        requests::get(&format!("/api/v1/countries/{}/users?limit=5", country.id)).to_request(),
    )
    .await;
    assert_jsonapi_error(
        resp,
        ExpectedError::new(StatusCode::BAD_REQUEST, "INVALID_QUERY_PARAMETER").parameter("limit"),
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

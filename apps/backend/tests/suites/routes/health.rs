use actix_web::test;
use serde_json::Value;

use crate::support::create_test_app;
use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn health_reports_database_and_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body["migrations"].as_u64().unwrap_or(0) >= 1);
    assert!(body.get("db_error").is_none());
    assert_eq!(body["resource_types"], 8);
    assert!(body["time"].as_str().is_some_and(|t| t.contains('T')));
    Ok(())
}

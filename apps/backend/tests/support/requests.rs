//! JSON:API request builders.

use actix_web::http::header::{ACCEPT, CONTENT_TYPE};
use actix_web::test::TestRequest;
use serde_json::Value;

pub const JSON_API: &str = "application/vnd.api+json";

pub fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri).insert_header((ACCEPT, JSON_API))
}

fn with_body(req: TestRequest, uri: &str, body: &Value) -> TestRequest {
    req.uri(uri)
        .insert_header((ACCEPT, JSON_API))
        .insert_header((CONTENT_TYPE, JSON_API))
        .set_payload(body.to_string())
}

pub fn post(uri: &str, body: &Value) -> TestRequest {
    with_body(TestRequest::post(), uri, body)
}

pub fn patch(uri: &str, body: &Value) -> TestRequest {
    with_body(TestRequest::patch(), uri, body)
}

pub fn delete(uri: &str, body: &Value) -> TestRequest {
    with_body(TestRequest::delete(), uri, body)
}

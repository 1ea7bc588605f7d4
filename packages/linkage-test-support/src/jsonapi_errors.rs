//! Assertions for JSON:API error documents.
//!
//! Mirrors the backend's error contract without depending on backend types:
//! `{"errors":[{"status","code","title","detail","source","meta":{"trace_id"}}]}`
//! plus an `x-trace-id` header equal to `meta.trace_id`.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

#[derive(Debug, Deserialize)]
struct ErrorDocumentLike {
    errors: Vec<ErrorObjectLike>,
}

#[derive(Debug, Deserialize)]
struct ErrorObjectLike {
    status: String,
    code: String,
    title: String,
    detail: String,
    #[serde(default)]
    source: Option<Value>,
    meta: ErrorMetaLike,
}

#[derive(Debug, Deserialize)]
struct ErrorMetaLike {
    trace_id: String,
}

/// Where an error is expected to point.
#[derive(Debug, Clone, Copy)]
pub enum ExpectedSource<'a> {
    Pointer(&'a str),
    Parameter(&'a str),
    None,
}

/// Expected contents of the single error object in a response.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedError<'a> {
    pub status: StatusCode,
    pub code: &'a str,
    pub detail_contains: Option<&'a str>,
    pub source: ExpectedSource<'a>,
}

impl<'a> ExpectedError<'a> {
    pub fn new(status: StatusCode, code: &'a str) -> Self {
        Self {
            status,
            code,
            detail_contains: None,
            source: ExpectedSource::None,
        }
    }

    pub fn detail(mut self, fragment: &'a str) -> Self {
        self.detail_contains = Some(fragment);
        self
    }

    pub fn pointer(mut self, pointer: &'a str) -> Self {
        self.source = ExpectedSource::Pointer(pointer);
        self
    }

    pub fn parameter(mut self, parameter: &'a str) -> Self {
        self.source = ExpectedSource::Parameter(parameter);
        self
    }
}

/// Assert a ServiceResponse carries exactly one error matching `expected`.
///
/// Returns the parsed body for further checks.
pub async fn assert_jsonapi_error(
    resp: ServiceResponse<BoxBody>,
    expected: ExpectedError<'_>,
) -> Value {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;
    assert_jsonapi_error_parts(status, &headers, &body, expected)
}

/// Same as [`assert_jsonapi_error`] over raw response parts.
pub fn assert_jsonapi_error_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected: ExpectedError<'_>,
) -> Value {
    let body_str = std::str::from_utf8(body).expect("error body should be valid UTF-8");
    assert_eq!(
        status, expected.status,
        "unexpected status; body was: {body_str}"
    );

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with(JSON_API_MEDIA_TYPE),
        "Content-Type must be {JSON_API_MEDIA_TYPE} (got {content_type})"
    );

    let trace_header = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present");
    assert!(!trace_header.is_empty(), "x-trace-id should not be empty");

    let doc: ErrorDocumentLike = serde_json::from_str(body_str)
        .unwrap_or_else(|e| panic!("not a JSON:API error document ({e}): {body_str}"));
    assert_eq!(doc.errors.len(), 1, "expected one error object: {body_str}");
    let error = &doc.errors[0];

    assert_eq!(error.status, expected.status.as_u16().to_string());
    assert_eq!(error.code, expected.code, "unexpected code: {body_str}");
    assert!(!error.title.is_empty(), "title should not be empty");
    assert_eq!(
        error.meta.trace_id, trace_header,
        "meta.trace_id should match x-trace-id header"
    );

    if let Some(fragment) = expected.detail_contains {
        assert!(
            error.detail.contains(fragment),
            "expected detail to contain '{fragment}', got '{}'",
            error.detail
        );
    }

    match expected.source {
        ExpectedSource::Pointer(pointer) => {
            let actual = error.source.as_ref().and_then(|s| s.get("pointer"));
            assert_eq!(
                actual.and_then(Value::as_str),
                Some(pointer),
                "unexpected source: {body_str}"
            );
        }
        ExpectedSource::Parameter(parameter) => {
            let actual = error.source.as_ref().and_then(|s| s.get("parameter"));
            assert_eq!(
                actual.and_then(Value::as_str),
                Some(parameter),
                "unexpected source: {body_str}"
            );
        }
        ExpectedSource::None => {}
    }

    serde_json::from_str(body_str).unwrap_or(Value::Null)
}

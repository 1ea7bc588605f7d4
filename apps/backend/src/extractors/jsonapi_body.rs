use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde_json::{Error as JsonError, Value};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::jsonapi::media::negotiate_body;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// JSON:API request body.
///
/// Negotiates the media type (415/406) before reading, then parses the body
/// as JSON. Document structure is checked by the handler, which knows
/// whether it expects a relationship or a resource document.
#[derive(Debug)]
pub struct JsonApiBody(pub Value);

impl JsonApiBody {
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl Deref for JsonApiBody {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for JsonApiBody {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let negotiated = negotiate_body(req);
        let mut payload = payload.take();

        Box::pin(async move {
            negotiated?;
            let trace_id = trace_ctx::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %trace_id, error = %e, "Failed to read request body chunk");
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                body.extend_from_slice(&chunk);
            }

            let parsed = serde_json::from_slice::<Value>(&body).map_err(|e| {
                debug!(
                    trace_id = %trace_id,
                    error = %Redacted(&e.to_string()),
                    body_size = body.len(),
                    "JSON:API body parsing failed"
                );
                AppError::bad_request(ErrorCode::InvalidDocument, classify_json_error(&e))
            })?;

            Ok(JsonApiBody(parsed))
        })
    }
}

/// Sanitized description of a JSON parse failure.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("Invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => "Invalid JSON: unexpected value".to_string(),
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

//! JSON:API media type negotiation.

use actix_web::http::header::{ACCEPT, CONTENT_TYPE};
use actix_web::HttpRequest;

use crate::error::AppError;

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Split `type/subtype; a=b` into the lower-cased essence and whether any
/// parameters follow it.
fn essence(media_range: &str) -> (String, bool) {
    let mut parts = media_range.split(';');
    let essence = parts.next().unwrap_or("").trim().to_ascii_lowercase();
    let has_params = parts.any(|p| !p.trim().is_empty() && !p.trim().starts_with("q="));
    (essence, has_params)
}

/// Request bodies must carry the bare JSON:API media type.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), AppError> {
    match content_type.map(essence) {
        Some((essence, false)) if essence == JSON_API_MEDIA_TYPE => Ok(()),
        Some((essence, true)) if essence == JSON_API_MEDIA_TYPE => Err(
            AppError::unsupported_media_type("The JSON:API media type must not carry parameters."),
        ),
        _ => Err(AppError::unsupported_media_type(format!(
            "Request bodies must be sent as {JSON_API_MEDIA_TYPE}."
        ))),
    }
}

/// Reject an `Accept` header whose JSON:API entries all carry parameters.
pub fn check_accept(accept: Option<&str>) -> Result<(), AppError> {
    let Some(accept) = accept else {
        return Ok(());
    };
    let jsonapi: Vec<bool> = accept
        .split(',')
        .map(essence)
        .filter(|(e, _)| e == JSON_API_MEDIA_TYPE)
        .map(|(_, params)| params)
        .collect();

    if !jsonapi.is_empty() && jsonapi.iter().all(|params| *params) {
        return Err(AppError::not_acceptable(format!(
            "The Accept header lists {JSON_API_MEDIA_TYPE} only with media type parameters."
        )));
    }
    Ok(())
}

pub fn header_str<'a>(req: &'a HttpRequest, name: actix_web::http::header::HeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Both checks against a request that carries a body.
pub fn negotiate_body(req: &HttpRequest) -> Result<(), AppError> {
    check_content_type(header_str(req, CONTENT_TYPE))?;
    check_accept(header_str(req, ACCEPT))
}

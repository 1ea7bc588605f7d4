use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::jsonapi::media::JSON_API_MEDIA_TYPE;
use crate::jsonapi::API_PREFIX;

pub mod health;
pub mod relationships;
pub mod resources;

/// Serialize `document` with the JSON:API media type.
pub(crate) fn jsonapi_response<T: Serialize>(status: StatusCode, document: &T) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(JSON_API_MEDIA_TYPE)
        .json(document)
}

/// Register every route. `main.rs` wraps the app in middleware; tests call
/// this directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(
        web::scope(API_PREFIX)
            .configure(relationships::configure_routes)
            .configure(resources::configure_routes),
    );
}

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header::ACCEPT;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::jsonapi::media::{check_accept, header_str};
use crate::jsonapi::query::QueryParams;

/// Parsed JSON:API query parameters; also enforces the `Accept` rule.
#[derive(Debug, Clone, Default)]
pub struct JsonApiQuery(pub QueryParams);

impl Deref for JsonApiQuery {
    type Target = QueryParams;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn extract(req: &HttpRequest) -> Result<JsonApiQuery, AppError> {
    check_accept(header_str(req, ACCEPT))?;
    let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string()).map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidQueryParameter, "Malformed query string")
    })?;
    Ok(JsonApiQuery(QueryParams::parse(&pairs)?))
}

impl FromRequest for JsonApiQuery {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

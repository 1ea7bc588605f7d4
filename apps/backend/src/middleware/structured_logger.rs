//! One `request_completed` event per request.
//!
//! Client errors log at `warn`, server errors at `error`, everything else at
//! `info`. Responses carrying a JSON:API error document also record the
//! error code the handler produced.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::Error as ActixError;
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;
use crate::error::AppError;

pub struct StructuredLogger;

struct Completed {
    method: String,
    path: String,
    query: String,
    status: StatusCode,
    error_code: &'static str,
    trace_id: String,
    duration_us: u64,
}

impl Completed {
    fn emit(&self) {
        let status = self.status.as_u16();
        if self.status.is_server_error() {
            error!(http.method = %self.method, url.path = %self.path, url.query = %self.query, http.status_code = status, error_code = self.error_code, trace_id = %self.trace_id, duration_us = self.duration_us, "request_completed");
        } else if self.status.is_client_error() {
            warn!(http.method = %self.method, url.path = %self.path, url.query = %self.query, http.status_code = status, error_code = self.error_code, trace_id = %self.trace_id, duration_us = self.duration_us, "request_completed");
        } else {
            info!(http.method = %self.method, url.path = %self.path, url.query = %self.query, http.status_code = status, trace_id = %self.trace_id, duration_us = self.duration_us, "request_completed");
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerService { inner: service }))
    }
}

pub struct StructuredLoggerService<S> {
    inner: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query = req.query_string().to_string();
        let pending = self.inner.call(req);

        Box::pin(async move {
            let result = pending.await;

            // RequestTrace sits inside this middleware; read the id back
            // from the request the response carries.
            let (status, trace_id, error_code) = match &result {
                Ok(res) => (
                    res.status(),
                    TraceId::of(res.request()),
                    res.response()
                        .error()
                        .and_then(|e| e.as_error::<AppError>())
                        .map(|e| e.code().as_str())
                        .unwrap_or(""),
                ),
                Err(err) => (err.as_response_error().status_code(), None, ""),
            };

            Completed {
                method,
                path,
                query,
                status,
                error_code,
                trace_id: trace_id.unwrap_or_else(|| "unknown".to_string()),
                duration_us: started.elapsed().as_micros() as u64,
            }
            .emit();

            result
        })
    }
}

//! `request` span around the inner service.
//!
//! Carries the trace id, method, path and (when routing matched one) the
//! resource type segment, so events from resolver, synchronizer and adapters
//! inherit them. Must be wrapped inside `RequestTrace`, i.e. registered with
//! `.wrap(TraceSpan)` before `.wrap(RequestTrace)`.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument};

use super::request_trace::TraceId;
use crate::jsonapi::API_PREFIX;

#[derive(Clone, Default)]
pub struct TraceSpan;

/// First path segment under the API prefix, e.g. `posts` for
/// `/api/v1/posts/1/relationships/tags`.
fn resource_segment(path: &str) -> &str {
    path.strip_prefix(API_PREFIX)
        .and_then(|rest| rest.trim_start_matches('/').split('/').next())
        .unwrap_or("")
}

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanService { inner: service }))
    }
}

pub struct TraceSpanService<S> {
    inner: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::of(&req).unwrap_or_else(|| "missing-trace-id".to_string());
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
            resource = %resource_segment(req.path()),
        );

        Box::pin(self.inner.call(req).instrument(span))
    }
}

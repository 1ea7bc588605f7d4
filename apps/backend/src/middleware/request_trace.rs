//! Trace id assignment.
//!
//! Each request gets a fresh id. It is kept in request extensions for the
//! other middleware, scoped as the task-local trace context around the inner
//! service, and returned to the client as `x-trace-id` (error documents
//! repeat it under `meta.trace_id`).

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::HttpMessage;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::trace_ctx;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

impl TraceId {
    /// Id stored on `req`, if `RequestTrace` has run.
    pub fn of(req: &impl HttpMessage) -> Option<String> {
        req.extensions().get::<TraceId>().map(|t| t.0.clone())
    }
}

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceService { inner: service }))
    }
}

pub struct RequestTraceService<S> {
    inner: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(TraceId(id.clone()));
        let header = HeaderValue::from_str(&id).ok();
        let pending = self.inner.call(req);

        Box::pin(trace_ctx::with_trace_id(id, async move {
            let mut response = pending.await?;
            if let Some(value) = header {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            }
            Ok(response)
        }))
    }
}

//! Task-local trace id for the request being served.
//!
//! `RequestTrace` scopes every request future with its trace id so error
//! rendering and DB error logging can tag output without threading the id
//! through call signatures.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

const UNKNOWN: &str = "unknown";

/// Trace id of the current task, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` installed for its whole lifetime.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

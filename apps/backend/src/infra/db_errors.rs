//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos convert here so higher layers only
//! ever see sanitized, PII-free details. Raw messages are logged redacted.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// `table.column` from sqlite's "UNIQUE constraint failed: table.column".
fn sqlite_unique_target(msg: &str) -> Option<&str> {
    const MARKER: &str = "UNIQUE constraint failed: ";
    let start = msg.find(MARKER)? + MARKER.len();
    msg[start..].split_whitespace().next()
}

fn unique_conflict(msg: &str) -> Option<(ConflictKind, &'static str)> {
    let target = sqlite_unique_target(msg);
    if target == Some("users.email") || msg.contains("ux_users_email") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    if target == Some("posts.slug") || msg.contains("ux_posts_slug") {
        return Some((ConflictKind::UniqueSlug, "Slug already in use"));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with a sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(what) => {
            warn!(trace_id = %trace_id, record = %Redacted(what), "Record not found");
            return DomainError::not_found(NotFoundKind::Record, "Record not found");
        }
        sea_orm::DbErr::RecordNotUpdated => {
            return DomainError::not_found(NotFoundKind::Record, "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        sea_orm::DbErr::Type(_) | sea_orm::DbErr::TryIntoErr { .. } => {
            error!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Stored value has unexpected shape");
            return DomainError::infra(
                InfraErrorKind::DataCorruption,
                "Stored data could not be decoded",
            );
        }
        _ => {}
    }

    if mentions_sqlstate(&msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unique constraint violation");
        if let Some((kind, detail)) = unique_conflict(&msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&msg, "23503") || msg.contains("FOREIGN KEY constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Foreign key constraint violation");
        return DomainError::validation(
            ValidationKind::ForeignKey,
            "Foreign key constraint violation",
        );
    }

    if mentions_sqlstate(&msg, "23514") || msg.contains("CHECK constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Check constraint violation");
        return DomainError::validation(ValidationKind::Check, "Check constraint violation");
    }

    if msg.contains("timeout") || msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

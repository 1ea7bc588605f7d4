//! Errors raised below the HTTP layer.
//!
//! Adapters speak `sea_orm::DbErr`; the repos turn that into `DomainError`
//! through `infra::db_errors::map_db_err`, and `AppError: From<DomainError>`
//! picks the JSON:API status and code.

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Resource,
    Record,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UniqueEmail,
    UniqueSlug,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    ForeignKey,
    Check,
    Other(String),
}

/// Storage-level failure in domain terms.
///
/// Carries a sanitized detail only; raw driver messages stay in the logs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("validation {0:?}: {1}")]
    Validation(ValidationKind, String),
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        crate::infra::db_errors::map_db_err(e)
    }
}

use thiserror::Error;

use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::jsonapi::document::ErrorSource;

/// Failures of relationship resolution, synchronization and reads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelationshipError {
    /// Identifier names a type the relation does not accept.
    #[error("{detail}")]
    InvalidReference { detail: String, pointer: String },
    /// Identifier does not resolve to a stored resource.
    #[error("{detail}")]
    NotFound { detail: String, pointer: String },
    /// Query parameter rejected.
    #[error("{detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        parameter: String,
    },
    /// Document shape does not fit the relation.
    #[error("{detail}")]
    InvalidDocument { detail: String, pointer: String },
    /// Operation not supported by the relation.
    #[error("{detail}")]
    NotModifiable { detail: String },
    #[error("relationship {name} does not exist on {ty}")]
    UnknownRelationship { ty: String, name: String },
    #[error(transparent)]
    Persistence(#[from] DomainError),
}

impl RelationshipError {
    pub fn invalid_reference(detail: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::InvalidReference {
            detail: detail.into(),
            pointer: pointer.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
            pointer: pointer.into(),
        }
    }

    pub fn validation(code: ErrorCode, detail: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            parameter: parameter.into(),
        }
    }

    pub fn invalid_document(detail: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::InvalidDocument {
            detail: detail.into(),
            pointer: pointer.into(),
        }
    }

    pub fn not_modifiable(detail: impl Into<String>) -> Self {
        Self::NotModifiable {
            detail: detail.into(),
        }
    }
}

impl From<RelationshipError> for AppError {
    fn from(err: RelationshipError) -> Self {
        match err {
            RelationshipError::InvalidReference { detail, pointer } => {
                AppError::conflict_at(ErrorCode::InvalidReference, detail, pointer)
            }
            RelationshipError::NotFound { detail, pointer } => {
                AppError::not_found_at(ErrorCode::RelatedResourceNotFound, detail, pointer)
            }
            RelationshipError::Validation {
                code,
                detail,
                parameter,
            } => AppError::Validation {
                code,
                detail,
                error_source: Some(ErrorSource::Parameter(parameter)),
            },
            RelationshipError::InvalidDocument { detail, pointer } => {
                AppError::invalid_document(detail, pointer)
            }
            RelationshipError::NotModifiable { detail } => {
                AppError::forbidden(ErrorCode::NotModifiable, detail)
            }
            RelationshipError::UnknownRelationship { ty, name } => AppError::not_found(
                ErrorCode::RelationshipNotFound,
                format!("Relationship {name} does not exist on resource type {ty}."),
            ),
            RelationshipError::Persistence(domain) => AppError::from(domain),
        }
    }
}

use actix_web::error::ResponseError;
use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::jsonapi::document::ErrorSource;
use crate::jsonapi::media::JSON_API_MEDIA_TYPE;
use crate::trace_ctx;

/// One member of a JSON:API `errors` array.
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub status: String,
    pub code: String,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    pub meta: ErrorMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorMeta {
    pub trace_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        error_source: Option<ErrorSource>,
    },
    #[error("Bad request: {detail}")]
    BadRequest {
        code: ErrorCode,
        detail: String,
        error_source: Option<ErrorSource>,
    },
    #[error("Not found: {detail}")]
    NotFound {
        code: ErrorCode,
        detail: String,
        error_source: Option<ErrorSource>,
    },
    #[error("Conflict: {detail}")]
    Conflict {
        code: ErrorCode,
        detail: String,
        error_source: Option<ErrorSource>,
    },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Unsupported media type: {detail}")]
    UnsupportedMediaType { detail: String },
    #[error("Not acceptable: {detail}")]
    NotAcceptable { detail: String },
    #[error("Database error: {detail}")]
    Db { code: ErrorCode, detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Timeout: {detail}")]
    Timeout { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Db { code, .. }
            | AppError::Timeout { code, .. } => *code,
            AppError::UnsupportedMediaType { .. } => ErrorCode::UnsupportedMediaType,
            AppError::NotAcceptable { .. } => ErrorCode::NotAcceptable,
            AppError::DbUnavailable => ErrorCode::DbUnavailable,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::UnsupportedMediaType { detail }
            | AppError::NotAcceptable { detail }
            | AppError::Db { detail, .. }
            | AppError::Timeout { detail, .. }
            | AppError::Internal { detail }
            | AppError::Config { detail } => detail.clone(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
        }
    }

    pub fn error_source(&self) -> Option<&ErrorSource> {
        match self {
            AppError::Validation { error_source, .. }
            | AppError::BadRequest { error_source, .. }
            | AppError::NotFound { error_source, .. }
            | AppError::Conflict { error_source, .. } => error_source.as_ref(),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Query parameter rejected; `parameter` is reported as `source.parameter`.
    pub fn invalid_parameter(
        code: ErrorCode,
        detail: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            error_source: Some(ErrorSource::Parameter(parameter.into())),
        }
    }

    /// Request document rejected at `pointer`.
    pub fn invalid_document(detail: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::BadRequest {
            code: ErrorCode::InvalidDocument,
            detail: detail.into(),
            error_source: Some(ErrorSource::Pointer(pointer.into())),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
            error_source: None,
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
            error_source: None,
        }
    }

    pub fn not_found_at(
        code: ErrorCode,
        detail: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
            error_source: Some(ErrorSource::Pointer(pointer.into())),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
            error_source: None,
        }
    }

    pub fn conflict_at(
        code: ErrorCode,
        detail: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
            error_source: Some(ErrorSource::Pointer(pointer.into())),
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            detail: detail.into(),
        }
    }

    pub fn not_acceptable(detail: impl Into<String>) -> Self {
        Self::NotAcceptable {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            code: ErrorCode::DbError,
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render as a JSON:API error document body.
    pub fn to_document(&self, trace_id: String) -> ErrorDocument {
        let code = self.code();
        ErrorDocument {
            errors: vec![ErrorObject {
                status: self.status().as_u16().to_string(),
                code: code.as_str().to_string(),
                title: Self::humanize_code(code.as_str()),
                detail: self.detail(),
                source: self.error_source().cloned(),
                meta: ErrorMeta { trace_id },
            }],
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(ValidationKind::ForeignKey, detail) => {
                AppError::conflict(ErrorCode::FkViolation, detail)
            }
            DomainError::Validation(ValidationKind::Check, detail) => {
                AppError::bad_request(ErrorCode::CheckViolation, detail)
            }
            DomainError::Validation(_, detail) => AppError::Validation {
                code: ErrorCode::ValidationError,
                detail,
                error_source: None,
            },
            DomainError::Conflict(ConflictKind::UniqueEmail, detail) => {
                AppError::conflict(ErrorCode::UniqueEmail, detail)
            }
            DomainError::Conflict(ConflictKind::UniqueSlug, detail) => {
                AppError::conflict(ErrorCode::UniqueSlug, detail)
            }
            DomainError::Conflict(_, detail) => AppError::conflict(ErrorCode::Conflict, detail),
            DomainError::NotFound(NotFoundKind::Resource, detail) => {
                AppError::not_found(ErrorCode::ResourceNotFound, detail)
            }
            DomainError::NotFound(NotFoundKind::Record, detail) => {
                AppError::not_found(ErrorCode::RecordNotFound, detail)
            }
            DomainError::NotFound(_, detail) => AppError::not_found(ErrorCode::NotFound, detail),
            DomainError::Infra(InfraErrorKind::DbUnavailable, _) => AppError::DbUnavailable,
            DomainError::Infra(InfraErrorKind::Timeout, detail) => AppError::Timeout {
                code: ErrorCode::DbTimeout,
                detail,
            },
            DomainError::Infra(InfraErrorKind::DataCorruption, detail) => AppError::Db {
                code: ErrorCode::DataCorruption,
                detail,
            },
            DomainError::Infra(_, detail) => AppError::db(detail),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();
        let document = self.to_document(trace_id.clone());

        let mut builder = HttpResponse::build(status);
        builder
            .content_type(JSON_API_MEDIA_TYPE)
            .insert_header(("x-trace-id", trace_id));

        if status == StatusCode::SERVICE_UNAVAILABLE {
            builder.insert_header((RETRY_AFTER, HeaderValue::from_static("1")));
        }

        builder.json(document)
    }
}

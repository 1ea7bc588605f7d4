//! Error codes for the linkage API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and appears verbatim as the `code`
//! member of JSON:API error objects.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request documents
    /// Body is not a well-formed JSON:API document
    InvalidDocument,
    /// Resource identifier names a type the relationship does not accept
    InvalidReference,
    /// Attribute payload failed validation
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Relationship is read-only or does not support the operation
    NotModifiable,

    // Query parameters
    /// filter[...] rejected
    InvalidFilter,
    /// sort rejected
    InvalidSort,
    /// include rejected
    InvalidInclude,
    /// page[...] rejected
    InvalidPage,
    /// Unknown query parameter family
    InvalidQueryParameter,

    // Content negotiation
    /// Content-Type is not the JSON:API media type
    UnsupportedMediaType,
    /// Accept header only lists JSON:API with parameters
    NotAcceptable,

    // Resource Not Found
    /// Unknown resource type in the URL
    ResourceTypeNotFound,
    /// Resource addressed by the URL does not exist
    ResourceNotFound,
    /// Relationship name is unknown for the resource type
    RelationshipNotFound,
    /// Identifier in a document does not resolve to a stored resource
    RelatedResourceNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,
    /// Unique email constraint
    UniqueEmail,
    /// Unique slug constraint
    UniqueSlug,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,

    // Database Constraint Violations
    /// Unique constraint violation (SQLSTATE 23505)
    UniqueViolation,
    /// Foreign key constraint violation (SQLSTATE 23503)
    FkViolation,
    /// Check constraint violation (SQLSTATE 23514)
    CheckViolation,
    /// Record not found (DB-driven not-found)
    RecordNotFound,

    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// The canonical string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidDocument => "INVALID_DOCUMENT",
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotModifiable => "NOT_MODIFIABLE",

            Self::InvalidFilter => "INVALID_FILTER",
            Self::InvalidSort => "INVALID_SORT",
            Self::InvalidInclude => "INVALID_INCLUDE",
            Self::InvalidPage => "INVALID_PAGE",
            Self::InvalidQueryParameter => "INVALID_QUERY_PARAMETER",

            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Self::NotAcceptable => "NOT_ACCEPTABLE",

            Self::ResourceTypeNotFound => "RESOURCE_TYPE_NOT_FOUND",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::RelationshipNotFound => "RELATIONSHIP_NOT_FOUND",
            Self::RelatedResourceNotFound => "RELATED_RESOURCE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::Conflict => "CONFLICT",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::UniqueSlug => "UNIQUE_SLUG",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",

            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::CheckViolation => "CHECK_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }

    /// Every code, for exhaustiveness checks in tests.
    pub const ALL: &'static [ErrorCode] = &[
        Self::InvalidDocument,
        Self::InvalidReference,
        Self::ValidationError,
        Self::BadRequest,
        Self::NotModifiable,
        Self::InvalidFilter,
        Self::InvalidSort,
        Self::InvalidInclude,
        Self::InvalidPage,
        Self::InvalidQueryParameter,
        Self::UnsupportedMediaType,
        Self::NotAcceptable,
        Self::ResourceTypeNotFound,
        Self::ResourceNotFound,
        Self::RelationshipNotFound,
        Self::RelatedResourceNotFound,
        Self::NotFound,
        Self::Conflict,
        Self::UniqueEmail,
        Self::UniqueSlug,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::UniqueViolation,
        Self::FkViolation,
        Self::CheckViolation,
        Self::RecordNotFound,
        Self::Internal,
        Self::ConfigError,
        Self::DataCorruption,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

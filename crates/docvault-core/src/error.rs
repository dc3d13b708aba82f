//! Error types for Docvault Core.

use std::fmt;

use thiserror::Error;

/// The stable error taxonomy shared by every registry operation.
///
/// Each kind has a fixed numeric code that callers may persist or put on
/// the wire. Codes never change meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotAuthorized,
    /// Reserved. No registry operation raises it during normal operation.
    DocumentExists,
    DocumentNotFound,
    InvalidDocumentData,
    InvalidDescriptor,
    InvalidAccessType,
    InvalidTimestamp,
    /// Reserved, unused.
    AccessDenied,
    InvalidClassification,
}

impl ErrorKind {
    /// All kinds, in code order.
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::NotAuthorized,
        ErrorKind::DocumentExists,
        ErrorKind::DocumentNotFound,
        ErrorKind::InvalidDocumentData,
        ErrorKind::InvalidDescriptor,
        ErrorKind::InvalidAccessType,
        ErrorKind::InvalidTimestamp,
        ErrorKind::AccessDenied,
        ErrorKind::InvalidClassification,
    ];

    /// Stable numeric code.
    pub const fn code(self) -> u32 {
        match self {
            ErrorKind::NotAuthorized => 100,
            ErrorKind::DocumentExists => 101,
            ErrorKind::DocumentNotFound => 102,
            ErrorKind::InvalidDocumentData => 103,
            ErrorKind::InvalidDescriptor => 104,
            ErrorKind::InvalidAccessType => 105,
            ErrorKind::InvalidTimestamp => 106,
            ErrorKind::AccessDenied => 107,
            ErrorKind::InvalidClassification => 108,
        }
    }

    /// Short snake_case name, used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotAuthorized => "not_authorized",
            ErrorKind::DocumentExists => "document_exists",
            ErrorKind::DocumentNotFound => "document_not_found",
            ErrorKind::InvalidDocumentData => "invalid_document_data",
            ErrorKind::InvalidDescriptor => "invalid_descriptor",
            ErrorKind::InvalidAccessType => "invalid_access_type",
            ErrorKind::InvalidTimestamp => "invalid_timestamp",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::InvalidClassification => "invalid_classification",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (u{})", self.as_str(), self.code())
    }
}

/// Field-format and business-rule failures.
///
/// Every variant maps onto exactly one [`ErrorKind`] via [`ValidationError::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be 1..=50 characters, got {len}")]
    InvalidName { len: usize },

    #[error("digest must be exactly 64 characters, got {len}")]
    InvalidDigest { len: usize },

    #[error("descriptor must be 1..=200 characters, got {len}")]
    InvalidDescriptor { len: usize },

    #[error("classification must be 1..=20 characters, got {len}")]
    InvalidClassification { len: usize },

    #[error("tag set must hold 1..=5 tags, got {count}")]
    InvalidTagCount { count: usize },

    #[error("tag {index} must be 1..=30 characters, got {len}")]
    InvalidTag { index: usize, len: usize },

    #[error("grantee must differ from the granting identity")]
    SelfGrant,

    #[error("unknown permission type: {0:?}")]
    InvalidAccessType(String),

    #[error("grant duration must be in 1..=52560, got {0}")]
    InvalidDuration(u64),

    #[error("grant expiry overflows: {now} + {duration}")]
    ExpiryOverflow { now: u64, duration: u64 },
}

impl ValidationError {
    /// The taxonomy kind this failure is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::InvalidName { .. }
            | ValidationError::InvalidDigest { .. }
            | ValidationError::InvalidTagCount { .. }
            | ValidationError::InvalidTag { .. }
            | ValidationError::SelfGrant => ErrorKind::InvalidDocumentData,
            ValidationError::InvalidDescriptor { .. } => ErrorKind::InvalidDescriptor,
            ValidationError::InvalidClassification { .. } => ErrorKind::InvalidClassification,
            ValidationError::InvalidAccessType(_) => ErrorKind::InvalidAccessType,
            ValidationError::InvalidDuration(_) | ValidationError::ExpiryOverflow { .. } => {
                ErrorKind::InvalidTimestamp
            }
        }
    }
}

//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' exceeds {max} characters (got {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    /// Error code matching the validation failure kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::TooLong { .. } => ErrorCode::TooLong,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(err.code(), err.to_string()).with_detail("field", err.field())
    }
}

/// Broad classification used to pick transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Authorization,
    Infrastructure,
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    EmptyField,
    OutOfRange,
    TooLong,
    InvalidFormat,
    AnnouncementTitleTooLong,
    AnnouncementContentTooLong,
    IncorrectEventType,
    NotificationSettingsRequired,

    // Not found errors
    EventNotFound,
    CampaignNotFound,
    UserNotFound,
    AnnouncementNotFound,
    PreferenceNotFound,
    SubscriptionNotFound,

    // Conflict errors
    DuplicateKey,
    EventAlreadyFull,
    CapacityBelowParticipants,

    // Authorization errors
    Unauthorized,
    PermissionDenied,
    BoundaryViolation,

    // Infrastructure errors
    DatabaseError,
    NotificationError,
    InternalError,
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::TooLong
            | ErrorCode::InvalidFormat
            | ErrorCode::AnnouncementTitleTooLong
            | ErrorCode::AnnouncementContentTooLong
            | ErrorCode::IncorrectEventType
            | ErrorCode::NotificationSettingsRequired => ErrorCategory::Validation,

            ErrorCode::EventNotFound
            | ErrorCode::CampaignNotFound
            | ErrorCode::UserNotFound
            | ErrorCode::AnnouncementNotFound
            | ErrorCode::PreferenceNotFound
            | ErrorCode::SubscriptionNotFound => ErrorCategory::NotFound,

            ErrorCode::DuplicateKey
            | ErrorCode::EventAlreadyFull
            | ErrorCode::CapacityBelowParticipants => ErrorCategory::Conflict,

            ErrorCode::Unauthorized
            | ErrorCode::PermissionDenied
            | ErrorCode::BoundaryViolation => ErrorCategory::Authorization,

            ErrorCode::DatabaseError | ErrorCode::NotificationError | ErrorCode::InternalError => {
                ErrorCategory::Infrastructure
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::TooLong => "TOO_LONG",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::AnnouncementTitleTooLong => "ANNOUNCEMENT_TITLE_TOO_LONG",
            ErrorCode::AnnouncementContentTooLong => "ANNOUNCEMENT_CONTENT_TOO_LONG",
            ErrorCode::IncorrectEventType => "INCORRECT_EVENT_TYPE",
            ErrorCode::NotificationSettingsRequired => "NOTIFICATION_SETTINGS_REQUIRED",
            ErrorCode::EventNotFound => "EVENT_NOT_FOUND",
            ErrorCode::CampaignNotFound => "CAMPAIGN_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::AnnouncementNotFound => "ANNOUNCEMENT_NOT_FOUND",
            ErrorCode::PreferenceNotFound => "PREFERENCE_NOT_FOUND",
            ErrorCode::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            ErrorCode::DuplicateKey => "DUPLICATE_KEY",
            ErrorCode::EventAlreadyFull => "EVENT_ALREADY_FULL",
            ErrorCode::CapacityBelowParticipants => "CAPACITY_BELOW_PARTICIPANTS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::BoundaryViolation => "BOUNDARY_VIOLATION",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::NotificationError => "NOTIFICATION_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a database error, keeping the driver message for logs.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Parses a detail back into a typed value.
    pub fn detail<T: FromStr>(&self, key: &str) -> Option<T> {
        self.details.get(key).and_then(|v| v.parse().ok())
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("name");
        assert_eq!(format!("{}", err), "Field 'name' cannot be empty");
    }

    #[test]
    fn validation_error_too_long_displays_correctly() {
        let err = ValidationError::too_long("title", 100, 101);
        assert_eq!(
            format!("{}", err),
            "Field 'title' exceeds 100 characters (got 101)"
        );
    }

    #[test]
    fn validation_error_converts_with_field_detail() {
        let err: DomainError = ValidationError::out_of_range("max_attendees", 1, 10_000, 0).into();
        assert_eq!(err.code, ErrorCode::OutOfRange);
        assert_eq!(err.details.get("field"), Some(&"max_attendees".to_string()));
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::EventNotFound, "Event not found");
        assert_eq!(format!("{}", err), "[EVENT_NOT_FOUND] Event not found");
    }

    #[test]
    fn domain_error_detail_parses_typed_value() {
        let err = DomainError::new(ErrorCode::EventAlreadyFull, "full").with_detail("capacity", "12");
        assert_eq!(err.detail::<u32>("capacity"), Some(12));
        assert_eq!(err.detail::<u32>("missing"), None);
    }

    #[test]
    fn error_codes_fall_into_expected_categories() {
        assert_eq!(ErrorCode::UserNotFound.category(), ErrorCategory::NotFound);
        assert_eq!(ErrorCode::DuplicateKey.category(), ErrorCategory::Conflict);
        assert_eq!(ErrorCode::EventAlreadyFull.category(), ErrorCategory::Conflict);
        assert_eq!(ErrorCode::IncorrectEventType.category(), ErrorCategory::Validation);
        assert_eq!(ErrorCode::BoundaryViolation.category(), ErrorCategory::Authorization);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::Infrastructure);
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::EventAlreadyFull), "EVENT_ALREADY_FULL");
        assert_eq!(format!("{}", ErrorCode::InternalError), "INTERNAL_ERROR");
    }
}

//! Validation error types

use std::fmt;

use bson::oid::ObjectId;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent or empty
    Missing { field: &'static str },

    /// Field is not a valid 24-character hex ObjectId
    InvalidObjectId { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::InvalidObjectId { field, value } => {
                write!(f, "{}: '{}' is not a valid ObjectId", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Require a non-empty string field.
pub fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Missing { field }),
    }
}

/// Parse a hex ObjectId, reporting the offending field on failure.
pub fn parse_object_id(field: &'static str, value: &str) -> Result<ObjectId, ValidationError> {
    ObjectId::parse_str(value).map_err(|_| ValidationError::InvalidObjectId {
        field,
        value: value.to_owned(),
    })
}

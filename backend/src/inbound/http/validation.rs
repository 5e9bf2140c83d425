//! Shared validation helpers for inbound HTTP adapters.
//!
//! Validation failures carry a `details` object naming the offending
//! field and a short reason code so forms can annotate the exact input,
//! per the project-wide failure envelope.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation reason codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReasonCode {
    MissingField,
    InvalidUuid,
}

impl ReasonCode {
    fn as_str(self) -> &'static str {
        match self {
            ReasonCode::MissingField => "missing_field",
            ReasonCode::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn field_error(
    field: FieldName,
    message: impl Into<String>,
    reason: &str,
) -> Error {
    Error::validation(message).with_details(json!({
        "field": field.as_str(),
        "code": reason,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ReasonCode::MissingField.as_str(),
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::validation(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ReasonCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

//! Shared validation helpers for inbound HTTP adapters.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{CityId, CityValidationError, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyField,
    InvalidNumber,
    NonFiniteNumber,
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::NonFiniteNumber => "non_finite_number",
            ErrorCode::InvalidId => "invalid_id",
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

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Numeric input accepted either as a JSON number or as numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a number"))
        .with_value(ErrorCode::InvalidNumber, value)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Coerce numeric input to `f64`. Range and finiteness are checked by the
/// domain constructor.
pub(crate) fn parse_number(value: NumberInput, field: FieldName) -> Result<f64, Error> {
    match value {
        NumberInput::Number(number) => Ok(number),
        NumberInput::Text(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid_number_error(field, &raw)),
    }
}

/// Parse a path segment into a record identifier.
pub(crate) fn parse_city_id(value: String) -> Result<CityId, Error> {
    CityId::new(value.clone()).map_err(|err| {
        ValidationError::new("id", err.to_string()).with_value(ErrorCode::InvalidId, value)
    })
}

/// Map a domain validation failure to a `400` with field details.
pub(crate) fn city_validation_error(err: CityValidationError) -> Error {
    let code = match err {
        CityValidationError::EmptyId | CityValidationError::InvalidId => ErrorCode::InvalidId,
        CityValidationError::EmptyField { .. } => ErrorCode::EmptyField,
        CityValidationError::NonFiniteCoordinate { .. } => ErrorCode::NonFiniteNumber,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

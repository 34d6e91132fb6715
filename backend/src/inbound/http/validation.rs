//! Request validation helpers shared by the handlers.
//!
//! Every failure is an `invalid_request` whose details name the offending
//! field and a machine-readable code.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    AmountValidationError, CredentialsValidationError, Error, Price, ProjectValidationError,
    UserValidationError,
};

/// Machine-readable validation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    InvalidAmount,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
            Self::InvalidAmount => "invalid_amount",
        }
    }
}

pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {field}"),
    )
}

pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{field} must be a valid UUID"),
        )
    })
}

/// Parse an optional price bound from a query string.
pub(crate) fn parse_price_bound(value: Option<f64>, field: &str) -> Result<Option<Price>, Error> {
    value
        .map(|amount| Price::new(amount).map_err(|err| amount_error(field, err)))
        .transpose()
}

pub(crate) fn amount_error(field: &str, err: AmountValidationError) -> Error {
    field_error(field, ValidationCode::InvalidAmount, format!("{field}: {err}"))
}

pub(crate) fn project_validation_error(err: ProjectValidationError) -> Error {
    let code = match err {
        ProjectValidationError::Price(_) => ValidationCode::InvalidAmount,
        _ => ValidationCode::InvalidValue,
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    let field = match &err {
        CredentialsValidationError::EmptyPassword => "password",
        CredentialsValidationError::RoleNotSelfAssignable(_) => "role",
        CredentialsValidationError::User(
            UserValidationError::EmptyEmail | UserValidationError::InvalidEmail,
        ) => "email",
        CredentialsValidationError::User(_) => "name",
    };
    field_error(field, ValidationCode::InvalidValue, err.to_string())
}

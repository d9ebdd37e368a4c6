//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{BoundEdge, Error, parse_date, parse_date_bound};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidChoice,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidChoice => "invalid_choice",
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

fn invalid_value(field: &str, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code.as_str(),
    }))
}

/// Path of a property inside the `fields` array of a request body.
pub(crate) fn field_path(index: usize, property: &str) -> String {
    format!("fields[{index}].{property}")
}

pub(crate) fn invalid_uuid_error(field: &str, value: &str) -> Error {
    invalid_value(
        field,
        format!("{field} must be a valid UUID"),
        ErrorCode::InvalidUuid,
        value,
    )
}

pub(crate) fn invalid_date_error(field: &str, value: &str) -> Error {
    invalid_value(
        field,
        format!("{field} must be a YYYY-MM-DD date or an RFC 3339 timestamp"),
        ErrorCode::InvalidDate,
        value,
    )
}

pub(crate) fn invalid_choice_error(field: &str, value: &str, allowed: &[&str]) -> Error {
    invalid_value(
        field,
        format!("{field} must be one of: {}", allowed.join(", ")),
        ErrorCode::InvalidChoice,
        value,
    )
}

/// Parse one of the UUID-backed domain identifiers.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_uuid_error(field.as_str(), value))
}

/// Parse an optional identifier query parameter; blank counts as absent.
pub(crate) fn parse_optional_id<T: FromStr>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_id(raw, field))
        .transpose()
}

/// Parse an optional query bound, expanding bare dates to `edge` of the day.
pub(crate) fn parse_optional_bound(
    value: Option<&str>,
    field: FieldName,
    edge: BoundEdge,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            parse_date_bound(raw, edge).ok_or_else(|| invalid_date_error(field.as_str(), raw))
        })
        .transpose()
}

/// Parse an entry timestamp.
pub(crate) fn parse_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    parse_date(value.trim()).ok_or_else(|| invalid_date_error(field.as_str(), value))
}

/// Field named by a serde "missing field" or "unknown field" message.
fn offending_field(message: &str) -> Option<&str> {
    let rest = message
        .strip_prefix("missing field `")
        .or_else(|| message.strip_prefix("unknown field `"))?;
    rest.split('`').next().filter(|name| !name.is_empty())
}

fn malformed_input(kind: &str, reason: String) -> Error {
    let details = match offending_field(&reason) {
        Some(field) => json!({ "field": field, "reason": reason }),
        None => json!({ "reason": reason }),
    };
    Error::invalid_request(format!("{kind} is malformed")).with_details(details)
}

/// Render JSON body extraction failures as the `invalid_request` envelope.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let reason = match &err {
        JsonPayloadError::Deserialize(inner) => inner.to_string(),
        other => other.to_string(),
    };
    malformed_input("request body", reason).into()
}

/// Render query string extraction failures as the `invalid_request` envelope.
pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let reason = match &err {
        QueryPayloadError::Deserialize(inner) => inner.to_string(),
        other => other.to_string(),
    };
    malformed_input("query string", reason).into()
}

//! Shared validation helpers for inbound HTTP adapters.
//!
//! These cover what the extractors cannot: identifier segments, id-set
//! segments such as `(a,b)`, page parameters and null bodies. Every failure
//! is an `invalid_request` error with a `details` object naming the field.

use std::str::FromStr;

use pagination::{PageRequest, PageRequestError};
use serde_json::json;
use tracing::info;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingBody,
    InvalidUuid,
    EmptyIdList,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingBody => "missing_body",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::EmptyIdList => "empty_id_list",
            ErrorCode::InvalidPage => "invalid_page",
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

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Reject a null or empty body, logging the condition.
pub(crate) fn require_body<T>(payload: Option<T>, object: &'static str) -> Result<T, Error> {
    payload.ok_or_else(|| {
        info!(object, "request body is null");
        ValidationError::new("body", format!("{object} object is null"))
            .with_code(ErrorCode::MissingBody)
    })
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must contain valid UUIDs")).with_index(
        ErrorCode::InvalidUuid,
        index,
        value,
    )
}

/// Parse a single identifier path segment.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    T::from_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse an id-set segment, accepting `(a,b,c)` as well as `a,b,c`.
///
/// Blank entries are ignored; a segment with no ids at all is rejected.
pub(crate) fn parse_id_list<T: FromStr>(raw: &str, field: FieldName) -> Result<Vec<T>, Error> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    let ids = inner
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .enumerate()
        .map(|(index, value)| {
            T::from_str(value).map_err(|_| invalid_uuid_index_error(field, index, value))
        })
        .collect::<Result<Vec<T>, Error>>()?;

    if ids.is_empty() {
        info!(field = field.as_str(), "id collection is empty");
        return Err(
            ValidationError::new(field.as_str(), "Parameter ids is null")
                .with_code(ErrorCode::EmptyIdList),
        );
    }
    Ok(ids)
}

/// Render ids as the `(a,b,c)` segment used in collection locations.
pub(crate) fn format_id_list<T: std::fmt::Display>(ids: impl IntoIterator<Item = T>) -> String {
    let joined = ids
        .into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("({joined})")
}

/// Build a page request from optional query parameters.
pub(crate) fn parse_page(
    page_number: Option<u32>,
    page_size: Option<u32>,
) -> Result<PageRequest, Error> {
    PageRequest::from_query(page_number, page_size).map_err(|err| {
        let field = match err {
            PageRequestError::ZeroPageNumber => "pageNumber",
            PageRequestError::ZeroPageSize => "pageSize",
        };
        ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidPage)
    })
}

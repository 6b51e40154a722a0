//! Field registries mapping patch paths to typed accessors.
//!
//! Every editable type lists its client-mutable fields once, pairing the
//! path segment with a reader and a writer over JSON values. Path
//! resolution is a table lookup; nothing is discovered at runtime.

use serde_json::Value;
use thiserror::Error;

/// Raised when a JSON value cannot be stored in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected}")]
pub struct ValueTypeError {
    /// Description of the accepted value shape.
    pub expected: &'static str,
}

/// Registry entry for one editable field of `T`.
pub struct PatchField<T> {
    /// Path segment addressing the field, matched case-insensitively.
    pub name: &'static str,
    /// Reads the current field value.
    pub read: fn(&T) -> Value,
    /// Stores a value; `null` clears the field.
    pub write: fn(&mut T, Value) -> Result<(), ValueTypeError>,
}

/// Editable snapshots addressable by patch paths.
pub trait Patchable: Clone + Sized + 'static {
    /// The field registry for this type.
    fn fields() -> &'static [PatchField<Self>];

    /// Resolve a JSON pointer such as `/name` to its registry entry.
    ///
    /// Only single-segment pointers address fields; the root pointer and
    /// nested pointers never resolve.
    fn resolve(path: &str) -> Option<&'static PatchField<Self>> {
        let segment = path.strip_prefix('/')?;
        if segment.is_empty() || segment.contains('/') {
            return None;
        }
        let segment = segment.replace("~1", "/").replace("~0", "~");
        Self::fields()
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(&segment))
    }
}

/// Project an optional string field into a JSON value.
pub fn text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

/// Project an optional integer field into a JSON value.
pub fn integer_value(value: Option<i32>) -> Value {
    value.map_or(Value::Null, Value::from)
}

/// Interpret a JSON value as an optional string.
pub fn parse_text(value: Value) -> Result<Option<String>, ValueTypeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        _ => Err(ValueTypeError {
            expected: "a string or null",
        }),
    }
}

/// Interpret a JSON value as an optional 32-bit integer.
///
/// Numeric strings are accepted so form-encoded clients can patch numbers.
pub fn parse_integer(value: Value) -> Result<Option<i32>, ValueTypeError> {
    const EXPECTED: ValueTypeError = ValueTypeError {
        expected: "a 32-bit integer or null",
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or(EXPECTED),
        Value::String(text) => text.trim().parse::<i32>().map(Some).map_err(|_| EXPECTED),
        _ => Err(EXPECTED),
    }
}

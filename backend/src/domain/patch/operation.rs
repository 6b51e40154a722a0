//! JSON Patch operation documents.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The six JSON Patch operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Set the value at `path`.
    Add,
    /// Clear the value at `path`.
    Remove,
    /// Overwrite the value at `path`.
    Replace,
    /// Transfer the value at `from` to `path`, clearing `from`.
    Move,
    /// Duplicate the value at `from` into `path`.
    Copy,
    /// Assert the value at `path` equals `value`.
    Test,
}

impl OperationKind {
    /// Wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation in a patch document.
///
/// An explicit `"value": null` is kept as `Some(Value::Null)` so it can be
/// told apart from an omitted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation kind.
    pub op: OperationKind,
    /// Target JSON pointer.
    pub path: String,
    /// Source pointer for `move` and `copy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Operand for `add`, `replace` and `test`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl PatchOperation {
    fn build(op: OperationKind, path: &str, from: Option<&str>, value: Option<Value>) -> Self {
        Self {
            op,
            path: path.to_owned(),
            from: from.map(str::to_owned),
            value,
        }
    }

    /// `add` operation.
    pub fn add(path: &str, value: Value) -> Self {
        Self::build(OperationKind::Add, path, None, Some(value))
    }

    /// `remove` operation.
    pub fn remove(path: &str) -> Self {
        Self::build(OperationKind::Remove, path, None, None)
    }

    /// `replace` operation.
    ///
    /// # Examples
    /// ```
    /// use company_registry::domain::patch::{OperationKind, PatchOperation};
    /// use serde_json::json;
    ///
    /// let op = PatchOperation::replace("/name", json!("Acme Corp"));
    /// assert_eq!(op.op, OperationKind::Replace);
    /// assert_eq!(
    ///     serde_json::to_value(&op).expect("serialises"),
    ///     json!({ "op": "replace", "path": "/name", "value": "Acme Corp" })
    /// );
    /// ```
    pub fn replace(path: &str, value: Value) -> Self {
        Self::build(OperationKind::Replace, path, None, Some(value))
    }

    /// `move` operation.
    pub fn move_from(from: &str, path: &str) -> Self {
        Self::build(OperationKind::Move, path, Some(from), None)
    }

    /// `copy` operation.
    pub fn copy_from(from: &str, path: &str) -> Self {
        Self::build(OperationKind::Copy, path, Some(from), None)
    }

    /// `test` operation.
    pub fn test(path: &str, value: Value) -> Self {
        Self::build(OperationKind::Test, path, None, Some(value))
    }
}

/// An ordered list of patch operations, serialised as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(Vec<PatchOperation>);

impl PatchDocument {
    /// Wrap a list of operations.
    #[must_use]
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self(operations)
    }

    /// Operations in application order.
    #[must_use]
    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    /// Whether the document holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PatchOperation>> for PatchDocument {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self(operations)
    }
}

impl FromIterator<PatchOperation> for PatchDocument {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

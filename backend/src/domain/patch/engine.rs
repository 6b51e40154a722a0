//! Applies patch documents to editable snapshots.
//!
//! Operations run against a clone of the editable projection. The entity is
//! only touched once every operation succeeded and the patched snapshot
//! passes validation, so a failing document never leaves partial state.

use std::cmp::Ordering;

use serde_json::Value;
use thiserror::Error;

use super::operation::{OperationKind, PatchOperation};
use super::registry::{PatchField, Patchable};
use crate::domain::validation::{Constrained, ValidationErrors, validate};

/// Reasons a single operation could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatchError {
    /// The path does not address an editable field.
    #[error("operation {index} ({op}): path '{path}' does not address an editable field")]
    UnresolvablePath {
        /// Position of the failing operation.
        index: usize,
        /// Kind of the failing operation.
        op: OperationKind,
        /// The offending pointer.
        path: String,
    },
    /// A `move` or `copy` omitted its source pointer.
    #[error("operation {index} ({op}): 'from' is required")]
    MissingFrom {
        /// Position of the failing operation.
        index: usize,
        /// Kind of the failing operation.
        op: OperationKind,
    },
    /// An `add`, `replace` or `test` omitted its value.
    #[error("operation {index} ({op}): 'value' is required")]
    MissingValue {
        /// Position of the failing operation.
        index: usize,
        /// Kind of the failing operation.
        op: OperationKind,
    },
    /// A `test` operation found a different value.
    #[error("operation {index} (test): value at '{path}' is {actual}, expected {expected}")]
    TestFailed {
        /// Position of the failing operation.
        index: usize,
        /// Pointer that was compared.
        path: String,
        /// Value the document asserted.
        expected: Value,
        /// Value found in the snapshot.
        actual: Value,
    },
    /// The value cannot be stored in the addressed field.
    #[error("operation {index} ({op}): value for '{path}' must be {expected}")]
    InvalidValue {
        /// Position of the failing operation.
        index: usize,
        /// Kind of the failing operation.
        op: OperationKind,
        /// Pointer that was written.
        path: String,
        /// Accepted value shape.
        expected: &'static str,
    },
}

impl PatchError {
    /// Position of the failing operation within the document.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::UnresolvablePath { index, .. }
            | Self::MissingFrom { index, .. }
            | Self::MissingValue { index, .. }
            | Self::TestFailed { index, .. }
            | Self::InvalidValue { index, .. } => *index,
        }
    }
}

/// A patch that failed to apply or produced an invalid snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatchFailure {
    /// An operation could not be applied.
    #[error(transparent)]
    Patch(#[from] PatchError),
    /// The patched snapshot violates field constraints.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Entities exposing an editable projection for partial updates.
pub trait EditableProjection {
    /// The client-mutable subset of the entity.
    type Editable: Patchable + Constrained;

    /// Snapshot the editable fields.
    fn project(&self) -> Self::Editable;

    /// Write an editable snapshot back onto the entity.
    fn merge(&mut self, editable: &Self::Editable);
}

/// Apply `operations` in order to a copy of `target`.
///
/// The first failing operation aborts the whole document; `target` is never
/// modified.
pub fn apply_operations<T: Patchable>(
    target: &T,
    operations: &[PatchOperation],
) -> Result<T, PatchError> {
    let mut snapshot = target.clone();
    for (index, operation) in operations.iter().enumerate() {
        apply_operation(&mut snapshot, index, operation)?;
    }
    Ok(snapshot)
}

/// Patch an entity through its editable projection.
///
/// Projects `entity`, applies `operations`, validates the result and merges
/// it back. On any failure the entity is left untouched.
///
/// # Examples
/// ```
/// use company_registry::domain::Company;
/// use company_registry::domain::patch::{PatchOperation, apply_patch};
/// use serde_json::json;
///
/// let mut company = Company::new("Acme", "1 Road Runner Way", "USA");
/// apply_patch(&mut company, &[PatchOperation::replace("/name", json!("Acme Corp"))])
///     .expect("valid patch");
/// assert_eq!(company.name, "Acme Corp");
/// ```
pub fn apply_patch<E: EditableProjection>(
    entity: &mut E,
    operations: &[PatchOperation],
) -> Result<E::Editable, PatchFailure> {
    let patched = apply_operations(&entity.project(), operations)?;
    validate(&patched)?;
    entity.merge(&patched);
    Ok(patched)
}

fn apply_operation<T: Patchable>(
    snapshot: &mut T,
    index: usize,
    operation: &PatchOperation,
) -> Result<(), PatchError> {
    let op = operation.op;
    let target = resolve::<T>(index, op, &operation.path)?;
    let operand = || {
        operation
            .value
            .clone()
            .ok_or(PatchError::MissingValue { index, op })
    };

    match op {
        OperationKind::Add | OperationKind::Replace => {
            write(snapshot, target, index, op, operand()?)
        }
        OperationKind::Remove => write(snapshot, target, index, op, Value::Null),
        OperationKind::Move => {
            let source = resolve_from::<T>(index, op, operation.from.as_deref())?;
            let moved = (source.read)(snapshot);
            write(snapshot, source, index, op, Value::Null)?;
            write(snapshot, target, index, op, moved)
        }
        OperationKind::Copy => {
            let source = resolve_from::<T>(index, op, operation.from.as_deref())?;
            let copied = (source.read)(snapshot);
            write(snapshot, target, index, op, copied)
        }
        OperationKind::Test => {
            let actual = (target.read)(snapshot);
            let expected = operand()?;
            if json_equal(&actual, &expected) {
                Ok(())
            } else {
                Err(PatchError::TestFailed {
                    index,
                    path: operation.path.clone(),
                    expected,
                    actual,
                })
            }
        }
    }
}

/// Value equality for `test`: numbers compare by numeric value, so `40` and
/// `40.0` match.
fn json_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) if !(l.is_f64() || r.is_f64()) => l == r,
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l.partial_cmp(&r) == Some(Ordering::Equal),
            _ => false,
        },
        _ => left == right,
    }
}

fn resolve<T: Patchable>(
    index: usize,
    op: OperationKind,
    path: &str,
) -> Result<&'static PatchField<T>, PatchError> {
    T::resolve(path).ok_or_else(|| PatchError::UnresolvablePath {
        index,
        op,
        path: path.to_owned(),
    })
}

fn resolve_from<T: Patchable>(
    index: usize,
    op: OperationKind,
    from: Option<&str>,
) -> Result<&'static PatchField<T>, PatchError> {
    let from = from.ok_or(PatchError::MissingFrom { index, op })?;
    resolve(index, op, from)
}

fn write<T>(
    snapshot: &mut T,
    field: &PatchField<T>,
    index: usize,
    op: OperationKind,
    value: Value,
) -> Result<(), PatchError> {
    (field.write)(snapshot, value).map_err(|err| PatchError::InvalidValue {
        index,
        op,
        path: format!("/{}", field.name),
        expected: err.expected,
    })
}

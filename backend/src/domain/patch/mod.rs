//! Partial updates expressed as JSON Patch documents.
//!
//! Paths address a single field of an entity's editable projection, for
//! example `/name`. Segments match case-insensitively. `add` and `replace`
//! both overwrite; `remove` clears the field to `null`, which validation
//! then rejects for required fields.

mod engine;
mod operation;
mod registry;

pub use engine::{EditableProjection, PatchError, PatchFailure, apply_operations, apply_patch};
pub use operation::{OperationKind, PatchDocument, PatchOperation};
pub use registry::{
    PatchField, Patchable, ValueTypeError, integer_value, parse_integer, parse_text, text_value,
};

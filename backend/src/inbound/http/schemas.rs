//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed: bad ids, null body, bad page parameters.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource, or one of a set of resources, does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The payload or the patched entity violates a constraint.
    #[schema(rename = "unprocessable_entity")]
    UnprocessableEntity,
    /// The store rejected the commit because of a concurrent change.
    #[schema(rename = "conflict")]
    Conflict,
    /// The store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Company with id: 3fa85f64-5717-4562-b3fc-2c963f66afa6 doesn't exist in the database.")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "4a4c5f2e-8f6e-4d55-9c4b-0f7b4c1f8d21")]
    trace_id: Option<String>,
    /// Supplementary error details such as the violation list.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::patch::OperationKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::patch::OperationKind)]
pub enum OperationKindSchema {
    /// Set the target field.
    #[schema(rename = "add")]
    Add,
    /// Clear the target field.
    #[schema(rename = "remove")]
    Remove,
    /// Set the target field.
    #[schema(rename = "replace")]
    Replace,
    /// Move a value from `from` to `path`, clearing `from`.
    #[schema(rename = "move")]
    Move,
    /// Copy a value from `from` to `path`.
    #[schema(rename = "copy")]
    Copy,
    /// Abort the document unless the field equals `value`.
    #[schema(rename = "test")]
    Test,
}

/// OpenAPI schema for [`crate::domain::patch::PatchOperation`].
#[derive(ToSchema)]
#[schema(as = crate::domain::patch::PatchOperation)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PatchOperationSchema {
    /// Operation to perform.
    op: OperationKindSchema,
    /// Field pointer such as `/name`, matched case-insensitively.
    #[schema(example = "/name")]
    path: String,
    /// Source pointer for `move` and `copy`.
    from: Option<String>,
    /// Operand for `add`, `replace` and `test`.
    #[schema(example = "Acme Corp")]
    value: Option<serde_json::Value>,
}

//! Domain primitives, aggregates and services.
//!
//! Purpose: model companies and their employees, stage changes through a
//! request-scoped unit of work, and apply partial updates through editable
//! projections. Nothing here knows about HTTP.
//!
//! Public surface:
//! - `Company`, `Employee` and their identifiers: the stored aggregates.
//! - `EditableCompany`, `EditableEmployee`, `CompanyDraft`: client payloads.
//! - `Error` / `ErrorCode`: transport-agnostic failures.
//! - `CompanyService`, `EmployeeService`: driving port implementations.

pub mod company;
pub mod company_service;
pub mod context;
pub mod employee;
pub mod employee_service;
pub mod error;
pub mod patch;
pub mod ports;
pub mod service_errors;
pub mod trace_id;
pub mod unit_of_work;
pub mod validation;

pub use self::company::{Company, CompanyDraft, CompanyId, EditableCompany};
pub use self::company_service::CompanyService;
pub use self::context::RequestContext;
pub use self::employee::{EditableEmployee, Employee, EmployeeId, MIN_EMPLOYEE_AGE};
pub use self::employee_service::EmployeeService;
pub use self::error::{Error, ErrorCode};
pub use self::patch::EditableProjection;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use company_registry::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

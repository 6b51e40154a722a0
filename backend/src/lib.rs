//! Company registry backend library.
//!
//! Companies and their employees are stored behind an [`EntityStore`]
//! port, mutated through a request-scoped unit of work and exposed over a
//! REST API with JSON Patch partial updates.
//!
//! [`EntityStore`]: domain::ports::EntityStore

pub mod demo_data;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

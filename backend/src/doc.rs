//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every company and employee endpoint from the inbound layer
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`],
//!   [`PatchOperationSchema`]) that provide OpenAPI definitions without
//!   coupling domain types to the utoipa framework, plus the request and
//!   response DTOs
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::dto::{
    CompanyRequest, CompanyResponse, EmployeeRequest, EmployeeResponse,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, OperationKindSchema, PatchOperationSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Company registry API",
        description = "Companies and their employees, with JSON Patch partial updates."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::companies::list_companies,
        crate::inbound::http::companies::get_company,
        crate::inbound::http::companies::get_company_collection,
        crate::inbound::http::companies::create_company,
        crate::inbound::http::companies::create_company_collection,
        crate::inbound::http::companies::update_company,
        crate::inbound::http::companies::patch_company,
        crate::inbound::http::companies::delete_company,
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::get_employee,
        crate::inbound::http::employees::get_employee_collection,
        crate::inbound::http::employees::create_employee,
        crate::inbound::http::employees::create_employee_collection,
        crate::inbound::http::employees::update_employee,
        crate::inbound::http::employees::patch_employee,
        crate::inbound::http::employees::delete_employee,
    ),
    components(schemas(
        CompanyRequest,
        CompanyResponse,
        EmployeeRequest,
        EmployeeResponse,
        ErrorSchema,
        ErrorCodeSchema,
        OperationKindSchema,
        PatchOperationSchema
    )),
    tags(
        (name = "companies", description = "Operations on companies"),
        (name = "employees", description = "Operations on a company's employees")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure and path registration.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const PATCH_SCHEMA_NAME: &str = "crate.domain.patch.PatchOperation";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    fn openapi_patch_schema_has_operation_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let patch_schema = schemas.get(PATCH_SCHEMA_NAME).expect("PatchOperation schema");

        for field in ["op", "path", "from", "value"] {
            assert_object_schema_has_field(patch_schema, field);
        }
    }

    #[rstest]
    #[case("/api/companies")]
    #[case("/api/companies/{companyId}")]
    #[case("/api/companies/collection/{ids}")]
    #[case("/api/companies/{companyId}/employees")]
    #[case("/api/companies/{companyId}/employees/{id}")]
    #[case("/api/companies/{companyId}/employees/collection/{ids}")]
    fn openapi_registers_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}

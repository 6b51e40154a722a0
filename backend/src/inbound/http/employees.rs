//! Employee HTTP handlers, nested under their company.
//!
//! ```text
//! GET    /api/companies/{companyId}/employees?pageNumber=&pageSize=
//! GET    /api/companies/{companyId}/employees/{id}
//! GET    /api/companies/{companyId}/employees/collection/({id},{id},...)
//! POST   /api/companies/{companyId}/employees
//! POST   /api/companies/{companyId}/employees/collection
//! PUT    /api/companies/{companyId}/employees/{id}
//! PATCH  /api/companies/{companyId}/employees/{id}
//! DELETE /api/companies/{companyId}/employees/{id}
//! ```
//!
//! The company is resolved before the employee, so an unknown company is
//! always reported as such.

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;
use tracing::error;
use utoipa::IntoParams;

use crate::domain::patch::PatchDocument;
use crate::domain::{CompanyId, EditableEmployee, EmployeeId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{EmployeeRequest, EmployeeResponse};
use crate::inbound::http::schemas::{ErrorSchema, PatchOperationSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, format_id_list, parse_id, parse_id_list, parse_page, require_body,
};

/// Response header carrying page metadata as JSON.
pub const PAGINATION_HEADER: &str = "X-Pagination";

const COMPANY_ID: FieldName = FieldName::new("companyId");
const EMPLOYEE_ID: FieldName = FieldName::new("id");
const IDS: FieldName = FieldName::new("ids");

/// Paging parameters for employee lists.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeePageQuery {
    /// One-based page number; defaults to 1.
    pub page_number: Option<u32>,
    /// Page size; defaults to 10 and is clamped to 50.
    pub page_size: Option<u32>,
}

fn parse_path(path: &(String, String)) -> Result<(CompanyId, EmployeeId), Error> {
    Ok((parse_id(&path.0, COMPANY_ID)?, parse_id(&path.1, EMPLOYEE_ID)?))
}

fn employees_root(company_id: CompanyId) -> String {
    format!("/api/companies/{company_id}/employees")
}

/// List a company's employees one page at a time.
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/employees",
    params(
        ("companyId" = String, Path, description = "Company UUID"),
        EmployeePageQuery
    ),
    responses(
        (
            status = 200,
            description = "Employees on the requested page",
            headers(("X-Pagination" = String, description = "Page metadata as JSON")),
            body = [EmployeeResponse]
        ),
        (status = 400, description = "Malformed identifier or page parameters", body = ErrorSchema),
        (status = 404, description = "Unknown company", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/companies/{company_id}/employees")]
pub async fn list_employees(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<EmployeePageQuery>,
) -> ApiResult<HttpResponse> {
    let company_id = parse_id(&path, COMPANY_ID)?;
    let EmployeePageQuery {
        page_number,
        page_size,
    } = query.into_inner();
    let request = parse_page(page_number, page_size)?;

    let page = state.employees.list(company_id, request).await?;
    let (items, metadata) = page.into_parts();
    let header = metadata.to_header_value().map_err(|err| {
        error!(error = %err, "failed to serialise page metadata");
        Error::internal("failed to serialise page metadata")
    })?;
    let body: Vec<EmployeeResponse> = items.into_iter().map(EmployeeResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header((PAGINATION_HEADER, header))
        .json(body))
}

/// Fetch one employee of a company.
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/employees/{id}",
    params(
        ("companyId" = String, Path, description = "Company UUID"),
        ("id" = String, Path, description = "Employee UUID")
    ),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company or employee", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
#[get("/companies/{company_id}/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let (company_id, id) = parse_path(&path)?;
    let employee = state.employees.get(company_id, id).await?;
    Ok(web::Json(EmployeeResponse::from(employee)))
}

/// Fetch a set of a company's employees; every id must resolve.
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/employees/collection/{ids}",
    params(
        ("companyId" = String, Path, description = "Company UUID"),
        ("ids" = String, Path, description = "Parenthesised, comma-separated UUIDs")
    ),
    responses(
        (status = 200, description = "Employees in request order", body = [EmployeeResponse]),
        (status = 400, description = "Empty or malformed id list", body = ErrorSchema),
        (status = 404, description = "Unknown company or some ids did not resolve", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployeeCollection"
)]
#[get("/companies/{company_id}/employees/collection/{ids}")]
pub async fn get_employee_collection(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<EmployeeResponse>>> {
    let company_id = parse_id(&path.0, COMPANY_ID)?;
    let ids = parse_id_list(&path.1, IDS)?;
    let employees = state.employees.get_many(company_id, ids).await?;
    Ok(web::Json(
        employees.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

/// Hire an employee into a company.
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/employees",
    params(("companyId" = String, Path, description = "Company UUID")),
    request_body = EmployeeRequest,
    responses(
        (
            status = 201,
            description = "Employee created",
            headers(("Location" = String, description = "URI of the new employee")),
            body = EmployeeResponse
        ),
        (status = 400, description = "Null body or malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/companies/{company_id}/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Option<EmployeeRequest>>,
) -> ApiResult<HttpResponse> {
    let company_id = parse_id(&path, COMPANY_ID)?;
    let request = require_body(payload.into_inner(), "EmployeeForCreationDto")?;
    let employee = state
        .employee_commands
        .create(company_id, EditableEmployee::from(request))
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((
            LOCATION,
            format!("{}/{}", employees_root(company_id), employee.id()),
        ))
        .json(EmployeeResponse::from(employee)))
}

/// Hire several employees into a company in one commit.
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/employees/collection",
    params(("companyId" = String, Path, description = "Company UUID")),
    request_body = [EmployeeRequest],
    responses(
        (
            status = 201,
            description = "Employees created",
            headers(("Location" = String, description = "URI of the created collection")),
            body = [EmployeeResponse]
        ),
        (status = 400, description = "Null or empty collection", body = ErrorSchema),
        (status = 404, description = "Unknown company", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "createEmployeeCollection"
)]
#[post("/companies/{company_id}/employees/collection")]
pub async fn create_employee_collection(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Option<Vec<EmployeeRequest>>>,
) -> ApiResult<HttpResponse> {
    let company_id = parse_id(&path, COMPANY_ID)?;
    let requests = require_body(payload.into_inner(), "Employee collection")?;
    let payloads = requests.into_iter().map(EditableEmployee::from).collect();
    let employees = state
        .employee_commands
        .create_many(company_id, payloads)
        .await?;
    let location = format!(
        "{}/collection/{}",
        employees_root(company_id),
        format_id_list(employees.iter().map(|employee| employee.id()))
    );
    let body: Vec<EmployeeResponse> = employees.into_iter().map(EmployeeResponse::from).collect();
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, location))
        .json(body))
}

/// Replace an employee's fields.
#[utoipa::path(
    put,
    path = "/api/companies/{companyId}/employees/{id}",
    params(
        ("companyId" = String, Path, description = "Company UUID"),
        ("id" = String, Path, description = "Employee UUID")
    ),
    request_body = EmployeeRequest,
    responses(
        (status = 204, description = "Employee updated"),
        (status = 400, description = "Null body or malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company or employee", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
#[put("/companies/{company_id}/employees/{id}")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<Option<EmployeeRequest>>,
) -> ApiResult<HttpResponse> {
    let (company_id, id) = parse_path(&path)?;
    let request = require_body(payload.into_inner(), "EmployeeForUpdateDto")?;
    state
        .employee_commands
        .replace(company_id, id, EditableEmployee::from(request))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Apply a JSON Patch document to an employee.
#[utoipa::path(
    patch,
    path = "/api/companies/{companyId}/employees/{id}",
    params(
        ("companyId" = String, Path, description = "Company UUID"),
        ("id" = String, Path, description = "Employee UUID")
    ),
    request_body(content = [PatchOperationSchema], content_type = "application/json-patch+json"),
    responses(
        (status = 204, description = "Employee patched"),
        (status = 400, description = "Null document or malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company or employee", body = ErrorSchema),
        (status = 422, description = "Patch or validation failed", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "patchEmployee"
)]
#[patch("/companies/{company_id}/employees/{id}")]
pub async fn patch_employee(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<Option<PatchDocument>>,
) -> ApiResult<HttpResponse> {
    let (company_id, id) = parse_path(&path)?;
    let document = require_body(payload.into_inner(), "patchDoc")?;
    state
        .employee_commands
        .patch(company_id, id, document)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove an employee from a company.
#[utoipa::path(
    delete,
    path = "/api/companies/{companyId}/employees/{id}",
    params(
        ("companyId" = String, Path, description = "Company UUID"),
        ("id" = String, Path, description = "Employee UUID")
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company or employee", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/companies/{company_id}/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (company_id, id) = parse_path(&path)?;
    state.employee_commands.delete(company_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "employees_tests.rs"]
mod tests;

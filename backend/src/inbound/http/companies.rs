//! Company HTTP handlers.
//!
//! ```text
//! GET    /api/companies
//! GET    /api/companies/{companyId}
//! GET    /api/companies/collection/({id},{id},...)
//! POST   /api/companies
//! POST   /api/companies/collection
//! PUT    /api/companies/{companyId}
//! PATCH  /api/companies/{companyId}
//! DELETE /api/companies/{companyId}
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};

use crate::domain::patch::PatchDocument;
use crate::domain::{CompanyDraft, CompanyId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CompanyRequest, CompanyResponse};
use crate::inbound::http::schemas::{ErrorSchema, PatchOperationSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, format_id_list, parse_id, parse_id_list, require_body,
};

const COMPANY_ID: FieldName = FieldName::new("companyId");
const IDS: FieldName = FieldName::new("ids");

fn company_location(id: CompanyId) -> String {
    format!("/api/companies/{id}")
}

/// List every company ordered by name.
#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "Companies", body = [CompanyResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "listCompanies"
)]
#[get("/companies")]
pub async fn list_companies(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CompanyResponse>>> {
    let companies = state.companies.list().await?;
    Ok(web::Json(
        companies.into_iter().map(CompanyResponse::from).collect(),
    ))
}

/// Fetch a single company.
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}",
    params(("companyId" = String, Path, description = "Company UUID")),
    responses(
        (status = 200, description = "Company", body = CompanyResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "getCompany"
)]
#[get("/companies/{company_id}")]
pub async fn get_company(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CompanyResponse>> {
    let id = parse_id(&path, COMPANY_ID)?;
    let company = state.companies.get(id).await?;
    Ok(web::Json(CompanyResponse::from(company)))
}

/// Fetch a set of companies; every id must resolve.
#[utoipa::path(
    get,
    path = "/api/companies/collection/{ids}",
    params(("ids" = String, Path, description = "Parenthesised, comma-separated UUIDs")),
    responses(
        (status = 200, description = "Companies in request order", body = [CompanyResponse]),
        (status = 400, description = "Empty or malformed id list", body = ErrorSchema),
        (status = 404, description = "Some ids did not resolve", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "getCompanyCollection"
)]
#[get("/companies/collection/{ids}")]
pub async fn get_company_collection(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CompanyResponse>>> {
    let ids = parse_id_list(&path, IDS)?;
    let companies = state.companies.get_many(ids).await?;
    Ok(web::Json(
        companies.into_iter().map(CompanyResponse::from).collect(),
    ))
}

/// Create a company, optionally with employees.
#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CompanyRequest,
    responses(
        (
            status = 201,
            description = "Company created",
            headers(("Location" = String, description = "URI of the new company")),
            body = CompanyResponse
        ),
        (status = 400, description = "Null or malformed body", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "createCompany"
)]
#[post("/companies")]
pub async fn create_company(
    state: web::Data<HttpState>,
    payload: web::Json<Option<CompanyRequest>>,
) -> ApiResult<HttpResponse> {
    let request = require_body(payload.into_inner(), "CompanyForCreationDto")?;
    let company = state
        .company_commands
        .create(CompanyDraft::from(request))
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, company_location(company.id())))
        .json(CompanyResponse::from(company)))
}

/// Create several companies in one commit.
#[utoipa::path(
    post,
    path = "/api/companies/collection",
    request_body = [CompanyRequest],
    responses(
        (
            status = 201,
            description = "Companies created",
            headers(("Location" = String, description = "URI of the created collection")),
            body = [CompanyResponse]
        ),
        (status = 400, description = "Null or empty collection", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "createCompanyCollection"
)]
#[post("/companies/collection")]
pub async fn create_company_collection(
    state: web::Data<HttpState>,
    payload: web::Json<Option<Vec<CompanyRequest>>>,
) -> ApiResult<HttpResponse> {
    let requests = require_body(payload.into_inner(), "Company collection")?;
    let drafts = requests.into_iter().map(CompanyDraft::from).collect();
    let companies = state.company_commands.create_many(drafts).await?;
    let location = format!(
        "/api/companies/collection/{}",
        format_id_list(companies.iter().map(|company| company.id()))
    );
    let body: Vec<CompanyResponse> = companies.into_iter().map(CompanyResponse::from).collect();
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, location))
        .json(body))
}

/// Replace a company's fields; listed employees are added to it.
#[utoipa::path(
    put,
    path = "/api/companies/{companyId}",
    params(("companyId" = String, Path, description = "Company UUID")),
    request_body = CompanyRequest,
    responses(
        (status = 204, description = "Company updated"),
        (status = 400, description = "Null body or malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "updateCompany"
)]
#[put("/companies/{company_id}")]
pub async fn update_company(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Option<CompanyRequest>>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, COMPANY_ID)?;
    let request = require_body(payload.into_inner(), "CompanyForUpdateDto")?;
    state
        .company_commands
        .replace(id, CompanyDraft::from(request))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Apply a JSON Patch document to a company.
#[utoipa::path(
    patch,
    path = "/api/companies/{companyId}",
    params(("companyId" = String, Path, description = "Company UUID")),
    request_body(content = [PatchOperationSchema], content_type = "application/json-patch+json"),
    responses(
        (status = 204, description = "Company patched"),
        (status = 400, description = "Null document or malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company", body = ErrorSchema),
        (status = 422, description = "Patch or validation failed", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "patchCompany"
)]
#[patch("/companies/{company_id}")]
pub async fn patch_company(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Option<PatchDocument>>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, COMPANY_ID)?;
    let document = require_body(payload.into_inner(), "patchDoc")?;
    state.company_commands.patch(id, document).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a company together with its employees.
#[utoipa::path(
    delete,
    path = "/api/companies/{companyId}",
    params(("companyId" = String, Path, description = "Company UUID")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown company", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "deleteCompany"
)]
#[delete("/companies/{company_id}")]
pub async fn delete_company(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, COMPANY_ID)?;
    state.company_commands.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "companies_tests.rs"]
mod tests;

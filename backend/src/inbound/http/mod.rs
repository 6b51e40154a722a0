//! HTTP inbound adapter exposing REST endpoints.

pub mod companies;
pub mod dto;
pub mod employees;
pub mod error;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every company and employee route on `cfg`.
///
/// Mount it under the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(companies::list_companies)
        .service(companies::get_company_collection)
        .service(companies::get_company)
        .service(companies::create_company_collection)
        .service(companies::create_company)
        .service(companies::update_company)
        .service(companies::patch_company)
        .service(companies::delete_company)
        .service(employees::list_employees)
        .service(employees::get_employee_collection)
        .service(employees::get_employee)
        .service(employees::create_employee_collection)
        .service(employees::create_employee)
        .service(employees::update_employee)
        .service(employees::patch_employee)
        .service(employees::delete_employee);
}

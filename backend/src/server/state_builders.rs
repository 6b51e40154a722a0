//! Builders wiring the domain services into HTTP state.

use std::sync::Arc;

use actix_web::web;

use company_registry::domain::ports::EntityStore;
use company_registry::domain::{CompanyService, EmployeeService};
use company_registry::inbound::http::state::HttpState;

/// Build handler state with both services sharing one store.
pub(crate) fn build_http_state<S>(store: &Arc<S>) -> web::Data<HttpState>
where
    S: EntityStore + 'static,
{
    let companies = Arc::new(CompanyService::new(Arc::clone(store)));
    let employees = Arc::new(EmployeeService::new(Arc::clone(store)));
    web::Data::new(HttpState::new(
        companies.clone(),
        companies,
        employees.clone(),
        employees,
    ))
}

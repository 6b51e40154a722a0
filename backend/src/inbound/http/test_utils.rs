//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockCompanyCommand, MockCompanyQuery, MockEmployeeCommand, MockEmployeeQuery,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{configure, error};

/// Mock driving ports, configured per test before building the app.
#[derive(Default)]
pub struct MockPorts {
    pub companies: MockCompanyQuery,
    pub company_commands: MockCompanyCommand,
    pub employees: MockEmployeeQuery,
    pub employee_commands: MockEmployeeCommand,
}

impl MockPorts {
    /// Freeze the expectations into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.companies),
            Arc::new(self.company_commands),
            Arc::new(self.employees),
            Arc::new(self.employee_commands),
        )
    }
}

/// Build an app serving every API route over the given state.
///
/// - Registers the JSON, path and query extractor configurations used in
///   production so malformed requests produce the same envelopes.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(error::json_config())
        .app_data(error::path_config())
        .app_data(error::query_config())
        .service(web::scope("/api").configure(configure))
}

//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CompanyCommand, CompanyQuery, EmployeeCommand, EmployeeQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub companies: Arc<dyn CompanyQuery>,
    pub company_commands: Arc<dyn CompanyCommand>,
    pub employees: Arc<dyn EmployeeQuery>,
    pub employee_commands: Arc<dyn EmployeeCommand>,
}

impl HttpState {
    /// Construct state from the four driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use company_registry::domain::{CompanyService, EmployeeService};
    /// use company_registry::inbound::http::state::HttpState;
    /// use company_registry::outbound::memory::InMemoryEntityStore;
    ///
    /// let store = Arc::new(InMemoryEntityStore::new());
    /// let companies = Arc::new(CompanyService::new(store.clone()));
    /// let employees = Arc::new(EmployeeService::new(store));
    /// let state = HttpState::new(
    ///     companies.clone(),
    ///     companies,
    ///     employees.clone(),
    ///     employees,
    /// );
    /// let _query = state.companies.clone();
    /// ```
    pub fn new(
        companies: Arc<dyn CompanyQuery>,
        company_commands: Arc<dyn CompanyCommand>,
        employees: Arc<dyn EmployeeQuery>,
        employee_commands: Arc<dyn EmployeeCommand>,
    ) -> Self {
        Self {
            companies,
            company_commands,
            employees,
            employee_commands,
        }
    }
}

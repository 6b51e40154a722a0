//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod company_command;
mod company_query;
mod employee_command;
mod employee_query;
mod entity_store;

#[cfg(test)]
pub use company_command::MockCompanyCommand;
pub use company_command::CompanyCommand;
#[cfg(test)]
pub use company_query::MockCompanyQuery;
pub use company_query::CompanyQuery;
#[cfg(test)]
pub use employee_command::MockEmployeeCommand;
pub use employee_command::EmployeeCommand;
#[cfg(test)]
pub use employee_query::MockEmployeeQuery;
pub use employee_query::EmployeeQuery;
#[cfg(test)]
pub use entity_store::MockEntityStore;
pub use entity_store::{EntityStore, StoreError};

//! Driving port for employee mutations.
//!
//! Every operation first checks that the owning company exists.

use async_trait::async_trait;

use crate::domain::patch::PatchDocument;
use crate::domain::{CompanyId, EditableEmployee, Employee, EmployeeId, Error};

/// Domain use-case port for employee mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeCommand: Send + Sync {
    /// Create an employee under a company.
    async fn create(
        &self,
        company_id: CompanyId,
        payload: EditableEmployee,
    ) -> Result<Employee, Error>;

    /// Create several employees under a company in a single commit.
    async fn create_many(
        &self,
        company_id: CompanyId,
        payloads: Vec<EditableEmployee>,
    ) -> Result<Vec<Employee>, Error>;

    /// Overwrite the editable fields of an employee.
    async fn replace(
        &self,
        company_id: CompanyId,
        id: EmployeeId,
        payload: EditableEmployee,
    ) -> Result<(), Error>;

    /// Apply a patch document to an employee.
    async fn patch(
        &self,
        company_id: CompanyId,
        id: EmployeeId,
        document: PatchDocument,
    ) -> Result<(), Error>;

    /// Delete an employee.
    async fn delete(&self, company_id: CompanyId, id: EmployeeId) -> Result<(), Error>;
}

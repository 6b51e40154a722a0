//! Driving port for employee reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{CompanyId, Employee, EmployeeId, Error};

/// Domain use-case port for employee reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeQuery: Send + Sync {
    /// One page of a company's employees ordered by name.
    async fn list(&self, company_id: CompanyId, page: PageRequest)
    -> Result<Page<Employee>, Error>;

    /// One employee of a company.
    async fn get(&self, company_id: CompanyId, id: EmployeeId) -> Result<Employee, Error>;

    /// Every employee of a company in `ids`, in request order.
    ///
    /// Fails with a not-found error unless every id resolves.
    async fn get_many(
        &self,
        company_id: CompanyId,
        ids: Vec<EmployeeId>,
    ) -> Result<Vec<Employee>, Error>;
}

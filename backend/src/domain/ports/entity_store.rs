//! Port for the committed entity store.
//!
//! The [`EntityStore`] trait is the read and commit surface the unit of work
//! builds on. Reads only ever observe committed state. [`EntityStore::commit`]
//! applies a whole [`ChangeSet`] or nothing.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::unit_of_work::ChangeSet;
use crate::domain::{Company, CompanyId, Employee, EmployeeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entity store adapters.
    pub enum StoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "entity store connection failed: {message}",
        /// An update or delete addressed an entity the store does not hold.
        MissingEntity { kind: String, id: String } =>
            "{kind} {id} does not exist",
        /// An update was based on a copy the store no longer holds.
        Conflict { kind: String, id: String } =>
            "{kind} {id} was modified by another commit",
        /// An insert reused an identifier already held by the store.
        DuplicateEntity { kind: String, id: String } =>
            "{kind} {id} already exists",
        /// The change set would leave a dangling reference.
        ReferentialIntegrity { message: String } =>
            "referential integrity violated: {message}",
        /// A stored field constraint would be violated.
        Constraint { message: String } =>
            "stored constraint violated: {message}",
    }
}

/// Committed storage for companies and their employees.
///
/// Lookups by id-set return only the entities found, in request order;
/// callers detect missing ids by comparing counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// All companies ordered by name.
    async fn companies(&self) -> Result<Vec<Company>, StoreError>;

    /// Fetch one company.
    async fn company(&self, id: CompanyId) -> Result<Option<Company>, StoreError>;

    /// Fetch the companies whose ids appear in `ids`.
    async fn companies_by_ids(&self, ids: &[CompanyId]) -> Result<Vec<Company>, StoreError>;

    /// Fetch one employee of a company.
    ///
    /// Returns `None` when the employee belongs to another company.
    async fn employee(
        &self,
        company_id: CompanyId,
        id: EmployeeId,
    ) -> Result<Option<Employee>, StoreError>;

    /// Fetch the employees of a company whose ids appear in `ids`.
    async fn employees_by_ids(
        &self,
        company_id: CompanyId,
        ids: &[EmployeeId],
    ) -> Result<Vec<Employee>, StoreError>;

    /// One page of a company's employees ordered by name, plus the total.
    async fn employees_for_company(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> Result<(Vec<Employee>, u64), StoreError>;

    /// Apply every change atomically.
    ///
    /// Deleting a company also deletes its employees. On error the store is
    /// unchanged.
    async fn commit(&self, changes: &ChangeSet) -> Result<(), StoreError>;
}

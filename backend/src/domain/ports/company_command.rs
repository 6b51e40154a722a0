//! Driving port for company mutations.
//!
//! HTTP handlers call [`CompanyCommand`] to create, replace, patch and delete
//! companies. Every call runs in its own unit of work and commits once.

use async_trait::async_trait;

use crate::domain::patch::PatchDocument;
use crate::domain::{Company, CompanyDraft, CompanyId, Error};

/// Domain use-case port for company mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyCommand: Send + Sync {
    /// Create a company together with any nested employees.
    async fn create(&self, draft: CompanyDraft) -> Result<Company, Error>;

    /// Create several companies in a single commit.
    async fn create_many(&self, drafts: Vec<CompanyDraft>) -> Result<Vec<Company>, Error>;

    /// Overwrite the editable fields of a company.
    ///
    /// Employees listed in the draft are created under the company.
    async fn replace(&self, id: CompanyId, draft: CompanyDraft) -> Result<(), Error>;

    /// Apply a patch document to a company.
    async fn patch(&self, id: CompanyId, document: PatchDocument) -> Result<(), Error>;

    /// Delete a company and, by cascade, its employees.
    async fn delete(&self, id: CompanyId) -> Result<(), Error>;
}

//! Driving port for company reads.

use async_trait::async_trait;

use crate::domain::{Company, CompanyId, Error};

/// Domain use-case port for company reads.
///
/// Reads never track entities; they only observe committed state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyQuery: Send + Sync {
    /// All companies ordered by name.
    async fn list(&self) -> Result<Vec<Company>, Error>;

    /// One company by id.
    async fn get(&self, id: CompanyId) -> Result<Company, Error>;

    /// Every company in `ids`, in request order.
    ///
    /// Fails with a not-found error unless every id resolves.
    async fn get_many(&self, ids: Vec<CompanyId>) -> Result<Vec<Company>, Error>;
}

//! Request-scoped execution context.
//!
//! A [`RequestContext`] is created per inbound request and owns that
//! request's [`UnitOfWork`]. Services pass it explicitly to their helpers;
//! nothing about the request is kept in shared state.

use std::sync::Arc;

use tracing::debug;

use super::TraceId;
use super::ports::EntityStore;
use super::unit_of_work::{CompanyRepository, EmployeeRepository, UnitOfWork, UnitOfWorkError};

/// Per-request state: the trace id in scope and a fresh unit of work.
#[derive(Debug)]
pub struct RequestContext {
    trace_id: Option<TraceId>,
    unit_of_work: UnitOfWork,
}

impl RequestContext {
    /// Open a context over `store`, capturing the current trace id.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            trace_id: TraceId::current(),
            unit_of_work: UnitOfWork::new(store),
        }
    }

    /// Company repository for this request.
    pub fn companies(&mut self) -> CompanyRepository<'_> {
        self.unit_of_work.companies()
    }

    /// Employee repository for this request.
    pub fn employees(&mut self) -> EmployeeRepository<'_> {
        self.unit_of_work.employees()
    }

    /// Commit the request's staged changes.
    pub async fn commit(&mut self) -> Result<usize, UnitOfWorkError> {
        let trace_id = self.trace_id.map(|id| id.to_string());
        let committed = self.unit_of_work.commit().await?;
        debug!(trace_id = trace_id.as_deref(), committed, "request changes committed");
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::memory::InMemoryEntityStore;

    #[tokio::test]
    async fn context_captures_trace_id_in_scope() {
        let trace_id = TraceId::generate();
        let context = TraceId::scope(trace_id, async {
            RequestContext::new(Arc::new(InMemoryEntityStore::new()))
        })
        .await;
        assert_eq!(context.trace_id, Some(trace_id));
    }

    #[tokio::test]
    async fn contexts_do_not_share_pending_changes() {
        let store: Arc<dyn EntityStore> = Arc::new(InMemoryEntityStore::new());
        let mut first = RequestContext::new(store.clone());
        let mut second = RequestContext::new(store);

        first
            .companies()
            .create(crate::domain::Company::new("Acme", "1 Main St", "US"))
            .expect("stage");

        assert_eq!(second.commit().await.expect("empty commit"), 0);
        assert_eq!(first.commit().await.expect("commit"), 1);
    }
}

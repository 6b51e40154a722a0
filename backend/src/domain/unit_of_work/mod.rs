//! Unit of work: staged changes committed atomically.
//!
//! A [`UnitOfWork`] is owned by exactly one request. Repositories borrowed
//! from it read through to the [`EntityStore`] and stage creates, updates
//! and deletes in per-aggregate trackers. [`UnitOfWork::commit`] hands the
//! whole [`ChangeSet`] to the store in one call. A failed commit leaves the
//! staged changes in place so the caller can inspect or retry them.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::ports::{EntityStore, StoreError};
use crate::domain::{Company, Employee};

mod repository;
mod tracker;

pub use repository::{CompanyRepository, EmployeeRepository};
pub use tracker::{ChangeSet, EntityChanges, EntityTracker, EntryState, StagedUpdate};

/// A top-level entity type with its own identity.
pub trait Aggregate: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Identifier type.
    type Id: Copy + Ord + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Lower-case name used in error messages.
    const KIND: &'static str;

    /// The entity identifier.
    fn id(&self) -> Self::Id;

    /// Assign a fresh identifier if none is set, returning the identifier.
    fn ensure_id(&mut self) -> Self::Id;
}

/// Whether a read registers its results with the unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    /// Results join the identity map and may later be staged for update.
    Enabled,
    /// Results are detached copies of committed state.
    Disabled,
}

/// Failures raised while staging or committing changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitOfWorkError {
    /// An update addressed an entity that was never fetched with tracking.
    #[error("{kind} {id} is not tracked by this unit of work")]
    NotTracked {
        /// Aggregate kind.
        kind: &'static str,
        /// Entity identifier.
        id: String,
    },
    /// A create reused an identifier that is already tracked.
    #[error("{kind} {id} is already tracked by this unit of work")]
    AlreadyTracked {
        /// Aggregate kind.
        kind: &'static str,
        /// Entity identifier.
        id: String,
    },
    /// The store rejected a read or a commit.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl UnitOfWorkError {
    pub(crate) fn not_tracked(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::NotTracked {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_tracked(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::AlreadyTracked {
            kind,
            id: id.to_string(),
        }
    }
}

/// Request-scoped change tracker over an [`EntityStore`].
pub struct UnitOfWork {
    store: Arc<dyn EntityStore>,
    companies: EntityTracker<Company>,
    employees: EntityTracker<Employee>,
}

impl UnitOfWork {
    /// Open an empty unit of work.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            companies: EntityTracker::default(),
            employees: EntityTracker::default(),
        }
    }

    /// Company repository bound to this unit of work.
    pub fn companies(&mut self) -> CompanyRepository<'_> {
        CompanyRepository::new(self.store.as_ref(), &mut self.companies)
    }

    /// Employee repository bound to this unit of work.
    pub fn employees(&mut self) -> EmployeeRepository<'_> {
        EmployeeRepository::new(self.store.as_ref(), &mut self.employees)
    }

    /// Snapshot of every staged change.
    pub fn change_set(&self) -> ChangeSet {
        ChangeSet {
            companies: self.companies.changes(),
            employees: self.employees.changes(),
        }
    }

    /// Whether any change is staged.
    pub fn has_changes(&self) -> bool {
        !self.change_set().is_empty()
    }

    /// Flush every staged change to the store as one atomic unit.
    ///
    /// Returns the number of operations written. An empty change set never
    /// reaches the store. On failure nothing is accepted and the staged
    /// changes remain available.
    pub async fn commit(&mut self) -> Result<usize, UnitOfWorkError> {
        let changes = self.change_set();
        if changes.is_empty() {
            return Ok(0);
        }

        self.store.commit(&changes).await?;

        let removed = &changes.companies.deletes;
        self.employees
            .forget_where(|employee| removed.contains(&employee.company_id()));
        self.companies.accept();
        self.employees.accept();

        let written = changes.len();
        debug!(
            written,
            companies = changes.companies.len(),
            employees = changes.employees.len(),
            "unit of work committed"
        );
        Ok(written)
    }
}

impl fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("companies", &self.companies)
            .field("employees", &self.employees)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;

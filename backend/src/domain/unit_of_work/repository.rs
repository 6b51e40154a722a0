//! Per-aggregate repositories bound to a unit of work.
//!
//! Reads with [`Tracking::Enabled`] consult the identity map first so staged
//! edits stay visible within the request. Reads with [`Tracking::Disabled`]
//! go straight to the store and return detached copies.

use std::collections::{BTreeMap, BTreeSet};

use pagination::{Page, PageRequest};

use super::{Aggregate, EntityTracker, Tracking, UnitOfWorkError};
use crate::domain::ports::EntityStore;
use crate::domain::{Company, CompanyId, Employee, EmployeeId};

fn distinct<T: Copy + Ord>(ids: &[T]) -> Vec<T> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn track_all<A: Aggregate>(
    tracker: &mut EntityTracker<A>,
    entities: Vec<A>,
    tracking: Tracking,
) -> Vec<A> {
    match tracking {
        Tracking::Disabled => entities,
        Tracking::Enabled => entities
            .into_iter()
            .filter_map(|entity| tracker.attach(entity))
            .collect(),
    }
}

/// Merge store results for `ids` with the identity map, in `ids` order.
fn merge_tracked<A: Aggregate>(
    tracker: &mut EntityTracker<A>,
    ids: &[A::Id],
    loaded: Vec<A>,
) -> Vec<A> {
    let mut loaded: BTreeMap<A::Id, A> = loaded
        .into_iter()
        .map(|entity| (entity.id(), entity))
        .collect();
    ids.iter()
        .filter_map(|id| match tracker.lookup(*id) {
            Some(tracked) => tracked.cloned(),
            None => loaded.remove(id).and_then(|entity| tracker.attach(entity)),
        })
        .collect()
}

/// Company reads and staging.
pub struct CompanyRepository<'a> {
    store: &'a dyn EntityStore,
    tracker: &'a mut EntityTracker<Company>,
}

impl<'a> CompanyRepository<'a> {
    pub(super) fn new(store: &'a dyn EntityStore, tracker: &'a mut EntityTracker<Company>) -> Self {
        Self { store, tracker }
    }

    /// Every committed company ordered by name.
    pub async fn fetch_all(&mut self, tracking: Tracking) -> Result<Vec<Company>, UnitOfWorkError> {
        let companies = self.store.companies().await?;
        Ok(track_all(self.tracker, companies, tracking))
    }

    /// One company, or `None` if it does not exist.
    pub async fn fetch(
        &mut self,
        id: CompanyId,
        tracking: Tracking,
    ) -> Result<Option<Company>, UnitOfWorkError> {
        if tracking == Tracking::Enabled {
            if let Some(tracked) = self.tracker.lookup(id) {
                return Ok(tracked.cloned());
            }
        }
        let company = self.store.company(id).await?;
        Ok(track_all(self.tracker, company.into_iter().collect(), tracking).pop())
    }

    /// The companies found among `ids`, without duplicates, in request order.
    ///
    /// Missing ids are skipped; callers compare counts to detect them.
    pub async fn fetch_many(
        &mut self,
        ids: &[CompanyId],
        tracking: Tracking,
    ) -> Result<Vec<Company>, UnitOfWorkError> {
        let ids = distinct(ids);
        match tracking {
            Tracking::Disabled => Ok(self.store.companies_by_ids(&ids).await?),
            Tracking::Enabled => {
                let untracked: Vec<CompanyId> = ids
                    .iter()
                    .copied()
                    .filter(|id| self.tracker.lookup(*id).is_none())
                    .collect();
                let loaded = if untracked.is_empty() {
                    Vec::new()
                } else {
                    self.store.companies_by_ids(&untracked).await?
                };
                Ok(merge_tracked(self.tracker, &ids, loaded))
            }
        }
    }

    /// Stage a new company, assigning its id.
    pub fn create(&mut self, company: Company) -> Result<Company, UnitOfWorkError> {
        self.tracker.add(company)
    }

    /// Stage the working copy of a tracked company.
    pub fn update(&mut self, company: Company) -> Result<(), UnitOfWorkError> {
        self.tracker.update(company)
    }

    /// Stage a company for deletion. The store cascades to its employees.
    pub fn delete(&mut self, company: &Company) {
        self.tracker.remove(company);
    }
}

/// Employee reads and staging, always scoped to the owning company.
pub struct EmployeeRepository<'a> {
    store: &'a dyn EntityStore,
    tracker: &'a mut EntityTracker<Employee>,
}

impl<'a> EmployeeRepository<'a> {
    pub(super) fn new(
        store: &'a dyn EntityStore,
        tracker: &'a mut EntityTracker<Employee>,
    ) -> Self {
        Self { store, tracker }
    }

    /// One employee of a company, or `None`.
    pub async fn fetch(
        &mut self,
        company_id: CompanyId,
        id: EmployeeId,
        tracking: Tracking,
    ) -> Result<Option<Employee>, UnitOfWorkError> {
        if tracking == Tracking::Enabled {
            if let Some(tracked) = self.tracker.lookup(id) {
                return Ok(tracked
                    .filter(|employee| employee.company_id() == company_id)
                    .cloned());
            }
        }
        let employee = self.store.employee(company_id, id).await?;
        Ok(track_all(self.tracker, employee.into_iter().collect(), tracking).pop())
    }

    /// The employees of a company found among `ids`, in request order.
    pub async fn fetch_many(
        &mut self,
        company_id: CompanyId,
        ids: &[EmployeeId],
        tracking: Tracking,
    ) -> Result<Vec<Employee>, UnitOfWorkError> {
        let ids = distinct(ids);
        let loaded = self.store.employees_by_ids(company_id, &ids).await?;
        Ok(match tracking {
            Tracking::Disabled => loaded,
            Tracking::Enabled => merge_tracked(self.tracker, &ids, loaded)
                .into_iter()
                .filter(|employee| employee.company_id() == company_id)
                .collect(),
        })
    }

    /// One page of a company's committed employees.
    pub async fn fetch_for_company(
        &mut self,
        company_id: CompanyId,
        page: PageRequest,
        tracking: Tracking,
    ) -> Result<Page<Employee>, UnitOfWorkError> {
        let (employees, total) = self.store.employees_for_company(company_id, page).await?;
        let employees = track_all(self.tracker, employees, tracking);
        Ok(Page::new(employees, page, total))
    }

    /// Stage a new employee under `company_id`, assigning its id.
    pub fn create_for_company(
        &mut self,
        company_id: CompanyId,
        mut employee: Employee,
    ) -> Result<Employee, UnitOfWorkError> {
        employee.attach_to(company_id);
        self.tracker.add(employee)
    }

    /// Stage the working copy of a tracked employee.
    pub fn update(&mut self, employee: Employee) -> Result<(), UnitOfWorkError> {
        self.tracker.update(employee)
    }

    /// Stage an employee for deletion.
    pub fn delete(&mut self, employee: &Employee) {
        self.tracker.remove(employee);
    }
}

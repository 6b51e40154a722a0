//! In-process entity store.
//!
//! State lives behind a Tokio `RwLock`. Reads take a shared lock and clone
//! committed entities out. A commit takes the write lock, applies the change
//! set to a scratch copy, rejects updates whose fetched copy is stale, checks
//! references and stored constraints, and only then swaps the copy in. Commits are therefore serialised and atomic.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use pagination::PageRequest;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{EntityStore, StoreError};
use crate::domain::unit_of_work::{Aggregate, ChangeSet, EntityChanges, StagedUpdate};
use crate::domain::validation::{Constrained, validate};
use crate::domain::{Company, CompanyId, Employee, EmployeeId};

#[derive(Debug, Clone, Default)]
struct StoreState {
    companies: BTreeMap<CompanyId, Company>,
    employees: BTreeMap<EmployeeId, Employee>,
}

/// Entity store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    state: RwLock<StoreState>,
}

impl InMemoryEntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn found_in_order<I, T>(ids: &[I], lookup: impl Fn(&I) -> Option<T>) -> Vec<T>
where
    I: Ord + Copy,
{
    let mut seen = BTreeSet::new();
    ids.iter()
        .filter(|id| seen.insert(**id))
        .filter_map(lookup)
        .collect()
}

fn check_stored<A: Aggregate + Constrained>(entity: &A) -> Result<(), StoreError> {
    validate(entity).map_err(|errors| {
        let summary = errors
            .violations()
            .iter()
            .map(|violation| format!("{}: {}", violation.field, violation.message))
            .collect::<Vec<_>>()
            .join("; ");
        StoreError::constraint(format!("{} {}: {summary}", A::KIND, entity.id()))
    })
}

fn insert_all<A: Aggregate>(
    table: &mut BTreeMap<A::Id, A>,
    entities: &[A],
) -> Result<(), StoreError> {
    for entity in entities {
        let id = entity.id();
        if table.contains_key(&id) {
            return Err(StoreError::duplicate_entity(A::KIND, id.to_string()));
        }
        table.insert(id, entity.clone());
    }
    Ok(())
}

fn update_all<A: Aggregate>(
    table: &mut BTreeMap<A::Id, A>,
    updates: &[StagedUpdate<A>],
) -> Result<(), StoreError> {
    for update in updates {
        let id = update.current.id();
        let slot = table
            .get_mut(&id)
            .ok_or_else(|| StoreError::missing_entity(A::KIND, id.to_string()))?;
        if *slot != update.original {
            return Err(StoreError::conflict(A::KIND, id.to_string()));
        }
        *slot = update.current.clone();
    }
    Ok(())
}

fn delete_all<A: Aggregate>(
    table: &mut BTreeMap<A::Id, A>,
    ids: &[A::Id],
) -> Result<(), StoreError> {
    for id in ids {
        table
            .remove(id)
            .ok_or_else(|| StoreError::missing_entity(A::KIND, id.to_string()))?;
    }
    Ok(())
}

fn written<'a, A: Aggregate>(changes: &'a EntityChanges<A>) -> impl Iterator<Item = &'a A> {
    changes
        .inserts
        .iter()
        .chain(changes.updates.iter().map(|update| &update.current))
}

impl StoreState {
    fn apply(&mut self, changes: &ChangeSet) -> Result<(), StoreError> {
        delete_all(&mut self.employees, &changes.employees.deletes)?;
        delete_all(&mut self.companies, &changes.companies.deletes)?;
        let removed = &changes.companies.deletes;
        self.employees
            .retain(|_, employee| !removed.contains(&employee.company_id()));

        insert_all(&mut self.companies, &changes.companies.inserts)?;
        update_all(&mut self.companies, &changes.companies.updates)?;
        insert_all(&mut self.employees, &changes.employees.inserts)?;
        update_all(&mut self.employees, &changes.employees.updates)?;

        for company in written(&changes.companies) {
            check_stored(company)?;
        }
        for employee in written(&changes.employees) {
            if !self.companies.contains_key(&employee.company_id()) {
                return Err(StoreError::referential_integrity(format!(
                    "employee {} references missing company {}",
                    employee.id(),
                    employee.company_id()
                )));
            }
            check_stored(employee)?;
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn companies(&self) -> Result<Vec<Company>, StoreError> {
        let state = self.state.read().await;
        let mut companies: Vec<Company> = state.companies.values().cloned().collect();
        companies.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(companies)
    }

    async fn company(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        Ok(self.state.read().await.companies.get(&id).cloned())
    }

    async fn companies_by_ids(&self, ids: &[CompanyId]) -> Result<Vec<Company>, StoreError> {
        let state = self.state.read().await;
        Ok(found_in_order(ids, |id| state.companies.get(id).cloned()))
    }

    async fn employee(
        &self,
        company_id: CompanyId,
        id: EmployeeId,
    ) -> Result<Option<Employee>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .employees
            .get(&id)
            .filter(|employee| employee.company_id() == company_id)
            .cloned())
    }

    async fn employees_by_ids(
        &self,
        company_id: CompanyId,
        ids: &[EmployeeId],
    ) -> Result<Vec<Employee>, StoreError> {
        let state = self.state.read().await;
        Ok(found_in_order(ids, |id| {
            state
                .employees
                .get(id)
                .filter(|employee| employee.company_id() == company_id)
                .cloned()
        }))
    }

    async fn employees_for_company(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> Result<(Vec<Employee>, u64), StoreError> {
        let state = self.state.read().await;
        let mut employees: Vec<&Employee> = state
            .employees
            .values()
            .filter(|employee| employee.company_id() == company_id)
            .collect();
        employees.sort_by(|left, right| left.name.cmp(&right.name));

        let total = u64::try_from(employees.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.page_size()).unwrap_or(usize::MAX);
        let items = employees
            .into_iter()
            .skip(offset)
            .take(size)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn commit(&self, changes: &ChangeSet) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let mut scratch = state.clone();
        scratch.apply(changes)?;
        *state = scratch;
        debug!(operations = changes.len(), "entity store commit applied");
        Ok(())
    }
}

#[cfg(test)]
#[path = "entity_store_tests.rs"]
mod tests;

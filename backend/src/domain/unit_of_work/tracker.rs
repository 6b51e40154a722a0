//! Identity map and change tracking for one aggregate type.

use std::collections::BTreeMap;

use super::{Aggregate, UnitOfWorkError};
use crate::domain::{Company, Employee};

/// Lifecycle state of a tracked entity relative to the committed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Matches the committed copy.
    Unchanged,
    /// Staged for insertion.
    Added,
    /// Differs from the committed copy.
    Modified,
    /// Staged for deletion.
    Deleted,
}

#[derive(Debug, Clone)]
struct Entry<A> {
    original: Option<A>,
    current: A,
    deleted: bool,
}

impl<A: Aggregate> Entry<A> {
    fn state(&self) -> EntryState {
        match &self.original {
            _ if self.deleted => EntryState::Deleted,
            None => EntryState::Added,
            Some(original) if *original != self.current => EntryState::Modified,
            Some(_) => EntryState::Unchanged,
        }
    }
}

/// A modified entity together with the committed copy it was fetched as.
///
/// The store applies `current` only while it still holds `original`.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedUpdate<A> {
    /// Committed copy at fetch time.
    pub original: A,
    /// Working copy to write.
    pub current: A,
}

/// Pending changes for one aggregate type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityChanges<A: Aggregate> {
    /// Entities to insert.
    pub inserts: Vec<A>,
    /// Entities to overwrite.
    pub updates: Vec<StagedUpdate<A>>,
    /// Identifiers to delete.
    pub deletes: Vec<A::Id>,
}

impl<A: Aggregate> Default for EntityChanges<A> {
    fn default() -> Self {
        Self {
            inserts: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
        }
    }
}

impl<A: Aggregate> EntityChanges<A> {
    /// Total number of staged operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.deletes.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every pending change of a unit of work, handed to the store on commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Company changes.
    pub companies: EntityChanges<Company>,
    /// Employee changes.
    pub employees: EntityChanges<Employee>,
}

impl ChangeSet {
    /// Total number of staged operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.companies.len() + self.employees.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identity map keyed by aggregate id.
///
/// Each entry keeps the committed copy next to the working copy so updates
/// are detected by comparison rather than by explicit dirty flags.
#[derive(Debug, Clone)]
pub struct EntityTracker<A: Aggregate> {
    entries: BTreeMap<A::Id, Entry<A>>,
}

impl<A: Aggregate> Default for EntityTracker<A> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<A: Aggregate> EntityTracker<A> {
    /// Working copy of a tracked entity.
    ///
    /// `Some(None)` means the entity is tracked but staged for deletion.
    pub fn lookup(&self, id: A::Id) -> Option<Option<&A>> {
        self.entries
            .get(&id)
            .map(|entry| (!entry.deleted).then_some(&entry.current))
    }

    /// Start tracking a committed entity, returning the working copy.
    ///
    /// An entity that is already tracked keeps its working copy, so staged
    /// edits survive a second fetch. Returns `None` for entities staged for
    /// deletion.
    pub fn attach(&mut self, entity: A) -> Option<A> {
        let entry = self.entries.entry(entity.id()).or_insert_with(|| Entry {
            original: Some(entity.clone()),
            current: entity,
            deleted: false,
        });
        (!entry.deleted).then(|| entry.current.clone())
    }

    /// Stage an insert, assigning an id if the entity has none.
    pub fn add(&mut self, mut entity: A) -> Result<A, UnitOfWorkError> {
        let id = entity.ensure_id();
        if self.entries.contains_key(&id) {
            return Err(UnitOfWorkError::already_tracked(A::KIND, id));
        }
        self.entries.insert(
            id,
            Entry {
                original: None,
                current: entity.clone(),
                deleted: false,
            },
        );
        Ok(entity)
    }

    /// Replace the working copy of a tracked entity.
    pub fn update(&mut self, entity: A) -> Result<(), UnitOfWorkError> {
        match self.entries.get_mut(&entity.id()) {
            Some(entry) if !entry.deleted => {
                entry.current = entity;
                Ok(())
            }
            _ => Err(UnitOfWorkError::not_tracked(A::KIND, entity.id())),
        }
    }

    /// Stage a delete.
    ///
    /// A pending insert is simply dropped. An untracked entity is attached
    /// in the deleted state.
    pub fn remove(&mut self, entity: &A) {
        let id = entity.id();
        match self.state(id) {
            Some(EntryState::Added) => {
                self.entries.remove(&id);
            }
            Some(_) => {
                if let Some(entry) = self.entries.get_mut(&id) {
                    entry.deleted = true;
                }
            }
            None => {
                self.entries.insert(
                    id,
                    Entry {
                        original: Some(entity.clone()),
                        current: entity.clone(),
                        deleted: true,
                    },
                );
            }
        }
    }

    /// State of a tracked entity.
    pub fn state(&self, id: A::Id) -> Option<EntryState> {
        self.entries.get(&id).map(Entry::state)
    }

    /// Collect the pending changes in id order.
    pub fn changes(&self) -> EntityChanges<A> {
        let mut changes = EntityChanges::default();
        for (id, entry) in &self.entries {
            match (&entry.original, entry.state()) {
                (_, EntryState::Added) => changes.inserts.push(entry.current.clone()),
                (Some(original), EntryState::Modified) => changes.updates.push(StagedUpdate {
                    original: original.clone(),
                    current: entry.current.clone(),
                }),
                (_, EntryState::Deleted) => changes.deletes.push(*id),
                _ => {}
            }
        }
        changes
    }

    /// Mark every change as committed.
    pub fn accept(&mut self) {
        self.entries.retain(|_, entry| !entry.deleted);
        for entry in self.entries.values_mut() {
            entry.original = Some(entry.current.clone());
        }
    }

    /// Stop tracking every entity matching `predicate`.
    pub fn forget_where(&mut self, predicate: impl Fn(&A) -> bool) {
        self.entries.retain(|_, entry| !predicate(&entry.current));
    }
}

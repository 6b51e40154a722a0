//! In-memory adapters.

mod entity_store;

pub use entity_store::InMemoryEntityStore;

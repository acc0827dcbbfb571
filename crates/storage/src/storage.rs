//! Durable state for the pet playground.
//!
//! The host's global state is modelled as a [`Memento`]: an opaque JSON
//! key-value store with a list of keys that follow the user across devices.
//! The extra-pet collection is stored in it as two index-aligned arrays.
//!
//! # Modules
//!
//! - `memento` - Store trait, in-memory store, typed reads
//! - `file` - JSON file backed store
//! - `extra_pets` - Collection <-> parallel array conversion

mod extra_pets;
mod file;
mod memento;

pub use extra_pets::{
    collection_from_memento, store_collection_as_memento, EXTRA_PETS_KEY_COLORS, EXTRA_PETS_KEY_TYPES,
};
pub use file::{JsonFileMemento, StorageError};
pub use memento::{get_or, InMemoryMemento, Memento};

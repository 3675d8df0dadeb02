//! Data model for lost & found reports.
//!
//! This crate defines the [`Item`] record shared by every stage of the
//! matching core, the persisted [`MatchRecord`] entries that form the match
//! ledger, and the [`ItemStore`] contract the core uses to talk to the
//! backing document store. The store itself is an external collaborator;
//! [`InMemoryStore`] is the reference implementation used by tests and
//! local runs.

pub mod error;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::{InMemoryStore, ItemPatch, ItemStore};
pub use types::{Coordinates, Item, ItemKind, MatchRecord, MatchStatus};

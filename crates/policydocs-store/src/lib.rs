//! policydocs-store — embedded document store for policydocs.
//!
//! Backed by [redb](https://docs.rs/redb): one table per collection, keys
//! are the composite `{site_id}/{env}/{hostname}` strings built by
//! `policydocs_core::paths`, values are JSON-serialized documents.
//!
//! # Architecture
//!
//! Business logic never touches the database directly; it consumes the
//! narrow [`PolicyDocStore`] capability, which has two production-relevant
//! operations: a transactional read of the three normalized records from
//! one consistent snapshot, and a transactional overwrite of the
//! denormalized record. [`RedbStore`] is the production implementation,
//! [`MemoryStore`] the in-process fake for tests.
//!
//! `RedbStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and safe for concurrent invocations; same-document races are serialized
//! by redb's transaction isolation.

pub mod error;
pub mod memory;
pub mod store;
pub mod tables;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{PolicyDocStore, RedbStore};

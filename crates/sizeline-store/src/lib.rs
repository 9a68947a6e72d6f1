//! Storage adapter boundaries for sizeline.
//!
//! The pipeline talks to two external services, both modelled here as
//! async traits so that production backends (S3-style blob stores,
//! DynamoDB-style key/value tables) and test backends are interchangeable:
//!
//! - [`ObjectStore`] -- paged listing of `{key, size}` entries in a
//!   container, plus single-blob put/get/delete
//! - [`SeriesStore`] -- append-only `(partition_key, sort_key, attributes)`
//!   rows with a paged scan
//!
//! # Storage Backends
//!
//! - [`InMemoryObjectStore`] -- `BTreeMap`-per-container store with a
//!   configurable page size
//! - [`InMemorySeriesStore`] -- insertion-ordered row log with a
//!   configurable page size
//!
//! # Design Rules
//!
//! 1. Pagination is driven by opaque continuation tokens. A page without a
//!    token is the last page.
//! 2. Series rows are never updated or deleted.
//! 3. Backends are `Send + Sync` and safe to call from concurrent
//!    invocations; callers never hold a lock across calls.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod object;
pub mod series;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryObjectStore, InMemorySeriesStore};
pub use object::{ListPage, ObjectEntry, StoredBlob};
pub use series::{ScanPage, SeriesItem};
pub use traits::{ObjectStore, SeriesStore};

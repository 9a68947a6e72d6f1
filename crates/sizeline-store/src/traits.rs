use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;
use crate::object::{ListPage, StoredBlob};
use crate::series::{ScanPage, SeriesItem};

/// Namespaced blob store.
///
/// All implementations must satisfy these invariants:
/// - `list_page` returns every key in the container exactly once across a
///   complete token chain, and a page without `next_token` is the last one.
/// - A continuation token is only meaningful for the container it came from.
/// - `put` overwrites any existing blob at the same key.
/// - All backend errors are propagated, never silently ignored.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of `{key, size}` entries.
    ///
    /// Pass `None` for the first page and the previous page's `next_token`
    /// afterwards.
    async fn list_page(&self, container: &str, token: Option<&str>) -> StoreResult<ListPage>;

    /// Write a blob, replacing any existing blob at `key`.
    async fn put(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()>;

    /// Read a blob. Returns `Ok(None)` if the key does not exist.
    async fn get(&self, container: &str, key: &str) -> StoreResult<Option<StoredBlob>>;

    /// Delete a blob. Returns `true` if the key existed.
    async fn delete(&self, container: &str, key: &str) -> StoreResult<bool>;
}

/// Append-only keyed row store.
///
/// Rows are keyed by `(partition_key, sort_key)`; there is no update or
/// delete. Writing a row whose key already exists keeps both rows.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Append one row. The write is atomic: either the whole row is visible
    /// afterwards or none of it is.
    async fn put_item(&self, item: SeriesItem) -> StoreResult<()>;

    /// Fetch one page of rows.
    ///
    /// `partition` is a hint. Backends that support server-side partition
    /// filtering return only matching rows; backends that do not may return
    /// rows from every partition, so callers must filter what they receive.
    /// No ordering is guaranteed across or within pages.
    async fn scan_page(&self, partition: Option<&str>, token: Option<&str>)
        -> StoreResult<ScanPage>;
}

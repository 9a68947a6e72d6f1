use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::{ListPage, ObjectEntry, StoredBlob};
use crate::series::{ScanPage, SeriesItem};
use crate::traits::{ObjectStore, SeriesStore};

/// Default listing page size, matching the usual object-store maximum.
pub const DEFAULT_LIST_PAGE_SIZE: usize = 1000;

/// Default scan page size.
pub const DEFAULT_SCAN_PAGE_SIZE: usize = 100;

fn read_lock<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
}

fn write_lock<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
}

type Container = BTreeMap<String, StoredBlob>;

/// In-memory, `BTreeMap`-per-container object store.
///
/// Intended for tests, the simulate command, and local serving. Keys are
/// listed in lexicographic order and the continuation token is the last key
/// of the previous page. Containers must be created before use, like
/// buckets in a real object store.
pub struct InMemoryObjectStore {
    containers: RwLock<HashMap<String, Container>>,
    page_size: usize,
}

impl InMemoryObjectStore {
    /// Create a store with no containers and the default page size.
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }

    /// Limit every listing page to at most `page_size` entries (minimum 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Create an empty container. Returns `false` if it already existed.
    pub fn create_container(&self, name: &str) -> StoreResult<bool> {
        let mut containers = write_lock(&self.containers)?;
        if containers.contains_key(name) {
            return Ok(false);
        }
        containers.insert(name.to_string(), Container::new());
        Ok(true)
    }

    pub fn container_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(read_lock(&self.containers)?.contains_key(name))
    }

    /// Number of objects in a container.
    pub fn object_count(&self, container: &str) -> StoreResult<usize> {
        let containers = read_lock(&self.containers)?;
        Ok(lookup(&containers, container)?.len())
    }

    /// Total bytes across all objects in a container.
    pub fn total_bytes(&self, container: &str) -> StoreResult<u64> {
        let containers = read_lock(&self.containers)?;
        Ok(lookup(&containers, container)?
            .values()
            .map(StoredBlob::size)
            .sum())
    }
}

fn lookup<'a>(containers: &'a HashMap<String, Container>, name: &str) -> StoreResult<&'a Container> {
    containers
        .get(name)
        .ok_or_else(|| StoreError::NotFound(format!("container {name}")))
}

fn lookup_mut<'a>(
    containers: &'a mut HashMap<String, Container>,
    name: &str,
) -> StoreResult<&'a mut Container> {
    containers
        .get_mut(name)
        .ok_or_else(|| StoreError::NotFound(format!("container {name}")))
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_page(&self, container: &str, token: Option<&str>) -> StoreResult<ListPage> {
        let containers = read_lock(&self.containers)?;
        let objects = lookup(&containers, container)?;

        let mut range = match token {
            Some(after) => objects.range::<str, _>((Bound::Excluded(after), Bound::Unbounded)),
            None => objects.range::<str, _>(..),
        };
        let entries: Vec<ObjectEntry> = range
            .by_ref()
            .take(self.page_size)
            .map(|(key, blob)| ObjectEntry::new(key.clone(), blob.size()))
            .collect();
        let next_token = match range.next() {
            Some(_) => entries.last().map(|e| e.key.clone()),
            None => None,
        };

        debug!(container, entries = entries.len(), more = next_token.is_some(), "listed page");
        Ok(ListPage {
            entries,
            next_token,
        })
    }

    async fn put(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        let mut containers = write_lock(&self.containers)?;
        let objects = lookup_mut(&mut containers, container)?;
        objects.insert(key.to_string(), StoredBlob::new(data, content_type));
        Ok(())
    }

    async fn get(&self, container: &str, key: &str) -> StoreResult<Option<StoredBlob>> {
        let containers = read_lock(&self.containers)?;
        Ok(lookup(&containers, container)?.get(key).cloned())
    }

    async fn delete(&self, container: &str, key: &str) -> StoreResult<bool> {
        let mut containers = write_lock(&self.containers)?;
        let objects = lookup_mut(&mut containers, container)?;
        Ok(objects.remove(key).is_some())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.containers.read().map(|c| c.len()).unwrap_or(0);
        f.debug_struct("InMemoryObjectStore")
            .field("container_count", &count)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// In-memory, append-only series store.
///
/// Rows are kept in insertion order, which is also the scan order; nothing
/// here sorts by the sort key. The continuation token is the decimal offset
/// of the next unexamined row.
///
/// By default the partition hint of `scan_page` is honoured server-side.
/// [`InMemorySeriesStore::without_partition_filter`] makes the store behave
/// like a plain full-table scan that returns every partition.
pub struct InMemorySeriesStore {
    table: String,
    rows: RwLock<Vec<SeriesItem>>,
    page_size: usize,
    partition_filter: bool,
}

impl InMemorySeriesStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows: RwLock::new(Vec::new()),
            page_size: DEFAULT_SCAN_PAGE_SIZE,
            partition_filter: true,
        }
    }

    /// Limit every scan page to at most `page_size` examined rows (minimum 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Ignore the partition hint and return rows from every partition.
    pub fn without_partition_filter(mut self) -> Self {
        self.partition_filter = false;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of rows across all partitions.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(read_lock(&self.rows)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Copy of every row, in insertion order.
    pub fn rows(&self) -> StoreResult<Vec<SeriesItem>> {
        Ok(read_lock(&self.rows)?.clone())
    }
}

#[async_trait]
impl SeriesStore for InMemorySeriesStore {
    async fn put_item(&self, item: SeriesItem) -> StoreResult<()> {
        debug!(table = %self.table, partition = %item.partition_key, sort_key = item.sort_key, "put item");
        write_lock(&self.rows)?.push(item);
        Ok(())
    }

    async fn scan_page(
        &self,
        partition: Option<&str>,
        token: Option<&str>,
    ) -> StoreResult<ScanPage> {
        let rows = read_lock(&self.rows)?;
        let start = match token {
            None => 0,
            Some(raw) => {
                let offset: usize = raw
                    .parse()
                    .map_err(|_| StoreError::InvalidToken(raw.to_string()))?;
                if offset > rows.len() {
                    return Err(StoreError::InvalidToken(raw.to_string()));
                }
                offset
            }
        };

        let end = (start + self.page_size).min(rows.len());
        let filter = partition.filter(|_| self.partition_filter);
        let items: Vec<SeriesItem> = rows[start..end]
            .iter()
            .filter(|row| filter.map_or(true, |p| row.partition_key == p))
            .cloned()
            .collect();
        let next_token = (end < rows.len()).then(|| end.to_string());

        Ok(ScanPage { items, next_token })
    }
}

impl std::fmt::Debug for InMemorySeriesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySeriesStore")
            .field("table", &self.table)
            .field("row_count", &self.len().ok())
            .field("page_size", &self.page_size)
            .finish()
    }
}

//! Scripted and failing adapters for pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use sizeline_store::{
    InMemorySeriesStore, ListPage, ObjectEntry, ObjectStore, ScanPage, SeriesItem, SeriesStore,
    StoreError, StoreResult, StoredBlob,
};

/// Object store serving a fixed chain of listing pages.
///
/// Page `i` is requested with token `p{i}`; the first page with no token.
pub struct ScriptedObjectStore {
    pages: Vec<ListPage>,
    fail_list_at: Option<usize>,
    fail_put: bool,
    list_calls: AtomicUsize,
    puts: Mutex<Vec<(String, String, StoredBlob)>>,
}

impl ScriptedObjectStore {
    pub fn paged(chunks: Vec<Vec<ObjectEntry>>) -> Self {
        let count = chunks.len().max(1);
        let mut pages: Vec<ListPage> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, entries)| ListPage {
                entries,
                next_token: (i + 1 < count).then(|| format!("p{}", i + 1)),
            })
            .collect();
        if pages.is_empty() {
            pages.push(ListPage::default());
        }
        Self::from_pages(pages)
    }

    /// A listing whose only page points back at itself.
    pub fn looping(entries: Vec<ObjectEntry>) -> Self {
        Self::from_pages(vec![ListPage {
            entries,
            next_token: Some("p0".into()),
        }])
    }

    /// Three pages whose tokens cycle `p1 -> p2 -> p1`.
    pub fn cycling(entries: Vec<ObjectEntry>) -> Self {
        let page = |next: &str| ListPage {
            entries: entries.clone(),
            next_token: Some(next.into()),
        };
        Self::from_pages(vec![page("p1"), page("p2"), page("p1")])
    }

    fn from_pages(pages: Vec<ListPage>) -> Self {
        Self {
            pages,
            fail_list_at: None,
            fail_put: false,
            list_calls: AtomicUsize::new(0),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_list_at(mut self, page: usize) -> Self {
        self.fail_list_at = Some(page);
        self
    }

    pub fn failing_puts(mut self) -> Self {
        self.fail_put = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> Vec<(String, String, StoredBlob)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for ScriptedObjectStore {
    async fn list_page(&self, _container: &str, token: Option<&str>) -> StoreResult<ListPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let index = match token {
            None => 0,
            Some(t) => t
                .strip_prefix('p')
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| StoreError::InvalidToken(t.to_string()))?,
        };
        if self.fail_list_at == Some(index) {
            return Err(StoreError::Unavailable(format!("page {index} unavailable")));
        }
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| StoreError::InvalidToken(format!("p{index}")))
    }

    async fn put(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        if self.fail_put {
            return Err(StoreError::Unavailable("object store is read-only".into()));
        }
        self.puts.lock().unwrap().push((
            container.to_string(),
            key.to_string(),
            StoredBlob::new(data, content_type),
        ));
        Ok(())
    }

    async fn get(&self, container: &str, key: &str) -> StoreResult<Option<StoredBlob>> {
        Ok(self
            .puts
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, k, _)| c == container && k == key)
            .map(|(_, _, blob)| blob.clone()))
    }

    async fn delete(&self, _container: &str, _key: &str) -> StoreResult<bool> {
        Ok(false)
    }
}

/// Series store whose scan tokens cycle `a -> b -> a`.
#[derive(Default)]
pub struct CyclingSeriesStore {
    scans: AtomicUsize,
}

impl CyclingSeriesStore {
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeriesStore for CyclingSeriesStore {
    async fn put_item(&self, _item: SeriesItem) -> StoreResult<()> {
        Ok(())
    }

    async fn scan_page(
        &self,
        _partition: Option<&str>,
        token: Option<&str>,
    ) -> StoreResult<ScanPage> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let next = match token {
            Some("a") => "b",
            _ => "a",
        };
        Ok(ScanPage {
            items: Vec::new(),
            next_token: Some(next.into()),
        })
    }
}

/// Series store wrapper that can refuse writes or scans.
pub struct FaultySeriesStore {
    pub inner: InMemorySeriesStore,
    fail_put: bool,
    fail_scan: bool,
}

impl FaultySeriesStore {
    pub fn failing_puts() -> Self {
        Self {
            inner: InMemorySeriesStore::new("faulty"),
            fail_put: true,
            fail_scan: false,
        }
    }

    pub fn failing_scans() -> Self {
        Self {
            inner: InMemorySeriesStore::new("faulty"),
            fail_put: false,
            fail_scan: true,
        }
    }
}

#[async_trait]
impl SeriesStore for FaultySeriesStore {
    async fn put_item(&self, item: SeriesItem) -> StoreResult<()> {
        if self.fail_put {
            return Err(StoreError::Unavailable("table is throttled".into()));
        }
        self.inner.put_item(item).await
    }

    async fn scan_page(
        &self,
        partition: Option<&str>,
        token: Option<&str>,
    ) -> StoreResult<ScanPage> {
        if self.fail_scan {
            return Err(StoreError::Unavailable("table is throttled".into()));
        }
        self.inner.scan_page(partition, token).await
    }
}

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One listed object: its key and size in bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// One page of a container listing.
///
/// `next_token` is `Some` while more entries remain; pass it back to
/// `list_page` to fetch the following page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListPage {
    pub entries: Vec<ObjectEntry>,
    pub next_token: Option<String>,
}

impl ListPage {
    /// A final page with no continuation.
    pub fn last(entries: Vec<ObjectEntry>) -> Self {
        Self {
            entries,
            next_token: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}

/// A blob as held by an object store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl StoredBlob {
    pub fn new(data: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_has_no_token() {
        let page = ListPage::last(vec![ObjectEntry::new("a.txt", 3)]);
        assert!(page.is_last());
        assert_eq!(page.entries.len(), 1);
    }

    #[test]
    fn blob_size_is_byte_length() {
        let blob = StoredBlob::new(&b"Empty Assignment 1"[..], Some("text/plain"));
        assert_eq!(blob.size(), 18);
        assert_eq!(blob.content_type.as_deref(), Some("text/plain"));
    }
}

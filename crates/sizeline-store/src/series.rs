use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sizeline_types::{BucketId, BucketSnapshot};

use crate::error::{StoreError, StoreResult};

/// Attribute name of the partition key (the bucket name).
pub const PARTITION_ATTR: &str = "S3ObjectKey";
/// Attribute name of the sort key (unix seconds).
pub const SORT_ATTR: &str = "Timestamp";
pub const OBJECT_COUNT_ATTR: &str = "object_count";
pub const TOTAL_SIZE_ATTR: &str = "total_size";

/// A row in a series store.
///
/// Rows are keyed by `(partition_key, sort_key)` and carry a flat map of
/// numeric attributes. Serialized, a row looks like the table item it
/// stands for:
///
/// ```json
/// {"S3ObjectKey": "photos", "Timestamp": 1700000000, "object_count": 2, "total_size": 150}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesItem {
    #[serde(rename = "S3ObjectKey")]
    pub partition_key: String,
    #[serde(rename = "Timestamp")]
    pub sort_key: i64,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, u64>,
}

impl SeriesItem {
    pub fn new(
        partition_key: impl Into<String>,
        sort_key: i64,
        attributes: BTreeMap<String, u64>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key,
            attributes,
        }
    }

    /// Encode a snapshot as a row keyed `(bucket, timestamp)`.
    pub fn from_snapshot(snapshot: &BucketSnapshot) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(OBJECT_COUNT_ATTR.to_string(), snapshot.object_count);
        attributes.insert(TOTAL_SIZE_ATTR.to_string(), snapshot.total_size);
        Self::new(snapshot.bucket.as_str(), snapshot.timestamp, attributes)
    }

    /// Decode this row back into a snapshot.
    ///
    /// Fails with [`StoreError::Decode`] if the partition key is not a valid
    /// bucket id or a required attribute is missing.
    pub fn to_snapshot(&self) -> StoreResult<BucketSnapshot> {
        let bucket = BucketId::new(self.partition_key.clone())
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(BucketSnapshot::new(
            bucket,
            self.sort_key,
            self.attribute(OBJECT_COUNT_ATTR)?,
            self.attribute(TOTAL_SIZE_ATTR)?,
        ))
    }

    fn attribute(&self, name: &str) -> StoreResult<u64> {
        self.attributes.get(name).copied().ok_or_else(|| {
            StoreError::Decode(format!(
                "row ({}, {}) is missing attribute {name}",
                self.partition_key, self.sort_key
            ))
        })
    }
}

/// One page of a series scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanPage {
    pub items: Vec<SeriesItem>,
    pub next_token: Option<String>,
}

impl ScanPage {
    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}

//! Storage mutation notifications.
//!
//! The payload is the S3 event shape. Only the bucket name of each record
//! is used: totals are always recomputed from a full listing, so object keys
//! and sizes in the payload are informational.

use serde::Deserialize;
use sizeline_types::{BucketId, TypeError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification carries no records")]
    Empty,

    #[error("malformed notification: {0}")]
    Malformed(String),

    #[error(transparent)]
    Bucket(#[from] TypeError),
}

#[derive(Clone, Debug, Deserialize)]
pub struct MutationNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Clone, Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    #[serde(default)]
    pub object: Option<ObjectRef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ObjectRef {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl MutationNotification {
    pub fn from_slice(body: &[u8]) -> Result<Self, NotificationError> {
        serde_json::from_slice(body).map_err(|e| NotificationError::Malformed(e.to_string()))
    }

    /// Distinct buckets named by the records, in first-seen order.
    ///
    /// A batch touching one bucket many times still aggregates it once.
    pub fn buckets(&self) -> Result<Vec<BucketId>, NotificationError> {
        if self.records.is_empty() {
            return Err(NotificationError::Empty);
        }
        let mut buckets: Vec<BucketId> = Vec::new();
        for record in &self.records {
            let bucket = BucketId::new(record.s3.bucket.name.as_str())?;
            if !buckets.contains(&bucket) {
                buckets.push(bucket);
            }
        }
        Ok(buckets)
    }
}

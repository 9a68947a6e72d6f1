use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Longest bucket name accepted.
pub const MAX_BUCKET_ID_LEN: usize = 255;

/// Name of a tracked bucket.
///
/// A `BucketId` is the partition key of every snapshot row, so it must be
/// usable verbatim as a key by any backend:
/// - non-empty and at most [`MAX_BUCKET_ID_LEN`] bytes
/// - no whitespace or control characters
/// - no `/` (bucket names are flat; object keys carry the hierarchy)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketId(String);

impl BucketId {
    /// Validate and wrap a bucket name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate(name: &str) -> Result<(), TypeError> {
    let reject = |reason: &str| {
        Err(TypeError::InvalidBucketId {
            name: name.to_string(),
            reason: reason.into(),
        })
    };

    if name.is_empty() {
        return reject("must not be empty");
    }
    if name.len() > MAX_BUCKET_ID_LEN {
        return reject("longer than 255 bytes");
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return reject("contains whitespace or control characters");
    }
    if name.contains('/') {
        return reject("must not contain '/'");
    }
    Ok(())
}

impl TryFrom<String> for BucketId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BucketId> for String {
    fn from(id: BucketId) -> Self {
        id.0
    }
}

impl FromStr for BucketId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for BucketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BucketId({})", self.0)
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

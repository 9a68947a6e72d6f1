//! Foundation types for sizeline.
//!
//! sizeline records the aggregate size of a storage bucket every time one of
//! its objects changes, and renders the accumulated history as a chart. This
//! crate holds the vocabulary shared by every other sizeline crate.
//!
//! # Key Types
//!
//! - [`BucketId`] -- validated name of a tracked bucket
//! - [`BucketSnapshot`] -- one recorded `(timestamp, object_count, total_size)` observation
//! - [`SeriesPoint`] -- the `(timestamp, total_size)` projection used for charting
//! - [`Clock`] -- source of "now" in unix seconds, swappable for tests

pub mod bucket;
pub mod clock;
pub mod error;
pub mod snapshot;

pub use bucket::BucketId;
pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use error::TypeError;
pub use snapshot::{BucketSnapshot, SeriesPoint};

//! Tiller bucket assignment.
//!
//! Decides which CI shard runs which test file. Two modes:
//!
//! - **Cold start**: spread measured files across buckets so the slowest
//!   bucket finishes as early as possible (LPT scheduling).
//! - **Sync**: keep an existing assignment and patch it for files that
//!   appeared or disappeared, without moving anything else.
//!
//! # Components
//!
//! - **`distributor`** — Greedy LPT distribution
//! - **`differ`** — Previous assignment vs. observed files
//! - **`reconciler`** — Bucket alignment, removal, random addition

pub mod differ;
pub mod distributor;
pub mod reconciler;

pub use differ::{apply_ignore_set, diff_assignment};
pub use distributor::{BucketSummary, distribute, makespan, smallest_bucket, summarize};
pub use reconciler::{align_bucket_count, random_bucket, reconcile, synchronize};

//! tiller-profile — turns raw inputs into test-file sets.
//!
//! - **`extract`** — per-file durations from profiler text output
//! - **`discover`** — current test-file list from a directory scan

pub mod discover;
pub mod extract;

pub use discover::discover_test_files;
pub use extract::{DurationExtractor, extract_durations};

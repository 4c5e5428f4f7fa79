//! Shared types used across Tiller crates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single test file and its measured duration in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFile {
    pub id: String,
    pub duration: f64,
}

impl TestFile {
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            duration,
        }
    }
}

/// The files assigned to one CI shard.
///
/// `index` maps to a specific CI job slot and is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub index: usize,
    files: Vec<TestFile>,
    total_duration: f64,
}

impl Bucket {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            files: Vec::new(),
            total_duration: 0.0,
        }
    }

    /// Append a file and account for its duration.
    pub fn push(&mut self, file: TestFile) {
        self.total_duration += file.duration;
        self.files.push(file);
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn ids(&self) -> Vec<String> {
        self.files.iter().map(|f| f.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Bucket index → file identifiers. The only state persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    buckets: Vec<Vec<String>>,
}

impl Assignment {
    pub fn new(buckets: Vec<Vec<String>>) -> Self {
        Self { buckets }
    }

    /// `count` empty buckets.
    pub fn empty(count: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); count],
        }
    }

    /// Drop durations, keeping only the per-bucket identifiers.
    pub fn from_buckets(buckets: &[Bucket]) -> Self {
        Self {
            buckets: buckets.iter().map(Bucket::ids).collect(),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn buckets(&self) -> &[Vec<String>] {
        &self.buckets
    }

    pub fn buckets_mut(&mut self) -> &mut Vec<Vec<String>> {
        &mut self.buckets
    }

    pub fn bucket(&self, index: usize) -> Option<&[String]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    pub fn into_buckets(self) -> Vec<Vec<String>> {
        self.buckets
    }

    /// Every identifier across all buckets, in bucket order.
    pub fn flattened(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().flatten().map(String::as_str)
    }

    pub fn total_files(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Index of the first bucket holding `id`.
    pub fn bucket_of(&self, id: &str) -> Option<usize> {
        self.buckets
            .iter()
            .position(|bucket| bucket.iter().any(|f| f == id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bucket_of(id).is_some()
    }

    /// Identifiers that appear more than once across the assignment.
    pub fn duplicates(&self) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut dupes = BTreeSet::new();
        for id in self.flattened() {
            if !seen.insert(id) {
                dupes.insert(id.to_string());
            }
        }
        dupes
    }
}

/// Difference between a previous assignment and the observed file list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub removed: BTreeSet<String>,
    pub added: BTreeSet<String>,
}

impl FileDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    /// Operator-facing summary of removed and added files, each sorted.
    pub fn summary(&self) -> String {
        let removed = if self.removed.is_empty() {
            "No spec files removed".to_string()
        } else {
            format!("{:?}", self.removed.iter().collect::<Vec<_>>())
        };
        let added = if self.added.is_empty() {
            "No spec files added".to_string()
        } else {
            format!("{:?}", self.added.iter().collect::<Vec<_>>())
        };
        format!("  Removed: {removed}\n  Added:   {added}\n")
    }
}

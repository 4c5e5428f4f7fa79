//! Build-matrix document (`tiller.toml`) parser and writer.
//!
//! The document is both the config source and the config sink: it
//! supplies the bucket count, the ignore set, and the previous
//! assignment, and receives the updated assignment on write. Keys Tiller
//! does not understand are carried through untouched.

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{TillerError, TillerResult};
use crate::matrix::{MatrixEntry, parse_ignore_set};
use crate::persist::write_atomic;
use crate::types::Assignment;

/// Bucket count used when the document does not set `num_builds`.
pub const DEFAULT_NUM_BUILDS: i64 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_builds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiller: Option<TillerSettings>,
    #[serde(default)]
    pub env: EnvSection,
    #[serde(flatten)]
    pub extra: toml::Table,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvSection {
    #[serde(default)]
    pub global: Vec<String>,
    #[serde(default)]
    pub matrix: Vec<String>,
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Tool settings stored under `[tiller]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TillerSettings {
    #[serde(default = "default_test_root")]
    pub test_root: String,
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
    #[serde(default = "default_export_path")]
    pub export_path: String,
}

fn default_test_root() -> String {
    "spec".to_string()
}

fn default_file_suffix() -> String {
    "_spec.rb".to_string()
}

fn default_export_path() -> String {
    "set_test_suite.sh".to_string()
}

impl Default for TillerSettings {
    fn default() -> Self {
        Self {
            test_root: default_test_root(),
            file_suffix: default_file_suffix(),
            export_path: default_export_path(),
        }
    }
}

/// Reject bucket counts below one.
pub fn validate_bucket_count(count: i64) -> TillerResult<usize> {
    if count < 1 {
        return Err(TillerError::InvalidBucketCount(count));
    }
    usize::try_from(count).map_err(|_| TillerError::InvalidBucketCount(count))
}

impl MatrixDocument {
    pub fn from_file(path: &Path) -> TillerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| TillerError::Parse(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(content: &str) -> TillerResult<Self> {
        toml::from_str(content).map_err(|e| TillerError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> TillerResult<String> {
        toml::to_string_pretty(self).map_err(|e| TillerError::Serialize(e.to_string()))
    }

    /// Serialize and atomically replace the document at `path`.
    pub fn save(&self, path: &Path) -> TillerResult<()> {
        let content = self.to_toml_string()?;
        write_atomic(path, content.as_bytes())
    }

    /// Configured bucket count, defaulting to [`DEFAULT_NUM_BUILDS`].
    pub fn bucket_count(&self) -> TillerResult<usize> {
        validate_bucket_count(self.num_builds.unwrap_or(DEFAULT_NUM_BUILDS))
    }

    pub fn settings(&self) -> TillerSettings {
        self.tiller.clone().unwrap_or_default()
    }

    pub fn ignore_set(&self) -> TillerResult<BTreeSet<String>> {
        parse_ignore_set(&self.env.global)
    }

    /// The persisted assignment: one bucket per `TEST_SUITE` slot, in
    /// document order.
    pub fn assignment(&self) -> TillerResult<Assignment> {
        let buckets = MatrixEntry::parse_all(&self.env.matrix)?
            .iter()
            .filter(|e| e.is_bucket_slot())
            .map(MatrixEntry::test_suite)
            .collect();
        Ok(Assignment::new(buckets))
    }

    /// Write `assignment` into the bucket slots.
    ///
    /// Trailing surplus slots are removed and missing slots appended so
    /// that the slot count equals the assignment's bucket count. Entries
    /// without `TEST_SUITE` keep their position and text.
    pub fn set_assignment(&mut self, assignment: &Assignment) -> TillerResult<()> {
        let count = assignment.bucket_count();
        let mut entries = MatrixEntry::parse_all(&self.env.matrix)?;

        let slots: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_bucket_slot())
            .map(|(i, _)| i)
            .collect();

        if slots.len() > count {
            info!(previous = slots.len(), current = count, "dropping surplus bucket slots");
            let surplus: HashSet<usize> = slots[count..].iter().copied().collect();
            entries = entries
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !surplus.contains(i))
                .map(|(_, e)| e)
                .collect();
        } else if slots.len() < count {
            info!(previous = slots.len(), current = count, "appending bucket slots");
            entries.extend((slots.len()..count).map(|_| MatrixEntry::empty_slot()));
        }

        for (entry, ids) in entries
            .iter_mut()
            .filter(|e| e.is_bucket_slot())
            .zip(assignment.buckets())
        {
            entry.set_test_suite(ids);
        }

        self.env.matrix = entries.iter().map(MatrixEntry::render).collect();
        self.num_builds = Some(count as i64);
        Ok(())
    }
}

//! Test-file discovery.

use std::collections::BTreeSet;
use std::path::Path;

use tiller_core::{TillerError, TillerResult};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively list files under `root/test_root` whose names end with
/// `suffix`.
///
/// Identifiers are relative to `root` with `/` separators, so they start
/// with the test root (`spec/models/user_spec.rb`). The result is sorted
/// and free of duplicates. Paths containing whitespace are skipped with a
/// warning.
pub fn discover_test_files(root: &Path, test_root: &str, suffix: &str) -> TillerResult<Vec<String>> {
    let base = root.join(test_root);
    if !base.is_dir() {
        return Err(TillerError::TestRootNotFound(base.display().to_string()));
    }

    let mut files = BTreeSet::new();
    for entry in WalkDir::new(&base).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name_matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if !name_matches {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        // Ids are stored space-joined, so one with whitespace cannot round-trip.
        if id.contains(char::is_whitespace) {
            warn!(file = %id, "skipping test file with whitespace in its path");
            continue;
        }
        files.insert(id);
    }

    debug!(root = %base.display(), files = files.len(), "discovered test files");
    Ok(files.into_iter().collect())
}

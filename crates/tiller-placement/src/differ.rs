//! Previous assignment vs. observed file list.

use std::collections::{BTreeSet, HashSet};

use tiller_core::{Assignment, FileDiff};
use tracing::{debug, warn};

/// Drop every identifier in `ignored` from `files`, keeping order.
pub fn apply_ignore_set(files: &[String], ignored: &BTreeSet<String>) -> Vec<String> {
    if ignored.is_empty() {
        return files.to_vec();
    }
    let kept: Vec<String> = files
        .iter()
        .filter(|f| !ignored.contains(f.as_str()))
        .cloned()
        .collect();
    debug!(ignored = files.len() - kept.len(), "applied ignore set");
    kept
}

/// Set differences between the flattened `previous` assignment and
/// `current`.
///
/// An identifier held by two previous buckets counts as present as long
/// as it is still in `current`.
pub fn diff_assignment(previous: &Assignment, current: &[String]) -> FileDiff {
    let before: HashSet<&str> = previous.flattened().collect();
    let now: HashSet<&str> = current.iter().map(String::as_str).collect();

    let dupes = previous.duplicates();
    if !dupes.is_empty() {
        warn!(files = ?dupes, "previous assignment lists files in more than one bucket");
    }

    let removed = before
        .difference(&now)
        .map(|s| s.to_string())
        .collect::<BTreeSet<_>>();
    let added = now
        .difference(&before)
        .map(|s| s.to_string())
        .collect::<BTreeSet<_>>();

    debug!(removed = removed.len(), added = added.len(), "computed file diff");
    FileDiff { removed, added }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn set(v: &[&str]) -> BTreeSet<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn detects_added_and_removed() {
        let previous = Assignment::new(vec![ids(&["x", "y"]), ids(&["z"])]);
        let diff = diff_assignment(&previous, &ids(&["x", "z", "w"]));

        assert_eq!(diff.removed, set(&["y"]));
        assert_eq!(diff.added, set(&["w"]));
    }

    #[test]
    fn unchanged_lists_give_empty_diff() {
        let previous = Assignment::new(vec![ids(&["a"]), ids(&["b", "c"])]);
        let diff = diff_assignment(&previous, &ids(&["c", "b", "a"]));
        assert!(diff.is_empty());
    }

    #[test]
    fn empty_previous_adds_everything() {
        let diff = diff_assignment(&Assignment::empty(3), &ids(&["a", "b"]));
        assert!(diff.removed.is_empty());
        assert_eq!(diff.added, set(&["a", "b"]));
    }

    #[test]
    fn duplicated_previous_entry_still_present() {
        let previous = Assignment::new(vec![ids(&["dup", "a"]), ids(&["dup"])]);
        let diff = diff_assignment(&previous, &ids(&["dup", "a"]));
        assert!(diff.is_empty());
    }

    #[test]
    fn duplicate_current_entries_collapse() {
        let diff = diff_assignment(&Assignment::empty(1), &ids(&["a", "a"]));
        assert_eq!(diff.added, set(&["a"]));
    }

    #[test]
    fn ignore_set_filters_files() {
        let files = ids(&["spec/a_spec.rb", "spec/flaky_spec.rb", "spec/b_spec.rb"]);
        let kept = apply_ignore_set(&files, &set(&["spec/flaky_spec.rb"]));
        assert_eq!(kept, ids(&["spec/a_spec.rb", "spec/b_spec.rb"]));
    }

    #[test]
    fn empty_ignore_set_is_identity() {
        let files = ids(&["b", "a"]);
        assert_eq!(apply_ignore_set(&files, &BTreeSet::new()), files);
    }
}

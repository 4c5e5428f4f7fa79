//! Duration extraction from profiler output.
//!
//! Input lines look like:
//!
//! ```text
//! Walnuts
//!   9.96 seconds average (69.69 seconds / 7 examples) ./spec/features/walnut_spec.rb:3
//! ```
//!
//! which yields `("spec/features/walnut_spec.rb", 69.69)`.

use std::collections::HashSet;

use regex::Regex;
use tiller_core::{TestFile, TillerResult};
use tracing::{debug, warn};

/// Scans profiler text for `(duration ... ./<test_root>/path:line` matches.
#[derive(Debug, Clone)]
pub struct DurationExtractor {
    pattern: Regex,
}

impl DurationExtractor {
    /// Build an extractor for paths under `test_root` (e.g. `spec`).
    pub fn new(test_root: &str) -> TillerResult<Self> {
        let pattern = Regex::new(&format!(
            r"(?m)\s\(([0-9.]*)\s.*\./({}/[^:\s]*)",
            regex::escape(test_root.trim_end_matches('/'))
        ))?;
        Ok(Self { pattern })
    }

    /// Extract files, deduplicated by identifier (first occurrence wins)
    /// and sorted longest first. Ties keep source order.
    pub fn extract(&self, text: &str) -> Vec<TestFile> {
        let mut seen = HashSet::new();
        let mut files: Vec<TestFile> = self
            .pattern
            .captures_iter(text)
            .filter(|caps| seen.insert(caps[2].to_string()))
            .map(|caps| {
                let id = caps[2].to_string();
                let duration = parse_duration(&caps[1], &id);
                TestFile::new(id, duration)
            })
            .collect();

        files.sort_by(|a, b| b.duration.total_cmp(&a.duration));
        debug!(files = files.len(), "extracted durations from profiler output");
        files
    }
}

/// Unparsable durations count as zero rather than aborting the run.
fn parse_duration(raw: &str, id: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(d) if d.is_finite() && d >= 0.0 => d,
        _ => {
            warn!(file = id, raw, "malformed duration in profiler output, using 0");
            0.0
        }
    }
}

/// Convenience wrapper around [`DurationExtractor`].
pub fn extract_durations(text: &str, test_root: &str) -> TillerResult<Vec<TestFile>> {
    Ok(DurationExtractor::new(test_root)?.extract(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = "\
Top 3 slowest example groups:
  Walnuts
    9.96 seconds average (69.69 seconds / 7 examples) ./spec/features/walnut_spec.rb:3
  Pecans
    1.10 seconds average (3.30 seconds / 3 examples) ./spec/models/pecan_spec.rb:1
  Almonds
    2.00 seconds average (12.00 seconds / 6 examples) ./spec/models/almond_spec.rb:7
";

    #[test]
    fn extracts_total_duration_and_path() {
        let files = extract_durations(PROFILE, "spec").unwrap();

        assert_eq!(files.len(), 3);
        assert_eq!(files[0], TestFile::new("spec/features/walnut_spec.rb", 69.69));
    }

    #[test]
    fn sorts_longest_first() {
        let files = extract_durations(PROFILE, "spec").unwrap();
        let ids: Vec<_> = files.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(
            ids,
            vec![
                "spec/features/walnut_spec.rb",
                "spec/models/almond_spec.rb",
                "spec/models/pecan_spec.rb",
            ]
        );
    }

    #[test]
    fn keeps_first_occurrence_of_duplicates() {
        let text = "\
  A (5.0 seconds / 1 example) ./spec/a_spec.rb:1
  A again (9.0 seconds / 1 example) ./spec/a_spec.rb:20
";
        let files = extract_durations(text, "spec").unwrap();

        assert_eq!(files, vec![TestFile::new("spec/a_spec.rb", 5.0)]);
    }

    #[test]
    fn malformed_duration_becomes_zero() {
        let text = "\
  Bad (1.2.3 seconds / 1 example) ./spec/bad_spec.rb:1
  Good (4.0 seconds / 2 examples) ./spec/good_spec.rb:1
";
        let files = extract_durations(text, "spec").unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0], TestFile::new("spec/good_spec.rb", 4.0));
        assert_eq!(files[1], TestFile::new("spec/bad_spec.rb", 0.0));
    }

    #[test]
    fn path_without_line_number_ends_at_line_end() {
        let text = "  Group (2.5 seconds / 1 example) ./spec/no_line_spec.rb\n";
        let files = extract_durations(text, "spec").unwrap();

        assert_eq!(files, vec![TestFile::new("spec/no_line_spec.rb", 2.5)]);
    }

    #[test]
    fn ignores_paths_outside_test_root() {
        let text = "  Lib (3.0 seconds / 1 example) ./lib/thing.rb:4\n";
        assert!(extract_durations(text, "spec").unwrap().is_empty());
    }

    #[test]
    fn no_matches_is_empty_not_error() {
        let files = extract_durations("Finished in 0.1 seconds\n0 failures", "spec").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn custom_test_root() {
        let text = "  T (1.5 seconds / 1 example) ./test/unit/foo_test.rb:2\n";
        let files = extract_durations(text, "test").unwrap();
        assert_eq!(files, vec![TestFile::new("test/unit/foo_test.rb", 1.5)]);
    }
}

//! Human-readable and JSON distribution summaries.

use serde::Serialize;
use tiller_core::Bucket;
use tiller_placement::{BucketSummary, makespan, summarize};

#[derive(Debug, Serialize)]
pub struct DistributionReport {
    pub buckets: Vec<BucketSummary>,
    pub makespan: f64,
}

impl DistributionReport {
    pub fn new(buckets: &[Bucket]) -> Self {
        Self {
            buckets: summarize(buckets),
            makespan: makespan(buckets),
        }
    }
}

pub fn format_distribution(buckets: &[Bucket]) -> String {
    let mut out = String::new();
    let files: usize = buckets.iter().map(Bucket::len).sum();

    out.push_str(&format!("\nDistributed {files} spec files across {} builds:\n\n", buckets.len()));
    for b in summarize(buckets) {
        out.push_str(&format!(
            "  build {:<3} {:>5} files  {:>10.2}s\n",
            b.index, b.files, b.total_duration
        ));
    }
    out.push_str(&format!("\n  makespan: {:.2}s\n", makespan(buckets)));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiller_core::TestFile;

    #[test]
    fn text_report_lists_each_build() {
        let buckets = tiller_placement::distribute(
            &[TestFile::new("a", 10.0), TestFile::new("b", 4.5)],
            2,
        )
        .unwrap();

        let out = format_distribution(&buckets);

        assert!(out.contains("Distributed 2 spec files across 2 builds"));
        assert!(out.contains("build 0"));
        assert!(out.contains("build 1"));
        assert!(out.contains("makespan: 10.00s"));
    }

    #[test]
    fn json_report_has_makespan() {
        let buckets = tiller_placement::distribute(&[TestFile::new("a", 3.0)], 2).unwrap();
        let json = serde_json::to_value(DistributionReport::new(&buckets)).unwrap();

        assert_eq!(json["makespan"], 3.0);
        assert_eq!(json["buckets"].as_array().unwrap().len(), 2);
    }
}

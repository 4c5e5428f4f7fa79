use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tiller_core::{Assignment, TestFile};
use tracing::warn;

use super::{load_document, resolve_bucket_count};
use crate::report;

pub fn distribute(config: &Path, profile: &str, builds: Option<i64>, format: &str) -> anyhow::Result<()> {
    let mut doc = load_document(config)?;
    let settings = doc.settings();
    let bucket_count = resolve_bucket_count(&doc, builds)?;
    let ignored = doc.ignore_set()?;

    let text = read_profile(profile)?;
    let files: Vec<TestFile> = tiller_profile::extract_durations(&text, &settings.test_root)?
        .into_iter()
        .filter(|f| !ignored.contains(&f.id))
        .collect();
    if files.is_empty() {
        warn!(profile, "no test files found in profiler output");
    }

    let buckets = tiller_placement::distribute(&files, bucket_count)?;
    doc.set_assignment(&Assignment::from_buckets(&buckets))?;
    doc.save(config)
        .with_context(|| format!("writing {}", config.display()))?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report::DistributionReport::new(&buckets))?);
        }
        _ => {
            println!("{}", report::format_distribution(&buckets));
        }
    }

    Ok(())
}

fn read_profile(profile: &str) -> anyhow::Result<String> {
    if profile == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading profiler output from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(profile).with_context(|| format!("reading profiler output {profile}"))
}

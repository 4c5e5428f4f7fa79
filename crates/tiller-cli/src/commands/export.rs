use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use rand::Rng;
use tiller_core::persist::write_atomic;
use tracing::{info, warn};

use super::load_document;

/// Environment variable naming the bucket this CI job runs.
const BUCKET_ENV: &str = "TILLER_BUCKET";

pub fn export(config: &Path, bucket: Option<String>, output: Option<&Path>) -> anyhow::Result<()> {
    let doc = load_document(config)?;
    let assignment = doc.assignment()?;
    let Some(bucket_count) = NonZeroUsize::new(assignment.bucket_count()) else {
        bail!("{} has no TEST_SUITE entries to export", config.display());
    };

    let requested = bucket.or_else(|| std::env::var(BUCKET_ENV).ok());
    let index = select_bucket(requested.as_deref(), bucket_count, &mut rand::thread_rng());
    let ids = assignment.bucket(index).unwrap_or_default();

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(doc.settings().export_path));
    write_atomic(&output, export_line(ids).as_bytes())
        .with_context(|| format!("writing {}", output.display()))?;

    info!(bucket = index, files = ids.len(), path = %output.display(), "exported test suite");
    Ok(())
}

/// The requested bucket when it parses and is in range, else a random one.
fn select_bucket<R: Rng>(requested: Option<&str>, bucket_count: NonZeroUsize, rng: &mut R) -> usize {
    if let Some(raw) = requested {
        match raw.trim().parse::<usize>() {
            Ok(index) if index < bucket_count.get() => return index,
            _ => warn!(requested = raw, bucket_count, "invalid bucket index, picking one at random"),
        }
    }
    tiller_placement::random_bucket(bucket_count, rng)
}

fn export_line(ids: &[String]) -> String {
    format!("export TEST_SUITE=\"{}\"\n", ids.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn requested_bucket_in_range_wins() {
        let mut rng = StdRng::seed_from_u64(1);
        let three = NonZeroUsize::new(3).unwrap();
        assert_eq!(select_bucket(Some("2"), three, &mut rng), 2);
        assert_eq!(select_bucket(Some(" 0 "), three, &mut rng), 0);
    }

    #[test]
    fn invalid_request_falls_back_to_random() {
        let mut rng = StdRng::seed_from_u64(1);
        let three = NonZeroUsize::new(3).unwrap();
        for raw in [Some("7"), Some("-1"), Some("abc"), None] {
            assert!(select_bucket(raw, three, &mut rng) < 3);
        }
    }

    #[test]
    fn export_line_quotes_suite() {
        let ids = vec!["spec/a_spec.rb".to_string(), "spec/b_spec.rb".to_string()];
        assert_eq!(export_line(&ids), "export TEST_SUITE=\"spec/a_spec.rb spec/b_spec.rb\"\n");
        assert_eq!(export_line(&[]), "export TEST_SUITE=\"\"\n");
    }
}

use std::path::Path;
use std::process::Command;

use anyhow::{Context, bail};
use tracing::info;

use super::{load_document, resolve_bucket_count};

pub fn sync(config: &Path, root: &Path, builds: Option<i64>, git_add: bool) -> anyhow::Result<()> {
    let mut doc = load_document(config)?;
    let settings = doc.settings();
    let bucket_count = resolve_bucket_count(&doc, builds)?;
    let ignored = doc.ignore_set()?;
    let previous = doc.assignment()?;

    println!("\nSyncing list of spec files...");

    let current = tiller_profile::discover_test_files(root, &settings.test_root, &settings.file_suffix)?;
    let (next, diff) = tiller_placement::synchronize(
        &previous,
        &current,
        &ignored,
        bucket_count,
        &mut rand::thread_rng(),
    )?;

    doc.set_assignment(&next)?;
    doc.save(config)
        .with_context(|| format!("writing {}", config.display()))?;
    println!("{}", diff.summary());

    if git_add {
        stage(config)?;
    }

    Ok(())
}

fn stage(config: &Path) -> anyhow::Result<()> {
    let status = Command::new("git")
        .arg("add")
        .arg(config)
        .status()
        .context("running git add")?;
    if !status.success() {
        bail!("git add {} failed: {status}", config.display());
    }
    info!(path = %config.display(), "staged document");
    Ok(())
}

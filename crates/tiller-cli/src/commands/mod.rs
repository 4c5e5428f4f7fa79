pub mod distribute;
pub mod export;
pub mod sync;

use std::path::Path;

use anyhow::Context;
use tiller_core::{MatrixDocument, validate_bucket_count};

pub fn load_document(path: &Path) -> anyhow::Result<MatrixDocument> {
    MatrixDocument::from_file(path).with_context(|| format!("reading {}", path.display()))
}

/// Bucket count from `--builds` if given, otherwise from the document.
pub fn resolve_bucket_count(doc: &MatrixDocument, builds: Option<i64>) -> anyhow::Result<usize> {
    let count = match builds {
        Some(n) => validate_bucket_count(n)?,
        None => doc.bucket_count()?,
    };
    Ok(count)
}

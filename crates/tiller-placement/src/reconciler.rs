//! Incremental reconciliation of an existing assignment.
//!
//! Order of operations:
//! 1. Align the bucket count (truncate trailing buckets or pad with empties)
//! 2. Filter removed files out of every bucket, in place
//! 3. Append each added file to a uniformly random bucket
//!
//! A file that survives never changes bucket. New files are placed at
//! random because their durations are unknown at sync time.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use rand::Rng;
use tiller_core::{Assignment, FileDiff, TillerError, TillerResult};
use tracing::{debug, info, warn};

use crate::differ::{apply_ignore_set, diff_assignment};

/// Truncate or pad `assignment` to exactly `bucket_count` buckets.
///
/// Contents of truncated buckets are discarded, not redistributed.
pub fn align_bucket_count(assignment: &mut Assignment, bucket_count: usize) {
    let current = assignment.bucket_count();
    let buckets = assignment.buckets_mut();

    if current > bucket_count {
        let dropped: usize = buckets[bucket_count..].iter().map(Vec::len).sum();
        buckets.truncate(bucket_count);
        warn!(
            previous = current,
            current = bucket_count,
            dropped_files = dropped,
            "bucket count shrank; trailing buckets discarded"
        );
    } else if current < bucket_count {
        buckets.resize_with(bucket_count, Vec::new);
        info!(previous = current, current = bucket_count, "bucket count grew; padded with empty buckets");
    }
}

/// Uniformly random index in `0..bucket_count`.
pub fn random_bucket<R: Rng>(bucket_count: NonZeroUsize, rng: &mut R) -> usize {
    rng.gen_range(0..bucket_count.get())
}

/// Apply `diff` to `previous`, producing an assignment with exactly
/// `bucket_count` buckets.
pub fn reconcile<R: Rng>(
    previous: &Assignment,
    diff: &FileDiff,
    bucket_count: usize,
    rng: &mut R,
) -> TillerResult<Assignment> {
    let Some(count) = NonZeroUsize::new(bucket_count) else {
        return Err(TillerError::InvalidBucketCount(0));
    };

    let mut next = previous.clone();
    align_bucket_count(&mut next, bucket_count);

    for bucket in next.buckets_mut().iter_mut() {
        bucket.retain(|id| !diff.removed.contains(id));
    }

    for id in &diff.added {
        let index = random_bucket(count, rng);
        debug!(file = %id, bucket = index, "added file");
        next.buckets_mut()[index].push(id.clone());
    }

    info!(
        removed = diff.removed.len(),
        added = diff.added.len(),
        buckets = bucket_count,
        "reconciled assignment"
    );
    Ok(next)
}

/// Full sync: subtract `ignored` from `current`, diff against `previous`,
/// and reconcile.
pub fn synchronize<R: Rng>(
    previous: &Assignment,
    current: &[String],
    ignored: &BTreeSet<String>,
    bucket_count: usize,
    rng: &mut R,
) -> TillerResult<(Assignment, FileDiff)> {
    let current = apply_ignore_set(current, ignored);
    let diff = diff_assignment(previous, &current);
    let next = reconcile(previous, &diff, bucket_count, rng)?;
    Ok((next, diff))
}

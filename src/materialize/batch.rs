//! Loading many images at once without losing their order

use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;

use super::encode::{display_name, is_svg, normalize_to_png};
use super::upload::{read_upload, UploadFile};
use crate::error::MaterializeError;
use crate::roster::fetch::Fetch;
use crate::state::data::ImageEntry;

/// Result of a batch: every load has settled, successes in input order
#[derive(Debug, Default, Clone)]
pub struct BatchOutcome {
    pub entries: Vec<ImageEntry>,
    /// Loads that failed and were left out
    pub skipped: usize,
}

/// Fetch one roster image and normalize it to PNG
pub async fn materialize_remote<F: Fetch>(source: &F, path: &str) -> Result<ImageEntry, MaterializeError> {
    let response = source.get(path).await?;
    if !response.is_success() {
        return Err(MaterializeError::Status {
            path: path.to_string(),
            status: response.status,
        });
    }

    let svg = is_svg(path, response.content_type.as_deref());
    let body = response.body;

    // Decoding is CPU-bound
    let encoded = tokio::task::spawn_blocking(move || normalize_to_png(&body, svg)).await??;

    Ok(ImageEntry::new(encoded, display_name(path)))
}

/// Materialize roster images concurrently; the board order follows `paths`
#[tracing::instrument(skip(source, paths), fields(images = paths.len()))]
pub async fn materialize_roster<F: Fetch>(source: Arc<F>, paths: Vec<String>, limit: usize) -> BatchOutcome {
    let jobs = paths.into_iter().map(|path| {
        let source = Arc::clone(&source);
        let label = path.clone();
        (label, async move { materialize_remote(source.as_ref(), &path).await })
    });

    run_ordered(jobs, limit).await
}

/// Read uploads concurrently; the board order follows `files`
#[tracing::instrument(skip(files), fields(files = files.len()))]
pub async fn materialize_uploads(files: Vec<UploadFile>, limit: usize) -> BatchOutcome {
    let jobs = files
        .into_iter()
        .map(|file| (file.path.display().to_string(), read_upload(file)));

    run_ordered(jobs, limit).await
}

/// Run at most `limit` loads at a time, then put the results back in input order.
///
/// Completion order is irrelevant: each result carries the index of the job
/// that produced it. Failures are logged and skipped.
async fn run_ordered<Fut>(jobs: impl IntoIterator<Item = (String, Fut)>, limit: usize) -> BatchOutcome
where
    Fut: Future<Output = Result<ImageEntry, MaterializeError>> + Send + 'static,
{
    let limit = limit.max(1);
    let mut set = JoinSet::new();
    let mut loaded = Vec::new();
    let mut skipped = 0;

    for (index, (label, job)) in jobs.into_iter().enumerate() {
        if set.len() >= limit {
            if let Some(done) = set.join_next().await {
                settle(done, &mut loaded, &mut skipped);
            }
        }
        set.spawn(async move { (index, label, job.await) });
    }

    while let Some(done) = set.join_next().await {
        settle(done, &mut loaded, &mut skipped);
    }

    loaded.sort_by_key(|(index, _)| *index);
    let entries: Vec<ImageEntry> = loaded.into_iter().map(|(_, entry)| entry).collect();

    tracing::info!(loaded = entries.len(), skipped, "batch settled");
    BatchOutcome { entries, skipped }
}

fn settle(
    done: Result<(usize, String, Result<ImageEntry, MaterializeError>), tokio::task::JoinError>,
    loaded: &mut Vec<(usize, ImageEntry)>,
    skipped: &mut usize,
) {
    match done {
        Ok((index, _, Ok(entry))) => loaded.push((index, entry)),
        Ok((_, label, Err(err))) => {
            tracing::warn!(image = %label, error = %err, "failed to load image, skipping");
            *skipped += 1;
        }
        Err(err) => {
            tracing::warn!(error = %err, "image load task failed, skipping");
            *skipped += 1;
        }
    }
}

use std::future::Future;

use tokio::task::JoinSet;

use crate::artifact::{Artifact, ArtifactSet};
use crate::error::Result;

/// Runs `worker` once per key, all keys concurrently, and merges the batches
/// into one deduplicated result in completion order.
///
/// The first failed worker decides the overall outcome: its error is returned
/// at once and anything merged so far is discarded. Dropping the task set on
/// that early return aborts the workers still in flight.
pub(crate) async fn fan_out<F, Fut>(keys: Vec<String>, worker: F) -> Result<Vec<Artifact>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<Artifact>>> + Send + 'static,
{
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let mut tasks = JoinSet::new();
    for key in keys {
        tasks.spawn(worker(key));
    }

    let mut artifacts = ArtifactSet::new();
    while let Some(completion) = tasks.join_next().await {
        match completion {
            Ok(Ok(batch)) => artifacts.merge(batch),
            Ok(Err(error)) => return Err(error),
            Err(join_error) if join_error.is_panic() => {
                std::panic::resume_unwind(join_error.into_panic())
            }
            // cancellation only happens by dropping the set, and we hold it
            Err(_) => {}
        }
    }

    Ok(artifacts.into_vec())
}

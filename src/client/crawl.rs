use tracing::trace;

use crate::artifact::{Artifact, ArtifactSet};
use crate::client::payload::{self, SearchResponse};
use crate::client::transport::Transport;
use crate::error::Result;
use crate::search::Parameters;
use crate::util::join_query;

pub(crate) const SEARCH_PATH: &str = "service/local/lucene/search";

/// Drives one filtered search to exhaustion and returns the deduplicated
/// results in first-seen order.
///
/// The server pages its answers, but neither `totalCount` nor the GAV
/// grouping says how many files a page covered, and groups may straddle
/// pages. The one safe advance is the number of groups on the page: every
/// group holds at least one file, so the offset never overshoots, and the
/// set absorbs whatever gets fetched twice.
pub(crate) async fn read_artifacts_where<T: Transport>(
    transport: &T,
    mut filter: Parameters,
) -> Result<Vec<Artifact>> {
    let mut artifacts = ArtifactSet::new();
    let mut from = 0;

    // even a filter expected to match nothing gets its one fetch
    loop {
        filter.insert("from".to_string(), from.to_string());

        let body = transport.fetch(SEARCH_PATH, &filter).await?;
        let payload: SearchResponse =
            payload::decode(&body, &join_query(SEARCH_PATH, &filter))?;
        let groups = payload.data.len();

        artifacts.merge(weed_out_poms(payload::extract_artifacts(&payload), &filter));

        trace!("search page at offset {} held {} groups", from, groups);
        if groups == 0 {
            break;
        }
        from += groups;
    }

    Ok(artifacts.into_vec())
}

/// The server mixes every matching project's POM into search results, even
/// when the query names a packaging or classifier no POM can have. Those
/// spurious hits are weeded out here; queries that could legitimately want
/// POMs keep them.
fn weed_out_poms(artifacts: Vec<Artifact>, filter: &Parameters) -> Vec<Artifact> {
    let packaging = filter.get("p").map(String::as_str);
    let classifier_constrained = filter.contains_key("c");

    artifacts
        .into_iter()
        .filter(|artifact| {
            if artifact.extension != "pom" {
                return true;
            }
            if packaging.is_some_and(|packaging| packaging != "pom") {
                return false;
            }
            // any classifier constraint rules POMs out, they never have one
            !classifier_constrained
        })
        .collect()
}

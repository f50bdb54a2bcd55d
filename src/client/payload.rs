//! Schemas of the JSON answers this crate consumes, and the flattening of
//! those answers into the crate's own types. Fields the server sends beyond
//! these are ignored; fields it omits fall back to empty.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::artifact::Artifact;
use crate::error::{Error, Result};
use crate::repository::Repository;

/// Decodes a JSON body, attributing failures to `context` (the URL or
/// server-relative path the body came from).
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8], context: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        url: context.to_string(),
        source,
    })
}

/// One page of `lucene/search` results: GAV groups wrapping the individual
/// files. The `totalCount` field is deliberately not modeled, it counts
/// neither groups nor files and is useless for paging.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SearchResponse {
    pub(crate) data: Vec<GavGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct GavGroup {
    pub(crate) group_id: String,
    pub(crate) artifact_id: String,
    pub(crate) version: String,
    pub(crate) artifact_hits: Vec<ArtifactHit>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ArtifactHit {
    pub(crate) repository_id: String,
    pub(crate) artifact_links: Vec<ArtifactLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ArtifactLink {
    pub(crate) extension: String,
    pub(crate) classifier: String,
}

/// Flattens a search page: every link of every hit becomes one artifact,
/// carrying its group's coordinates and its hit's repository id.
pub(crate) fn extract_artifacts(payload: &SearchResponse) -> Vec<Artifact> {
    let mut artifacts = Vec::new();

    for group in &payload.data {
        for hit in &group.artifact_hits {
            for link in &hit.artifact_links {
                artifacts.push(Artifact {
                    group_id: group.group_id.clone(),
                    artifact_id: group.artifact_id.clone(),
                    version: group.version.clone(),
                    classifier: link.classifier.clone(),
                    extension: link.extension.clone(),
                    repository_id: hit.repository_id.clone(),
                });
            }
        }
    }

    artifacts
}

/// A `content/` directory listing. Entries are files and directories mixed;
/// `leaf` tells them apart.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ContentListing {
    pub(crate) data: Vec<ContentEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ContentEntry {
    pub(crate) leaf: bool,
    pub(crate) text: String,
}

/// The names of the non-leaf entries, i.e. the listed directory's
/// subdirectories.
pub(crate) fn extract_directories(payload: ContentListing) -> Vec<String> {
    payload
        .data
        .into_iter()
        .filter(|entry| !entry.leaf)
        .map(|entry| entry.text)
        .collect()
}

/// The `repositories` listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RepositoryListing {
    pub(crate) data: Vec<RepositoryEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RepositoryEntry {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) repo_type: String,
    pub(crate) repo_policy: String,
    pub(crate) format: String,
    pub(crate) remote_uri: String,
}

pub(crate) fn extract_repositories(payload: RepositoryListing) -> Vec<Repository> {
    payload
        .data
        .into_iter()
        .map(|entry| Repository {
            id: entry.id,
            name: entry.name,
            kind: entry.repo_type,
            format: entry.format,
            policy: entry.repo_policy,
            remote_uri: entry.remote_uri,
        })
        .collect()
}

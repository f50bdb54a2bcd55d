use std::collections::HashSet;
use std::fmt;

/// A full Maven coordinate to a single file, plus the repository it was found
/// in. The same coordinates served by two repositories are two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Qualifier such as `sources` or `javadoc`; empty when unclassified.
    pub classifier: String,
    /// File extension, e.g. `jar` or `pom`.
    pub extension: String,
    /// Id of the repository this artifact was found in.
    pub repository_id: String,
}

impl Artifact {
    /// Whether this is the project descriptor itself rather than one of the
    /// project's build outputs. POMs never carry a classifier.
    pub fn is_pom(&self) -> bool {
        self.classifier.is_empty() && self.extension == "pom"
    }

    /// Canonical key for deduplication. Not shown to users.
    fn identity(&self) -> String {
        [
            self.group_id.as_str(),
            self.artifact_id.as_str(),
            self.version.as_str(),
            self.extension.as_str(),
            self.classifier.as_str(),
            self.repository_id.as_str(),
        ]
        .join(":")
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group_id, self.artifact_id, self.version, self.extension
        )?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        Ok(())
    }
}

/// An insertion-ordered artifact set: keeps the first occurrence of every
/// identity and silently drops later duplicates.
///
/// Searches with overlapping filters merge their batches here without
/// double-counting, and re-merging a batch is a no-op.
#[derive(Debug, Default)]
pub(crate) struct ArtifactSet {
    data: Vec<Artifact>,
    seen: HashSet<String>,
}

impl ArtifactSet {
    pub(crate) fn new() -> ArtifactSet {
        ArtifactSet::default()
    }

    /// Adds every artifact of `batch` that has not been seen yet, in batch
    /// order.
    pub(crate) fn merge(&mut self, batch: Vec<Artifact>) {
        for artifact in batch {
            if self.seen.insert(artifact.identity()) {
                self.data.push(artifact);
            }
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Artifact> {
        self.data
    }
}

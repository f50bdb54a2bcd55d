use std::fmt;

/// A repository in a Nexus instance. The server reports more fields than
/// these, but these cover most uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the repository holds, e.g. `hosted`, `proxy` or `virtual`.
    pub kind: String,
    /// Content format, e.g. `maven2`.
    pub format: String,
    /// Deployment policy, e.g. `RELEASE` or `SNAPSHOT`.
    pub policy: String,
    /// Upstream URI for proxy repositories; empty otherwise.
    pub remote_uri: String,
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ('{}'){{ {}, {} format, {} policy",
            self.id, self.name, self.kind, self.format, self.policy
        )?;
        if !self.remote_uri.is_empty() {
            write!(f, ", points to {}", self.remote_uri)?;
        }
        write!(f, " }}")
    }
}

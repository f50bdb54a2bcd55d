use std::collections::BTreeMap;

/// Flat query parameters in the shape the search API expects. Ordered, so
/// rendered URLs come out deterministic.
pub type Parameters = BTreeMap<String, String>;

/// Maven coordinates to search by. Unset fields are left out of the query
/// entirely; an explicit `Some("")` is sent as an empty parameter, which the
/// server treats differently from an absent one.
///
/// The server wants at least one of group id, artifact id or version set, and
/// coordinate searches match Maven projects, not files: asking for packaging
/// `pom` finds the artifacts of projects packaged as POMs, not every file
/// with a `pom` extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Coordinates {
    /// Group id, e.g. `com.sun*`. Wildcards are allowed.
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// The project's packaging, e.g. `jar` or `pom`. Not the same as an
    /// artifact's extension.
    pub packaging: Option<String>,
    /// Classifier, e.g. `sources`.
    pub classifier: Option<String>,
}

/// What to search for.
///
/// Each variant compiles to the parameter map of one of the server's search
/// flavors; [`Criteria::InRepository`] wraps any other criteria to scope it
/// to a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    /// No restrictions. The server cannot answer this in one search, so the
    /// client expands it over every hosted repository.
    All,
    /// Search by Maven coordinates.
    Coordinates(Coordinates),
    /// Free-text keyword search.
    Keyword(String),
    /// Search by fully qualified class name.
    Classname(String),
    /// Search by SHA1 checksum.
    Checksum(String),
    /// Everything in one repository.
    Repository(String),
    /// Any other criteria, scoped to one repository. The given repository id
    /// wins if the inner criteria sets one too.
    InRepository {
        repository_id: String,
        criteria: Box<Criteria>,
    },
}

impl Criteria {
    /// Compiles this criteria to the flat parameter map the server expects.
    pub fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();

        match self {
            Criteria::All => {}
            Criteria::Coordinates(coordinates) => {
                let fields = [
                    ("g", &coordinates.group_id),
                    ("a", &coordinates.artifact_id),
                    ("v", &coordinates.version),
                    ("p", &coordinates.packaging),
                    ("c", &coordinates.classifier),
                ];
                for (key, value) in fields {
                    if let Some(value) = value {
                        params.insert(key.to_string(), value.clone());
                    }
                }
            }
            Criteria::Keyword(keyword) => {
                params.insert("q".to_string(), keyword.clone());
            }
            Criteria::Classname(classname) => {
                params.insert("cn".to_string(), classname.clone());
            }
            Criteria::Checksum(sha1) => {
                params.insert("sha1".to_string(), sha1.clone());
            }
            Criteria::Repository(repository_id) => {
                params.insert("repositoryId".to_string(), repository_id.clone());
            }
            Criteria::InRepository {
                repository_id,
                criteria,
            } => {
                params = criteria.parameters();
                params.insert("repositoryId".to_string(), repository_id.clone());
            }
        }

        params
    }
}

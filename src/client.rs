use std::sync::Arc;

use tracing::debug;

use crate::artifact::Artifact;
use crate::client::crawl::read_artifacts_where;
use crate::client::fan_out::fan_out;
use crate::client::transport::{HttpTransport, Transport};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::repository::Repository;
use crate::search::{Criteria, Parameters};

pub mod transport;

mod crawl;
mod fan_out;
mod payload;

pub(crate) const REPOSITORIES_PATH: &str = "service/local/repositories";

/// A client for a Nexus v2.x instance.
///
/// The interesting entry point is [`artifacts`](Nexus2x::artifacts): the v2
/// search API cannot answer "give me everything" directly, so the broad
/// queries are expanded into many narrow searches that run concurrently and
/// merge into one deduplicated result.
///
/// Cloning is cheap and clones share the underlying transport.
pub struct Nexus2x<T: Transport = HttpTransport> {
    transport: Arc<T>,
}

impl<T: Transport> Clone for Nexus2x<T> {
    fn clone(&self) -> Nexus2x<T> {
        Nexus2x {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Nexus2x<HttpTransport> {
    /// A client for the instance at `base_url`, e.g.
    /// `https://nexus.somewhere.com:8080/nexus`.
    pub fn new(base_url: String, credentials: Credentials) -> Result<Nexus2x> {
        Ok(Nexus2x::with_transport(Arc::new(HttpTransport::new(
            base_url,
            credentials,
        )?)))
    }

    /// A client which uses the given credentials to access the same
    /// instance, without modifying the original client.
    pub fn with_credentials(&self, credentials: Credentials) -> Nexus2x {
        Nexus2x::with_transport(Arc::new(self.transport.with_credentials(credentials)))
    }
}

impl<T: Transport> Nexus2x<T> {
    /// A client over a caller-provided transport.
    pub fn with_transport(transport: Arc<T>) -> Nexus2x<T> {
        Nexus2x { transport }
    }

    /// Returns all artifacts in this instance which satisfy `criteria`.
    ///
    /// A specific criteria turns into a single paginated search. The two
    /// broad shapes get expanded instead: a bare repository id fans out over
    /// the repository's first-level directories, and no restrictions at all
    /// fans out over every hosted repository.
    pub async fn artifacts(&self, criteria: Criteria) -> Result<Vec<Artifact>> {
        let params = criteria.parameters();

        if params.is_empty() {
            return self.read_all_artifacts().await;
        }

        if params.len() == 1 {
            if let Some(repository_id) = params.get("repositoryId") {
                return self.read_artifacts_from(repository_id.clone()).await;
            }
        }

        read_artifacts_where(self.transport.as_ref(), params).await
    }

    /// Returns all repositories in this instance.
    pub async fn repositories(&self) -> Result<Vec<Repository>> {
        let body = self
            .transport
            .fetch(REPOSITORIES_PATH, &Parameters::new())
            .await?;
        let listing: payload::RepositoryListing = payload::decode(&body, REPOSITORIES_PATH)?;

        Ok(payload::extract_repositories(listing))
    }

    /// Returns the first-level directories in the given repository.
    async fn first_level_dirs_of(&self, repository_id: &str) -> Result<Vec<String>> {
        // without the trailing slash the server answers XML, whatever the
        // Accept header says
        let path = format!("{REPOSITORIES_PATH}/{repository_id}/content/");

        let body = self.transport.fetch(&path, &Parameters::new()).await?;
        let listing: payload::ContentListing = payload::decode(&body, &path)?;

        Ok(payload::extract_directories(listing))
    }

    /// Returns all artifacts in the given repository.
    ///
    /// Old server versions answered a bare `*` search with everything they
    /// had; newer ones refuse it without offering a replacement. Coverage is
    /// rebuilt from below instead: every artifact's group id starts with one
    /// of the repository's first-level directory names, so one group-prefix
    /// search per directory reaches them all. Prefixes may overlap (results
    /// under `common*` appear under `com*` too), which the merge dedups.
    async fn read_artifacts_from(&self, repository_id: String) -> Result<Vec<Artifact>> {
        let dirs = self.first_level_dirs_of(&repository_id).await?;
        debug!(
            "expanding repository {} over {} first-level directories",
            repository_id,
            dirs.len()
        );

        fan_out(dirs, move |dir| {
            let nexus = self.clone();
            let repository_id = repository_id.clone();
            async move {
                let mut filter = Parameters::new();
                filter.insert("g".to_string(), format!("{dir}*"));
                filter.insert("repositoryId".to_string(), repository_id);

                read_artifacts_where(nexus.transport.as_ref(), filter).await
            }
        })
        .await
    }

    /// Returns the ids of this instance's hosted repositories, the ones
    /// whose artifacts live here rather than in some proxied upstream.
    async fn hosted_repositories(&self) -> Result<Vec<String>> {
        let repositories = self.repositories().await?;

        Ok(repositories
            .into_iter()
            .filter(|repository| repository.kind == "hosted")
            .map(|repository| repository.id)
            .collect())
    }

    /// Returns all artifacts hosted in this instance: one repository
    /// expansion per hosted repository, fanned out concurrently.
    async fn read_all_artifacts(&self) -> Result<Vec<Artifact>> {
        let hosted = self.hosted_repositories().await?;
        debug!("expanding a full search over {} hosted repositories", hosted.len());

        fan_out(hosted, move |repository_id| {
            let nexus = self.clone();
            async move { nexus.read_artifacts_from(repository_id).await }
        })
        .await
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::client::crawl::SEARCH_PATH;
    use crate::client::transport::ScriptedTransport;
    use crate::error::Error;
    use crate::search::Coordinates;

    use super::*;

    fn scripted() -> (Nexus2x<ScriptedTransport>, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());

        (Nexus2x::with_transport(Arc::clone(&transport)), transport)
    }

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn group_with_links(
        group_id: &str,
        artifact_id: &str,
        repository_id: &str,
        links: &[(&str, &str)],
    ) -> serde_json::Value {
        json!({
            "groupId": group_id,
            "artifactId": artifact_id,
            "version": "1.0",
            "artifactHits": [{
                "repositoryId": repository_id,
                "artifactLinks": links
                    .iter()
                    .map(|(extension, classifier)| json!({
                        "extension": extension,
                        "classifier": classifier,
                    }))
                    .collect::<Vec<_>>(),
            }],
        })
    }

    fn jar_group(group_id: &str, artifact_id: &str, repository_id: &str) -> serde_json::Value {
        group_with_links(group_id, artifact_id, repository_id, &[("jar", "")])
    }

    fn page(groups: &[serde_json::Value]) -> String {
        json!({ "data": groups }).to_string()
    }

    fn empty_page() -> String {
        json!({ "data": [] }).to_string()
    }

    fn directory_listing(entries: &[(&str, bool)]) -> String {
        let data: Vec<_> = entries
            .iter()
            .map(|(text, leaf)| json!({ "text": text, "leaf": leaf }))
            .collect();

        json!({ "data": data }).to_string()
    }

    fn repository_listing(repositories: &[(&str, &str)]) -> String {
        let data: Vec<_> = repositories
            .iter()
            .map(|(id, kind)| {
                json!({
                    "id": id,
                    "name": id,
                    "repoType": kind,
                    "repoPolicy": "RELEASE",
                    "format": "maven2",
                    "remoteUri": "",
                })
            })
            .collect();

        json!({ "data": data }).to_string()
    }

    fn content_path(repository_id: &str) -> String {
        format!("service/local/repositories/{repository_id}/content/")
    }

    #[tokio::test]
    async fn test_specific_criteria_search_directly() {
        let (nexus, transport) = scripted();
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("q", "guice")]),
            page(&[jar_group("com.google.inject", "guice", "releases")]),
        );
        transport.respond(SEARCH_PATH, &params(&[("from", "1"), ("q", "guice")]), empty_page());

        let artifacts = nexus
            .artifacts(Criteria::Keyword("guice".to_string()))
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].group_id, "com.google.inject");
        assert_eq!(artifacts[0].repository_id, "releases");
        // no listing calls, just the one paginated search
        assert_eq!(
            transport.requests(),
            vec![
                "service/local/lucene/search?from=0&q=guice".to_string(),
                "service/local/lucene/search?from=1&q=guice".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_scoped_criteria_search_directly_and_weed_out_poms() {
        let (nexus, transport) = scripted();
        transport.respond(
            SEARCH_PATH,
            &params(&[("c", "sources"), ("from", "0"), ("g", "com.example*"), ("repositoryId", "releases")]),
            page(&[group_with_links(
                "com.example",
                "tool",
                "releases",
                &[("jar", "sources"), ("pom", "")],
            )]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("c", "sources"), ("from", "1"), ("g", "com.example*"), ("repositoryId", "releases")]),
            empty_page(),
        );

        let criteria = Criteria::InRepository {
            repository_id: "releases".to_string(),
            criteria: Box::new(Criteria::Coordinates(Coordinates {
                group_id: Some("com.example*".to_string()),
                classifier: Some("sources".to_string()),
                ..Coordinates::default()
            })),
        };
        let artifacts = nexus.artifacts(criteria).await.unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].classifier, "sources");
    }

    #[tokio::test]
    async fn test_a_bare_repository_id_expands_over_first_level_directories() {
        let (nexus, transport) = scripted();
        transport.respond(
            &content_path("releases"),
            &Parameters::new(),
            directory_listing(&[
                ("archetype-catalog.xml", true),
                ("com", false),
                ("org", false),
            ]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "com*"), ("repositoryId", "releases")]),
            page(&[jar_group("com.example", "tool", "releases")]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "1"), ("g", "com*"), ("repositoryId", "releases")]),
            empty_page(),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "org*"), ("repositoryId", "releases")]),
            page(&[jar_group("org.example", "gadget", "releases")]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "1"), ("g", "org*"), ("repositoryId", "releases")]),
            empty_page(),
        );

        let artifacts = nexus
            .artifacts(Criteria::Repository("releases".to_string()))
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 2);
        // leaves are files, not directories; nothing must be searched for them
        assert!(transport
            .requests()
            .iter()
            .all(|request| !request.contains("archetype")));
    }

    #[tokio::test]
    async fn test_overlapping_directory_prefixes_yield_each_artifact_once() {
        let (nexus, transport) = scripted();
        transport.respond(
            &content_path("releases"),
            &Parameters::new(),
            directory_listing(&[("com", false), ("common", false)]),
        );
        // the com* search reaches common.foo as well
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "com*"), ("repositoryId", "releases")]),
            page(&[jar_group("common.foo", "tool", "releases")]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "1"), ("g", "com*"), ("repositoryId", "releases")]),
            empty_page(),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "common*"), ("repositoryId", "releases")]),
            page(&[jar_group("common.foo", "tool", "releases")]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "1"), ("g", "common*"), ("repositoryId", "releases")]),
            empty_page(),
        );

        let artifacts = nexus
            .artifacts(Criteria::Repository("releases".to_string()))
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].group_id, "common.foo");
    }

    #[tokio::test]
    async fn test_a_repository_without_directories_yields_nothing() {
        let (nexus, transport) = scripted();
        transport.respond(
            &content_path("releases"),
            &Parameters::new(),
            directory_listing(&[("archetype-catalog.xml", true)]),
        );

        let artifacts = nexus
            .artifacts(Criteria::Repository("releases".to_string()))
            .await
            .unwrap();

        assert!(artifacts.is_empty());
        assert_eq!(transport.requests(), vec![content_path("releases")]);
    }

    #[tokio::test]
    async fn test_no_restrictions_expand_over_hosted_repositories_only() {
        let (nexus, transport) = scripted();
        transport.respond(
            REPOSITORIES_PATH,
            &Parameters::new(),
            repository_listing(&[
                ("releases", "hosted"),
                ("central", "proxy"),
                ("snapshots", "hosted"),
            ]),
        );
        transport.respond(
            &content_path("releases"),
            &Parameters::new(),
            directory_listing(&[("com", false)]),
        );
        transport.respond(
            &content_path("snapshots"),
            &Parameters::new(),
            directory_listing(&[("org", false)]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "com*"), ("repositoryId", "releases")]),
            page(&[jar_group("com.example", "tool", "releases")]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "1"), ("g", "com*"), ("repositoryId", "releases")]),
            empty_page(),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "org*"), ("repositoryId", "snapshots")]),
            page(&[jar_group("org.example", "gadget", "snapshots")]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "1"), ("g", "org*"), ("repositoryId", "snapshots")]),
            empty_page(),
        );

        let artifacts = nexus.artifacts(Criteria::All).await.unwrap();

        assert_eq!(artifacts.len(), 2);
        // the proxy never gets listed or searched
        assert!(transport
            .requests()
            .iter()
            .all(|request| !request.contains("central")));
    }

    #[tokio::test]
    async fn test_a_failing_directory_search_fails_the_whole_expansion() {
        let (nexus, transport) = scripted();
        transport.respond(
            &content_path("releases"),
            &Parameters::new(),
            directory_listing(&[("com", false), ("org", false)]),
        );
        transport.fail(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "com*"), ("repositoryId", "releases")]),
            Error::Unauthorized {
                url: "search".to_string(),
            },
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "0"), ("g", "org*"), ("repositoryId", "releases")]),
            page(&[jar_group("org.example", "gadget", "releases")]),
        );
        transport.respond(
            SEARCH_PATH,
            &params(&[("from", "1"), ("g", "org*"), ("repositoryId", "releases")]),
            empty_page(),
        );

        let outcome = nexus
            .artifacts(Criteria::Repository("releases".to_string()))
            .await;

        assert!(matches!(outcome, Err(Error::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_a_failing_repository_listing_fails_the_full_search() {
        let (nexus, transport) = scripted();
        transport.fail(
            REPOSITORIES_PATH,
            &Parameters::new(),
            Error::Unauthorized {
                url: REPOSITORIES_PATH.to_string(),
            },
        );

        let outcome = nexus.artifacts(Criteria::All).await;

        assert!(matches!(outcome, Err(Error::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_repositories_map_the_server_metadata() {
        let (nexus, transport) = scripted();
        transport.respond(
            REPOSITORIES_PATH,
            &Parameters::new(),
            r#"{
                "data": [{
                    "id": "central",
                    "name": "Central",
                    "repoType": "proxy",
                    "repoPolicy": "RELEASE",
                    "format": "maven2",
                    "remoteUri": "https://repo1.maven.org/maven2/"
                }]
            }"#,
        );

        let repositories = nexus.repositories().await.unwrap();

        assert_eq!(
            repositories,
            vec![Repository {
                id: "central".to_string(),
                name: "Central".to_string(),
                kind: "proxy".to_string(),
                format: "maven2".to_string(),
                policy: "RELEASE".to_string(),
                remote_uri: "https://repo1.maven.org/maven2/".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_scoping_to_a_repository_alone_is_an_expansion_not_a_search() {
        let (nexus, transport) = scripted();
        transport.respond(&content_path("releases"), &Parameters::new(), directory_listing(&[]));

        let artifacts = nexus
            .artifacts(Criteria::InRepository {
                repository_id: "releases".to_string(),
                criteria: Box::new(Criteria::All),
            })
            .await
            .unwrap();

        assert!(artifacts.is_empty());
        assert_eq!(transport.requests(), vec![content_path("releases")]);
    }
}

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::client::HttpConnector;
use hyper::header::ACCEPT;
use hyper::{Body, Client, Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use tracing::trace;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::search::Parameters;
use crate::util::{build_full_url, clean_slashes, join_query};

/// Read access to a Nexus instance's REST API.
///
/// One method covers everything this crate does: a signed GET that either
/// yields the whole response body or one of the [`Error`] kinds. A body is
/// never returned alongside an error.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Fetches `path`, relative to the instance root, with the given query
    /// parameters.
    async fn fetch(&self, path: &str, query: &Parameters) -> Result<Bytes>;
}

/// [`Transport`] over HTTP(S).
///
/// Holds one hyper client per instance, so connections are pooled across the
/// many requests an expanded search makes.
pub struct HttpTransport {
    client: Client<HttpsConnector<HttpConnector>>,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    /// Prepares a client for the instance at `base_url`, e.g.
    /// `https://maven.java.net/nexus`. The URL must carry a scheme.
    pub fn new(base_url: String, credentials: Credentials) -> Result<HttpTransport> {
        let base_url = clean_slashes(&base_url)?;

        // check that the base URL is valid beyond merely having a scheme
        Uri::try_from(base_url.as_str()).map_err(|_| Error::MalformedUrl {
            url: base_url.clone(),
        })?;

        Ok(HttpTransport {
            client: Client::builder().build::<_, Body>(HttpsConnector::new()),
            base_url,
            credentials,
        })
    }

    /// A transport for the same instance with different credentials. The
    /// connection pool is shared with `self`.
    pub fn with_credentials(&self, credentials: Credentials) -> HttpTransport {
        HttpTransport {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            credentials,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, path: &str, query: &Parameters) -> Result<Bytes> {
        let url = build_full_url(&self.base_url, path, query)?;
        let uri = Uri::try_from(url.as_str()).map_err(|_| Error::MalformedUrl {
            url: url.clone(),
        })?;

        let request = self
            .credentials
            .sign(Request::builder().method(Method::GET).uri(uri))
            .header(ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|_| Error::MalformedUrl { url: url.clone() })?;

        trace!("getting {:?}", request);

        let response = self
            .client
            .request(request)
            .await
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        classify_status(&url, response.status())?;

        hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|source| Error::Transport { url, source })
    }
}

/// 401 is an authorization problem; any other non-2xx answer is a bad
/// response. Redirects are not followed.
fn classify_status(url: &str, status: StatusCode) -> Result<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(Error::BadResponse {
            url: url.to_string(),
            status_code: status.as_u16(),
            status: status.to_string(),
        });
    }

    Ok(())
}

/// In-memory [`Transport`] serving canned responses - for testing purposes.
///
/// Responses are keyed by the rendered `path?query` and handed out at most
/// once, so a paginated crawl can script one answer per offset. Unscripted
/// requests answer 404, and every request is recorded for assertions.
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Bytes>>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> ScriptedTransport {
        ScriptedTransport {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues `body` as the next answer for `path` with `query`.
    pub fn respond(&self, path: &str, query: &Parameters, body: impl Into<Bytes>) {
        self.push(path, query, Ok(body.into()));
    }

    /// Queues `error` as the next answer for `path` with `query`.
    pub fn fail(&self, path: &str, query: &Parameters, error: Error) {
        self.push(path, query, Err(error));
    }

    /// Every request seen so far as rendered `path?query` strings, in call
    /// order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, path: &str, query: &Parameters, outcome: Result<Bytes>) {
        self.responses
            .lock()
            .unwrap()
            .entry(join_query(path, query))
            .or_default()
            .push_back(outcome);
    }
}

impl Default for ScriptedTransport {
    fn default() -> ScriptedTransport {
        ScriptedTransport::new()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, path: &str, query: &Parameters) -> Result<Bytes> {
        let key = join_query(path, query);
        self.requests.lock().unwrap().push(key.clone());

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(outcome) => outcome,
            None => Err(Error::BadResponse {
                url: key,
                status_code: 404,
                status: "404 Not Found".to_string(),
            }),
        }
    }
}

use thiserror::Error;

/// Shared `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The closed set of failures a Nexus call can surface.
///
/// Callers discriminate by variant; there is no downcasting involved. Every
/// variant carries the URL (or server-relative path) that was being accessed,
/// so an error out of a many-request expansion still says where it happened.
#[derive(Debug, Error)]
pub enum Error {
    /// The base URL, or a URL built from it, could not be parsed.
    #[error("malformed URL: {url}")]
    MalformedUrl { url: String },

    /// The server rejected the configured credentials (HTTP 401).
    #[error("unauthorized: credentials were rejected by {url}")]
    Unauthorized { url: String },

    /// Any other non-2xx answer, carrying the status line verbatim.
    #[error("bad response ({status}) from {url}")]
    BadResponse {
        url: String,
        status_code: u16,
        status: String,
    },

    /// The request never completed: connection, TLS or protocol trouble.
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: hyper::Error,
    },

    /// The response body does not match the expected schema.
    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

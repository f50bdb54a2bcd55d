use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hyper::header::AUTHORIZATION;
use hyper::http::request::Builder;

/// How requests authenticate against a Nexus instance.
///
/// Anonymous access is an ordinary variant, not a missing value: signing with
/// [`Credentials::None`] strips authorization data instead of adding some.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Anonymous access.
    None,
    /// HTTP basic authentication.
    Basic { username: String, password: String },
}

impl Credentials {
    /// Stamps this credential onto a request under construction, replacing
    /// whatever authorization data the request carried before.
    pub fn sign(&self, request: Builder) -> Builder {
        let mut request = request;
        if let Some(headers) = request.headers_mut() {
            headers.remove(AUTHORIZATION);
        }

        match self {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                let token = STANDARD.encode(format!("{username}:{password}"));
                request.header(AUTHORIZATION, format!("Basic {token}"))
            }
        }
    }
}

use crate::error::{Error, Result};
use crate::search::Parameters;

/// Collapses runs of `/` in `url`, keeping the `scheme://` separator and at
/// most one trailing slash. URLs without a scheme separator are rejected as
/// malformed.
pub(crate) fn clean_slashes(url: &str) -> Result<String> {
    let (scheme, rest) = url.split_once("://").ok_or_else(|| Error::MalformedUrl {
        url: url.to_string(),
    })?;

    let mut cleaned: String = rest
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if rest.ends_with('/') {
        cleaned.push('/');
    }

    Ok(format!("{scheme}://{cleaned}"))
}

/// Appends `?k=v&...` to `path` in parameter map order. Empty maps append
/// nothing.
pub(crate) fn join_query(path: &str, query: &Parameters) -> String {
    if query.is_empty() {
        return path.to_string();
    }

    let pairs: Vec<String> = query
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    format!("{}?{}", path, pairs.join("&"))
}

/// Builds the full URL for a request: `host/path?k=v&...`, with slash runs
/// collapsed. Values go out unencoded, the server wants its `*` wildcards
/// raw.
pub(crate) fn build_full_url(host: &str, path: &str, query: &Parameters) -> Result<String> {
    let url = clean_slashes(&format!("{host}/{path}"))?;

    Ok(join_query(&url, query))
}

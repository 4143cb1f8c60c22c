//! Canonical string form of page and article URLs.
//!
//! Two spellings of the same article (`/posts/1` relative to the page,
//! `https://example.com/posts/1/`) must compare equal, because the
//! notification gate deduplicates with plain string equality.

use url::Url;

/// Normalize an absolute URL for comparison.
///
/// The URL is parsed and re-serialized (lower-cases scheme and host, adds
/// the root path, percent-encodes). When it carries neither a query nor a
/// fragment, trailing `/` characters are stripped, so `https://example.com/`
/// and `https://example.com` normalize identically.
///
/// Input that does not parse as an absolute URL is returned unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("HTTPS://Example.com/posts/1/"), "https://example.com/posts/1");
/// assert_eq!(normalize("not a url"), "not a url");
/// ```
pub fn normalize(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => canonical(&parsed),
        Err(_) => url.to_string(),
    }
}

/// Resolve `href` against `base` and normalize the result.
///
/// Relative links (`/posts/1`, `../a`, `?page=2`) become absolute. If `base`
/// is not a valid URL, or `href` cannot be joined onto it, `href` is
/// normalized on its own.
pub fn resolve(base: &str, href: &str) -> String {
    match Url::parse(base.trim()) {
        Ok(base) => match base.join(href.trim()) {
            Ok(joined) => canonical(&joined),
            Err(_) => normalize(href),
        },
        Err(_) => normalize(href),
    }
}

fn canonical(url: &Url) -> String {
    let s = url.as_str();
    if url.query().is_none() && url.fragment().is_none() {
        s.trim_end_matches('/').to_string()
    } else {
        s.to_string()
    }
}

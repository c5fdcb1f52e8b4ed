//! URL canonicalization and admission filters.
//!
//! Canonical identity matters for the search state: the visited set,
//! parent map and frontier all key on the canonical form, so two spellings
//! of the same address must collapse to one node.

use url::Url;

/// Path extensions that are skipped as obviously non-HTML resources.
pub const NON_HTML_EXTENSIONS: [&str; 7] =
    [".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx"];

/// Normalize a URL in place for node identity.
///
/// Drops the query string and fragment, and strips trailing slashes from
/// the path (except the root path). Two URLs differing only in trailing
/// slash, query, or fragment normalize identically.
pub fn normalize(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    url
}

/// Resolve a possibly-relative reference against a base, then normalize.
///
/// Returns `None` for hrefs the `url` crate cannot join (malformed or
/// scheme-relative garbage).
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    base.join(href).ok().map(normalize)
}

/// Check whether a URL points at a fetchable HTML-ish resource.
///
/// False when the path ends in one of [`NON_HTML_EXTENSIONS`],
/// case-insensitive.
pub fn is_crawlable(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    !NON_HTML_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Domain restriction limiting expansion to a configured host.
///
/// Membership is a prefix test on `scheme://base_domain`: the URL must be
/// http(s) and start with the base domain immediately after the scheme.
#[derive(Debug, Clone)]
pub struct UrlScope {
    base_domain: String,
    http_prefix: String,
    https_prefix: String,
}

impl UrlScope {
    /// Create a scope for a base domain.
    ///
    /// Accepts a bare host (`en.wikipedia.org`) or a full URL, from which
    /// the host is extracted.
    pub fn new(base_domain: impl Into<String>) -> Self {
        let raw = base_domain.into();
        let trimmed = raw.trim();

        // Users sometimes paste a full URL as the base domain
        let host = Url::parse(trimmed)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| trimmed.to_string());

        Self {
            http_prefix: format!("http://{host}"),
            https_prefix: format!("https://{host}"),
            base_domain: host,
        }
    }

    /// Derive the scope from the seed URL's host.
    pub fn from_seed(seed: &Url) -> Self {
        Self::new(seed.host_str().unwrap_or_default())
    }

    /// The configured base domain.
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// True iff the URL is http(s) on the configured base domain.
    pub fn contains(&self, url: &Url) -> bool {
        let s = url.as_str();
        s.starts_with(&self.https_prefix) || s.starts_with(&self.http_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_normalize_strips_trailing_slash() {
        assert_eq!(
            normalize(parse("https://example.com/about/")).as_str(),
            normalize(parse("https://example.com/about")).as_str()
        );
    }

    #[test]
    fn test_normalize_keeps_root() {
        let root = normalize(parse("https://example.com/"));
        assert_eq!(root.path(), "/");
    }

    #[test]
    fn test_normalize_drops_query_and_fragment() {
        let a = normalize(parse("https://example.com/page?id=3#section"));
        let b = normalize(parse("https://example.com/page"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_relative() {
        let base = parse("https://example.com/dir/page");
        let resolved = resolve(&base, "../other?x=1").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/other");
    }

    #[test]
    fn test_is_crawlable_extensions() {
        assert!(!is_crawlable(&parse("https://example.com/report.PDF")));
        assert!(!is_crawlable(&parse("https://example.com/deck.pptx")));
        assert!(is_crawlable(&parse("https://example.com/report")));
        assert!(is_crawlable(&parse("https://example.com/page.html")));
    }

    #[test]
    fn test_scope_contains() {
        let scope = UrlScope::new("cs.example.edu");
        assert!(scope.contains(&parse("https://cs.example.edu/people")));
        assert!(scope.contains(&parse("http://cs.example.edu")));
        assert!(!scope.contains(&parse("https://other.edu/people")));
    }

    #[test]
    fn test_scope_from_pasted_url() {
        let scope = UrlScope::new("https://en.wikipedia.org/wiki/Main_Page");
        assert_eq!(scope.base_domain(), "en.wikipedia.org");
        assert!(scope.contains(&parse("https://en.wikipedia.org/wiki/Rust")));
    }

    #[test]
    fn test_scope_from_seed() {
        let scope = UrlScope::from_seed(&parse("https://example.com/start"));
        assert_eq!(scope.base_domain(), "example.com");
    }
}

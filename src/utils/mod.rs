//! Utility functions and helpers.

pub mod http;
pub mod log;

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve a URL string against a base URL string.
pub fn resolve(base_url: &str, href: &str) -> Result<String> {
    let base = Url::parse(base_url)?;
    Ok(resolve_url(&base, href))
}

/// Last `/`-separated segment of a URL, used as a local file name.
pub fn last_path_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://docs.python.org/3/whatsnew/").unwrap();
        assert_eq!(
            resolve_url(&base, "3.12.html"),
            "https://docs.python.org/3/whatsnew/3.12.html"
        );
        assert_eq!(
            resolve_url(&base, "/3/download.html"),
            "https://docs.python.org/3/download.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_resolve_rejects_relative_base() {
        assert!(resolve("docs.python.org", "x.html").is_err());
        assert_eq!(
            resolve("https://peps.python.org/", "pep-0008/").unwrap(),
            "https://peps.python.org/pep-0008/"
        );
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            last_path_segment("https://docs.python.org/3/archives/python-3.12-docs-pdf-a4.zip"),
            "python-3.12-docs-pdf-a4.zip"
        );
        assert_eq!(last_path_segment("plain"), "plain");
    }
}

//! Path utilities for validation, normalization and location parsing
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use dashroute::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/bot-detail/123"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("index")); // Missing leading /
/// assert!(!is_valid_path("/index/")); // Trailing /
/// assert!(!is_valid_path("/bot-detail//123")); // Double //
/// assert!(!is_valid_path("/bot-detail\\123")); // Backslash
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
/// Returns `Cow::Owned` when normalization is needed.
///
/// Handles:
/// - Trailing slashes: `/path/` → `/path`
/// - Double slashes: `/path//to` → `/path/to`
/// - Backslashes: `\path\to` → `/path/to`
/// - Missing leading slash: `path` → `/path`
///
/// # Examples
///
/// ```
/// use dashroute::path::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/index");
/// assert!(matches!(path, Cow::Borrowed("/index")));
///
/// assert_eq!(normalize_path("/index/"), "/index");
/// assert_eq!(normalize_path("\\bot-detail\\123"), "/bot-detail/123");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Removes a base path prefix such as `/dashboard`
///
/// The prefix only matches on a segment boundary; paths outside the base are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use dashroute::path::strip_base;
///
/// assert_eq!(strip_base("/dashboard/index", "/dashboard"), "/index");
/// assert_eq!(strip_base("/dashboard", "/dashboard/"), "/");
/// assert_eq!(strip_base("/dashboards", "/dashboard"), "/dashboards");
/// ```
pub fn strip_base<'a>(path: &'a str, base: &str) -> &'a str {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path;
    }

    match path.strip_prefix(base) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

/// A URL split into path, decoded query and hash
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Normalized path, relative to the base path
    pub path: String,
    /// Decoded query parameters (last value wins)
    pub query: HashMap<String, String>,
    /// Fragment without the leading `#`
    pub hash: Option<String>,
}

impl Location {
    /// Parses a URL such as `/bot-detail/42?tab=stats#top`
    ///
    /// # Examples
    ///
    /// ```
    /// use dashroute::path::Location;
    ///
    /// let location = Location::parse("/app/bot-detail/42/?tab=msg+stats#top", Some("/app"));
    /// assert_eq!(location.path, "/bot-detail/42");
    /// assert_eq!(location.query.get("tab").map(String::as_str), Some("msg stats"));
    /// assert_eq!(location.hash.as_deref(), Some("top"));
    /// ```
    pub fn parse(url: &str, base: Option<&str>) -> Self {
        let (rest, hash) = match url.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (url, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (rest, HashMap::new()),
        };

        let normalized = normalize_path(path);
        let path = match base {
            Some(base) => normalize_path(strip_base(&normalized, base)).into_owned(),
            None => normalized.into_owned(),
        };

        Self { path, query, hash }
    }

    /// Path segments, without empty entries
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

/// Decodes an `application/x-www-form-urlencoded` style query string
///
/// `+` decodes to a space; pairs that fail to decode keep their raw text.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_query_component(key), decode_query_component(value))
        })
        .collect()
}

fn decode_query_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_valid() {
        let path = normalize_path("/index");
        assert!(matches!(path, Cow::Borrowed("/index")));

        let path = normalize_path("/");
        assert!(matches!(path, Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_path_trailing_and_double_slash() {
        assert_eq!(normalize_path("/bot-detail/123/"), "/bot-detail/123");
        assert_eq!(normalize_path("/path///to////page"), "/path/to/page");
    }

    #[test]
    fn test_normalize_path_empty() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("index"), "/index");
    }

    #[test]
    fn test_strip_base_root_base() {
        assert_eq!(strip_base("/index", "/"), "/index");
        assert_eq!(strip_base("/index", ""), "/index");
    }

    #[test]
    fn test_location_without_query_or_hash() {
        let location = Location::parse("/index", None);
        assert_eq!(location.path, "/index");
        assert!(location.query.is_empty());
        assert_eq!(location.hash, None);
    }

    #[test]
    fn test_location_hash_before_query_is_not_a_query() {
        let location = Location::parse("/index#a?b=c", None);
        assert!(location.query.is_empty());
        assert_eq!(location.hash.as_deref(), Some("a?b=c"));
    }

    #[test]
    fn test_location_segments() {
        let location = Location::parse("//bot-detail//7/", None);
        assert_eq!(location.segments(), vec!["bot-detail", "7"]);
    }

    #[test]
    fn test_parse_query() {
        let query = parse_query("a=1&b=hello%20world&flag&c=x%FFy&a=2");
        assert_eq!(query.get("a").map(String::as_str), Some("2"));
        assert_eq!(query.get("b").map(String::as_str), Some("hello world"));
        assert_eq!(query.get("flag").map(String::as_str), Some(""));
        assert_eq!(query.get("c").map(String::as_str), Some("x%FFy"));
    }
}

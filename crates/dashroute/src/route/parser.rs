//! Pattern parsing and priority calculation for routes
//!
//! Pure parsers that turn a path pattern such as `/bot-detail/:selfId`
//! into typed segments. All functions are **pure**: same input → same
//! output, no side effects.

use super::pattern::{classify_segment, PatternSegmentType};
use crate::error::PatternError;

/// A fully parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPattern {
    /// Canonical pattern text: leading `/`, no empty segments
    pub pattern: String,
    /// Typed segments in path order
    pub segments: Vec<PatternSegmentType>,
    /// Parameter names in path order
    pub params: Vec<String>,
    /// Names of parameters that may be absent (`?` and `*`)
    pub optional_params: Vec<String>,
}

/// Internal state accumulator for fold-based parsing
#[derive(Default)]
struct ParseState {
    segments: Vec<PatternSegmentType>,
    params: Vec<String>,
    optional_params: Vec<String>,
}

impl ParseState {
    /// Adds one classified segment, rejecting duplicate parameter names
    fn with_segment(mut self, segment: PatternSegmentType, path: &str) -> Result<Self, PatternError> {
        if let Some(name) = segment.param_name() {
            if self.params.iter().any(|existing| existing == name) {
                return Err(PatternError::DuplicateParam {
                    name: name.to_string(),
                    pattern: path.to_string(),
                });
            }
            self.params.push(name.to_string());
            if segment.is_optional() {
                self.optional_params.push(name.to_string());
            }
        }
        self.segments.push(segment);
        Ok(self)
    }

    /// Finalizes the pattern, handling the root case
    fn finalize(self, pattern: String) -> ParsedPattern {
        ParsedPattern {
            pattern,
            segments: self.segments,
            params: self.params,
            optional_params: self.optional_params,
        }
    }
}

/// Parses a path pattern into segments
///
/// Empty segments are ignored, so `""`, `"/"` and `"//"` all denote the root.
///
/// # Examples
///
/// ```
/// use dashroute::route::parser::parse_pattern;
///
/// let parsed = parse_pattern("/bot-detail/:selfId").unwrap();
/// assert_eq!(parsed.pattern, "/bot-detail/:selfId");
/// assert_eq!(parsed.params, vec!["selfId"]);
///
/// let root = parse_pattern("").unwrap();
/// assert_eq!(root.pattern, "/");
/// assert!(root.segments.is_empty());
/// ```
pub fn parse_pattern(path: &str) -> Result<ParsedPattern, PatternError> {
    let raw_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let pattern = if raw_segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", raw_segments.join("/"))
    };

    raw_segments
        .into_iter()
        .try_fold(ParseState::default(), |state, raw| {
            state.with_segment(classify_segment(raw)?, path)
        })
        .map(|state| state.finalize(pattern))
}

/// Joins a child record's path onto its parent's path
///
/// - `""` → the parent path itself
/// - `/absolute` → used as-is
/// - `relative` → appended to the parent with `/`
///
/// # Examples
///
/// ```
/// use dashroute::route::parser::join_paths;
///
/// assert_eq!(join_paths("/", ""), "/");
/// assert_eq!(join_paths("/", "/index"), "/index");
/// assert_eq!(join_paths("/settings", "profile"), "/settings/profile");
/// assert_eq!(join_paths("/settings/", "profile"), "/settings/profile");
/// ```
pub fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if child.is_empty() {
        return if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        };
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}

/// Calculates route priority for matching order (pure function)
///
/// Lower number = higher priority (matched first). Equal priorities are
/// resolved by registration order.
///
/// # Priority Order
///
/// 1. **Static routes** → 0
/// 2. **Single-segment parameters** → params + depth (+1 unless some are optional)
/// 3. **One-or-more** (`:path+`) → 1000 + depth
/// 4. **Zero-or-more** (`:catchAll(.*)*`) → 2000 + depth
///
/// The router sorts catch-all routes (every segment optional) after all
/// others whatever their priority, so `/docs/:path*` still wins over
/// `/:catchAll(.*)*`.
///
/// # Examples
///
/// ```
/// use dashroute::route::parser::{calculate_priority, parse_pattern};
///
/// let priority = |p: &str| calculate_priority(&parse_pattern(p).unwrap());
///
/// assert_eq!(priority("/index"), 0);
/// assert_eq!(priority("/bot-detail/:selfId"), 4); // 1 + 2 + 1
/// assert_eq!(priority("/docs/:path+"), 1002);
/// assert_eq!(priority("/:catchAll(.*)*"), 2001);
/// ```
pub fn calculate_priority(parsed: &ParsedPattern) -> usize {
    let depth = parsed.segments.len();

    if parsed
        .segments
        .iter()
        .any(|s| matches!(s, PatternSegmentType::ZeroOrMore(..)))
    {
        2000 + depth
    } else if parsed
        .segments
        .iter()
        .any(|s| matches!(s, PatternSegmentType::OneOrMore(..)))
    {
        1000 + depth
    } else if !parsed.params.is_empty() {
        let optional_bonus = if parsed.optional_params.is_empty() { 1 } else { 0 };
        parsed.params.len() + depth + optional_bonus
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pattern_static() {
        let parsed = parse_pattern("/index").unwrap();
        assert_eq!(parsed.pattern, "/index");
        assert_eq!(parsed.params.len(), 0);
        assert_eq!(parsed.optional_params.len(), 0);
        assert_eq!(
            parsed.segments,
            vec![PatternSegmentType::Static("index".to_string())]
        );
    }

    #[test]
    fn test_parse_pattern_dynamic() {
        let parsed = parse_pattern("/bot-detail/:selfId").unwrap();
        assert_eq!(parsed.params, vec!["selfId".to_string()]);
        assert!(parsed.optional_params.is_empty());
    }

    #[test]
    fn test_parse_pattern_normalizes_slashes() {
        let parsed = parse_pattern("users//:id/").unwrap();
        assert_eq!(parsed.pattern, "/users/:id");
    }

    #[test]
    fn test_parse_pattern_optional_params() {
        let parsed = parse_pattern("/posts/:id?/:rest*").unwrap();
        assert_eq!(parsed.params, vec!["id".to_string(), "rest".to_string()]);
        assert_eq!(
            parsed.optional_params,
            vec!["id".to_string(), "rest".to_string()]
        );
    }

    #[test]
    fn test_parse_pattern_rejects_duplicate_params() {
        let error = parse_pattern("/a/:id/b/:id").unwrap_err();
        assert_eq!(
            error,
            PatternError::DuplicateParam {
                name: "id".to_string(),
                pattern: "/a/:id/b/:id".to_string()
            }
        );
    }

    #[test]
    fn test_parse_pattern_propagates_segment_errors() {
        assert!(matches!(
            parse_pattern("/a/:").unwrap_err(),
            PatternError::EmptyParamName { .. }
        ));
    }

    #[test]
    fn test_join_paths_empty_parent() {
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("", "about"), "/about");
    }

    #[test]
    fn test_calculate_priority_optional_bonus() {
        let required = parse_pattern("/posts/:id").unwrap();
        let optional = parse_pattern("/posts/:id?").unwrap();
        assert_eq!(calculate_priority(&required), 4);
        assert_eq!(calculate_priority(&optional), 3);
    }

    #[test]
    fn test_calculate_priority_order() {
        let stat = calculate_priority(&parse_pattern("/index").unwrap());
        let dynamic = calculate_priority(&parse_pattern("/bot-detail/:selfId").unwrap());
        let one_or_more = calculate_priority(&parse_pattern("/docs/:path+").unwrap());
        let catch_all = calculate_priority(&parse_pattern("/:catchAll(.*)*").unwrap());

        assert!(stat < dynamic);
        assert!(dynamic < one_or_more);
        assert!(one_or_more < catch_all);
    }
}

//! Pattern parsing for route segments
//!
//! Pure parsing of one path-pattern segment into a typed segment.
//! All functions are **pure**: same input → same output, no side effects.

use regex::Regex;

use crate::error::PatternError;

/// Regex a parameter segment must fully match, e.g. `(\d+)` in `:id(\d+)`
#[derive(Debug, Clone)]
pub struct SegmentRegex {
    source: String,
    compiled: Regex,
}

impl SegmentRegex {
    /// Compiles the regex anchored to the whole segment
    pub fn new(param: &str, source: &str) -> Result<Self, PatternError> {
        Regex::new(&format!("^(?:{source})$"))
            .map(|compiled| Self {
                source: source.to_string(),
                compiled,
            })
            .map_err(|e| PatternError::InvalidRegex {
                param: param.to_string(),
                regex: source.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn is_match(&self, segment: &str) -> bool {
        self.compiled.is_match(segment)
    }

    /// The regex as written in the pattern
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for SegmentRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SegmentRegex {}

/// Represents different types of route pattern segments
///
/// Each parameter variant carries the parameter name and optional regex.
///
/// # Examples
///
/// ```
/// use dashroute::route::pattern::{classify_segment, PatternSegmentType};
///
/// // Static segment
/// let seg = classify_segment("bot-detail").unwrap();
/// assert!(matches!(seg, PatternSegmentType::Static(_)));
///
/// // Required parameter
/// let seg = classify_segment(":selfId").unwrap();
/// assert!(matches!(seg, PatternSegmentType::Required(_, None)));
///
/// // Catch-all with regex
/// let seg = classify_segment(":catchAll(.*)*").unwrap();
/// assert!(matches!(seg, PatternSegmentType::ZeroOrMore(_, Some(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegmentType {
    /// Literal text segment
    Static(String),
    /// Required parameter: `:id` or `:id(re)`
    Required(String, Option<SegmentRegex>),
    /// Optional parameter: `:id?` or `:id(re)?`
    Optional(String, Option<SegmentRegex>),
    /// Repeatable parameter, at least one segment: `:path+`
    OneOrMore(String, Option<SegmentRegex>),
    /// Repeatable parameter, any number of segments: `:path*`
    ZeroOrMore(String, Option<SegmentRegex>),
}

impl PatternSegmentType {
    /// Parameter name, `None` for static segments
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegmentType::Static(_) => None,
            PatternSegmentType::Required(name, _)
            | PatternSegmentType::Optional(name, _)
            | PatternSegmentType::OneOrMore(name, _)
            | PatternSegmentType::ZeroOrMore(name, _) => Some(name),
        }
    }

    pub fn regex(&self) -> Option<&SegmentRegex> {
        match self {
            PatternSegmentType::Static(_) => None,
            PatternSegmentType::Required(_, regex)
            | PatternSegmentType::Optional(_, regex)
            | PatternSegmentType::OneOrMore(_, regex)
            | PatternSegmentType::ZeroOrMore(_, regex) => regex.as_ref(),
        }
    }

    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            PatternSegmentType::OneOrMore(..) | PatternSegmentType::ZeroOrMore(..)
        )
    }

    /// Whether the segment may match no path segment at all
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            PatternSegmentType::Optional(..) | PatternSegmentType::ZeroOrMore(..)
        )
    }

    /// Checks one path segment against the segment's regex (parameters only)
    pub fn accepts(&self, segment: &str) -> bool {
        self.regex().map_or(true, |regex| regex.is_match(segment))
    }
}

/// Classifies a segment into a pattern type (pure function)
///
/// # Parsing Rules
///
/// 1. Anything not starting with `:` is **static**
/// 2. `:` is followed by the name (`[A-Za-z0-9_]+`)
/// 3. An optional `( ... )` holds the segment regex (nested parentheses allowed)
/// 4. An optional trailing modifier: `?` optional, `+` one or more, `*` zero or more
///
/// # Examples
///
/// ```
/// use dashroute::route::pattern::{classify_segment, PatternSegmentType};
///
/// assert!(matches!(classify_segment(":id?").unwrap(), PatternSegmentType::Optional(..)));
/// assert!(matches!(classify_segment(":path+").unwrap(), PatternSegmentType::OneOrMore(..)));
/// assert!(classify_segment(":").is_err());
/// ```
pub fn classify_segment(segment: &str) -> Result<PatternSegmentType, PatternError> {
    let Some(rest) = segment.strip_prefix(':') else {
        return Ok(PatternSegmentType::Static(segment.to_string()));
    };

    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return Err(PatternError::EmptyParamName {
            segment: segment.to_string(),
        });
    }
    let (name, rest) = rest.split_at(name_len);

    let (regex, modifier) = match rest.strip_prefix('(') {
        Some(inner) => {
            let close = find_closing_paren(inner).ok_or_else(|| PatternError::UnbalancedRegex {
                segment: segment.to_string(),
            })?;
            let regex = SegmentRegex::new(name, &inner[..close])?;
            (Some(regex), &inner[close + 1..])
        }
        None => (None, rest),
    };

    let name = name.to_string();
    match modifier {
        "" => Ok(PatternSegmentType::Required(name, regex)),
        "?" => Ok(PatternSegmentType::Optional(name, regex)),
        "+" => Ok(PatternSegmentType::OneOrMore(name, regex)),
        "*" => Ok(PatternSegmentType::ZeroOrMore(name, regex)),
        other => Err(PatternError::TrailingCharacters {
            param: name,
            found: other.to_string(),
        }),
    }
}

/// Finds the `)` closing an already-opened group, honoring escapes and nesting
fn find_closing_paren(inner: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;

    for (idx, c) in inner.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' if depth == 0 => return Some(idx),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_static() {
        let seg = classify_segment("index").unwrap();
        assert_eq!(seg, PatternSegmentType::Static("index".to_string()));
    }

    #[test]
    fn test_classify_required() {
        let seg = classify_segment(":selfId").unwrap();
        assert_eq!(seg, PatternSegmentType::Required("selfId".to_string(), None));
    }

    #[test]
    fn test_classify_optional() {
        let seg = classify_segment(":id?").unwrap();
        assert_eq!(seg, PatternSegmentType::Optional("id".to_string(), None));
    }

    #[test]
    fn test_classify_one_or_more() {
        let seg = classify_segment(":path+").unwrap();
        assert_eq!(seg, PatternSegmentType::OneOrMore("path".to_string(), None));
    }

    #[test]
    fn test_classify_catch_all_with_regex() {
        let seg = classify_segment(":catchAll(.*)*").unwrap();
        assert_eq!(seg.param_name(), Some("catchAll"));
        assert_eq!(seg.regex().map(SegmentRegex::as_str), Some(".*"));
        assert!(seg.is_repeatable());
        assert!(seg.is_optional());
    }

    #[test]
    fn test_classify_nested_regex() {
        let seg = classify_segment(r":id((\d+)|new)").unwrap();
        assert_eq!(seg.regex().map(SegmentRegex::as_str), Some(r"(\d+)|new"));
        assert!(seg.accepts("42"));
        assert!(seg.accepts("new"));
        assert!(!seg.accepts("newer"));
    }

    #[test]
    fn test_classify_escaped_paren() {
        let seg = classify_segment(r":tag(\(x\))").unwrap();
        assert!(seg.accepts("(x)"));
    }

    #[test]
    fn test_regex_is_anchored() {
        let seg = classify_segment(r":id(\d+)").unwrap();
        assert!(seg.accepts("123"));
        assert!(!seg.accepts("123abc"));
        assert!(!seg.accepts("abc123"));
    }

    #[test]
    fn test_classify_errors() {
        assert_eq!(
            classify_segment(":").unwrap_err(),
            PatternError::EmptyParamName {
                segment: ":".to_string()
            }
        );
        assert!(matches!(
            classify_segment(":id(\\d+").unwrap_err(),
            PatternError::UnbalancedRegex { .. }
        ));
        assert!(matches!(
            classify_segment(":id([)").unwrap_err(),
            PatternError::InvalidRegex { .. }
        ));
        assert_eq!(
            classify_segment(":id?!").unwrap_err(),
            PatternError::TrailingCharacters {
                param: "id".to_string(),
                found: "?!".to_string()
            }
        );
    }

    #[test]
    fn test_static_segment_accepts_anything() {
        let seg = classify_segment("about").unwrap();
        assert!(seg.accepts("whatever"));
        assert_eq!(seg.param_name(), None);
    }
}

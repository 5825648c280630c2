//! Route module for pattern parsing and matching
//!
//! Contains pure components for route parsing and matching:
//! - `pattern`: one segment → [`PatternSegmentType`]
//! - `parser`: whole pattern → [`ParsedPattern`], child path joining, priority
//! - matching of path segments against parsed segments (this module)

pub mod parser;
pub mod pattern;

use tracing::warn;

use crate::params::{ParamValue, RawParams};

pub use parser::{calculate_priority, join_paths, parse_pattern, ParsedPattern};
pub use pattern::{classify_segment, PatternSegmentType, SegmentRegex};

/// Captured value before percent-decoding
enum Capture<'p> {
    Single(&'p str),
    Repeated(&'p [&'p str]),
}

/// Matches path segments against pattern segments
///
/// Optional and repeatable segments are matched greedily with backtracking,
/// so `/:path*/edit` matches `/a/b/edit` with `path = [a, b]`.
/// Captured values are percent-decoded. Absent optional parameters are left
/// out of the result; a `*` parameter that matched nothing is an empty list.
///
/// # Examples
///
/// ```
/// use dashroute::route::{match_segments, parse_pattern};
///
/// let parsed = parse_pattern("/bot-detail/:selfId").unwrap();
/// let params = match_segments(&parsed.segments, &["bot-detail", "123"], false).unwrap();
/// assert_eq!(params.get_str("selfId"), Some("123"));
///
/// assert!(match_segments(&parsed.segments, &["bot-detail"], false).is_none());
/// ```
pub fn match_segments(
    pattern: &[PatternSegmentType],
    path: &[&str],
    case_insensitive: bool,
) -> Option<RawParams> {
    let mut captures = Vec::new();
    if !walk(pattern, path, case_insensitive, &mut captures) {
        return None;
    }

    Some(
        captures
            .into_iter()
            .map(|(name, capture)| {
                let value = match capture {
                    Capture::Single(raw) => ParamValue::Single(decode_segment(raw)),
                    Capture::Repeated(raws) => {
                        ParamValue::Repeated(raws.iter().map(|raw| decode_segment(raw)).collect())
                    }
                };
                (name, value)
            })
            .collect(),
    )
}

/// Recursive matcher; `captures` holds the bindings of the current attempt
fn walk<'a, 'p>(
    pattern: &'a [PatternSegmentType],
    path: &'p [&'p str],
    case_insensitive: bool,
    captures: &mut Vec<(&'a str, Capture<'p>)>,
) -> bool {
    let Some((segment, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match segment {
        PatternSegmentType::Static(text) => match path.first() {
            Some(first) if static_eq(text, first, case_insensitive) => {
                walk(rest, &path[1..], case_insensitive, captures)
            }
            _ => false,
        },
        PatternSegmentType::Required(name, _) => match path.first() {
            Some(first) if segment.accepts(first) => {
                captures.push((name.as_str(), Capture::Single(*first)));
                if walk(rest, &path[1..], case_insensitive, captures) {
                    return true;
                }
                captures.pop();
                false
            }
            _ => false,
        },
        PatternSegmentType::Optional(name, _) => {
            if let Some(first) = path.first() {
                if segment.accepts(first) {
                    captures.push((name.as_str(), Capture::Single(*first)));
                    if walk(rest, &path[1..], case_insensitive, captures) {
                        return true;
                    }
                    captures.pop();
                }
            }
            walk(rest, path, case_insensitive, captures)
        }
        PatternSegmentType::OneOrMore(name, _) | PatternSegmentType::ZeroOrMore(name, _) => {
            let min = if segment.is_optional() { 0 } else { 1 };
            let max = path.iter().take_while(|s| segment.accepts(s)).count();

            // Greedy: longest run first
            for taken in (min..=max).rev() {
                captures.push((name.as_str(), Capture::Repeated(&path[..taken])));
                if walk(rest, &path[taken..], case_insensitive, captures) {
                    return true;
                }
                captures.pop();
            }
            false
        }
    }
}

fn static_eq(pattern: &str, segment: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        pattern.eq_ignore_ascii_case(segment)
    } else {
        pattern == segment
    }
}

/// Percent-decodes a captured segment, keeping the raw text if it is not valid UTF-8
pub fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(error) => {
            warn!(segment = %raw, %error, "route parameter is not valid percent-encoded UTF-8, keeping raw value");
            raw.to_string()
        }
    }
}

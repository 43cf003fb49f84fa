//! The path matcher
//!
//! Matching walks the pattern's segments and the path's `/`-separated
//! segments side by side. The match is anchored at the start of the path and
//! open at the end, so `/topics` matches `/topics/rendering` with a matched
//! url of `/topics`.

use crate::pattern::{RoutePattern, Segment};
use crate::types::{MatchFlags, Params, PathMatch};

/// Match `pathname` against an optional route pattern.
///
/// Without a pattern the match is unconditional and exact. Returns `None`
/// when the pattern is not a segment-wise prefix of the path, or when
/// [`MatchFlags::EXACT`] is set and the match does not cover the whole path.
pub fn match_path(
    pathname: &str,
    pattern: Option<&RoutePattern>,
    flags: MatchFlags,
) -> Option<PathMatch> {
    let pattern = match pattern {
        Some(pattern) => pattern,
        None => return Some(PathMatch::unconditional(pathname)),
    };

    if !pathname.starts_with('/') {
        return None;
    }

    let mut params = Params::new();
    let mut end = if pattern.is_root() {
        1
    } else {
        match_segments(pathname, pattern, flags, &mut params)?
    };

    if pattern.has_trailing_slash() {
        if pathname[end..].starts_with('/') {
            end += 1;
        } else if flags.contains(MatchFlags::STRICT) {
            return None;
        }
    }

    let url = &pathname[..end];
    let is_exact = url.len() == pathname.len();

    if flags.contains(MatchFlags::EXACT) && !is_exact {
        return None;
    }

    Some(PathMatch {
        pattern: Some(pattern.as_str().to_string()),
        url: url.to_string(),
        is_exact,
        params,
    })
}

/// Walk the pattern segments over the path. Returns the byte offset just past
/// the last consumed path segment.
fn match_segments(
    pathname: &str,
    pattern: &RoutePattern,
    flags: MatchFlags,
    params: &mut Params,
) -> Option<usize> {
    let bytes = pathname.as_bytes();
    let len = bytes.len();
    // Always points at a '/' (or the end of the path) between iterations.
    let mut cursor = 0;

    for segment in pattern.segments() {
        if let Segment::Wildcard(name) = segment {
            let rest = if cursor < len { &pathname[cursor + 1..] } else { "" };
            params.push(name, rest);
            return Some(len);
        }

        if cursor >= len || bytes[cursor] != b'/' {
            return None;
        }

        let start = cursor + 1;
        let end = pathname[start..]
            .find('/')
            .map(|offset| start + offset)
            .unwrap_or(len);
        let text = &pathname[start..end];

        match segment {
            Segment::Literal(literal) => {
                let equal = if flags.contains(MatchFlags::IGNORE_CASE) {
                    literal.eq_ignore_ascii_case(text)
                } else {
                    literal == text
                };
                if !equal {
                    return None;
                }
            }
            Segment::Param(name) => {
                if text.is_empty() {
                    return None;
                }
                params.push(name, text);
            }
            Segment::Wildcard(_) => unreachable!("handled above"),
        }

        cursor = end;
    }

    Some(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(source: &str) -> RoutePattern {
        RoutePattern::parse(source).expect("pattern should compile")
    }

    fn check(pathname: &str, source: &str, flags: MatchFlags) -> Option<PathMatch> {
        match_path(pathname, Some(&pattern(source)), flags)
    }

    #[test]
    fn test_prefix_match_is_not_exact() {
        let m = check("/topics/rendering", "/topics", MatchFlags::empty()).unwrap();
        assert_eq!(m.url, "/topics");
        assert!(!m.is_exact);
        assert_eq!(m.pattern.as_deref(), Some("/topics"));
    }

    #[test]
    fn test_full_match_is_exact() {
        let m = check("/topics", "/topics", MatchFlags::EXACT).unwrap();
        assert_eq!(m.url, "/topics");
        assert!(m.is_exact);
    }

    #[test]
    fn test_non_prefix_does_not_match() {
        assert_eq!(check("/about", "/topics", MatchFlags::empty()), None);
        assert_eq!(check("/", "/topics", MatchFlags::empty()), None);
    }

    #[test]
    fn test_exact_rejects_prefix_match() {
        assert_eq!(check("/topics/rendering", "/topics", MatchFlags::EXACT), None);
    }

    #[test]
    fn test_no_pattern_matches_unconditionally() {
        for path in ["/", "/about", "/topics/components", "relative"] {
            let m = match_path(path, None, MatchFlags::EXACT).unwrap();
            assert_eq!(m.pattern, None);
            assert_eq!(m.url, path);
            assert!(m.is_exact);
        }
    }

    #[test]
    fn test_matches_whole_segments_only() {
        assert_eq!(check("/topicsfoo", "/topics", MatchFlags::empty()), None);
        assert!(check("/topics/foo", "/topics", MatchFlags::empty()).is_some());
    }

    #[test]
    fn test_root_pattern() {
        let m = check("/about", "/", MatchFlags::empty()).unwrap();
        assert_eq!(m.url, "/");
        assert!(!m.is_exact);

        assert!(check("/", "/", MatchFlags::EXACT).unwrap().is_exact);
        assert_eq!(check("/about", "/", MatchFlags::EXACT), None);
    }

    #[test]
    fn test_relative_path_never_matches_a_pattern() {
        assert_eq!(check("topics", "/topics", MatchFlags::empty()), None);
        assert_eq!(check("", "/", MatchFlags::empty()), None);
    }

    #[test]
    fn test_metacharacters_match_literally() {
        assert!(check("/a.b", "/a.b", MatchFlags::EXACT).is_some());
        assert_eq!(check("/axb", "/a.b", MatchFlags::empty()), None);
        assert!(check("/c++/intro", "/c++", MatchFlags::empty()).is_some());
    }

    #[test]
    fn test_captures_params() {
        let m = check("/users/42/posts/7", "/users/:user/posts/:post", MatchFlags::EXACT).unwrap();
        assert_eq!(m.params.get("user"), Some("42"));
        assert_eq!(m.params.get("post"), Some("7"));
    }

    #[test]
    fn test_param_requires_non_empty_segment() {
        assert_eq!(check("/users/", "/users/:id", MatchFlags::empty()), None);
        assert_eq!(check("/users", "/users/:id", MatchFlags::empty()), None);
    }

    #[test]
    fn test_wildcard_captures_rest() {
        let m = check("/files/a/b/c.txt", "/files/*path", MatchFlags::EXACT).unwrap();
        assert_eq!(m.params.get("path"), Some("a/b/c.txt"));
        assert_eq!(m.url, "/files/a/b/c.txt");

        let empty = check("/files", "/files/*", MatchFlags::EXACT).unwrap();
        assert_eq!(empty.params.get("*"), Some(""));
    }

    #[test]
    fn test_wildcard_keeps_trailing_slash_of_path() {
        for flags in [MatchFlags::empty(), MatchFlags::STRICT] {
            let m = check("/files/a/", "/files/*", flags).unwrap();
            assert_eq!(m.url, "/files/a/");
            assert!(m.is_exact);
            assert_eq!(m.params.get("*"), Some("a/"));
        }
    }

    #[test]
    fn test_trailing_slash_in_path_is_not_exact() {
        let m = check("/topics/", "/topics", MatchFlags::empty()).unwrap();
        assert_eq!(m.url, "/topics");
        assert!(!m.is_exact);
    }

    #[test]
    fn test_pattern_trailing_slash_is_optional_unless_strict() {
        let m = check("/topics/", "/topics/", MatchFlags::empty()).unwrap();
        assert_eq!(m.url, "/topics/");
        assert!(m.is_exact);

        let m = check("/topics", "/topics/", MatchFlags::empty()).unwrap();
        assert_eq!(m.url, "/topics");
        assert!(m.is_exact);

        assert_eq!(check("/topics", "/topics/", MatchFlags::STRICT), None);
        assert!(check("/topics/", "/topics/", MatchFlags::STRICT | MatchFlags::EXACT).is_some());
    }

    #[test]
    fn test_ignore_case_keeps_original_spelling() {
        assert_eq!(check("/Topics", "/topics", MatchFlags::empty()), None);

        let m = check("/Topics/x", "/topics", MatchFlags::IGNORE_CASE).unwrap();
        assert_eq!(m.url, "/Topics");
    }

    #[test]
    fn test_exactness_law_holds_for_every_prefix() {
        let path = "/topics/props-v-state/details";
        for source in ["/topics", "/topics/props-v-state", "/topics/props-v-state/details"] {
            let m = check(path, source, MatchFlags::empty()).unwrap();
            assert_eq!(m.url, source);
            assert_eq!(m.is_exact, m.url == path);
            assert_eq!(
                check(path, source, MatchFlags::EXACT).is_some(),
                m.is_exact
            );
        }
    }
}

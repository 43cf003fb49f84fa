//! Structured route patterns
//!
//! A pattern is compiled once into literal segments and typed placeholders.
//! Literal text is compared verbatim, so characters such as `.`, `+` or `(`
//! carry no special meaning.
//!
//! # Syntax
//!
//! - `/topics` - literal segment
//! - `/users/:id` - parameter matching one non-empty segment
//! - `/files/*path` - wildcard matching the rest of the path (last segment only)
//! - `/files/*` - unnamed wildcard, captured as `*`

use std::fmt;
use std::str::FromStr;

/// Error compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),
    #[error("Empty segment at position {position} in {pattern:?}")]
    EmptySegment { pattern: String, position: usize },
    #[error("Parameter name is empty in {0:?}")]
    EmptyParamName(String),
    #[error("Parameter {name:?} appears more than once in {pattern:?}")]
    DuplicateParam { pattern: String, name: String },
    #[error("Wildcard must be the last segment in {0:?}")]
    WildcardNotLast(String),
    #[error("Wildcard cannot be followed by a trailing slash in {0:?}")]
    WildcardTrailingSlash(String),
}

/// Name under which an unnamed wildcard is captured.
pub const UNNAMED_WILDCARD: &str = "*";

/// One compiled segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches one path segment with exactly this text
    Literal(String),
    /// Matches one non-empty path segment and captures it
    Param(String),
    /// Matches the remainder of the path and captures it
    Wildcard(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Param(name) => write!(f, ":{name}"),
            Self::Wildcard(name) if name == UNNAMED_WILDCARD => f.write_str("*"),
            Self::Wildcard(name) => write!(f, "*{name}"),
        }
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl RoutePattern {
    /// Compile a pattern string.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let body = source
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(source.to_string()))?;

        // "/" is the root pattern: no segments, no trailing slash.
        if body.is_empty() {
            return Ok(Self {
                source: source.to_string(),
                segments: Vec::new(),
                trailing_slash: false,
            });
        }

        let (body, trailing_slash) = match body.strip_suffix('/') {
            Some(rest) => (rest, true),
            None => (body, false),
        };

        let raw: Vec<&str> = body.split('/').collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut names: Vec<String> = Vec::new();

        for (position, text) in raw.iter().enumerate() {
            if text.is_empty() {
                return Err(PatternError::EmptySegment {
                    pattern: source.to_string(),
                    position,
                });
            }

            let segment = if let Some(name) = text.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName(source.to_string()));
                }
                Segment::Param(name.to_string())
            } else if let Some(name) = text.strip_prefix('*') {
                if position + 1 != raw.len() {
                    return Err(PatternError::WildcardNotLast(source.to_string()));
                }
                // The rest of the path already includes any trailing slash.
                if trailing_slash {
                    return Err(PatternError::WildcardTrailingSlash(source.to_string()));
                }
                let name = if name.is_empty() { UNNAMED_WILDCARD } else { name };
                Segment::Wildcard(name.to_string())
            } else {
                Segment::Literal((*text).to_string())
            };

            if let Segment::Param(name) | Segment::Wildcard(name) = &segment {
                if names.contains(name) {
                    return Err(PatternError::DuplicateParam {
                        pattern: source.to_string(),
                        name: name.clone(),
                    });
                }
                names.push(name.clone());
            }

            segments.push(segment);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            trailing_slash,
        })
    }

    /// Compile a nested pattern by appending `suffix` to this pattern.
    ///
    /// `/topics` joined with `/rendering` (or `rendering`) is `/topics/rendering`.
    pub fn join(&self, suffix: &str) -> Result<Self, PatternError> {
        let base = self.source.trim_end_matches('/');
        let suffix = suffix.trim_start_matches('/');
        Self::parse(&format!("{base}/{suffix}"))
    }

    /// The pattern source as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern ends with `/` (significant in strict mode only).
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Whether this is the root pattern `/`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names of the captured parameters, in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) | Segment::Wildcard(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Lowercased text of the first segment, if it is a literal.
    ///
    /// A path whose first segment differs can never match this pattern.
    pub fn prefix_key(&self) -> Option<String> {
        match self.segments.first() {
            Some(Segment::Literal(text)) => Some(text.to_ascii_lowercase()),
            _ => None,
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for RoutePattern {
    type Error = PatternError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

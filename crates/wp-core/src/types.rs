//! Core type definitions for Waypoint
//!
//! These types are shared by the matcher, the navigator and the bindings.

use serde::{Deserialize, Serialize};

// =============================================================================
// Match Flags
// =============================================================================

bitflags::bitflags! {
    /// Options controlling how a pattern is matched against a path.
    ///
    /// The empty set is a case-sensitive, non-strict prefix match.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MatchFlags: u8 {
        /// Reject matches that do not consume the whole path
        const EXACT = 1 << 0;
        /// Trailing slashes are significant
        const STRICT = 1 << 1;
        /// Literal segments compare ASCII-case-insensitively
        const IGNORE_CASE = 1 << 2;
    }
}

// =============================================================================
// Navigation Mode
// =============================================================================

/// How a navigation affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Append a new history entry
    #[default]
    Push,
    /// Overwrite the current history entry
    Replace,
}

impl NavigationMode {
    /// Pick the mode for a trigger carrying a `replace` flag.
    #[inline]
    pub fn from_replace(replace: bool) -> Self {
        if replace {
            Self::Replace
        } else {
            Self::Push
        }
    }
}

// =============================================================================
// Params
// =============================================================================

/// Parameters captured by a match, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.0.push((name.to_string(), value.to_string()));
    }

    /// Look up a captured value by parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// =============================================================================
// Path Match
// =============================================================================

/// Result of matching a path against a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMatch {
    /// Source of the pattern that matched, `None` for an unconditional match
    pub pattern: Option<String>,
    /// Prefix of the path consumed by the match
    pub url: String,
    /// Whether `url` covers the whole path
    pub is_exact: bool,
    /// Captured `:param` and `*rest` values
    pub params: Params,
}

impl PathMatch {
    /// The match produced when no pattern is configured.
    pub fn unconditional(pathname: &str) -> Self {
        Self {
            pattern: None,
            url: pathname.to_string(),
            is_exact: true,
            params: Params::new(),
        }
    }
}

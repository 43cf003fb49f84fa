//! Locations and navigation target resolution
//!
//! A [`Location`] is the path part of a URL split into pathname, query and
//! fragment. Targets handed to the navigator are resolved against the
//! current location the same way a browser resolves a `pushState` URL.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed history location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path, always starting with `/` for resolved locations
    pub pathname: String,
    /// Query string including the leading `?`, or empty
    pub search: String,
    /// Fragment including the leading `#`, or empty
    pub hash: String,
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl Location {
    /// The location `/`.
    pub fn root() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
        }
    }

    /// Split a target into its parts without resolving it.
    pub fn parse(target: &str) -> Self {
        let (rest, hash) = match target.find('#') {
            Some(pos) => (&target[..pos], &target[pos..]),
            None => (target, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, ""),
        };

        Self {
            pathname: pathname.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Resolve `target` against this location.
    ///
    /// - `/about` replaces the path
    /// - `?tab=2` keeps the path
    /// - `#top` keeps the path and the query
    /// - `rendering`, `../about` resolve against the current directory
    pub fn resolve(&self, target: &str) -> Self {
        if target.is_empty() {
            return Self {
                hash: String::new(),
                ..self.clone()
            };
        }

        let parsed = Self::parse(target);

        if target.starts_with('#') {
            return Self {
                pathname: self.pathname.clone(),
                search: self.search.clone(),
                hash: parsed.hash,
            };
        }

        if target.starts_with('?') {
            return Self {
                pathname: self.pathname.clone(),
                ..parsed
            };
        }

        let joined = if parsed.pathname.starts_with('/') {
            parsed.pathname
        } else {
            let dir_end = self.pathname.rfind('/').map(|pos| pos + 1).unwrap_or(0);
            let dir = if dir_end == 0 { "/" } else { &self.pathname[..dir_end] };
            format!("{dir}{}", parsed.pathname)
        };

        Self {
            pathname: remove_dot_segments(&joined),
            ..parsed
        }
    }

    /// Lowercased first path segment, used to route broadcasts.
    pub fn first_segment(&self) -> String {
        self.pathname
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

impl From<&str> for Location {
    fn from(target: &str) -> Self {
        Location::root().resolve(target)
    }
}

fn remove_dot_segments(path: &str) -> String {
    let body = path.strip_prefix('/').unwrap_or(path);
    let parts: Vec<&str> = body.split('/').collect();
    let last = parts.len() - 1;
    let mut out: Vec<&str> = Vec::with_capacity(parts.len());

    for (i, part) in parts.iter().enumerate() {
        match *part {
            "." => {
                if i == last {
                    out.push("");
                }
            }
            ".." => {
                out.pop();
                if i == last {
                    out.push("");
                }
            }
            other => out.push(other),
        }
    }

    format!("/{}", out.join("/"))
}

//! Waypoint Core Library
//!
//! This crate provides the route-matching and navigation-history core of the
//! Waypoint client-side router. It has no browser dependency: the host's
//! history stack is reached through the [`History`] trait, and
//! [`MemoryHistory`] provides an in-process implementation.
//!
//! # Architecture
//!
//! A [`Navigator`] is the navigation context owned by the top-level
//! application. Route observers register with it when they mount and leave
//! it when they unmount. Every navigation mutates the history and then
//! synchronously asks the registered observers to re-run the path matcher
//! against the new location.
//!
//! # Modules
//!
//! - `pattern`: Structured route patterns (literal segments, `:param`, `*rest`)
//! - `matcher`: The path matcher
//! - `location`: Parsed locations and target resolution
//! - `history`: History abstraction and the in-memory history
//! - `navigator`: Navigation context and observer registry
//! - `route`: Route observers
//! - `link`: Navigation triggers
//! - `redirect`: One-shot redirects
//! - `types`: Shared type definitions

pub mod history;
pub mod link;
pub mod location;
pub mod matcher;
pub mod navigator;
pub mod pattern;
pub mod redirect;
pub mod route;
pub mod types;

// Re-export commonly used types
pub use history::{History, HistoryError, MemoryHistory, Traversal};
pub use link::{ActivationEvent, Click, Link};
pub use location::Location;
pub use matcher::match_path;
pub use navigator::{NavigationError, Navigator, Observer, Subscription};
pub use pattern::{PatternError, RoutePattern, Segment};
pub use redirect::Redirect;
pub use route::{Component, MountedRoute, Route, RouteProps};
pub use types::{MatchFlags, NavigationMode, Params, PathMatch};

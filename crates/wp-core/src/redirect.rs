//! One-shot redirects

use std::cell::Cell;

use log::debug;

use crate::navigator::{NavigationError, Navigator};
use crate::types::NavigationMode;

/// Navigates to `to` the first time it appears. Produces no content.
///
/// Replaces the current entry unless `push` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    to: String,
    push: bool,
    fired: Cell<bool>,
}

impl Redirect {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            push: false,
            fired: Cell::new(false),
        }
    }

    pub fn push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn mode(&self) -> NavigationMode {
        NavigationMode::from_replace(!self.push)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }

    /// Perform the redirect if it has not happened yet.
    ///
    /// Returns whether a navigation took place.
    pub fn mount(&self, navigator: &Navigator) -> Result<bool, NavigationError> {
        if self.fired.replace(true) {
            return Ok(false);
        }
        debug!("redirect to {} ({:?})", self.to, self.mode());
        navigator.navigate(&self.to, self.mode())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;

    #[test]
    fn test_redirect_replaces_by_default() {
        let navigator = Navigator::new(MemoryHistory::with_initial("/old"));
        let redirect = Redirect::new("/new");

        assert!(redirect.mount(&navigator).unwrap());
        assert_eq!(navigator.location().pathname, "/new");
        assert_eq!(navigator.history_len(), 1);
    }

    #[test]
    fn test_redirect_can_push() {
        let navigator = Navigator::new(MemoryHistory::with_initial("/old"));
        Redirect::new("/new").push(true).mount(&navigator).unwrap();

        assert_eq!(navigator.history_len(), 2);
    }

    #[test]
    fn test_redirect_fires_once() {
        let navigator = Navigator::new(MemoryHistory::new());
        let redirect = Redirect::new("/new").push(true);

        assert!(redirect.mount(&navigator).unwrap());
        assert!(!redirect.mount(&navigator).unwrap());
        assert!(redirect.has_fired());
        assert_eq!(navigator.history_len(), 2);
        assert_eq!(navigator.generation(), 1);
    }
}

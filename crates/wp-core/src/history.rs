//! History abstraction
//!
//! The router never owns the current location: it reads it from, and writes
//! transitions to, a [`History`] provided by the host. [`MemoryHistory`] is
//! the in-process host used by tests and by the command-line demo.

use crate::location::Location;

/// Error reported by a history host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("History is unavailable: {0}")]
    Unavailable(String),
    #[error("History rejected {op} of {target:?}: {reason}")]
    Rejected {
        op: &'static str,
        target: String,
        reason: String,
    },
}

/// Outcome of a history traversal (back/forward/go).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// The current entry changed synchronously
    Moved,
    /// The host will report the change later through a pop notification
    Deferred,
    /// No entry exists at the requested offset; nothing changed
    OutOfRange,
}

/// A host history stack.
pub trait History {
    /// The current location.
    fn location(&self) -> Location;

    /// Append a new entry and make it current.
    fn push(&mut self, location: &Location) -> Result<(), HistoryError>;

    /// Overwrite the current entry.
    fn replace(&mut self, location: &Location) -> Result<(), HistoryError>;

    /// Move `delta` entries through the stack.
    fn go(&mut self, delta: isize) -> Result<Traversal, HistoryError>;

    /// Number of entries in the stack.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Memory History
// =============================================================================

/// An in-memory history stack with a cursor.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHistory {
    /// A history holding a single `/` entry.
    pub fn new() -> Self {
        Self {
            entries: vec![Location::root()],
            index: 0,
        }
    }

    /// A history holding a single entry at `target`.
    pub fn with_initial(target: &str) -> Self {
        Self {
            entries: vec![Location::from(target)],
            index: 0,
        }
    }

    /// A history holding `targets`, positioned on the last one.
    ///
    /// An empty list yields the same history as [`MemoryHistory::new`].
    pub fn with_entries<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<Location> = targets
            .into_iter()
            .map(|target| Location::from(target.as_ref()))
            .collect();
        if entries.is_empty() {
            return Self::new();
        }
        let index = entries.len() - 1;
        Self { entries, index }
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn can_go(&self, delta: isize) -> bool {
        self.target_index(delta).is_some()
    }

    fn target_index(&self, delta: isize) -> Option<usize> {
        let target = self.index.checked_add_signed(delta)?;
        (target < self.entries.len()).then_some(target)
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.entries[self.index].clone()
    }

    fn push(&mut self, location: &Location) -> Result<(), HistoryError> {
        self.entries.truncate(self.index + 1);
        self.entries.push(location.clone());
        self.index = self.entries.len() - 1;
        Ok(())
    }

    fn replace(&mut self, location: &Location) -> Result<(), HistoryError> {
        self.entries[self.index] = location.clone();
        Ok(())
    }

    fn go(&mut self, delta: isize) -> Result<Traversal, HistoryError> {
        match self.target_index(delta) {
            Some(target) => {
                self.index = target;
                Ok(Traversal::Moved)
            }
            None => Ok(Traversal::OutOfRange),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(history: &MemoryHistory) -> Vec<String> {
        history.entries().iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_new_starts_at_root() {
        let history = MemoryHistory::new();
        assert_eq!(history.location().pathname, "/");
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }

    #[test]
    fn test_push_appends_and_replace_overwrites() {
        let mut history = MemoryHistory::new();
        history.push(&Location::from("/about")).unwrap();
        history.replace(&Location::from("/topics")).unwrap();

        assert_eq!(paths(&history), vec!["/", "/topics"]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = MemoryHistory::with_entries(["/", "/about", "/topics"]);
        assert_eq!(history.go(-2).unwrap(), Traversal::Moved);
        history.push(&Location::from("/x")).unwrap();

        assert_eq!(paths(&history), vec!["/", "/x"]);
        assert_eq!(history.location().pathname, "/x");
    }

    #[test]
    fn test_go_out_of_range_does_not_move() {
        let mut history = MemoryHistory::with_entries(["/", "/about"]);
        assert_eq!(history.go(1).unwrap(), Traversal::OutOfRange);
        assert_eq!(history.go(-2).unwrap(), Traversal::OutOfRange);
        assert_eq!(history.location().pathname, "/about");

        assert_eq!(history.go(-1).unwrap(), Traversal::Moved);
        assert_eq!(history.location().pathname, "/");
        assert!(history.can_go(1));
        assert!(!history.can_go(-1));
    }

    #[test]
    fn test_with_initial_and_empty_entries() {
        assert_eq!(MemoryHistory::with_initial("/topics").location().pathname, "/topics");
        let empty: [&str; 0] = [];
        assert_eq!(MemoryHistory::with_entries(empty).location().pathname, "/");
    }
}

//! Navigation context and observer registry
//!
//! A [`Navigator`] owns the host history and the ordered list of mounted
//! observers. Every transition (push, replace, back/forward) bumps the
//! navigation generation and then synchronously asks the observers to
//! re-evaluate, in mount order.
//!
//! # Broadcast rules
//!
//! - The observer list is snapshotted before a broadcast. Observers that
//!   register during the broadcast are not part of it; observers that
//!   unsubscribe before being reached are skipped.
//! - No internal borrow is held while an observer runs, so observers may
//!   navigate, mount or unmount from inside `refresh`.
//! - Each entry may carry a prefix key (the first literal segment of its
//!   pattern). Entries whose key cannot match the new path are skipped
//!   unless their previous refresh matched, so they can clear their output.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

use crate::history::{History, HistoryError, Traversal};
use crate::location::Location;
use crate::types::NavigationMode;

/// Error raised while navigating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("History operation failed: {0}")]
    History(#[from] HistoryError),
}

/// Something that re-evaluates itself when the location changes.
pub trait Observer {
    /// Re-evaluate against the navigator's current location.
    ///
    /// Returns whether the observer matched, i.e. currently produces content.
    fn refresh(&self, navigator: &Navigator) -> bool;
}

struct Entry {
    id: u64,
    observer: Rc<dyn Observer>,
    key: Option<String>,
    live: Cell<bool>,
    active: Cell<bool>,
}

impl Entry {
    fn wants(&self, first_segment: &str) -> bool {
        match &self.key {
            None => true,
            Some(key) => key == first_segment || self.active.get(),
        }
    }
}

struct Shared {
    history: RefCell<Box<dyn History>>,
    entries: RefCell<Vec<Rc<Entry>>>,
    next_id: Cell<u64>,
    generation: Cell<u64>,
}

impl Shared {
    fn remove(&self, id: u64) {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| entries.remove(index))
        };
        // Dropped outside the borrow: the observer may own subscriptions too.
        if let Some(entry) = removed {
            entry.live.set(false);
            trace!("observer {} unregistered", id);
        }
    }
}

/// Navigation context shared by every route of one router instance.
///
/// Cloning is cheap; all clones refer to the same history and registry.
#[derive(Clone)]
pub struct Navigator {
    shared: Rc<Shared>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("location", &self.location().to_string())
            .field("generation", &self.generation())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl Navigator {
    pub fn new<H: History + 'static>(history: H) -> Self {
        Self {
            shared: Rc::new(Shared {
                history: RefCell::new(Box::new(history)),
                entries: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                generation: Cell::new(0),
            }),
        }
    }

    /// The host's current location.
    pub fn location(&self) -> Location {
        self.shared.history.borrow().location()
    }

    /// Counter bumped by every transition.
    pub fn generation(&self) -> u64 {
        self.shared.generation.get()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.entries.borrow().len()
    }

    /// Number of entries in the host history.
    pub fn history_len(&self) -> usize {
        self.shared.history.borrow().len()
    }

    /// Register an observer and evaluate it once against the current location.
    ///
    /// The entry stays registered until the returned [`Subscription`] is
    /// dropped. Registering the same observer twice yields two entries.
    pub fn register(&self, observer: Rc<dyn Observer>, key: Option<String>) -> Subscription {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);

        let entry = Rc::new(Entry {
            id,
            observer,
            key,
            live: Cell::new(true),
            active: Cell::new(false),
        });
        self.shared.entries.borrow_mut().push(Rc::clone(&entry));
        trace!("observer {} registered (key {:?})", id, entry.key);

        self.notify(&entry);

        Subscription {
            shared: Rc::downgrade(&self.shared),
            entry: Rc::downgrade(&entry),
            id,
        }
    }

    /// Navigate to `target`, resolved against the current location.
    pub fn navigate(&self, target: &str, mode: NavigationMode) -> Result<Location, NavigationError> {
        let location = {
            let mut history = self.shared.history.borrow_mut();
            let location = history.location().resolve(target);
            match mode {
                NavigationMode::Push => history.push(&location)?,
                NavigationMode::Replace => history.replace(&location)?,
            }
            location
        };

        debug!("{:?} {}", mode, location);
        self.transition();
        Ok(location)
    }

    /// Append a history entry for `target`.
    pub fn push(&self, target: &str) -> Result<Location, NavigationError> {
        self.navigate(target, NavigationMode::Push)
    }

    /// Overwrite the current history entry with `target`.
    pub fn replace(&self, target: &str) -> Result<Location, NavigationError> {
        self.navigate(target, NavigationMode::Replace)
    }

    /// Move `delta` entries through the history.
    pub fn go(&self, delta: isize) -> Result<Traversal, NavigationError> {
        let traversal = self.shared.history.borrow_mut().go(delta)?;
        match traversal {
            Traversal::Moved => {
                debug!("go({}) -> {}", delta, self.location());
                self.transition();
            }
            Traversal::Deferred => debug!("go({}) deferred to host", delta),
            Traversal::OutOfRange => warn!("go({}) ignored: no such history entry", delta),
        }
        Ok(traversal)
    }

    pub fn back(&self) -> Result<Traversal, NavigationError> {
        self.go(-1)
    }

    pub fn forward(&self) -> Result<Traversal, NavigationError> {
        self.go(1)
    }

    /// Entry point for the host's back/forward notification.
    pub fn handle_pop(&self) {
        debug!("pop -> {}", self.location());
        self.transition();
    }

    fn transition(&self) {
        self.shared.generation.set(self.generation() + 1);
        self.broadcast();
    }

    fn broadcast(&self) {
        let snapshot: Vec<Rc<Entry>> = self.shared.entries.borrow().clone();
        let first_segment = self.location().first_segment();
        let generation = self.generation();

        debug!(
            "broadcast #{} to {} observer(s)",
            generation,
            snapshot.len()
        );

        for entry in &snapshot {
            if !entry.live.get() {
                continue;
            }
            // A nested navigation already refreshed everyone for a newer location.
            if self.generation() != generation {
                trace!("broadcast #{} superseded", generation);
                break;
            }
            if !entry.wants(&first_segment) {
                trace!("observer {} skipped (key {:?})", entry.id, entry.key);
                continue;
            }
            self.notify(entry);
        }
    }

    fn notify(&self, entry: &Entry) {
        let generation = self.generation();
        let matched = entry.observer.refresh(self);
        // Results computed for a stale location are discarded.
        if self.generation() == generation {
            entry.active.set(matched);
        }
        trace!("observer {} refreshed (matched {})", entry.id, matched);
    }
}

/// Registration guard returned by [`Navigator::register`].
///
/// Dropping it removes the entry from the registry.
pub struct Subscription {
    shared: Weak<Shared>,
    entry: Weak<Entry>,
    id: u64,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the observer's last refresh matched.
    pub fn is_active(&self) -> bool {
        self.entry.upgrade().map(|e| e.active.get()).unwrap_or(false)
    }

    pub(crate) fn set_active(&self, active: bool) {
        if let Some(entry) = self.entry.upgrade() {
            entry.active.set(active);
        }
    }

    /// Leave the registry now instead of at drop.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;

    /// Records every location it is refreshed with into a shared log.
    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        matches: Box<dyn Fn(&Location) -> bool>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Rc<Self> {
            Rc::new(Self {
                name,
                log: Rc::clone(log),
                matches: Box::new(|_| true),
            })
        }
    }

    impl Observer for Recorder {
        fn refresh(&self, navigator: &Navigator) -> bool {
            let location = navigator.location();
            self.log
                .borrow_mut()
                .push(format!("{}@{}", self.name, location.pathname));
            (self.matches)(&location)
        }
    }

    fn log() -> Rc<RefCell<Vec<String>>> {
        let _ = env_logger::builder().is_test(true).try_init();
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_register_evaluates_immediately() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::with_initial("/about"));
        let _sub = navigator.register(Recorder::new("a", &log), None);

        assert_eq!(*log.borrow(), vec!["a@/about"]);
        assert_eq!(navigator.observer_count(), 1);
    }

    #[test]
    fn test_broadcast_in_mount_order() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let _a = navigator.register(Recorder::new("a", &log), None);
        let _b = navigator.register(Recorder::new("b", &log), None);
        let _c = navigator.register(Recorder::new("c", &log), None);
        log.borrow_mut().clear();

        navigator.push("/about").unwrap();
        navigator.push("/about").unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["a@/about", "b@/about", "c@/about", "a@/about", "b@/about", "c@/about"]
        );
        assert_eq!(navigator.generation(), 2);
    }

    #[test]
    fn test_push_and_replace_mutate_history() {
        let navigator = Navigator::new(MemoryHistory::new());
        navigator.push("/about").unwrap();
        assert_eq!(navigator.history_len(), 2);

        navigator.replace("/topics").unwrap();
        assert_eq!(navigator.history_len(), 2);
        assert_eq!(navigator.location().pathname, "/topics");

        navigator.back().unwrap();
        assert_eq!(navigator.location().pathname, "/");
        navigator.forward().unwrap();
        assert_eq!(navigator.location().pathname, "/topics");
    }

    #[test]
    fn test_dropped_subscription_stops_broadcasts() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let a = navigator.register(Recorder::new("a", &log), None);
        let _b = navigator.register(Recorder::new("b", &log), None);
        a.unsubscribe();
        log.borrow_mut().clear();

        navigator.push("/x").unwrap();

        assert_eq!(*log.borrow(), vec!["b@/x"]);
        assert_eq!(navigator.observer_count(), 1);
    }

    #[test]
    fn test_same_observer_registered_twice_has_two_entries() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let observer = Recorder::new("a", &log);
        let first = navigator.register(observer.clone(), None);
        let _second = navigator.register(observer, None);
        drop(first);
        log.borrow_mut().clear();

        navigator.push("/x").unwrap();
        assert_eq!(*log.borrow(), vec!["a@/x"]);
    }

    #[test]
    fn test_out_of_range_traversal_does_not_broadcast() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let _a = navigator.register(Recorder::new("a", &log), None);
        log.borrow_mut().clear();

        assert_eq!(navigator.back().unwrap(), Traversal::OutOfRange);
        assert!(log.borrow().is_empty());
        assert_eq!(navigator.generation(), 0);
    }

    #[test]
    fn test_handle_pop_broadcasts() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let _a = navigator.register(Recorder::new("a", &log), None);
        log.borrow_mut().clear();

        navigator.handle_pop();
        assert_eq!(*log.borrow(), vec!["a@/"]);
    }

    #[test]
    fn test_keyed_entries_skip_unrelated_paths_but_clear_when_active() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let topics = Rc::new(Recorder {
            name: "topics",
            log: Rc::clone(&log),
            matches: Box::new(|l| l.pathname.starts_with("/topics")),
        });
        let _sub = navigator.register(topics, Some("topics".to_string()));
        log.borrow_mut().clear();

        navigator.push("/about").unwrap();
        assert!(log.borrow().is_empty());

        navigator.push("/topics").unwrap();
        navigator.push("/about").unwrap();
        navigator.push("/home").unwrap();
        assert_eq!(*log.borrow(), vec!["topics@/topics", "topics@/about"]);
    }

    /// Unregisters a sibling the first time it is refreshed after mount.
    struct Unmounter {
        victim: RefCell<Option<Subscription>>,
        armed: Cell<bool>,
    }

    impl Observer for Unmounter {
        fn refresh(&self, _navigator: &Navigator) -> bool {
            if self.armed.get() {
                self.victim.borrow_mut().take();
            }
            self.armed.set(true);
            true
        }
    }

    #[test]
    fn test_unsubscribe_during_broadcast_skips_unreached_entry() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let unmounter = Rc::new(Unmounter {
            victim: RefCell::new(None),
            armed: Cell::new(false),
        });
        let _u = navigator.register(unmounter.clone(), None);
        let victim = navigator.register(Recorder::new("victim", &log), None);
        *unmounter.victim.borrow_mut() = Some(victim);
        log.borrow_mut().clear();

        navigator.push("/x").unwrap();

        assert!(log.borrow().is_empty());
        assert_eq!(navigator.observer_count(), 1);
    }

    /// Mounts a child recorder on every refresh after its own mount.
    struct Mounter {
        log: Rc<RefCell<Vec<String>>>,
        mounted: RefCell<Vec<Subscription>>,
        armed: Cell<bool>,
    }

    impl Observer for Mounter {
        fn refresh(&self, navigator: &Navigator) -> bool {
            if self.armed.get() {
                let sub = navigator.register(Recorder::new("child", &self.log), None);
                self.mounted.borrow_mut().push(sub);
            }
            self.armed.set(true);
            true
        }
    }

    #[test]
    fn test_register_during_broadcast_is_not_part_of_it() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let mounter = Rc::new(Mounter {
            log: Rc::clone(&log),
            mounted: RefCell::new(Vec::new()),
            armed: Cell::new(false),
        });
        let _m = navigator.register(mounter.clone(), None);
        log.borrow_mut().clear();

        navigator.push("/x").unwrap();

        // The child mounted during the broadcast was evaluated once, at mount.
        assert_eq!(*log.borrow(), vec!["child@/x"]);
        assert_eq!(navigator.observer_count(), 2);
    }

    /// Redirects `/old` to `/new` whenever it sees `/old`.
    struct Redirector;

    impl Observer for Redirector {
        fn refresh(&self, navigator: &Navigator) -> bool {
            if navigator.location().pathname == "/old" {
                navigator.replace("/new").unwrap();
            }
            true
        }
    }

    #[test]
    fn test_nested_navigation_supersedes_outer_broadcast() {
        let log = log();
        let navigator = Navigator::new(MemoryHistory::new());
        let _r = navigator.register(Rc::new(Redirector), None);
        let _a = navigator.register(Recorder::new("a", &log), None);
        log.borrow_mut().clear();

        navigator.push("/old").unwrap();

        assert_eq!(*log.borrow(), vec!["a@/new"]);
        assert_eq!(navigator.location().pathname, "/new");
        assert_eq!(navigator.history_len(), 2);
    }
}

//! Navigation triggers

use log::debug;

use crate::navigator::{NavigationError, Navigator};
use crate::types::NavigationMode;

/// The host event that activated a link.
pub trait ActivationEvent {
    /// Suppress the host's default navigation.
    fn prevent_default(&mut self);

    /// Modified activations (ctrl/meta/shift click, non-primary button) are
    /// left to the host, e.g. to open a new tab.
    fn is_modified(&self) -> bool {
        false
    }
}

/// A synthetic activation, for hosts without native events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Click {
    pub modified: bool,
    pub default_prevented: bool,
}

impl Click {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modified() -> Self {
        Self {
            modified: true,
            ..Self::default()
        }
    }
}

impl ActivationEvent for Click {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn is_modified(&self) -> bool {
        self.modified
    }
}

/// An interactive element navigating to `to` when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    to: String,
    replace: bool,
}

impl Link {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: false,
        }
    }

    /// Overwrite the current history entry instead of pushing a new one.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn mode(&self) -> NavigationMode {
        NavigationMode::from_replace(self.replace)
    }

    /// The target resolved against the current location, for rendering.
    pub fn href(&self, navigator: &Navigator) -> String {
        navigator.location().resolve(&self.to).to_string()
    }

    /// Handle an activation.
    ///
    /// Returns `Ok(false)` when the event was left to the host.
    pub fn activate<E>(&self, navigator: &Navigator, event: &mut E) -> Result<bool, NavigationError>
    where
        E: ActivationEvent + ?Sized,
    {
        if event.is_modified() {
            debug!("link to {} left to host (modified activation)", self.to);
            return Ok(false);
        }
        event.prevent_default();
        navigator.navigate(&self.to, self.mode())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use crate::route::Route;

    #[test]
    fn test_push_link_adds_history_entry_and_refreshes_routes() {
        let navigator = Navigator::new(MemoryHistory::new());
        let about = Route::new("/about").unwrap().render(|_| "About").mount(&navigator);
        let mut click = Click::new();

        let navigated = Link::new("/about").activate(&navigator, &mut click).unwrap();

        assert!(navigated);
        assert!(click.default_prevented);
        assert_eq!(navigator.history_len(), 2);
        assert_eq!(navigator.location().pathname, "/about");
        assert_eq!(about.view(), Some("About"));
    }

    #[test]
    fn test_replace_link_overwrites_entry() {
        let navigator = Navigator::new(MemoryHistory::new());
        let link = Link::new("/topics").replace(true);
        assert_eq!(link.mode(), NavigationMode::Replace);

        link.activate(&navigator, &mut Click::new()).unwrap();

        assert_eq!(navigator.history_len(), 1);
        assert_eq!(navigator.location().pathname, "/topics");
    }

    #[test]
    fn test_modified_click_is_left_to_host() {
        let navigator = Navigator::new(MemoryHistory::new());
        let mut click = Click::modified();

        let navigated = Link::new("/about").activate(&navigator, &mut click).unwrap();

        assert!(!navigated);
        assert!(!click.default_prevented);
        assert_eq!(navigator.location().pathname, "/");
        assert_eq!(navigator.generation(), 0);
    }

    #[test]
    fn test_href_resolves_relative_targets() {
        let navigator = Navigator::new(MemoryHistory::with_initial("/topics/"));
        assert_eq!(Link::new("rendering").href(&navigator), "/topics/rendering");
        assert_eq!(Link::new("/about?x=1").href(&navigator), "/about?x=1");
    }
}

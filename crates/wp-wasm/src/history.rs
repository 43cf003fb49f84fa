//! Browser history host

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;
use wp_core::{History, HistoryError, Location, Navigator, Traversal};

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn window() -> Result<Window, HistoryError> {
    web_sys::window().ok_or_else(|| HistoryError::Unavailable("no global window".to_string()))
}

/// `window.history` and `window.location` as a [`History`].
pub struct BrowserHistory {
    window: Window,
    history: web_sys::History,
}

impl BrowserHistory {
    pub fn new() -> Result<Self, HistoryError> {
        let window = window()?;
        let history = window
            .history()
            .map_err(|e| HistoryError::Unavailable(describe(&e)))?;
        Ok(Self { window, history })
    }
}

impl History for BrowserHistory {
    fn location(&self) -> Location {
        let location = self.window.location();
        Location {
            pathname: location.pathname().unwrap_or_else(|_| "/".to_string()),
            search: location.search().unwrap_or_default(),
            hash: location.hash().unwrap_or_default(),
        }
    }

    fn push(&mut self, location: &Location) -> Result<(), HistoryError> {
        let url = location.to_string();
        self.history
            .push_state_with_url(&js_sys::Object::new(), "", Some(&url))
            .map_err(|e| HistoryError::Rejected {
                op: "pushState",
                target: url.clone(),
                reason: describe(&e),
            })
    }

    fn replace(&mut self, location: &Location) -> Result<(), HistoryError> {
        let url = location.to_string();
        self.history
            .replace_state_with_url(&js_sys::Object::new(), "", Some(&url))
            .map_err(|e| HistoryError::Rejected {
                op: "replaceState",
                target: url.clone(),
                reason: describe(&e),
            })
    }

    fn go(&mut self, delta: isize) -> Result<Traversal, HistoryError> {
        let delta = i32::try_from(delta).map_err(|_| HistoryError::Rejected {
            op: "go",
            target: delta.to_string(),
            reason: "delta out of range".to_string(),
        })?;
        self.history
            .go_with_delta(delta)
            .map_err(|e| HistoryError::Rejected {
                op: "go",
                target: delta.to_string(),
                reason: describe(&e),
            })?;
        // The browser reports the move through `popstate`.
        Ok(Traversal::Deferred)
    }

    fn len(&self) -> usize {
        self.history.length().unwrap_or(0) as usize
    }
}

/// Forwards `popstate` events to a navigator while alive.
pub struct PopStateListener {
    window: Window,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl PopStateListener {
    pub fn attach(navigator: &Navigator) -> Result<Self, JsValue> {
        let window = window().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let navigator = navigator.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            navigator.handle_pop();
        });
        window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
        Ok(Self { window, closure })
    }
}

impl Drop for PopStateListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("popstate", self.closure.as_ref().unchecked_ref());
    }
}

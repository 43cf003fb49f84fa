//! WebAssembly bindings for Waypoint
//!
//! `WasmRouter` runs a [`Navigator`] on top of the browser history. Routes
//! registered from JavaScript receive the current match (or `null`) every
//! time the location changes.

mod history;
mod types;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::console;
use wp_core::{
    match_path, ActivationEvent, Link, MatchFlags, NavigationMode, Navigator, Observer, Redirect,
    RoutePattern, Subscription,
};

pub use history::{BrowserHistory, PopStateListener};
pub use types::{JsLocation, JsPathMatch};

use types::to_js;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn flags(exact: bool) -> MatchFlags {
    if exact {
        MatchFlags::EXACT
    } else {
        MatchFlags::empty()
    }
}

fn compile(pattern: Option<String>) -> Result<Option<RoutePattern>, JsValue> {
    match pattern.as_deref() {
        None | Some("") => Ok(None),
        Some(source) => RoutePattern::parse(source).map(Some).map_err(js_error),
    }
}

/// Match `pathname` against `pattern`. Returns the match object or `null`.
#[wasm_bindgen(js_name = matchPath)]
pub fn match_path_js(pathname: &str, pattern: Option<String>, exact: bool) -> Result<JsValue, JsValue> {
    let pattern = compile(pattern)?;
    match match_path(pathname, pattern.as_ref(), flags(exact)) {
        Some(m) => to_js(&JsPathMatch::from(&m)),
        None => Ok(JsValue::NULL),
    }
}

// =============================================================================
// Routes registered from JavaScript
// =============================================================================

struct JsRoute {
    pattern: Option<RoutePattern>,
    flags: MatchFlags,
    callback: js_sys::Function,
}

impl Observer for JsRoute {
    fn refresh(&self, navigator: &Navigator) -> bool {
        let location = navigator.location();
        let path_match = match_path(&location.pathname, self.pattern.as_ref(), self.flags);

        let arg = match &path_match {
            Some(m) => to_js(&JsPathMatch::from(m)).unwrap_or_else(|e| {
                console::error_2(&"route match could not be serialized:".into(), &e);
                JsValue::NULL
            }),
            None => JsValue::NULL,
        };
        if let Err(e) = self.callback.call1(&JsValue::NULL, &arg) {
            console::error_2(&"route callback failed:".into(), &e);
        }
        path_match.is_some()
    }
}

/// Adapts a DOM mouse event to a link activation.
struct MouseActivation(web_sys::MouseEvent);

impl ActivationEvent for MouseActivation {
    fn prevent_default(&mut self) {
        self.0.prevent_default();
    }

    fn is_modified(&self) -> bool {
        let e = &self.0;
        e.button() != 0 || e.meta_key() || e.alt_key() || e.ctrl_key() || e.shift_key()
    }
}

// =============================================================================
// Router
// =============================================================================

/// Every method takes `&self`: route callbacks run synchronously and may
/// call back into the router.
#[wasm_bindgen]
pub struct WasmRouter {
    navigator: Navigator,
    routes: RefCell<HashMap<u32, Subscription>>,
    next_id: Cell<u32>,
    _popstate: PopStateListener,
}

#[wasm_bindgen]
impl WasmRouter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmRouter, JsValue> {
        let history = BrowserHistory::new().map_err(js_error)?;
        let navigator = Navigator::new(history);
        let popstate = PopStateListener::attach(&navigator)?;
        Ok(Self {
            navigator,
            routes: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            _popstate: popstate,
        })
    }

    /// Register `callback` for `pattern`; it is called immediately and after
    /// every navigation with the match object or `null`. Returns a route id.
    pub fn route(
        &self,
        pattern: Option<String>,
        exact: bool,
        callback: js_sys::Function,
    ) -> Result<u32, JsValue> {
        let pattern = compile(pattern)?;
        let key = pattern.as_ref().and_then(RoutePattern::prefix_key);
        let observer = JsRoute {
            pattern,
            flags: flags(exact),
            callback,
        };

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        // The callback runs inside `register`; no borrow of `routes` is held.
        let subscription = self.navigator.register(Rc::new(observer), key);
        self.routes.borrow_mut().insert(id, subscription);
        Ok(id)
    }

    /// Unregister a route. Returns whether it existed.
    pub fn unroute(&self, id: u32) -> bool {
        let removed = self.routes.borrow_mut().remove(&id);
        // Dropped after the borrow ends.
        removed.is_some()
    }

    pub fn navigate(&self, to: &str, replace: bool) -> Result<(), JsValue> {
        self.navigator
            .navigate(to, NavigationMode::from_replace(replace))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Handle a click on an anchor pointing at `to`.
    ///
    /// Returns `false` when the click was left to the browser.
    pub fn click(&self, to: &str, replace: bool, event: web_sys::MouseEvent) -> Result<bool, JsValue> {
        let mut activation = MouseActivation(event);
        Link::new(to)
            .replace(replace)
            .activate(&self.navigator, &mut activation)
            .map_err(js_error)
    }

    pub fn redirect(&self, to: &str, push: bool) -> Result<(), JsValue> {
        Redirect::new(to)
            .push(push)
            .mount(&self.navigator)
            .map(|_| ())
            .map_err(js_error)
    }

    pub fn back(&self) -> Result<(), JsValue> {
        self.navigator.back().map(|_| ()).map_err(js_error)
    }

    pub fn forward(&self) -> Result<(), JsValue> {
        self.navigator.forward().map(|_| ()).map_err(js_error)
    }

    /// The current location object.
    pub fn location(&self) -> Result<JsValue, JsValue> {
        to_js(&JsLocation::from(&self.navigator.location()))
    }

    #[wasm_bindgen(getter, js_name = routeCount)]
    pub fn route_count(&self) -> usize {
        self.routes.borrow().len()
    }

    /// Resolve `to` against the current location, for `href` attributes.
    pub fn href(&self, to: &str) -> String {
        Link::new(to).href(&self.navigator)
    }
}

//! Route observers
//!
//! A [`Route`] declares a pattern and the content to produce when it
//! matches. Mounting it on a [`Navigator`] yields a [`MountedRoute`] that
//! re-evaluates on every navigation until it is unmounted.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::matcher::match_path;
use crate::navigator::{Navigator, Observer, Subscription};
use crate::pattern::{PatternError, RoutePattern};
use crate::types::{MatchFlags, PathMatch};

/// What content receives when its route matches.
pub struct RouteProps<'a> {
    pub path_match: &'a PathMatch,
    pub navigator: &'a Navigator,
}

/// A named content type a route can delegate to.
pub trait Component<V> {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn view(&self, props: &RouteProps<'_>) -> V;

    /// Called when the route stops matching. Components that mounted nested
    /// routes drop them here.
    fn release(&self) {}
}

type RenderFn<V> = Rc<dyn Fn(&RouteProps<'_>) -> V>;

/// A route declaration.
pub struct Route<V> {
    pattern: Option<RoutePattern>,
    flags: MatchFlags,
    component: Option<Rc<dyn Component<V>>>,
    render: Option<RenderFn<V>>,
}

impl<V> Clone for Route<V> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            flags: self.flags,
            component: self.component.clone(),
            render: self.render.clone(),
        }
    }
}

impl<V> fmt::Debug for Route<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_ref().map(|p| p.as_str()))
            .field("flags", &self.flags)
            .field("component", &self.component.as_ref().map(|c| c.name().to_string()))
            .field("has_render", &self.render.is_some())
            .finish()
    }
}

impl<V: 'static> Route<V> {
    /// Declare a route for `pattern`. An empty pattern matches every path.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Ok(Self::any());
        }
        Ok(Self::with_pattern(RoutePattern::parse(pattern)?))
    }

    /// Declare a route that matches every path.
    pub fn any() -> Self {
        Self {
            pattern: None,
            flags: MatchFlags::empty(),
            component: None,
            render: None,
        }
    }

    pub fn with_pattern(pattern: RoutePattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..Self::any()
        }
    }

    /// Only match when the pattern covers the whole path.
    pub fn exact(mut self) -> Self {
        self.flags |= MatchFlags::EXACT;
        self
    }

    pub fn strict(mut self) -> Self {
        self.flags |= MatchFlags::STRICT;
        self
    }

    pub fn ignore_case(mut self) -> Self {
        self.flags |= MatchFlags::IGNORE_CASE;
        self
    }

    pub fn flags(mut self, flags: MatchFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Delegate to `component` on match. Takes precedence over `render`.
    pub fn component<C>(mut self, component: C) -> Self
    where
        C: Component<V> + 'static,
    {
        self.component = Some(Rc::new(component));
        self
    }

    /// Call `render` on match.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&RouteProps<'_>) -> V + 'static,
    {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn pattern(&self) -> Option<&RoutePattern> {
        self.pattern.as_ref()
    }

    pub fn match_flags(&self) -> MatchFlags {
        self.flags
    }

    /// Match `pathname` against this route.
    pub fn matches(&self, pathname: &str) -> Option<PathMatch> {
        match_path(pathname, self.pattern.as_ref(), self.flags)
    }

    /// Produce content for a match: component first, then render, else nothing.
    pub fn produce(&self, path_match: &PathMatch, navigator: &Navigator) -> Option<V> {
        let props = RouteProps {
            path_match,
            navigator,
        };
        if let Some(component) = &self.component {
            trace!("route {:?} -> component {}", path_match.pattern, component.name());
            return Some(component.view(&props));
        }
        self.render.as_ref().map(|render| render(&props))
    }

    /// Join the navigator's registry. The route is evaluated immediately.
    pub fn mount(self, navigator: &Navigator) -> MountedRoute<V> {
        let key = self.pattern.as_ref().and_then(RoutePattern::prefix_key);
        let state = Rc::new(RouteState {
            route: self,
            current: RefCell::new(None),
            output: RefCell::new(None),
        });
        let subscription = navigator.register(state.clone(), key);

        MountedRoute {
            state,
            navigator: navigator.clone(),
            subscription,
        }
    }
}

struct RouteState<V> {
    route: Route<V>,
    current: RefCell<Option<PathMatch>>,
    output: RefCell<Option<V>>,
}

impl<V: 'static> Observer for RouteState<V> {
    fn refresh(&self, navigator: &Navigator) -> bool {
        let generation = navigator.generation();
        let location = navigator.location();
        let path_match = self.route.matches(&location.pathname);
        let matched = path_match.is_some();
        let output = path_match
            .as_ref()
            .and_then(|m| self.route.produce(m, navigator));

        // Content navigated away while rendering; the nested refresh already
        // stored the newer result.
        if navigator.generation() != generation {
            return matched;
        }

        let was_matched = self.current.replace(path_match).is_some();
        // Release the previous output after the borrow ends.
        let previous = self.output.replace(output);
        drop(previous);

        if was_matched && !matched {
            if let Some(component) = &self.route.component {
                trace!("route {:?} released {}", self.route.pattern, component.name());
                component.release();
            }
        }
        matched
    }
}

/// A route registered with a navigator.
///
/// Dropping it (or calling [`MountedRoute::unmount`]) leaves the registry.
pub struct MountedRoute<V: 'static> {
    state: Rc<RouteState<V>>,
    navigator: Navigator,
    subscription: Subscription,
}

impl<V: 'static> MountedRoute<V> {
    /// The match from the last evaluation.
    pub fn current_match(&self) -> Option<PathMatch> {
        self.state.current.borrow().clone()
    }

    pub fn is_matched(&self) -> bool {
        self.state.current.borrow().is_some()
    }

    /// Inspect the produced content without cloning it.
    pub fn with_view<R>(&self, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.state.output.borrow().as_ref())
    }

    /// Re-evaluate outside of a broadcast, e.g. on a normal re-render.
    pub fn refresh(&self) {
        let matched = self.state.refresh(&self.navigator);
        self.subscription.set_active(matched);
    }

    pub fn route(&self) -> &Route<V> {
        &self.state.route
    }

    pub fn subscription_id(&self) -> u64 {
        self.subscription.id()
    }

    pub fn unmount(self) {}
}

impl<V: Clone + 'static> MountedRoute<V> {
    /// The produced content, `None` when the route does not match or has no content.
    pub fn view(&self) -> Option<V> {
        self.state.output.borrow().clone()
    }
}

impl<V: 'static> fmt::Debug for MountedRoute<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedRoute")
            .field("route", &self.state.route)
            .field("subscription", &self.subscription)
            .field("matched", &self.is_matched())
            .finish()
    }
}

//! The demo application: Home, About and Topics pages rendered as text.

use std::cell::RefCell;

use log::{debug, warn};

use wp_core::{Click, Component, Link, MountedRoute, Navigator, Route, RouteProps};

/// Rendered page content, one line per element.
pub type View = Vec<String>;

struct Topic {
    name: &'static str,
    slug: &'static str,
}

const TOPICS: &[Topic] = &[
    Topic { name: "Rendering with React", slug: "rendering" },
    Topic { name: "Components", slug: "components" },
    Topic { name: "Props v. State", slug: "props-v-state" },
];

const NAV: &[(&str, &str)] = &[("Home", "/"), ("About", "/about"), ("Topics", "/topics")];

fn render_link(label: &str, link: &Link, navigator: &Navigator) -> String {
    format!("[{}]({})", label, link.href(navigator))
}

struct Home;

impl Component<View> for Home {
    fn name(&self) -> &str {
        "Home"
    }

    fn view(&self, _props: &RouteProps<'_>) -> View {
        vec!["## Home".to_string()]
    }
}

struct About;

impl Component<View> for About {
    fn name(&self) -> &str {
        "About"
    }

    fn view(&self, _props: &RouteProps<'_>) -> View {
        vec!["## About".to_string()]
    }
}

/// Topic list with nested routes that stay mounted while the page matches.
#[derive(Default)]
struct Topics {
    children: RefCell<Vec<MountedRoute<View>>>,
}

impl Topics {
    fn declare_children(props: &RouteProps<'_>) -> Vec<Route<View>> {
        let base = props.path_match.pattern.as_deref().unwrap_or("/topics");
        let mut routes = Vec::with_capacity(TOPICS.len() + 1);

        for topic in TOPICS {
            match Route::new(&format!("{}/{}", base.trim_end_matches('/'), topic.slug)) {
                Ok(route) => routes.push(route.render(move |_| vec![format!("### {}", topic.name)])),
                Err(e) => warn!("skipping topic {}: {}", topic.slug, e),
            }
        }

        match Route::new(&props.path_match.url) {
            Ok(route) => {
                routes.push(route.exact().render(|_| vec!["### Please select a topic.".to_string()]))
            }
            Err(e) => warn!("skipping topic index: {}", e),
        }

        routes
    }

    fn mount_children(&self, props: &RouteProps<'_>) {
        if !self.children.borrow().is_empty() {
            return;
        }
        let mounted: Vec<MountedRoute<View>> = Self::declare_children(props)
            .into_iter()
            .map(|route| route.mount(props.navigator))
            .collect();
        debug!("topics mounted {} nested route(s)", mounted.len());
        self.children.replace(mounted);
    }
}

impl Component<View> for Topics {
    fn name(&self) -> &str {
        "Topics"
    }

    fn view(&self, props: &RouteProps<'_>) -> View {
        let mut lines = vec!["## Topics".to_string()];

        for topic in TOPICS {
            let link = Link::new(format!("{}/{}", props.path_match.url, topic.slug));
            lines.push(format!("  - {}", render_link(topic.name, &link, props.navigator)));
        }

        self.mount_children(props);
        for child in self.children.borrow().iter() {
            // Children sit after this page in the registry and have not seen
            // the new location yet.
            child.refresh();
            child.with_view(|view| {
                if let Some(view) = view {
                    lines.extend(view.iter().cloned());
                }
            });
        }

        lines
    }

    fn release(&self) {
        let children = self.children.take();
        debug!("topics unmounted {} nested route(s)", children.len());
    }
}

/// The mounted application.
pub struct App {
    navigator: Navigator,
    routes: Vec<MountedRoute<View>>,
}

impl App {
    pub fn mount(navigator: &Navigator) -> Result<Self, String> {
        let declare = |pattern: &str| -> Result<Route<View>, String> {
            Route::new(pattern).map_err(|e| format!("Invalid route pattern: {}", e))
        };

        let routes = vec![
            declare("/")?.exact().component(Home).mount(navigator),
            declare("/about")?.component(About).mount(navigator),
            declare("/topics")?.component(Topics::default()).mount(navigator),
        ];

        Ok(Self {
            navigator: navigator.clone(),
            routes,
        })
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Activate the nav link (or any link) pointing at `to`.
    pub fn click(&self, to: &str, replace: bool) -> Result<(), String> {
        Link::new(to)
            .replace(replace)
            .activate(&self.navigator, &mut Click::new())
            .map(|_| ())
            .map_err(|e| format!("Navigation failed: {}", e))
    }

    /// Content of every matching route, in declaration order.
    pub fn content(&self) -> View {
        self.routes
            .iter()
            .filter_map(MountedRoute::view)
            .flatten()
            .collect()
    }

    /// The whole screen: nav bar, rule, content.
    pub fn screen(&self) -> View {
        let nav: Vec<String> = NAV
            .iter()
            .map(|(label, to)| render_link(label, &Link::new(*to), &self.navigator))
            .collect();

        let mut lines = vec![nav.join(" | "), "-".repeat(40)];
        lines.extend(self.content());
        lines
    }
}

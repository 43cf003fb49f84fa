//! Navigation steps for driving the demo from the command line.
//!
//! - `/about` - click a link to `/about`
//! - `replace:/about` - click a replacing link
//! - `redirect:/about`, `redirect-push:/about` - render a redirect
//! - `back`, `forward`, `go:-2` - traverse history
//! - `pop` - deliver a back/forward notification without moving

use std::str::FromStr;

use wp_core::{Redirect, Traversal};

use crate::demo::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Click { to: String, replace: bool },
    Redirect { to: String, push: bool },
    Go(isize),
    Pop,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let step = match s {
            "back" => Step::Go(-1),
            "forward" => Step::Go(1),
            "pop" => Step::Pop,
            _ => {
                let (verb, arg) = if s.starts_with('/') {
                    ("", s)
                } else {
                    s.split_once(':').unwrap_or(("", s))
                };
                match verb {
                    "" => Step::Click { to: arg.to_string(), replace: false },
                    "push" => Step::Click { to: arg.to_string(), replace: false },
                    "replace" => Step::Click { to: arg.to_string(), replace: true },
                    "redirect" => Step::Redirect { to: arg.to_string(), push: false },
                    "redirect-push" => Step::Redirect { to: arg.to_string(), push: true },
                    "go" => Step::Go(
                        arg.parse()
                            .map_err(|e| format!("Invalid go delta '{}': {}", arg, e))?,
                    ),
                    _ => return Err(format!("Unknown step '{}'", s)),
                }
            }
        };

        if let Step::Click { to, .. } | Step::Redirect { to, .. } = &step {
            if to.is_empty() {
                return Err(format!("Step '{}' has no target", s));
            }
        }
        Ok(step)
    }
}

impl Step {
    /// Apply the step. Returns a note when nothing happened.
    pub fn apply(&self, app: &App) -> Result<Option<String>, String> {
        let navigator = app.navigator();
        match self {
            Step::Click { to, replace } => app.click(to, *replace).map(|_| None),
            Step::Redirect { to, push } => Redirect::new(to.as_str())
                .push(*push)
                .mount(navigator)
                .map(|_| None)
                .map_err(|e| format!("Redirect failed: {}", e)),
            Step::Go(delta) => match navigator.go(*delta) {
                Ok(Traversal::OutOfRange) => Ok(Some(format!("no history entry at {:+}", delta))),
                Ok(_) => Ok(None),
                Err(e) => Err(format!("Traversal failed: {}", e)),
            },
            Step::Pop => {
                navigator.handle_pop();
                Ok(None)
            }
        }
    }
}

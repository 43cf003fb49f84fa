//! Waypoint CLI
//!
//! CLI tool for inspecting route matching and running the demo application.

mod demo;
mod script;

use std::io::{self, BufRead};

use clap::{Parser, Subcommand};
use log::debug;

use wp_core::{match_path, Location, MatchFlags, MemoryHistory, Navigator, RoutePattern};

use crate::demo::App;
use crate::script::Step;

#[derive(Parser)]
#[command(name = "wp-cli")]
#[command(about = "Waypoint route matcher and demo application")]
struct Cli {
    /// Log navigation and broadcasts (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a path against a route pattern
    Match {
        /// Current path
        path: String,

        /// Route pattern; omit to match unconditionally
        #[arg(short, long)]
        pattern: Option<String>,

        /// Reject matches that do not cover the whole path
        #[arg(long)]
        exact: bool,

        /// Require the pattern's trailing slash
        #[arg(long)]
        strict: bool,

        /// Compare literal segments case-insensitively
        #[arg(long)]
        ignore_case: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a route pattern and show its segments
    Pattern {
        pattern: String,
    },

    /// Resolve a navigation target against a base location
    Resolve {
        base: String,
        target: String,
    },

    /// Run the Home/About/Topics demo
    Demo {
        /// Initial location
        #[arg(short, long, default_value = "/")]
        start: String,

        /// Steps to apply, e.g. /topics /topics/rendering back replace:/about
        steps: Vec<String>,

        /// Read further steps from stdin, one per line
        #[arg(short, long)]
        interactive: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Match {
            path,
            pattern,
            exact,
            strict,
            ignore_case,
            json,
        } => {
            let mut flags = MatchFlags::empty();
            flags.set(MatchFlags::EXACT, exact);
            flags.set(MatchFlags::STRICT, strict);
            flags.set(MatchFlags::IGNORE_CASE, ignore_case);
            cmd_match(&path, pattern.as_deref(), flags, json)
        }
        Commands::Pattern { pattern } => cmd_pattern(&pattern),
        Commands::Resolve { base, target } => cmd_resolve(&base, &target),
        Commands::Demo {
            start,
            steps,
            interactive,
        } => cmd_demo(&start, &steps, interactive),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<RoutePattern>, String> {
    match pattern {
        None | Some("") => Ok(None),
        Some(source) => RoutePattern::parse(source)
            .map(Some)
            .map_err(|e| format!("Invalid pattern: {}", e)),
    }
}

fn cmd_match(path: &str, pattern: Option<&str>, flags: MatchFlags, json: bool) -> Result<(), String> {
    let pattern = compile(pattern)?;
    let result = match_path(path, pattern.as_ref(), flags);

    if json {
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to encode result: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    match result {
        Some(m) => {
            println!("Match");
            println!("  Pattern:  {}", m.pattern.as_deref().unwrap_or("(none)"));
            println!("  URL:      {}", m.url);
            println!("  Exact:    {}", m.is_exact);
            for (name, value) in m.params.iter() {
                println!("  Param:    {} = {}", name, value);
            }
        }
        None => println!("No match"),
    }
    Ok(())
}

fn cmd_pattern(source: &str) -> Result<(), String> {
    let pattern = compile(Some(source))?
        .ok_or_else(|| "Empty pattern matches every path".to_string())?;

    println!("Pattern: {}", pattern);
    println!("  Segments:       {}", pattern.segments().len());
    for (i, segment) in pattern.segments().iter().enumerate() {
        println!("    [{}] {:?}", i, segment);
    }
    println!("  Trailing slash: {}", pattern.has_trailing_slash());
    let params: Vec<&str> = pattern.param_names().collect();
    if !params.is_empty() {
        println!("  Params:         {}", params.join(", "));
    }
    Ok(())
}

fn cmd_resolve(base: &str, target: &str) -> Result<(), String> {
    println!("{}", Location::from(base).resolve(target));
    Ok(())
}

fn cmd_demo(start: &str, steps: &[String], interactive: bool) -> Result<(), String> {
    let navigator = Navigator::new(MemoryHistory::with_initial(start));
    let app = App::mount(&navigator)?;
    debug!("demo mounted at {}", navigator.location());

    print_screen(&app, "start");

    for raw in steps {
        run_step(&app, raw)?;
    }

    if interactive {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.map_err(|e| format!("Failed to read stdin: {}", e))?;
            if line.trim().is_empty() {
                continue;
            }
            // Typos should not end an interactive session.
            if let Err(e) = run_step(&app, &line) {
                eprintln!("Error: {e}");
            }
        }
    }

    Ok(())
}

fn run_step(app: &App, raw: &str) -> Result<(), String> {
    let step: Step = raw.parse()?;
    if let Some(note) = step.apply(app)? {
        println!("({})", note);
    }
    print_screen(app, raw.trim());
    Ok(())
}

fn print_screen(app: &App, label: &str) {
    let navigator = app.navigator();
    println!();
    println!(
        "== {} -> {} (history: {} entries)",
        label,
        navigator.location(),
        navigator.history_len()
    );
    for line in app.screen() {
        println!("{}", line);
    }
}

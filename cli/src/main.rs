//! teki CLI: driving adapter for the teki template engine.
//!
//! Subcommands:
//! - `match <template> <url> [--trace]`: print captured parameters as JSON
//! - `reverse <template> [name=value...]`: build a URL from parameters
//! - `check <template>...`: validate templates
//! - `resolve --routes <file> <url>`: find the first matching route
//! - `link --routes <file> <name> [name=value...]`: build a URL for a named route
//!
//! Exit codes: 0 on success, 1 when nothing matched or `check` found an
//! invalid template, 2 on any other error (including a template that fails
//! to compile under `match`, `reverse` or `link`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use teki::{Params, RouteTable, RouteTableConfig, Template};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("teki: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TEKI_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Arguments
// ═══════════════════════════════════════════════════════════════════════════════

/// Match and build URLs with route templates.
#[derive(Debug, Parser)]
#[command(name = "teki", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match a URL against a template and print the parameters as JSON
    Match {
        /// Route template, e.g. '/user/:id<\d+>'
        template: String,
        /// Absolute or origin-relative URL
        url: String,
        /// Print every matching decision to stderr
        #[arg(long)]
        trace: bool,
    },
    /// Build a URL from a template and parameters
    Reverse {
        /// Route template
        template: String,
        /// Parameters as name=value
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Validate templates
    Check {
        /// Templates to compile
        #[arg(required = true)]
        templates: Vec<String>,
    },
    /// Find the first route in a table that matches a URL
    Resolve {
        /// Route table file (YAML, or JSON by extension)
        #[arg(long, env = "TEKI_ROUTES")]
        routes: PathBuf,
        /// Absolute or origin-relative URL
        url: String,
    },
    /// Build a URL for a named route
    Link {
        /// Route table file (YAML, or JSON by extension)
        #[arg(long, env = "TEKI_ROUTES")]
        routes: PathBuf,
        /// Route name
        name: String,
        /// Parameters as name=value
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("invalid parameter \"{arg}\", expected name=value"))
}

fn to_params(pairs: &[(String, String)]) -> Params {
    pairs
        .iter()
        .map(|(name, value)| (name.clone(), Some(value.clone())))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Match {
            template,
            url,
            trace,
        } => cmd_match(&template, &url, trace),
        Command::Reverse { template, params } => cmd_reverse(&template, &params),
        Command::Check { templates } => Ok(cmd_check(&templates)),
        Command::Resolve { routes, url } => cmd_resolve(&routes, &url),
        Command::Link {
            routes,
            name,
            params,
        } => cmd_link(&routes, &name, &params),
    }
}

fn cmd_match(template: &str, url: &str, trace: bool) -> anyhow::Result<ExitCode> {
    let template = compile(template)?;

    let result = if trace {
        let trace = template.match_with_trace(url);
        for step in &trace.steps {
            eprintln!("{step}");
        }
        trace.result
    } else {
        template.matches(url)
    };

    println!("{}", serde_json::to_string(&result)?);
    Ok(if result.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_reverse(template: &str, params: &[(String, String)]) -> anyhow::Result<ExitCode> {
    let url = compile(template)?.reverse(&to_params(params))?;
    println!("{url}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(templates: &[String]) -> ExitCode {
    let mut valid = true;
    for source in templates {
        match Template::compile(source) {
            Ok(template) => {
                let names: Vec<&str> = template.names().collect();
                println!("ok       {source}  [{}]", names.join(", "));
            }
            Err(e) => {
                valid = false;
                println!("invalid  {source}  {e}");
            }
        }
    }
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_resolve(routes: &Path, url: &str) -> anyhow::Result<ExitCode> {
    let table = load_routes(routes)?;
    match table.resolve(url) {
        Some(hit) => {
            let output = serde_json::json!({ "route": hit.name, "params": hit.params });
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("null");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_link(routes: &Path, name: &str, params: &[(String, String)]) -> anyhow::Result<ExitCode> {
    let table = load_routes(routes)?;
    let url = table.reverse(name, &to_params(params))?;
    println!("{url}");
    Ok(ExitCode::SUCCESS)
}

fn compile(template: &str) -> anyhow::Result<Template> {
    Template::compile(template).with_context(|| format!("cannot compile \"{template}\""))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Route table loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_routes(path: &Path) -> anyhow::Result<RouteTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let table = parse_routes(&content, is_json)
        .with_context(|| format!("invalid route table \"{}\"", path.display()))?;
    tracing::debug!(path = %path.display(), routes = table.len(), "loaded routes");
    Ok(table)
}

fn parse_routes(content: &str, is_json: bool) -> anyhow::Result<RouteTable> {
    let config: RouteTableConfig = if is_json {
        serde_json::from_str(content).context("JSON parse error")?
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(content).context("YAML parse error")?
    };
    Ok(RouteTable::from_config(&config)?)
}

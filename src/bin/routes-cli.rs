use std::path::PathBuf;
use std::str::FromStr;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use reverse_router::config::load_config;
use reverse_router::{Param, QueryParams, RouteRegistry};

#[derive(Parser)]
#[command(name = "routes-cli")]
#[command(about = "Inspect configured named routes and build paths from them", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List named routes
    List,
    /// Build a path from a route name and `key value` pairs
    Build {
        name: String,

        params: Vec<String>,

        /// Extra query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_query_pair)]
        query: Vec<(String, String)>,
    },
    /// Find the name registered for a pattern
    Lookup {
        pattern: String,

        #[arg(short, long)]
        method: Option<String>,
    },
}

fn parse_query_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let registry = RouteRegistry::from_config(&config.routes, config.naming.on_collision)?;

    match cli.command {
        Commands::List => {
            let routes: Vec<Value> = registry
                .iter()
                .map(|(name, route)| {
                    json!({
                        "name": name,
                        "method": route.method().map(|m| m.as_str()),
                        "pattern": route.pattern(),
                        "params": route.params().collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Commands::Build { name, params, query } => {
            let mut extra = QueryParams::new();
            for (key, value) in query {
                extra.entry(key).or_default().push(value);
            }
            let mut args: Vec<Param> = params.into_iter().map(Param::Str).collect();
            args.push(Param::Query(extra));
            println!("{}", reverse_router::routing::build_path(&registry, &name, args)?);
        }
        Commands::Lookup { pattern, method } => {
            let method = method
                .map(|m| Method::from_str(&m.to_ascii_uppercase()))
                .transpose()?;
            match registry.route_name(method.as_ref(), &pattern) {
                Some(name) => println!("{name}"),
                None => {
                    eprintln!("No route named for {pattern}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

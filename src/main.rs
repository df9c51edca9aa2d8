//! Demo server for named routes.
//!
//! Declares a small set of named routes, serves them, and answers every
//! request with links built back from route names.

use std::path::PathBuf;

use axum::{extract::Path, Extension, Json};
use clap::Parser;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use reverse_router::config::{load_config, RouterConfig};
use reverse_router::http::serve;
use reverse_router::observability::init_logging;
use reverse_router::{Mux, RouteRegistry, Routes, Urls};

#[derive(Parser)]
#[command(name = "reverse-router")]
#[command(about = "Demo server for named routes and reverse URL building", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    init_logging(&config.observability)?;
    tracing::info!("reverse-router v0.1.0 starting");

    let registry = RouteRegistry::from_config(&config.routes, config.naming.on_collision)?;
    tracing::info!(
        bind_address = %config.listener.bind_address,
        static_routes = registry.len(),
        on_collision = ?config.naming.on_collision,
        "Configuration loaded"
    );

    let mut mux = Mux::with_registry(registry);
    mux.get("/", index).name("index");
    mux.get("/articles", list_articles).name("articles");
    mux.nest("/articles", |r| {
        r.get("/{slug:[a-z0-9-]+}", show_article).name("article");
    });

    let mut files = Mux::with_policy(config.naming.on_collision);
    files.get("/*", show_file).name("file");
    mux.mount("/static", files);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    serve(listener, mux.into_router()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn index(Extension(urls): Extension<Urls>) -> Json<Value> {
    Json(json!({
        "articles": urls.path("articles", reverse_router::params![]),
        "welcome": urls.path("article", ["slug", "welcome"]),
        "logo": urls.path("file", ["*", "img/logo.png"]),
    }))
}

async fn list_articles(Extension(urls): Extension<Urls>) -> Json<Value> {
    let links: Vec<String> = ["welcome", "named-routes"]
        .into_iter()
        .map(|slug| urls.path("article", ["slug", slug]))
        .collect();
    Json(json!({ "articles": links }))
}

async fn show_article(Extension(urls): Extension<Urls>, Path(slug): Path<String>) -> Json<Value> {
    Json(json!({
        "slug": slug,
        "self": urls.path("article", ["slug", slug.as_str()]),
        "all": urls.path("articles", reverse_router::params![]),
    }))
}

async fn show_file(Path(path): Path<String>) -> String {
    format!("file: {path}\n")
}

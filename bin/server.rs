// Product Catalog - Web Server
// JSON query API plus the catalog listing, detail and contact pages

use anyhow::{Context, Result};
use clap::Parser;
use product_catalog::server::{build_router, shutdown_signal, AppState};
use product_catalog::{logging, Catalog};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-server", version)]
#[command(about = "Serve the financial product catalog over HTTP")]
struct Args {
    /// Interface to bind
    #[arg(long, env = "CATALOG_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port for HTTP server
    #[arg(long, env = "CATALOG_PORT", default_value_t = 3000)]
    port: u16,

    /// Catalog file (.json or .csv); the built-in sample is used when omitted
    #[arg(long, env = "CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Directory served under /static
    #[arg(long, env = "CATALOG_WEB_DIR", default_value = "web")]
    web_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CATALOG_LOG", default_value = "info")]
    log_level: String,
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(&args.log_level);

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path).with_context(|| format!("Failed to load catalog {:?}", path))?,
        None => Catalog::sample(),
    };
    tracing::info!(
        products = catalog.len(),
        categories = catalog.categories().len(),
        source = ?args.catalog,
        "catalog loaded"
    );

    let app = build_router(AppState::new(catalog, args.web_dir.clone()));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "server running");
    println!("\n🚀 Server running on http://localhost:{}", args.port);
    println!("   API: http://localhost:{}/api/products", args.port);
    println!("   UI:  http://localhost:{}", args.port);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

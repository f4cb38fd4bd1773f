//! Geocache CLI
//!
//! Runs the geocoding cache server and offers one-shot maintenance commands.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use geocache_api::{ApiConfig, ApiServer, AppState, CacheBackend};

/// Geocache - address to coordinates with a 30-day cache
#[derive(Parser)]
#[command(name = "geocache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001", env = "PORT")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Resolve one address through the cache and print the payload
    Resolve {
        /// Address to geocode, used verbatim as the cache key
        address: String,
    },

    /// Delete expired rows from the Turso cache store (needs TURSO_DATABASE_URL)
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "geocache=debug,info"
    } else {
        "geocache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(load_config()?, port, &bind).await,
        Commands::Resolve { address } => cmd_resolve(load_config()?, &address).await,
        Commands::Purge => cmd_purge().await,
    }
}

/// Without the provider key nothing may be served.
fn load_config() -> Result<ApiConfig> {
    ApiConfig::from_env().context("Failed to load configuration")
}

/// Run the API server
async fn cmd_serve(config: ApiConfig, port: u16, bind: &str) -> Result<()> {
    println!("{}", "Starting geocache API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config)
        .await
        .context("Failed to initialize server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;
    server.run(addr).await?;

    Ok(())
}

/// Resolve a single address
async fn cmd_resolve(config: ApiConfig, address: &str) -> Result<()> {
    let state = AppState::new(config)
        .await
        .context("Failed to initialize resolver")?;

    let payload = state
        .resolver
        .resolve(Some(address))
        .await
        .with_context(|| format!("Failed to resolve '{}'", address))?;

    let stats = state.resolver.stats();
    let source = if stats.cache_hits > 0 { "cache" } else { "provider" };
    eprintln!("{} {} ({})", "Resolved".green().bold(), address, source.dimmed());
    println!("{}", payload);

    Ok(())
}

/// Purge expired cache rows
async fn cmd_purge() -> Result<()> {
    let backend = CacheBackend::persistent_from_env()
        .await
        .context("Failed to open cache store")?;

    let purged = backend
        .purge_expired()
        .await
        .context("Failed to purge expired entries")?;

    println!(
        "{} {} expired entries from the {} store",
        "Purged".green().bold(),
        purged,
        backend.name()
    );

    Ok(())
}

//! Page analyzer entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use page_analyzer::api::{create_router, AppState};
use page_analyzer::checker::PageChecker;
use page_analyzer::config::{Config, VERBOSE_DIRECTIVE};
use page_analyzer::metrics;
use page_analyzer::normalize::normalize_url;
use page_analyzer::store::Db;
use page_analyzer::utils::shutdown_signal;

/// Page analyzer service.
#[derive(Parser, Debug)]
#[command(name = "page-analyzer")]
#[command(about = "Store site URLs and check their pages for SEO signals")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch one page and print its signals without storing anything.
    Check {
        /// Site URL; it is normalized before the fetch.
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration; RUST_LOG and VERBOSE feed the log filter
    let loaded = Config::load();

    // Initialize logging
    let filter = match &loaded {
        Ok(config) => EnvFilter::try_new(config.log_directive(args.verbose))
            .unwrap_or_else(|_| EnvFilter::new("info")),
        Err(_) if args.verbose => EnvFilter::new(VERBOSE_DIRECTIVE),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::Serve { port }) => cmd_serve(loaded, port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config(loaded),
        Some(Command::Check { url }) => cmd_check(loaded, &url).await,
        None => cmd_serve(loaded, args.port).await,
    }
}

/// Validate the loaded configuration, logging the reason on failure.
fn load_config(loaded: Result<Config, envy::Error>) -> anyhow::Result<Config> {
    let config = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Run the HTTP service until a shutdown signal arrives.
async fn cmd_serve(
    loaded: Result<Config, envy::Error>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config(loaded)?;
    if let Some(port) = port_override {
        config.port = port;
    }

    let metrics_handle = metrics::install_recorder()?;

    let db = Db::connect(&config.database_url, config.db_max_connections).await?;
    let checker = PageChecker::new(&config)?;
    let state = AppState::new(db.clone(), checker).with_metrics(metrics_handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(loaded: Result<Config, envy::Error>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PAGE ANALYZER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match loaded {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Database: {}", config.database_url);
    println!("  Pool Size: {}", config.db_max_connections);
    println!("  Port: {}", config.port);
    println!("  Connect Timeout: {}s", config.connect_timeout_secs);
    println!("  Read Timeout: {}s", config.read_timeout_secs);
    println!("  Max Redirects: {}", config.max_redirects);
    println!("  User-Agent: {}", config.user_agent);
    println!("  Max Body: {} bytes", config.max_body_bytes);
    println!("  Log Filter: {}", config.log_directive(false));
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch one page and print the report.
async fn cmd_check(loaded: Result<Config, envy::Error>, raw: &str) -> anyhow::Result<()> {
    let config = load_config(loaded)?;
    let name = normalize_url(raw)?;
    let checker = PageChecker::new(&config)?;

    info!("Checking {}", name);
    let report = checker.check(&name).await;

    println!("URL:         {}", name);
    println!("Status:      {}", report.status_code);
    println!("Title:       {}", report.signals.title);
    println!("H1:          {}", report.signals.h1);
    println!("Description: {}", report.signals.description);
    if let Some(failure) = &report.failure {
        println!("Failure:     {}", failure);
    }

    Ok(())
}

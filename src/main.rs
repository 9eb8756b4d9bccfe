//! Percolate main entry point
//!
//! This is the command-line interface for the Percolate content collector.

use clap::Parser;
use percolate::collector::CollectorService;
use percolate::config::load_config;
use percolate::server::{build_router, AppState};
use percolate::session::{MemorySessionStore, SessionManager, SessionStore};
use percolate::store::HttpContentStore;
use percolate::{Config, Secrets};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Percolate: a social-content digest collector
///
/// Percolate authenticates stored accounts against Reddit, walks each
/// account's subscribed channels into hot posts and comments, and forwards
/// normalized content digests to a downstream content store.
#[derive(Parser, Debug)]
#[command(name = "percolate")]
#[command(version = "1.0.0")]
#[command(about = "A social-content digest collector", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run one collection over all stored accounts and exit
    #[arg(long, conflicts_with = "dry_run")]
    collect: bool,

    /// Validate config and show the effective plan without collecting
    #[arg(long, conflicts_with = "collect")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(());
    }

    // Application credentials are required for every networked mode
    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    let (service, manager, sessions) = build_service(&config, &secrets)?;

    if cli.collect {
        handle_collect(service).await
    } else {
        handle_serve(config, service, manager, sessions, &secrets).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("percolate=info,warn"),
            1 => EnvFilter::new("percolate=debug,info"),
            2 => EnvFilter::new("percolate=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Wires the shared collaborators every networked mode needs
fn build_service(
    config: &Config,
    secrets: &Secrets,
) -> Result<
    (
        Arc<CollectorService>,
        Arc<SessionManager>,
        Arc<dyn SessionStore>,
    ),
    Box<dyn std::error::Error>,
> {
    let user_agent = config.user_agent.api_user_agent();

    let manager = Arc::new(SessionManager::new(
        &config.reddit,
        &user_agent,
        &secrets.app_id,
        &secrets.app_secret,
    )?);

    let sessions: Arc<dyn SessionStore> = match (&secrets.master_username, &secrets.master_password)
    {
        (Some(username), Some(password)) => {
            Arc::new(MemorySessionStore::with_master(username, password))
        }
        _ => {
            tracing::info!("No master account configured; starting with an empty session store");
            Arc::new(MemorySessionStore::new())
        }
    };

    let sink = Arc::new(HttpContentStore::new(
        &config.store,
        &secrets.api_key,
        &user_agent,
    )?);

    let service = Arc::new(CollectorService::new(
        config.clone(),
        Arc::clone(&manager),
        Arc::clone(&sessions),
        sink,
    )?);

    Ok((service, manager, sessions))
}

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Percolate Dry Run ===\n");

    println!("Collector Configuration:");
    println!(
        "  Max posts per channel: {}",
        config.collector.max_posts_per_channel
    );
    println!("  Min subscribers: {}", config.collector.min_subscribers);
    println!("  Min text length: {}", config.collector.min_text_length);
    println!("  Expand similar: {}", config.collector.expand_similar);
    println!(
        "  Account delay: {}s",
        config.collector.account_delay_seconds
    );

    println!("\nExtractor:");
    println!("  Max text length: {}", config.extractor.max_text_length);
    println!("  Cache capacity: {}", config.extractor.cache_capacity);
    println!(
        "  Fetch timeout: {}s",
        config.extractor.fetch_timeout_seconds
    );
    println!(
        "  Ignored URL patterns: {}",
        config.extractor.ignore_url_patterns.len()
    );

    println!("\nDigest:");
    println!("  Max length: {}", config.digest.max_length);
    println!("  Child length: {}", config.digest.child_length);
    println!("  Body length: {}", config.digest.body_length);

    println!("\nEndpoints:");
    println!("  Data API: {}", config.reddit.data_url);
    println!("  OAuth: {}", config.reddit.oauth_url);
    println!("  Content store: {}", config.store.base_url);
    println!("  Bind: {}", config.server.bind);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.api_user_agent());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --collect mode: one run over every stored account
async fn handle_collect(service: Arc<CollectorService>) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = AtomicBool::new(false);
    let summary = service.collect_all(&cancel).await;

    println!(
        "Collected {} contents and {} engagements across {} accounts",
        summary.contents, summary.engagements, summary.accounts
    );

    Ok(())
}

/// Handles the default mode: serve the HTTP trigger and OAuth endpoints
async fn handle_serve(
    config: Config,
    service: Arc<CollectorService>,
    manager: Arc<SessionManager>,
    sessions: Arc<dyn SessionStore>,
    secrets: &Secrets,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(service, manager, sessions, &config.server, &secrets.api_key);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Listening on {}", config.server.bind);
    axum::serve(listener, router).await?;

    Ok(())
}

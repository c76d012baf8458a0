//! Advertising Inspector Server
//!
//! Checks bankruptcy advertising against Federal Law No. 38-FZ "On
//! Advertising", art. 28.1. Two modes:
//!
//! - `serve`: REST API for text and page analysis plus rendered reports
//! - `check`: one-shot analysis of a file or stdin, report on stdout
//!
//! ## Architecture
//!
//! The compliance engine is built once at startup and shared read-only
//! between requests. This binary owns everything around it:
//!
//! - Page fetching and HTML text extraction
//! - Rate limiting via tower-governor
//! - Request tracing and CORS

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use compliance_engine::report::{OutputFormat, Report, Reporter};
use compliance_engine::{AnalysisEngine, EngineConfig};
use shared_types::MaterialType;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod source;
#[cfg(test)]
mod tests;

use api::{handle_analyze, handle_health, handle_list_categories, handle_report};
use source::{PageFetcher, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Command-line interface for the inspector server
#[derive(Parser, Debug)]
#[command(name = "inspector-server")]
#[command(about = "Bankruptcy advertising compliance inspector", version)]
struct Cli {
    /// Engine configuration file (TOML); statutory defaults when omitted
    #[arg(short, long, global = true, env = "INSPECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the REST API
    Serve(ServeArgs),
    /// Analyze a file (or `-` for stdin) and print a report
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "INSPECTOR_PORT")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "INSPECTOR_HOST")]
    host: String,

    /// Page fetch timeout in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    fetch_timeout: u64,

    /// User agent sent when fetching pages
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Text file to analyze, `-` for stdin
    input: String,

    /// Report format: markdown, html, json or json-pretty
    #[arg(short, long, default_value = "markdown")]
    format: OutputFormat,

    /// Material type: site, text or card
    #[arg(short, long, default_value = "text")]
    material_type: MaterialType,

    /// Write the report into this directory instead of stdout
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnalysisEngine>,
    pub fetcher: Arc<PageFetcher>,
}

/// API routes with tracing; rate limiting and CORS are added by `serve`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/categories", get(handle_list_categories))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/report", post(handle_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn load_engine(config: Option<&PathBuf>) -> anyhow::Result<AnalysisEngine> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    AnalysisEngine::from_config(config).context("Failed to build compliance engine")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let engine = load_engine(cli.config.as_ref())?;

    match cli.command {
        Command::Serve(args) => serve(engine, args).await,
        Command::Check(args) => check(&engine, args),
    }
}

async fn serve(engine: AnalysisEngine, args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting inspector server on {}:{}", args.host, args.port);

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .ok_or_else(|| anyhow!("Invalid rate limit: {}", args.rate_limit))?,
    );

    let fetcher = PageFetcher::new(Duration::from_secs(args.fetch_timeout), &args.user_agent)
        .context("Failed to build HTTP client")?;

    let state = AppState {
        engine: Arc::new(engine),
        fetcher: Arc::new(fetcher),
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state)
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Fetch timeout: {}s", args.fetch_timeout);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn check(engine: &AnalysisEngine, args: CheckArgs) -> anyhow::Result<()> {
    let text = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read {}", args.input))?
    };

    let result = engine.analyze(&text, args.material_type, Default::default());
    let report = Report::new(&result, &text, Local::now().date_naive());
    let reporter = Reporter::for_engine(args.format, engine);

    match &args.output_dir {
        Some(dir) => {
            let path = reporter.write_to_dir(&report, dir)?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", reporter.format(&report)?),
    }

    if result.verdict.is_failing() {
        std::process::exit(1);
    }
    Ok(())
}

//! nenpo-seika - researchmap achievements to annual-report bibliography
//!
//! ## Usage
//!
//! ### Batch Mode
//! ```bash
//! nenpo-seika report users.csv -o seika.tex
//! ```
//!
//! ### Offline Mode (JSON dump of researchmap responses)
//! ```bash
//! nenpo-seika render dump.json --format json
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! nenpo-seika serve --port 3000
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nenpo_seika::{
    batch,
    bibliography::Bibliography,
    config::{SourceConfig, DEFAULT_BASE_URL},
    pipeline, server,
    source::ResearchmapClient,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// researchmap achievements to annual-report bibliography
#[derive(Parser)]
#[command(name = "nenpo-seika")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every researcher in a CSV batch list and render the bibliography
    Report {
        /// Batch list: <rmap_id>[, <lang>][, <date_from>, <date_to>]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Render a JSON dump of researchmap responses without touching the network
    Render {
        /// JSON array of {user_id, lang?, date_from?, date_to?, records: {endpoint: response}}
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Latex)]
    format: OutputFormat,
}

#[derive(Args)]
struct SourceArgs {
    /// researchmap API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Pause after each API call, in milliseconds
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl SourceArgs {
    fn to_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.base_url.clone(),
            request_delay: Duration::from_millis(self.delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// \begin{...}{n} \bibitem blocks
    Latex,
    /// Structured blocks as JSON
    Json,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout carries only the bibliography)
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Report {
            input,
            output,
            source,
        } => run_report(&input, &output, &source).await,
        Commands::Render { input, output } => run_render(&input, &output).await,
        Commands::Serve { port, host, source } => run_server(host, port, &source).await,
    }
}

// ============================================================================
// Batch Runs
// ============================================================================

async fn run_report(input: &Path, output: &OutputArgs, source: &SourceArgs) -> Result<()> {
    // A malformed batch list must fail before the first fetch
    let requests = batch::read_batch_file(input)
        .with_context(|| format!("Invalid batch list {}", input.display()))?;

    let client = ResearchmapClient::new(&source.to_config())?;
    let bibliography = pipeline::build_bibliography(&client, &requests)
        .await
        .context("Fetching achievements failed, no output written")?;

    write_output(&bibliography, output)
}

async fn run_render(input: &Path, output: &OutputArgs) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let (source, requests) = pipeline::load_dump(&json).context("Invalid JSON dump")?;

    let bibliography = pipeline::build_bibliography(&source, &requests).await?;
    write_output(&bibliography, output)
}

fn write_output(bibliography: &Bibliography, output: &OutputArgs) -> Result<()> {
    let rendered = match output.format {
        OutputFormat::Latex => bibliography.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(bibliography)?,
    };

    match &output.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), entries = bibliography.entry_count(), "Saved bibliography");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(host: String, port: u16, source: &SourceArgs) -> Result<()> {
    info!(host = %host, port = port, "Starting HTTP server");

    let app = server::router(ResearchmapClient::new(&source.to_config())?);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

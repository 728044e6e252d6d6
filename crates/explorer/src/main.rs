//! Explorer
//!
//! Command-line front end for root-confined directory listings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use explorer::config::{default_config_path, Config};
use explorer::protocol::messages::ListingRequest;
use explorer::{FileExplorer, MessageRouter, RouterError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Explorer - read-only directory listings confined to one root.
#[derive(Parser, Debug)]
#[command(name = "explorer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print one page of a folder listing as JSON
    List {
        /// Folder relative to the root (empty for the root itself)
        #[arg(default_value = "")]
        folder: String,

        /// Wildcard filter applied to entry names
        #[arg(long, short, default_value = "")]
        filter: String,

        /// Sort mode (nameAsc, nameDesc, extAsc, extDesc, dateAsc, dateDesc)
        #[arg(long, short, default_value = explorer::protocol::DEFAULT_SORT)]
        sort: String,

        /// 1-based page number
        #[arg(long, short, default_value = "1")]
        page: u32,

        /// Entries per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Serve newline-delimited JSON envelopes on stdin/stdout
    Serve,

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    if let Commands::InitConfig { force } = cli.command {
        init_tracing(if cli.verbose { "debug" } else { "info" });
        return init_config(&config_path, force);
    }

    // Load configuration
    let mut config = Config::load(&config_path)?;

    // Apply environment variable overrides
    config.apply_env_overrides();

    // Initialize tracing
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.log_level.to_lowercase()
    };
    init_tracing(&level);
    tracing::debug!("Using config file: {:?}", config_path);

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::List {
            folder,
            filter,
            sort,
            page,
            page_size,
            pretty,
        } => {
            let explorer = FileExplorer::from_config(&config)?;
            let request = ListingRequest {
                folder,
                filter,
                sort,
                page,
                page_size,
            };

            match explorer.list(&request) {
                Ok(listing) => {
                    let response = listing.to_response();
                    let output = if pretty {
                        serde_json::to_string_pretty(&response)?
                    } else {
                        serde_json::to_string(&response)?
                    };
                    println!("{}", output);
                }
                Err(e) => {
                    let message = RouterError::from(e).to_error_message(None);
                    println!("{}", serde_json::json!({ "error": message.message }));
                    std::process::exit(1);
                }
            }
        }
        Commands::Serve => {
            let explorer = FileExplorer::from_config(&config)?;
            serve_stdio(MessageRouter::new(Arc::new(explorer))).await?;
        }
        Commands::CheckConfig => {
            println!("Configuration OK: {}", config_path.display());
            println!("  Root:          {}", config.effective_root().display());
            println!("  Ignored dirs:  {}", config.patterns.ignore_dirs.len());
            println!("  Ignored files: {}", config.patterns.ignore_files.len());
            println!("  Allowed dirs:  {}", config.patterns.allow_dirs.len());
            println!("  Allowed files: {}", config.patterns.allow_files.len());
            println!("  Aliases:       {}", config.aliases.len());
            println!(
                "  Page size:     {} (max {})",
                config.listing.default_page_size, config.listing.max_page_size
            );
        }
        Commands::InitConfig { force } => init_config(&config_path, force)?,
    }

    Ok(())
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays
/// reserved for JSON output.
fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Answer one JSON envelope per input line until stdin closes.
async fn serve_stdio(router: MessageRouter) -> anyhow::Result<()> {
    tracing::info!(root = ?router.explorer().root().path(), "Serving on stdio");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(reply) = router.handle_json_line(line).await? {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}

//! todo-summary - todo list API with LLM summaries
//!
//! CLI entry point: serve the API, run the TUI, or summarize once.

use std::fs;
use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use todo_summary::api::ApiClient;
use todo_summary::bootstrap::{build_state, build_store, build_summarizer};
use todo_summary::cli::{Cli, Command, get_log_path};
use todo_summary::config::Config;
use todo_summary::server;
use todo_summary::summary::SummaryOutcome;
use todo_summary::tui;

/// Where log output goes
enum LogTarget {
    Stderr,
    File,
}

fn setup_logging(verbose: bool, target: LogTarget) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogTarget::File => {
            // The TUI owns the terminal, so logs go to a file
            let log_path = get_log_path();
            if let Some(log_dir) = log_path.parent() {
                fs::create_dir_all(log_dir).context("Failed to create log directory")?;
            }
            let log_file = fs::File::create(&log_path).context("Failed to create log file")?;
            tracing_subscriber::fmt()
                .with_writer(log_file)
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
    }

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    let target = match command {
        Command::Tui { .. } => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    setup_logging(cli.verbose, target).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "todo-summary loaded config: provider={}, model={}, hosted-store={}",
        config.llm.provider,
        config.llm.model,
        config.storage.is_hosted()
    );

    match command {
        Command::Serve => cmd_serve(&config).await,
        Command::Tui { api_url } => cmd_tui(&config, api_url).await,
        Command::Summarize => cmd_summarize(&config).await,
    }
}

async fn cmd_serve(config: &Config) -> Result<()> {
    config.validate()?;

    let host: IpAddr = config
        .server
        .host
        .parse()
        .context(format!("Invalid server.host: {}", config.server.host))?;
    let state = build_state(config)?;
    server::serve(SocketAddr::new(host, config.server.port), state).await
}

async fn cmd_tui(config: &Config, api_url: Option<String>) -> Result<()> {
    let api_url = api_url.unwrap_or_else(|| format!("http://localhost:{}", config.server.port));
    info!(%api_url, "Starting TUI");

    let client = ApiClient::new(api_url, std::time::Duration::from_secs(60)).context("Failed to create API client")?;
    tui::run(client).await
}

async fn cmd_summarize(config: &Config) -> Result<()> {
    config.validate()?;

    let store = build_store(&config.storage)?;
    let summarizer = build_summarizer(config, store)?;

    match summarizer.run().await {
        Ok(SummaryOutcome::NothingPending) => {
            println!("{}", server::NOTHING_TO_SUMMARIZE.yellow());
        }
        Ok(SummaryOutcome::Sent { text, used_fallback }) => {
            println!("{}", server::SUMMARY_SENT.green().bold());
            if used_fallback {
                println!("{}", "(completion unavailable, used the basic summary)".yellow());
            }
            println!();
            println!("{}", text);
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(details) = e.details() {
                eprintln!("  {}", details.dimmed());
            }
            return Err(e).context("Summarize failed");
        }
    }
    Ok(())
}

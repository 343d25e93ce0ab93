//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// todo-summary - todo list API with LLM summaries posted to Slack
#[derive(Parser)]
#[command(
    name = "todo-summary",
    about = "Todo list API that summarizes pending items and posts them to a chat webhook",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "The TUI writes its logs to: ~/.local/share/todo-summary/logs/todo-summary.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP API server
    Serve,

    /// Launch the terminal UI against a running server
    Tui {
        /// Server base URL (default: http://localhost:<server.port>)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Summarize pending todos once and post the result
    Summarize,
}

/// Get the path to the TUI log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todo-summary")
        .join("logs")
        .join("todo-summary.log")
}

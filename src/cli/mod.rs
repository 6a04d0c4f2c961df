//! CLI module for the semantic response cache
//!
//! Provides subcommands for exercising the library from a terminal:
//! - `replay`: feed a JSONL transcript through a response cache
//! - `window`: compute the rendered window of a virtualized list

pub mod replay;
pub mod window;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Semantic response cache - reuse answers for rephrased questions
#[derive(Parser)]
#[command(name = "semantic-response-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a JSONL transcript of queries and responses through the cache
    Replay(replay::ReplayArgs),

    /// Print the items a virtualized list renders for a scroll position
    Window(window::WindowArgs),
}

/// Load `.env` and the layered configuration, then install logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    config
}

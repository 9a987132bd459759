//! CLI module for the workflow engine
//!
//! Subcommands:
//! - `serve`: run the HTTP API (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Workflow engine - sequential templated prompt chains over HTTP
#[derive(Debug, Parser)]
#[command(name = "prompt-workflow-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
}

impl Cli {
    /// The selected command, `serve` when none was given
    pub fn command_or_default(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Serve(serve::ServeArgs::default()))
    }
}

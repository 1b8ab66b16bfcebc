//! CLI module for podq.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// podq - Podcast Transcript Q&A
///
/// Index podcast transcripts into a local vector store and ask questions
/// about them through a chat-style web UI or the terminal.
#[derive(Parser, Debug)]
#[command(name = "podq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the transcript index (deletes and rebuilds an existing one)
    Index,

    /// Serve the chat web UI
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8501")]
        port: u16,
    },

    /// Ask a single question from the terminal
    Ask {
        /// The question to ask
        question: String,

        /// Chat model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,
    },
}

// Command-line interface

pub mod commands;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ricettario")]
#[command(about = "Ricettario - recipe generation grounded in a recipe corpus", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a recipe from the ingredients in a question
    Ask {
        /// Free-text question, e.g. "Generami una ricetta con basilico e pomodoro"
        question: String,

        /// Print the prompt that would be sent instead of calling the model
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the recipes retrieved for a question
    Retrieve {
        /// Free-text question
        question: String,

        /// Number of recipes to retrieve (defaults to RETRIEVAL_TOP_K)
        #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        k: Option<usize>,
    },

    /// Load the corpus and validate configuration without building the index
    Check,

    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },
}

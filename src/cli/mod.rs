// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pantry")]
#[command(about = "Pantry - find recipes from the ingredients you have", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Rank recipes for a comma-separated ingredient list
    Search {
        /// Ingredients, e.g. "tomato, rice"
        query: String,
    },

    /// Suggest ingredients for partially typed text
    Suggest {
        /// Text typed so far
        text: String,

        /// Cursor position in characters (defaults to the end of the text)
        #[arg(short, long)]
        cursor: Option<usize>,
    },

    /// Show the instructions of one search result
    Instructions {
        /// Ingredients, e.g. "tomato, rice"
        query: String,

        /// Result number as printed by `search` (starting at 1)
        number: usize,

        /// Read the instructions aloud
        #[arg(long)]
        speak: bool,
    },

    /// Capture a spoken ingredient list and search for it
    Listen,

    /// Load a recipe source and report what it contains
    Validate {
        /// URL or file path (defaults to RECIPE_SOURCE)
        source: Option<String>,
    },
}

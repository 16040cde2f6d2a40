//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Harmonized System tariff code lookup: chapter search and candidate narrowing
#[derive(Parser, Debug)]
#[command(name = "hscode")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding .hscode.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Tariff table CSV (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub table: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank chapters for a product description
    Search {
        /// Product description
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Number of chapters to show
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Show the best chapter and its candidate codes
    Candidates {
        /// Product description
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick a final HS code (offline word-overlap classifier)
    Classify {
        /// Product description
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show hierarchy as tree
    Tree {
        /// Only the subtree under this code
        #[arg(long)]
        code: Option<String>,
    },

    /// Export the hierarchy as nested JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// List the chapter index
    Chapters,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}

impl Commands {
    /// Words of the query joined back into one description.
    pub fn query_text(query: &[String]) -> String {
        query.join(" ")
    }
}

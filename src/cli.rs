use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "starsift")]
#[command(author, version, about = "Pick the classifier that best predicts review star ratings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to starsift.toml in the app directory)
    #[arg(long, global = true, env = "STARSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log to stdout only
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full review experiment
    Run {
        /// Review CSV (overrides the config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fit roster entries in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Run the model sweep on a numeric CSV table
    Select {
        /// CSV with a header row; every column numeric
        input: PathBuf,

        /// Label column
        #[arg(short, long, default_value = "Rating")]
        label: String,

        /// Comma-separated model kinds (default: the configured roster)
        #[arg(short, long, value_delimiter = ',', value_parser = parse_kind)]
        models: Vec<starsift::ml::ModelKind>,

        /// Seed for the train/test permutation
        #[arg(long)]
        seed: Option<u64>,

        /// Write the JSON report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print mean rating and review count per brand
    Brands {
        /// Review CSV (overrides the config)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Write a config file with default settings
    InitConfig {
        /// Destination (defaults to the app directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_kind(value: &str) -> Result<starsift::ml::ModelKind, String> {
    starsift::ml::ModelKind::parse(value).ok_or_else(|| {
        let known: Vec<&str> = starsift::ml::ModelKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect();
        format!("Unknown model {value:?} (expected one of {})", known.join(", "))
    })
}

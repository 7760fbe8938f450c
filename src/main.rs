//! Command-line entry point.

mod cli;

use clap::Parser;
use starsift::config::{self, ExperimentConfig};
use starsift::dataset::Dataset;
use starsift::experiment;
use starsift::logging::{self, LogOptions};
use starsift::ml;
use starsift::reviews;
use starsift::select::{self, SelectionReport};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let options = LogOptions {
        default_filter: if cli.verbose { "debug" } else { "info" }.to_string(),
        log_to_file: !cli.no_log_file,
    };
    if let Err(err) = logging::init(&options) {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run {
            input,
            output,
            parallel,
        } => {
            let mut config = config::load_or_default(cli.config.as_deref())?;
            if let Some(input) = input {
                config.input = input;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            config.selection.parallel |= parallel;
            let outcome = experiment::run_experiment(&config)?;
            println!(
                "{} reviews, {} terms ({} kept)",
                outcome.n_reviews, outcome.n_terms, outcome.n_terms_kept
            );
            if let Some(profile) = &outcome.variance {
                println!("Optimal N Components: {}", profile.kept);
                println!("Explained Variance: {:.4}", profile.explained);
            }
            for run in &outcome.runs {
                println!();
                println!("== {} / {} ==", run.target, run.representation);
                print!("{}", select::render_summary(&run.result));
            }
            println!();
            println!("Reports written to {}", config.output_dir.display());
        }
        Commands::Select {
            input,
            label,
            models,
            seed,
            report,
        } => {
            let config = config::load_or_default(cli.config.as_deref())?;
            let dataset = Dataset::read_csv(&input)?;
            let kinds = if models.is_empty() {
                config.selection.roster.clone()
            } else {
                models
            };
            let mut options = config.selection.options();
            if let Some(seed) = seed {
                options.seed = seed;
            }
            let result = select::select_best(&dataset, &label, &ml::roster(&kinds), &options)?;
            print!("{}", select::render_summary(&result));
            if let Some(path) = report {
                SelectionReport::from(&result).write_json(&path)?;
                println!("Report written to {}", path.display());
            }
        }
        Commands::Brands { input } => {
            let config = config::load_or_default(cli.config.as_deref())?;
            let path = input.unwrap_or(config.input);
            let reviews = reviews::load_reviews(&path, &config.columns)?;
            println!("{:<24} {:>8} {:>8}", "brand", "mean", "reviews");
            for brand in reviews::brand_summary(&reviews) {
                println!(
                    "{:<24} {:>8.3} {:>8}",
                    brand.brand, brand.mean_rating, brand.reviews
                );
            }
        }
        Commands::InitConfig { path, force } => {
            let path = match path.or(cli.config) {
                Some(path) => path,
                None => config::config_path()?,
            };
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            config::save_to_path(&ExperimentConfig::default(), &path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

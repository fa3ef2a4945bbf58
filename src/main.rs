//! Craftmax - Command Line Interface
//!
//! This is the main entry point for the farming layout planner.
//! Run with `--help` to see all available options.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use craftmax::{
    data::load_all_data,
    display::{display_breakdowns, display_equations, display_results, display_tables},
    models::{RankingMode, SearchConfig},
    planner::analyze,
};

/// Command-line arguments for Craftmax.
#[derive(Parser, Debug)]
#[command(name = "craftmax")]
#[command(author, version, about = "Rank resource farming layouts for crafting upgrades", long_about = None)]
struct Args {
    /// Directory holding recipes.csv, map.csv, worker.csv, upgrade.csv and groups.csv
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Upgrade level the total cost equation is evaluated at
    #[arg(short, long, default_value = "5")]
    level: u64,

    /// Number of layouts to keep per equation
    #[arg(short, long, default_value = "5")]
    top: usize,

    /// Number of groups per layout (defaults to all groups but one, at least one)
    #[arg(long)]
    chosen_groups: Option<usize>,

    /// Ingredient whose yield ranks layouts in scoring-ingredient mode
    #[arg(short, long, default_value = "branch")]
    scoring_ingredient: String,

    /// How layouts are ranked
    #[arg(short, long, value_enum, default_value_t = RankingMode::ScoringIngredient)]
    ranking: RankingMode,

    /// Log every group combination and excluded layout
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "craftmax=debug" } else { "craftmax=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !args.data_dir.exists() {
        eprintln!(
            "Error: data directory '{}' not found. Please run from the project root.",
            args.data_dir.display()
        );
        std::process::exit(1);
    }

    let config = SearchConfig {
        level: args.level,
        top_k: args.top,
        chosen_groups: args.chosen_groups,
        scoring_ingredient: args.scoring_ingredient.clone(),
        ranking: args.ranking,
    };

    println!("Craftmax - Farming Layout Planner");
    println!("================================================================");
    println!();
    println!("Configuration:");
    println!("  Data:               {}", args.data_dir.display());
    println!("  Upgrade level:      +{}", config.level);
    println!("  Layouts kept:       {}", config.top_k);
    println!("  Scoring ingredient: {}", config.scoring_ingredient);
    println!(
        "  Ranking:            {}",
        match config.ranking {
            RankingMode::ScoringIngredient => "Scoring Ingredient",
            RankingMode::Bottleneck => "Bottleneck Ratio",
        }
    );

    let snapshot = load_all_data(&args.data_dir)?;
    let analysis = analyze(&snapshot, &config)?;

    display_breakdowns(&analysis.breakdowns, &analysis.primaries);
    display_tables(&snapshot);
    display_equations(&analysis.rule_equations, &analysis.total, &analysis.simplified);
    display_results(&analysis.outcome, &analysis.simplified);

    Ok(())
}

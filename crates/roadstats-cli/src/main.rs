//! roadstats CLI - rollups, series and significance tests for fines datasets.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context {
        json: cli.json,
        config: cli.config,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Schema { file } => commands::schema::run(&ctx, file),

        Commands::Rollup {
            file,
            group,
            value,
            count,
            filters,
        } => commands::rollup::run(&ctx, file, group, value, count, filters),

        Commands::Series {
            file,
            value,
            filters,
        } => commands::series::run(&ctx, file, value, filters),

        Commands::Crosstab {
            file,
            rows,
            cols,
            value,
            keep_unknown,
            filters,
        } => commands::crosstab::run(&ctx, file, rows, cols, value, keep_unknown, filters),

        Commands::Compare {
            file,
            location_field,
            metric_field,
            metric,
            value,
            filters,
        } => commands::compare::run(&ctx, file, location_field, metric_field, metric, value, filters),

        Commands::ChiSquare { counts } => commands::chi_square::run(&ctx, counts),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! Example: Summarize a road-safety fines table with roadstats.
//!
//! Usage:
//!   cargo run --example rollup -- <file_path> [year]
//!
//! Example:
//!   cargo run --example rollup -- police_enforcement_2024_fines.csv 2023

use std::env;
use std::path::Path;

use roadstats::{ContingencyTable, Dashboard, FilterState, chi_square_independence};

fn main() -> roadstats::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example rollup -- <file_path> [year]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let dashboard = Dashboard::load(path)?;
    let schema = dashboard.schema();
    let measure = schema.primary_measure();

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("roadstats: {}", path.display());
    println!("{}", separator);
    println!();

    println!("## Schema");
    println!("  Rows:        {}", dashboard.dataset().len());
    println!("  Year:        {}", schema.year_field.as_deref().unwrap_or("-"));
    println!("  Category:    {}", schema.categorical_field.as_deref().unwrap_or("-"));
    println!("  Measures:    {}", schema.numeric_fields.join(", "));
    println!("  Primary:     {}", measure.unwrap_or("(row count)"));
    println!();

    let mut filters = FilterState::all();
    if let Some(year) = args.get(2).and_then(|y| y.parse::<i64>().ok()) {
        filters = filters.with_year(year);
    }

    let view = dashboard.view(&filters);
    println!("## Totals by category ({} rows, year: {})", view.len(), filters.year);
    for (category, total) in view.category_totals(measure).sorted_desc() {
        println!("  {:30} {:>12.0}", category, total);
    }
    println!();

    let split = view.detection_split(measure);
    if !split.is_empty() {
        println!("## Detection");
        println!("  Police issued: {:>12.0}", split.police);
        println!("  Camera fined:  {:>12.0}", split.camera);
        println!();
    }

    if dashboard.dataset().has_field("LOCATION") && dashboard.dataset().has_field("METRIC") {
        let table = ContingencyTable::location_by_metric(
            view.rows().iter().copied(),
            "LOCATION",
            "METRIC",
            "mobile_phone_use",
            measure,
        );
        let result = chi_square_independence(&table);
        println!("## Major cities vs regional, mobile_phone_use");
        println!("  chi2 = {:.3}, p = {:.4}", result.chi2, result.p);
    }

    Ok(())
}

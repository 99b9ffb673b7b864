//! Schema command - show inferred field roles and selector options.

use std::path::PathBuf;

use colored::Colorize;

use super::{CommandResult, Context, print_json};

pub fn run(ctx: &Context, file: PathBuf) -> CommandResult {
    let dashboard = ctx.load(&file)?;
    let summary = dashboard.summary();

    if ctx.json {
        return print_json(&summary);
    }

    let schema = &summary.schema;
    println!(
        "{} {}",
        "Schema for".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    if let Some(source) = &summary.source {
        println!(
            "  {} rows x {} columns ({}, {})",
            summary.rows, summary.fields, source.format, source.hash
        );
        println!();
    }

    println!("{}", "Roles:".yellow().bold());
    let role = |v: Option<&str>| v.map_or_else(|| "-".dimmed().to_string(), |s| s.green().to_string());
    println!("  Year:        {}", role(schema.year_field.as_deref()));
    println!("  Category:    {}", role(schema.categorical_field.as_deref()));
    println!("  Measure:     {}", role(summary.primary_measure.as_deref()));
    println!("  Numeric:     {}", schema.numeric_fields.join(", "));
    for (label, column) in &schema.detection_columns {
        println!("  {:12} {}", format!("{}:", label), column.blue());
    }
    println!();

    if ctx.verbose {
        println!("{}", "Fields:".yellow().bold());
        for profile in &schema.fields {
            let kind = if schema.is_numeric(&profile.name) {
                format!("{:8}", "numeric").blue()
            } else {
                format!("{:8}", "text").normal()
            };
            println!(
                "  {:30} {} non-empty={:<6} numeric={}",
                profile.name, kind, profile.non_empty, profile.numeric
            );
        }
        println!();
    }

    println!("{}", "Selectors:".yellow().bold());
    let years: Vec<String> = summary.years.iter().map(i64::to_string).collect();
    println!("  Years:       {}", years.join(", "));
    println!("  Categories:  {}", summary.categories.join(", "));
    if !summary.detection_options.is_empty() {
        println!("  Detection:   {}", summary.detection_options.join(", "));
    }

    Ok(())
}

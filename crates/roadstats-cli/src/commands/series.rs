//! Series command - dense yearly totals.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use super::{CommandResult, Context, bar, describe_filters, print_json, resolve_measure};
use crate::cli::FilterArgs;

pub fn run(
    ctx: &Context,
    file: PathBuf,
    value: Option<String>,
    filters: FilterArgs,
) -> CommandResult {
    let dashboard = ctx.load(&file)?;
    let year_field = dashboard
        .schema()
        .year_field
        .clone()
        .ok_or("No year field found in this file")?;
    let measure = resolve_measure(&dashboard, value)?;
    let state = filters.to_state();

    let series = dashboard.view(&state).year_series(measure.as_deref());

    if ctx.json {
        return print_json(&json!({
            "year_field": year_field,
            "measure": measure,
            "filters": state,
            "series": series,
        }));
    }

    println!(
        "{} {} per {} ({})",
        "Series:".cyan().bold(),
        measure.as_deref().unwrap_or("row count").white(),
        year_field.white(),
        describe_filters(&state)
    );
    println!();

    let max = series.dense.iter().map(|p| p.value).fold(0.0, f64::max);
    for point in &series.dense {
        let value = if point.value > 0.0 {
            format!("{:>14.0}", point.value).normal()
        } else {
            format!("{:>14.0}", point.value).dimmed()
        };
        println!("  {} {} {}", point.year, value, bar(point.value, max, 40).green());
    }

    Ok(())
}

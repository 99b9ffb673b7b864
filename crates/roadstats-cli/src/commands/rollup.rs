//! Rollup command - per-group totals under a filter selection.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use super::{CommandResult, Context, bar, describe_filters, print_json, resolve_measure};
use crate::cli::FilterArgs;

pub fn run(
    ctx: &Context,
    file: PathBuf,
    group: Option<String>,
    value: Option<String>,
    count: bool,
    filters: FilterArgs,
) -> CommandResult {
    let dashboard = ctx.load(&file)?;
    let state = filters.to_state();

    let group = group
        .or_else(|| dashboard.schema().categorical_field.clone())
        .ok_or("No categorical field found; pass --group")?;
    let measure = if count {
        None
    } else {
        resolve_measure(&dashboard, value)?
    };

    let view = dashboard.view(&state);
    let totals = view.group_sum(&group, measure.as_deref());

    if ctx.json {
        return print_json(&json!({
            "group": group,
            "measure": measure,
            "filters": state,
            "rows": view.len(),
            "totals": totals,
        }));
    }

    println!(
        "{} {} by {} ({})",
        "Rollup:".cyan().bold(),
        measure.as_deref().unwrap_or("row count").white(),
        group.white(),
        describe_filters(&state)
    );
    println!();

    if totals.is_empty() {
        println!("  {}", "No matching rows".dimmed());
        return Ok(());
    }

    let sorted = totals.sorted_desc();
    let max = sorted.first().map_or(0.0, |(_, v)| *v);
    for (key, total) in &sorted {
        println!("  {:30} {:>14.0} {}", key, total, bar(*total, max, 30).green());
    }
    println!();
    println!(
        "  {} {:>14.0}  ({} rows)",
        format!("{:30}", "Total").bold(),
        totals.total(),
        view.len()
    );

    Ok(())
}

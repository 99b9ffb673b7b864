//! Compare command - major cities versus regional chi-square test.

use std::path::PathBuf;

use colored::Colorize;
use roadstats::{ContingencyTable, chi_square_independence};
use serde_json::json;

use super::{CommandResult, Context, describe_filters, print_json, resolve_measure};
use crate::cli::FilterArgs;

pub fn run(
    ctx: &Context,
    file: PathBuf,
    location_field: String,
    metric_field: String,
    metric: String,
    value: Option<String>,
    filters: FilterArgs,
) -> CommandResult {
    let dashboard = ctx.load(&file)?;
    for name in [&location_field, &metric_field] {
        if !dashboard.dataset().has_field(name) {
            return Err(format!("Unknown field: {}", name).into());
        }
    }
    let measure = resolve_measure(&dashboard, value)?;
    let state = filters.to_state();

    let view = dashboard.view(&state);
    let table = ContingencyTable::location_by_metric(
        view.rows().iter().copied(),
        &location_field,
        &metric_field,
        &metric,
        measure.as_deref(),
    );
    let result = chi_square_independence(&table);

    if ctx.json {
        return print_json(&json!({
            "metric": metric,
            "measure": measure,
            "filters": state,
            "observed": table,
            "result": result,
        }));
    }

    println!(
        "{} {} in major cities vs regional ({})",
        "Compare:".cyan().bold(),
        metric.white(),
        describe_filters(&state)
    );
    println!();
    super::chi_square::print_table(&table, &result.expected, ["Major cities", "Regional"]);
    println!();
    super::chi_square::print_result(&result);

    Ok(())
}

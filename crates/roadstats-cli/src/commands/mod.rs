//! CLI command implementations.

pub mod chi_square;
pub mod compare;
pub mod crosstab;
pub mod rollup;
pub mod schema;
pub mod series;

use std::path::{Path, PathBuf};

use colored::Colorize;
use roadstats::{Dashboard, DashboardConfig, FilterState};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Global options every command sees.
pub struct Context {
    pub json: bool,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

impl Context {
    /// Load a data file with the configured parser and inference settings.
    pub fn load(&self, file: &Path) -> Result<Dashboard, Box<dyn std::error::Error>> {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }

        let config = match &self.config {
            Some(path) => DashboardConfig::from_json_file(path)?,
            None => DashboardConfig::default(),
        };
        Ok(Dashboard::load_with_config(file, &config)?)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve an explicit measure or fall back to the primary one.
///
/// Errors on a named measure the file does not have, so a typo is not
/// silently reported as an empty table.
pub fn resolve_measure(
    dashboard: &Dashboard,
    value: Option<String>,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    match value {
        Some(name) if !dashboard.dataset().has_field(&name) => {
            Err(format!("Unknown field: {}", name).into())
        }
        Some(name) => Ok(Some(name)),
        None => Ok(dashboard.schema().primary_measure().map(str::to_string)),
    }
}

/// One-line description of the active filters.
pub fn describe_filters(filters: &FilterState) -> String {
    if filters.is_unfiltered() {
        return "no filters".dimmed().to_string();
    }

    let mut parts = Vec::new();
    if !filters.year.is_all() {
        parts.push(format!("year={}", filters.year));
    }
    if !filters.category.is_all() {
        parts.push(format!("category={}", filters.category));
    }
    if !filters.detection.is_all() {
        parts.push(format!("detection={}", filters.detection));
    }
    for (field, value) in &filters.dimensions {
        parts.push(format!("{}={}", field, value));
    }
    parts.join(", ")
}

/// Fixed-width bar for terminal charts.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0, 10.0, 20), "");
        assert_eq!(bar(5.0, 0.0, 20), "");
        assert_eq!(bar(10.0, 10.0, 20).chars().count(), 20);
        assert_eq!(bar(0.01, 10.0, 20).chars().count(), 1);
    }

    #[test]
    fn test_describe_filters() {
        colored::control::set_override(false);
        assert_eq!(describe_filters(&FilterState::all()), "no filters");
        let filters = FilterState::all()
            .with_year(2023)
            .with_dimension("METRIC", "speed_fines");
        assert_eq!(describe_filters(&filters), "year=2023, METRIC=speed_fines");
    }
}

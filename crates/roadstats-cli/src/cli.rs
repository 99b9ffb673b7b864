//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use roadstats::FilterState;

/// roadstats: rollups, series and chi-square comparisons for fines datasets
#[derive(Parser)]
#[command(name = "roadstats")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// JSON file with parser and inference settings
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the inferred schema and selector options of a data file
    Schema {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Sum a measure per group under a filter selection
    Rollup {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field to group by (default: the inferred categorical field)
        #[arg(short, long)]
        group: Option<String>,

        /// Measure to sum (default: the primary measure, or row counts)
        #[arg(long)]
        value: Option<String>,

        /// Count rows instead of summing a measure
        #[arg(long, conflicts_with = "value")]
        count: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Year-by-year totals with gaps filled in
    Series {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Measure to sum (default: the primary measure)
        #[arg(long)]
        value: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Two-way table of totals
    Crosstab {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field for table rows
        #[arg(long)]
        rows: String,

        /// Field for table columns
        #[arg(long)]
        cols: String,

        /// Measure to sum (default: the primary measure)
        #[arg(long)]
        value: Option<String>,

        /// Keep "Unknown" rows and columns
        #[arg(long)]
        keep_unknown: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Major cities versus regional chi-square test for one metric
    Compare {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field holding ABS remoteness areas
        #[arg(long, default_value = "LOCATION")]
        location_field: String,

        /// Field holding the metric name
        #[arg(long, default_value = "METRIC")]
        metric_field: String,

        /// Metric value counted as "present"
        #[arg(long)]
        metric: String,

        /// Measure to sum (default: the primary measure)
        #[arg(long)]
        value: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Chi-square test on a 2x2 table given as four counts
    #[command(name = "chi-square")]
    ChiSquare {
        /// Counts in row order: a b c d for [[a, b], [c, d]]
        #[arg(num_args = 4, value_name = "COUNT", allow_negative_numbers = true)]
        counts: Vec<f64>,
    },
}

/// Filter selection shared by the data commands.
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Keep one year
    #[arg(long)]
    pub year: Option<i64>,

    /// Keep one value of the categorical field
    #[arg(long)]
    pub category: Option<String>,

    /// Keep one detection method ("Police issued" or "Camera fined")
    #[arg(long)]
    pub detection: Option<String>,

    /// Keep rows where FIELD equals VALUE (repeatable)
    #[arg(long = "where", value_name = "FIELD=VALUE", value_parser = parse_dimension)]
    pub dimensions: Vec<(String, String)>,
}

impl FilterArgs {
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState::all();
        if let Some(year) = self.year {
            state = state.with_year(year);
        }
        if let Some(category) = &self.category {
            state = state.with_category(category.as_str());
        }
        if let Some(detection) = &self.detection {
            state = state.with_detection(detection.as_str());
        }
        for (field, value) in &self.dimensions {
            state = state.with_dimension(field.as_str(), value.as_str());
        }
        state
    }
}

fn parse_dimension(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("Expected FIELD=VALUE, got: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use roadstats::Selection;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(
            parse_dimension("AGE_GROUP=17-25"),
            Ok(("AGE_GROUP".to_string(), "17-25".to_string()))
        );
        assert_eq!(
            parse_dimension("METRIC=a=b"),
            Ok(("METRIC".to_string(), "a=b".to_string()))
        );
        assert!(parse_dimension("novalue").is_err());
        assert!(parse_dimension("=x").is_err());
    }

    #[test]
    fn test_rollup_args_to_state() {
        let cli = Cli::parse_from([
            "roadstats",
            "rollup",
            "data.csv",
            "--year",
            "2023",
            "--detection",
            "Camera fined",
            "--where",
            "METRIC=speed_fines",
        ]);

        let Commands::Rollup { filters, .. } = cli.command else {
            panic!("expected rollup");
        };
        let state = filters.to_state();
        assert_eq!(state.year, Selection::Only(2023));
        assert!(state.category.is_all());
        assert_eq!(state.detection, Selection::Only("Camera fined".to_string()));
        assert_eq!(state.dimensions.get("METRIC").map(String::as_str), Some("speed_fines"));
    }

    #[test]
    fn test_chi_square_takes_four_counts() {
        let cli = Cli::parse_from(["roadstats", "--json", "chi-square", "10", "0", "0", "10"]);
        assert!(cli.json);
        let Commands::ChiSquare { counts } = cli.command else {
            panic!("expected chi-square");
        };
        assert_eq!(counts, vec![10.0, 0.0, 0.0, 10.0]);

        assert!(Cli::try_parse_from(["roadstats", "chi-square", "1", "2"]).is_err());
    }
}

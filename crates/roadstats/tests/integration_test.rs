//! Integration tests for roadstats.

use std::io::Write;
use tempfile::NamedTempFile;

use roadstats::classify::{DETECTION_CAMERA, DETECTION_POLICE};
use roadstats::{
    ContingencyTable, Dashboard, Dataset, FilterState, Record, Value, apply_filters,
    chi_square_independence, infer_schema,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

const ENFORCEMENT_CSV: &str = "YEAR,JURISDICTION,LOCATION,AGE_GROUP,METRIC,DETECTION_METHOD,FINES\n\
    2023,NSW,Major Cities of Australia,17-25,mobile_phone_use,Fixed camera,100\n\
    2023,NSW,Major Cities of Australia,26-39,speed_fines,Police issued,40\n\
    2023,VIC,Inner Regional Australia,17-25,mobile_phone_use,Police issued,20\n\
    2024,VIC,Outer Regional Australia,,mobile_phone_use,Mobile camera,5\n\
    2024,WA,Very Remote Australia,40-64,speed_fines,Police issued,7\n\
    2024,WA,Unknown,40-64,mobile_phone_use,Police issued,999\n";

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_csv() {
    let file = create_test_file(ENFORCEMENT_CSV);
    let dashboard = Dashboard::load(file.path()).expect("Load failed");

    assert_eq!(dashboard.dataset().len(), 6);
    assert_eq!(dashboard.dataset().fields().len(), 7);

    let source = dashboard.dataset().source().expect("source metadata");
    assert_eq!(source.format, "csv");
    assert_eq!(source.row_count, 6);
    assert!(source.hash.starts_with("sha256:"));
}

#[test]
fn test_load_tsv_auto_detect() {
    let content = "YEAR\tREGION\tFINES\n2023\tNorth\t3\n2024\tSouth\t4\n";
    let file = create_test_file(content);
    let dashboard = Dashboard::load(file.path()).expect("Load failed");

    assert_eq!(dashboard.dataset().source().unwrap().format, "tsv");
    assert_eq!(dashboard.schema().categorical_field.as_deref(), Some("REGION"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Dashboard::load("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, roadstats::RoadstatsError::Io { .. }));
}

// =============================================================================
// Schema
// =============================================================================

#[test]
fn test_enforcement_schema() {
    let file = create_test_file(ENFORCEMENT_CSV);
    let dashboard = Dashboard::load(file.path()).unwrap();
    let schema = dashboard.schema();

    assert_eq!(schema.year_field.as_deref(), Some("YEAR"));
    assert_eq!(schema.numeric_fields, vec!["YEAR", "FINES"]);
    assert_eq!(schema.categorical_field.as_deref(), Some("JURISDICTION"));
    assert!(!schema.has_detection_columns());
}

#[test]
fn test_all_text_schema() {
    let records = vec![
        record(&[("LOCATION", "Remote".into()), ("NOTE", "a".into())]),
        record(&[("LOCATION", "Major".into()), ("NOTE", "b".into())]),
    ];
    let schema = infer_schema(&records);

    assert!(schema.numeric_fields.is_empty());
    assert_eq!(schema.categorical_field.as_deref(), Some("LOCATION"));
    assert_eq!(schema.year_field, None);
}

// =============================================================================
// Filtering and aggregation
// =============================================================================

#[test]
fn test_rollup_scenario() {
    let dataset = Dataset::from_records(vec![
        record(&[("YEAR", 2023_i64.into()), ("CAT", "A".into()), ("V", "10".into())]),
        record(&[("YEAR", 2023_i64.into()), ("CAT", "B".into()), ("V", "5".into())]),
        record(&[("YEAR", 2024_i64.into()), ("CAT", "A".into()), ("V", "3".into())]),
    ]);
    let schema = infer_schema(dataset.records());
    let view = apply_filters(&dataset, &schema, &FilterState::all());

    let rollup = view.category_totals(Some("V"));
    assert_eq!(rollup.len(), 2);
    assert_eq!(rollup.get("A"), Some(13.0));
    assert_eq!(rollup.get("B"), Some(5.0));
}

#[test]
fn test_combined_filters() {
    let file = create_test_file(ENFORCEMENT_CSV);
    let dashboard = Dashboard::load(file.path()).unwrap();

    let filters = FilterState::all()
        .with_year(2024)
        .with_category("WA")
        .with_detection(DETECTION_POLICE);
    let view = dashboard.view(&filters);
    assert_eq!(view.len(), 2);

    let view = dashboard.view(&filters.clone().with_dimension("AGE_GROUP", "17-25"));
    assert!(view.is_empty());
}

#[test]
fn test_sibling_views_from_one_dashboard() {
    let file = create_test_file(ENFORCEMENT_CSV);
    let dashboard = Dashboard::load(file.path()).unwrap();

    let year_only = FilterState::all().with_year(2023);
    let with_detection = year_only.clone().with_detection(DETECTION_CAMERA);

    let pie = dashboard.view(&with_detection);
    let split = dashboard.view(&year_only);

    assert_eq!(pie.category_totals(Some("FINES")).get("NSW"), Some(100.0));
    assert_eq!(split.detection_split(Some("FINES")).police, 60.0);
    assert_eq!(split.detection_split(Some("FINES")).camera, 100.0);
}

#[test]
fn test_idempotent_views() {
    let file = create_test_file(ENFORCEMENT_CSV);
    let dashboard = Dashboard::load(file.path()).unwrap();
    let filters = FilterState::all().with_category("VIC");

    assert_eq!(dashboard.view(&filters), dashboard.view(&filters));
}

#[test]
fn test_line_series_and_ticks() {
    let dataset = Dataset::from_records(vec![
        record(&[("YEAR", "2008".into()), ("FINES", "5".into())]),
        record(&[("YEAR", "2010".into()), ("FINES", "7".into())]),
    ]);
    let schema = infer_schema(dataset.records());
    let series = apply_filters(&dataset, &schema, &FilterState::all()).year_series(Some("FINES"));

    assert_eq!(series.dense.len(), 3);
    assert_eq!(series.dense[1].year, 2009);
    assert_eq!(series.dense[1].value, 0.0);
    assert_eq!(series.ticks, vec![2008, 2010]);
}

#[test]
fn test_heatmap_crosstab() {
    let file = create_test_file(ENFORCEMENT_CSV);
    let dashboard = Dashboard::load(file.path()).unwrap();
    let view = dashboard.view(&FilterState::all().with_dimension("METRIC", "mobile_phone_use"));

    let tab = view
        .crosstab("JURISDICTION", "AGE_GROUP", Some("FINES"))
        .without_unknown();

    assert_eq!(tab.rows, vec!["NSW", "VIC", "WA"]);
    assert_eq!(tab.columns, vec!["17-25", "40-64"]);
    assert_eq!(tab.get("NSW", "17-25"), Some(100.0));
    assert_eq!(tab.get("VIC", "40-64"), Some(0.0));
    assert_eq!(tab.get("WA", "40-64"), Some(999.0));
}

// =============================================================================
// Statistics
// =============================================================================

#[test]
fn test_location_comparison() {
    let file = create_test_file(ENFORCEMENT_CSV);
    let dashboard = Dashboard::load(file.path()).unwrap();
    let view = dashboard.view(&FilterState::all());

    let table = ContingencyTable::location_by_metric(
        view.rows().iter().copied(),
        "LOCATION",
        "METRIC",
        "mobile_phone_use",
        Some("FINES"),
    );
    assert_eq!(table, ContingencyTable::new(100.0, 40.0, 25.0, 7.0));

    let result = chi_square_independence(&table);
    assert!(result.chi2 > 0.0);
    assert!(result.p > 0.0 && result.p <= 1.0);
    assert!((result.expected.total() - table.total()).abs() < 1e-9);
}

#[test]
fn test_chi_square_reference_values() {
    let strong = chi_square_independence(&ContingencyTable::new(10.0, 0.0, 0.0, 10.0));
    assert!((strong.chi2 - 20.0).abs() < 1e-12);
    assert!(strong.p > 0.0 && strong.p < 0.001);

    let empty = chi_square_independence(&ContingencyTable::new(0.0, 0.0, 0.0, 0.0));
    assert_eq!(empty.chi2, 0.0);
    assert_eq!(empty.p, 1.0);
}

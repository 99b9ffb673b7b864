//! Engine performance benchmarks.
//!
//! Measures parsing, schema inference, filtering and aggregation on
//! synthetic enforcement tables.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roadstats::{
    ContingencyTable, Dashboard, FilterState, Parser, SchemaInference, chi_square_independence,
};

const JURISDICTIONS: &[&str] = &["NSW", "VIC", "QLD", "SA", "WA", "TAS", "NT", "ACT"];
const LOCATIONS: &[&str] = &[
    "Major Cities of Australia",
    "Inner Regional Australia",
    "Outer Regional Australia",
    "Remote Australia",
    "Very Remote Australia",
    "Unknown",
];
const AGE_GROUPS: &[&str] = &["0-16", "17-25", "26-39", "40-64", "65 and over", ""];
const METRICS: &[&str] = &["speed_fines", "mobile_phone_use", "non_wearing_seatbelts"];
const DETECTIONS: &[&str] = &["Police issued", "Fixed camera", "Mobile camera", "Red light camera"];

/// Generate a CSV table of enforcement counts.
fn generate_enforcement_csv(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let mut data = String::from("YEAR,JURISDICTION,LOCATION,AGE_GROUP,METRIC,DETECTION_METHOD,FINES\n");

    for _ in 0..rows {
        data.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            rng.gen_range(2008..=2024),
            JURISDICTIONS[rng.gen_range(0..JURISDICTIONS.len())],
            LOCATIONS[rng.gen_range(0..LOCATIONS.len())],
            AGE_GROUPS[rng.gen_range(0..AGE_GROUPS.len())],
            METRICS[rng.gen_range(0..METRICS.len())],
            DETECTIONS[rng.gen_range(0..DETECTIONS.len())],
            rng.gen_range(0..5000),
        ));
    }

    data
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [1_000, 10_000, 50_000].iter() {
        let data = generate_enforcement_csv(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let parser = Parser::new();
            b.iter(|| black_box(parser.parse_bytes(data.as_bytes(), b',').unwrap()))
        });
    }

    group.finish();
}

fn bench_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_inference");

    for rows in [1_000, 10_000, 50_000].iter() {
        let dataset = Parser::new()
            .parse_bytes(generate_enforcement_csv(*rows).as_bytes(), b',')
            .unwrap();
        let engine = SchemaInference::new();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(engine.infer_dataset(dataset)))
        });
    }

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_aggregate");

    let dataset = Parser::new()
        .parse_bytes(generate_enforcement_csv(50_000).as_bytes(), b',')
        .unwrap();
    let dashboard = Dashboard::new(dataset);

    let unfiltered = FilterState::all();
    let combined = FilterState::all()
        .with_year(2020)
        .with_category("NSW")
        .with_detection("Camera fined");

    group.bench_function("category_totals_all", |b| {
        b.iter(|| black_box(dashboard.view(&unfiltered).category_totals(Some("FINES"))))
    });

    group.bench_function("category_totals_combined", |b| {
        b.iter(|| black_box(dashboard.view(&combined).category_totals(Some("FINES"))))
    });

    group.bench_function("year_series", |b| {
        b.iter(|| black_box(dashboard.view(&unfiltered).year_series(Some("FINES"))))
    });

    group.bench_function("crosstab", |b| {
        b.iter(|| {
            black_box(
                dashboard
                    .view(&unfiltered)
                    .crosstab("JURISDICTION", "AGE_GROUP", Some("FINES")),
            )
        })
    });

    group.bench_function("location_chi_square", |b| {
        b.iter(|| {
            let view = dashboard.view(&unfiltered);
            let table = ContingencyTable::location_by_metric(
                view.rows().iter().copied(),
                "LOCATION",
                "METRIC",
                "mobile_phone_use",
                Some("FINES"),
            );
            black_box(chi_square_independence(&table))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_inference, bench_filtering);
criterion_main!(benches);

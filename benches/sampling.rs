use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::{Duration, Instant};
use wheatstone::export::to_csv_string;
use wheatstone::table::{ColumnKind, ColumnSpec, MeasurementTable, Sample};

/// Table with the default columns plus an exact ΔR column, filled with `rows` samples
fn filled_table(rows: usize) -> MeasurementTable {
    let mut table = MeasurementTable::new(Instant::now());
    table
        .insert_column(ColumnSpec::of_kind(ColumnKind::DerivedExact), None)
        .unwrap();
    for i in 0..rows {
        let sample = Sample::take(
            Duration::from_millis(i as u64 * 100),
            2.0,
            0.001 * (i % 50) as f64,
            400,
            0.25,
        );
        table.record(&sample);
    }
    table
}

/// Benchmark computing one sample from raw readings
fn bench_sample_take(c: &mut Criterion) {
    c.bench_function("sample_take", |b| {
        b.iter(|| {
            Sample::take(
                black_box(Duration::from_millis(1500)),
                black_box(2.0),
                black_box(0.0123),
                black_box(850),
                black_box(0.5),
            )
        })
    });
}

/// Benchmark recording rows into a growing table
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");

    for num_rows in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(num_rows as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rows", num_rows)),
            &num_rows,
            |b, &num_rows| {
                b.iter(|| black_box(filled_table(num_rows)));
            },
        );
    }

    group.finish();
}

/// Benchmark CSV rendering of a recorded table
fn bench_csv_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_export");

    for num_rows in [1000, 10000] {
        let table = filled_table(num_rows);
        group.throughput(Throughput::Elements(num_rows as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rows", num_rows)),
            &table,
            |b, table| {
                b.iter(|| black_box(to_csv_string(table).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sample_take, bench_record, bench_csv_export);
criterion_main!(benches);

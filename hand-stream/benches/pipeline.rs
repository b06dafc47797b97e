//! Criterion benchmarks for the ingestion hot paths
//!
//! Covers: line parsing, stream framing, the basis change, store updates
//! and world-point reconstruction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hand_stream::geometry::{convert_quaternion, matrix_to_quat, quat_to_matrix, Quat};
use hand_stream::hand::{HandStateStore, Side};
use hand_stream::stream::{parse_line, Framed, LineFramer};
use hand_stream::view::BoundsSmoother;

fn landmark_line(rows: usize) -> String {
    let values: Vec<String> = (0..rows)
        .map(|i| format!("{:.4},{:.4},{:.4}", i as f64 * 0.01, 0.02, i as f64 * -0.003))
        .collect();
    format!("Right Landmarks,{}", values.join(","))
}

fn landmark_values(rows: usize) -> Vec<f64> {
    (0..rows)
        .flat_map(|i| [i as f64 * 0.01, 0.02, i as f64 * -0.003])
        .collect()
}

// ---------------------------------------------------------------------------
// Parsing and framing
// ---------------------------------------------------------------------------

fn bench_parse_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line");
    let wrist = "Left Wrist,0.12,1.05,0.33,0.01,0.7,0.02,0.71".to_string();
    group.bench_function("wrist", |b| b.iter(|| parse_line(black_box(&wrist))));

    for rows in [21, 26] {
        let line = landmark_line(rows);
        group.bench_with_input(BenchmarkId::new("landmarks", rows), &line, |b, line| {
            b.iter(|| parse_line(black_box(line)))
        });
    }
    group.finish();
}

fn bench_framer(c: &mut Criterion) {
    let mut payload = String::new();
    for _ in 0..16 {
        payload.push_str(&landmark_line(21));
        payload.push('\n');
    }
    let bytes = payload.into_bytes();

    c.bench_function("line_framer_512b_reads", |b| {
        b.iter(|| {
            let mut framer = LineFramer::new();
            let mut lines = 0;
            for chunk in bytes.chunks(512) {
                if let Framed::Lines(done) = framer.push(black_box(chunk)) {
                    lines += done.len();
                }
            }
            lines
        })
    });
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

fn bench_quaternion(c: &mut Criterion) {
    let q = Quat::new(0.1, 0.7, 0.05, 0.7);
    c.bench_function("quat_matrix_roundtrip", |b| {
        b.iter(|| matrix_to_quat(&quat_to_matrix(black_box(q))))
    });
    c.bench_function("convert_quaternion", |b| b.iter(|| convert_quaternion(black_box(q))));
}

// ---------------------------------------------------------------------------
// Store and view
// ---------------------------------------------------------------------------

fn bench_store(c: &mut Criterion) {
    let store = HandStateStore::new();
    let wrist = [0.1, 0.2, 0.3, 0.0, 0.38, 0.0, 0.92];
    let landmarks = landmark_values(21);

    c.bench_function("store_update_landmarks_21", |b| {
        b.iter(|| store.update_landmarks(Side::Right, black_box(&landmarks)))
    });

    store.update_wrist(Side::Right, &wrist);
    store.update_landmarks(Side::Right, &landmarks);
    c.bench_function("store_world_points_21", |b| {
        b.iter(|| store.world_points(black_box(Side::Right)))
    });

    let points = store.world_points(Side::Right).unwrap_or_default();
    c.bench_function("bounds_smoother_update_21", |b| {
        let mut smoother = BoundsSmoother::new(0.1, 0.4).unwrap();
        b.iter(|| smoother.update(black_box(&points)))
    });
}

criterion_group!(
    benches,
    bench_parse_line,
    bench_framer,
    bench_quaternion,
    bench_store,
);
criterion_main!(benches);

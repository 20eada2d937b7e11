//! Benchmarks for boolean clipping, offsetting and Minkowski sums.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vatti_rust::{
    minkowski_sum, offset_paths, ClipType, Clipper, EndType, IntPoint, JoinType, Path,
    PolyFillType, PolyType,
};

/// Regular polygon approximating a circle.
fn generate_circle(cx: i64, cy: i64, r: f64, steps: usize) -> Path {
    (0..steps)
        .map(|i| {
            let a = i as f64 / steps as f64 * std::f64::consts::TAU;
            IntPoint::new(cx + (r * a.cos()) as i64, cy + (r * a.sin()) as i64)
        })
        .collect()
}

/// Self-intersecting random polygon.
fn generate_random_polygon(num_points: usize, seed: u64) -> Path {
    let mut state = seed;
    (0..num_points)
        .map(|_| {
            // Simple xorshift for deterministic "random" vertices
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            IntPoint::new((state % 100_000) as i64, ((state >> 32) % 100_000) as i64)
        })
        .collect()
}

fn run(clip_type: ClipType, subject: &[Path], clip: &[Path]) -> usize {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyType::Subject, true).unwrap();
    c.add_paths(clip, PolyType::Clip, true).unwrap();
    c.execute(clip_type, PolyFillType::NonZero, PolyFillType::NonZero)
        .unwrap()
        .len()
}

fn bench_circles(c: &mut Criterion) {
    let mut group = c.benchmark_group("circles");

    for size in [64, 512, 4096] {
        let a = vec![generate_circle(0, 0, 100_000.0, size)];
        let b = vec![generate_circle(60_000, 20_000, 80_000.0, size)];
        group.throughput(Throughput::Elements(2 * size as u64));

        for ct in [ClipType::Intersection, ClipType::Union, ClipType::Xor] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", ct), size), &(&a, &b), |bch, (a, b)| {
                bch.iter(|| run(ct, black_box(a), black_box(b)))
            });
        }
    }

    group.finish();
}

fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("random");

    for size in [50, 200, 1000] {
        let a = vec![generate_random_polygon(size, 12345)];
        let b = vec![generate_random_polygon(size, 67890)];
        group.throughput(Throughput::Elements(2 * size as u64));

        group.bench_with_input(BenchmarkId::new("intersection", size), &(&a, &b), |bch, (a, b)| {
            bch.iter(|| run(ClipType::Intersection, black_box(a), black_box(b)))
        });
    }

    group.finish();
}

fn bench_offset(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset");

    for size in [64, 512, 4096] {
        let paths = vec![generate_circle(0, 0, 100_000.0, size)];
        group.throughput(Throughput::Elements(size as u64));

        for join in [JoinType::Square, JoinType::Round, JoinType::Miter] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", join), size), &paths, |b, p| {
                b.iter(|| offset_paths(black_box(p), 500.0, join, EndType::ClosedPolygon, 2.0, 0.25))
            });
        }
    }

    group.finish();
}

fn bench_minkowski(c: &mut Criterion) {
    let brush = generate_circle(0, 0, 50.0, 16);
    let path = generate_circle(0, 0, 10_000.0, 256);
    c.bench_function("minkowski_sum_circle_along_circle", |b| {
        b.iter(|| minkowski_sum(black_box(&brush), black_box(&path), true))
    });
}

criterion_group!(benches, bench_circles, bench_random, bench_offset, bench_minkowski);
criterion_main!(benches);

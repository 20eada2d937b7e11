// Copyright 2025 Lars Brubaker
// Shared test utilities for vatti-rust tests.

#![allow(dead_code)]

use vatti_rust::{
    area, ClipType, Clipper, IntPoint, Path, Paths, PolyFillType, PolyTree, PolyType,
};

/// Parse a contour list: one vertex per line as `x y` or `x, y`.
/// Blank lines separate contours.
pub fn parse_contours(data: &str) -> Paths {
    let mut contours: Paths = Vec::new();
    let mut current: Path = Vec::new();

    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                contours.push(std::mem::take(&mut current));
            }
            continue;
        }
        let coords: Vec<i64> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<i64>().ok())
            .collect();
        if let [x, y] = coords[..] {
            current.push(IntPoint::new(x, y));
        }
    }
    if !current.is_empty() {
        contours.push(current);
    }
    contours
}

/// Axis-aligned square, counter-clockwise in a y-up frame.
pub fn square(x: i64, y: i64, s: i64) -> Path {
    rect(x, y, s, s)
}

pub fn rect(x: i64, y: i64, w: i64, h: i64) -> Path {
    vec![
        IntPoint::new(x, y),
        IntPoint::new(x + w, y),
        IntPoint::new(x + w, y + h),
        IntPoint::new(x, y + h),
    ]
}

/// Regular polygon approximation of a circle.
pub fn circle(cx: i64, cy: i64, r: f64, steps: usize) -> Path {
    (0..steps)
        .map(|i| {
            let a = i as f64 * std::f64::consts::TAU / steps as f64;
            IntPoint::new(cx + (r * a.cos()).round() as i64, cy + (r * a.sin()).round() as i64)
        })
        .collect()
}

/// Star polygon whose edges cross themselves.
pub fn star(cx: i64, cy: i64, r: f64, points: usize) -> Path {
    (0..points)
        .map(|i| {
            let a = (i * 2 % points) as f64 * std::f64::consts::TAU / points as f64;
            IntPoint::new(cx + (r * a.cos()).round() as i64, cy + (r * a.sin()).round() as i64)
        })
        .collect()
}

/// Deterministic pseudo-random polygon (xorshift) inside [0, size)^2.
pub fn random_polygon(seed: u64, vertices: usize, size: i64) -> Path {
    let mut s = seed.max(1);
    let mut next = move || {
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        (s % size as u64) as i64
    };
    (0..vertices).map(|_| IntPoint::new(next(), next())).collect()
}

/// Sum of signed areas.
pub fn total_area(paths: &[Path]) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

pub fn boolean(clip_type: ClipType, subject: &[Path], clip: &[Path], fill: PolyFillType) -> Paths {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyType::Subject, true).expect("subject in range");
    c.add_paths(clip, PolyType::Clip, true).expect("clip in range");
    c.execute(clip_type, fill, fill)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", clip_type, e))
}

pub fn boolean_tree(clip_type: ClipType, subject: &[Path], clip: &[Path], fill: PolyFillType) -> PolyTree {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyType::Subject, true).expect("subject in range");
    c.add_paths(clip, PolyType::Clip, true).expect("clip in range");
    c.execute_tree(clip_type, fill, fill)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", clip_type, e))
}

/// Every contour has at least three vertices and no consecutive duplicates.
pub fn verify_closed_contours(paths: &[Path]) {
    for (i, p) in paths.iter().enumerate() {
        assert!(p.len() >= 3, "contour {} has only {} vertices", i, p.len());
        for j in 0..p.len() {
            let k = (j + 1) % p.len();
            assert_ne!(p[j], p[k], "contour {} repeats vertex {:?} at {}", i, p[j], j);
        }
    }
}

/// As `verify_closed_contours`, and no contour encloses zero area.
pub fn verify_valid_output(paths: &[Path]) {
    verify_closed_contours(paths);
    for (i, p) in paths.iter().enumerate() {
        assert!(area(p) != 0.0, "contour {} has zero area", i);
    }
}

pub fn assert_area_approx(actual: f64, expected: f64, tolerance: f64, label: &str) {
    assert!(
        (actual - expected).abs() < tolerance,
        "{}: expected area ~{}, got {} (diff={})",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}

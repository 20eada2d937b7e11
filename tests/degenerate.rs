// Copyright 2025 Lars Brubaker
// Degenerate and boundary input tests.

mod helpers;

use approx::assert_relative_eq;
use helpers::{boolean, rect, square, total_area};
use vatti_rust::{
    clean_polygon, simplify_polygons, ClipError, ClipOption, ClipType, Clipper, IntPoint, Path,
    PolyFillType, PolyType, DEFAULT_CLEAN_DISTANCE, HI_RANGE, LO_RANGE,
};

const NZ: PolyFillType = PolyFillType::NonZero;

fn pts(coords: &[(i64, i64)]) -> Path {
    vatti_rust::path_from(coords)
}

#[test]
fn empty_and_tiny_paths_are_ignored() {
    let mut c = Clipper::new();
    assert_eq!(c.add_path(&[], PolyType::Subject, true), Ok(false));
    assert_eq!(c.add_path(&pts(&[(3, 3)]), PolyType::Subject, true), Ok(false));
    assert_eq!(c.add_path(&pts(&[(3, 3), (3, 3), (3, 3)]), PolyType::Subject, true), Ok(false));
    assert_eq!(c.add_path(&pts(&[(0, 0), (4, 0)]), PolyType::Subject, true), Ok(false));
    let out = c.execute(ClipType::Union, NZ, NZ).unwrap();
    assert!(out.is_empty());
}

#[test]
fn collinear_closed_path_is_ignored() {
    let mut c = Clipper::new();
    let line = pts(&[(0, 0), (5, 5), (10, 10), (20, 20)]);
    assert_eq!(c.add_path(&line, PolyType::Subject, true), Ok(false));
}

#[test]
fn repeated_closing_vertex() {
    let mut p = square(0, 0, 10);
    p.push(p[0]);
    let out = boolean(ClipType::Union, &[p], &[], NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 4);
    assert_eq!(total_area(&out), 100.0);
}

#[test]
fn spike_is_removed() {
    let p = pts(&[(0, 0), (10, 0), (10, 10), (10, 20), (10, 10), (0, 10)]);
    let out = boolean(ClipType::Union, &[p], &[], NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(total_area(&out), 100.0);
}

#[test]
fn shared_edge_union() {
    let out = boolean(ClipType::Union, &[square(0, 0, 10), square(10, 0, 10)], &[], NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 4);
    assert_eq!(total_area(&out), 200.0);
}

#[test]
fn partially_shared_edge_union() {
    let out = boolean(ClipType::Union, &[square(0, 0, 10), rect(10, 5, 10, 10)], &[], NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(total_area(&out), 200.0);
}

#[test]
fn preserve_collinear_keeps_midpoints() {
    let p = pts(&[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)]);
    let run = |preserve| {
        let mut c = Clipper::new();
        c.set_option(ClipOption::PreserveCollinear, preserve);
        c.add_path(&p, PolyType::Subject, true).unwrap();
        c.execute(ClipType::Union, NZ, NZ).unwrap()
    };
    assert_eq!(run(false)[0].len(), 4);
    assert_eq!(run(true)[0].len(), 5);
}

#[test]
fn coordinates_above_low_range_use_wide_math() {
    let big = (LO_RANGE + 1) * 1024;
    let a = [rect(0, 0, big, big)];
    let b = [rect(big / 2, big / 2, big, big)];
    let out = boolean(ClipType::Intersection, &a, &b, NZ);
    assert_eq!(out.len(), 1);
    let half = (big / 2) as f64;
    assert_relative_eq!(total_area(&out), half * half, max_relative = 1e-9);
}

#[test]
fn coordinates_above_high_range_are_rejected() {
    let mut c = Clipper::new();
    let p = pts(&[(0, 0), (10, 0), (0, -HI_RANGE - 1)]);
    assert_eq!(
        c.add_path(&p, PolyType::Subject, true),
        Err(ClipError::RangeExceeded { x: 0, y: -HI_RANGE - 1 })
    );
    // the rejected path leaves nothing behind
    assert!(c.execute(ClipType::Union, NZ, NZ).unwrap().is_empty());
}

#[test]
fn clean_then_simplify_round_trip() {
    let noisy = pts(&[(0, 0), (50, 1), (100, 0), (100, 100), (101, 100), (0, 100)]);
    let cleaned = clean_polygon(&noisy, DEFAULT_CLEAN_DISTANCE);
    assert_eq!(cleaned.len(), 4);
    let simple = simplify_polygons(&[cleaned], NZ).unwrap();
    assert_eq!(simple.len(), 1);
    assert!(total_area(&simple) > 9_900.0);
    assert!(simple[0].iter().all(|p| *p != IntPoint::new(50, 1)));
}

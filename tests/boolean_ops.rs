// Copyright 2025 Lars Brubaker
// Boolean operation tests with area verification.

mod helpers;

use helpers::{
    assert_area_approx, boolean, circle, random_polygon, square, total_area, verify_closed_contours,
    verify_valid_output,
};
use vatti_rust::{ClipType, PolyFillType};

const NZ: PolyFillType = PolyFillType::NonZero;

#[test]
fn overlapping_squares_all_four_ops() {
    let a = [square(0, 0, 10)];
    let b = [square(5, 5, 10)];
    assert_eq!(total_area(&boolean(ClipType::Intersection, &a, &b, NZ)), 25.0);
    assert_eq!(total_area(&boolean(ClipType::Union, &a, &b, NZ)), 175.0);
    assert_eq!(total_area(&boolean(ClipType::Difference, &a, &b, NZ)), 75.0);
    assert_eq!(total_area(&boolean(ClipType::Difference, &b, &a, NZ)), 75.0);
    assert_eq!(total_area(&boolean(ClipType::Xor, &a, &b, NZ)), 150.0);
}

#[test]
fn inclusion_exclusion_on_circles() {
    let a = [circle(0, 0, 1000.0, 90)];
    let b = [circle(700, 300, 800.0, 72)];
    let area_a = total_area(&a);
    let area_b = total_area(&b);
    let u = boolean(ClipType::Union, &a, &b, NZ);
    let i = boolean(ClipType::Intersection, &a, &b, NZ);
    verify_valid_output(&u);
    verify_valid_output(&i);
    let tol = (area_a + area_b) * 1e-4;
    assert_area_approx(total_area(&u) + total_area(&i), area_a + area_b, tol, "union + intersection");

    let d = boolean(ClipType::Difference, &a, &b, NZ);
    assert_area_approx(total_area(&d) + total_area(&i), area_a, tol, "difference + intersection");

    let x = boolean(ClipType::Xor, &a, &b, NZ);
    assert_area_approx(total_area(&x), total_area(&u) - total_area(&i), tol, "xor");
}

#[test]
fn union_is_commutative() {
    let a = [circle(0, 0, 500.0, 40)];
    let b = [square(-100, -100, 800)];
    let ab = boolean(ClipType::Union, &a, &b, NZ);
    let ba = boolean(ClipType::Union, &b, &a, NZ);
    assert_eq!(ab.len(), ba.len());
    assert_area_approx(total_area(&ab), total_area(&ba), 20.0, "commutative union");
}

#[test]
fn grid_of_touching_squares_merges() {
    let mut cells = Vec::new();
    for i in 0..10 {
        for j in 0..10 {
            cells.push(square(i * 10, j * 10, 10));
        }
    }
    let out = boolean(ClipType::Union, &cells, &[], NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(total_area(&out), 10_000.0);
    verify_valid_output(&out);
}

#[test]
fn subject_inside_clip() {
    let inner = [square(10, 10, 5)];
    let outer = [square(0, 0, 100)];
    assert_eq!(total_area(&boolean(ClipType::Intersection, &inner, &outer, NZ)), 25.0);
    assert!(boolean(ClipType::Difference, &inner, &outer, NZ).is_empty());
    assert_eq!(total_area(&boolean(ClipType::Union, &inner, &outer, NZ)), 10_000.0);
}

#[test]
fn identical_operands() {
    let a = [square(0, 0, 10)];
    assert_eq!(total_area(&boolean(ClipType::Intersection, &a, &a, NZ)), 100.0);
    assert!(boolean(ClipType::Difference, &a, &a, NZ).is_empty());
    assert!(boolean(ClipType::Xor, &a, &a, NZ).is_empty());
}

#[test]
fn union_of_identical_operands_keeps_area() {
    let l_shape = vatti_rust::path_from(&[(0, 0), (30, 0), (30, 10), (10, 10), (10, 30), (0, 30)]);
    let shapes = [square(0, 0, 10), circle(0, 0, 500.0, 64), l_shape];
    for shape in shapes {
        let a = [shape];
        let out = boolean(ClipType::Union, &a, &a, NZ);
        assert_eq!(out.len(), 1);
        verify_valid_output(&out);
        assert_area_approx(total_area(&out), total_area(&a), 1.0, "union(A, A)");
    }
}

#[test]
fn random_polygons_give_valid_output() {
    for seed in 1..20u64 {
        let a = [random_polygon(seed, 12, 1000)];
        let b = [random_polygon(seed * 7919, 9, 1000)];
        for ct in [ClipType::Intersection, ClipType::Union, ClipType::Difference, ClipType::Xor] {
            for fill in [PolyFillType::EvenOdd, PolyFillType::NonZero] {
                let out = boolean(ct, &a, &b, fill);
                verify_closed_contours(&out);
            }
        }
        let u = total_area(&boolean(ClipType::Union, &a, &b, NZ));
        let i = total_area(&boolean(ClipType::Intersection, &a, &b, NZ));
        assert!(u + 1.0 >= i, "seed {}: union {} smaller than intersection {}", seed, u, i);
    }
}

#[test]
fn intersect_all_of_three_strips() {
    let strips = [
        vec![helpers::rect(0, 0, 30, 10)],
        vec![helpers::rect(10, -5, 10, 30)],
        vec![helpers::rect(-5, 5, 40, 20)],
    ];
    let out = vatti_rust::intersect_all(&strips).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(total_area(&out), 50.0);
}

// Copyright 2025 Lars Brubaker
// PolyTree structure and traversal tests.

mod helpers;

use helpers::{boolean, boolean_tree, square, total_area};
use vatti_rust::{closed_paths_from_polytree, polytree_to_paths, ClipType, PolyFillType, PolyTree};

const NZ: PolyFillType = PolyFillType::NonZero;

fn depth(tree: &PolyTree, id: usize) -> usize {
    let mut d = 0;
    let mut p = tree.node(id).parent();
    while let Some(i) = p {
        d += 1;
        p = tree.node(i).parent();
    }
    d
}

#[test]
fn plate_with_three_holes() {
    let plate = [square(0, 0, 100)];
    let holes = [square(10, 10, 10), square(40, 40, 10), square(70, 70, 10)];
    let tree = boolean_tree(ClipType::Difference, &plate, &holes, NZ);
    assert_eq!(tree.roots().len(), 1);
    assert_eq!(tree.total(), 4);
    let root = tree.roots()[0];
    assert_eq!(tree.node(root).child_count(), 3);
    for &h in tree.node(root).children() {
        assert!(tree.is_hole(h));
        assert_eq!(vatti_rust::area(tree.node(h).contour()), -100.0);
    }
}

#[test]
fn tree_and_flat_output_agree() {
    let plate = [square(0, 0, 100), square(200, 0, 50)];
    let holes = [square(10, 10, 30), square(210, 10, 10)];
    let flat = boolean(ClipType::Difference, &plate, &holes, NZ);
    let tree = boolean_tree(ClipType::Difference, &plate, &holes, NZ);
    let from_tree = polytree_to_paths(&tree);
    assert_eq!(flat.len(), from_tree.len());
    assert_eq!(total_area(&flat), total_area(&from_tree));
    assert_eq!(closed_paths_from_polytree(&tree).len(), 4);
    assert_eq!(tree.roots().len(), 2);
}

#[test]
fn walk_visits_every_node_once() {
    let mut shapes = Vec::new();
    for i in 0..4 {
        let o = i * 100;
        shapes.push(square(o, 0, 90));
        let mut hole = square(o + 10, 10, 70);
        hole.reverse();
        shapes.push(hole);
        shapes.push(square(o + 20, 20, 50));
    }
    let tree = boolean_tree(ClipType::Union, &shapes, &[], PolyFillType::EvenOdd);
    let visited: Vec<usize> = tree.iter().collect();
    assert_eq!(visited.len(), tree.total());
    assert_eq!(tree.total(), 12);
    let mut sorted = visited.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), visited.len());
    for &id in &visited {
        assert_eq!(tree.is_hole(id), depth(&tree, id) % 2 == 1);
    }
}

#[test]
fn hole_orientation_follows_depth() {
    let mut hole = square(10, 10, 80);
    hole.reverse();
    let shapes = [square(0, 0, 100), hole, square(20, 20, 60), {
        let mut h = square(30, 30, 40);
        h.reverse();
        h
    }];
    let tree = boolean_tree(ClipType::Union, &shapes, &[], PolyFillType::EvenOdd);
    assert_eq!(tree.total(), 4);
    for id in tree.iter() {
        let a = vatti_rust::area(tree.node(id).contour());
        assert_eq!(a < 0.0, tree.is_hole(id), "node {} area {}", id, a);
    }
}

#[test]
fn empty_result_gives_empty_tree() {
    let tree = boolean_tree(ClipType::Intersection, &[square(0, 0, 10)], &[square(50, 50, 10)], NZ);
    assert!(tree.is_empty());
    assert_eq!(tree.first(), None);
    assert!(polytree_to_paths(&tree).is_empty());
}

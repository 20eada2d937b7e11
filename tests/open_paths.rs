// Copyright 2025 Lars Brubaker
// Open path (polyline) clipping tests.

mod helpers;

use helpers::square;
use vatti_rust::{
    closed_paths_from_polytree, open_paths_from_polytree, path_from, ClipType, Clipper, IntPoint,
    Path, PolyFillType, PolyTree, PolyType,
};

const NZ: PolyFillType = PolyFillType::NonZero;

fn clip_line(clip_type: ClipType, line: &Path, clip: &[Path]) -> PolyTree {
    let mut c = Clipper::new();
    assert_eq!(c.add_path(line, PolyType::Subject, false), Ok(true));
    c.add_paths(clip, PolyType::Clip, true).unwrap();
    c.execute_tree(clip_type, NZ, NZ).unwrap()
}

fn sorted_by_y(mut p: Path) -> Path {
    p.sort_by_key(|q| (q.y, q.x));
    p
}

#[test]
fn vertical_line_inside_square() {
    let tree = clip_line(ClipType::Intersection, &path_from(&[(5, -5), (5, 15)]), &[square(0, 0, 10)]);
    let open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 1);
    assert_eq!(sorted_by_y(open[0].clone()), path_from(&[(5, 0), (5, 10)]));
}

#[test]
fn vertical_line_outside_square() {
    let tree = clip_line(ClipType::Difference, &path_from(&[(5, -5), (5, 15)]), &[square(0, 0, 10)]);
    let mut open: Vec<Path> = open_paths_from_polytree(&tree).into_iter().map(sorted_by_y).collect();
    open.sort_by_key(|p| p[0].y);
    assert_eq!(open, vec![path_from(&[(5, -5), (5, 0)]), path_from(&[(5, 10), (5, 15)])]);
}

#[test]
fn polyline_keeps_interior_vertex() {
    let line = path_from(&[(-5, -3), (5, 7), (15, -3)]);
    let tree = clip_line(ClipType::Intersection, &line, &[square(0, 0, 10)]);
    let open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 1);
    let p = &open[0];
    assert_eq!(p.len(), 3);
    assert!(p.contains(&IntPoint::new(5, 7)));
    let mut ends = vec![p[0], p[2]];
    ends.sort_by_key(|q| q.x);
    assert_eq!(ends, vec![IntPoint::new(0, 2), IntPoint::new(10, 2)]);
}

#[test]
fn union_without_clip_passes_line_through() {
    let tree = clip_line(ClipType::Union, &path_from(&[(5, -5), (5, 15)]), &[]);
    let open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 1);
    assert_eq!(sorted_by_y(open[0].clone()), path_from(&[(5, -5), (5, 15)]));
}

#[test]
fn line_missing_the_clip_vanishes_on_intersection() {
    let tree = clip_line(ClipType::Intersection, &path_from(&[(50, -5), (50, 15)]), &[square(0, 0, 10)]);
    assert!(tree.is_empty());
}

#[test]
fn open_and_closed_subjects_share_one_tree() {
    let mut c = Clipper::new();
    c.add_path(&path_from(&[(50, -5), (50, 15)]), PolyType::Subject, false).unwrap();
    c.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
    let tree = c.execute_tree(ClipType::Union, NZ, NZ).unwrap();
    assert_eq!(tree.roots().len(), 2);
    assert_eq!(open_paths_from_polytree(&tree).len(), 1);
    let closed = closed_paths_from_polytree(&tree);
    assert_eq!(closed.len(), 1);
    assert_eq!(vatti_rust::area(&closed[0]), 100.0);
    assert!(tree.roots().iter().any(|&r| tree.node(r).is_open()));
}

// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (SimplifyPolygon, CleanPolygon)
//
// Cleanup helpers built on the clipper: self-union into simple polygons,
// removal of near-duplicate and near-collinear vertices, and chained
// intersection.

use crate::clipper::{ClipOption, ClipType, Clipper, PolyFillType};
use crate::edge::PolyType;
use crate::error::Result;
use crate::geom::{IntPoint, Path, Paths};

/// Default `distance` for `clean_polygon`: vertices within about one unit
/// diagonal of each other are merged.
pub const DEFAULT_CLEAN_DISTANCE: f64 = 1.415;

/// Self-union of one path under `fill`, split into strictly simple
/// polygons.
pub fn simplify_polygon(path: &[IntPoint], fill: PolyFillType) -> Result<Paths> {
    let mut c = Clipper::new();
    c.set_option(ClipOption::StrictlySimple, true);
    c.add_path(path, PolyType::Subject, true)?;
    c.execute(ClipType::Union, fill, fill)
}

/// As `simplify_polygon`, for several paths at once.
pub fn simplify_polygons(paths: &[Path], fill: PolyFillType) -> Result<Paths> {
    let mut c = Clipper::new();
    c.set_option(ClipOption::StrictlySimple, true);
    c.add_paths(paths, PolyType::Subject, true)?;
    c.execute(ClipType::Union, fill, fill)
}

/// Intersection of every operand, applied left to right with NonZero fill.
pub fn intersect_all(operands: &[Paths]) -> Result<Paths> {
    let (first, rest) = match operands.split_first() {
        Some(s) => s,
        None => return Ok(Vec::new()),
    };
    let mut acc = first.clone();
    for clip in rest {
        if acc.is_empty() {
            break;
        }
        let mut c = Clipper::new();
        c.add_paths(&acc, PolyType::Subject, true)?;
        c.add_paths(clip, PolyType::Clip, true)?;
        acc = c.execute(ClipType::Intersection, PolyFillType::NonZero, PolyFillType::NonZero)?;
    }
    Ok(acc)
}

// ─────────────────────────── Cleaning ─────────────────────────────────────────

fn dist_sqrd(a: IntPoint, b: IntPoint) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    dx * dx + dy * dy
}

/// Squared perpendicular distance from `pt` to the line through ln1-ln2.
fn distance_from_line_sqrd(pt: IntPoint, ln1: IntPoint, ln2: IntPoint) -> f64 {
    let a = (ln1.y - ln2.y) as f64;
    let b = (ln2.x - ln1.x) as f64;
    let c = a * ln1.x as f64 + b * ln1.y as f64;
    let c = a * pt.x as f64 + b * pt.y as f64 - c;
    (c * c) / (a * a + b * b)
}

/// True when whichever of the three points lies between the other two has a
/// squared distance below `limit` from the line through them.
fn slopes_near_collinear(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, limit: f64) -> bool {
    let between = |a: i64, b: i64, c: i64| (a > b) == (a < c);
    if (pt1.x - pt2.x).abs() > (pt1.y - pt2.y).abs() {
        if between(pt1.x, pt2.x, pt3.x) {
            distance_from_line_sqrd(pt1, pt2, pt3) < limit
        } else if between(pt2.x, pt1.x, pt3.x) {
            distance_from_line_sqrd(pt2, pt1, pt3) < limit
        } else {
            distance_from_line_sqrd(pt3, pt1, pt2) < limit
        }
    } else if between(pt1.y, pt2.y, pt3.y) {
        distance_from_line_sqrd(pt1, pt2, pt3) < limit
    } else if between(pt2.y, pt1.y, pt3.y) {
        distance_from_line_sqrd(pt2, pt1, pt3) < limit
    } else {
        distance_from_line_sqrd(pt3, pt1, pt2) < limit
    }
}

/// Removes vertices that are within `distance` of a neighbour, that would
/// leave their neighbours within `distance` of each other, or that lie within
/// `distance` of the line through their neighbours. Returns an empty path if
/// fewer than three vertices survive.
pub fn clean_polygon(path: &[IntPoint], distance: f64) -> Path {
    let n = path.len();
    if n == 0 {
        return Vec::new();
    }
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut checked = vec![false; n];
    let mut size = n;
    let dist_limit = distance * distance;

    // unlinks `op`, returning its predecessor
    let exclude = |op: usize, next: &mut Vec<usize>, prev: &mut Vec<usize>, checked: &mut Vec<bool>| {
        let p = prev[op];
        let nx = next[op];
        next[p] = nx;
        prev[nx] = p;
        checked[p] = false;
        p
    };

    let mut op = 0;
    while !checked[op] && next[op] != prev[op] {
        let (pp, pt, pn) = (path[prev[op]], path[op], path[next[op]]);
        if dist_sqrd(pt, pp) <= dist_limit {
            op = exclude(op, &mut next, &mut prev, &mut checked);
            size -= 1;
        } else if dist_sqrd(pp, pn) <= dist_limit {
            exclude(next[op], &mut next, &mut prev, &mut checked);
            op = exclude(op, &mut next, &mut prev, &mut checked);
            size -= 2;
        } else if slopes_near_collinear(pp, pt, pn, dist_limit) {
            op = exclude(op, &mut next, &mut prev, &mut checked);
            size -= 1;
        } else {
            checked[op] = true;
            op = next[op];
        }
    }

    if size < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        out.push(path[op]);
        op = next[op];
    }
    out
}

pub fn clean_polygons(paths: &[Path], distance: f64) -> Paths {
    paths.iter().map(|p| clean_polygon(p, distance)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{area, path_from};

    #[test]
    fn clean_drops_near_duplicates_and_collinear() {
        let p = path_from(&[(0, 0), (5, 0), (10, 0), (10, 10), (10, 10), (0, 10)]);
        let c = clean_polygon(&p, DEFAULT_CLEAN_DISTANCE);
        assert_eq!(c, path_from(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
        assert_eq!(area(&c), 100.0);
    }

    #[test]
    fn clean_keeps_a_clean_square() {
        let p = path_from(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let c = clean_polygon(&p, DEFAULT_CLEAN_DISTANCE);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn clean_distance_sets_the_collinear_threshold() {
        // (10, 1) sits one unit off the chord from (0, 0) to (20, 0)
        let p = path_from(&[(0, 0), (10, 1), (20, 0), (20, 20), (0, 20)]);
        assert_eq!(clean_polygon(&p, 0.5).len(), 5);
        let c = clean_polygon(&p, DEFAULT_CLEAN_DISTANCE);
        assert_eq!(c.len(), 4);
        assert!(!c.contains(&IntPoint::new(10, 1)));
    }

    #[test]
    fn clean_collapses_tiny_polygons() {
        let p = path_from(&[(0, 0), (1, 0), (1, 1)]);
        assert!(clean_polygon(&p, DEFAULT_CLEAN_DISTANCE).is_empty());
        assert!(clean_polygon(&[], 1.0).is_empty());
        assert_eq!(clean_polygons(&[p.clone(), p], 1.0).len(), 2);
    }

    #[test]
    fn simplify_splits_a_bowtie() {
        let bowtie = path_from(&[(0, 0), (10, 10), (10, 0), (0, 10)]);
        let out = simplify_polygon(&bowtie, PolyFillType::EvenOdd).unwrap();
        assert_eq!(out.len(), 2);
        let total: f64 = out.iter().map(|p| area(p)).sum();
        assert_eq!(total, 50.0);
    }

    #[test]
    fn intersect_all_chains() {
        let a = vec![path_from(&[(0, 0), (10, 0), (10, 10), (0, 10)])];
        let b = vec![path_from(&[(5, 0), (15, 0), (15, 10), (5, 10)])];
        let c = vec![path_from(&[(0, 5), (10, 5), (10, 15), (0, 15)])];
        let out = intersect_all(&[a, b, c]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 25.0);
        assert!(intersect_all(&[]).unwrap().is_empty());
    }
}

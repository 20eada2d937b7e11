// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (IntPoint, Area, Orientation, PointInPolygon)
//
// Integer geometry primitives.
//
// All clipping happens on i64 coordinates. Coordinates up to LO_RANGE keep
// every cross product inside i64; beyond that the slope tests switch to i128
// products, and anything past HI_RANGE is refused.

use crate::error::{ClipError, Result};
use std::ops::{Add, Neg, Sub};

/// Largest coordinate magnitude whose cross products fit in an i64.
pub const LO_RANGE: i64 = 0x3FFF_FFFF;
/// Largest coordinate magnitude accepted at all.
pub const HI_RANGE: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// A vertex with integer coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: i64,
    pub y: i64,
}

impl IntPoint {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl Add for IntPoint {
    type Output = IntPoint;
    #[inline]
    fn add(self, o: IntPoint) -> IntPoint {
        IntPoint::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for IntPoint {
    type Output = IntPoint;
    #[inline]
    fn sub(self, o: IntPoint) -> IntPoint {
        IntPoint::new(self.x - o.x, self.y - o.y)
    }
}

impl Neg for IntPoint {
    type Output = IntPoint;
    #[inline]
    fn neg(self) -> IntPoint {
        IntPoint::new(-self.x, -self.y)
    }
}

impl From<(i64, i64)> for IntPoint {
    fn from((x, y): (i64, i64)) -> Self {
        IntPoint::new(x, y)
    }
}

/// A float point, used for offset normals.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DoublePoint {
    pub x: f64,
    pub y: f64,
}

impl DoublePoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds. `top` is the smallest y.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IntRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

pub type Path = Vec<IntPoint>;
pub type Paths = Vec<Path>;

/// Builds a path from `(x, y)` pairs.
pub fn path_from(coords: &[(i64, i64)]) -> Path {
    coords.iter().map(|&c| IntPoint::from(c)).collect()
}

/// Rounds half away from zero.
#[inline]
pub fn round(v: f64) -> i64 {
    if v < 0.0 {
        (v - 0.5) as i64
    } else {
        (v + 0.5) as i64
    }
}

/// Checks a point against the accepted ranges. Returns true when the point
/// needs 128-bit products.
pub fn range_test(pt: IntPoint, use_full_range: bool) -> Result<bool> {
    let (ax, ay) = (pt.x.unsigned_abs(), pt.y.unsigned_abs());
    if use_full_range {
        if ax > HI_RANGE as u64 || ay > HI_RANGE as u64 {
            return Err(ClipError::RangeExceeded { x: pt.x, y: pt.y });
        }
        Ok(true)
    } else if ax > LO_RANGE as u64 || ay > LO_RANGE as u64 {
        range_test(pt, true)
    } else {
        Ok(false)
    }
}

/// Signed area; positive for counter-clockwise paths in a y-up frame.
pub fn area(path: &[IntPoint]) -> f64 {
    let n = path.len();
    if n < 3 {
        return 0.0;
    }
    let mut a = 0.0f64;
    let mut j = n - 1;
    for i in 0..n {
        a += (path[j].x as f64 + path[i].x as f64) * (path[j].y as f64 - path[i].y as f64);
        j = i;
    }
    -a * 0.5
}

/// True when the path has non-negative area.
#[inline]
pub fn orientation(path: &[IntPoint]) -> bool {
    area(path) >= 0.0
}

/// One edge of the crossing-number test: `None` when `pt` lies on the edge
/// a-b, otherwise whether the edge toggles inside/outside.
pub(crate) fn edge_crossing(pt: IntPoint, a: IntPoint, b: IntPoint) -> Option<bool> {
    if b.y == pt.y && (b.x == pt.x || (a.y == pt.y && ((b.x > pt.x) == (a.x < pt.x)))) {
        return None;
    }
    if (a.y < pt.y) == (b.y < pt.y) {
        return Some(false);
    }
    if a.x >= pt.x && b.x > pt.x {
        return Some(true);
    }
    if a.x < pt.x && b.x <= pt.x {
        return Some(false);
    }
    let d = (a.x - pt.x) as f64 * (b.y - pt.y) as f64 - (b.x - pt.x) as f64 * (a.y - pt.y) as f64;
    if d == 0.0 {
        return None;
    }
    Some((d > 0.0) == (b.y > a.y))
}

/// Returns 0 if `pt` is outside, 1 if inside and -1 if it lies on the boundary.
pub fn point_in_polygon(pt: IntPoint, path: &[IntPoint]) -> i32 {
    let cnt = path.len();
    if cnt < 3 {
        return 0;
    }
    let mut result = 0;
    for i in 0..cnt {
        let (a, b) = (path[i], path[(i + 1) % cnt]);
        match edge_crossing(pt, a, b) {
            None => return -1,
            Some(true) => result = 1 - result,
            Some(false) => {}
        }
    }
    result
}

#[inline]
fn cross_equal(a: i64, b: i64, c: i64, d: i64, full_range: bool) -> bool {
    if full_range {
        (a as i128) * (b as i128) == (c as i128) * (d as i128)
    } else {
        a * b == c * d
    }
}

/// True when pt1-pt2 and pt2-pt3 share a slope.
#[inline]
pub fn slopes_equal3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, full_range: bool) -> bool {
    cross_equal(pt1.y - pt2.y, pt2.x - pt3.x, pt1.x - pt2.x, pt2.y - pt3.y, full_range)
}

/// True when pt1-pt2 and pt3-pt4 share a slope.
#[inline]
pub fn slopes_equal4(
    pt1: IntPoint,
    pt2: IntPoint,
    pt3: IntPoint,
    pt4: IntPoint,
    full_range: bool,
) -> bool {
    cross_equal(pt1.y - pt2.y, pt3.x - pt4.x, pt1.x - pt2.x, pt3.y - pt4.y, full_range)
}

/// True when pt2 lies strictly inside the segment pt1-pt3, assuming collinearity.
pub fn pt2_is_between_pt1_and_pt3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint) -> bool {
    if pt1 == pt3 || pt1 == pt2 || pt3 == pt2 {
        false
    } else if pt1.x != pt3.x {
        (pt2.x > pt1.x) == (pt2.x < pt3.x)
    } else {
        (pt2.y > pt1.y) == (pt2.y < pt3.y)
    }
}

/// Unit normal of the directed segment pt1 -> pt2 (rotated clockwise).
pub fn unit_normal(pt1: IntPoint, pt2: IntPoint) -> DoublePoint {
    if pt1 == pt2 {
        return DoublePoint::default();
    }
    let dx = (pt2.x - pt1.x) as f64;
    let dy = (pt2.y - pt1.y) as f64;
    let f = 1.0 / (dx * dx + dy * dy).sqrt();
    DoublePoint::new(dy * f, -dx * f)
}

pub fn reverse_path(path: &mut Path) {
    path.reverse();
}

pub fn reverse_paths(paths: &mut Paths) {
    for p in paths.iter_mut() {
        p.reverse();
    }
}

/// Bounds of every vertex in `paths`; all zero when there are none.
pub fn paths_bounds(paths: &[Path]) -> IntRect {
    let mut it = paths.iter().flat_map(|p| p.iter());
    let first = match it.next() {
        Some(p) => *p,
        None => return IntRect::default(),
    };
    let mut r = IntRect { left: first.x, top: first.y, right: first.x, bottom: first.y };
    for p in it {
        r.left = r.left.min(p.x);
        r.right = r.right.max(p.x);
        r.top = r.top.min(p.y);
        r.bottom = r.bottom.max(p.y);
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i64, y: i64, s: i64) -> Path {
        path_from(&[(x, y), (x + s, y), (x + s, y + s), (x, y + s)])
    }

    #[test]
    fn area_sign_follows_orientation() {
        let mut sq = square(0, 0, 10);
        assert_eq!(area(&sq), 100.0);
        assert!(orientation(&sq));
        sq.reverse();
        assert_eq!(area(&sq), -100.0);
        assert!(!orientation(&sq));
        assert_eq!(area(&sq[..2]), 0.0);
    }

    #[test]
    fn point_in_polygon_classifies() {
        let sq = square(0, 0, 10);
        assert_eq!(point_in_polygon(IntPoint::new(5, 5), &sq), 1);
        assert_eq!(point_in_polygon(IntPoint::new(15, 5), &sq), 0);
        assert_eq!(point_in_polygon(IntPoint::new(10, 5), &sq), -1);
        assert_eq!(point_in_polygon(IntPoint::new(0, 0), &sq), -1);
        assert_eq!(point_in_polygon(IntPoint::new(5, 0), &sq), -1);
    }

    #[test]
    fn slopes_match_in_both_ranges() {
        let a = IntPoint::new(0, 0);
        let b = IntPoint::new(2, 2);
        let c = IntPoint::new(5, 5);
        assert!(slopes_equal3(a, b, c, false));
        assert!(slopes_equal3(a, b, c, true));
        assert!(!slopes_equal3(a, b, IntPoint::new(5, 6), false));
        let big = HI_RANGE / 2;
        assert!(slopes_equal4(a, IntPoint::new(big, big), b, c, true));
    }

    #[test]
    fn range_test_escalates() {
        assert_eq!(range_test(IntPoint::new(10, -10), false), Ok(false));
        assert_eq!(range_test(IntPoint::new(LO_RANGE + 1, 0), false), Ok(true));
        assert!(range_test(IntPoint::new(0, -HI_RANGE - 1), false).is_err());
    }

    #[test]
    fn between_and_bounds() {
        let a = IntPoint::new(0, 0);
        assert!(pt2_is_between_pt1_and_pt3(a, IntPoint::new(1, 0), IntPoint::new(3, 0)));
        assert!(!pt2_is_between_pt1_and_pt3(a, IntPoint::new(4, 0), IntPoint::new(3, 0)));
        assert!(pt2_is_between_pt1_and_pt3(a, IntPoint::new(0, 2), IntPoint::new(0, 3)));
        let r = paths_bounds(&[square(-2, 1, 3), square(4, 4, 1)]);
        assert_eq!(r, IntRect { left: -2, top: 1, right: 5, bottom: 5 });
        assert_eq!(paths_bounds(&[]), IntRect::default());
    }

    #[test]
    fn round_is_half_away_from_zero() {
        assert_eq!(round(2.5), 3);
        assert_eq!(round(-2.5), -3);
        assert_eq!(round(1.49), 1);
    }
}

// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (ClipperOffset)
//
// Path offsetting (inflate/deflate).
//
// Each vertex is pushed out along the unit normals of its two edges, with
// Miter, Square or Round fill at convex corners and a pass through the vertex
// itself at concave ones. The raw rings overlap themselves and each other, so
// they are unioned with the Positive fill rule (or, for shrinking, with the
// Negative rule inside an enclosing frame that is then dropped).

use crate::clipper::{ClipOption, ClipType, Clipper, PolyFillType};
use crate::edge::PolyType;
use crate::error::Result;
use crate::geom::{orientation, round, unit_normal, DoublePoint, IntPoint, Path, Paths};
use crate::polytree::PolyTree;
use log::debug;
use std::f64::consts::PI;

pub const DEFAULT_MITER_LIMIT: f64 = 2.0;
pub const DEFAULT_ARC_TOLERANCE: f64 = 0.25;

const TWO_PI: f64 = PI * 2.0;

/// How convex corners are filled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JoinType {
    /// Cut off at distance `delta` from the vertex.
    Square,
    Round,
    /// Extended to a point, falling back to Square beyond the miter limit.
    Miter,
}

/// How a path's ends are treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndType {
    /// A closed polygon, offset on one side only.
    ClosedPolygon,
    /// A closed polyline, offset on both sides.
    OpenJoined,
    OpenButt,
    OpenSquare,
    OpenRound,
}

#[derive(Clone, Debug)]
struct OffsetPath {
    contour: Path,
    join: JoinType,
    end: EndType,
}

/// Parameters shared by every path of one offset run.
struct Run {
    delta: f64,
    sin: f64,
    cos: f64,
    miter_lim: f64,
    steps_per_rad: f64,
}

/// Offsets a single source path into `dest`.
struct PathOffsetter<'a> {
    run: &'a Run,
    src: &'a [IntPoint],
    normals: Vec<DoublePoint>,
    dest: Path,
    sin_a: f64,
}

impl PathOffsetter<'_> {
    #[inline]
    fn push_along(&mut self, j: usize, n: DoublePoint, sign: f64) {
        let p = self.src[j];
        let d = self.run.delta * sign;
        self.dest.push(IntPoint::new(round(p.x as f64 + n.x * d), round(p.y as f64 + n.y * d)));
    }

    fn offset_point(&mut self, j: usize, k: &mut usize, join: JoinType) {
        let (nj, nk) = (self.normals[j], self.normals[*k]);
        let delta = self.run.delta;
        self.sin_a = nk.x * nj.y - nj.x * nk.y;
        if (self.sin_a * delta).abs() < 1.0 {
            let cos_a = nk.x * nj.x + nj.y * nk.y;
            if cos_a > 0.0 {
                // nearly straight
                self.push_along(j, nk, 1.0);
                return;
            }
        } else if self.sin_a > 1.0 {
            self.sin_a = 1.0;
        } else if self.sin_a < -1.0 {
            self.sin_a = -1.0;
        }

        if self.sin_a * delta < 0.0 {
            // concave
            self.push_along(j, nk, 1.0);
            self.dest.push(self.src[j]);
            self.push_along(j, nj, 1.0);
        } else {
            match join {
                JoinType::Miter => {
                    let r = 1.0 + (nj.x * nk.x + nj.y * nk.y);
                    if r >= self.run.miter_lim {
                        self.do_miter(j, *k, r);
                    } else {
                        self.do_square(j, *k);
                    }
                }
                JoinType::Square => self.do_square(j, *k),
                JoinType::Round => self.do_round(j, *k),
            }
        }
        *k = j;
    }

    fn do_square(&mut self, j: usize, k: usize) {
        let (nj, nk) = (self.normals[j], self.normals[k]);
        let p = self.src[j];
        let delta = self.run.delta;
        let dx = (self.sin_a.atan2(nk.x * nj.x + nk.y * nj.y) / 4.0).tan();
        self.dest.push(IntPoint::new(
            round(p.x as f64 + delta * (nk.x - nk.y * dx)),
            round(p.y as f64 + delta * (nk.y + nk.x * dx)),
        ));
        self.dest.push(IntPoint::new(
            round(p.x as f64 + delta * (nj.x + nj.y * dx)),
            round(p.y as f64 + delta * (nj.y - nj.x * dx)),
        ));
    }

    fn do_miter(&mut self, j: usize, k: usize, r: f64) {
        let (nj, nk) = (self.normals[j], self.normals[k]);
        let p = self.src[j];
        let q = self.run.delta / r;
        self.dest.push(IntPoint::new(
            round(p.x as f64 + (nk.x + nj.x) * q),
            round(p.y as f64 + (nk.y + nj.y) * q),
        ));
    }

    fn do_round(&mut self, j: usize, k: usize) {
        let (nj, nk) = (self.normals[j], self.normals[k]);
        let p = self.src[j];
        let delta = self.run.delta;
        let a = self.sin_a.atan2(nk.x * nj.x + nk.y * nj.y);
        let steps = round(self.run.steps_per_rad * a.abs()).max(1);
        let (mut x, mut y) = (nk.x, nk.y);
        for _ in 0..steps {
            self.dest.push(IntPoint::new(round(p.x as f64 + x * delta), round(p.y as f64 + y * delta)));
            let x2 = x;
            x = x * self.run.cos - self.run.sin * y;
            y = x2 * self.run.sin + y * self.run.cos;
        }
        self.push_along(j, nj, 1.0);
    }

    /// Mirrors the normals so the walk can run backwards.
    fn reverse_normals(&mut self) {
        let len = self.normals.len();
        for j in (1..len).rev() {
            let n = self.normals[j - 1];
            self.normals[j] = DoublePoint::new(-n.x, -n.y);
        }
    }

    fn offset_open(&mut self, join: JoinType, end: EndType) {
        let len = self.src.len();
        let mut k = 0;
        for j in 1..len - 1 {
            self.offset_point(j, &mut k, join);
        }

        // far end cap
        let j = len - 1;
        if end == EndType::OpenButt {
            let n = self.normals[j];
            self.push_along(j, n, 1.0);
            self.push_along(j, n, -1.0);
        } else {
            self.sin_a = 0.0;
            let n = self.normals[j];
            self.normals[j] = DoublePoint::new(-n.x, -n.y);
            if end == EndType::OpenSquare {
                self.do_square(j, len - 2);
            } else {
                self.do_round(j, len - 2);
            }
        }

        self.reverse_normals();
        let n1 = self.normals[1];
        self.normals[0] = DoublePoint::new(-n1.x, -n1.y);
        let mut k = len - 1;
        for j in (1..k).rev() {
            self.offset_point(j, &mut k, join);
        }

        // near end cap
        if end == EndType::OpenButt {
            let n = self.normals[0];
            self.push_along(0, n, -1.0);
            self.push_along(0, n, 1.0);
        } else {
            self.sin_a = 0.0;
            if end == EndType::OpenSquare {
                self.do_square(0, 1);
            } else {
                self.do_round(0, 1);
            }
        }
    }
}

/// Offsets a set of paths that may mix join and end types.
#[derive(Clone, Debug)]
pub struct ClipperOffset {
    pub miter_limit: f64,
    pub arc_tolerance: f64,
    paths: Vec<OffsetPath>,
    /// (path, vertex) of the lowest vertex over all closed polygons.
    lowest: Option<(usize, usize)>,
}

impl Default for ClipperOffset {
    fn default() -> Self {
        Self::new(DEFAULT_MITER_LIMIT, DEFAULT_ARC_TOLERANCE)
    }
}

impl ClipperOffset {
    pub fn new(miter_limit: f64, arc_tolerance: f64) -> Self {
        Self { miter_limit, arc_tolerance, paths: Vec::new(), lowest: None }
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.lowest = None;
    }

    /// Queues a path. Returns false if nothing was kept (an empty path, or a
    /// closed polygon with fewer than three distinct vertices).
    pub fn add_path(&mut self, path: &[IntPoint], join: JoinType, end: EndType) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut high = path.len() - 1;
        if matches!(end, EndType::ClosedPolygon | EndType::OpenJoined) {
            while high > 0 && path[0] == path[high] {
                high -= 1;
            }
        }

        let mut contour = Vec::with_capacity(high + 1);
        contour.push(path[0]);
        let mut k = 0;
        for &p in &path[1..=high] {
            let last = contour[contour.len() - 1];
            if last == p {
                continue;
            }
            contour.push(p);
            let lo = contour[k];
            if p.y > lo.y || (p.y == lo.y && p.x < lo.x) {
                k = contour.len() - 1;
            }
        }
        if end == EndType::ClosedPolygon && contour.len() < 3 {
            return false;
        }

        let lowest_pt = contour[k];
        self.paths.push(OffsetPath { contour, join, end });
        if end != EndType::ClosedPolygon {
            return true;
        }
        let idx = self.paths.len() - 1;
        match self.lowest {
            None => self.lowest = Some((idx, k)),
            Some((pi, vi)) => {
                let ip = self.paths[pi].contour[vi];
                if lowest_pt.y > ip.y || (lowest_pt.y == ip.y && lowest_pt.x < ip.x) {
                    self.lowest = Some((idx, k));
                }
            }
        }
        true
    }

    pub fn add_paths(&mut self, paths: &[Path], join: JoinType, end: EndType) {
        for p in paths {
            self.add_path(p, join, end);
        }
    }

    /// Offsets every queued path by `delta` and returns the cleaned union.
    pub fn execute(&mut self, delta: f64) -> Result<Paths> {
        self.fix_orientations();
        let raw = self.do_offset(delta);
        let mut clipper = Clipper::new();
        clipper.add_paths(&raw, PolyType::Subject, true)?;
        let solution = if delta > 0.0 {
            clipper.execute(ClipType::Union, PolyFillType::Positive, PolyFillType::Positive)?
        } else {
            add_frame(&mut clipper)?;
            let mut s =
                clipper.execute(ClipType::Union, PolyFillType::Negative, PolyFillType::Negative)?;
            if !s.is_empty() {
                s.remove(0);
            }
            s
        };
        debug!(
            "offset {} paths by {} -> {} raw rings, {} contours",
            self.paths.len(),
            delta,
            raw.len(),
            solution.len()
        );
        Ok(solution)
    }

    /// As `execute`, nesting the result by containment.
    pub fn execute_tree(&mut self, delta: f64) -> Result<PolyTree> {
        self.fix_orientations();
        let raw = self.do_offset(delta);
        let mut clipper = Clipper::new();
        clipper.add_paths(&raw, PolyType::Subject, true)?;
        if delta > 0.0 {
            return clipper.execute_tree(ClipType::Union, PolyFillType::Positive, PolyFillType::Positive);
        }
        add_frame(&mut clipper)?;
        let mut tree =
            clipper.execute_tree(ClipType::Union, PolyFillType::Negative, PolyFillType::Negative)?;
        tree.strip_outer();
        Ok(tree)
    }

    /// Closed polygons all get reversed when the one holding the lowest
    /// vertex is negative; closed lines are always made positive.
    fn fix_orientations(&mut self) {
        let flip_closed = match self.lowest {
            Some((pi, _)) => !orientation(&self.paths[pi].contour),
            None => false,
        };
        for p in &mut self.paths {
            let reverse = match p.end {
                EndType::ClosedPolygon => flip_closed,
                EndType::OpenJoined => orientation(&p.contour) == flip_closed,
                _ => false,
            };
            if reverse {
                p.contour.reverse();
            }
        }
    }

    fn do_offset(&self, delta: f64) -> Paths {
        if delta.abs() < 1.0e-20 {
            return self
                .paths
                .iter()
                .filter(|p| p.end == EndType::ClosedPolygon)
                .map(|p| p.contour.clone())
                .collect();
        }

        let miter_lim = if self.miter_limit > 2.0 {
            2.0 / (self.miter_limit * self.miter_limit)
        } else {
            0.5
        };
        let abs_delta = delta.abs();
        let y = if self.arc_tolerance <= 0.0 {
            DEFAULT_ARC_TOLERANCE
        } else if self.arc_tolerance > abs_delta * DEFAULT_ARC_TOLERANCE {
            abs_delta * DEFAULT_ARC_TOLERANCE
        } else {
            self.arc_tolerance
        };
        let mut steps = PI / (1.0 - y / abs_delta).acos();
        if steps > abs_delta * PI {
            steps = abs_delta * PI;
        }
        let mut sin = (TWO_PI / steps).sin();
        let cos = (TWO_PI / steps).cos();
        if delta < 0.0 {
            sin = -sin;
        }
        let run = Run { delta, sin, cos, miter_lim, steps_per_rad: steps / TWO_PI };

        let mut dest_polys = Vec::with_capacity(self.paths.len() * 2);
        for node in &self.paths {
            let src = &node.contour[..];
            let len = src.len();
            if len == 0 || (delta <= 0.0 && (len < 3 || node.end != EndType::ClosedPolygon)) {
                continue;
            }

            if len == 1 {
                dest_polys.push(offset_point_path(src[0], &run, steps, node.join));
                continue;
            }

            let mut normals = Vec::with_capacity(len);
            for j in 0..len - 1 {
                normals.push(unit_normal(src[j], src[j + 1]));
            }
            if matches!(node.end, EndType::OpenJoined | EndType::ClosedPolygon) {
                normals.push(unit_normal(src[len - 1], src[0]));
            } else {
                normals.push(normals[len - 2]);
            }

            let mut po = PathOffsetter { run: &run, src, normals, dest: Vec::new(), sin_a: 0.0 };
            match node.end {
                EndType::ClosedPolygon => {
                    let mut k = len - 1;
                    for j in 0..len {
                        po.offset_point(j, &mut k, node.join);
                    }
                    dest_polys.push(po.dest);
                }
                EndType::OpenJoined => {
                    let mut k = len - 1;
                    for j in 0..len {
                        po.offset_point(j, &mut k, node.join);
                    }
                    dest_polys.push(std::mem::take(&mut po.dest));

                    // the other side, walking backwards
                    let n = po.normals[len - 1];
                    po.reverse_normals();
                    po.normals[0] = DoublePoint::new(-n.x, -n.y);
                    let mut k = 0;
                    for j in (0..len).rev() {
                        po.offset_point(j, &mut k, node.join);
                    }
                    dest_polys.push(po.dest);
                }
                _ => {
                    po.offset_open(node.join, node.end);
                    dest_polys.push(po.dest);
                }
            }
        }
        dest_polys
    }
}

/// A lone vertex becomes a circle (Round) or an axis-aligned square.
fn offset_point_path(pt: IntPoint, run: &Run, steps: f64, join: JoinType) -> Path {
    let delta = run.delta;
    let mut dest = Vec::new();
    if join == JoinType::Round {
        let (mut x, mut y) = (1.0f64, 0.0f64);
        for _ in 0..steps.floor() as usize {
            dest.push(IntPoint::new(round(pt.x as f64 + x * delta), round(pt.y as f64 + y * delta)));
            let x2 = x;
            x = x * run.cos - run.sin * y;
            y = x2 * run.sin + y * run.cos;
        }
    } else {
        let (mut x, mut y) = (-1.0f64, -1.0f64);
        for _ in 0..4 {
            dest.push(IntPoint::new(round(pt.x as f64 + x * delta), round(pt.y as f64 + y * delta)));
            if x < 0.0 {
                x = 1.0;
            } else if y < 0.0 {
                y = 1.0;
            } else {
                x = -1.0;
            }
        }
    }
    dest
}

/// Adds a clockwise rectangle 10 units outside the loaded paths and asks for
/// reversed output, so a Negative union yields the frame first and the
/// shrunk shapes after it.
fn add_frame(clipper: &mut Clipper) -> Result<()> {
    let r = clipper.bounds();
    let outer = [
        IntPoint::new(r.left - 10, r.bottom + 10),
        IntPoint::new(r.right + 10, r.bottom + 10),
        IntPoint::new(r.right + 10, r.top - 10),
        IntPoint::new(r.left - 10, r.top - 10),
    ];
    clipper.add_path(&outer, PolyType::Subject, true)?;
    clipper.set_option(ClipOption::ReverseSolution, true);
    Ok(())
}

/// Offsets `paths` that all share one join and end type.
pub fn offset_paths(
    paths: &[Path],
    delta: f64,
    join: JoinType,
    end: EndType,
    miter_limit: f64,
    arc_tolerance: f64,
) -> Result<Paths> {
    let mut co = ClipperOffset::new(miter_limit, arc_tolerance);
    co.add_paths(paths, join, end);
    co.execute(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{area, path_from};
    use approx::assert_relative_eq;

    fn square10() -> Path {
        path_from(&[(0, 0), (10, 0), (10, 10), (0, 10)])
    }

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(|p| area(p)).sum()
    }

    #[test]
    fn miter_square_grows_exactly() {
        let out = offset_paths(&[square10()], 2.0, JoinType::Miter, EndType::ClosedPolygon, 2.0, 0.25)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(&out[0]), 196.0);
    }

    #[test]
    fn square_join_cuts_corners() {
        let out = offset_paths(&[square10()], 2.0, JoinType::Square, EndType::ClosedPolygon, 2.0, 0.25)
            .unwrap();
        assert_eq!(out.len(), 1);
        let a = area(&out[0]);
        assert!(a > 190.0 && a < 196.0, "area {}", a);
    }

    #[test]
    fn round_join_is_between_square_and_miter() {
        let out = offset_paths(&[square10()], 2.0, JoinType::Round, EndType::ClosedPolygon, 2.0, 0.25)
            .unwrap();
        let a = total_area(&out);
        // 100 + 4*20 + pi*4
        assert!((a - 192.57).abs() < 2.0, "area {}", a);
    }

    #[test]
    fn shrinking_square() {
        let out = offset_paths(&[square10()], -2.0, JoinType::Miter, EndType::ClosedPolygon, 2.0, 0.25)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(&out[0]), 36.0);
    }

    #[test]
    fn shrinking_past_collapse_is_empty() {
        let out = offset_paths(&[square10()], -6.0, JoinType::Miter, EndType::ClosedPolygon, 2.0, 0.25)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_delta_copies_closed_polygons() {
        let mut co = ClipperOffset::default();
        co.add_path(&square10(), JoinType::Round, EndType::ClosedPolygon);
        co.add_path(&path_from(&[(0, 0), (5, 0)]), JoinType::Round, EndType::OpenButt);
        let out = co.execute(0.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(&out[0]), 100.0);
    }

    #[test]
    fn degenerate_closed_polygon_is_rejected() {
        let mut co = ClipperOffset::default();
        assert!(!co.add_path(&path_from(&[(0, 0), (5, 0), (0, 0)]), JoinType::Miter, EndType::ClosedPolygon));
        assert!(!co.add_path(&[], JoinType::Miter, EndType::OpenButt));
        assert!(co.add_path(&path_from(&[(0, 0), (5, 0)]), JoinType::Miter, EndType::OpenButt));
    }

    #[test]
    fn reversed_input_still_grows() {
        let mut sq = square10();
        sq.reverse();
        let out = offset_paths(&[sq], 2.0, JoinType::Miter, EndType::ClosedPolygon, 2.0, 0.25).unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(&out[0]).abs(), 196.0);
    }

    #[test]
    fn butt_line_becomes_rectangle() {
        let line = path_from(&[(0, 0), (10, 0)]);
        let out = offset_paths(&[line], 1.0, JoinType::Square, EndType::OpenButt, 2.0, 0.25).unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(&out[0]), 20.0);
    }

    #[test]
    fn square_cap_line_extends_both_ends() {
        let line = path_from(&[(0, 0), (10, 0)]);
        let out = offset_paths(&[line], 1.0, JoinType::Square, EndType::OpenSquare, 2.0, 0.25).unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(&out[0]), 24.0);
    }

    #[test]
    fn single_point_square() {
        let out = offset_paths(&[path_from(&[(5, 5)])], 2.0, JoinType::Square, EndType::OpenSquare, 2.0, 0.25)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(&out[0]), 16.0);
    }

    #[test]
    fn closed_line_makes_a_frame() {
        let mut co = ClipperOffset::default();
        co.add_path(&path_from(&[(0, 0), (20, 0), (20, 20), (0, 20)]), JoinType::Miter, EndType::OpenJoined);
        let tree = co.execute_tree(1.0).unwrap();
        // outer 22x22 with an 18x18 hole
        assert_eq!(tree.total(), 2);
        let outer = tree.roots()[0];
        assert_relative_eq!(area(tree.node(outer).contour()), 484.0);
        let hole = tree.node(outer).children()[0];
        assert!(tree.is_hole(hole));
        assert_relative_eq!(area(tree.node(hole).contour()), -324.0);
    }

    #[test]
    fn negative_tree_drops_the_frame() {
        let mut co = ClipperOffset::default();
        co.add_path(&square10(), JoinType::Miter, EndType::ClosedPolygon);
        let tree = co.execute_tree(-1.0).unwrap();
        assert_eq!(tree.total(), 1);
        let n = tree.roots()[0];
        assert!(!tree.is_hole(n));
        assert_relative_eq!(area(tree.node(n).contour()).abs(), 64.0);
    }
}

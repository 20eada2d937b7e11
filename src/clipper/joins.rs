// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (JoinCommonEdges, DoSimplePolygons)
//
// Post-sweep repair of the output rings.
//
// During the sweep, places where two output edges overlap (collinear edges
// meeting at a vertex, overlapping horizontals) are recorded as joins. Here
// each join either merges two rings into one or splits one ring into two,
// and in strictly simple mode rings are also split wherever they touch
// themselves.

use super::{Clipper, Join, OutPt, OutPtIdx};
use crate::arena::INVALID;
use crate::geom::{edge_crossing, slopes_equal3, IntPoint};
use log::trace;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Overlap of the x ranges a1-a2 and b1-b2, if it has positive length.
fn get_overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> Option<(i64, i64)> {
    let (left, right) = if a1 < a2 {
        if b1 < b2 {
            (a1.max(b1), a2.min(b2))
        } else {
            (a1.max(b2), a2.min(b1))
        }
    } else if b1 < b2 {
        (a2.max(b1), a1.min(b2))
    } else {
        (a2.max(b2), a1.min(b1))
    };
    if left < right {
        Some((left, right))
    } else {
        None
    }
}

impl Clipper {
    pub(super) fn add_join(&mut self, out_pt1: OutPtIdx, out_pt2: OutPtIdx, off_pt: IntPoint) {
        self.joins.push(Join { out_pt1, out_pt2, off_pt });
    }

    pub(super) fn add_ghost_join(&mut self, out_pt: OutPtIdx, off_pt: IntPoint) {
        self.ghost_joins.push(Join { out_pt1: out_pt, out_pt2: INVALID, off_pt });
    }

    // ─────── Ring queries ─────────────────────────────────────────────────────

    /// Point-in-polygon against an output ring: 0 outside, 1 inside,
    /// -1 on the boundary.
    fn point_in_ring(&self, pt: IntPoint, start: OutPtIdx) -> i32 {
        let mut result = 0;
        let mut op = start;
        loop {
            let next = self.op(op).next;
            match edge_crossing(pt, self.op(op).pt, self.op(next).pt) {
                None => return -1,
                Some(true) => result = 1 - result,
                Some(false) => {}
            }
            op = next;
            if op == start {
                break;
            }
        }
        result
    }

    /// True if ring `pts1` lies inside ring `pts2`, judged by the first
    /// vertex of `pts1` that is not on `pts2`.
    fn poly2_contains_poly1(&self, pts1: OutPtIdx, pts2: OutPtIdx) -> bool {
        let mut op = pts1;
        loop {
            let res = self.point_in_ring(self.op(op).pt, pts2);
            if res >= 0 {
                return res > 0;
            }
            op = self.op(op).next;
            if op == pts1 {
                break;
            }
        }
        true
    }

    fn update_out_pt_idxs(&mut self, rec: usize) {
        let start = self.out_recs[rec].pts;
        let idx = self.out_recs[rec].idx;
        let mut op = start;
        loop {
            self.op_mut(op).idx = idx;
            op = self.op(op).prev;
            if op == start {
                break;
            }
        }
    }

    fn dup_out_pt(&mut self, op: OutPtIdx, insert_after: bool) -> OutPtIdx {
        let src = self.op(op).clone();
        if insert_after {
            let r = self.out_pts.alloc(OutPt { idx: src.idx, pt: src.pt, next: src.next, prev: op });
            self.op_mut(src.next).prev = r;
            self.op_mut(op).next = r;
            r
        } else {
            let r = self.out_pts.alloc(OutPt { idx: src.idx, pt: src.pt, next: op, prev: src.prev });
            self.op_mut(src.prev).next = r;
            self.op_mut(op).prev = r;
            r
        }
    }

    /// Skips the first-left chain past records that no longer own a ring.
    fn parse_first_left(&self, mut fl: Option<usize>) -> Option<usize> {
        while let Some(i) = fl {
            if self.out_recs[i].pts != INVALID {
                break;
            }
            fl = self.out_recs[i].first_left;
        }
        fl
    }

    // ─────── First-left maintenance after splits ──────────────────────────────

    /// Moves rings inside `new_rec` over from `old_rec`.
    fn fixup_first_lefts1(&mut self, old_rec: usize, new_rec: usize) {
        for i in 0..self.out_recs.len() {
            let fl = self.parse_first_left(self.out_recs[i].first_left);
            let pts = self.out_recs[i].pts;
            if pts != INVALID
                && fl == Some(old_rec)
                && self.poly2_contains_poly1(pts, self.out_recs[new_rec].pts)
            {
                self.out_recs[i].first_left = Some(new_rec);
            }
        }
    }

    /// One ring has split so that `inner` now lies inside `outer`.
    fn fixup_first_lefts2(&mut self, inner: usize, outer: usize) {
        let orfl = self.out_recs[outer].first_left;
        for i in 0..self.out_recs.len() {
            let pts = self.out_recs[i].pts;
            if pts == INVALID || i == outer || i == inner {
                continue;
            }
            let fl = self.parse_first_left(self.out_recs[i].first_left);
            if fl != orfl && fl != Some(inner) && fl != Some(outer) {
                continue;
            }
            if self.poly2_contains_poly1(pts, self.out_recs[inner].pts) {
                self.out_recs[i].first_left = Some(inner);
            } else if self.poly2_contains_poly1(pts, self.out_recs[outer].pts) {
                self.out_recs[i].first_left = Some(outer);
            } else if self.out_recs[i].first_left == Some(inner)
                || self.out_recs[i].first_left == Some(outer)
            {
                self.out_recs[i].first_left = orfl;
            }
        }
    }

    /// Reassigns `old_rec`'s dependents to `new_rec` without testing.
    fn fixup_first_lefts3(&mut self, old_rec: usize, new_rec: usize) {
        for i in 0..self.out_recs.len() {
            let fl = self.parse_first_left(self.out_recs[i].first_left);
            if self.out_recs[i].pts != INVALID && fl == Some(old_rec) {
                self.out_recs[i].first_left = Some(new_rec);
            }
        }
    }

    // ─────── Joining ──────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn join_horz(
        &mut self,
        mut op1: OutPtIdx,
        mut op1b: OutPtIdx,
        mut op2: OutPtIdx,
        mut op2b: OutPtIdx,
        pt: IntPoint,
        discard_left: bool,
    ) -> bool {
        let dir_of = |c: &Self, a: OutPtIdx, b: OutPtIdx| {
            if c.op(a).pt.x > c.op(b).pt.x {
                Direction::RightToLeft
            } else {
                Direction::LeftToRight
            }
        };
        let dir1 = dir_of(self, op1, op1b);
        let dir2 = dir_of(self, op2, op2b);
        if dir1 == dir2 {
            return false;
        }

        // Walk each run to `pt`, then make sure there is a vertex at `pt`
        // followed by a duplicate on the side being kept.
        let align = |c: &mut Self, op: &mut OutPtIdx, opb: &mut OutPtIdx, dir: Direction| {
            if dir == Direction::LeftToRight {
                loop {
                    let n = c.op(c.op(*op).next).pt;
                    if n.x <= pt.x && n.x >= c.op(*op).pt.x && n.y == pt.y {
                        *op = c.op(*op).next;
                    } else {
                        break;
                    }
                }
                if discard_left && c.op(*op).pt.x != pt.x {
                    *op = c.op(*op).next;
                }
                *opb = c.dup_out_pt(*op, !discard_left);
                if c.op(*opb).pt != pt {
                    *op = *opb;
                    c.op_mut(*op).pt = pt;
                    *opb = c.dup_out_pt(*op, !discard_left);
                }
            } else {
                loop {
                    let n = c.op(c.op(*op).next).pt;
                    if n.x >= pt.x && n.x <= c.op(*op).pt.x && n.y == pt.y {
                        *op = c.op(*op).next;
                    } else {
                        break;
                    }
                }
                if !discard_left && c.op(*op).pt.x != pt.x {
                    *op = c.op(*op).next;
                }
                *opb = c.dup_out_pt(*op, discard_left);
                if c.op(*opb).pt != pt {
                    *op = *opb;
                    c.op_mut(*op).pt = pt;
                    *opb = c.dup_out_pt(*op, discard_left);
                }
            }
        };
        align(self, &mut op1, &mut op1b, dir1);
        align(self, &mut op2, &mut op2b, dir2);

        if (dir1 == Direction::LeftToRight) == discard_left {
            self.op_mut(op1).prev = op2;
            self.op_mut(op2).next = op1;
            self.op_mut(op1b).next = op2b;
            self.op_mut(op2b).prev = op1b;
        } else {
            self.op_mut(op1).next = op2;
            self.op_mut(op2).prev = op1;
            self.op_mut(op1b).prev = op2b;
            self.op_mut(op2b).next = op1b;
        }
        true
    }

    /// Cross-links op1 and op2 so the shared section is cut out. Afterwards
    /// `j.out_pt1` and `j.out_pt2` sit on the two resulting rings (or on the
    /// same ring when two rings became one).
    fn splice(&mut self, j: &mut Join, op1: OutPtIdx, op2: OutPtIdx, reverse1: bool) {
        if reverse1 {
            let op1b = self.dup_out_pt(op1, false);
            let op2b = self.dup_out_pt(op2, true);
            self.op_mut(op1).prev = op2;
            self.op_mut(op2).next = op1;
            self.op_mut(op1b).next = op2b;
            self.op_mut(op2b).prev = op1b;
            j.out_pt1 = op1;
            j.out_pt2 = op1b;
        } else {
            let op1b = self.dup_out_pt(op1, true);
            let op2b = self.dup_out_pt(op2, false);
            self.op_mut(op1).next = op2;
            self.op_mut(op2).prev = op1;
            self.op_mut(op1b).prev = op2b;
            self.op_mut(op2b).next = op1b;
            j.out_pt1 = op1;
            j.out_pt2 = op1b;
        }
    }

    fn join_points(&mut self, j: &mut Join, rec1: usize, rec2: usize) -> bool {
        let mut op1 = j.out_pt1;
        let mut op2 = j.out_pt2;
        let off = j.off_pt;
        let is_horizontal = self.op(op1).pt.y == off.y;
        let full = self.use_full_range();

        if is_horizontal && off == self.op(op1).pt && off == self.op(op2).pt {
            // touching vertices from strictly simple processing
            if rec1 != rec2 {
                return false;
            }
            let mut op1b = self.op(op1).next;
            while op1b != op1 && self.op(op1b).pt == off {
                op1b = self.op(op1b).next;
            }
            let reverse1 = self.op(op1b).pt.y > off.y;
            let mut op2b = self.op(op2).next;
            while op2b != op2 && self.op(op2b).pt == off {
                op2b = self.op(op2b).next;
            }
            let reverse2 = self.op(op2b).pt.y > off.y;
            if reverse1 == reverse2 {
                return false;
            }
            self.splice(j, op1, op2, reverse1);
            true
        } else if is_horizontal {
            // widen each side to its whole horizontal run
            let mut op1b = op1;
            loop {
                let p = self.op(op1).prev;
                if self.op(p).pt.y == self.op(op1).pt.y && p != op1b && p != op2 {
                    op1 = p;
                } else {
                    break;
                }
            }
            loop {
                let n = self.op(op1b).next;
                if self.op(n).pt.y == self.op(op1b).pt.y && n != op1 && n != op2 {
                    op1b = n;
                } else {
                    break;
                }
            }
            let n = self.op(op1b).next;
            if n == op1 || n == op2 {
                return false; // flat ring
            }
            let mut op2b = op2;
            loop {
                let p = self.op(op2).prev;
                if self.op(p).pt.y == self.op(op2).pt.y && p != op2b && p != op1b {
                    op2 = p;
                } else {
                    break;
                }
            }
            loop {
                let n = self.op(op2b).next;
                if self.op(n).pt.y == self.op(op2b).pt.y && n != op2 && n != op1 {
                    op2b = n;
                } else {
                    break;
                }
            }
            let n = self.op(op2b).next;
            if n == op2 || n == op1 {
                return false;
            }

            let (p1, p1b, p2, p2b) =
                (self.op(op1).pt, self.op(op1b).pt, self.op(op2).pt, self.op(op2b).pt);
            let (left, right) = match get_overlap(p1.x, p1b.x, p2.x, p2b.x) {
                Some(lr) => lr,
                None => return false,
            };

            // pick a vertex inside the overlap to join at
            let (pt, discard_left) = if p1.x >= left && p1.x <= right {
                (p1, p1.x > p1b.x)
            } else if p2.x >= left && p2.x <= right {
                (p2, p2.x > p2b.x)
            } else if p1b.x >= left && p1b.x <= right {
                (p1b, p1b.x > p1.x)
            } else {
                (p2b, p2b.x > p2.x)
            };
            j.out_pt1 = op1;
            j.out_pt2 = op2;
            self.join_horz(op1, op1b, op2, op2b, pt, discard_left)
        } else {
            // collinear non-horizontal edges; find the neighbours along the join
            let mut op1b = self.op(op1).next;
            while self.op(op1b).pt == self.op(op1).pt && op1b != op1 {
                op1b = self.op(op1b).next;
            }
            let bad = |c: &Self, a: OutPtIdx, b: OutPtIdx| {
                c.op(b).pt.y > c.op(a).pt.y || !slopes_equal3(c.op(a).pt, c.op(b).pt, off, full)
            };
            let reverse1 = bad(self, op1, op1b);
            if reverse1 {
                op1b = self.op(op1).prev;
                while self.op(op1b).pt == self.op(op1).pt && op1b != op1 {
                    op1b = self.op(op1b).prev;
                }
                if bad(self, op1, op1b) {
                    return false;
                }
            }
            let mut op2b = self.op(op2).next;
            while self.op(op2b).pt == self.op(op2).pt && op2b != op2 {
                op2b = self.op(op2b).next;
            }
            let reverse2 = bad(self, op2, op2b);
            if reverse2 {
                op2b = self.op(op2).prev;
                while self.op(op2b).pt == self.op(op2).pt && op2b != op2 {
                    op2b = self.op(op2b).prev;
                }
                if bad(self, op2, op2b) {
                    return false;
                }
            }

            if op1b == op1 || op2b == op2 || op1b == op2b || (rec1 == rec2 && reverse1 == reverse2) {
                return false;
            }
            self.splice(j, op1, op2, reverse1);
            true
        }
    }

    /// Records a ring that a split just separated from `rec1`, fixing hole
    /// state and nesting for both.
    fn classify_split(&mut self, rec1: usize, rec2: usize, fix_orientation: bool) {
        let (pts1, pts2) = (self.out_recs[rec1].pts, self.out_recs[rec2].pts);
        if self.poly2_contains_poly1(pts2, pts1) {
            // rec2 inside rec1
            self.out_recs[rec2].is_hole = !self.out_recs[rec1].is_hole;
            self.out_recs[rec2].first_left = Some(rec1);
            if self.using_poly_tree {
                self.fixup_first_lefts2(rec2, rec1);
            }
            if fix_orientation {
                self.orient_ring(rec2);
            }
        } else if self.poly2_contains_poly1(pts1, pts2) {
            // rec1 inside rec2
            self.out_recs[rec2].is_hole = self.out_recs[rec1].is_hole;
            self.out_recs[rec1].is_hole = !self.out_recs[rec2].is_hole;
            self.out_recs[rec2].first_left = self.out_recs[rec1].first_left;
            self.out_recs[rec1].first_left = Some(rec2);
            if self.using_poly_tree {
                self.fixup_first_lefts2(rec1, rec2);
            }
            if fix_orientation {
                self.orient_ring(rec1);
            }
        } else {
            self.out_recs[rec2].is_hole = self.out_recs[rec1].is_hole;
            self.out_recs[rec2].first_left = self.out_recs[rec1].first_left;
            if self.using_poly_tree {
                self.fixup_first_lefts1(rec1, rec2);
            }
        }
    }

    fn orient_ring(&mut self, rec: usize) {
        let pts = self.out_recs[rec].pts;
        if (self.out_recs[rec].is_hole ^ self.reverse_output) == (self.ring_area(pts) < 0.0) {
            self.reverse_poly_pt_links(pts);
        }
    }

    pub(super) fn join_common_edges(&mut self) {
        let mut joins = std::mem::take(&mut self.joins);
        let mut merged = 0usize;
        let mut split = 0usize;
        for join in joins.iter_mut() {
            let rec1 = self.out_rec(self.op(join.out_pt1).idx);
            let rec2 = self.out_rec(self.op(join.out_pt2).idx);
            if self.out_recs[rec1].pts == INVALID || self.out_recs[rec2].pts == INVALID {
                continue;
            }
            if self.out_recs[rec1].is_open || self.out_recs[rec2].is_open {
                continue;
            }

            // the fragment whose hole state survives a merge
            let hole_state_rec = if rec1 == rec2 {
                rec1
            } else if self.out_rec1_right_of_out_rec2(rec1, rec2) {
                rec2
            } else if self.out_rec1_right_of_out_rec2(rec2, rec1) {
                rec1
            } else {
                self.get_lowermost_rec(rec1, rec2)
            };

            if !self.join_points(join, rec1, rec2) {
                continue;
            }

            if rec1 == rec2 {
                // one ring became two
                split += 1;
                self.out_recs[rec1].pts = join.out_pt1;
                self.out_recs[rec1].bottom_pt = INVALID;
                let rec2 = self.create_out_rec();
                self.out_recs[rec2].pts = join.out_pt2;
                self.update_out_pt_idxs(rec2);
                self.classify_split(rec1, rec2, true);
            } else {
                // two rings became one
                merged += 1;
                let r2 = &mut self.out_recs[rec2];
                r2.pts = INVALID;
                r2.bottom_pt = INVALID;
                self.out_recs[rec2].idx = self.out_recs[rec1].idx;
                self.out_recs[rec1].is_hole = self.out_recs[hole_state_rec].is_hole;
                if hole_state_rec == rec2 {
                    self.out_recs[rec1].first_left = self.out_recs[rec2].first_left;
                }
                self.out_recs[rec2].first_left = Some(rec1);
                if self.using_poly_tree {
                    self.fixup_first_lefts3(rec2, rec1);
                }
            }
        }
        trace!("{} joins: {} merged, {} split", joins.len(), merged, split);
        joins.clear();
        self.joins = joins;
    }

    // ─────── Strictly simple output ───────────────────────────────────────────

    /// Splits every ring at each vertex it visits twice.
    pub(super) fn do_simple_polygons(&mut self) {
        let mut i = 0;
        while i < self.out_recs.len() {
            let rec = i;
            i += 1;
            let mut op = self.out_recs[rec].pts;
            if op == INVALID || self.out_recs[rec].is_open {
                continue;
            }
            loop {
                let mut op2 = self.op(op).next;
                while op2 != self.out_recs[rec].pts {
                    let o2 = self.op(op2).clone();
                    if self.op(op).pt == o2.pt && o2.next != op && o2.prev != op {
                        let op3 = self.op(op).prev;
                        let op4 = o2.prev;
                        self.op_mut(op).prev = op4;
                        self.op_mut(op4).next = op;
                        self.op_mut(op2).prev = op3;
                        self.op_mut(op3).next = op2;

                        self.out_recs[rec].pts = op;
                        let rec2 = self.create_out_rec();
                        self.out_recs[rec2].pts = op2;
                        self.update_out_pt_idxs(rec2);
                        self.classify_split(rec, rec2, false);
                        op2 = op;
                    }
                    op2 = self.op(op2).next;
                }
                op = self.op(op).next;
                if op == self.out_recs[rec].pts {
                    break;
                }
            }
        }
    }
}

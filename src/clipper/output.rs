// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (OutRec, OutPt)
//
// Output rings: creation, growth at either end, merging at local maxima,
// orientation and clean-up, and conversion into the caller's result.

use super::{Clipper, OutPt, OutPtIdx, OutRec};
use crate::arena::INVALID;
use crate::edge::{EdgeIdx, EdgeSide, HORIZONTAL, UNASSIGNED};
use crate::geom::{pt2_is_between_pt1_and_pt3, slopes_equal3, slopes_equal4, IntPoint, Path, Paths};
use crate::polytree::PolyTree;

/// Inverse slope of pt1 -> pt2, or `HORIZONTAL`.
fn get_dx(pt1: IntPoint, pt2: IntPoint) -> f64 {
    if pt1.y == pt2.y {
        HORIZONTAL
    } else {
        (pt2.x - pt1.x) as f64 / (pt2.y - pt1.y) as f64
    }
}

impl Clipper {
    // ─────── Ring primitives ──────────────────────────────────────────────────

    #[inline]
    pub(super) fn op(&self, i: OutPtIdx) -> &OutPt {
        &self.out_pts[i]
    }

    #[inline]
    pub(super) fn op_mut(&mut self, i: OutPtIdx) -> &mut OutPt {
        &mut self.out_pts[i]
    }

    pub(super) fn create_out_rec(&mut self) -> usize {
        let idx = self.out_recs.len();
        self.out_recs.push(OutRec {
            idx,
            is_hole: false,
            is_open: false,
            first_left: None,
            pts: INVALID,
            bottom_pt: INVALID,
            poly_node: None,
        });
        idx
    }

    /// Follows merge forwarding to the live record.
    pub(super) fn out_rec(&self, mut idx: usize) -> usize {
        while self.out_recs[idx].idx != idx {
            idx = self.out_recs[idx].idx;
        }
        idx
    }

    pub(super) fn point_count(&self, pts: OutPtIdx) -> usize {
        if pts == INVALID {
            return 0;
        }
        let mut n = 0;
        let mut p = pts;
        loop {
            n += 1;
            p = self.op(p).next;
            if p == pts {
                break;
            }
        }
        n
    }

    pub(super) fn dispose_out_pts(&mut self, pts: OutPtIdx) {
        if pts == INVALID {
            return;
        }
        let mut p = pts;
        loop {
            let next = self.op(p).next;
            self.out_pts.free(p);
            if next == pts {
                break;
            }
            p = next;
        }
    }

    pub(super) fn reverse_poly_pt_links(&mut self, pp: OutPtIdx) {
        if pp == INVALID {
            return;
        }
        let mut p1 = pp;
        loop {
            let p2 = self.op(p1).next;
            let o = self.op_mut(p1);
            o.next = o.prev;
            o.prev = p2;
            p1 = p2;
            if p1 == pp {
                break;
            }
        }
    }

    /// Signed area of a ring; positive for counter-clockwise.
    pub(super) fn ring_area(&self, start: OutPtIdx) -> f64 {
        if start == INVALID {
            return 0.0;
        }
        let mut a = 0.0f64;
        let mut op = start;
        loop {
            let o = self.op(op);
            let prev = self.op(o.prev).pt;
            a += (prev.x as f64 + o.pt.x as f64) * (prev.y as f64 - o.pt.y as f64);
            op = o.next;
            if op == start {
                break;
            }
        }
        -a * 0.5
    }

    // ─────── Adding vertices ──────────────────────────────────────────────────

    /// Appends `pt` to the edge's ring, starting a new ring if the edge has
    /// none. The left side grows at the front, the right side at the back.
    pub(super) fn add_out_pt(&mut self, e: EdgeIdx, pt: IntPoint) -> OutPtIdx {
        let out_idx = self.e(e).out_idx;
        if out_idx < 0 {
            let rec = self.create_out_rec();
            let is_open = self.e(e).wind_delta == 0;
            self.out_recs[rec].is_open = is_open;
            let new_op = self.out_pts.alloc(OutPt { idx: rec, pt, next: INVALID, prev: INVALID });
            let o = self.op_mut(new_op);
            o.next = new_op;
            o.prev = new_op;
            self.out_recs[rec].pts = new_op;
            if !is_open {
                self.set_hole_state(e, rec);
            }
            self.e_mut(e).out_idx = rec as i32;
            return new_op;
        }

        let rec = out_idx as usize;
        let op = self.out_recs[rec].pts;
        let to_front = self.e(e).side == EdgeSide::Left;
        let back = self.op(op).prev;
        if to_front && pt == self.op(op).pt {
            return op;
        } else if !to_front && pt == self.op(back).pt {
            return back;
        }
        let new_op = self.out_pts.alloc(OutPt { idx: rec, pt, next: op, prev: back });
        self.op_mut(back).next = new_op;
        self.op_mut(op).prev = new_op;
        if to_front {
            self.out_recs[rec].pts = new_op;
        }
        new_op
    }

    pub(super) fn last_out_pt(&self, e: EdgeIdx) -> OutPtIdx {
        let rec = &self.out_recs[self.e(e).out_idx as usize];
        if self.e(e).side == EdgeSide::Left {
            rec.pts
        } else {
            self.op(rec.pts).prev
        }
    }

    pub(super) fn add_local_min_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) -> OutPtIdx {
        let (result, e, prev_e);
        if self.e(e2).is_horizontal() || self.e(e1).dx > self.e(e2).dx {
            result = self.add_out_pt(e1, pt);
            let o = self.e(e1).out_idx;
            self.e_mut(e2).out_idx = o;
            self.e_mut(e1).side = EdgeSide::Left;
            self.e_mut(e2).side = EdgeSide::Right;
            e = e1;
            prev_e = if self.e(e).prev_in_ael == e2 {
                self.e(e2).prev_in_ael
            } else {
                self.e(e).prev_in_ael
            };
        } else {
            result = self.add_out_pt(e2, pt);
            let o = self.e(e2).out_idx;
            self.e_mut(e1).out_idx = o;
            self.e_mut(e1).side = EdgeSide::Right;
            self.e_mut(e2).side = EdgeSide::Left;
            e = e2;
            prev_e = if self.e(e).prev_in_ael == e1 {
                self.e(e1).prev_in_ael
            } else {
                self.e(e).prev_in_ael
            };
        }

        if prev_e != INVALID
            && self.e(prev_e).out_idx >= 0
            && self.e(prev_e).top.y < pt.y
            && self.e(e).top.y < pt.y
        {
            let x_prev = self.e(prev_e).top_x(pt.y);
            let x_e = self.e(e).top_x(pt.y);
            if x_prev == x_e
                && self.e(e).wind_delta != 0
                && self.e(prev_e).wind_delta != 0
                && slopes_equal4(
                    IntPoint::new(x_prev, pt.y),
                    self.e(prev_e).top,
                    IntPoint::new(x_e, pt.y),
                    self.e(e).top,
                    self.use_full_range(),
                )
            {
                let out_pt = self.add_out_pt(prev_e, pt);
                let top = self.e(e).top;
                self.add_join(result, out_pt, top);
            }
        }
        result
    }

    pub(super) fn add_local_max_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) {
        self.add_out_pt(e1, pt);
        if self.e(e2).wind_delta == 0 {
            self.add_out_pt(e2, pt);
        }
        let (o1, o2) = (self.e(e1).out_idx, self.e(e2).out_idx);
        if o1 == o2 {
            self.e_mut(e1).out_idx = UNASSIGNED;
            self.e_mut(e2).out_idx = UNASSIGNED;
        } else if o1 < o2 {
            self.append_polygon(e1, e2);
        } else {
            self.append_polygon(e2, e1);
        }
    }

    // ─────── Hole state ───────────────────────────────────────────────────────

    /// A new ring is a hole when an odd number of distinct contributing
    /// rings lie to its left.
    fn set_hole_state(&mut self, e: EdgeIdx, rec: usize) {
        let mut e2 = self.e(e).prev_in_ael;
        let mut e_tmp = INVALID;
        while e2 != INVALID {
            let ed = self.e(e2);
            if ed.out_idx >= 0 && ed.wind_delta != 0 {
                if e_tmp == INVALID {
                    e_tmp = e2;
                } else if self.e(e_tmp).out_idx == ed.out_idx {
                    e_tmp = INVALID;
                }
            }
            e2 = ed.prev_in_ael;
        }
        if e_tmp == INVALID {
            self.out_recs[rec].first_left = None;
            self.out_recs[rec].is_hole = false;
        } else {
            let fl = self.e(e_tmp).out_idx as usize;
            self.out_recs[rec].first_left = Some(fl);
            self.out_recs[rec].is_hole = !self.out_recs[fl].is_hole;
        }
    }

    /// True if `rec2` is reachable from `rec1` through `first_left`.
    pub(super) fn out_rec1_right_of_out_rec2(&self, rec1: usize, rec2: usize) -> bool {
        let mut r = self.out_recs[rec1].first_left;
        while let Some(i) = r {
            if i == rec2 {
                return true;
            }
            r = self.out_recs[i].first_left;
        }
        false
    }

    pub(super) fn get_bottom_pt(&self, mut pp: OutPtIdx) -> OutPtIdx {
        let mut dups = INVALID;
        let mut p = self.op(pp).next;
        while p != pp {
            let (ppt, cur) = (self.op(pp).pt, self.op(p).pt);
            if cur.y > ppt.y {
                pp = p;
                dups = INVALID;
            } else if cur.y == ppt.y && cur.x <= ppt.x {
                if cur.x < ppt.x {
                    dups = INVALID;
                    pp = p;
                } else if self.op(p).next != pp && self.op(p).prev != pp {
                    dups = p;
                }
            }
            p = self.op(p).next;
        }
        if dups != INVALID {
            // several vertices share the bottom-left position
            while dups != p {
                if !self.first_is_bottom_pt(p, dups) {
                    pp = dups;
                }
                dups = self.op(dups).next;
                while self.op(dups).pt != self.op(pp).pt {
                    dups = self.op(dups).next;
                }
            }
        }
        pp
    }

    fn first_is_bottom_pt(&self, btm1: OutPtIdx, btm2: OutPtIdx) -> bool {
        let spread = |btm: OutPtIdx| {
            let bp = self.op(btm).pt;
            let mut p = self.op(btm).prev;
            while self.op(p).pt == bp && p != btm {
                p = self.op(p).prev;
            }
            let dxp = get_dx(bp, self.op(p).pt).abs();
            p = self.op(btm).next;
            while self.op(p).pt == bp && p != btm {
                p = self.op(p).next;
            }
            let dxn = get_dx(bp, self.op(p).pt).abs();
            (dxp, dxn)
        };
        let (dx1p, dx1n) = spread(btm1);
        let (dx2p, dx2n) = spread(btm2);
        if dx1p.max(dx1n) == dx2p.max(dx2n) && dx1p.min(dx1n) == dx2p.min(dx2n) {
            // otherwise identical, so use orientation
            self.ring_area(btm1) < 0.0
        } else {
            (dx1p >= dx2p && dx1p >= dx2n) || (dx1n >= dx2p && dx1n >= dx2n)
        }
    }

    pub(super) fn get_lowermost_rec(&mut self, rec1: usize, rec2: usize) -> usize {
        for r in [rec1, rec2] {
            if self.out_recs[r].bottom_pt == INVALID {
                let b = self.get_bottom_pt(self.out_recs[r].pts);
                self.out_recs[r].bottom_pt = b;
            }
        }
        let op1 = self.out_recs[rec1].bottom_pt;
        let op2 = self.out_recs[rec2].bottom_pt;
        let (p1, p2) = (self.op(op1).pt, self.op(op2).pt);
        if p1.y > p2.y {
            rec1
        } else if p1.y < p2.y {
            rec2
        } else if p1.x < p2.x {
            rec1
        } else if p1.x > p2.x {
            rec2
        } else if self.op(op1).next == op1 {
            rec2
        } else if self.op(op2).next == op2 {
            rec1
        } else if self.first_is_bottom_pt(op1, op2) {
            rec1
        } else {
            rec2
        }
    }

    // ─────── Merging at a local maximum ───────────────────────────────────────

    /// Splices e2's ring onto e1's and retires e2's record.
    fn append_polygon(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let rec1 = self.e(e1).out_idx as usize;
        let rec2 = self.e(e2).out_idx as usize;

        let hole_state_rec = if self.out_rec1_right_of_out_rec2(rec1, rec2) {
            rec2
        } else if self.out_rec1_right_of_out_rec2(rec2, rec1) {
            rec1
        } else {
            self.get_lowermost_rec(rec1, rec2)
        };

        let p1_lft = self.out_recs[rec1].pts;
        let p1_rt = self.op(p1_lft).prev;
        let p2_lft = self.out_recs[rec2].pts;
        let p2_rt = self.op(p2_lft).prev;

        let e1_side = self.e(e1).side;
        if e1_side == EdgeSide::Left {
            if self.e(e2).side == EdgeSide::Left {
                // z y x a b c
                self.reverse_poly_pt_links(p2_lft);
                self.op_mut(p2_lft).next = p1_lft;
                self.op_mut(p1_lft).prev = p2_lft;
                self.op_mut(p1_rt).next = p2_rt;
                self.op_mut(p2_rt).prev = p1_rt;
                self.out_recs[rec1].pts = p2_rt;
            } else {
                // x y z a b c
                self.op_mut(p2_rt).next = p1_lft;
                self.op_mut(p1_lft).prev = p2_rt;
                self.op_mut(p2_lft).prev = p1_rt;
                self.op_mut(p1_rt).next = p2_lft;
                self.out_recs[rec1].pts = p2_lft;
            }
        } else if self.e(e2).side == EdgeSide::Right {
            // a b c z y x
            self.reverse_poly_pt_links(p2_lft);
            self.op_mut(p1_rt).next = p2_rt;
            self.op_mut(p2_rt).prev = p1_rt;
            self.op_mut(p2_lft).next = p1_lft;
            self.op_mut(p1_lft).prev = p2_lft;
        } else {
            // a b c x y z
            self.op_mut(p1_rt).next = p2_lft;
            self.op_mut(p2_lft).prev = p1_rt;
            self.op_mut(p1_lft).prev = p2_rt;
            self.op_mut(p2_rt).next = p1_lft;
        }

        self.out_recs[rec1].bottom_pt = INVALID;
        if hole_state_rec == rec2 {
            if self.out_recs[rec2].first_left != Some(rec1) {
                self.out_recs[rec1].first_left = self.out_recs[rec2].first_left;
            }
            self.out_recs[rec1].is_hole = self.out_recs[rec2].is_hole;
        }
        let r2 = &mut self.out_recs[rec2];
        r2.pts = INVALID;
        r2.bottom_pt = INVALID;
        r2.first_left = Some(rec1);

        let ok_idx = self.e(e1).out_idx;
        let obsolete_idx = self.e(e2).out_idx;
        self.e_mut(e1).out_idx = UNASSIGNED;
        self.e_mut(e2).out_idx = UNASSIGNED;

        let mut e = self.active_edges;
        while e != INVALID {
            if self.e(e).out_idx == obsolete_idx {
                let ed = self.e_mut(e);
                ed.out_idx = ok_idx;
                ed.side = e1_side;
                break;
            }
            e = self.e(e).next_in_ael;
        }
        self.out_recs[rec2].idx = self.out_recs[rec1].idx;
    }

    // ─────── After the sweep ──────────────────────────────────────────────────

    /// Outer rings counter-clockwise, holes clockwise (or the reverse).
    pub(super) fn fix_orientations(&mut self) {
        for i in 0..self.out_recs.len() {
            let rec = &self.out_recs[i];
            if rec.pts == INVALID || rec.is_open {
                continue;
            }
            let want_flip = rec.is_hole ^ self.reverse_output;
            let pts = rec.pts;
            if want_flip == (self.ring_area(pts) < 0.0) {
                self.reverse_poly_pt_links(pts);
            }
        }
    }

    /// Drops consecutive duplicate vertices from an open path.
    pub(super) fn fixup_out_polyline(&mut self, rec: usize) {
        let mut pp = self.out_recs[rec].pts;
        let mut last_pp = self.op(pp).prev;
        while pp != last_pp {
            pp = self.op(pp).next;
            let prev = self.op(pp).prev;
            if self.op(pp).pt == self.op(prev).pt {
                if pp == last_pp {
                    last_pp = prev;
                }
                let next = self.op(pp).next;
                self.op_mut(prev).next = next;
                self.op_mut(next).prev = prev;
                self.out_pts.free(pp);
                pp = prev;
            }
        }
        if pp == self.op(pp).prev {
            self.dispose_out_pts(pp);
            self.out_recs[rec].pts = INVALID;
        }
    }

    /// Removes duplicate and collinear vertices; frees the ring if it
    /// collapses.
    pub(super) fn fixup_out_polygon(&mut self, rec: usize) {
        let mut last_ok = INVALID;
        self.out_recs[rec].bottom_pt = INVALID;
        let mut pp = self.out_recs[rec].pts;
        let preserve_col = self.table.preserve_collinear || self.strictly_simple;
        let full = self.use_full_range();
        loop {
            let (prev, next) = (self.op(pp).prev, self.op(pp).next);
            if prev == pp || prev == next {
                self.dispose_out_pts(pp);
                self.out_recs[rec].pts = INVALID;
                return;
            }
            let (a, b, c) = (self.op(prev).pt, self.op(pp).pt, self.op(next).pt);
            if b == c
                || b == a
                || (slopes_equal3(a, b, c, full) && (!preserve_col || !pt2_is_between_pt1_and_pt3(a, b, c)))
            {
                last_ok = INVALID;
                self.op_mut(prev).next = next;
                self.op_mut(next).prev = prev;
                self.out_pts.free(pp);
                pp = prev;
            } else if pp == last_ok {
                break;
            } else {
                if last_ok == INVALID {
                    last_ok = pp;
                }
                pp = next;
            }
        }
        self.out_recs[rec].pts = pp;
    }

    /// Reads a ring starting at `pts.prev`, walking backwards.
    fn ring_to_path(&self, pts: OutPtIdx, cnt: usize) -> Path {
        let mut path = Vec::with_capacity(cnt);
        let mut p = self.op(pts).prev;
        for _ in 0..cnt {
            path.push(self.op(p).pt);
            p = self.op(p).prev;
        }
        path
    }

    pub(super) fn build_result(&self) -> Paths {
        let mut polys = Vec::with_capacity(self.out_recs.len());
        for rec in &self.out_recs {
            if rec.pts == INVALID {
                continue;
            }
            let cnt = self.point_count(rec.pts);
            if cnt < 2 {
                continue;
            }
            polys.push(self.ring_to_path(rec.pts, cnt));
        }
        polys
    }

    /// Points a ring's `first_left` at the nearest live ring of opposite
    /// hole state.
    fn fix_hole_linkage(&mut self, rec: usize) {
        let fl = match self.out_recs[rec].first_left {
            Some(fl) => fl,
            None => return,
        };
        let is_hole = self.out_recs[rec].is_hole;
        if is_hole != self.out_recs[fl].is_hole && self.out_recs[fl].pts != INVALID {
            return;
        }
        let mut orfl = Some(fl);
        while let Some(o) = orfl {
            if self.out_recs[o].is_hole != is_hole && self.out_recs[o].pts != INVALID {
                break;
            }
            orfl = self.out_recs[o].first_left;
        }
        self.out_recs[rec].first_left = orfl;
    }

    pub(super) fn build_result_tree(&mut self) -> PolyTree {
        let mut tree = PolyTree::new();
        for i in 0..self.out_recs.len() {
            let (pts, is_open) = (self.out_recs[i].pts, self.out_recs[i].is_open);
            let cnt = self.point_count(pts);
            if (is_open && cnt < 2) || (!is_open && cnt < 3) {
                continue;
            }
            self.fix_hole_linkage(i);
            let node = tree.add_node(self.ring_to_path(pts, cnt), is_open);
            self.out_recs[i].poly_node = Some(node);
        }

        for i in 0..self.out_recs.len() {
            let rec = &self.out_recs[i];
            let node = match rec.poly_node {
                Some(n) => n,
                None => continue,
            };
            let parent = if rec.is_open {
                None
            } else {
                rec.first_left.and_then(|fl| self.out_recs[fl].poly_node)
            };
            tree.add_child(parent, node);
        }
        tree
    }
}

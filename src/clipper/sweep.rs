// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (ExecuteInternal, ProcessHorizontals)
//
// Active edge list maintenance and the per-scanline event handling.

use super::{ClipType, Clipper, PolyFillType};
use crate::arena::INVALID;
use crate::edge::{EdgeIdx, PolyType, SKIP, UNASSIGNED};
use crate::error::{ClipError, Result};
use crate::geom::{slopes_equal4, IntPoint};

#[derive(Copy, Clone, PartialEq, Eq)]
enum Direction {
    LeftToRight,
    RightToLeft,
}

pub(super) fn horz_segments_overlap(mut a1: i64, mut a2: i64, mut b1: i64, mut b2: i64) -> bool {
    if a1 > a2 {
        std::mem::swap(&mut a1, &mut a2);
    }
    if b1 > b2 {
        std::mem::swap(&mut b1, &mut b2);
    }
    a1 < b2 && b1 < a2
}

impl Clipper {
    // ─────── Fill rule queries ────────────────────────────────────────────────

    fn fill_types(&self, e: EdgeIdx) -> (PolyFillType, PolyFillType) {
        if self.e(e).poly_typ == PolyType::Subject {
            (self.subj_fill, self.clip_fill)
        } else {
            (self.clip_fill, self.subj_fill)
        }
    }

    #[inline]
    fn is_even_odd_fill(&self, e: EdgeIdx) -> bool {
        self.fill_types(e).0 == PolyFillType::EvenOdd
    }

    #[inline]
    fn is_even_odd_alt_fill(&self, e: EdgeIdx) -> bool {
        self.fill_types(e).1 == PolyFillType::EvenOdd
    }

    /// Slopes of two edges through their bot/top points.
    #[inline]
    pub(super) fn edge_slopes_equal(&self, e1: EdgeIdx, e2: EdgeIdx) -> bool {
        let (a, b) = (self.e(e1), self.e(e2));
        slopes_equal4(a.top, a.bot, b.top, b.bot, self.use_full_range())
    }

    // ─────── AEL / SEL ────────────────────────────────────────────────────────

    /// True if `e2` belongs before `e1` in the AEL.
    fn e2_inserts_before_e1(&self, e1: EdgeIdx, e2: EdgeIdx) -> bool {
        let (a, b) = (self.e(e1), self.e(e2));
        if b.curr.x == a.curr.x {
            if b.top.y > a.top.y {
                b.top.x < a.top_x(b.top.y)
            } else {
                a.top.x > b.top_x(a.top.y)
            }
        } else {
            b.curr.x < a.curr.x
        }
    }

    fn insert_edge_into_ael(&mut self, edge: EdgeIdx, start: EdgeIdx) {
        if self.active_edges == INVALID {
            let e = self.e_mut(edge);
            e.prev_in_ael = INVALID;
            e.next_in_ael = INVALID;
            self.active_edges = edge;
        } else if start == INVALID && self.e2_inserts_before_e1(self.active_edges, edge) {
            let head = self.active_edges;
            self.e_mut(edge).prev_in_ael = INVALID;
            self.e_mut(edge).next_in_ael = head;
            self.e_mut(head).prev_in_ael = edge;
            self.active_edges = edge;
        } else {
            let mut s = if start == INVALID { self.active_edges } else { start };
            loop {
                let n = self.e(s).next_in_ael;
                if n == INVALID || self.e2_inserts_before_e1(n, edge) {
                    break;
                }
                s = n;
            }
            let n = self.e(s).next_in_ael;
            self.e_mut(edge).next_in_ael = n;
            if n != INVALID {
                self.e_mut(n).prev_in_ael = edge;
            }
            self.e_mut(edge).prev_in_ael = s;
            self.e_mut(s).next_in_ael = edge;
        }
    }

    pub(super) fn delete_from_ael(&mut self, e: EdgeIdx) {
        let (prev, next) = (self.e(e).prev_in_ael, self.e(e).next_in_ael);
        if prev == INVALID && next == INVALID && e != self.active_edges {
            return;
        }
        if prev != INVALID {
            self.e_mut(prev).next_in_ael = next;
        } else {
            self.active_edges = next;
        }
        if next != INVALID {
            self.e_mut(next).prev_in_ael = prev;
        }
        self.e_mut(e).next_in_ael = INVALID;
        self.e_mut(e).prev_in_ael = INVALID;
    }

    fn delete_from_sel(&mut self, e: EdgeIdx) {
        let (prev, next) = (self.e(e).prev_in_sel, self.e(e).next_in_sel);
        if prev == INVALID && next == INVALID && e != self.sorted_edges {
            return;
        }
        if prev != INVALID {
            self.e_mut(prev).next_in_sel = next;
        } else {
            self.sorted_edges = next;
        }
        if next != INVALID {
            self.e_mut(next).prev_in_sel = prev;
        }
        self.e_mut(e).next_in_sel = INVALID;
        self.e_mut(e).prev_in_sel = INVALID;
    }

    /// Pushes a horizontal onto the SEL; order does not matter here.
    fn add_edge_to_sel(&mut self, e: EdgeIdx) {
        let head = self.sorted_edges;
        self.e_mut(e).prev_in_sel = INVALID;
        self.e_mut(e).next_in_sel = head;
        if head != INVALID {
            self.e_mut(head).prev_in_sel = e;
        }
        self.sorted_edges = e;
    }

    fn pop_edge_from_sel(&mut self) -> Option<EdgeIdx> {
        let e = self.sorted_edges;
        if e == INVALID {
            return None;
        }
        self.delete_from_sel(e);
        Some(e)
    }

    pub(super) fn copy_ael_to_sel(&mut self) {
        let mut e = self.active_edges;
        self.sorted_edges = e;
        while e != INVALID {
            let (p, n) = (self.e(e).prev_in_ael, self.e(e).next_in_ael);
            let edge = self.e_mut(e);
            edge.prev_in_sel = p;
            edge.next_in_sel = n;
            e = n;
        }
    }

    pub(super) fn swap_positions_in_ael(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        // either edge may already have left the AEL
        if self.e(e1).next_in_ael == self.e(e1).prev_in_ael
            || self.e(e2).next_in_ael == self.e(e2).prev_in_ael
        {
            return;
        }
        if self.e(e1).next_in_ael == e2 {
            let next = self.e(e2).next_in_ael;
            if next != INVALID {
                self.e_mut(next).prev_in_ael = e1;
            }
            let prev = self.e(e1).prev_in_ael;
            if prev != INVALID {
                self.e_mut(prev).next_in_ael = e2;
            }
            self.e_mut(e2).prev_in_ael = prev;
            self.e_mut(e2).next_in_ael = e1;
            self.e_mut(e1).prev_in_ael = e2;
            self.e_mut(e1).next_in_ael = next;
        } else if self.e(e2).next_in_ael == e1 {
            let next = self.e(e1).next_in_ael;
            if next != INVALID {
                self.e_mut(next).prev_in_ael = e2;
            }
            let prev = self.e(e2).prev_in_ael;
            if prev != INVALID {
                self.e_mut(prev).next_in_ael = e1;
            }
            self.e_mut(e1).prev_in_ael = prev;
            self.e_mut(e1).next_in_ael = e2;
            self.e_mut(e2).prev_in_ael = e1;
            self.e_mut(e2).next_in_ael = next;
        } else {
            let next = self.e(e1).next_in_ael;
            let prev = self.e(e1).prev_in_ael;
            let n2 = self.e(e2).next_in_ael;
            let p2 = self.e(e2).prev_in_ael;
            self.e_mut(e1).next_in_ael = n2;
            if n2 != INVALID {
                self.e_mut(n2).prev_in_ael = e1;
            }
            self.e_mut(e1).prev_in_ael = p2;
            if p2 != INVALID {
                self.e_mut(p2).next_in_ael = e1;
            }
            self.e_mut(e2).next_in_ael = next;
            if next != INVALID {
                self.e_mut(next).prev_in_ael = e2;
            }
            self.e_mut(e2).prev_in_ael = prev;
            if prev != INVALID {
                self.e_mut(prev).next_in_ael = e2;
            }
        }
        if self.e(e1).prev_in_ael == INVALID {
            self.active_edges = e1;
        } else if self.e(e2).prev_in_ael == INVALID {
            self.active_edges = e2;
        }
    }

    pub(super) fn swap_positions_in_sel(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        if (self.e(e1).next_in_sel == INVALID && self.e(e1).prev_in_sel == INVALID)
            || (self.e(e2).next_in_sel == INVALID && self.e(e2).prev_in_sel == INVALID)
        {
            return;
        }
        if self.e(e1).next_in_sel == e2 {
            let next = self.e(e2).next_in_sel;
            if next != INVALID {
                self.e_mut(next).prev_in_sel = e1;
            }
            let prev = self.e(e1).prev_in_sel;
            if prev != INVALID {
                self.e_mut(prev).next_in_sel = e2;
            }
            self.e_mut(e2).prev_in_sel = prev;
            self.e_mut(e2).next_in_sel = e1;
            self.e_mut(e1).prev_in_sel = e2;
            self.e_mut(e1).next_in_sel = next;
        } else if self.e(e2).next_in_sel == e1 {
            let next = self.e(e1).next_in_sel;
            if next != INVALID {
                self.e_mut(next).prev_in_sel = e2;
            }
            let prev = self.e(e2).prev_in_sel;
            if prev != INVALID {
                self.e_mut(prev).next_in_sel = e1;
            }
            self.e_mut(e1).prev_in_sel = prev;
            self.e_mut(e1).next_in_sel = e2;
            self.e_mut(e2).prev_in_sel = e1;
            self.e_mut(e2).next_in_sel = next;
        } else {
            let next = self.e(e1).next_in_sel;
            let prev = self.e(e1).prev_in_sel;
            let n2 = self.e(e2).next_in_sel;
            let p2 = self.e(e2).prev_in_sel;
            self.e_mut(e1).next_in_sel = n2;
            if n2 != INVALID {
                self.e_mut(n2).prev_in_sel = e1;
            }
            self.e_mut(e1).prev_in_sel = p2;
            if p2 != INVALID {
                self.e_mut(p2).next_in_sel = e1;
            }
            self.e_mut(e2).next_in_sel = next;
            if next != INVALID {
                self.e_mut(next).prev_in_sel = e2;
            }
            self.e_mut(e2).prev_in_sel = prev;
            if prev != INVALID {
                self.e_mut(prev).next_in_sel = e2;
            }
        }
        if self.e(e1).prev_in_sel == INVALID {
            self.sorted_edges = e1;
        } else if self.e(e2).prev_in_sel == INVALID {
            self.sorted_edges = e2;
        }
    }

    /// Replaces `e` in the AEL by the next edge of its bound.
    pub(super) fn update_edge_into_ael(&mut self, e: EdgeIdx) -> Result<EdgeIdx> {
        let nxt = self.e(e).next_in_lml;
        if nxt == INVALID {
            return Err(ClipError::Inconsistent("edge promoted past the end of its bound"));
        }
        let old = self.e(e).clone();
        if old.prev_in_ael != INVALID {
            self.e_mut(old.prev_in_ael).next_in_ael = nxt;
        } else {
            self.active_edges = nxt;
        }
        if old.next_in_ael != INVALID {
            self.e_mut(old.next_in_ael).prev_in_ael = nxt;
        }
        let n = self.e_mut(nxt);
        n.out_idx = old.out_idx;
        n.side = old.side;
        n.wind_delta = old.wind_delta;
        n.wind_cnt = old.wind_cnt;
        n.wind_cnt2 = old.wind_cnt2;
        n.curr = n.bot;
        n.prev_in_ael = old.prev_in_ael;
        n.next_in_ael = old.next_in_ael;
        if !n.is_horizontal() {
            let y = n.top.y;
            self.insert_scanbeam(y);
        }
        Ok(nxt)
    }

    // ─────── Winding ──────────────────────────────────────────────────────────

    fn set_winding_count(&mut self, edge: EdgeIdx) {
        let wd = self.e(edge).wind_delta;
        let pt = self.e(edge).poly_typ;
        let mut e = self.e(edge).prev_in_ael;
        // nearest preceding closed edge of the same poly type
        while e != INVALID && (self.e(e).poly_typ != pt || self.e(e).wind_delta == 0) {
            e = self.e(e).prev_in_ael;
        }

        let (wind_cnt, wind_cnt2);
        if e == INVALID {
            wind_cnt = if wd == 0 {
                let pft = if pt == PolyType::Subject { self.subj_fill } else { self.clip_fill };
                if pft == PolyFillType::Negative { -1 } else { 1 }
            } else {
                wd
            };
            wind_cnt2 = 0;
            e = self.active_edges;
        } else if wd == 0 && self.clip_type != ClipType::Union {
            wind_cnt = 1;
            wind_cnt2 = self.e(e).wind_cnt2;
            e = self.e(e).next_in_ael;
        } else if self.is_even_odd_fill(edge) {
            wind_cnt = if wd == 0 {
                // inside a polygon of the same type?
                let mut inside = true;
                let mut e2 = self.e(e).prev_in_ael;
                while e2 != INVALID {
                    if self.e(e2).poly_typ == self.e(e).poly_typ && self.e(e2).wind_delta != 0 {
                        inside = !inside;
                    }
                    e2 = self.e(e2).prev_in_ael;
                }
                if inside { 0 } else { 1 }
            } else {
                wd
            };
            wind_cnt2 = self.e(e).wind_cnt2;
            e = self.e(e).next_in_ael;
        } else {
            let (ewc, ewd) = (self.e(e).wind_cnt, self.e(e).wind_delta);
            wind_cnt = if ewc * ewd < 0 {
                // the previous edge takes the count back toward zero
                if ewc.abs() > 1 {
                    if ewd * wd < 0 { ewc } else { ewc + wd }
                } else if wd == 0 {
                    1
                } else {
                    wd
                }
            } else if wd == 0 {
                if ewc < 0 { ewc - 1 } else { ewc + 1 }
            } else if ewd * wd < 0 {
                ewc
            } else {
                ewc + wd
            };
            wind_cnt2 = self.e(e).wind_cnt2;
            e = self.e(e).next_in_ael;
        }

        let mut wc2 = wind_cnt2;
        if self.is_even_odd_alt_fill(edge) {
            while e != edge {
                if self.e(e).wind_delta != 0 {
                    wc2 = if wc2 == 0 { 1 } else { 0 };
                }
                e = self.e(e).next_in_ael;
            }
        } else {
            while e != edge {
                wc2 += self.e(e).wind_delta;
                e = self.e(e).next_in_ael;
            }
        }
        let ed = self.e_mut(edge);
        ed.wind_cnt = wind_cnt;
        ed.wind_cnt2 = wc2;
    }

    /// Whether the edge lies on the boundary of the result.
    fn is_contributing(&self, edge: EdgeIdx) -> bool {
        let ed = self.e(edge);
        let (pft, pft2) = self.fill_types(edge);
        let own = match pft {
            PolyFillType::EvenOdd => !(ed.wind_delta == 0 && ed.wind_cnt != 1),
            PolyFillType::NonZero => ed.wind_cnt.abs() == 1,
            PolyFillType::Positive => ed.wind_cnt == 1,
            PolyFillType::Negative => ed.wind_cnt == -1,
        };
        if !own {
            return false;
        }
        let wc2 = ed.wind_cnt2;
        let inside_other = || match pft2 {
            PolyFillType::EvenOdd | PolyFillType::NonZero => wc2 != 0,
            PolyFillType::Positive => wc2 > 0,
            PolyFillType::Negative => wc2 < 0,
        };
        let outside_other = || match pft2 {
            PolyFillType::EvenOdd | PolyFillType::NonZero => wc2 == 0,
            PolyFillType::Positive => wc2 <= 0,
            PolyFillType::Negative => wc2 >= 0,
        };
        match self.clip_type {
            ClipType::Intersection => inside_other(),
            ClipType::Union => outside_other(),
            ClipType::Difference => {
                if ed.poly_typ == PolyType::Subject {
                    outside_other()
                } else {
                    inside_other()
                }
            }
            ClipType::Xor => {
                if ed.wind_delta == 0 {
                    outside_other()
                } else {
                    true
                }
            }
        }
    }

    // ─────── Local minima ─────────────────────────────────────────────────────

    pub(super) fn insert_local_minima_into_ael(&mut self, bot_y: i64) -> Result<()> {
        while let Some((lb, rb)) = self.pop_local_minima(bot_y) {
            let mut op1 = INVALID;
            if lb == INVALID {
                self.insert_edge_into_ael(rb, INVALID);
                self.set_winding_count(rb);
                if self.is_contributing(rb) {
                    let bot = self.e(rb).bot;
                    op1 = self.add_out_pt(rb, bot);
                }
            } else if rb == INVALID {
                self.insert_edge_into_ael(lb, INVALID);
                self.set_winding_count(lb);
                if self.is_contributing(lb) {
                    let bot = self.e(lb).bot;
                    op1 = self.add_out_pt(lb, bot);
                }
                let y = self.e(lb).top.y;
                self.insert_scanbeam(y);
            } else {
                self.insert_edge_into_ael(lb, INVALID);
                self.insert_edge_into_ael(rb, lb);
                self.set_winding_count(lb);
                let (wc, wc2) = (self.e(lb).wind_cnt, self.e(lb).wind_cnt2);
                self.e_mut(rb).wind_cnt = wc;
                self.e_mut(rb).wind_cnt2 = wc2;
                if self.is_contributing(lb) {
                    let bot = self.e(lb).bot;
                    op1 = self.add_local_min_poly(lb, rb, bot);
                }
                let y = self.e(lb).top.y;
                self.insert_scanbeam(y);
            }

            if rb != INVALID {
                if self.e(rb).is_horizontal() {
                    self.add_edge_to_sel(rb);
                    let nl = self.e(rb).next_in_lml;
                    if nl != INVALID {
                        let y = self.e(nl).top.y;
                        self.insert_scanbeam(y);
                    }
                } else {
                    let y = self.e(rb).top.y;
                    self.insert_scanbeam(y);
                }
            }

            if lb == INVALID || rb == INVALID {
                continue;
            }

            // a horizontal right bound overlapping a ghost join becomes a real join
            if op1 != INVALID && self.e(rb).is_horizontal() && self.e(rb).wind_delta != 0 {
                let (rbx, rtx) = (self.e(rb).bot.x, self.e(rb).top.x);
                for i in 0..self.ghost_joins.len() {
                    let gj = self.ghost_joins[i];
                    if horz_segments_overlap(self.out_pts[gj.out_pt1].pt.x, gj.off_pt.x, rbx, rtx) {
                        self.add_join(gj.out_pt1, op1, gj.off_pt);
                    }
                }
            }

            let lp = self.e(lb).prev_in_ael;
            if self.e(lb).out_idx >= 0
                && lp != INVALID
                && self.e(lp).curr.x == self.e(lb).bot.x
                && self.e(lp).out_idx >= 0
                && slopes_equal4(
                    self.e(lp).bot,
                    self.e(lp).top,
                    self.e(lb).curr,
                    self.e(lb).top,
                    self.use_full_range(),
                )
                && self.e(lb).wind_delta != 0
                && self.e(lp).wind_delta != 0
            {
                let bot = self.e(lb).bot;
                let top = self.e(lb).top;
                let op2 = self.add_out_pt(lp, bot);
                self.add_join(op1, op2, top);
            }

            if self.e(lb).next_in_ael != rb {
                let rp = self.e(rb).prev_in_ael;
                if self.e(rb).out_idx >= 0
                    && self.e(rp).out_idx >= 0
                    && slopes_equal4(
                        self.e(rp).curr,
                        self.e(rp).top,
                        self.e(rb).curr,
                        self.e(rb).top,
                        self.use_full_range(),
                    )
                    && self.e(rb).wind_delta != 0
                    && self.e(rp).wind_delta != 0
                {
                    let bot = self.e(rb).bot;
                    let top = self.e(rb).top;
                    let op2 = self.add_out_pt(rp, bot);
                    self.add_join(op1, op2, top);
                }

                // rb must sit right of e above the crossing, hence the order
                let pt = self.e(lb).curr;
                let mut e = self.e(lb).next_in_ael;
                while e != INVALID && e != rb {
                    self.intersect_edges(rb, e, pt);
                    e = self.e(e).next_in_ael;
                }
            }
        }
        Ok(())
    }

    // ─────── Crossing two edges ───────────────────────────────────────────────

    /// Updates winding counts and output where `e1` and `e2` cross at `pt`.
    /// `e1` must be to the right of `e2` above the crossing.
    pub(super) fn intersect_edges(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) {
        let e1_contributing = self.e(e1).out_idx >= 0;
        let e2_contributing = self.e(e2).out_idx >= 0;
        let (e1wd, e2wd) = (self.e(e1).wind_delta, self.e(e2).wind_delta);

        // open paths
        if e1wd == 0 || e2wd == 0 {
            let same_type = self.e(e1).poly_typ == self.e(e2).poly_typ;
            if e1wd == 0 && e2wd == 0 {
                return;
            } else if same_type && e1wd != e2wd && self.clip_type == ClipType::Union {
                if e1wd == 0 {
                    if e2_contributing {
                        self.add_out_pt(e1, pt);
                        if e1_contributing {
                            self.e_mut(e1).out_idx = UNASSIGNED;
                        }
                    }
                } else if e1_contributing {
                    self.add_out_pt(e2, pt);
                    if e2_contributing {
                        self.e_mut(e2).out_idx = UNASSIGNED;
                    }
                }
            } else if !same_type {
                // toggle an open subject's output when crossing a clip boundary
                let (c1, c2) = (self.e(e1).clone(), self.e(e2).clone());
                if c1.wind_delta == 0
                    && c2.wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || c2.wind_cnt2 == 0)
                {
                    self.add_out_pt(e1, pt);
                    if e1_contributing {
                        self.e_mut(e1).out_idx = UNASSIGNED;
                    }
                } else if c2.wind_delta == 0
                    && c1.wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || c1.wind_cnt2 == 0)
                {
                    self.add_out_pt(e2, pt);
                    if e2_contributing {
                        self.e_mut(e2).out_idx = UNASSIGNED;
                    }
                }
            }
            return;
        }

        // winding counts
        if self.e(e1).poly_typ == self.e(e2).poly_typ {
            if self.is_even_odd_fill(e1) {
                let w1 = self.e(e1).wind_cnt;
                let w2 = self.e(e2).wind_cnt;
                self.e_mut(e1).wind_cnt = w2;
                self.e_mut(e2).wind_cnt = w1;
            } else {
                let ed1 = self.e_mut(e1);
                ed1.wind_cnt = if ed1.wind_cnt + e2wd == 0 { -ed1.wind_cnt } else { ed1.wind_cnt + e2wd };
                let ed2 = self.e_mut(e2);
                ed2.wind_cnt = if ed2.wind_cnt - e1wd == 0 { -ed2.wind_cnt } else { ed2.wind_cnt - e1wd };
            }
        } else {
            let e2_eo = self.is_even_odd_fill(e2);
            let e1_eo = self.is_even_odd_fill(e1);
            let ed1 = self.e_mut(e1);
            ed1.wind_cnt2 = if !e2_eo {
                ed1.wind_cnt2 + e2wd
            } else if ed1.wind_cnt2 == 0 {
                1
            } else {
                0
            };
            let ed2 = self.e_mut(e2);
            ed2.wind_cnt2 = if !e1_eo {
                ed2.wind_cnt2 - e1wd
            } else if ed2.wind_cnt2 == 0 {
                1
            } else {
                0
            };
        }

        let (e1_fill, e1_fill2) = self.fill_types(e1);
        let (e2_fill, e2_fill2) = self.fill_types(e2);
        let weight = |pft: PolyFillType, wc: i32| match pft {
            PolyFillType::Positive => wc,
            PolyFillType::Negative => -wc,
            _ => wc.abs(),
        };
        let e1wc = weight(e1_fill, self.e(e1).wind_cnt);
        let e2wc = weight(e2_fill, self.e(e2).wind_cnt);
        let same_type = self.e(e1).poly_typ == self.e(e2).poly_typ;

        if e1_contributing && e2_contributing {
            if (e1wc != 0 && e1wc != 1)
                || (e2wc != 0 && e2wc != 1)
                || (!same_type && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(e1, e2, pt);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e1_contributing {
            if e2wc == 0 || e2wc == 1 {
                self.add_out_pt(e1, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e2_contributing {
            if e1wc == 0 || e1wc == 1 {
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if (e1wc == 0 || e1wc == 1) && (e2wc == 0 || e2wc == 1) {
            // neither edge contributes yet
            let e1wc2 = weight(e1_fill2, self.e(e1).wind_cnt2);
            let e2wc2 = weight(e2_fill2, self.e(e2).wind_cnt2);
            if !same_type {
                self.add_local_min_poly(e1, e2, pt);
            } else if e1wc == 1 && e2wc == 1 {
                let start = match self.clip_type {
                    ClipType::Intersection => e1wc2 > 0 && e2wc2 > 0,
                    ClipType::Union => e1wc2 <= 0 && e2wc2 <= 0,
                    ClipType::Difference => {
                        let clip = self.e(e1).poly_typ == PolyType::Clip;
                        (clip && e1wc2 > 0 && e2wc2 > 0) || (!clip && e1wc2 <= 0 && e2wc2 <= 0)
                    }
                    ClipType::Xor => true,
                };
                if start {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }
    }

    fn swap_sides(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let s1 = self.e(e1).side;
        let s2 = self.e(e2).side;
        self.e_mut(e1).side = s2;
        self.e_mut(e2).side = s1;
    }

    fn swap_poly_indexes(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let o1 = self.e(e1).out_idx;
        let o2 = self.e(e2).out_idx;
        self.e_mut(e1).out_idx = o2;
        self.e_mut(e2).out_idx = o1;
    }

    // ─────── Horizontals ──────────────────────────────────────────────────────

    pub(super) fn process_horizontals(&mut self) -> Result<()> {
        while let Some(e) = self.pop_edge_from_sel() {
            self.process_horizontal(e)?;
        }
        Ok(())
    }

    fn horz_direction(&self, e: EdgeIdx) -> (Direction, i64, i64) {
        let ed = self.e(e);
        if ed.bot.x < ed.top.x {
            (Direction::LeftToRight, ed.bot.x, ed.top.x)
        } else {
            (Direction::RightToLeft, ed.top.x, ed.bot.x)
        }
    }

    #[inline]
    fn next_in_ael_dir(&self, e: EdgeIdx, dir: Direction) -> EdgeIdx {
        if dir == Direction::LeftToRight {
            self.e(e).next_in_ael
        } else {
            self.e(e).prev_in_ael
        }
    }

    /// Joins the newest vertex of a horizontal with every overlapping
    /// contributing horizontal still waiting in the SEL, then records it as a
    /// ghost join for the next scanbeam.
    fn join_waiting_horizontals(&mut self, horz: EdgeIdx, op1: u32, ghost_at: IntPoint) {
        let (hb, ht) = (self.e(horz).bot.x, self.e(horz).top.x);
        let mut next_horz = self.sorted_edges;
        while next_horz != INVALID {
            let nh = self.e(next_horz).clone();
            if nh.out_idx >= 0 && horz_segments_overlap(hb, ht, nh.bot.x, nh.top.x) {
                let op2 = self.last_out_pt(next_horz);
                self.add_join(op2, op1, nh.top);
            }
            next_horz = nh.next_in_sel;
        }
        self.add_ghost_join(op1, ghost_at);
    }

    /// Horizontals are processed like any other edge except that every edge
    /// they span is crossed immediately. Consecutive horizontals of one bound
    /// are treated as a single run.
    fn process_horizontal(&mut self, mut horz: EdgeIdx) -> Result<()> {
        let is_open = self.e(horz).wind_delta == 0;
        let (mut dir, mut horz_left, mut horz_right) = self.horz_direction(horz);

        let mut last_horz = horz;
        loop {
            let nl = self.e(last_horz).next_in_lml;
            if nl == INVALID || !self.e(nl).is_horizontal() {
                break;
            }
            last_horz = nl;
        }
        let max_pair = if self.e(last_horz).next_in_lml == INVALID {
            self.maxima_pair(last_horz)
        } else {
            INVALID
        };

        // cursor into the sorted maxima list, forward or backward with `dir`
        let maxima = std::mem::take(&mut self.maxima);
        let mut max_fwd = maxima.len();
        let mut max_rev = 0usize; // count consumed from the back
        if !maxima.is_empty() {
            let bot_x = self.e(horz).bot.x;
            let last_top_x = self.e(last_horz).top.x;
            if dir == Direction::LeftToRight {
                max_rev = maxima.len();
                max_fwd = 0;
                while max_fwd < maxima.len() && maxima[max_fwd] <= bot_x {
                    max_fwd += 1;
                }
                if max_fwd < maxima.len() && maxima[max_fwd] >= last_top_x {
                    max_fwd = maxima.len();
                }
            } else {
                while max_rev < maxima.len() && maxima[maxima.len() - 1 - max_rev] > bot_x {
                    max_rev += 1;
                }
                if max_rev < maxima.len() && maxima[maxima.len() - 1 - max_rev] <= last_top_x {
                    max_rev = maxima.len();
                }
            }
        }

        let mut op1 = INVALID;
        let result = (|| -> Result<()> {
            loop {
                let is_last_horz = horz == last_horz;
                let mut e = self.next_in_ael_dir(horz, dir);
                while e != INVALID {
                    // extra vertices where maxima touch the horizontal
                    if !maxima.is_empty() {
                        let ex = self.e(e).curr.x;
                        let hy = self.e(horz).bot.y;
                        if dir == Direction::LeftToRight {
                            while max_fwd < maxima.len() && maxima[max_fwd] < ex {
                                if self.e(horz).out_idx >= 0 && !is_open {
                                    self.add_out_pt(horz, IntPoint::new(maxima[max_fwd], hy));
                                }
                                max_fwd += 1;
                            }
                        } else {
                            while max_rev < maxima.len() && maxima[maxima.len() - 1 - max_rev] > ex {
                                if self.e(horz).out_idx >= 0 && !is_open {
                                    let x = maxima[maxima.len() - 1 - max_rev];
                                    self.add_out_pt(horz, IntPoint::new(x, hy));
                                }
                                max_rev += 1;
                            }
                        }
                    }

                    let ex = self.e(e).curr.x;
                    if (dir == Direction::LeftToRight && ex > horz_right)
                        || (dir == Direction::RightToLeft && ex < horz_left)
                    {
                        break;
                    }

                    // end of an intermediate horizontal; smaller dx lies right above it
                    let hnl = self.e(horz).next_in_lml;
                    if ex == self.e(horz).top.x && hnl != INVALID && self.e(e).dx < self.e(hnl).dx {
                        break;
                    }

                    if self.e(horz).out_idx >= 0 && !is_open {
                        let curr = self.e(e).curr;
                        op1 = self.add_out_pt(horz, curr);
                        let bot = self.e(horz).bot;
                        self.join_waiting_horizontals(horz, op1, bot);
                    }

                    if e == max_pair && is_last_horz {
                        if self.e(horz).out_idx >= 0 {
                            let top = self.e(horz).top;
                            self.add_local_max_poly(horz, max_pair, top);
                        }
                        self.delete_from_ael(horz);
                        self.delete_from_ael(max_pair);
                        return Ok(());
                    }

                    let pt = IntPoint::new(self.e(e).curr.x, self.e(horz).curr.y);
                    if dir == Direction::LeftToRight {
                        self.intersect_edges(horz, e, pt);
                    } else {
                        self.intersect_edges(e, horz, pt);
                    }
                    let e_next = self.next_in_ael_dir(e, dir);
                    self.swap_positions_in_ael(horz, e);
                    e = e_next;
                }

                let hnl = self.e(horz).next_in_lml;
                if hnl == INVALID || !self.e(hnl).is_horizontal() {
                    break;
                }
                horz = self.update_edge_into_ael(horz)?;
                if self.e(horz).out_idx >= 0 {
                    let bot = self.e(horz).bot;
                    self.add_out_pt(horz, bot);
                }
                let d = self.horz_direction(horz);
                dir = d.0;
                horz_left = d.1;
                horz_right = d.2;
            }

            if self.e(horz).out_idx >= 0 && op1 == INVALID {
                op1 = self.last_out_pt(horz);
                let top = self.e(horz).top;
                self.join_waiting_horizontals(horz, op1, top);
            }

            if self.e(horz).next_in_lml != INVALID {
                if self.e(horz).out_idx >= 0 {
                    let top = self.e(horz).top;
                    op1 = self.add_out_pt(horz, top);
                    horz = self.update_edge_into_ael(horz)?;
                    if self.e(horz).wind_delta == 0 {
                        return Ok(());
                    }
                    // horz is no longer horizontal here
                    let h = self.e(horz).clone();
                    let (prev, next) = (h.prev_in_ael, h.next_in_ael);
                    if prev != INVALID
                        && self.e(prev).curr == h.bot
                        && self.e(prev).wind_delta != 0
                        && self.e(prev).out_idx >= 0
                        && self.e(prev).curr.y > self.e(prev).top.y
                        && self.edge_slopes_equal(horz, prev)
                    {
                        let op2 = self.add_out_pt(prev, h.bot);
                        self.add_join(op1, op2, h.top);
                    } else if next != INVALID
                        && self.e(next).curr == h.bot
                        && self.e(next).wind_delta != 0
                        && self.e(next).out_idx >= 0
                        && self.e(next).curr.y > self.e(next).top.y
                        && self.edge_slopes_equal(horz, next)
                    {
                        let op2 = self.add_out_pt(next, h.bot);
                        self.add_join(op1, op2, h.top);
                    }
                } else {
                    self.update_edge_into_ael(horz)?;
                }
            } else {
                if self.e(horz).out_idx >= 0 {
                    let top = self.e(horz).top;
                    self.add_out_pt(horz, top);
                }
                self.delete_from_ael(horz);
            }
            Ok(())
        })();
        self.maxima = maxima;
        result
    }

    // ─────── Maxima ───────────────────────────────────────────────────────────

    /// The other edge ending at the same top vertex, if it ends its bound too.
    fn maxima_pair(&self, e: EdgeIdx) -> EdgeIdx {
        let ed = self.e(e);
        let (n, p) = (self.e(ed.next), self.e(ed.prev));
        if n.top == ed.top && n.next_in_lml == INVALID {
            ed.next
        } else if p.top == ed.top && p.next_in_lml == INVALID {
            ed.prev
        } else {
            INVALID
        }
    }

    /// As `maxima_pair`, but only a pair that is in the AEL (or horizontal).
    fn maxima_pair_ex(&self, e: EdgeIdx) -> EdgeIdx {
        let r = self.maxima_pair(e);
        if r != INVALID {
            let re = self.e(r);
            if re.out_idx == SKIP || (re.next_in_ael == re.prev_in_ael && !re.is_horizontal()) {
                return INVALID;
            }
        }
        r
    }

    fn do_maxima(&mut self, e: EdgeIdx) -> Result<()> {
        let max_pair = self.maxima_pair_ex(e);
        if max_pair == INVALID {
            if self.e(e).out_idx >= 0 {
                let top = self.e(e).top;
                self.add_out_pt(e, top);
            }
            self.delete_from_ael(e);
            return Ok(());
        }

        let top = self.e(e).top;
        let mut next = self.e(e).next_in_ael;
        while next != INVALID && next != max_pair {
            self.intersect_edges(e, next, top);
            self.swap_positions_in_ael(e, next);
            next = self.e(e).next_in_ael;
        }

        let (eo, mo) = (self.e(e).out_idx, self.e(max_pair).out_idx);
        if eo == UNASSIGNED && mo == UNASSIGNED {
            self.delete_from_ael(e);
            self.delete_from_ael(max_pair);
        } else if eo >= 0 && mo >= 0 {
            self.add_local_max_poly(e, max_pair, top);
            self.delete_from_ael(e);
            self.delete_from_ael(max_pair);
        } else if self.e(e).wind_delta == 0 {
            if eo >= 0 {
                self.add_out_pt(e, top);
                self.e_mut(e).out_idx = UNASSIGNED;
            }
            self.delete_from_ael(e);
            if self.e(max_pair).out_idx >= 0 {
                self.add_out_pt(max_pair, top);
                self.e_mut(max_pair).out_idx = UNASSIGNED;
            }
            self.delete_from_ael(max_pair);
        } else {
            return Err(ClipError::Inconsistent("maxima pair in unexpected output state"));
        }
        Ok(())
    }

    // ─────── Top of scanbeam ──────────────────────────────────────────────────

    pub(super) fn process_edges_at_top_of_scanbeam(&mut self, top_y: i64) -> Result<()> {
        let mut e = self.active_edges;
        while e != INVALID {
            // 1. maxima, treated like bent horizontals (horizontal pairs excluded)
            let mut is_maxima = self.e(e).top.y == top_y && self.e(e).next_in_lml == INVALID;
            if is_maxima {
                let mp = self.maxima_pair_ex(e);
                is_maxima = mp == INVALID || !self.e(mp).is_horizontal();
            }

            if is_maxima {
                if self.strictly_simple {
                    let x = self.e(e).top.x;
                    self.maxima.push(x);
                }
                let prev = self.e(e).prev_in_ael;
                self.do_maxima(e)?;
                e = if prev == INVALID { self.active_edges } else { self.e(prev).next_in_ael };
                continue;
            }

            // 2. promote horizontals, otherwise advance curr
            let nl = self.e(e).next_in_lml;
            if self.e(e).top.y == top_y && nl != INVALID && self.e(nl).is_horizontal() {
                e = self.update_edge_into_ael(e)?;
                if self.e(e).out_idx >= 0 {
                    let bot = self.e(e).bot;
                    self.add_out_pt(e, bot);
                }
                self.add_edge_to_sel(e);
            } else {
                let x = self.e(e).top_x(top_y);
                let ed = self.e_mut(e);
                ed.curr = IntPoint::new(x, top_y);
            }

            // strictly simple: touching edges both get a vertex here
            if self.strictly_simple {
                let prev = self.e(e).prev_in_ael;
                let ed = self.e(e).clone();
                if ed.out_idx >= 0
                    && ed.wind_delta != 0
                    && prev != INVALID
                    && self.e(prev).out_idx >= 0
                    && self.e(prev).curr.x == ed.curr.x
                    && self.e(prev).wind_delta != 0
                {
                    let pt = ed.curr;
                    let op = self.add_out_pt(prev, pt);
                    let op2 = self.add_out_pt(e, pt);
                    self.add_join(op, op2, pt);
                }
            }
            e = self.e(e).next_in_ael;
        }

        // 3. horizontals at the top of the scanbeam
        self.maxima.sort_unstable();
        self.process_horizontals()?;
        self.maxima.clear();

        // 4. promote intermediate vertices
        let mut e = self.active_edges;
        while e != INVALID {
            if self.e(e).top.y == top_y && self.e(e).next_in_lml != INVALID {
                let mut op = INVALID;
                if self.e(e).out_idx >= 0 {
                    let top = self.e(e).top;
                    op = self.add_out_pt(e, top);
                }
                e = self.update_edge_into_ael(e)?;

                // output contours sharing an edge are joined later
                let ed = self.e(e).clone();
                let (prev, next) = (ed.prev_in_ael, ed.next_in_ael);
                let shares = |c: &Self, o: EdgeIdx| {
                    let oe = c.e(o);
                    oe.curr == ed.bot
                        && op != INVALID
                        && oe.out_idx >= 0
                        && oe.curr.y > oe.top.y
                        && slopes_equal4(ed.curr, ed.top, oe.curr, oe.top, c.use_full_range())
                        && ed.wind_delta != 0
                        && oe.wind_delta != 0
                };
                if prev != INVALID && shares(self, prev) {
                    let op2 = self.add_out_pt(prev, ed.bot);
                    self.add_join(op, op2, ed.top);
                } else if next != INVALID && shares(self, next) {
                    let op2 = self.add_out_pt(next, ed.bot);
                    self.add_join(op, op2, ed.top);
                }
            }
            e = self.e(e).next_in_ael;
        }
        Ok(())
    }
}

// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (ProcessIntersections)
//
// Crossings between active edges inside one scanbeam.
//
// The AEL is copied into the SEL with every x moved to the top of the beam,
// then bubble-sorted; each swap is a crossing. Crossings must be applied
// bottom-up and only between edges adjacent at that moment, which
// `fixup_intersection_order` enforces.

use super::{Clipper, IntersectNode};
use crate::arena::INVALID;
use crate::edge::Edge;
use crate::error::{ClipError, Result};
use crate::geom::{round, IntPoint};
use log::{trace, warn};

/// Where two edges cross, clamped to the scanbeam the caller is in.
pub(crate) fn intersect_point(e1: &Edge, e2: &Edge) -> IntPoint {
    let mut ip = IntPoint::default();
    if e1.dx == e2.dx {
        ip.y = e1.curr.y;
        ip.x = e1.top_x(ip.y);
        return ip;
    } else if e1.dx == 0.0 {
        ip.x = e1.bot.x;
        if e2.is_horizontal() {
            ip.y = e2.bot.y;
        } else {
            let b2 = e2.bot.y as f64 - e2.bot.x as f64 / e2.dx;
            ip.y = round(ip.x as f64 / e2.dx + b2);
        }
    } else if e2.dx == 0.0 {
        ip.x = e2.bot.x;
        if e1.is_horizontal() {
            ip.y = e1.bot.y;
        } else {
            let b1 = e1.bot.y as f64 - e1.bot.x as f64 / e1.dx;
            ip.y = round(ip.x as f64 / e1.dx + b1);
        }
    } else {
        let b1 = e1.bot.x as f64 - e1.bot.y as f64 * e1.dx;
        let b2 = e2.bot.x as f64 - e2.bot.y as f64 * e2.dx;
        let q = (b2 - b1) / (e1.dx - e2.dx);
        ip.y = round(q);
        ip.x = if e1.dx.abs() < e2.dx.abs() {
            round(e1.dx * q + b1)
        } else {
            round(e2.dx * q + b2)
        };
    }

    if ip.y < e1.top.y || ip.y < e2.top.y {
        ip.y = e1.top.y.max(e2.top.y);
        ip.x = if e1.dx.abs() < e2.dx.abs() { e1.top_x(ip.y) } else { e2.top_x(ip.y) };
    }
    // never below the bottom of the scanbeam
    if ip.y > e1.curr.y {
        ip.y = e1.curr.y;
        ip.x = if e1.dx.abs() > e2.dx.abs() { e2.top_x(ip.y) } else { e1.top_x(ip.y) };
    }
    ip
}

impl Clipper {
    pub(super) fn process_intersections(&mut self, top_y: i64) -> Result<()> {
        if self.active_edges == INVALID {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        let count = self.intersect_list.len();
        if count == 0 {
            return Ok(());
        }
        if count > 1 && !self.fixup_intersection_order() {
            warn!("{} crossings below y={} could not be ordered", count, top_y);
            self.intersect_list.clear();
            self.sorted_edges = INVALID;
            return Err(ClipError::UnorderableIntersections { y: top_y });
        }
        trace!("{} crossings below y={}", count, top_y);
        self.process_intersect_list();
        self.sorted_edges = INVALID;
        Ok(())
    }

    fn build_intersect_list(&mut self, top_y: i64) {
        self.copy_ael_to_sel();
        let mut e = self.active_edges;
        while e != INVALID {
            let x = self.e(e).top_x(top_y);
            self.e_mut(e).curr.x = x;
            e = self.e(e).next_in_ael;
        }

        loop {
            let mut modified = false;
            let mut e = self.sorted_edges;
            loop {
                let next = self.e(e).next_in_sel;
                if next == INVALID {
                    break;
                }
                if self.e(e).curr.x > self.e(next).curr.x {
                    let mut pt = intersect_point(self.e(e), self.e(next));
                    if pt.y < top_y {
                        pt = IntPoint::new(self.e(e).top_x(top_y), top_y);
                    }
                    self.intersect_list.push(IntersectNode { edge1: e, edge2: next, pt });
                    self.swap_positions_in_sel(e, next);
                    modified = true;
                } else {
                    e = next;
                }
            }
            // `e` has bubbled to its final place; shorten the list
            let prev = self.e(e).prev_in_sel;
            if prev == INVALID {
                break;
            }
            self.e_mut(prev).next_in_sel = INVALID;
            if !modified {
                break;
            }
        }
        self.sorted_edges = INVALID;
    }

    fn edges_adjacent(&self, node: &IntersectNode) -> bool {
        let e1 = self.e(node.edge1);
        e1.next_in_sel == node.edge2 || e1.prev_in_sel == node.edge2
    }

    /// Reorders the list so every crossing is between SEL neighbours when it
    /// is applied. Returns false when no such order exists.
    fn fixup_intersection_order(&mut self) -> bool {
        self.copy_ael_to_sel();
        self.intersect_list.sort_by(|a, b| b.pt.y.cmp(&a.pt.y));
        let cnt = self.intersect_list.len();
        for i in 0..cnt {
            if !self.edges_adjacent(&self.intersect_list[i]) {
                let mut j = i + 1;
                while j < cnt && !self.edges_adjacent(&self.intersect_list[j]) {
                    j += 1;
                }
                if j == cnt {
                    return false;
                }
                self.intersect_list.swap(i, j);
            }
            let node = self.intersect_list[i];
            self.swap_positions_in_sel(node.edge1, node.edge2);
        }
        true
    }

    fn process_intersect_list(&mut self) {
        let list = std::mem::take(&mut self.intersect_list);
        for node in &list {
            self.intersect_edges(node.edge1, node.edge2, node.pt);
            self.swap_positions_in_ael(node.edge1, node.edge2);
        }
        self.intersect_list = list;
        self.intersect_list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{EdgeSide, PolyType, HORIZONTAL, UNASSIGNED};

    fn edge(bot: (i64, i64), top: (i64, i64), curr_y: i64) -> Edge {
        let (bot, top) = (IntPoint::from(bot), IntPoint::from(top));
        let dy = top.y - bot.y;
        let dx = if dy == 0 { HORIZONTAL } else { (top.x - bot.x) as f64 / dy as f64 };
        Edge {
            bot,
            curr: IntPoint::new(bot.x, curr_y),
            top,
            dx,
            poly_typ: PolyType::Subject,
            side: EdgeSide::Left,
            wind_delta: 1,
            wind_cnt: 0,
            wind_cnt2: 0,
            out_idx: UNASSIGNED,
            next: INVALID,
            prev: INVALID,
            next_in_lml: INVALID,
            next_in_ael: INVALID,
            prev_in_ael: INVALID,
            next_in_sel: INVALID,
            prev_in_sel: INVALID,
        }
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let a = edge((0, 10), (10, 0), 10);
        let b = edge((10, 10), (0, 0), 10);
        assert_eq!(intersect_point(&a, &b), IntPoint::new(5, 5));
    }

    #[test]
    fn vertical_edge_uses_its_x() {
        let a = edge((4, 10), (4, 0), 10);
        let b = edge((0, 10), (10, 0), 10);
        assert_eq!(intersect_point(&a, &b), IntPoint::new(4, 6));
    }

    #[test]
    fn crossing_above_both_tops_is_clamped() {
        // the lines would meet at y = 5 but both edges stop at y = 8
        let a = edge((0, 10), (2, 8), 10);
        let b = edge((10, 10), (8, 8), 10);
        let ip = intersect_point(&a, &b);
        assert_eq!(ip.y, 8);
    }
}

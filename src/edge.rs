// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (ClipperBase::AddPath, local minima)
//
// Edge table construction.
//
// Input paths are turned into rings of edges stored in one flat Vec. Each ring
// is split into monotonic bounds (chains of edges that only go up in the sweep
// direction), and every place where two bounds meet at a bottom vertex becomes
// a LocalMinima entry. The sweep pulls bounds into the active edge list from
// the minima list.
//
// Y grows downward in the sweep: an edge's `bot` has the larger y.

use crate::arena::INVALID;
use crate::error::Result;
use crate::geom::{pt2_is_between_pt1_and_pt3, range_test, slopes_equal3, IntPoint, IntRect};
use log::warn;

/// Index into `EdgeTable::edges`.
pub type EdgeIdx = u32;

/// `dx` sentinel for horizontal edges.
pub const HORIZONTAL: f64 = -1.0e40;
/// Edge not yet attached to an output record.
pub const UNASSIGNED: i32 = -1;
/// Edge that joins the two ends of an open path and is never swept.
pub const SKIP: i32 = -2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PolyType {
    Subject,
    Clip,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeSide {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub bot: IntPoint,
    pub curr: IntPoint,
    pub top: IntPoint,
    pub dx: f64,
    pub poly_typ: PolyType,
    pub side: EdgeSide,
    /// +1 or -1 for closed paths depending on direction, 0 for open paths.
    pub wind_delta: i32,
    pub wind_cnt: i32,
    /// Winding count of the other poly type.
    pub wind_cnt2: i32,
    pub out_idx: i32,
    pub next: EdgeIdx,
    pub prev: EdgeIdx,
    pub next_in_lml: EdgeIdx,
    pub next_in_ael: EdgeIdx,
    pub prev_in_ael: EdgeIdx,
    pub next_in_sel: EdgeIdx,
    pub prev_in_sel: EdgeIdx,
}

impl Edge {
    fn new(pt: IntPoint, next: EdgeIdx, prev: EdgeIdx) -> Self {
        Self {
            bot: IntPoint::default(),
            curr: pt,
            top: IntPoint::default(),
            dx: 0.0,
            poly_typ: PolyType::Subject,
            side: EdgeSide::Left,
            wind_delta: 0,
            wind_cnt: 0,
            wind_cnt2: 0,
            out_idx: UNASSIGNED,
            next,
            prev,
            next_in_lml: INVALID,
            next_in_ael: INVALID,
            prev_in_ael: INVALID,
            next_in_sel: INVALID,
            prev_in_sel: INVALID,
        }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.dx == HORIZONTAL
    }

    fn set_dx(&mut self) {
        let dy = self.top.y - self.bot.y;
        self.dx = if dy == 0 {
            HORIZONTAL
        } else {
            (self.top.x - self.bot.x) as f64 / dy as f64
        };
    }

    /// Swaps the x ends of a horizontal so that it runs in bound order.
    #[inline]
    fn reverse_horizontal(&mut self) {
        std::mem::swap(&mut self.top.x, &mut self.bot.x);
    }

    /// X of this edge at scanline `y`.
    #[inline]
    pub fn top_x(&self, y: i64) -> i64 {
        if y == self.top.y {
            self.top.x
        } else {
            self.bot.x + crate::geom::round(self.dx * (y - self.bot.y) as f64)
        }
    }
}

/// Where a left bound and a right bound start together.
#[derive(Copy, Clone, Debug)]
pub struct LocalMinima {
    pub y: i64,
    pub left_bound: EdgeIdx,
    pub right_bound: EdgeIdx,
}

/// Edge storage plus the local minima list for all loaded paths.
#[derive(Default)]
pub struct EdgeTable {
    pub edges: Vec<Edge>,
    pub minima: Vec<LocalMinima>,
    pub use_full_range: bool,
    pub has_open_paths: bool,
    pub preserve_collinear: bool,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.use_full_range = false;
        self.has_open_paths = false;
    }

    #[inline]
    fn e(&self, i: EdgeIdx) -> &Edge {
        &self.edges[i as usize]
    }

    #[inline]
    fn e_mut(&mut self, i: EdgeIdx) -> &mut Edge {
        &mut self.edges[i as usize]
    }

    #[inline]
    fn is_horz(&self, i: EdgeIdx) -> bool {
        self.e(i).is_horizontal()
    }

    /// Unlinks `i` from its ring and returns the following edge.
    fn remove_edge(&mut self, i: EdgeIdx) -> EdgeIdx {
        let (next, prev) = (self.e(i).next, self.e(i).prev);
        self.e_mut(prev).next = next;
        self.e_mut(next).prev = prev;
        self.e_mut(i).prev = INVALID;
        next
    }

    /// Adds one path. Returns `Ok(false)` when the path degenerates to nothing.
    pub fn add_path(&mut self, pg: &[IntPoint], poly_typ: PolyType, closed: bool) -> Result<bool> {
        if pg.is_empty() {
            return Ok(false);
        }
        let mut high = pg.len() - 1;
        if closed {
            while high > 0 && pg[high] == pg[0] {
                high -= 1;
            }
        }
        while high > 0 && pg[high] == pg[high - 1] {
            high -= 1;
        }
        if (closed && high < 2) || (!closed && high < 1) {
            return Ok(false);
        }

        let was_full_range = self.use_full_range;
        let mut full = self.use_full_range;
        for pt in &pg[..=high] {
            full = range_test(*pt, full)?;
        }
        if full && !was_full_range {
            warn!("coordinates exceed {:#x}, switching to 128-bit slope tests", crate::geom::LO_RANGE);
        }
        self.use_full_range = full;

        // 1. Ring of edges, one per vertex.
        let base = self.edges.len() as u32;
        let n = high as u32 + 1;
        for i in 0..n {
            let next = base + (i + 1) % n;
            let prev = base + (i + n - 1) % n;
            self.edges.push(Edge::new(pg[i as usize], next, prev));
        }

        // 2. Strip duplicate vertices and, for closed paths, collinear ones.
        let mut e_start = base;
        let mut e = e_start;
        let mut loop_stop = e_start;
        loop {
            let next = self.e(e).next;
            if self.e(e).curr == self.e(next).curr && (closed || next != e_start) {
                if e == next {
                    break;
                }
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                loop_stop = e;
                continue;
            }
            let prev = self.e(e).prev;
            if prev == next {
                break;
            }
            if closed
                && slopes_equal3(self.e(prev).curr, self.e(e).curr, self.e(next).curr, self.use_full_range)
                && (!self.preserve_collinear
                    || !pt2_is_between_pt1_and_pt3(self.e(prev).curr, self.e(e).curr, self.e(next).curr))
            {
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                e = self.e(e).prev;
                loop_stop = e;
                continue;
            }
            e = next;
            if e == loop_stop || (!closed && self.e(e).next == e_start) {
                break;
            }
        }

        if (!closed && e == self.e(e).next) || (closed && self.e(e).prev == self.e(e).next) {
            self.edges.truncate(base as usize);
            return Ok(false);
        }

        if !closed {
            self.has_open_paths = true;
            let p = self.e(e_start).prev;
            self.e_mut(p).out_idx = SKIP;
        }

        // 3. Second stage: bot/top/dx.
        let mut is_flat = true;
        e = e_start;
        loop {
            let next_curr = self.e(self.e(e).next).curr;
            let edge = self.e_mut(e);
            if edge.curr.y >= next_curr.y {
                edge.bot = edge.curr;
                edge.top = next_curr;
            } else {
                edge.top = edge.curr;
                edge.bot = next_curr;
            }
            edge.set_dx();
            edge.poly_typ = poly_typ;
            e = self.e(e).next;
            if is_flat && self.e(e).curr.y != self.e(e_start).curr.y {
                is_flat = false;
            }
            if e == e_start {
                break;
            }
        }

        // 4. Bounds into the minima list.
        if is_flat {
            if closed {
                self.edges.truncate(base as usize);
                return Ok(false);
            }
            let p = self.e(e).prev;
            self.e_mut(p).out_idx = SKIP;
            let lm = LocalMinima { y: self.e(e).bot.y, left_bound: INVALID, right_bound: e };
            self.e_mut(e).side = EdgeSide::Right;
            self.e_mut(e).wind_delta = 0;
            loop {
                let prev_top_x = self.e(self.e(e).prev).top.x;
                if self.e(e).bot.x != prev_top_x {
                    self.e_mut(e).reverse_horizontal();
                }
                let next = self.e(e).next;
                if self.e(next).out_idx == SKIP {
                    break;
                }
                self.e_mut(e).next_in_lml = next;
                e = next;
            }
            self.minima.push(lm);
            return Ok(true);
        }

        let mut e_min = INVALID;
        // Open paths whose ends coincide would otherwise loop forever below.
        let p = self.e(e).prev;
        if self.e(p).bot == self.e(p).top {
            e = self.e(e).next;
        }

        loop {
            e = self.find_next_loc_min(e);
            if e == e_min {
                break;
            }
            if e_min == INVALID {
                e_min = e;
            }

            // e and e.prev share a local minimum; the slopes pick left and right.
            let prev = self.e(e).prev;
            let (mut left, mut right, left_is_forward) = if self.e(e).dx < self.e(prev).dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };
            let y = self.e(e).bot.y;

            let wd = if !closed {
                0
            } else if self.e(left).next == right {
                -1
            } else {
                1
            };
            self.e_mut(left).wind_delta = wd;
            self.e_mut(right).wind_delta = -wd;

            e = self.process_bound(left, left_is_forward);
            if self.e(e).out_idx == SKIP {
                e = self.process_bound(e, left_is_forward);
            }
            let mut e2 = self.process_bound(right, !left_is_forward);
            if self.e(e2).out_idx == SKIP {
                e2 = self.process_bound(e2, !left_is_forward);
            }

            if self.e(left).out_idx == SKIP {
                left = INVALID;
            } else if self.e(right).out_idx == SKIP {
                right = INVALID;
            }
            self.minima.push(LocalMinima { y, left_bound: left, right_bound: right });
            if !left_is_forward {
                e = e2;
            }
        }
        Ok(true)
    }

    fn find_next_loc_min(&self, mut e: EdgeIdx) -> EdgeIdx {
        loop {
            while self.e(e).bot != self.e(self.e(e).prev).bot || self.e(e).curr == self.e(e).top {
                e = self.e(e).next;
            }
            if !self.is_horz(e) && !self.is_horz(self.e(e).prev) {
                break;
            }
            while self.is_horz(self.e(e).prev) {
                e = self.e(e).prev;
            }
            let e2 = e;
            while self.is_horz(e) {
                e = self.e(e).next;
            }
            if self.e(e).top.y == self.e(self.e(e).prev).bot.y {
                // just an intermediate horizontal
                continue;
            }
            if self.e(self.e(e2).prev).bot.x < self.e(e).bot.x {
                e = e2;
            }
            break;
        }
        e
    }

    /// Chains one bound through `next_in_lml` and returns the edge just past it.
    fn process_bound(&mut self, mut e: EdgeIdx, next_is_forward: bool) -> EdgeIdx {
        let mut result = e;

        if self.e(e).out_idx == SKIP {
            // Edges beyond a skip edge start another minimum without a left bound.
            if next_is_forward {
                while self.e(e).top.y == self.e(self.e(e).next).bot.y {
                    e = self.e(e).next;
                }
                while e != result && self.is_horz(e) {
                    e = self.e(e).prev;
                }
            } else {
                while self.e(e).top.y == self.e(self.e(e).prev).bot.y {
                    e = self.e(e).prev;
                }
                while e != result && self.is_horz(e) {
                    e = self.e(e).next;
                }
            }

            if e == result {
                result = if next_is_forward { self.e(e).next } else { self.e(e).prev };
            } else {
                e = if next_is_forward { self.e(result).next } else { self.e(result).prev };
                let lm = LocalMinima { y: self.e(e).bot.y, left_bound: INVALID, right_bound: e };
                self.e_mut(e).wind_delta = 0;
                result = self.process_bound(e, next_is_forward);
                self.minima.push(lm);
            }
            return result;
        }

        if self.is_horz(e) {
            // Careful with open paths: e may follow a skip edge, and runs of
            // horizontals may head left before turning right.
            let start = if next_is_forward { self.e(e).prev } else { self.e(e).next };
            let bot_x = self.e(e).bot.x;
            if self.is_horz(start) {
                if self.e(start).bot.x != bot_x && self.e(start).top.x != bot_x {
                    self.e_mut(e).reverse_horizontal();
                }
            } else if self.e(start).bot.x != bot_x {
                self.e_mut(e).reverse_horizontal();
            }
        }

        let e_start = e;
        if next_is_forward {
            while self.e(result).top.y == self.e(self.e(result).next).bot.y
                && self.e(self.e(result).next).out_idx != SKIP
            {
                result = self.e(result).next;
            }
            if self.is_horz(result) && self.e(self.e(result).next).out_idx != SKIP {
                // A top horizontal joins the bound only when the preceding edge
                // meets its left end.
                let mut horz = result;
                while self.is_horz(self.e(horz).prev) {
                    horz = self.e(horz).prev;
                }
                let hp = self.e(horz).prev;
                if self.e(hp).top.x > self.e(self.e(result).next).top.x {
                    result = hp;
                }
            }
            while e != result {
                let next = self.e(e).next;
                self.e_mut(e).next_in_lml = next;
                if self.is_horz(e) && e != e_start && self.e(e).bot.x != self.e(self.e(e).prev).top.x {
                    self.e_mut(e).reverse_horizontal();
                }
                e = next;
            }
            if self.is_horz(e) && e != e_start && self.e(e).bot.x != self.e(self.e(e).prev).top.x {
                self.e_mut(e).reverse_horizontal();
            }
            result = self.e(result).next;
        } else {
            while self.e(result).top.y == self.e(self.e(result).prev).bot.y
                && self.e(self.e(result).prev).out_idx != SKIP
            {
                result = self.e(result).prev;
            }
            if self.is_horz(result) && self.e(self.e(result).prev).out_idx != SKIP {
                let mut horz = result;
                while self.is_horz(self.e(horz).next) {
                    horz = self.e(horz).next;
                }
                let hn = self.e(horz).next;
                if self.e(hn).top.x >= self.e(self.e(result).prev).top.x {
                    result = hn;
                }
            }
            while e != result {
                let prev = self.e(e).prev;
                self.e_mut(e).next_in_lml = prev;
                if self.is_horz(e) && e != e_start && self.e(e).bot.x != self.e(self.e(e).next).top.x {
                    self.e_mut(e).reverse_horizontal();
                }
                e = prev;
            }
            if self.is_horz(e) && e != e_start && self.e(e).bot.x != self.e(self.e(e).next).top.x {
                self.e_mut(e).reverse_horizontal();
            }
            result = self.e(result).prev;
        }
        result
    }

    /// Sorts minima bottom-up (largest y first) and rewinds every bound's
    /// first edge.
    pub fn reset(&mut self) {
        self.minima.sort_by(|a, b| b.y.cmp(&a.y));
        for i in 0..self.minima.len() {
            let lm = self.minima[i];
            if lm.left_bound != INVALID {
                let e = self.e_mut(lm.left_bound);
                e.curr = e.bot;
                e.side = EdgeSide::Left;
                e.out_idx = UNASSIGNED;
            }
            if lm.right_bound != INVALID {
                let e = self.e_mut(lm.right_bound);
                e.curr = e.bot;
                e.side = EdgeSide::Right;
                e.out_idx = UNASSIGNED;
            }
        }
    }

    /// Bounds of every vertex reachable from the minima list.
    pub fn bounds(&self) -> IntRect {
        let mut r: Option<IntRect> = None;
        let mut grow = |p: IntPoint| {
            let rect = r.get_or_insert(IntRect { left: p.x, top: p.y, right: p.x, bottom: p.y });
            rect.left = rect.left.min(p.x);
            rect.right = rect.right.max(p.x);
            rect.top = rect.top.min(p.y);
            rect.bottom = rect.bottom.max(p.y);
        };
        for lm in &self.minima {
            for start in [lm.left_bound, lm.right_bound] {
                let mut e = start;
                while e != INVALID {
                    let edge = self.e(e);
                    grow(edge.bot);
                    grow(edge.top);
                    e = edge.next_in_lml;
                }
            }
        }
        r.unwrap_or_default()
    }
}

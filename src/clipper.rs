// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (Clipper, ClipperBase)
//
// Boolean clipping of integer polygons with an extended Vatti sweep.
//
// The sweep runs from the largest y to the smallest. Edges enter the active
// edge list (AEL) at local minima, are kept sorted by their x at the current
// scanline, and leave at local maxima. Each scanbeam (the band between two
// consecutive event ys) is processed in three phases: horizontals, then all
// crossings inside the beam, then the events at its top. Contributing edges
// emit vertices into output rings (OutRec/OutPt), which are joined, split and
// cleaned after the sweep.
//
// The code is split across submodules that all extend `Clipper`:
//   sweep.rs     - AEL/SEL maintenance, winding counts, horizontals, maxima
//   intersect.rs - crossings within a scanbeam
//   output.rs    - output rings and result assembly
//   joins.rs     - joining overlapping output edges, strictly simple output

mod intersect;
mod joins;
mod output;
mod sweep;


use crate::arena::{Arena, INVALID};
use crate::edge::{Edge, EdgeIdx, EdgeTable, PolyType};
use crate::error::{ClipError, Result};
use crate::geom::{IntPoint, IntRect, Path, Paths};
use crate::polytree::PolyTree;
use log::debug;
use std::collections::BinaryHeap;

// ─────────────────────────────── Public types ──────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipType {
    Intersection,
    Union,
    Difference,
    Xor,
}

/// How winding numbers map to "inside".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PolyFillType {
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipOption {
    /// Outer contours come out clockwise, holes counter-clockwise.
    ReverseSolution,
    /// Split output contours wherever they touch themselves or each other.
    StrictlySimple,
    /// Keep collinear vertices that are not spikes.
    PreserveCollinear,
}

// ─────────────────────────── Internal records ─────────────────────────────────

/// Index into `Clipper::out_pts`.
pub(crate) type OutPtIdx = u32;

/// A vertex of an output ring.
#[derive(Clone, Debug)]
pub(crate) struct OutPt {
    /// Owning OutRec; may be stale after merges, see `Clipper::out_rec`.
    pub idx: usize,
    pub pt: IntPoint,
    pub next: OutPtIdx,
    pub prev: OutPtIdx,
}

/// An output contour under construction.
#[derive(Clone, Debug)]
pub(crate) struct OutRec {
    /// Equals its own slot while live; after a merge it forwards to the
    /// record that absorbed it.
    pub idx: usize,
    pub is_hole: bool,
    pub is_open: bool,
    /// The nearest contour enclosing this one, if any.
    pub first_left: Option<usize>,
    /// Left-most vertex; `pts.prev` is the right-most.
    pub pts: OutPtIdx,
    pub bottom_pt: OutPtIdx,
    pub poly_node: Option<usize>,
}

/// Two output vertices whose edges overlap and should be merged. Ghost joins
/// (pending horizontal overlaps from an earlier scanbeam) have no `out_pt2`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Join {
    pub out_pt1: OutPtIdx,
    pub out_pt2: OutPtIdx,
    pub off_pt: IntPoint,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct IntersectNode {
    pub edge1: EdgeIdx,
    pub edge2: EdgeIdx,
    pub pt: IntPoint,
}

// ─────────────────────────── Clipper ──────────────────────────────────────────

pub struct Clipper {
    table: EdgeTable,
    current_lm: usize,
    scanbeam: BinaryHeap<i64>,
    active_edges: EdgeIdx,
    sorted_edges: EdgeIdx,

    out_recs: Vec<OutRec>,
    out_pts: Arena<OutPt>,
    joins: Vec<Join>,
    ghost_joins: Vec<Join>,
    intersect_list: Vec<IntersectNode>,
    /// X of maxima seen at the current scanline (strictly simple mode only).
    maxima: Vec<i64>,

    clip_type: ClipType,
    subj_fill: PolyFillType,
    clip_fill: PolyFillType,
    reverse_output: bool,
    strictly_simple: bool,
    using_poly_tree: bool,
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipper {
    pub fn new() -> Self {
        Self {
            table: EdgeTable::new(),
            current_lm: 0,
            scanbeam: BinaryHeap::new(),
            active_edges: INVALID,
            sorted_edges: INVALID,
            out_recs: Vec::new(),
            out_pts: Arena::new(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            intersect_list: Vec::new(),
            maxima: Vec::new(),
            clip_type: ClipType::Intersection,
            subj_fill: PolyFillType::EvenOdd,
            clip_fill: PolyFillType::EvenOdd,
            reverse_output: false,
            strictly_simple: false,
            using_poly_tree: false,
        }
    }

    pub fn set_option(&mut self, option: ClipOption, value: bool) {
        match option {
            ClipOption::ReverseSolution => self.reverse_output = value,
            ClipOption::StrictlySimple => self.strictly_simple = value,
            ClipOption::PreserveCollinear => self.table.preserve_collinear = value,
        }
    }

    pub fn option(&self, option: ClipOption) -> bool {
        match option {
            ClipOption::ReverseSolution => self.reverse_output,
            ClipOption::StrictlySimple => self.strictly_simple,
            ClipOption::PreserveCollinear => self.table.preserve_collinear,
        }
    }

    /// Loads one path. `Ok(false)` means it was degenerate and ignored.
    pub fn add_path(&mut self, path: &[IntPoint], poly_type: PolyType, closed: bool) -> Result<bool> {
        if !closed && poly_type == PolyType::Clip {
            return Err(ClipError::OpenClipPath);
        }
        self.table.add_path(path, poly_type, closed)
    }

    /// Loads several paths. Returns true if at least one was kept.
    pub fn add_paths(&mut self, paths: &[Path], poly_type: PolyType, closed: bool) -> Result<bool> {
        let mut result = false;
        for p in paths {
            if self.add_path(p, poly_type, closed)? {
                result = true;
            }
        }
        Ok(result)
    }

    /// Drops every loaded path.
    pub fn clear(&mut self) {
        self.table.clear();
        self.dispose_all_out_recs();
        self.scanbeam.clear();
        self.active_edges = INVALID;
        self.sorted_edges = INVALID;
        self.current_lm = 0;
    }

    /// Bounds of the loaded paths.
    pub fn bounds(&self) -> IntRect {
        self.table.bounds()
    }

    /// Runs a boolean operation and returns closed contours. Outer contours
    /// have positive area unless `ReverseSolution` is set.
    pub fn execute(
        &mut self,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Result<Paths> {
        if self.table.has_open_paths {
            return Err(ClipError::OpenPathsNeedTree);
        }
        self.clip_type = clip_type;
        self.subj_fill = subj_fill;
        self.clip_fill = clip_fill;
        self.using_poly_tree = false;
        let result = self.execute_internal().map(|_| self.build_result());
        self.dispose_all_out_recs();
        if let Ok(ref paths) = result {
            debug!(
                "{:?} ({:?}/{:?}) over {} minima -> {} contours",
                clip_type,
                subj_fill,
                clip_fill,
                self.table.minima.len(),
                paths.len()
            );
        }
        result
    }

    /// Runs a boolean operation and returns the contours nested by
    /// containment. Required when open paths were loaded.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Result<PolyTree> {
        self.clip_type = clip_type;
        self.subj_fill = subj_fill;
        self.clip_fill = clip_fill;
        self.using_poly_tree = true;
        let result = self.execute_internal().map(|_| self.build_result_tree());
        self.dispose_all_out_recs();
        if let Ok(ref tree) = result {
            debug!(
                "{:?} ({:?}/{:?}) over {} minima -> tree of {} nodes",
                clip_type,
                subj_fill,
                clip_fill,
                self.table.minima.len(),
                tree.total()
            );
        }
        result
    }

    // ─────── Driver ───────────────────────────────────────────────────────────

    fn execute_internal(&mut self) -> Result<()> {
        let swept = self.sweep();
        if swept.is_ok() {
            self.fix_orientations();
            if !self.joins.is_empty() {
                self.join_common_edges();
            }
            // FixupOutPolygon must run after the joins.
            for i in 0..self.out_recs.len() {
                if self.out_recs[i].pts == INVALID {
                    continue;
                }
                if self.out_recs[i].is_open {
                    self.fixup_out_polyline(i);
                } else {
                    self.fixup_out_polygon(i);
                }
            }
            if self.strictly_simple {
                self.do_simple_polygons();
            }
        }
        self.joins.clear();
        self.ghost_joins.clear();
        swept
    }

    fn sweep(&mut self) -> Result<()> {
        self.reset();
        self.maxima.clear();
        self.sorted_edges = INVALID;

        let bot_y = match self.pop_scanbeam() {
            Some(y) => y,
            None => return Ok(()),
        };
        self.insert_local_minima_into_ael(bot_y)?;
        while let Some(top_y) = self.pop_scanbeam() {
            self.process_horizontals()?;
            self.ghost_joins.clear();
            self.process_intersections(top_y)?;
            self.process_edges_at_top_of_scanbeam(top_y)?;
            self.insert_local_minima_into_ael(top_y)?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.table.reset();
        self.current_lm = 0;
        self.scanbeam.clear();
        for lm in &self.table.minima {
            self.scanbeam.push(lm.y);
        }
        self.active_edges = INVALID;
    }

    // ─────── Scanbeam and minima ──────────────────────────────────────────────

    #[inline]
    fn insert_scanbeam(&mut self, y: i64) {
        self.scanbeam.push(y);
    }

    /// Largest pending y, with duplicates collapsed.
    fn pop_scanbeam(&mut self) -> Option<i64> {
        let y = self.scanbeam.pop()?;
        while self.scanbeam.peek() == Some(&y) {
            self.scanbeam.pop();
        }
        Some(y)
    }

    /// Next local minimum at exactly `y`.
    fn pop_local_minima(&mut self, y: i64) -> Option<(EdgeIdx, EdgeIdx)> {
        let lm = *self.table.minima.get(self.current_lm)?;
        if lm.y != y {
            return None;
        }
        self.current_lm += 1;
        Some((lm.left_bound, lm.right_bound))
    }

    // ─────── Accessors ────────────────────────────────────────────────────────

    #[inline]
    fn e(&self, i: EdgeIdx) -> &Edge {
        &self.table.edges[i as usize]
    }

    #[inline]
    fn e_mut(&mut self, i: EdgeIdx) -> &mut Edge {
        &mut self.table.edges[i as usize]
    }

    #[inline]
    fn use_full_range(&self) -> bool {
        self.table.use_full_range
    }

    fn dispose_all_out_recs(&mut self) {
        self.out_recs.clear();
        self.out_pts.clear();
    }
}

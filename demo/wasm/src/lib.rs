// Copyright 2025 Lars Brubaker
// WASM bindings for vatti-rust

use vatti_rust::{
    offset_paths, ClipOption, ClipType, Clipper, EndType, IntPoint, JoinType, Path, Paths,
    PolyFillType, PolyType, DEFAULT_ARC_TOLERANCE,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// A stateful clipper that accumulates subject and clip contours then runs
/// one boolean operation.
#[wasm_bindgen]
pub struct ClipperJs {
    inner: Clipper,
    result: Paths,
    error: Option<String>,
}

impl Default for ClipperJs {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ClipperJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ClipperJs {
        ClipperJs {
            inner: Clipper::new(),
            result: Vec::new(),
            error: None,
        }
    }

    /// Add a closed subject contour from a flat [x0,y0, x1,y1, ...] array.
    pub fn add_subject(&mut self, vertices: &[f64]) -> bool {
        self.add(vertices, PolyType::Subject)
    }

    /// Add a closed clip contour from a flat [x0,y0, x1,y1, ...] array.
    pub fn add_clip(&mut self, vertices: &[f64]) -> bool {
        self.add(vertices, PolyType::Clip)
    }

    /// Set an option (0 = ReverseSolution, 1 = StrictlySimple, 2 = PreserveCollinear).
    pub fn set_option(&mut self, option: u32, value: bool) {
        let opt = match option {
            0 => ClipOption::ReverseSolution,
            1 => ClipOption::StrictlySimple,
            2 => ClipOption::PreserveCollinear,
            _ => return,
        };
        self.inner.set_option(opt, value);
    }

    /// Run and return true on success.
    /// op: 0=Intersection 1=Union 2=Difference 3=Xor
    /// fill: 0=EvenOdd 1=NonZero 2=Positive 3=Negative
    pub fn execute(&mut self, op: u32, fill: u32) -> bool {
        let ft = fill_type(fill);
        match self.inner.execute(clip_type(op), ft, ft) {
            Ok(paths) => {
                self.result = paths;
                self.error = None;
                true
            }
            Err(e) => {
                self.result.clear();
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.result.clear();
        self.error = None;
    }

    /// Number of output contours.
    pub fn contour_count(&self) -> u32 {
        self.result.len() as u32
    }

    /// Vertex count of each output contour, in order.
    pub fn get_contour_sizes(&self) -> Vec<u32> {
        self.result.iter().map(|p| p.len() as u32).collect()
    }

    /// All output vertices, flat [x0,y0, x1,y1, ...]; split with get_contour_sizes.
    pub fn get_vertices(&self) -> Vec<f64> {
        flatten(&self.result)
    }

    /// Message of the last failed execute, if any.
    pub fn last_error(&self) -> Option<String> {
        self.error.clone()
    }

    fn add(&mut self, vertices: &[f64], poly_type: PolyType) -> bool {
        match self.inner.add_path(&to_path(vertices), poly_type, true) {
            Ok(kept) => kept,
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

fn clip_type(op: u32) -> ClipType {
    match op {
        0 => ClipType::Intersection,
        1 => ClipType::Union,
        2 => ClipType::Difference,
        3 => ClipType::Xor,
        _ => ClipType::Intersection,
    }
}

fn fill_type(fill: u32) -> PolyFillType {
    match fill {
        0 => PolyFillType::EvenOdd,
        1 => PolyFillType::NonZero,
        2 => PolyFillType::Positive,
        3 => PolyFillType::Negative,
        _ => PolyFillType::EvenOdd,
    }
}

fn to_path(vertices: &[f64]) -> Path {
    vertices
        .chunks_exact(2)
        .map(|c| IntPoint::new(c[0].round() as i64, c[1].round() as i64))
        .collect()
}

fn flatten(paths: &[Path]) -> Vec<f64> {
    paths
        .iter()
        .flat_map(|p| p.iter().flat_map(|pt| [pt.x as f64, pt.y as f64]))
        .collect()
}

/// Convenience: offset a single closed contour.
/// join: 0=Square 1=Round 2=Miter. Returns flat vertices of every output
/// contour concatenated; empty on failure.
#[wasm_bindgen]
pub fn offset_polygon(vertices: &[f64], delta: f64, join: u32) -> Vec<f64> {
    let jt = match join {
        1 => JoinType::Round,
        2 => JoinType::Miter,
        _ => JoinType::Square,
    };
    let paths = vec![to_path(vertices)];
    match offset_paths(&paths, delta, jt, EndType::ClosedPolygon, 2.0, DEFAULT_ARC_TOLERANCE) {
        Ok(out) => flatten(&out),
        Err(_) => Vec::new(),
    }
}

// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (MinkowskiSum, MinkowskiDiff)
//
// Minkowski sums and differences.
//
// The pattern is placed at every vertex of the path; consecutive placements
// are bridged by one quad per pattern edge, and the quads are unioned with
// the NonZero rule.

use crate::clipper::{ClipType, Clipper, PolyFillType};
use crate::edge::PolyType;
use crate::error::Result;
use crate::geom::{orientation, range_test, IntPoint, Path, Paths};
use log::debug;

/// Quads swept by `pattern` along `path`, each positively oriented. Inputs
/// beyond HI_RANGE are rejected before any point is summed.
fn minkowski_quads(pattern: &[IntPoint], path: &[IntPoint], is_sum: bool, closed: bool) -> Result<Paths> {
    let poly_cnt = pattern.len();
    let path_cnt = path.len();
    if poly_cnt == 0 || path_cnt == 0 {
        return Ok(Vec::new());
    }
    for &pt in pattern.iter().chain(path) {
        range_test(pt, true)?;
    }
    let placed: Vec<Path> = path
        .iter()
        .map(|&p| {
            pattern
                .iter()
                .map(|&q| if is_sum { p + q } else { p - q })
                .collect()
        })
        .collect();

    let bridges = if closed { path_cnt } else { path_cnt - 1 };
    let mut quads = Vec::with_capacity(bridges * poly_cnt);
    for i in 0..bridges {
        let (a, b) = (&placed[i % path_cnt], &placed[(i + 1) % path_cnt]);
        for j in 0..poly_cnt {
            let j1 = (j + 1) % poly_cnt;
            let mut quad = vec![a[j], b[j], b[j1], a[j1]];
            if !orientation(&quad) {
                quad.reverse();
            }
            quads.push(quad);
        }
    }
    Ok(quads)
}

fn union_nonzero(subject: &[Path], clip: &[Path]) -> Result<Paths> {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyType::Subject, true)?;
    c.add_paths(clip, PolyType::Clip, true)?;
    c.execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
}

/// The area swept by `pattern` as its origin follows `path`.
pub fn minkowski_sum(pattern: &[IntPoint], path: &[IntPoint], path_is_closed: bool) -> Result<Paths> {
    let quads = minkowski_quads(pattern, path, true, path_is_closed)?;
    let out = union_nonzero(&quads, &[])?;
    debug!("minkowski sum: {} quads -> {} contours", quads.len(), out.len());
    Ok(out)
}

/// Sum of `pattern` with several paths. Closed paths also contribute their
/// own interior, shifted by the pattern's first vertex.
pub fn minkowski_sum_paths(pattern: &[IntPoint], paths: &[Path], path_is_closed: bool) -> Result<Paths> {
    let mut quads = Vec::new();
    let mut interiors = Vec::new();
    for path in paths {
        quads.extend(minkowski_quads(pattern, path, true, path_is_closed)?);
        if path_is_closed {
            if let Some(&shift) = pattern.first() {
                interiors.push(path.iter().map(|&p| p + shift).collect::<Path>());
            }
        }
    }
    let out = union_nonzero(&quads, &interiors)?;
    debug!("minkowski sum of {} paths -> {} contours", paths.len(), out.len());
    Ok(out)
}

/// Every `b_pt - a_pt` difference swept out as `a` follows `b`.
pub fn minkowski_diff(a: &[IntPoint], b: &[IntPoint], closed: bool) -> Result<Paths> {
    let quads = minkowski_quads(a, b, false, closed)?;
    let out = union_nonzero(&quads, &[])?;
    debug!("minkowski difference: {} quads -> {} contours", quads.len(), out.len());
    Ok(out)
}

// vatti-rust: Pure Rust port of Clipper 6.4.2 (Angus Johnson), extended Vatti sweep
// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0

pub mod arena;
pub mod clipper;
pub mod edge;
pub mod error;
pub mod geom;
pub mod minkowski;
pub mod offset;
pub mod polytree;
pub mod simplify;

pub use clipper::{ClipOption, ClipType, Clipper, PolyFillType};
pub use edge::PolyType;
pub use error::{ClipError, Result};
pub use geom::{
    area, orientation, path_from, paths_bounds, point_in_polygon, reverse_path, reverse_paths,
    DoublePoint, IntPoint, IntRect, Path, Paths, HI_RANGE, LO_RANGE,
};
pub use minkowski::{minkowski_diff, minkowski_sum, minkowski_sum_paths};
pub use offset::{
    offset_paths, ClipperOffset, EndType, JoinType, DEFAULT_ARC_TOLERANCE, DEFAULT_MITER_LIMIT,
};
pub use polytree::{
    closed_paths_from_polytree, open_paths_from_polytree, polytree_to_paths, NodeId, PolyNode,
    PolyTree,
};
pub use simplify::{
    clean_polygon, clean_polygons, intersect_all, simplify_polygon, simplify_polygons,
    DEFAULT_CLEAN_DISTANCE,
};

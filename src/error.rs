// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Error type shared by the clipper, offset and Minkowski builders.

use thiserror::Error;

/// Errors raised while loading paths or running a clipping operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipError {
    /// A coordinate lies outside the supported integer range.
    #[error("coordinate ({x}, {y}) is outside the supported range")]
    RangeExceeded { x: i64, y: i64 },

    /// Open paths can only be subjects.
    #[error("open paths cannot be used as clip paths")]
    OpenClipPath,

    /// Open paths were loaded but a flat path list was requested.
    #[error("open paths require execute_tree")]
    OpenPathsNeedTree,

    /// The intersections of a scanbeam could not be put in an order where every
    /// swapped pair is adjacent.
    #[error("intersections at y = {y} cannot be ordered")]
    UnorderableIntersections { y: i64 },

    /// Internal bookkeeping went wrong.
    #[error("inconsistent sweep state: {0}")]
    Inconsistent(&'static str),
}

pub type Result<T> = std::result::Result<T, ClipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = ClipError::RangeExceeded { x: 1, y: -2 };
        assert_eq!(e.to_string(), "coordinate (1, -2) is outside the supported range");
        assert!(ClipError::OpenClipPath.to_string().contains("clip"));
        let e = ClipError::UnorderableIntersections { y: 7 };
        assert!(e.to_string().contains("y = 7"));
    }
}

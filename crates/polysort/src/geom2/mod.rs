//! 2D point sets and their angular ordering.
//!
//! Purpose
//! - Hold a loaded point sequence (`PointSet`) with finite coordinates.
//! - Reorder it around its centroid into a `SortedPolygon` (`polygon_sort`).
//!
//! Scope
//! - No convex hull: interior points stay in the outline.
//! - No robust predicates: collinear and duplicate points are kept as-is, ties
//!   in angle keep encounter order.
//!
//! Code cross-refs: `sort::polygon_sort`, `types::PointSet`, `util::signed_area`

mod error;
pub mod rand;
mod sort;
mod types;
mod util;

pub use error::PolygonError;
pub use sort::{angled_points, centroid, normalized_angle, polygon_sort, AngledPoint};
pub use types::{Point, PointSet, SortedPolygon};
pub use util::{has_crossing_edges, segments_cross, signed_area};

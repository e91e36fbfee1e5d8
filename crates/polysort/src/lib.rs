//! Angular ordering of 2D point sets.
//!
//! A loaded point set is turned into a polygon outline by sorting its points
//! by angle around their centroid. Everything here is pure and synchronous;
//! file decoding and drawing live in the `cli` crate.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - `api` and `prelude` are the curated import surfaces for callers.

pub mod api;
pub mod geom2;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom2::{Point, PointSet, PolygonError, SortedPolygon};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom2::rand::{
        draw_star_cloud, draw_uniform_cloud, CloudCfg, PointCount, ReplayToken,
    };
    pub use crate::geom2::{
        centroid, has_crossing_edges, normalized_angle, polygon_sort, signed_area, AngledPoint,
        Point, PointSet, PolygonError, SortedPolygon,
    };
    pub use nalgebra::Vector2 as Vec2;
}

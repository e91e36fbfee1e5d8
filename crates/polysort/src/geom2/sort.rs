//! Angular sort around the centroid.
//!
//! Model
//! - Centroid = arithmetic mean of the points, recomputed per call.
//! - Key = `atan2(y - cy, x - cx)` shifted from `(-π, π]` into `[0, 2π)`, so
//!   the order starts at the positive x-axis and runs counterclockwise.
//! - Stable sort on the key: equal angles keep encounter order.
//!
//! Connecting the result in order gives a simple outline only when the set is
//! star-shaped with respect to its centroid.

use std::f64::consts::TAU;

use super::error::PolygonError;
use super::types::{Point, PointSet, SortedPolygon};

/// A point tagged with its normalized angle around a reference center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngledPoint {
    pub point: Point,
    /// Radians in `[0, 2π)`.
    pub angle: f64,
}

/// Arithmetic mean of `points`.
pub fn centroid(points: &[Point]) -> Result<Point, PolygonError> {
    if points.is_empty() {
        return Err(PolygonError::Empty);
    }
    let sum = points.iter().fold(Point::zeros(), |acc, p| acc + p);
    Ok(sum / points.len() as f64)
}

/// Angle of `p - center` in `[0, 2π)`.
#[inline]
pub fn normalized_angle(p: Point, center: Point) -> f64 {
    let d = p - center;
    (d.y.atan2(d.x) + TAU) % TAU
}

pub fn angled_points(points: &[Point], center: Point) -> Vec<AngledPoint> {
    points
        .iter()
        .map(|&point| AngledPoint {
            point,
            angle: normalized_angle(point, center),
        })
        .collect()
}

/// Reorder `points` by ascending angle around their centroid.
///
/// Pre: `points` is non-empty.
/// Post: the result is a permutation of `points`; ties keep input order.
pub fn polygon_sort(points: &PointSet) -> Result<SortedPolygon, PolygonError> {
    let center = centroid(points.as_slice())?;
    let mut tagged = angled_points(points.as_slice(), center);
    // slice::sort_by is stable
    tagged.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    Ok(SortedPolygon {
        points: tagged.into_iter().map(|ap| ap.point).collect(),
    })
}

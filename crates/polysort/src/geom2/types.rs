//! Point containers.
//!
//! - `Point`: a 2D position as an nalgebra column vector.
//! - `PointSet`: loaded points in file row order, finite coordinates only.
//! - `SortedPolygon`: the angle-ordered permutation produced by `polygon_sort`.

use nalgebra::Vector2;

use super::error::PolygonError;

/// A 2D point `(x, y)`.
pub type Point = Vector2<f64>;

/// Ordered point sequence; insertion order is file row order.
///
/// Invariants:
/// - Every coordinate is finite.
/// - Duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Build from points, rejecting NaN and infinities.
    pub fn new(points: Vec<Point>) -> Result<Self, PolygonError> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(PolygonError::NonFinite { index });
        }
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, PolygonError> {
        Self::new(pairs.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn to_pairs(&self) -> Vec<(f64, f64)> {
        to_pairs(&self.points)
    }
}

/// Points reordered by ascending angle around their centroid.
///
/// Invariants:
/// - Non-empty.
/// - A permutation of the `PointSet` it was sorted from.
#[derive(Clone, Debug, PartialEq)]
pub struct SortedPolygon {
    pub(crate) points: Vec<Point>,
}

impl SortedPolygon {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn to_pairs(&self) -> Vec<(f64, f64)> {
        to_pairs(&self.points)
    }

    pub fn into_inner(self) -> Vec<Point> {
        self.points
    }

    /// Vertices with the first one repeated at the end, for drawing a closed path.
    pub fn closed_loop(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.points.len() + 1);
        out.extend_from_slice(&self.points);
        out.extend(self.points.first().copied());
        out
    }
}

fn to_pairs(points: &[Point]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.x, p.y)).collect()
}

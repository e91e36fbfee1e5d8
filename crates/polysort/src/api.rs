//! Curated internal API for the dashboard and tooling (UNSTABLE).
//!
//! - Not a public API; breaking changes are allowed.
//! - Callers outside the crate should prefer these re-exports, and
//!   `sort_pairs` when they hold plain tuples instead of vectors.

pub use crate::geom2::{
    angled_points, centroid, has_crossing_edges, normalized_angle, polygon_sort,
    segments_cross, signed_area, AngledPoint, Point, PointSet, PolygonError, SortedPolygon,
};

/// Sort plain `(x, y)` pairs by angle around their centroid.
///
/// Pre: pairs are finite and non-empty.
/// Post: returns the same pairs, angle-ordered.
pub fn sort_pairs(pairs: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, PolygonError> {
    let set = PointSet::from_pairs(pairs)?;
    Ok(polygon_sort(&set)?.to_pairs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_roundtrip_through_sort() {
        let out = sort_pairs(&[(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)]).unwrap();
        assert_eq!(out, vec![(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]);
    }

    #[test]
    fn pairs_reject_nan() {
        let err = sort_pairs(&[(0.0, 0.0), (f64::NAN, 1.0)]).unwrap_err();
        assert_eq!(err, PolygonError::NonFinite { index: 1 });
    }

    #[test]
    fn pairs_reject_empty() {
        assert_eq!(sort_pairs(&[]).unwrap_err(), PolygonError::Empty);
    }
}

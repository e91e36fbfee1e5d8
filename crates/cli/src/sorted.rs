use polysort::api::{centroid, sort_pairs, Point, PolygonError};
use serde::{Deserialize, Serialize};

/// Angle-sorted points plus the centroid they were ordered around.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct SortedPoints {
    pub centroid: [f64; 2],
    pub sorted: Vec<[f64; 2]>,
}

pub fn sorted_points(pairs: &[(f64, f64)]) -> Result<SortedPoints, PolygonError> {
    let sorted = sort_pairs(pairs)?;
    let pts: Vec<Point> = sorted.iter().map(|&(x, y)| Point::new(x, y)).collect();
    let c = centroid(&pts)?;
    Ok(SortedPoints {
        centroid: [c.x, c.y],
        sorted: sorted.iter().map(|&(x, y)| [x, y]).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_around_origin() {
        let out = sorted_points(&[(-1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (1.0, -1.0)]).unwrap();
        assert_eq!(out.centroid, [0.0, 0.0]);
        assert_eq!(out.sorted, vec![[1.0, 1.0], [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]]);
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(sorted_points(&[]).unwrap_err(), PolygonError::Empty);
    }
}

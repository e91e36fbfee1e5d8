use std::fmt;

/// Errors raised by point-set construction and angular sorting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonError {
    /// The point set is empty, so the centroid is undefined.
    Empty,
    /// A coordinate at `index` is NaN or infinite.
    NonFinite { index: usize },
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonError::Empty => write!(f, "point set is empty; centroid is undefined"),
            PolygonError::NonFinite { index } => {
                write!(f, "point {} has a non-finite coordinate", index)
            }
        }
    }
}

impl std::error::Error for PolygonError {}

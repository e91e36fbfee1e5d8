use super::types::Point;

/// Orientation slack for `segments_cross`; touching and collinear overlaps are not crossings.
const CROSS_EPS: f64 = 1e-12;

#[inline]
fn cross(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

#[inline]
fn side(v: f64) -> i8 {
    if v > CROSS_EPS {
        1
    } else if v < -CROSS_EPS {
        -1
    } else {
        0
    }
}

/// Shoelace area of the closed outline through `vertices` (positive for CCW order).
pub fn signed_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..vertices.len() {
        let p = vertices[i];
        let q = vertices[(i + 1) % vertices.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    0.5 * twice
}

/// True if segments `ab` and `cd` cross at a single interior point.
pub fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = side(cross(a, b, c));
    let o2 = side(cross(a, b, d));
    let o3 = side(cross(c, d, a));
    let o4 = side(cross(c, d, b));
    o1 * o2 < 0 && o3 * o4 < 0
}

/// True if any two non-adjacent edges of the closed outline through `vertices` cross.
///
/// Quadratic in the vertex count; meant for dashboard-sized inputs.
pub fn has_crossing_edges(vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 4 {
        return false;
    }
    let edge = |i: usize| (vertices[i], vertices[(i + 1) % n]);
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue; // shares vertex 0
            }
            let (a, b) = edge(i);
            let (c, d) = edge(j);
            if segments_cross(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

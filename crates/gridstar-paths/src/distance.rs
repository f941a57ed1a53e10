use gridstar_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.row - b.row).abs().max((a.col - b.col).abs())
}

/// Octile distance: the cost of the cheapest obstacle-free 8-directional
/// route when straight steps cost `orthogonal` and diagonal steps cost
/// `diagonal`.
#[inline]
pub fn octile(a: Point, b: Point, orthogonal: f64, diagonal: f64) -> f64 {
    let dr = (a.row - b.row).abs();
    let dc = (a.col - b.col).abs();
    let (lo, hi) = (dr.min(dc), dr.max(dc));
    orthogonal * f64::from(hi - lo) + diagonal * f64::from(lo)
}

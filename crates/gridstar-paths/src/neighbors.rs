use gridstar_core::Point;

/// Cached neighbour computation helper.
///
/// Enumerates the 8-directional neighbours of a grid point, filtered by a
/// predicate, into a reusable buffer.
#[derive(Debug, Clone)]
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Return the 8-directional neighbours of `p`, keeping only those for
    /// which `keep` returns `true`. Diagonals come first, in the order of
    /// [`Point::neighbors_8`].
    pub fn all(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        for n in p.neighbors_8() {
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}

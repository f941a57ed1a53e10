use gridstar_core::{Grid, Point};

/// Per-cell search state.
///
/// One node exists for every cell of the grid. Nodes are allocated when the
/// engine is built and reused by every search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pos: Point,
    pub(crate) g: f64,
    pub(crate) h: f64,
    pub(crate) f: f64,
    pub(crate) parent: Option<usize>,
    pub(crate) open: bool,
    pub(crate) closed: bool,
}

impl SearchNode {
    pub(crate) fn new(pos: Point) -> Self {
        Self {
            pos,
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: None,
            open: false,
            closed: false,
        }
    }

    /// Restore the freshly-allocated state, keeping the position.
    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.pos);
    }

    /// Record a route to this node.
    #[inline]
    pub(crate) fn set_route(&mut self, g: f64, h: f64, parent: Option<usize>) {
        self.g = g;
        self.h = h;
        self.f = g + h;
        self.parent = parent;
    }

    /// Grid position of the node.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Cost of the best known route from the start.
    #[inline]
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Estimated remaining cost to the goal.
    #[inline]
    pub fn h(&self) -> f64 {
        self.h
    }

    /// `g + h`, the key the open set is ordered by.
    #[inline]
    pub fn f(&self) -> f64 {
        self.f
    }

    /// Whether the node has been discovered and not yet expanded.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the node has been expanded.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the node carries no state from any search.
    pub fn is_pristine(&self) -> bool {
        *self == Self::new(self.pos)
    }
}

/// Queue entry: a node index and the `f` it was pushed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
}

impl NodeRef {
    /// Three-way comparison by `f`, the open set's ordering.
    #[inline]
    pub(crate) fn by_f(a: &NodeRef, b: &NodeRef) -> std::cmp::Ordering {
        a.f.total_cmp(&b.f)
    }
}

// ---------------------------------------------------------------------------
// NodeArena
// ---------------------------------------------------------------------------

/// Flat storage for every node of a grid plus the list of nodes touched by
/// the last search.
///
/// Rows may differ in length, so `offsets[r]` holds the index of the first
/// node of row `r` and `offsets[height]` the total node count.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena {
    nodes: Vec<SearchNode>,
    offsets: Vec<usize>,
    dirty: Vec<usize>,
}

impl NodeArena {
    pub(crate) fn new(grid: &Grid) -> Self {
        let mut nodes = Vec::with_capacity(grid.len());
        let mut offsets = Vec::with_capacity(grid.height() + 1);
        for (r, row) in grid.rows().iter().enumerate() {
            offsets.push(nodes.len());
            nodes.extend(
                (0..row.len()).map(|c| SearchNode::new(Point::new(r as i32, c as i32))),
            );
        }
        offsets.push(nodes.len());
        Self {
            nodes,
            offsets,
            dirty: Vec::new(),
        }
    }

    /// Convert a `Point` to a flat index. Returns `None` if the cell does not
    /// exist.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if p.row < 0 || p.col < 0 {
            return None;
        }
        let (r, c) = (p.row as usize, p.col as usize);
        if r + 1 >= self.offsets.len() {
            return None;
        }
        let start = self.offsets[r];
        if c >= self.offsets[r + 1] - start {
            return None;
        }
        Some(start + c)
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> &SearchNode {
        &self.nodes[idx]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut SearchNode {
        &mut self.nodes[idx]
    }

    /// Remember that `idx` must be reset before the next search.
    #[inline]
    pub(crate) fn touch(&mut self, idx: usize) {
        self.dirty.push(idx);
    }

    /// Reset every node touched since the last call.
    pub(crate) fn reset_dirty(&mut self) {
        for idx in self.dirty.drain(..) {
            self.nodes[idx].reset();
        }
    }

    pub(crate) fn dirty_len(&self) -> usize {
        self.dirty.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jagged_indexing() {
        let grid = Grid::new(vec![vec![0, 0, 0], vec![0], vec![], vec![0, 1]]);
        let arena = NodeArena::new(&grid);
        assert_eq!(arena.len(), 6);
        assert_eq!(arena.idx(Point::new(0, 2)), Some(2));
        assert_eq!(arena.idx(Point::new(1, 0)), Some(3));
        assert_eq!(arena.idx(Point::new(1, 1)), None);
        assert_eq!(arena.idx(Point::new(2, 0)), None);
        assert_eq!(arena.idx(Point::new(3, 1)), Some(5));
        assert_eq!(arena.idx(Point::new(4, 0)), None);
        assert_eq!(arena.idx(Point::new(-1, 0)), None);
        for p in grid.cells() {
            let i = arena.idx(p).unwrap();
            assert_eq!(arena.get(i).pos(), p);
        }
    }

    #[test]
    fn reset_dirty_restores_touched_nodes() {
        let grid = Grid::new(vec![vec![0, 0], vec![0, 0]]);
        let mut arena = NodeArena::new(&grid);
        {
            let n = arena.get_mut(1);
            n.set_route(2.0, 3.0, Some(0));
            n.open = true;
            n.closed = true;
        }
        arena.touch(1);
        assert_eq!(arena.get(1).f(), 5.0);
        assert!(!arena.get(1).is_pristine());

        arena.reset_dirty();
        assert_eq!(arena.dirty_len(), 0);
        assert!(arena.iter().all(SearchNode::is_pristine));
        assert_eq!(arena.get(1).pos(), Point::new(0, 1));
    }

    #[test]
    fn node_ref_orders_by_f() {
        let a = NodeRef { idx: 9, f: 1.4 };
        let b = NodeRef { idx: 0, f: 2.0 };
        assert_eq!(NodeRef::by_f(&a, &b), std::cmp::Ordering::Less);
        assert_eq!(NodeRef::by_f(&b, &a), std::cmp::Ordering::Greater);
    }
}

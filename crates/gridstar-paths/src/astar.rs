use gridstar_core::{Grid, Point};
use gridstar_heap::MinHeap;

use crate::config::{OpenUpdate, SearchConfig};
use crate::error::{InvalidReason, SearchError};
use crate::neighbors::Neighbors;
use crate::node::{NodeArena, NodeRef, SearchNode};

/// Counters describing the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes popped from the open set and closed.
    pub expanded: usize,
    /// Entries pushed onto the open set.
    pub pushed: usize,
    /// Entries popped for nodes that were already closed.
    pub stale: usize,
    /// Number of steps in the returned path, if one was found.
    pub path_len: Option<usize>,
}

/// A* search engine bound to one grid.
///
/// The engine owns one [`SearchNode`] per grid cell. Nodes are allocated by
/// the constructor and recycled between searches: only the nodes a search
/// touched are reset before the next one starts, so repeated queries cost
/// nothing proportional to the grid size.
#[derive(Debug, Clone)]
pub struct AStar {
    grid: Grid,
    config: SearchConfig,
    arena: NodeArena,
    nbuf: Neighbors,
    stats: SearchStats,
}

impl AStar {
    /// Create an engine for `grid` with the default [`SearchConfig`].
    pub fn new(grid: Grid) -> Self {
        Self::build(grid, SearchConfig::default())
    }

    /// Create an engine for `grid` using `config`.
    pub fn with_config(grid: Grid, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self::build(grid, config))
    }

    fn build(grid: Grid, config: SearchConfig) -> Self {
        let arena = NodeArena::new(&grid);
        log::debug!(
            "astar: {} nodes for {}x{} grid",
            arena.len(),
            grid.height(),
            grid.width()
        );
        Self {
            grid,
            config,
            arena,
            nbuf: Neighbors::new(),
            stats: SearchStats::default(),
        }
    }

    /// The grid being searched.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Counters from the most recent successful call to
    /// [`find_path`](Self::find_path).
    #[inline]
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Search state of the node at `p`, if the cell exists.
    pub fn node(&self, p: Point) -> Option<&SearchNode> {
        self.arena.idx(p).map(|i| self.arena.get(i))
    }

    /// Every node, row by row.
    pub fn nodes(&self) -> impl Iterator<Item = &SearchNode> {
        self.arena.iter()
    }

    /// Give the grid back, dropping the node arena.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// [`find_path`](Self::find_path) taking raw `(row, col)` coordinates.
    pub fn find_path_rc(
        &mut self,
        start_row: i32,
        start_col: i32,
        end_row: i32,
        end_col: i32,
    ) -> Result<Option<Vec<Point>>, SearchError> {
        self.find_path(
            Point::new(start_row, start_col),
            Point::new(end_row, end_col),
        )
    }

    /// Compute a path from `start` to `goal` with 8-directional movement.
    ///
    /// On success the path lists every cell stepped on after `start`, ending
    /// with `goal`; it is empty when `start == goal`. `Ok(None)` means the
    /// goal cannot be reached.
    ///
    /// Fails with [`SearchError::InvalidPosition`] if either endpoint is
    /// outside the grid or blocked. Node state is left untouched in that
    /// case.
    pub fn find_path(
        &mut self,
        start: Point,
        goal: Point,
    ) -> Result<Option<Vec<Point>>, SearchError> {
        let start_idx = self.passable_idx(start)?;
        let goal_idx = self.passable_idx(goal)?;

        let touched = self.arena.dirty_len();
        self.arena.reset_dirty();
        log::trace!("astar: reset {touched} nodes");
        self.stats = SearchStats::default();

        let mut open = MinHeap::with_comparator(NodeRef::by_f);

        {
            let h = self.config.heuristic.estimate(start, goal, &self.config);
            let node = self.arena.get_mut(start_idx);
            node.set_route(0.0, h, None);
            node.open = true;
            self.arena.touch(start_idx);
            open.push(NodeRef { idx: start_idx, f: h });
            self.stats.pushed += 1;
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            if open.is_empty() {
                break 'search false;
            }
            let current = open.pop()?;
            let ci = current.idx;

            if self.arena.get(ci).closed {
                self.stats.stale += 1;
                continue;
            }

            let cn = self.arena.get_mut(ci);
            cn.open = false;
            cn.closed = true;
            let current_g = cn.g;
            let current_point = cn.pos();
            self.stats.expanded += 1;
            log::trace!("astar: expand {current_point} g={current_g:.1} f={:.1}", current.f);

            if ci == goal_idx {
                break 'search true;
            }

            let grid = &self.grid;
            for &np in nbuf.all(current_point, |p| grid.is_passable(p)) {
                let Some(ni) = self.arena.idx(np) else {
                    continue;
                };
                if self.arena.get(ni).closed {
                    continue;
                }

                let g = current_g + self.config.step_cost(current_point, np);
                let h = self.config.heuristic.estimate(np, goal, &self.config);

                let n = self.arena.get_mut(ni);
                if n.open {
                    if g + h >= n.f {
                        continue;
                    }
                    n.set_route(g, h, Some(ci));
                    if self.config.open_update == OpenUpdate::Reinsert {
                        open.push(NodeRef { idx: ni, f: n.f });
                        self.stats.pushed += 1;
                    }
                } else {
                    n.set_route(g, h, Some(ci));
                    n.open = true;
                    open.push(NodeRef { idx: ni, f: n.f });
                    self.stats.pushed += 1;
                    self.arena.touch(ni);
                }
            }
        };

        self.nbuf = nbuf;

        if !found {
            log::debug!(
                "astar: no path {start} -> {goal} (expanded {}, pushed {})",
                self.stats.expanded,
                self.stats.pushed
            );
            return Ok(None);
        }

        let path = self.path_to(goal_idx);
        self.stats.path_len = Some(path.len());
        log::debug!(
            "astar: {start} -> {goal} in {} steps, cost {:.1} (expanded {}, pushed {}, stale {})",
            path.len(),
            self.arena.get(goal_idx).g,
            self.stats.expanded,
            self.stats.pushed,
            self.stats.stale
        );
        Ok(Some(path))
    }

    /// Index of `p`, provided it exists and is passable.
    fn passable_idx(&self, p: Point) -> Result<usize, SearchError> {
        let reason = match self.arena.idx(p) {
            Some(i) if self.grid.is_passable(p) => return Ok(i),
            Some(_) => InvalidReason::Blocked,
            None => InvalidReason::OutOfBounds,
        };
        log::warn!("astar: rejected position {p}: {reason}");
        Err(SearchError::InvalidPosition { pos: p, reason })
    }

    /// Walk parent links back from `idx`, excluding the start node.
    fn path_to(&self, idx: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut node = self.arena.get(idx);
        while let Some(parent) = node.parent {
            path.push(node.pos());
            node = self.arena.get(parent);
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Heuristic;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn maze() -> Grid {
        Grid::new(vec![
            vec![0, 0, 0, 0, 0, 1, 0, 0, 0, 0],
            vec![0, 1, 1, 0, 0, 1, 0, 0, 0, 0],
            vec![0, 1, 1, 0, 0, 1, 0, 0, 0, 0],
            vec![0, 1, 0, 0, 0, 1, 0, 0, 0, 0],
            vec![0, 1, 0, 1, 1, 1, 0, 0, 1, 0],
            vec![0, 1, 0, 1, 0, 0, 0, 0, 1, 0],
            vec![0, 1, 0, 1, 0, 1, 1, 1, 1, 0],
            vec![0, 1, 0, 1, 0, 1, 0, 0, 0, 0],
            vec![0, 1, 0, 1, 0, 1, 0, 0, 0, 0],
            vec![0, 1, 0, 0, 0, 1, 0, 0, 0, 0],
        ])
    }

    fn pts(cells: &[(i32, i32)]) -> Vec<Point> {
        cells.iter().copied().map(Point::from).collect()
    }

    /// Check every structural property a returned path must have.
    fn assert_valid_path(grid: &Grid, start: Point, goal: Point, path: &[Point]) {
        let mut seen = HashSet::new();
        seen.insert(start);
        let mut prev = start;
        for &p in path {
            assert!(grid.is_passable(p), "{p} is not passable");
            assert!(prev.is_adjacent(p), "{prev} -> {p} is not a single step");
            assert!(seen.insert(p), "{p} visited twice");
            prev = p;
        }
        if start == goal {
            assert!(path.is_empty());
        } else {
            assert_eq!(path.last(), Some(&goal));
        }
    }

    #[test]
    fn maze_path() {
        let grid = maze();
        let mut astar = AStar::new(grid.clone());
        let start = Point::new(9, 0);
        let goal = Point::new(9, 9);
        let path = astar.find_path(start, goal).unwrap().expect("maze is solvable");

        assert_valid_path(&grid, start, goal, &path);
        assert_eq!(path[0], Point::new(8, 0));
        assert_eq!(path.len(), 32);
        assert!(path.len() <= grid.passable_count());
        let cost = astar.config().path_cost(start, &path);
        assert!((cost - 35.6).abs() < 1e-9, "cost {cost}");

        let stats = astar.last_stats();
        assert_eq!(stats.path_len, Some(32));
        assert!(stats.expanded <= grid.passable_count());
    }

    #[test]
    fn four_int_form_matches_points() {
        let mut astar = AStar::new(maze());
        let a = astar.find_path_rc(9, 0, 9, 9).unwrap();
        let b = astar.find_path(Point::new(9, 0), Point::new(9, 9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn repeated_searches_are_identical() {
        let mut astar = AStar::new(maze());
        let start = Point::new(9, 0);
        let goal = Point::new(9, 9);
        let first = astar.find_path(start, goal).unwrap();
        // Dirty the arena with unrelated searches in between.
        astar.find_path_rc(0, 9, 9, 4).unwrap();
        astar.find_path_rc(5, 4, 5, 4).unwrap();
        let again = astar.find_path(start, goal).unwrap();
        assert_eq!(first, again);
        assert_eq!(astar.find_path(start, goal).unwrap(), first);
    }

    #[test]
    fn reused_engine_matches_fresh_engine() {
        let grid = maze();
        let mut rng = StdRng::seed_from_u64(5);
        let open: Vec<Point> = grid.cells().filter(|&p| grid.is_passable(p)).collect();
        let mut reused = AStar::new(grid.clone());
        for _ in 0..50 {
            let s = open[rng.random_range(0..open.len())];
            let g = open[rng.random_range(0..open.len())];
            let mut fresh = AStar::new(grid.clone());
            assert_eq!(reused.find_path(s, g).unwrap(), fresh.find_path(s, g).unwrap());
        }
    }

    #[test]
    fn reset_only_touches_dirty_nodes() {
        let grid = Grid::new(vec![vec![0; 8]; 8]);
        let mut astar = AStar::new(grid);
        astar.find_path_rc(0, 0, 0, 3).unwrap();
        assert!(astar.node(Point::new(0, 0)).unwrap().is_closed());
        assert!(astar.node(Point::new(7, 7)).unwrap().is_pristine());

        // A search elsewhere clears everything the first one left behind.
        astar.find_path_rc(7, 7, 7, 7).unwrap();
        assert!(astar.node(Point::new(0, 0)).unwrap().is_pristine());
        assert!(astar.node(Point::new(0, 3)).unwrap().is_pristine());
        let busy = astar.nodes().filter(|n| !n.is_pristine()).count();
        assert_eq!(busy, 1);
    }

    #[test]
    fn single_cell_start_is_goal() {
        let mut astar = AStar::new(Grid::new(vec![vec![0]]));
        assert_eq!(astar.find_path_rc(0, 0, 0, 0), Ok(Some(Vec::new())));
        assert_eq!(astar.last_stats().path_len, Some(0));
    }

    #[test]
    fn adjacent_goal_is_one_step() {
        let mut astar = AStar::new(Grid::new(vec![vec![0, 0], vec![0, 0]]));
        assert_eq!(astar.find_path_rc(0, 0, 1, 1), Ok(Some(pts(&[(1, 1)]))));
        assert_eq!(astar.find_path_rc(1, 1, 1, 0), Ok(Some(pts(&[(1, 0)]))));
    }

    #[test]
    fn enclosed_goal_has_no_path() {
        let grid = Grid::new(vec![
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 0, 0],
            vec![0, 1, 0, 1, 0, 0],
            vec![0, 1, 1, 1, 0, 0],
            vec![0, 0, 0, 0, 0, 0],
        ]);
        let mut astar = AStar::new(grid.clone());
        assert_eq!(astar.find_path_rc(0, 0, 2, 2), Ok(None));
        assert_eq!(astar.last_stats().path_len, None);
        // Every reachable cell was expanded exactly once.
        assert_eq!(astar.last_stats().expanded, grid.passable_count() - 1);
        // And the walled-in cell cannot get out either.
        assert_eq!(astar.find_path_rc(2, 2, 4, 5), Ok(None));
    }

    #[test]
    fn diagonal_squeeze_is_allowed() {
        // Diagonal steps may cut between two walls.
        let grid = Grid::new(vec![vec![0, 1], vec![1, 0]]);
        let mut astar = AStar::new(grid);
        assert_eq!(astar.find_path_rc(0, 0, 1, 1), Ok(Some(pts(&[(1, 1)]))));
    }

    #[test]
    fn invalid_positions() {
        let mut astar = AStar::new(maze());
        let blocked = astar.find_path_rc(1, 1, 9, 9).unwrap_err();
        assert_eq!(
            blocked,
            SearchError::InvalidPosition {
                pos: Point::new(1, 1),
                reason: InvalidReason::Blocked
            }
        );
        let outside = astar.find_path_rc(9, 0, 10, 0).unwrap_err();
        assert_eq!(
            outside,
            SearchError::InvalidPosition {
                pos: Point::new(10, 0),
                reason: InvalidReason::OutOfBounds
            }
        );
        assert!(matches!(
            astar.find_path_rc(-1, 0, 0, 0),
            Err(SearchError::InvalidPosition {
                reason: InvalidReason::OutOfBounds,
                ..
            })
        ));
        assert_eq!(blocked.to_string(), "invalid position (1, 1): blocked");
    }

    #[test]
    fn invalid_position_leaves_state_alone() {
        let mut astar = AStar::new(maze());
        let path = astar.find_path_rc(9, 0, 9, 9).unwrap();
        let before: Vec<SearchNode> = astar.nodes().cloned().collect();
        let stats = astar.last_stats();
        assert!(astar.find_path_rc(9, 0, 0, 5).is_err());
        assert!(astar.nodes().eq(before.iter()));
        assert_eq!(astar.last_stats(), stats);
        assert_eq!(astar.find_path_rc(9, 0, 9, 9).unwrap(), path);
    }

    #[test]
    fn jagged_grid() {
        let grid = Grid::new(vec![vec![0, 0, 0, 0], vec![0], vec![0, 0, 0]]);
        let mut astar = AStar::new(grid.clone());
        let path = astar.find_path_rc(0, 3, 2, 2).unwrap().unwrap();
        assert_valid_path(&grid, Point::new(0, 3), Point::new(2, 2), &path);
        // (1, 1) is past the end of row 1 and treated as missing.
        assert!(!path.contains(&Point::new(1, 1)));
        assert!(matches!(
            astar.find_path_rc(0, 0, 1, 2),
            Err(SearchError::InvalidPosition {
                reason: InvalidReason::OutOfBounds,
                ..
            })
        ));
    }

    #[test]
    fn octile_heuristic_finds_cheaper_path() {
        let grid = Grid::new(vec![
            vec![0, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 0],
            vec![0, 1, 0],
            vec![0, 1, 0],
        ]);
        let start = Point::new(0, 0);
        let goal = Point::new(4, 2);

        let mut manhattan = AStar::new(grid.clone());
        let m = manhattan.find_path(start, goal).unwrap().unwrap();
        assert_valid_path(&grid, start, goal, &m);
        assert!((manhattan.config().path_cost(start, &m) - 5.4).abs() < 1e-9);

        let cfg = SearchConfig::default().with_heuristic(Heuristic::Octile);
        let mut octile = AStar::with_config(grid.clone(), cfg).unwrap();
        let o = octile.find_path(start, goal).unwrap().unwrap();
        assert_valid_path(&grid, start, goal, &o);
        assert_eq!(o, pts(&[(1, 0), (2, 1), (3, 2), (4, 2)]));
        assert!((octile.config().path_cost(start, &o) - 4.8).abs() < 1e-9);
    }

    #[test]
    fn in_place_update_keeps_stale_key() {
        let grid = Grid::new(vec![
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 1, 0],
            vec![0, 0, 0, 0, 1, 0],
        ]);
        let start = Point::new(0, 0);
        let goal = Point::new(3, 5);

        let mut reinsert = AStar::new(grid.clone());
        let r = reinsert.find_path(start, goal).unwrap().unwrap();
        assert_valid_path(&grid, start, goal, &r);
        assert!((reinsert.config().path_cost(start, &r) - 6.8).abs() < 1e-9);

        let cfg = SearchConfig::default().with_open_update(OpenUpdate::InPlace);
        let mut in_place = AStar::with_config(grid.clone(), cfg).unwrap();
        let i = in_place.find_path(start, goal).unwrap().unwrap();
        assert_valid_path(&grid, start, goal, &i);
        assert!((in_place.config().path_cost(start, &i) - 7.6).abs() < 1e-9);
        // Every node is queued at most once.
        assert_eq!(in_place.last_stats().stale, 0);
    }

    #[test]
    fn octile_reinsert_is_optimal_on_open_grid() {
        let cfg = SearchConfig::default().with_heuristic(Heuristic::Octile);
        let mut astar = AStar::with_config(Grid::new(vec![vec![0; 12]; 12]), cfg).unwrap();
        let start = Point::new(0, 0);
        let goal = Point::new(7, 11);
        let path = astar.find_path(start, goal).unwrap().unwrap();
        assert_eq!(path.len(), 11);
        assert!((astar.config().path_cost(start, &path) - (7.0 * 1.4 + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn random_grids_give_valid_paths() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let h = rng.random_range(1..12);
            let rows: Vec<Vec<i32>> = (0..h)
                .map(|_| {
                    let w = rng.random_range(1..12);
                    (0..w).map(|_| i32::from(rng.random_range(0..4) == 0)).collect()
                })
                .collect();
            let grid = Grid::new(rows);
            let open: Vec<Point> = grid.cells().filter(|&p| grid.is_passable(p)).collect();
            if open.is_empty() {
                continue;
            }
            let s = open[rng.random_range(0..open.len())];
            let g = open[rng.random_range(0..open.len())];
            let mut astar = AStar::new(grid.clone());
            if let Some(path) = astar.find_path(s, g).unwrap() {
                assert_valid_path(&grid, s, g, &path);
            }
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = SearchConfig {
            orthogonal_cost: -1.0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            AStar::with_config(maze(), cfg),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AStar>();
    }
}

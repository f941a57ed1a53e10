//! A* shortest paths on passability grids.
//!
//! [`AStar`] owns one search node per grid cell and reuses them across
//! queries: before each search only the nodes the previous search touched
//! are reset. Movement is 8-directional, with separate costs for straight
//! and diagonal steps (see [`SearchConfig`]).
//!
//! ```
//! use gridstar_core::{Grid, Point};
//! use gridstar_paths::AStar;
//!
//! let grid: Grid = "0 0 0\n1 1 0\n0 0 0".parse().unwrap();
//! let mut astar = AStar::new(grid);
//! let path = astar.find_path(Point::new(0, 0), Point::new(2, 0)).unwrap();
//! assert_eq!(path.map(|p| p.len()), Some(4));
//! ```
//!
//! # Open-set updates
//!
//! When a cheaper route to an already queued node is found, the default
//! [`OpenUpdate::Reinsert`] queues the node again under its new key and
//! ignores the outdated entry later. [`OpenUpdate::InPlace`] only rewrites
//! the node, leaving its queue position based on the old key.
//!
//! # Heuristics
//!
//! [`Heuristic::Manhattan`] is the default. With diagonal steps cheaper than
//! two straight ones it overestimates, so returned paths are not always the
//! cheapest. [`Heuristic::Octile`] never overestimates and restores the
//! optimality guarantee.

mod astar;
mod config;
mod distance;
mod error;
mod neighbors;
mod node;

pub use astar::{AStar, SearchStats};
pub use config::{
    ConfigError, DIAGONAL_COST, Heuristic, ORTHOGONAL_COST, OpenUpdate, SearchConfig,
};
pub use distance::{chebyshev, manhattan, octile};
pub use error::{InvalidReason, SearchError};
pub use neighbors::Neighbors;
pub use node::SearchNode;

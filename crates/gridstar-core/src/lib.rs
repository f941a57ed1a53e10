//! **gridstar-core** — core types for grid path search.
//!
//! This crate provides the shared vocabulary of the *gridstar* workspace:
//! `(row, col)` geometry primitives and the immutable passability [`Grid`]
//! that searches run against.

pub mod geom;
pub mod grid;

pub use geom::{Point, Range, RangeIter};
pub use grid::{Grid, GridError, PASSABLE};

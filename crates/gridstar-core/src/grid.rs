//! The [`Grid`] type: a table of passable and blocked cells.
//!
//! A grid is built from rows of integer markers. Cells whose marker equals
//! the grid's passable marker ([`PASSABLE`] by default) can be walked on,
//! every other value is a wall. Rows may have different lengths; looking up
//! a cell past the end of its row behaves like looking up a cell outside
//! the grid.

use std::str::FromStr;

use thiserror::Error;

use crate::geom::{Point, Range};

/// Default marker for passable cells.
pub const PASSABLE: i32 = 0;

/// Errors raised while building a [`Grid`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A token could not be read as an integer marker.
    #[error("invalid marker {token:?} at ({row}, {col})")]
    InvalidMarker {
        row: usize,
        col: usize,
        token: String,
    },
}

/// An immutable passability grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    rows: Vec<Vec<i32>>,
    passable: i32,
}

impl Grid {
    /// Create a grid where [`PASSABLE`] marks walkable cells.
    pub fn new(rows: Vec<Vec<i32>>) -> Self {
        Self::with_marker(rows, PASSABLE)
    }

    /// Create a grid where `passable` marks walkable cells.
    pub fn with_marker(rows: Vec<Vec<i32>>, passable: i32) -> Self {
        Self { rows, passable }
    }

    /// The marker that denotes a passable cell.
    #[inline]
    pub fn passable_marker(&self) -> i32 {
        self.passable
    }

    /// Raw marker rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<i32>] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Length of row `row`, or 0 if there is no such row.
    #[inline]
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Bounding rectangle of the grid. Jagged grids may have holes in it.
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.height() as i32, self.width() as i32)
    }

    /// Marker stored at `p`, or `None` if the cell does not exist.
    #[inline]
    pub fn marker(&self, p: Point) -> Option<i32> {
        if p.row < 0 || p.col < 0 {
            return None;
        }
        self.rows
            .get(p.row as usize)
            .and_then(|r| r.get(p.col as usize))
            .copied()
    }

    /// Whether the cell at `p` exists.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.marker(p).is_some()
    }

    /// Whether the cell at `p` exists and is passable.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.marker(p) == Some(self.passable)
    }

    /// Every existing cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            (0..row.len()).map(move |c| Point::new(r as i32, c as i32))
        })
    }

    /// Total number of existing cells.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Whether the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of passable cells.
    pub fn passable_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&m| m == self.passable)
            .count()
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parse whitespace-separated integer markers, one row per non-empty
    /// line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for line in s.lines().filter(|l| !l.trim().is_empty()) {
            let row_idx = rows.len();
            let row = line
                .split_whitespace()
                .enumerate()
                .map(|(col, token)| {
                    token.parse::<i32>().map_err(|_| GridError::InvalidMarker {
                        row: row_idx,
                        col,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Ok(Self::new(rows))
    }
}

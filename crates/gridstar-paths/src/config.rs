//! Search configuration.

use gridstar_core::Point;
use thiserror::Error;

use crate::distance;

/// Default cost of a horizontal or vertical step.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Default cost of a diagonal step (an approximation of √2).
pub const DIAGONAL_COST: f64 = 1.4;

/// Remaining-cost estimate used to order the open set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Heuristic {
    /// Row difference plus column difference. Overestimates when diagonal
    /// steps are cheaper than two straight ones, so paths may be suboptimal.
    #[default]
    Manhattan,
    /// Larger of row and column difference.
    Chebyshev,
    /// Exact cost of an unobstructed 8-directional route. Admissible.
    Octile,
}

impl Heuristic {
    /// Estimate the cost from `from` to `to` under `config`'s step costs.
    pub fn estimate(self, from: Point, to: Point, config: &SearchConfig) -> f64 {
        match self {
            Self::Manhattan => f64::from(distance::manhattan(from, to)) * config.orthogonal_cost,
            Self::Chebyshev => f64::from(distance::chebyshev(from, to)) * config.orthogonal_cost,
            Self::Octile => {
                distance::octile(from, to, config.orthogonal_cost, config.diagonal_cost)
            }
        }
    }
}

/// What happens to an open node's queue entry when a cheaper route to it is
/// found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OpenUpdate {
    /// Push a second entry under the improved key. The older entry is
    /// discarded when it surfaces, since the node is closed by then.
    #[default]
    Reinsert,
    /// Rewrite the node's costs and parent but leave its queue entry under
    /// the old key. The node may then be expanded later than it should.
    InPlace,
}

/// Errors raised by [`SearchConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A step cost is not a finite positive number.
    #[error("{name} must be finite and positive, got {value}")]
    InvalidCost { name: &'static str, value: f64 },
}

/// Tunables for [`AStar`](crate::AStar).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Cost of a step that changes only the row or only the column.
    pub orthogonal_cost: f64,
    /// Cost of a step that changes both row and column.
    pub diagonal_cost: f64,
    pub heuristic: Heuristic,
    pub open_update: OpenUpdate,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            orthogonal_cost: ORTHOGONAL_COST,
            diagonal_cost: DIAGONAL_COST,
            heuristic: Heuristic::default(),
            open_update: OpenUpdate::default(),
        }
    }
}

impl SearchConfig {
    /// Use `heuristic` instead of the current one.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Use `open_update` instead of the current one.
    pub fn with_open_update(mut self, open_update: OpenUpdate) -> Self {
        self.open_update = open_update;
        self
    }

    /// Check that both step costs are finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("orthogonal_cost", self.orthogonal_cost),
            ("diagonal_cost", self.diagonal_cost),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidCost { name, value });
            }
        }
        Ok(())
    }

    /// Cost of stepping from `from` to the adjacent cell `to`.
    #[inline]
    pub fn step_cost(&self, from: Point, to: Point) -> f64 {
        if from.is_diagonal_to(to) {
            self.diagonal_cost
        } else {
            self.orthogonal_cost
        }
    }

    /// Total cost of walking `path` starting from `start`.
    pub fn path_cost(&self, start: Point, path: &[Point]) -> f64 {
        let mut prev = start;
        let mut total = 0.0;
        for &p in path {
            total += self.step_cost(prev, p);
            prev = p;
        }
        total
    }
}

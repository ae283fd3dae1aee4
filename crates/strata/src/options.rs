//! Algorithm knobs.
//!
//! Drawing attributes (orientation, separations, spline mode) live on
//! [`GraphAttrs`](crate::model::GraphAttrs). This module holds the settings that bound the
//! optimization loops and pick between interchangeable strategies.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordinateStrategy {
    /// Auxiliary-graph balancing solved with network simplex.
    #[default]
    NetworkSimplex,
    /// Iterative median placement in priority order.
    Priority,
}

static DEFAULT_COORDINATE_STRATEGY: OnceLock<CoordinateStrategy> = OnceLock::new();

/// Sets the process-wide coordinate strategy used when [`LayoutOptions::coordinate`] is unset.
///
/// Only the first call has an effect. Returns `false` when a default was already set.
pub fn set_default_coordinate_strategy(strategy: CoordinateStrategy) -> bool {
    DEFAULT_COORDINATE_STRATEGY.set(strategy).is_ok()
}

pub fn default_coordinate_strategy() -> CoordinateStrategy {
    DEFAULT_COORDINATE_STRATEGY
        .get()
        .copied()
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Overrides the process-wide default strategy for this call.
    pub coordinate: Option<CoordinateStrategy>,
    /// Pivot budget per network-simplex solve.
    pub nslimit: usize,
    /// Down/up sweep pairs per ordering restart.
    pub max_iterations: usize,
    /// Number of initial-order variants tried by the crossing minimizer.
    pub restarts: usize,
    /// Down/up/down pass groups of the priority method.
    pub priority_passes: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            coordinate: None,
            nslimit: 10_000,
            max_iterations: 24,
            restarts: 3,
            priority_passes: 4,
        }
    }
}

impl LayoutOptions {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.restarts == 0 {
            return Err(crate::Error::InvalidOption {
                name: "restarts",
                reason: "at least one ordering restart is required".to_string(),
            });
        }
        if self.nslimit == 0 {
            return Err(crate::Error::InvalidOption {
                name: "nslimit",
                reason: "network simplex needs a positive pivot budget".to_string(),
            });
        }
        Ok(())
    }

    pub fn coordinate_strategy(&self) -> CoordinateStrategy {
        self.coordinate.unwrap_or_else(default_coordinate_strategy)
    }
}

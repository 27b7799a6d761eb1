//! Edge weight model and the per-edge weight table.
//!
//! # Rules
//!
//! Evaluated in priority order for each half-edge:
//!
//! | Path type                 | Cost                                           |
//! |---------------------------|------------------------------------------------|
//! | `Waterway`                | infeasible, in every mode                      |
//! | `Stairs`, `SteepFootway`  | length × `stairs_factor` (step-free: × `step_free_stairs_factor`) |
//! | `Footway`                 | length                                         |
//! | `Elevator`                | `elevator_cost`, independent of length         |
//! | anything else             | length × `road_factor`                         |
//!
//! Infeasible edges carry `None` and are skipped by the router rather than
//! given a huge finite cost.  Stairs in step-free mode stay finite: a route
//! over stairs is still returned when nothing else connects.

use tracing::debug;

use wf_core::{AccessibilityMode, EdgeId, PathType, RoutingConfig};

use crate::network::WalkNetwork;

/// Cost of traversing one edge, or `None` if the edge is never traversable.
pub fn edge_weight(
    path_type: PathType,
    length_m:  f64,
    mode:      AccessibilityMode,
    config:    &RoutingConfig,
) -> Option<f64> {
    match path_type {
        PathType::Waterway => None,
        PathType::Stairs | PathType::SteepFootway => {
            let factor = if mode.avoids_steps() {
                config.step_free_stairs_factor
            } else {
                config.stairs_factor
            };
            Some(length_m * factor)
        }
        PathType::Footway => Some(length_m),
        PathType::Elevator => Some(config.elevator_cost),
        PathType::ServiceRoad | PathType::Road => Some(length_m * config.road_factor),
    }
}

// ── EdgeWeights ───────────────────────────────────────────────────────────────

/// Weight annotations for every half-edge of one [`WalkNetwork`].
///
/// Indexed by `EdgeId`.  The table is the only thing that changes when the
/// accessibility mode toggles; the topology it annotates is shared and
/// never rebuilt.
#[derive(Clone, Debug)]
pub struct EdgeWeights {
    weights: Vec<Option<f64>>,
    mode:    AccessibilityMode,
    config:  RoutingConfig,
}

impl EdgeWeights {
    /// Evaluate the weight model over every edge of `network`.
    pub fn new(network: &WalkNetwork, mode: AccessibilityMode, config: RoutingConfig) -> Self {
        let mut table = Self { weights: Vec::new(), mode, config };
        table.recompute(network);
        table
    }

    /// Current cost of `edge`; `None` means infeasible.
    #[inline]
    pub fn get(&self, edge: EdgeId) -> Option<f64> {
        self.weights[edge.index()]
    }

    pub fn mode(&self) -> AccessibilityMode {
        self.mode
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Switch accessibility mode, rewriting the table in place.
    ///
    /// Returns `false` (and does nothing) if the mode is unchanged.
    pub fn reweigh(&mut self, network: &WalkNetwork, mode: AccessibilityMode) -> bool {
        if mode == self.mode && self.weights.len() == network.edge_count() {
            return false;
        }
        self.mode = mode;
        self.recompute(network);
        true
    }

    /// Replace the tuning constants and re-evaluate every edge.
    pub fn reconfigure(&mut self, network: &WalkNetwork, config: RoutingConfig) {
        self.config = config;
        self.recompute(network);
    }

    fn recompute(&mut self, network: &WalkNetwork) {
        self.weights.clear();
        self.weights.extend(
            network
                .edge_path_type
                .iter()
                .zip(&network.edge_length_m)
                .map(|(&ty, &len)| edge_weight(ty, len, self.mode, &self.config)),
        );
        debug!(edges = self.weights.len(), mode = ?self.mode, "re-evaluated edge weights");
    }
}

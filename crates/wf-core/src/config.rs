//! Routing configuration.
//!
//! # Design
//!
//! Every tuning constant of the weight model lives here rather than inline in
//! the router, so applications can override them from a JSON file without
//! rebuilding.  The defaults reproduce the campus deployment:
//!
//! | Field                      | Default | Applies to                   |
//! |----------------------------|---------|------------------------------|
//! | `stairs_factor`            | 1.5     | stairs, standard mode        |
//! | `step_free_stairs_factor`  | 1000.0  | stairs, step-free mode       |
//! | `road_factor`              | 2.0     | service and generic roads    |
//! | `elevator_cost`            | 30.0    | elevator connectors (flat)   |
//! | `walking_speed_mps`        | 1.4     | cost → time conversion       |
//! | `weld_tolerance_m`         | 0.0     | loader vertex merging        |
//! | `entry_tolerance_m`        | 0.0     | place entry-point lookup     |

use crate::{WfError, WfResult};

/// Weight-model and loader tuning.
///
/// Typically left at [`Default`] or loaded from a JSON file by the
/// application crate and passed to the loader and session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Multiplier on stair length when steps are allowed.
    pub stairs_factor: f64,

    /// Multiplier on stair length in step-free mode.  Large but finite, so a
    /// route still exists when stairs are the only connection.
    pub step_free_stairs_factor: f64,

    /// Multiplier on road length (walking alongside vehicle traffic).
    pub road_factor: f64,

    /// Flat cost of one elevator connector, independent of its length.
    pub elevator_cost: f64,

    /// Assumed walking speed used to turn route cost into seconds.
    pub walking_speed_mps: f64,

    /// Coordinates closer than this are merged into one vertex while loading.
    /// `0.0` merges only identical coordinates.
    pub weld_tolerance_m: f64,

    /// A place entry point farther than this from every vertex is skipped.
    /// `0.0` requires the entry to sit on a vertex (to 1e-7 degrees).
    pub entry_tolerance_m: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            stairs_factor:           1.5,
            step_free_stairs_factor: 1000.0,
            road_factor:             2.0,
            elevator_cost:           30.0,
            walking_speed_mps:       1.4,
            weld_tolerance_m:        0.0,
            entry_tolerance_m:       0.0,
        }
    }
}

impl RoutingConfig {
    /// Reject values that would break Dijkstra (negative or non-finite
    /// weights) or the time estimate (non-positive speed).
    pub fn validate(&self) -> WfResult<()> {
        let factors = [
            ("stairs_factor", self.stairs_factor),
            ("step_free_stairs_factor", self.step_free_stairs_factor),
            ("road_factor", self.road_factor),
            ("elevator_cost", self.elevator_cost),
            ("weld_tolerance_m", self.weld_tolerance_m),
            ("entry_tolerance_m", self.entry_tolerance_m),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(WfError::Config(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if !self.walking_speed_mps.is_finite() || self.walking_speed_mps <= 0.0 {
            return Err(WfError::Config(format!(
                "walking_speed_mps must be > 0, got {}",
                self.walking_speed_mps
            )));
        }
        Ok(())
    }

    /// Seconds needed to walk a route of the given cost.
    #[inline]
    pub fn walking_secs(&self, cost: f64) -> f64 {
        cost / self.walking_speed_mps
    }
}

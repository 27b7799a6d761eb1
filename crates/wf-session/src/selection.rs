//! Pick-mode state machine for "choose a point on the map".
//!
//! | From                 | Toggle start   | Toggle destination   |
//! |----------------------|----------------|----------------------|
//! | `Idle`               | `PickingStart` | `PickingDestination` |
//! | `PickingStart`       | `Idle`         | `PickingDestination` |
//! | `PickingDestination` | `PickingStart` | `Idle`               |
//!
//! A click while picking assigns the matching end and returns to `Idle`.  A
//! click while `Idle` is not consumed and belongs to whatever else handles
//! map clicks.

use tracing::debug;

use wf_core::Coordinate;
use wf_spatial::WalkNetwork;

use crate::endpoint::{Endpoint, Target};
use crate::error::RoutingError;
use crate::place::PlaceCatalog;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PickMode {
    #[default]
    Idle,
    PickingStart,
    PickingDestination,
}

impl PickMode {
    /// The end a click would assign, if any.
    pub fn target(self) -> Option<Target> {
        match self {
            PickMode::Idle => None,
            PickMode::PickingStart => Some(Target::Start),
            PickMode::PickingDestination => Some(Target::Destination),
        }
    }
}

/// A map click after hit-testing: where it landed and the place it hit, if
/// any.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickHit {
    pub position: Coordinate,
    pub place: Option<String>,
}

impl ClickHit {
    pub fn at(position: Coordinate) -> Self {
        Self { position, place: None }
    }

    pub fn on_place(name: impl Into<String>, position: Coordinate) -> Self {
        Self { position, place: Some(name.into()) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Idle: the click is someone else's.
    NotConsumed,
    Assign { target: Target, endpoint: Endpoint },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    mode: PickMode,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> PickMode {
        self.mode
    }

    #[inline]
    pub fn is_picking(&self) -> bool {
        self.mode != PickMode::Idle
    }

    pub fn toggle_pick_start(&mut self) -> PickMode {
        self.mode = match self.mode {
            PickMode::PickingStart => PickMode::Idle,
            _ => PickMode::PickingStart,
        };
        self.mode
    }

    pub fn toggle_pick_destination(&mut self) -> PickMode {
        self.mode = match self.mode {
            PickMode::PickingDestination => PickMode::Idle,
            _ => PickMode::PickingDestination,
        };
        self.mode
    }

    pub fn cancel(&mut self) {
        self.mode = PickMode::Idle;
    }

    /// Dispatch a click.
    ///
    /// A hit on a catalogued place assigns the place.  Anything else, an
    /// unknown name included, is snapped to the nearest routable vertex and
    /// assigned as a bare point.
    ///
    /// # Errors
    ///
    /// [`RoutingError::SnapFailed`] if a bare point cannot be snapped.  The
    /// pick stays pending.
    pub fn on_click(
        &mut self,
        hit:     &ClickHit,
        catalog: &PlaceCatalog,
        network: &WalkNetwork,
    ) -> Result<ClickOutcome, RoutingError> {
        let Some(target) = self.mode.target() else {
            return Ok(ClickOutcome::NotConsumed);
        };

        let place = hit.place.as_deref().and_then(|name| catalog.resolve_by_name(name));
        let endpoint = match place {
            Some(p) => Endpoint::Place(p.clone()),
            None => {
                let node = network
                    .snap(hit.position)
                    .ok_or(RoutingError::SnapFailed(hit.position))?;
                Endpoint::Point(network.position(node))
            }
        };

        debug!(%target, %endpoint, "pick assigned");
        self.mode = PickMode::Idle;
        Ok(ClickOutcome::Assign { target, endpoint })
    }
}

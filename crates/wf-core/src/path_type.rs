//! Edge classification and the accessibility switch shared by the weight
//! model, the loader, and the session.

/// What kind of way an edge was drawn from.
///
/// The classification is fixed at load time; only the weight derived from it
/// changes when [`AccessibilityMode`] toggles.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathType {
    /// Footway, path, pedestrian way, or anything tagged `foot=yes`.
    Footway,
    /// Steps.
    Stairs,
    /// Footway with an incline tag (ramps next to steps).
    SteepFootway,
    /// Service road shared with vehicles.
    ServiceRoad,
    /// Elevator connector between floors or levels.
    Elevator,
    /// Stream or other waterway.  Never traversable.
    Waterway,
    /// Any other line: generic road, unclassified.
    #[default]
    Road,
}

impl PathType {
    /// Every variant, in declaration order.
    pub const ALL: [PathType; 7] = [
        PathType::Footway,
        PathType::Stairs,
        PathType::SteepFootway,
        PathType::ServiceRoad,
        PathType::Elevator,
        PathType::Waterway,
        PathType::Road,
    ];

    /// `true` for types subject to the stair multiplier.
    #[inline]
    pub fn is_stepped(self) -> bool {
        matches!(self, PathType::Stairs | PathType::SteepFootway)
    }

    /// `true` if the edge can never be part of a route.
    #[inline]
    pub fn is_excluded(self) -> bool {
        matches!(self, PathType::Waterway)
    }

    /// Human-readable label, matching the loader's tag vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            PathType::Footway      => "footway",
            PathType::Stairs       => "stairs",
            PathType::SteepFootway => "steep_footway",
            PathType::ServiceRoad  => "service",
            PathType::Elevator     => "elevator",
            PathType::Waterway     => "waterway",
            PathType::Road         => "road",
        }
    }
}

impl std::fmt::Display for PathType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── AccessibilityMode ─────────────────────────────────────────────────────────

/// Step-avoidance switch.  `StepFree` soft-excludes stairs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessibilityMode {
    #[default]
    Standard,
    StepFree,
}

impl AccessibilityMode {
    #[inline]
    pub fn avoids_steps(self) -> bool {
        matches!(self, AccessibilityMode::StepFree)
    }
}

impl From<bool> for AccessibilityMode {
    /// `true` means step-avoiding.
    fn from(step_free: bool) -> Self {
        if step_free {
            AccessibilityMode::StepFree
        } else {
            AccessibilityMode::Standard
        }
    }
}

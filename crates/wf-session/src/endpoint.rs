//! What a start or destination can be.

use std::fmt;

use wf_core::Coordinate;

use crate::place::Place;

/// Which end of a route an action applies to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Start,
    Destination,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Start => "start",
            Target::Destination => "destination",
        })
    }
}

/// A resolved route end: a catalog place or a bare point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint {
    /// Every entry point of the place is a candidate.
    Place(Place),
    /// A single point; snapped to the nearest routable vertex when resolved.
    Point(Coordinate),
}

impl Endpoint {
    /// Candidate coordinates, never empty.
    pub fn candidates(&self) -> &[Coordinate] {
        match self {
            Endpoint::Place(p) => p.entry_points(),
            Endpoint::Point(c) => std::slice::from_ref(c),
        }
    }

    pub fn place(&self) -> Option<&Place> {
        match self {
            Endpoint::Place(p) => Some(p),
            Endpoint::Point(_) => None,
        }
    }

    /// Bare points have no footprint to emphasise.
    pub fn is_highlightable(&self) -> bool {
        self.place().is_some_and(|p| p.highlightable)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Place(p) => f.write_str(p.name()),
            Endpoint::Point(c) => write!(f, "{c}"),
        }
    }
}

/// How the route start is specified.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StartSpec {
    Endpoint(Endpoint),
    /// Follow the live position, snapped to one vertex on every update.
    CurrentPosition,
}

impl From<Endpoint> for StartSpec {
    fn from(e: Endpoint) -> Self {
        StartSpec::Endpoint(e)
    }
}

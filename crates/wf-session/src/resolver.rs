//! Multi-candidate route resolution.
//!
//! A building can be entered from several sides, so a start and a
//! destination each expand to a list of candidate vertices.  The resolver
//! runs one shortest-path query per (start, destination) pair and keeps the
//! cheapest.  Entry counts per place are small, so the full cross product is
//! affordable and always finds the true minimum.
//!
//! # Candidate mapping
//!
//! | Source                   | Vertex lookup                              |
//! |--------------------------|--------------------------------------------|
//! | Place entry point        | exact (`WalkNetwork::node_at`), else nearest within `entry_tolerance_m` |
//! | Bare point               | nearest routable vertex                    |
//! | Live position            | nearest routable vertex                    |
//!
//! Place entries that are not network vertices are skipped with a warning.

use tracing::{debug, warn};

use wf_core::{Coordinate, NodeId, RoutingConfig};
use wf_spatial::{EdgeWeights, Route, Router, SpatialError, WalkNetwork};

use crate::endpoint::{Endpoint, StartSpec, Target};
use crate::error::RoutingError;
use crate::place::{LotClass, Place, PlaceCatalog};

// ── Resolution ────────────────────────────────────────────────────────────────

/// The winning route plus the candidate coordinates it starts and ends at.
///
/// Markers belong at `start` and `destination`: the entry points actually
/// used, not a place centroid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub route: Route,
    pub start: Coordinate,
    pub destination: Coordinate,
}

impl Resolution {
    #[inline]
    pub fn total_cost(&self) -> f64 {
        self.route.total_cost
    }

    pub fn walking_secs(&self, config: &RoutingConfig) -> f64 {
        self.route.walking_secs(config)
    }
}

/// Result of [`auto_select_lot`].
#[derive(Clone, Debug)]
pub struct LotSelection<'a> {
    pub lot: &'a Place,
    pub resolution: Resolution,
}

/// One candidate: the coordinate to report and the vertex to route from.
type Candidate = (Coordinate, NodeId);

// ── Entry points ──────────────────────────────────────────────────────────────

/// Cheapest route over the full cross product of surveyed entry points.
///
/// Both lists are looked up as surveyed entry points; see the module docs.
///
/// # Errors
///
/// - [`RoutingError::MissingEndpoint`] if either list is empty.
/// - [`RoutingError::SnapFailed`] if no coordinate of a list is a vertex.
/// - [`RoutingError::NoRouteFound`] if no pair is connected.
pub fn resolve_best_route<R: Router + ?Sized>(
    network:      &WalkNetwork,
    weights:      &EdgeWeights,
    router:       &R,
    starts:       &[Coordinate],
    destinations: &[Coordinate],
) -> Result<Resolution, RoutingError> {
    let tolerance = weights.config().entry_tolerance_m;
    let from = surveyed(network, starts, tolerance, Target::Start)?;
    let to = surveyed(network, destinations, tolerance, Target::Destination)?;
    best_pair(network, weights, router, &from, &to)
}

/// Route between a start specification and a destination.
///
/// An unset start falls back to the live position when one is known.  The
/// destination is never derived from the live position.  The accessibility
/// mode is whatever `weights` was last evaluated under.
pub fn compute_route<R: Router + ?Sized>(
    network:       &WalkNetwork,
    weights:       &EdgeWeights,
    router:        &R,
    start:         Option<&StartSpec>,
    destination:   Option<&Endpoint>,
    live_position: Option<Coordinate>,
) -> Result<Resolution, RoutingError> {
    let destination = destination.ok_or(RoutingError::MissingEndpoint(Target::Destination))?;

    let from = match (start, live_position) {
        (Some(StartSpec::Endpoint(e)), _) => endpoint_candidates(network, weights, e, Target::Start)?,
        (Some(StartSpec::CurrentPosition) | None, Some(live)) => vec![snapped(network, live)?],
        (Some(StartSpec::CurrentPosition) | None, None) => {
            return Err(RoutingError::MissingEndpoint(Target::Start));
        }
    };
    let to = endpoint_candidates(network, weights, destination, Target::Destination)?;

    best_pair(network, weights, router, &from, &to)
}

/// Pick the student lot whose best entry-to-destination route is cheapest.
///
/// Lots are tried in catalog order; a later lot must be strictly cheaper to
/// displace an earlier one.
///
/// # Errors
///
/// [`RoutingError::NoRouteFound`] if the catalog has no student lots or
/// none of them connects to `destination`.
pub fn auto_select_lot<'a, R: Router + ?Sized>(
    catalog:     &'a PlaceCatalog,
    network:     &WalkNetwork,
    weights:     &EdgeWeights,
    router:      &R,
    destination: &Endpoint,
) -> Result<LotSelection<'a>, RoutingError> {
    let to = endpoint_candidates(network, weights, destination, Target::Destination)?;
    let tolerance = weights.config().entry_tolerance_m;

    let mut best: Option<LotSelection<'a>> = None;
    for lot in catalog.lots(LotClass::Student) {
        let from = match surveyed(network, lot.entry_points(), tolerance, Target::Start) {
            Ok(from) => from,
            Err(e) => {
                warn!(lot = lot.name(), error = %e, "skipping lot");
                continue;
            }
        };
        let Ok(resolution) = best_pair(network, weights, router, &from, &to) else {
            debug!(lot = lot.name(), "lot has no route to destination");
            continue;
        };
        if best.as_ref().is_none_or(|b| resolution.total_cost() < b.resolution.total_cost()) {
            best = Some(LotSelection { lot, resolution });
        }
    }

    let best = best.ok_or(RoutingError::NoRouteFound)?;
    debug!(lot = best.lot.name(), cost = best.resolution.total_cost(), "auto-selected lot");
    Ok(best)
}

// ── Internals ─────────────────────────────────────────────────────────────────

fn endpoint_candidates(
    network:  &WalkNetwork,
    weights:  &EdgeWeights,
    endpoint: &Endpoint,
    target:   Target,
) -> Result<Vec<Candidate>, RoutingError> {
    match endpoint {
        Endpoint::Place(p) => {
            surveyed(network, p.entry_points(), weights.config().entry_tolerance_m, target)
        }
        Endpoint::Point(c) => Ok(vec![snapped(network, *c)?]),
    }
}

/// Vertex lookup of surveyed entry points: exact first, then the nearest
/// routable vertex within `tolerance_m`.
fn surveyed(
    network:     &WalkNetwork,
    coords:      &[Coordinate],
    tolerance_m: f64,
    target:      Target,
) -> Result<Vec<Candidate>, RoutingError> {
    let first = *coords.first().ok_or(RoutingError::MissingEndpoint(target))?;
    let lookup = |c: Coordinate| {
        network.node_at(c).or_else(|| {
            if tolerance_m > 0.0 { network.snap_within(c, tolerance_m) } else { None }
        })
    };
    let found: Vec<Candidate> = coords
        .iter()
        .filter_map(|&c| match lookup(c) {
            Some(node) => Some((c, node)),
            None => {
                warn!(%c, %target, "entry point is not a network vertex; skipped");
                None
            }
        })
        .collect();
    if found.is_empty() {
        return Err(RoutingError::SnapFailed(first));
    }
    Ok(found)
}

fn snapped(network: &WalkNetwork, pos: Coordinate) -> Result<Candidate, RoutingError> {
    match network.snap(pos) {
        Some(node) => Ok((network.position(node), node)),
        None => {
            warn!(%pos, "snap failed: no routable vertex");
            Err(RoutingError::SnapFailed(pos))
        }
    }
}

/// Full cross product; ties keep the first pair found.
fn best_pair<R: Router + ?Sized>(
    network: &WalkNetwork,
    weights: &EdgeWeights,
    router:  &R,
    from:    &[Candidate],
    to:      &[Candidate],
) -> Result<Resolution, RoutingError> {
    let mut best: Option<Resolution> = None;

    for &(start, a) in from {
        for &(destination, b) in to {
            let route = match router.route(network, weights, a, b) {
                Ok(route) => route,
                Err(SpatialError::NoRoute { .. }) => continue,
                Err(e) => {
                    debug!(error = %e, "pair skipped");
                    continue;
                }
            };
            if best.as_ref().is_none_or(|r| route.total_cost < r.total_cost()) {
                best = Some(Resolution { route, start, destination });
            }
        }
    }

    let best = best.ok_or(RoutingError::NoRouteFound)?;
    debug!(
        pairs = from.len() * to.len(),
        cost = best.total_cost(),
        "resolved best route"
    );
    Ok(best)
}

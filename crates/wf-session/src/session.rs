//! Per-user session state and the recompute loop around it.
//!
//! # Recompute model
//!
//! Every input change (endpoint, accessibility mode, live position when the
//! start follows it) triggers a recomputation.  Each recomputation is tagged
//! with a [`RouteTicket`]; only the result for the most recently issued
//! ticket is applied, so a slow computation finishing after a newer one can
//! never overwrite it.
//!
//! Synchronous callers just use the mutators, which recompute inline.
//! Callers that route off-thread take a [`RouteRequest`] with
//! [`Session::request_route`], run it anywhere, and hand the result back to
//! [`Session::commit`].
//!
//! # Stale routes
//!
//! A failed recomputation keeps the previous route on screen, unless the user
//! changed an input since that route was computed.  Then the old route no
//! longer answers the question being asked and is cleared.

use std::sync::Arc;

use tracing::{debug, info, warn};

use wf_core::{AccessibilityMode, Coordinate, RoutingConfig};
use wf_spatial::{EdgeWeights, Membership, Router, ServiceArea, WalkNetwork};

use crate::endpoint::{Endpoint, StartSpec, Target};
use crate::error::{RoutingError, SessionError, SessionResult};
use crate::place::{Place, PlaceCatalog};
use crate::resolver::{self, Resolution};
use crate::selection::{ClickHit, ClickOutcome, PickMode, SelectionState};

// ── Tickets and requests ──────────────────────────────────────────────────────

/// Generation tag of one route computation.  Later tickets compare greater.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RouteTicket(pub u64);

/// Everything needed to compute a route away from the session.
///
/// Holds shared handles to the network and the weight table as they were
/// when the request was issued; later mode toggles do not affect it.
#[derive(Clone)]
pub struct RouteRequest {
    pub ticket: RouteTicket,
    network: Arc<WalkNetwork>,
    weights: Arc<EdgeWeights>,
    start: Option<StartSpec>,
    destination: Option<Endpoint>,
    live_position: Option<Coordinate>,
}

impl RouteRequest {
    pub fn run<R: Router + ?Sized>(&self, router: &R) -> Result<Resolution, RoutingError> {
        resolver::compute_route(
            &self.network,
            &self.weights,
            router,
            self.start.as_ref(),
            self.destination.as_ref(),
            self.live_position,
        )
    }
}

/// What a renderer needs to reflect the current selection.
#[derive(Copy, Clone, Debug)]
pub struct SelectionSnapshot<'a> {
    pub start: Option<&'a StartSpec>,
    pub destination: Option<&'a Endpoint>,
    pub pick_mode: PickMode,
    pub accessibility: AccessibilityMode,
}

// ── SessionBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`Session<R>`].
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.catalog(c)`          | empty catalog                    |
/// | `.service_area(a)`     | none (membership always unknown) |
/// | `.config(c)`           | `RoutingConfig::default()`       |
/// | `.accessibility(m)`    | `AccessibilityMode::Standard`    |
///
/// ```rust,ignore
/// let session = SessionBuilder::new(network, DijkstraRouter)
///     .catalog(catalog)
///     .service_area(area)
///     .build()?;
/// ```
pub struct SessionBuilder<R: Router> {
    network:       Arc<WalkNetwork>,
    router:        R,
    catalog:       Option<Arc<PlaceCatalog>>,
    service_area:  Option<Arc<ServiceArea>>,
    config:        RoutingConfig,
    accessibility: AccessibilityMode,
}

impl<R: Router> SessionBuilder<R> {
    pub fn new(network: impl Into<Arc<WalkNetwork>>, router: R) -> Self {
        Self {
            network:       network.into(),
            router,
            catalog:       None,
            service_area:  None,
            config:        RoutingConfig::default(),
            accessibility: AccessibilityMode::Standard,
        }
    }

    pub fn catalog(mut self, catalog: impl Into<Arc<PlaceCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn service_area(mut self, area: impl Into<Arc<ServiceArea>>) -> Self {
        self.service_area = Some(area.into());
        self
    }

    pub fn config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn accessibility(mut self, mode: AccessibilityMode) -> Self {
        self.accessibility = mode;
        self
    }

    /// Validate the config and evaluate the initial weight table.
    pub fn build(self) -> SessionResult<Session<R>> {
        self.config.validate()?;
        let weights = EdgeWeights::new(&self.network, self.accessibility, self.config);
        info!(
            nodes = self.network.node_count(),
            mode = ?self.accessibility,
            "session ready"
        );
        Ok(Session {
            network:        self.network,
            weights:        Arc::new(weights),
            service_area:   self.service_area,
            catalog:        self.catalog.unwrap_or_default(),
            router:         self.router,
            selection:      SelectionState::new(),
            live_position:  None,
            start:          None,
            destination:    None,
            route:          None,
            last_error:     None,
            issued:         RouteTicket(0),
            inputs_changed: false,
        })
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// All transient state of one wayfinding user.
///
/// The network, boundary, and catalog are shared read-only.  The weight table
/// is shared copy-on-write: a mode toggle mutates it in place unless an
/// outstanding [`RouteRequest`] still holds the old one.
pub struct Session<R: Router> {
    network:      Arc<WalkNetwork>,
    weights:      Arc<EdgeWeights>,
    service_area: Option<Arc<ServiceArea>>,
    catalog:      Arc<PlaceCatalog>,
    router:       R,

    selection:     SelectionState,
    live_position: Option<Coordinate>,
    start:         Option<StartSpec>,
    destination:   Option<Endpoint>,

    route:      Option<Resolution>,
    last_error: Option<RoutingError>,

    /// Latest ticket handed out.
    issued: RouteTicket,
    /// Set by explicit user edits, cleared when a route is applied.
    inputs_changed: bool,
}

impl<R: Router> Session<R> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn network(&self) -> &WalkNetwork {
        &self.network
    }

    pub fn weights(&self) -> &EdgeWeights {
        &self.weights
    }

    pub fn catalog(&self) -> &PlaceCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RoutingConfig {
        self.weights.config()
    }

    pub fn accessibility(&self) -> AccessibilityMode {
        self.weights.mode()
    }

    pub fn live_position(&self) -> Option<Coordinate> {
        self.live_position
    }

    pub fn start(&self) -> Option<&StartSpec> {
        self.start.as_ref()
    }

    pub fn destination(&self) -> Option<&Endpoint> {
        self.destination.as_ref()
    }

    /// The route currently on display, if any.
    pub fn route(&self) -> Option<&Resolution> {
        self.route.as_ref()
    }

    /// Failure of the most recent applied computation.
    pub fn last_error(&self) -> Option<&RoutingError> {
        self.last_error.as_ref()
    }

    /// Estimated walking time of the current route.
    pub fn walking_secs(&self) -> Option<f64> {
        self.route.as_ref().map(|r| r.walking_secs(self.config()))
    }

    pub fn pick_mode(&self) -> PickMode {
        self.selection.mode()
    }

    pub fn selection_snapshot(&self) -> SelectionSnapshot<'_> {
        SelectionSnapshot {
            start:         self.start.as_ref(),
            destination:   self.destination.as_ref(),
            pick_mode:     self.selection.mode(),
            accessibility: self.accessibility(),
        }
    }

    // ── Live position and membership ──────────────────────────────────────

    /// Campus membership of the last reported live position.
    ///
    /// `Unknown` when nothing has been reported or no boundary was loaded.
    pub fn membership(&self) -> Membership {
        match &self.service_area {
            Some(area) => area.membership(self.live_position),
            None => Membership::Unknown,
        }
    }

    /// Whether "start from my current position" may be offered.
    pub fn current_position_selectable(&self) -> bool {
        self.membership().is_inside()
    }

    /// Record a live-position fix.  Recomputes only when the start follows
    /// the live position.
    ///
    /// A fix outside WGS-84 ranges (or non-finite) is dropped and the previous
    /// fix is kept.  Returns whether the fix was accepted.
    pub fn update_live_position(&mut self, pos: Coordinate) -> bool {
        if !pos.is_valid() {
            warn!(%pos, "ignoring invalid live position");
            return false;
        }
        self.live_position = Some(pos);
        if self.follows_live_position() {
            self.recompute();
        }
        true
    }

    /// The position source lost its fix.
    ///
    /// A start that follows the live position becomes unresolvable: the
    /// failure lands in [`last_error`](Self::last_error) and the last valid
    /// route stays on screen.
    pub fn clear_live_position(&mut self) {
        self.live_position = None;
        if self.follows_live_position() {
            self.recompute();
        }
    }

    fn follows_live_position(&self) -> bool {
        match self.start {
            Some(StartSpec::CurrentPosition) => true,
            None => self.destination.is_some(),
            Some(StartSpec::Endpoint(_)) => false,
        }
    }

    // ── Endpoint selection ────────────────────────────────────────────────

    pub fn set_start(&mut self, start: impl Into<StartSpec>) {
        self.start = Some(start.into());
        self.input_changed();
    }

    pub fn set_destination(&mut self, destination: Endpoint) {
        self.destination = Some(destination);
        self.input_changed();
    }

    pub fn clear_start(&mut self) {
        self.start = None;
        self.input_changed();
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.input_changed();
    }

    /// Start from the live position.
    ///
    /// # Errors
    ///
    /// [`SessionError::CurrentPositionUnavailable`] unless the live position
    /// is known to be on campus.
    pub fn select_current_position(&mut self) -> SessionResult<()> {
        let membership = self.membership();
        if !membership.is_inside() {
            return Err(SessionError::CurrentPositionUnavailable(membership));
        }
        self.set_start(StartSpec::CurrentPosition);
        Ok(())
    }

    pub fn select_start_by_name(&mut self, name: &str) -> SessionResult<()> {
        let place = self.place_named(name)?;
        self.set_start(Endpoint::Place(place));
        Ok(())
    }

    pub fn select_destination_by_name(&mut self, name: &str) -> SessionResult<()> {
        let place = self.place_named(name)?;
        self.set_destination(Endpoint::Place(place));
        Ok(())
    }

    fn place_named(&self, name: &str) -> SessionResult<Place> {
        self.catalog
            .resolve_by_name(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownPlace(name.to_string()))
    }

    /// Start from whichever student lot is cheapest to walk from.
    ///
    /// On success the lot becomes the start and its route is applied.  On
    /// failure the selection is left untouched.
    pub fn auto_select_lot(&mut self) -> SessionResult<Place> {
        let destination = self
            .destination
            .as_ref()
            .ok_or(RoutingError::MissingEndpoint(Target::Destination))?;

        let (lot, resolution) = {
            let selection = resolver::auto_select_lot(
                &self.catalog,
                &self.network,
                &self.weights,
                &self.router,
                destination,
            )?;
            (selection.lot.clone(), selection.resolution)
        };

        self.start = Some(StartSpec::Endpoint(Endpoint::Place(lot.clone())));
        self.inputs_changed = true;
        let ticket = self.next_ticket();
        self.commit(ticket, Ok(resolution));
        Ok(lot)
    }

    // ── Accessibility ─────────────────────────────────────────────────────

    /// Switch step avoidance.  Rewrites edge weights in place and recomputes;
    /// the network topology is untouched.
    pub fn set_accessibility(&mut self, mode: AccessibilityMode) {
        let changed = Arc::make_mut(&mut self.weights).reweigh(&self.network, mode);
        if changed {
            info!(?mode, "accessibility mode changed");
            self.input_changed();
        }
    }

    /// Swap in new tuning constants at runtime and re-evaluate every edge.
    ///
    /// # Errors
    ///
    /// [`SessionError::Core`] if `config` fails validation; the session is
    /// left unchanged.
    pub fn set_config(&mut self, config: RoutingConfig) -> SessionResult<()> {
        config.validate()?;
        if &config == self.config() {
            return Ok(());
        }
        Arc::make_mut(&mut self.weights).reconfigure(&self.network, config);
        info!("routing config changed");
        self.input_changed();
        Ok(())
    }

    // ── Pick mode ─────────────────────────────────────────────────────────

    pub fn toggle_pick_start(&mut self) -> PickMode {
        self.selection.toggle_pick_start()
    }

    pub fn toggle_pick_destination(&mut self) -> PickMode {
        self.selection.toggle_pick_destination()
    }

    /// Abandon a pending pick (e.g. Escape); the next click is not consumed.
    pub fn cancel_pick(&mut self) {
        self.selection.cancel();
    }

    /// Offer a map click to the pick state machine.  Call this before any
    /// other click handling.
    ///
    /// Returns `true` if the click was consumed by a pending pick, in which
    /// case other click behaviours must not run.  A click that cannot be
    /// snapped is still consumed; the failure is recorded in
    /// [`last_error`](Self::last_error) and the pick stays pending.
    pub fn handle_click(&mut self, hit: &ClickHit) -> bool {
        match self.selection.on_click(hit, &self.catalog, &self.network) {
            Ok(ClickOutcome::NotConsumed) => false,
            Ok(ClickOutcome::Assign { target: Target::Start, endpoint }) => {
                self.set_start(endpoint);
                true
            }
            Ok(ClickOutcome::Assign { target: Target::Destination, endpoint }) => {
                self.set_destination(endpoint);
                true
            }
            Err(e) => {
                warn!(error = %e, "pick failed");
                self.last_error = Some(e);
                true
            }
        }
    }

    // ── Recompute ─────────────────────────────────────────────────────────

    fn input_changed(&mut self) {
        self.inputs_changed = true;
        self.recompute();
    }

    fn next_ticket(&mut self) -> RouteTicket {
        self.issued = RouteTicket(self.issued.0 + 1);
        self.issued
    }

    /// Recompute inline with the session's router.
    pub fn recompute(&mut self) {
        let request = self.request_route();
        let result = request.run(&self.router);
        self.commit(request.ticket, result);
    }

    /// Snapshot the current inputs under a fresh ticket.
    ///
    /// Issuing a request supersedes every earlier one.
    pub fn request_route(&mut self) -> RouteRequest {
        RouteRequest {
            ticket:        self.next_ticket(),
            network:       Arc::clone(&self.network),
            weights:       Arc::clone(&self.weights),
            start:         self.start.clone(),
            destination:   self.destination.clone(),
            live_position: self.live_position,
        }
    }

    /// Apply the result of a computation.
    ///
    /// Returns `false` and discards the result if a newer ticket has been
    /// issued since.
    pub fn commit(&mut self, ticket: RouteTicket, result: Result<Resolution, RoutingError>) -> bool {
        if ticket < self.issued {
            debug!(?ticket, latest = ?self.issued, "discarding superseded route result");
            return false;
        }

        match result {
            Ok(resolution) => {
                info!(
                    cost = resolution.total_cost(),
                    length_m = resolution.route.length_m,
                    "route updated"
                );
                self.route = Some(resolution);
                self.last_error = None;
                self.inputs_changed = false;
            }
            Err(e) => {
                match &e {
                    RoutingError::SnapFailed(pos) => warn!(%pos, "route failed: snap"),
                    other => debug!(error = %other, "route failed"),
                }
                if self.inputs_changed {
                    self.route = None;
                }
                self.last_error = Some(e);
            }
        }
        true
    }
}

//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The session calls routing via the [`Router`] trait, so applications can
//! swap in custom implementations (A*, multi-source search) without touching
//! the resolver.  The default [`DijkstraRouter`] is sufficient for a campus
//! of a few thousand edges.
//!
//! # Cost units
//!
//! Costs are the weight-model units of [`EdgeWeights`]: metres of footway
//! equivalent.  `Route::walking_secs` converts them with the configured
//! walking speed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use wf_core::{BoundingBox, Coordinate, EdgeId, NodeId, RoutingConfig};

use crate::network::WalkNetwork;
use crate::weight::EdgeWeights;
use crate::SpatialError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Vertices visited in order, source first.  Never empty.
    pub nodes: Vec<NodeId>,
    /// Half-edges traversed in order.  Empty for a trivial route.
    pub edges: Vec<EdgeId>,
    /// Position of each entry of `nodes`.
    pub coordinates: Vec<Coordinate>,
    /// Sum of traversed edge weights.
    pub total_cost: f64,
    /// Geometric length in metres.
    pub length_m: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn start(&self) -> Coordinate {
        self.coordinates[0]
    }

    pub fn end(&self) -> Coordinate {
        self.coordinates[self.coordinates.len() - 1]
    }

    /// Estimated walking time in seconds at the configured speed.
    pub fn walking_secs(&self, config: &RoutingConfig) -> f64 {
        config.walking_secs(self.total_cost)
    }

    /// Extent of the route, for fitting a viewport.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.coordinates.iter().copied())
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-pair shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve sessions on
/// several threads; the network and weight table are passed by reference.
pub trait Router: Send + Sync {
    /// Compute the cheapest route from `from` to `to` under `weights`.
    ///
    /// `from == to` yields a trivial zero-cost route.  Returns
    /// [`SpatialError::NoRoute`] when the two are disconnected and
    /// [`SpatialError::EmptyNetwork`] when there is nothing to route over.
    fn route(
        &self,
        network: &WalkNetwork,
        weights: &EdgeWeights,
        from: NodeId,
        to: NodeId,
    ) -> Result<Route, SpatialError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR walk graph.
///
/// Binary-heap frontier, O((V + E) log V) per query.  Infeasible edges are
/// never relaxed.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &WalkNetwork,
        weights: &EdgeWeights,
        from: NodeId,
        to: NodeId,
    ) -> Result<Route, SpatialError> {
        dijkstra(network, weights, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

// By default std::BinaryHeap is a max heap.
// Reverse the comparison so the cheapest entry pops first.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            // breaking ties in a deterministic way
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(
    network: &WalkNetwork,
    weights: &EdgeWeights,
    from: NodeId,
    to: NodeId,
) -> Result<Route, SpatialError> {
    let n = network.node_count();
    if n == 0 {
        return Err(SpatialError::EmptyNetwork);
    }
    for node in [from, to] {
        if node.index() >= n {
            return Err(SpatialError::NodeNotFound(node));
        }
    }

    if from == to {
        return Ok(Route {
            nodes: vec![from],
            edges: vec![],
            coordinates: vec![network.position(from)],
            total_cost: 0.0,
            length_m: 0.0,
        });
    }

    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0.0, node: from });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let Some(w) = weights.get(edge) else {
                continue;
            };
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + w;

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(HeapEntry { cost: new_cost, node: neighbor });
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network: &WalkNetwork,
    prev_edge: &[EdgeId],
    to: NodeId,
    total_cost: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(cur);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    Route {
        coordinates: nodes.iter().map(|&v| network.position(v)).collect(),
        length_m: edges.iter().map(|e| network.edge_length_m[e.index()]).sum(),
        nodes,
        edges,
        total_cost,
    }
}

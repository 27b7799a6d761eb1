//! Walk network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`,
//! `edge_path_type`) are sorted by source node and indexed by `EdgeId`.  Each
//! undirected segment is stored as two directed half-edges with the same
//! length and path type.
//!
//! The network holds **topology only**.  Costs live in a separate
//! [`EdgeWeights`](crate::weight::EdgeWeights) table keyed by `EdgeId`, so an
//! accessibility toggle rewrites one `Vec` and never rebuilds the graph.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over a local metric projection maps a coordinate
//! to the nearest routable `NodeId`.  Vertices touched only by waterways are
//! left out of the index so a snap never lands on a stream.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use tracing::debug;

use wf_core::{Coordinate, EdgeId, NodeId, PathType};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[east, north]` point in
/// metres relative to the network origin, with the associated `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── WalkNetwork ───────────────────────────────────────────────────────────────

/// Undirected walk graph in CSR format plus a spatial index for snapping.
///
/// All edge fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`WalkNetworkBuilder`] or the GeoJSON loader.
#[derive(Clone)]
pub struct WalkNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coordinate>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each half-edge.  Needed to walk `prev_edge` back to the
    /// source during route reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each half-edge.
    pub edge_to: Vec<NodeId>,

    /// Great-circle length of each half-edge in metres.
    pub edge_length_m: Vec<f64>,

    /// Classification driving the weight model.
    pub edge_path_type: Vec<PathType>,

    // ── Lookup ────────────────────────────────────────────────────────────
    /// Quantised coordinate → vertex, for exact entry-point lookup.
    node_lookup: FxHashMap<(i64, i64), NodeId>,

    /// Projection origin of the spatial index.
    origin: Coordinate,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl WalkNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Any snap against an empty network returns `None` and any routing
    /// request fails with [`SpatialError::EmptyNetwork`](crate::SpatialError).
    pub fn empty() -> Self {
        WalkNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing half-edges from `node`.
    ///
    /// This is a contiguous index range; no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> Coordinate {
        self.node_pos[node.index()]
    }

    /// `true` if at least one non-waterway edge touches `node`.
    pub fn is_routable(&self, node: NodeId) -> bool {
        self.out_edges(node)
            .any(|e| !self.edge_path_type[e.index()].is_excluded())
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Vertex sitting exactly at `pos` (to 1e-7 degrees), if any.
    ///
    /// Place entry points are surveyed onto the network, so they resolve
    /// through this lookup rather than through snapping.
    pub fn node_at(&self, pos: Coordinate) -> Option<NodeId> {
        self.node_lookup.get(&pos.key()).copied()
    }

    /// Return the routable `NodeId` nearest to `pos`.
    ///
    /// Equidistant candidates resolve to the lowest `NodeId`, i.e. the vertex
    /// loaded first.  Returns `None` if no routable node exists or `pos` is
    /// not a valid coordinate.
    pub fn snap(&self, pos: Coordinate) -> Option<NodeId> {
        if !pos.is_valid() {
            return None;
        }
        let query = pos.to_local_m(self.origin);
        let mut iter = self.spatial_idx.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = iter.next()?;

        let mut best = first.id;
        for (entry, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            best = best.min(entry.id);
        }
        debug!(%pos, node = %best, "snapped coordinate");
        Some(best)
    }

    /// Like [`snap`](Self::snap) but rejects vertices farther than `max_m`.
    pub fn snap_within(&self, pos: Coordinate, max_m: f64) -> Option<NodeId> {
        self.snap(pos)
            .filter(|&n| self.position(n).distance_m(pos) <= max_m)
    }
}

// ── WalkNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`WalkNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and undirected segments in any order.
/// `build()` sorts half-edges by source node, constructs the CSR arrays, and
/// bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use wf_core::{Coordinate, PathType};
/// use wf_spatial::WalkNetworkBuilder;
///
/// let mut b = WalkNetworkBuilder::new();
/// let a = b.node_for(Coordinate::new(-122.1280, 37.3613));
/// let c = b.node_for(Coordinate::new(-122.1270, 37.3613));
/// b.add_segment(a, c, PathType::Footway);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
pub struct WalkNetworkBuilder {
    nodes:            Vec<Coordinate>,
    raw_edges:        Vec<RawEdge>,
    lookup:           FxHashMap<(i64, i64), NodeId>,
    weld_tolerance_m: f64,
    weld_idx:         RTree<NodeEntry>,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_m:  f64,
    path_type: PathType,
}

impl WalkNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:            Vec::new(),
            raw_edges:        Vec::new(),
            lookup:           FxHashMap::default(),
            weld_tolerance_m: 0.0,
            weld_idx:         RTree::new(),
        }
    }

    /// Merge coordinates closer than `tolerance_m` into one vertex when added
    /// through [`node_for`](Self::node_for).
    ///
    /// Digitised footpaths rarely share bit-identical junction coordinates;
    /// without welding those junctions stay disconnected.
    pub fn with_weld_tolerance(mut self, tolerance_m: f64) -> Self {
        self.weld_tolerance_m = tolerance_m.max(0.0);
        self
    }

    /// Add a node unconditionally and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Coordinate) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.lookup.entry(pos.key()).or_insert(id);
        if self.weld_tolerance_m > 0.0 {
            let point = pos.to_local_m(self.nodes[0]);
            self.weld_idx.insert(NodeEntry { point, id });
        }
        id
    }

    /// Return the vertex at `pos`, creating it if needed.
    ///
    /// Identical coordinates always share a vertex; with a weld tolerance,
    /// nearby ones do too.
    pub fn node_for(&mut self, pos: Coordinate) -> NodeId {
        if let Some(&id) = self.lookup.get(&pos.key()) {
            return id;
        }
        if self.weld_tolerance_m > 0.0 && !self.nodes.is_empty() {
            let query = pos.to_local_m(self.nodes[0]);
            let welded = self
                .weld_idx
                .nearest_neighbor(&query)
                .map(|e| e.id)
                .filter(|&id| self.nodes[id.index()].distance_m(pos) < self.weld_tolerance_m);
            if let Some(id) = welded {
                debug!(%pos, into = %id, "welded vertex");
                self.lookup.insert(pos.key(), id);
                return id;
            }
        }
        self.add_node(pos)
    }

    /// Add an undirected segment; its length is the great-circle distance
    /// between the endpoints.
    pub fn add_segment(&mut self, a: NodeId, b: NodeId, path_type: PathType) {
        let length_m = self.node_pos(a).distance_m(self.node_pos(b));
        self.add_segment_with_length(a, b, length_m, path_type);
    }

    /// Add an undirected segment with an explicit length in metres.
    pub fn add_segment_with_length(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: f64,
        path_type: PathType,
    ) {
        self.raw_edges.push(RawEdge { from: a, to: b, length_m, path_type });
        self.raw_edges.push(RawEdge { from: b, to: a, length_m, path_type });
    }

    /// Convenience: add every consecutive pair of a polyline as a segment.
    pub fn add_polyline(&mut self, coords: &[Coordinate], path_type: PathType) {
        for window in coords.windows(2) {
            let a = self.node_for(window[0]);
            let b = self.node_for(window[1]);
            if a != b {
                self.add_segment(a, b, path_type);
            }
        }
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Coordinate {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`WalkNetwork`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = half-edges.
    pub fn build(self) -> WalkNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps parallel edges in insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:      Vec<NodeId>   = raw.iter().map(|e| e.from).collect();
        let edge_to:        Vec<NodeId>   = raw.iter().map(|e| e.to).collect();
        let edge_length_m:  Vec<f64>      = raw.iter().map(|e| e.length_m).collect();
        let edge_path_type: Vec<PathType> = raw.iter().map(|e| e.path_type).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // A node is indexed for snapping if any non-waterway edge leaves it.
        let mut routable = vec![false; node_count];
        for e in &raw {
            if !e.path_type.is_excluded() {
                routable[e.from.index()] = true;
            }
        }

        let origin = self.nodes.first().copied().unwrap_or(Coordinate::new(0.0, 0.0));
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| routable[*i])
            .map(|(i, &pos)| NodeEntry {
                point: pos.to_local_m(origin),
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        debug!(nodes = node_count, half_edges = edge_count, "built walk network");

        WalkNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_path_type,
            node_lookup: self.lookup,
            origin,
            spatial_idx,
        }
    }
}

impl Default for WalkNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

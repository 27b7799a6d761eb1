//! Spatial-subsystem error type.

use thiserror::Error;

use wf_core::NodeId;

/// Errors produced by `wf-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("walk network has no nodes")]
    EmptyNetwork,

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("invalid service-area boundary: {0}")]
    InvalidBoundary(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "geojson")]
    #[error("GeoJSON error: {0}")]
    GeoJson(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

//! Framework error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `RoutingError`)
//! and wrap `WfError` where a core validation failure can surface.

use thiserror::Error;

/// The top-level error type for `wf-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WfError {
    #[error("place {0:?} has no entry points")]
    EmptyPlace(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `wf-*` crates.
pub type WfResult<T> = Result<T, WfError>;

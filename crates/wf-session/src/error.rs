use thiserror::Error;

use wf_core::{Coordinate, WfError};
use wf_spatial::Membership;

use crate::endpoint::Target;

/// Why one route computation produced no route.
///
/// Always recoverable: the session records it and keeps running.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoutingError {
    #[error("no viable path between the selected endpoints")]
    NoRouteFound,

    #[error("no {0} selected")]
    MissingEndpoint(Target),

    #[error("could not snap {0} onto the walk network")]
    SnapFailed(Coordinate),
}

impl RoutingError {
    /// `true` for failures a user should see as "no route".
    ///
    /// `SnapFailed` counts: from the user's side it is indistinguishable.
    pub fn is_no_route(&self) -> bool {
        matches!(self, RoutingError::NoRouteFound | RoutingError::SnapFailed(_))
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),

    #[error("current position is not selectable (membership: {0:?})")]
    CurrentPositionUnavailable(Membership),

    #[error("unknown place {0:?}")]
    UnknownPlace(String),

    #[error(transparent)]
    Core(#[from] WfError),
}

pub type SessionResult<T> = Result<T, SessionError>;

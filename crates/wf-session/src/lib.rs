//! `wf-session`: places, route resolution, and interactive session state.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`place`]     | `Place`, `LotClass`, `PlaceCatalog` (name lookup, search)      |
//! | [`literal`]   | `parse_coordinate_literal`, `format_coordinate_literal`        |
//! | [`endpoint`]  | `Endpoint`, `StartSpec`, `Target`                              |
//! | [`resolver`]  | cross-product `resolve_best_route`, `compute_route`, `auto_select_lot` |
//! | [`selection`] | `PickMode` state machine and click dispatch                    |
//! | [`session`]   | `Session<R>`, `SessionBuilder`, route tickets                  |
//! | [`error`]     | `RoutingError`, `SessionError`                                 |
//!
//! # Data flow
//!
//! ```text
//! PlaceCatalog ──┐
//! live position ─┼─▶ Endpoint / StartSpec ─▶ resolver ─▶ Resolution
//! map click ─────┘        (selection)           │
//!                                        Router + EdgeWeights
//! ```

pub mod endpoint;
pub mod error;
pub mod literal;
pub mod place;
pub mod resolver;
pub mod selection;
pub mod session;

#[cfg(test)]
mod tests;

pub use endpoint::{Endpoint, StartSpec, Target};
pub use error::{RoutingError, SessionError, SessionResult};
pub use literal::{format_coordinate_literal, parse_coordinate_literal};
pub use place::{LotClass, Place, PlaceCatalog};
pub use resolver::{LotSelection, Resolution, auto_select_lot, compute_route, resolve_best_route};
pub use selection::{ClickHit, ClickOutcome, PickMode, SelectionState};
pub use session::{RouteRequest, RouteTicket, SelectionSnapshot, Session, SessionBuilder};

//! `wf-core`: foundational types for the campus wayfinder.
//!
//! This crate is a dependency of every other `wf-*` crate.  It intentionally
//! has no `wf-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`geo`]         | `Coordinate`, haversine distance, `BoundingBox`       |
//! | [`path_type`]   | `PathType` edge classification, `AccessibilityMode`   |
//! | [`config`]      | `RoutingConfig` tuning constants                      |
//! | [`error`]       | `WfError`, `WfResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod path_type;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RoutingConfig;
pub use error::{WfError, WfResult};
pub use geo::{BoundingBox, Coordinate};
pub use ids::{EdgeId, NodeId};
pub use path_type::{AccessibilityMode, PathType};

//! `wf-spatial`: walk network, weight model, snapping, routing, and campus
//! membership.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`network`]  | `WalkNetwork` (CSR + R-tree), `WalkNetworkBuilder`          |
//! | [`weight`]   | `edge_weight` rules, `EdgeWeights` table                    |
//! | [`router`]   | `Router` trait, `Route`, `DijkstraRouter`                   |
//! | [`boundary`] | `ServiceArea`, `Membership`                                 |
//! | [`loader`]   | `load_geojson_str` / `load_geojson_file` (feature = `"geojson"`) |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `geojson` | Enables GeoJSON loading via the `geojson` crate (default). |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |

pub mod boundary;
pub mod error;
pub mod network;
pub mod router;
pub mod weight;

#[cfg(feature = "geojson")]
pub mod loader;


pub use boundary::{Membership, ServiceArea};
pub use error::{SpatialError, SpatialResult};
pub use network::{WalkNetwork, WalkNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router};
pub use weight::{EdgeWeights, edge_weight};

#[cfg(feature = "geojson")]
pub use loader::{LoadedCampus, classify, load_geojson_file, load_geojson_str};

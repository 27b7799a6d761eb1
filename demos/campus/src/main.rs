//! campus: end-to-end walkthrough of the wayfinder over a small embedded
//! campus.
//!
//! ```text
//! cargo run -p campus                      # default tuning
//! cargo run -p campus -- routing.json      # override RoutingConfig fields
//! RUST_LOG=wf_session=debug cargo run -p campus
//! ```

mod campus;

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wf_core::{AccessibilityMode, Coordinate, RoutingConfig};
use wf_session::{ClickHit, Session, SessionBuilder, format_coordinate_literal};
use wf_spatial::{DijkstraRouter, load_geojson_str};

use campus::{CAMPUS_GEOJSON, GYM};

fn load_config(path: Option<&Path>) -> Result<RoutingConfig> {
    let Some(path) = path else {
        return Ok(RoutingConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: RoutingConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn print_route(session: &Session<DijkstraRouter>, label: &str) {
    let Some(r) = session.route() else {
        let why = session.last_error().map_or("no route".to_string(), |e| e.to_string());
        println!("{label:<28} {why}");
        return;
    };
    println!(
        "{label:<28} cost {:>8.1}  {:>6.1} m  {:>5.0} s  {} vertices  from {} to {}",
        r.total_cost(),
        r.route.length_m,
        session.walking_secs().unwrap_or_default(),
        r.route.nodes.len(),
        format_coordinate_literal(r.start),
        format_coordinate_literal(r.destination),
    );
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wf_spatial=info,wf_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== campus: pedestrian wayfinder ===");

    // 1. Tuning and data.
    let arg = std::env::args().nth(1);
    let config = load_config(arg.as_deref().map(Path::new))?;
    tracing::info!(?config, "routing config");
    let loaded = load_geojson_str(CAMPUS_GEOJSON, &config)?;
    println!(
        "Walk network: {} vertices, {} half-edges",
        loaded.network.node_count(),
        loaded.network.edge_count()
    );

    let catalog = campus::catalog()?;
    println!("Catalog: {} places", catalog.len());
    println!();

    // 2. Session.
    let mut builder = SessionBuilder::new(loaded.network, DijkstraRouter)
        .catalog(catalog)
        .config(config.clone());
    if let Some(area) = loaded.service_area {
        builder = builder.service_area(area);
    }
    let mut session = builder.build()?;

    // 3. Multi-entrance routing, then the same trip step-free.
    session.select_start_by_name("Library")?;
    session.select_destination_by_name("Hilltop Hall")?;
    print_route(&session, "Library → Hilltop Hall");

    session.set_accessibility(AccessibilityMode::StepFree);
    print_route(&session, "  (step-free)");

    session.select_destination_by_name("Library Level 2")?;
    print_route(&session, "Library → Level 2 (elev.)");
    session.set_accessibility(AccessibilityMode::Standard);

    let tuned = RoutingConfig { elevator_cost: 90.0, ..session.config().clone() };
    session.set_config(tuned)?;
    print_route(&session, "  (slow elevator)");
    session.set_config(config)?;

    if let Some(bb) = session.route().and_then(|r| r.route.bounds()) {
        println!("  viewport: {} .. {}", bb.min, bb.max);
    }
    println!();

    // 4. Closest student lot.
    session.select_destination_by_name("Gym")?;
    let lot = session.auto_select_lot()?;
    print_route(&session, &format!("Auto lot: {}", lot.name()));
    println!();

    // 5. Live position and campus membership.
    println!("Membership (no fix):        {:?}", session.membership());
    session.update_live_position(Coordinate::new(-122.0838, 37.3861));
    println!("Membership (downtown):      {:?}", session.membership());
    if let Err(e) = session.select_current_position() {
        println!("  current position refused: {e}");
    }
    session.update_live_position(Coordinate::new(-122.12635, 37.36105));
    println!("Membership (on the quad):   {:?}", session.membership());
    session.select_current_position()?;
    print_route(&session, "Here → Gym");
    println!();

    // 6. Pick a destination on the map (after abandoning a start pick).
    session.toggle_pick_start();
    session.cancel_pick();
    session.toggle_pick_destination();
    let consumed = session.handle_click(&ClickHit::at(Coordinate::new(
        GYM.lon + 0.00004,
        GYM.lat - 0.00002,
    )));
    println!("Map click consumed by pick: {consumed}");
    if let Some(dest) = session.destination() {
        println!("  destination: {dest}");
    }
    print_route(&session, "Here → picked point");
    println!();

    // 7. Search.
    let matches: Vec<&str> = session.catalog().search("lot").map(|p| p.name()).collect();
    println!("Search \"lot\": {}", matches.join(", "));

    Ok(())
}

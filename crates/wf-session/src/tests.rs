//! Unit tests for wf-session.

#[cfg(test)]
mod helpers {
    use wf_core::{Coordinate, PathType};
    use wf_spatial::{ServiceArea, WalkNetwork, WalkNetworkBuilder};

    use crate::{LotClass, Place, PlaceCatalog};

    /// Offset from a fixed campus origin in units of 1e-5 degrees.
    pub fn at(east: f64, north: f64) -> Coordinate {
        Coordinate::new(-122.1280 + east * 1e-5, 37.3613 + north * 1e-5)
    }

    pub const LOT_A: (f64, f64) = (0.0, 0.0);
    pub const LOT_B: (f64, f64) = (400.0, 0.0);
    pub const STAFF: (f64, f64) = (190.0, 10.0);
    pub const LIB_W: (f64, f64) = (100.0, 0.0);
    pub const LIB_E: (f64, f64) = (200.0, 0.0);
    pub const GYM: (f64, f64) = (300.0, 0.0);
    pub const HILL: (f64, f64) = (200.0, 100.0);
    pub const RAMP: (f64, f64) = (250.0, 100.0);
    pub const ISLAND_1: (f64, f64) = (600.0, 600.0);
    pub const ISLAND_2: (f64, f64) = (610.0, 600.0);

    pub fn pos(p: (f64, f64)) -> Coordinate {
        at(p.0, p.1)
    }

    /// Small campus with explicit segment lengths (metres):
    ///
    /// ```text
    ///                 HILL ── 60 ── RAMP
    ///                  │ stairs 20   │ 60
    /// LOT_A ─100─ LIB_W ─100─ LIB_E ─┴─100─ GYM ─100─ LOT_B
    ///                           │ 10
    ///                         STAFF
    ///
    /// ISLAND_1 ─10─ ISLAND_2            (disconnected)
    /// ```
    pub fn campus_network() -> WalkNetwork {
        let mut b = WalkNetworkBuilder::new();
        let mut seg = |p: (f64, f64), q: (f64, f64), len: f64, ty: PathType| {
            let a = b.node_for(pos(p));
            let c = b.node_for(pos(q));
            b.add_segment_with_length(a, c, len, ty);
        };
        seg(LOT_A, LIB_W, 100.0, PathType::Footway);
        seg(LIB_W, LIB_E, 100.0, PathType::Footway);
        seg(LIB_E, GYM, 100.0, PathType::Footway);
        seg(GYM, LOT_B, 100.0, PathType::Footway);
        seg(STAFF, LIB_E, 10.0, PathType::Footway);
        seg(LIB_E, HILL, 20.0, PathType::Stairs);
        seg(LIB_E, RAMP, 60.0, PathType::Footway);
        seg(RAMP, HILL, 60.0, PathType::Footway);
        seg(ISLAND_1, ISLAND_2, 10.0, PathType::Footway);
        b.build()
    }

    pub fn campus_catalog() -> PlaceCatalog {
        let place = |name: &str, pts: &[(f64, f64)]| {
            Place::new(name, pts.iter().map(|&p| pos(p)).collect()).unwrap()
        };
        PlaceCatalog::from_places([
            place("Library", &[LIB_W, LIB_E]).with_link("https://example.edu/library"),
            place("Gym", &[GYM]),
            place("Hilltop Hall", &[HILL]).with_floor(2),
            place("Lot A", &[LOT_A]).with_lot(LotClass::Student).with_highlightable(false),
            place("Lot B", &[LOT_B]).with_lot(LotClass::Student),
            place("Staff Lot", &[STAFF]).with_lot(LotClass::Staff),
            place("Island Kiosk", &[ISLAND_2]),
        ])
        .unwrap()
    }

    /// Box around the main component; the island lies outside.
    pub fn campus_area() -> ServiceArea {
        ServiceArea::new(&[at(-50.0, -50.0), at(450.0, -50.0), at(450.0, 150.0), at(-50.0, 150.0)])
            .unwrap()
    }
}

// ── Places ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod place {
    use wf_core::{Coordinate, WfError};

    use super::helpers::*;
    use crate::{LotClass, Place, PlaceCatalog};

    #[test]
    fn empty_place_rejected() {
        assert_eq!(Place::new("Nowhere", vec![]), Err(WfError::EmptyPlace("Nowhere".into())));
    }

    #[test]
    fn invalid_entry_rejected() {
        let err = Place::new("Bad", vec![Coordinate::new(190.0, 0.0)]);
        assert!(matches!(err, Err(WfError::InvalidCoordinate(_))));
    }

    #[test]
    fn defaults() {
        let p = Place::new("Gym", vec![at(0.0, 0.0)]).unwrap();
        assert!(p.highlightable);
        assert_eq!(p.lot, LotClass::None);
        assert!(p.external_link().is_none());
        assert!(p.floor.is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let p = Place::new("Gym", vec![at(0.0, 0.0)]).unwrap();
        let err = PlaceCatalog::from_places([p.clone(), p]);
        assert!(matches!(err, Err(WfError::Config(_))));
    }

    #[test]
    fn resolve_by_name_is_exact() {
        let catalog = campus_catalog();
        let lib = catalog.resolve_by_name("Library").unwrap();
        assert_eq!(lib.entry_points().len(), 2);
        assert_eq!(lib.external_link(), Some("https://example.edu/library"));
        assert!(catalog.resolve_by_name("library").is_none());
        assert!(catalog.resolve_by_name("Lib").is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let catalog = campus_catalog();
        let names: Vec<&str> = catalog.search("LOT").map(|p| p.name()).collect();
        assert_eq!(names, vec!["Lot A", "Lot B", "Staff Lot"]);
        assert_eq!(catalog.search("  ").count(), catalog.len());
        assert_eq!(catalog.search("zzz").count(), 0);
    }

    #[test]
    fn lots_by_class() {
        let catalog = campus_catalog();
        let students: Vec<&str> = catalog.lots(LotClass::Student).map(|p| p.name()).collect();
        assert_eq!(students, vec!["Lot A", "Lot B"]);
        assert_eq!(catalog.lots(LotClass::Staff).count(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_with_defaults() {
        let json = r#"{
            "name": "Lot 1",
            "entry_points": [{ "lon": -122.1251737, "lat": 37.360561 }],
            "lot": "student"
        }"#;
        let p: Place = serde_json::from_str(json).unwrap();
        assert!(p.is_student_lot());
        assert!(p.highlightable);
        assert!(p.validate().is_ok());

        let none: LotClass = serde_json::from_str(r#""no""#).unwrap();
        assert_eq!(none, LotClass::None);
    }
}

// ── Coordinate literals ───────────────────────────────────────────────────────

#[cfg(test)]
mod literal {
    use wf_core::{Coordinate, WfError};

    use crate::{format_coordinate_literal, parse_coordinate_literal};

    #[test]
    fn accepted_forms() {
        let expected = Coordinate::new(-122.128, 37.3613);
        for text in [
            "-122.128, 37.3613",
            "-122.128,37.3613",
            "[-122.128, 37.3613]",
            "  -122.128 ,  37.3613 ",
        ] {
            assert_eq!(parse_coordinate_literal(text).unwrap(), expected, "{text}");
        }
        assert_eq!(parse_coordinate_literal("10, -5").unwrap(), Coordinate::new(10.0, -5.0));
    }

    #[test]
    fn malformed_is_parse_error() {
        for text in ["", "abc", "1.0 2.0", "[1, 2", "1, 2]", "1e5, 2", "NaN, 1", "-, 1", "1, 2, 3", ".5, 1"] {
            assert!(
                matches!(parse_coordinate_literal(text), Err(WfError::Parse(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn out_of_range_is_invalid_coordinate() {
        assert!(matches!(
            parse_coordinate_literal("200, 0"),
            Err(WfError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            parse_coordinate_literal("0, -91"),
            Err(WfError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn format_uses_seven_decimals() {
        let c = Coordinate::new(-122.128, 37.3613);
        assert_eq!(format_coordinate_literal(c), "-122.1280000, 37.3613000");
    }

    #[test]
    fn round_trip_preserves_vertex_key() {
        for c in [
            Coordinate::new(-122.1251737, 37.360561),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(179.9999999, -89.5),
        ] {
            let back = parse_coordinate_literal(&format_coordinate_literal(c)).unwrap();
            assert_eq!(back.key(), c.key());
        }
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resolver {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use test_log::test;
    use wf_core::{AccessibilityMode, Coordinate, NodeId, PathType, RoutingConfig};
    use wf_spatial::{DijkstraRouter, EdgeWeights, Router, WalkNetwork, WalkNetworkBuilder};

    use super::helpers::*;
    use crate::{
        Endpoint, Place, PlaceCatalog, RoutingError, StartSpec, Target, auto_select_lot,
        compute_route, resolve_best_route,
    };

    fn weights(net: &WalkNetwork, mode: AccessibilityMode) -> EdgeWeights {
        EdgeWeights::new(net, mode, RoutingConfig::default())
    }

    fn place(catalog: &PlaceCatalog, name: &str) -> Endpoint {
        Endpoint::Place(catalog.resolve_by_name(name).unwrap().clone())
    }

    #[test]
    fn multi_entrance_uses_cheapest_entry() {
        let net = campus_network();
        let w = weights(&net, AccessibilityMode::Standard);
        let r = resolve_best_route(&net, &w, &DijkstraRouter, &[pos(LIB_W), pos(LIB_E)], &[pos(GYM)])
            .unwrap();
        assert_eq!(r.total_cost(), 100.0);
        assert_eq!(r.start, pos(LIB_E));
        assert_eq!(r.destination, pos(GYM));
        assert_eq!(r.route.coordinates.first(), Some(&pos(LIB_E)));
    }

    #[test]
    fn ties_keep_first_candidate() {
        // LIB_W and GYM are both 100 m from LIB_E.
        let net = campus_network();
        let w = weights(&net, AccessibilityMode::Standard);
        let r = resolve_best_route(&net, &w, &DijkstraRouter, &[pos(LIB_E)], &[pos(LIB_W), pos(GYM)])
            .unwrap();
        assert_eq!(r.destination, pos(LIB_W));

        let r = resolve_best_route(&net, &w, &DijkstraRouter, &[pos(LIB_E)], &[pos(GYM), pos(LIB_W)])
            .unwrap();
        assert_eq!(r.destination, pos(GYM));
    }

    #[test]
    fn off_network_entries_are_skipped() {
        let net = campus_network();
        let w = weights(&net, AccessibilityMode::Standard);
        let stray = at(101.0, 3.0);
        let r = resolve_best_route(&net, &w, &DijkstraRouter, &[stray, pos(LIB_W)], &[pos(GYM)]).unwrap();
        assert_eq!(r.start, pos(LIB_W));

        let err = resolve_best_route(&net, &w, &DijkstraRouter, &[stray], &[pos(GYM)]);
        assert_eq!(err, Err(RoutingError::SnapFailed(stray)));
    }

    #[test]
    fn entry_tolerance_accepts_nearby_entries() {
        let net = campus_network();
        let config = RoutingConfig { entry_tolerance_m: 5.0, ..RoutingConfig::default() };
        let w = EdgeWeights::new(&net, AccessibilityMode::Standard, config);
        let stray = at(101.0, 3.0);
        let r = resolve_best_route(&net, &w, &DijkstraRouter, &[stray], &[pos(GYM)]).unwrap();
        assert_eq!(r.start, stray);
        assert_eq!(r.route.start(), pos(LIB_W));
        assert_eq!(r.total_cost(), 200.0);

        let far = at(150.0, 40.0);
        let err = resolve_best_route(&net, &w, &DijkstraRouter, &[far], &[pos(GYM)]);
        assert_eq!(err, Err(RoutingError::SnapFailed(far)));
    }

    #[test]
    fn disconnected_pairs_are_skipped() {
        let net = campus_network();
        let w = weights(&net, AccessibilityMode::Standard);
        let r = resolve_best_route(&net, &w, &DijkstraRouter, &[pos(ISLAND_1), pos(LOT_A)], &[pos(GYM)])
            .unwrap();
        assert_eq!(r.start, pos(LOT_A));

        let err = resolve_best_route(&net, &w, &DijkstraRouter, &[pos(ISLAND_1)], &[pos(GYM)]);
        assert_eq!(err, Err(RoutingError::NoRouteFound));
    }

    #[test]
    fn empty_candidate_list_is_missing_endpoint() {
        let net = campus_network();
        let w = weights(&net, AccessibilityMode::Standard);
        assert_eq!(
            resolve_best_route(&net, &w, &DijkstraRouter, &[], &[pos(GYM)]),
            Err(RoutingError::MissingEndpoint(Target::Start))
        );
    }

    /// Cross-check: resolver cost equals the minimum of independent
    /// single-pair queries.
    #[test]
    fn matches_independent_pair_minimum() {
        let mut rng = SmallRng::seed_from_u64(31);
        for round in 0..40 {
            let mut b = WalkNetworkBuilder::new();
            let n = 9;
            let ids: Vec<NodeId> = (0..n)
                .map(|i| b.add_node(at(i as f64 * 7.0, (i % 3) as f64 * 5.0)))
                .collect();
            for _ in 0..14 {
                let (x, y) = (ids[rng.gen_range(0..n)], ids[rng.gen_range(0..n)]);
                if x != y {
                    let ty = PathType::ALL[rng.gen_range(0..PathType::ALL.len())];
                    b.add_segment_with_length(x, y, rng.gen_range(1.0..50.0), ty);
                }
            }
            let net = b.build();
            let w = weights(&net, AccessibilityMode::from(round % 2 == 1));

            let pick = |rng: &mut SmallRng| -> Vec<NodeId> {
                (0..rng.gen_range(1..=4)).map(|_| ids[rng.gen_range(0..n)]).collect()
            };
            let starts = pick(&mut rng);
            let dests = pick(&mut rng);
            let coords = |v: &[NodeId]| -> Vec<Coordinate> { v.iter().map(|&id| net.position(id)).collect() };

            let expected = starts
                .iter()
                .flat_map(|&s| dests.iter().map(move |&d| (s, d)))
                .filter_map(|(s, d)| DijkstraRouter.route(&net, &w, s, d).ok())
                .map(|r| r.total_cost)
                .reduce(f64::min);

            let got = resolve_best_route(&net, &w, &DijkstraRouter, &coords(&starts), &coords(&dests))
                .ok()
                .map(|r| r.total_cost());
            assert_eq!(got, expected, "round {round}");
        }
    }

    #[test]
    fn compute_route_requires_destination() {
        let net = campus_network();
        let w = weights(&net, AccessibilityMode::Standard);
        let start = StartSpec::Endpoint(Endpoint::Point(pos(LOT_A)));
        assert_eq!(
            compute_route(&net, &w, &DijkstraRouter, Some(&start), None, None),
            Err(RoutingError::MissingEndpoint(Target::Destination))
        );
    }

    #[test]
    fn unset_start_falls_back_to_live_position() {
        let net = campus_network();
        let catalog = campus_catalog();
        let w = weights(&net, AccessibilityMode::Standard);
        let gym = place(&catalog, "Gym");

        assert_eq!(
            compute_route(&net, &w, &DijkstraRouter, None, Some(&gym), None),
            Err(RoutingError::MissingEndpoint(Target::Start))
        );
        assert_eq!(
            compute_route(&net, &w, &DijkstraRouter, Some(&StartSpec::CurrentPosition), Some(&gym), None),
            Err(RoutingError::MissingEndpoint(Target::Start))
        );

        let live = at(2.0, 1.0);
        let r = compute_route(&net, &w, &DijkstraRouter, None, Some(&gym), Some(live)).unwrap();
        assert_eq!(r.start, pos(LOT_A));
        assert_eq!(r.total_cost(), 300.0);
    }

    #[test]
    fn bare_points_are_snapped() {
        let net = campus_network();
        let w = weights(&net, AccessibilityMode::Standard);
        let start = StartSpec::Endpoint(Endpoint::Point(at(198.0, -3.0)));
        let dest = Endpoint::Point(at(302.0, 2.0));
        let r = compute_route(&net, &w, &DijkstraRouter, Some(&start), Some(&dest), None).unwrap();
        assert_eq!(r.start, pos(LIB_E));
        assert_eq!(r.destination, pos(GYM));
    }

    #[test]
    fn snap_on_empty_network_fails() {
        let net = WalkNetwork::empty();
        let w = weights(&net, AccessibilityMode::Standard);
        let dest = Endpoint::Point(at(0.0, 0.0));
        let err = compute_route(&net, &w, &DijkstraRouter, None, Some(&dest), Some(at(1.0, 1.0)));
        assert!(matches!(err, Err(RoutingError::SnapFailed(_))));
        assert!(err.unwrap_err().is_no_route());
    }

    #[test]
    fn step_free_mode_changes_the_route() {
        let net = campus_network();
        let catalog = campus_catalog();
        let lib = StartSpec::Endpoint(place(&catalog, "Library"));
        let hill = place(&catalog, "Hilltop Hall");

        let std = weights(&net, AccessibilityMode::Standard);
        let r = compute_route(&net, &std, &DijkstraRouter, Some(&lib), Some(&hill), None).unwrap();
        assert_eq!(r.total_cost(), 30.0);
        assert_eq!(r.route.coordinates.len(), 2);

        let free = weights(&net, AccessibilityMode::StepFree);
        let r = compute_route(&net, &free, &DijkstraRouter, Some(&lib), Some(&hill), None).unwrap();
        assert_eq!(r.total_cost(), 120.0);
        assert_eq!(r.route.coordinates, vec![pos(LIB_E), pos(RAMP), pos(HILL)]);
    }

    #[test]
    fn auto_lot_picks_cheapest_student_lot() {
        let net = campus_network();
        let catalog = campus_catalog();
        let w = weights(&net, AccessibilityMode::Standard);

        let sel = auto_select_lot(&catalog, &net, &w, &DijkstraRouter, &place(&catalog, "Gym")).unwrap();
        assert_eq!(sel.lot.name(), "Lot B");
        assert_eq!(sel.resolution.total_cost(), 100.0);

        // The staff lot is 10 m from the library but never considered.
        let sel = auto_select_lot(&catalog, &net, &w, &DijkstraRouter, &place(&catalog, "Library")).unwrap();
        assert_eq!(sel.lot.name(), "Lot A");
        assert_eq!(sel.resolution.destination, pos(LIB_W));
    }

    #[test]
    fn auto_lot_without_lots_fails() {
        let net = campus_network();
        let catalog = PlaceCatalog::from_places([Place::new("Gym", vec![pos(GYM)]).unwrap()]).unwrap();
        let w = weights(&net, AccessibilityMode::Standard);
        let err = auto_select_lot(&catalog, &net, &w, &DijkstraRouter, &place(&catalog, "Gym"));
        assert!(matches!(err, Err(RoutingError::NoRouteFound)));
    }

    #[test]
    fn auto_lot_to_unreachable_destination_fails() {
        let net = campus_network();
        let catalog = campus_catalog();
        let w = weights(&net, AccessibilityMode::Standard);
        let err = auto_select_lot(&catalog, &net, &w, &DijkstraRouter, &place(&catalog, "Island Kiosk"));
        assert!(matches!(err, Err(RoutingError::NoRouteFound)));
    }
}

// ── Selection state machine ───────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use wf_core::Coordinate;
    use wf_spatial::WalkNetwork;

    use super::helpers::*;
    use crate::{ClickHit, ClickOutcome, Endpoint, PickMode, RoutingError, SelectionState, Target};

    #[test]
    fn toggle_twice_returns_to_idle() {
        let mut s = SelectionState::new();
        assert_eq!(s.toggle_pick_start(), PickMode::PickingStart);
        assert_eq!(s.toggle_pick_start(), PickMode::Idle);
        assert!(!s.is_picking());
    }

    #[test]
    fn toggles_switch_between_ends() {
        let mut s = SelectionState::new();
        s.toggle_pick_start();
        assert_eq!(s.toggle_pick_destination(), PickMode::PickingDestination);
        assert_eq!(s.toggle_pick_start(), PickMode::PickingStart);
        s.cancel();
        assert_eq!(s.mode(), PickMode::Idle);
    }

    #[test]
    fn idle_click_is_not_consumed() {
        let (net, catalog) = (campus_network(), campus_catalog());
        let mut s = SelectionState::new();
        let out = s.on_click(&ClickHit::on_place("Gym", pos(GYM)), &catalog, &net).unwrap();
        assert_eq!(out, ClickOutcome::NotConsumed);
    }

    #[test]
    fn click_on_place_assigns_place() {
        let (net, catalog) = (campus_network(), campus_catalog());
        let mut s = SelectionState::new();
        s.toggle_pick_destination();
        let out = s.on_click(&ClickHit::on_place("Library", at(150.0, 5.0)), &catalog, &net).unwrap();
        match out {
            ClickOutcome::Assign { target, endpoint } => {
                assert_eq!(target, Target::Destination);
                assert_eq!(endpoint.place().map(|p| p.name()), Some("Library"));
                assert!(endpoint.is_highlightable());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.mode(), PickMode::Idle);
    }

    #[test]
    fn raw_click_is_snapped_to_bare_point() {
        let (net, catalog) = (campus_network(), campus_catalog());
        let mut s = SelectionState::new();
        s.toggle_pick_start();
        let out = s.on_click(&ClickHit::at(at(296.0, 4.0)), &catalog, &net).unwrap();
        assert_eq!(
            out,
            ClickOutcome::Assign { target: Target::Start, endpoint: Endpoint::Point(pos(GYM)) }
        );
    }

    #[test]
    fn unknown_place_name_falls_back_to_point() {
        let (net, catalog) = (campus_network(), campus_catalog());
        let mut s = SelectionState::new();
        s.toggle_pick_start();
        let out = s.on_click(&ClickHit::on_place("Parking Structure", at(1.0, 0.0)), &catalog, &net).unwrap();
        let ClickOutcome::Assign { endpoint, .. } = out else { panic!("not assigned") };
        assert_eq!(endpoint, Endpoint::Point(pos(LOT_A)));
        assert!(!endpoint.is_highlightable());
    }

    #[test]
    fn non_finite_click_is_a_snap_failure() {
        let (net, catalog) = (campus_network(), campus_catalog());
        let mut s = SelectionState::new();
        s.toggle_pick_destination();
        let bad = Coordinate::new(f64::NAN, 37.0);
        assert!(matches!(
            s.on_click(&ClickHit::at(bad), &catalog, &net),
            Err(RoutingError::SnapFailed(c)) if c.lon.is_nan()
        ));
        assert_eq!(s.mode(), PickMode::PickingDestination);
    }

    #[test]
    fn failed_snap_keeps_pick_pending() {
        let net = WalkNetwork::empty();
        let catalog = campus_catalog();
        let mut s = SelectionState::new();
        s.toggle_pick_start();
        assert!(s.on_click(&ClickHit::at(at(0.0, 0.0)), &catalog, &net).is_err());
        assert_eq!(s.mode(), PickMode::PickingStart);
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod session {
    use test_log::test;
    use wf_core::{AccessibilityMode, Coordinate, RoutingConfig};
    use wf_spatial::{DijkstraRouter, Membership};

    use super::helpers::*;
    use crate::{
        ClickHit, Endpoint, PickMode, RoutingError, Session, SessionBuilder, SessionError,
        StartSpec, Target,
    };

    fn session() -> Session<DijkstraRouter> {
        SessionBuilder::new(campus_network(), DijkstraRouter)
            .catalog(campus_catalog())
            .service_area(campus_area())
            .build()
            .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = RoutingConfig { walking_speed_mps: 0.0, ..RoutingConfig::default() };
        let result = SessionBuilder::new(campus_network(), DijkstraRouter).config(bad).build();
        assert!(matches!(result, Err(SessionError::Core(_))));
    }

    #[test]
    fn named_endpoints_produce_route() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        assert_eq!(s.last_error(), Some(&RoutingError::MissingEndpoint(Target::Destination)));
        assert!(s.route().is_none());

        s.select_destination_by_name("Gym").unwrap();
        let r = s.route().unwrap();
        assert_eq!(r.total_cost(), 100.0);
        assert_eq!(r.start, pos(LIB_E));
        assert!(s.last_error().is_none());
        assert!((s.walking_secs().unwrap() - 100.0 / 1.4).abs() < 1e-9);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let mut s = session();
        assert!(matches!(
            s.select_destination_by_name("Planetarium"),
            Err(SessionError::UnknownPlace(name)) if name == "Planetarium"
        ));
        assert!(s.destination().is_none());
    }

    #[test]
    fn accessibility_toggle_reweighs_and_recomputes() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        s.select_destination_by_name("Hilltop Hall").unwrap();
        assert_eq!(s.route().unwrap().total_cost(), 30.0);
        let nodes = s.network().node_count();

        s.set_accessibility(AccessibilityMode::StepFree);
        assert_eq!(s.accessibility(), AccessibilityMode::StepFree);
        assert_eq!(s.route().unwrap().total_cost(), 120.0);
        assert_eq!(s.network().node_count(), nodes);

        s.set_accessibility(AccessibilityMode::Standard);
        assert_eq!(s.route().unwrap().total_cost(), 30.0);
    }

    #[test]
    fn runtime_config_change_reweighs() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        s.select_destination_by_name("Hilltop Hall").unwrap();
        assert_eq!(s.route().unwrap().total_cost(), 30.0);

        // Stairs at 7x cost 140, so the 120 m ramp wins.
        let steep = RoutingConfig { stairs_factor: 7.0, ..RoutingConfig::default() };
        s.set_config(steep.clone()).unwrap();
        assert_eq!(s.config(), &steep);
        assert_eq!(s.route().unwrap().total_cost(), 120.0);

        let bad = RoutingConfig { road_factor: -1.0, ..RoutingConfig::default() };
        assert!(matches!(s.set_config(bad), Err(SessionError::Core(_))));
        assert_eq!(s.config(), &steep);
    }

    #[test]
    fn membership_and_current_position_gating() {
        let mut s = session();
        assert_eq!(s.membership(), Membership::Unknown);
        assert!(!s.current_position_selectable());
        assert!(matches!(
            s.select_current_position(),
            Err(SessionError::CurrentPositionUnavailable(Membership::Unknown))
        ));

        s.update_live_position(Coordinate::new(2.35, 48.85));
        assert!(matches!(
            s.select_current_position(),
            Err(SessionError::CurrentPositionUnavailable(Membership::Outside))
        ));
        assert!(s.start().is_none());

        s.update_live_position(at(2.0, 1.0));
        assert!(s.current_position_selectable());
        s.select_current_position().unwrap();
        assert_eq!(s.start(), Some(&StartSpec::CurrentPosition));
    }

    #[test]
    fn no_boundary_means_unknown() {
        let mut s = SessionBuilder::new(campus_network(), DijkstraRouter).build().unwrap();
        s.update_live_position(at(2.0, 1.0));
        assert_eq!(s.membership(), Membership::Unknown);
    }

    #[test]
    fn live_position_updates_move_the_start() {
        let mut s = session();
        s.update_live_position(at(2.0, 1.0));
        s.select_current_position().unwrap();
        s.select_destination_by_name("Gym").unwrap();
        assert_eq!(s.route().unwrap().start, pos(LOT_A));
        assert_eq!(s.route().unwrap().total_cost(), 300.0);

        s.update_live_position(at(395.0, 2.0));
        assert_eq!(s.route().unwrap().start, pos(LOT_B));
        assert_eq!(s.route().unwrap().total_cost(), 100.0);
    }

    #[test]
    fn invalid_live_fix_is_ignored() {
        let mut s = session();
        s.select_destination_by_name("Gym").unwrap();
        assert!(!s.update_live_position(Coordinate::new(f64::NAN, 37.0)));
        assert!(s.live_position().is_none());
        assert_eq!(s.last_error(), Some(&RoutingError::MissingEndpoint(Target::Start)));

        assert!(s.update_live_position(at(2.0, 1.0)));
        let before = s.route().cloned().unwrap();
        assert!(!s.update_live_position(Coordinate::new(f64::INFINITY, f64::NAN)));
        assert_eq!(s.live_position(), Some(at(2.0, 1.0)));
        assert_eq!(s.route(), Some(&before));
        assert!(s.last_error().is_none());
    }

    #[test]
    fn losing_the_fix_reports_missing_start() {
        let mut s = session();
        s.update_live_position(at(2.0, 1.0));
        s.select_current_position().unwrap();
        s.select_destination_by_name("Gym").unwrap();
        let before = s.route().cloned().unwrap();

        s.clear_live_position();
        assert_eq!(s.membership(), Membership::Unknown);
        assert_eq!(s.start(), Some(&StartSpec::CurrentPosition));
        assert_eq!(s.last_error(), Some(&RoutingError::MissingEndpoint(Target::Start)));
        assert_eq!(s.route(), Some(&before));

        s.update_live_position(at(395.0, 2.0));
        assert!(s.last_error().is_none());
        assert_eq!(s.route().unwrap().start, pos(LOT_B));
    }

    #[test]
    fn losing_the_fix_leaves_fixed_start_alone() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        s.select_destination_by_name("Gym").unwrap();
        s.update_live_position(at(2.0, 1.0));
        s.clear_live_position();
        assert!(s.last_error().is_none());
        assert_eq!(s.route().unwrap().total_cost(), 100.0);
    }

    #[test]
    fn fixed_start_ignores_live_updates() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        s.select_destination_by_name("Gym").unwrap();
        let before = s.route().cloned();
        s.update_live_position(at(395.0, 2.0));
        assert_eq!(s.route().cloned(), before);
    }

    #[test]
    fn transient_failure_keeps_previous_route() {
        let mut s = session();
        s.update_live_position(at(2.0, 1.0));
        s.select_current_position().unwrap();
        s.select_destination_by_name("Gym").unwrap();
        let before = s.route().cloned().unwrap();

        // Walked onto the island: no connection, but the user changed nothing.
        s.update_live_position(pos(ISLAND_1));
        assert_eq!(s.last_error(), Some(&RoutingError::NoRouteFound));
        assert_eq!(s.route(), Some(&before));
    }

    #[test]
    fn failure_after_user_edit_clears_route() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        s.select_destination_by_name("Gym").unwrap();
        assert!(s.route().is_some());

        s.select_destination_by_name("Island Kiosk").unwrap();
        assert_eq!(s.last_error(), Some(&RoutingError::NoRouteFound));
        assert!(s.route().is_none());
    }

    #[test]
    fn last_request_wins() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        s.select_destination_by_name("Gym").unwrap();

        let older = s.request_route();
        s.select_destination_by_name("Hilltop Hall").unwrap();
        let newer = s.request_route();
        assert!(newer.ticket > older.ticket);

        let fresh = newer.run(&DijkstraRouter);
        assert!(s.commit(newer.ticket, fresh));
        assert_eq!(s.route().unwrap().destination, pos(HILL));

        // The older request finishes late and must not overwrite.
        let stale = older.run(&DijkstraRouter);
        assert_eq!(stale.as_ref().map(|r| r.destination), Ok(pos(GYM)));
        assert!(!s.commit(older.ticket, stale));
        assert_eq!(s.route().unwrap().destination, pos(HILL));
    }

    #[test]
    fn request_snapshot_survives_mode_toggle() {
        let mut s = session();
        s.select_start_by_name("Library").unwrap();
        s.select_destination_by_name("Hilltop Hall").unwrap();

        let pending = s.request_route();
        s.set_accessibility(AccessibilityMode::StepFree);
        assert_eq!(s.route().unwrap().total_cost(), 120.0);
        // Still evaluated under the weights it was issued with.
        assert_eq!(pending.run(&DijkstraRouter).unwrap().total_cost(), 30.0);
    }

    #[test]
    fn click_dispatch() {
        let mut s = session();
        assert!(!s.handle_click(&ClickHit::at(pos(GYM))));

        s.select_start_by_name("Library").unwrap();
        assert_eq!(s.toggle_pick_destination(), PickMode::PickingDestination);
        assert!(s.handle_click(&ClickHit::at(at(299.0, 3.0))));
        assert_eq!(s.pick_mode(), PickMode::Idle);
        assert_eq!(s.destination(), Some(&Endpoint::Point(pos(GYM))));
        assert_eq!(s.route().unwrap().total_cost(), 100.0);

        let snap = s.selection_snapshot();
        assert_eq!(snap.pick_mode, PickMode::Idle);
        assert!(snap.destination.is_some_and(|d| !d.is_highlightable()));

        s.toggle_pick_start();
        s.cancel_pick();
        assert_eq!(s.pick_mode(), PickMode::Idle);
        assert!(!s.handle_click(&ClickHit::at(pos(LOT_A))));
    }

    #[test]
    fn non_finite_click_keeps_pick_pending() {
        let mut s = session();
        s.toggle_pick_destination();
        assert!(s.handle_click(&ClickHit::at(Coordinate::new(f64::NAN, f64::NAN))));
        assert!(matches!(s.last_error(), Some(RoutingError::SnapFailed(_))));
        assert_eq!(s.pick_mode(), PickMode::PickingDestination);
        assert!(s.destination().is_none());
    }

    #[test]
    fn session_auto_lot_sets_start() {
        let mut s = session();
        assert!(matches!(
            s.auto_select_lot(),
            Err(SessionError::Routing(RoutingError::MissingEndpoint(Target::Destination)))
        ));

        s.select_destination_by_name("Gym").unwrap();
        let lot = s.auto_select_lot().unwrap();
        assert_eq!(lot.name(), "Lot B");
        assert!(matches!(
            s.start(),
            Some(StartSpec::Endpoint(Endpoint::Place(p))) if p.name() == "Lot B"
        ));
        assert_eq!(s.route().unwrap().total_cost(), 100.0);
    }
}

//! Loader tests: the shipped `content/scenario.json` and ad hoc files written
//! to a temporary directory.

use fleet_core::{VesselKind, World};
use fleet_world::{build_world, default_scenario, load_scenario, Scenario};
use std::io::Write;
use std::path::PathBuf;

/// Integration tests run from the crate directory, so go up two levels.
fn content_scenario() -> PathBuf {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    PathBuf::from(manifest).join("../../content/scenario.json")
}

fn write_scenario(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write scenario");
    file
}

fn world_from(path: &std::path::Path) -> World {
    let scenario = load_scenario(path).expect("scenario should load");
    build_world(&scenario).expect("scenario should build")
}

#[test]
fn test_shipped_scenario_loads_and_builds() {
    let world = world_from(&content_scenario());

    assert_eq!(world.depots().len(), 3);
    assert_eq!(world.vessels().count(), 6);
    assert_eq!(
        world.vessel("Queen").unwrap().kind(),
        Some(VesselKind::CruiseShip)
    );
    assert_eq!(world.group_of("Tiger"), Some("Patrol"));
    assert_eq!(world.group_of("Patrol"), Some("Navy"));
    assert_eq!(world.members("Navy").unwrap(), vec!["Ajax", "Patrol"]);
}

#[test]
fn test_missing_depot_stock_defaults_to_zero() {
    let world = world_from(&content_scenario());
    let bermuda = world.depot("Bermuda").unwrap();
    assert!(bermuda.fuel().abs() < f64::EPSILON);
    assert!(bermuda.production_rate().abs() < f64::EPSILON);
}

#[test]
fn test_default_scenario_round_trips_through_a_file() {
    let json = serde_json::to_string_pretty(&default_scenario()).unwrap();
    let file = write_scenario(&json);

    let loaded: Scenario = load_scenario(file.path()).unwrap();

    assert_eq!(loaded, default_scenario());
}

#[test]
fn test_missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load_scenario(&path).unwrap_err();

    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn test_malformed_json_is_an_error_not_a_panic() {
    let file = write_scenario(r#"{ "depots": [ { "name": "Exxon" } ] }"#);
    let err = load_scenario(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("parsing"));
}

#[test]
fn test_unknown_vessel_kind_is_rejected() {
    let file = write_scenario(
        r#"{ "vessels": [ { "name": "Ajax", "kind": "rowboat", "position": { "x": 0, "y": 0 } } ] }"#,
    );
    assert!(load_scenario(file.path()).is_err());
}

#[test]
#[should_panic(expected = "collides with")]
fn test_colliding_names_abort_loading() {
    let file = write_scenario(
        r#"{
            "depots": [ { "name": "Exxon", "position": { "x": 0, "y": 0 } } ],
            "vessels": [ { "name": "Exodus", "kind": "skimmer", "position": { "x": 1, "y": 1 } } ]
        }"#,
    );
    let _ = load_scenario(file.path());
}

#[test]
fn test_group_cycles_fail_to_build() {
    let file = write_scenario(
        r#"{
            "groups": [
                { "name": "Navy", "members": ["Patrol"] },
                { "name": "Patrol", "members": ["Navy"] }
            ]
        }"#,
    );
    let scenario = load_scenario(file.path()).unwrap();

    let err = build_world(&scenario).unwrap_err();

    assert!(format!("{err:#}").contains("adding Navy to group Patrol"));
}

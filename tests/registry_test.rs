mod common;

use common::{available_station, session_record, station};
use std::collections::HashMap;
use voltboard::model::StationStatus;
use voltboard::registry::FleetRegistry;

#[test]
fn replace_is_wholesale_not_a_merge() {
    let registry = FleetRegistry::new();

    registry.replace_stations(HashMap::from([
        ("A".to_string(), available_station()),
        ("B".to_string(), station(StationStatus::Charging, Some("car2"), 4.0)),
    ]));
    assert_eq!(registry.station_count(), 2);

    // A new poll that no longer reports B drops it entirely
    registry.replace_stations(HashMap::from([("A".to_string(), available_station())]));
    let stations = registry.stations();
    assert_eq!(stations.len(), 1);
    assert!(stations.contains_key("A"));
    assert!(!stations.contains_key("B"));
}

#[test]
fn replaying_the_same_payload_is_idempotent() {
    let registry = FleetRegistry::new();
    let payload = HashMap::from([("A".to_string(), available_station())]);

    registry.replace_stations(payload.clone());
    let first = registry.stations();

    registry.replace_stations(payload);
    let second = registry.stations();

    assert_eq!(first, second);
}

#[test]
fn sessions_keep_backend_order() {
    let registry = FleetRegistry::new();
    registry.replace_sessions(vec![
        session_record(3, "A", "car3", true),
        session_record(2, "B", "car2", false),
        session_record(1, "A", "car1", false),
    ]);

    let sessions = registry.sessions();
    assert_eq!(
        sessions.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );
}

#[test]
fn clear_discards_everything() {
    let registry = FleetRegistry::new();
    registry.replace_stations(HashMap::from([("A".to_string(), available_station())]));
    registry.replace_sessions(vec![session_record(1, "A", "car1", false)]);

    registry.clear();

    assert_eq!(registry.station_count(), 0);
    assert!(registry.stations().is_empty());
    assert!(registry.sessions().is_empty());
}

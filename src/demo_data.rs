//! Greater Cairo demo network.
//!
//! 15 neighborhoods, 12 facilities (four of them hospitals), 36 existing
//! roads and 15 candidate roads. Used as a fixture wherever a realistic
//! snapshot is needed without a running backend.

use serde_json::{json, Value};

use crate::dto::SnapshotPayload;
use crate::snapshot::GraphSnapshot;

/// (id, name, type, population, longitude, latitude)
const NEIGHBORHOODS: [(u32, &str, &str, u64, f64, f64); 15] = [
    (1, "Maadi", "Residential", 250_000, 31.25, 29.96),
    (2, "Nasr City", "Mixed", 500_000, 31.34, 30.06),
    (3, "Downtown Cairo", "Business", 100_000, 31.24, 30.04),
    (4, "New Cairo", "Residential", 300_000, 31.47, 30.03),
    (5, "Heliopolis", "Mixed", 200_000, 31.32, 30.09),
    (6, "Zamalek", "Residential", 50_000, 31.22, 30.06),
    (7, "6th October City", "Mixed", 400_000, 30.98, 29.93),
    (8, "Giza", "Mixed", 550_000, 31.21, 29.99),
    (9, "Mohandessin", "Business", 180_000, 31.20, 30.05),
    (10, "Dokki", "Mixed", 220_000, 31.21, 30.03),
    (11, "Shubra", "Residential", 450_000, 31.24, 30.11),
    (12, "Helwan", "Industrial", 350_000, 31.33, 29.85),
    (13, "New Administrative Capital", "Government", 50_000, 31.80, 30.02),
    (14, "Al Rehab", "Residential", 120_000, 31.49, 30.06),
    (15, "Sheikh Zayed", "Residential", 150_000, 30.94, 30.01),
];

/// (id, name, type, longitude, latitude)
const FACILITIES: [(&str, &str, &str, f64, f64); 12] = [
    ("F1", "Cairo International Airport", "Airport", 31.41, 30.11),
    ("F2", "Ramses Railway Station", "Transit Hub", 31.25, 30.06),
    ("F3", "Cairo University", "Education", 31.21, 30.03),
    ("F4", "Al-Azhar University", "Education", 31.26, 30.05),
    ("F5", "Egyptian Museum", "Tourism", 31.23, 30.05),
    ("F6", "Cairo International Stadium", "Sports", 31.30, 30.07),
    ("F7", "Smart Village", "Business", 30.97, 30.07),
    ("F8", "Cairo Festival City", "Commercial", 31.40, 30.03),
    ("F9", "Qasr El Aini Hospital", "Medical", 31.23, 30.03),
    ("F10", "Maadi Military Hospital", "Medical", 31.25, 29.95),
    ("F11", "Dar El Fouad Hospital", "Medical", 30.99, 29.97),
    ("F12", "57357 Hospital", "Medical", 31.28, 30.08),
];

/// (from, to, distance km, capacity veh/h, condition 1-10)
const EXISTING_ROADS: [(&str, &str, f64, u32, u8); 36] = [
    ("1", "3", 8.5, 3000, 7),
    ("1", "8", 6.2, 2500, 6),
    ("2", "3", 5.9, 2800, 8),
    ("2", "5", 4.0, 3200, 9),
    ("3", "5", 6.1, 3500, 7),
    ("3", "6", 3.2, 2000, 8),
    ("3", "9", 4.5, 2600, 6),
    ("3", "10", 3.8, 2400, 7),
    ("4", "2", 15.2, 3800, 9),
    ("4", "14", 5.3, 3000, 10),
    ("5", "11", 7.9, 3100, 7),
    ("6", "9", 2.2, 1800, 8),
    ("7", "8", 24.5, 3500, 8),
    ("7", "15", 9.8, 3000, 9),
    ("8", "10", 3.3, 2200, 7),
    ("8", "12", 14.8, 2600, 5),
    ("9", "10", 2.1, 1900, 7),
    ("10", "11", 8.7, 2400, 6),
    ("11", "F2", 3.6, 2200, 7),
    ("12", "1", 12.7, 2800, 6),
    ("13", "4", 45.0, 4000, 10),
    ("14", "13", 35.5, 3800, 9),
    ("15", "7", 9.8, 3000, 9),
    ("F1", "5", 7.5, 3500, 9),
    ("F1", "2", 9.2, 3200, 8),
    ("F2", "3", 2.5, 2000, 7),
    ("F7", "15", 8.3, 2800, 8),
    ("F8", "4", 6.1, 3000, 9),
    ("F9", "3", 1.5, 2000, 8),
    ("F9", "10", 2.1, 1800, 7),
    ("F10", "1", 1.8, 2200, 8),
    ("F10", "12", 5.2, 2400, 7),
    ("F11", "7", 3.5, 2000, 8),
    ("F11", "15", 4.8, 2200, 7),
    ("F12", "5", 2.7, 2500, 9),
    ("F12", "2", 3.1, 2300, 8),
];

/// (from, to, distance km, capacity veh/h, cost million EGP)
const POTENTIAL_ROADS: [(&str, &str, f64, u32, u32); 15] = [
    ("1", "4", 22.8, 4000, 450),
    ("1", "14", 25.3, 3800, 500),
    ("2", "13", 48.2, 4500, 950),
    ("3", "13", 56.7, 4500, 1100),
    ("5", "4", 16.8, 3500, 320),
    ("6", "8", 7.5, 2500, 150),
    ("7", "13", 82.3, 4000, 1600),
    ("9", "11", 6.9, 2800, 140),
    ("10", "F7", 27.4, 3200, 550),
    ("11", "13", 62.1, 4200, 1250),
    ("12", "14", 30.5, 3600, 610),
    ("14", "5", 18.2, 3300, 360),
    ("15", "9", 22.7, 3000, 450),
    ("F1", "13", 40.2, 4000, 800),
    ("F7", "9", 26.8, 3200, 540),
];

/// Neighborhood ids are JSON numbers, facility ids strings, as the backend
/// sends them.
fn wire_id(id: &str) -> Value {
    id.parse::<u32>().map(Value::from).unwrap_or_else(|_| Value::from(id))
}

/// The demo network in the shape of the backend's `GET /api/road_network`
/// response.
pub fn cairo_network_json() -> Value {
    let neighborhoods: Vec<Value> = NEIGHBORHOODS
        .iter()
        .map(|&(id, name, kind, population, x, y)| {
            json!({"id": id, "name": name, "type": kind, "population": population, "x": x, "y": y})
        })
        .collect();
    let facilities: Vec<Value> = FACILITIES
        .iter()
        .map(|&(id, name, kind, x, y)| json!({"id": id, "name": name, "type": kind, "x": x, "y": y}))
        .collect();
    let existing: Vec<Value> = EXISTING_ROADS
        .iter()
        .map(|&(from, to, distance, capacity, condition)| {
            json!({
                "from": wire_id(from), "to": wire_id(to),
                "distance": distance, "capacity": capacity, "condition": condition
            })
        })
        .collect();
    let potential: Vec<Value> = POTENTIAL_ROADS
        .iter()
        .map(|&(from, to, distance, capacity, cost)| {
            json!({
                "from": wire_id(from), "to": wire_id(to),
                "distance": distance, "capacity": capacity, "cost": cost
            })
        })
        .collect();

    json!({
        "neighborhoods": neighborhoods,
        "facilities": facilities,
        "existing_roads": existing,
        "potential_roads": potential,
    })
}

pub fn cairo_snapshot_payload() -> SnapshotPayload {
    serde_json::from_value(cairo_network_json()).expect("demo network matches the snapshot contract")
}

/// The demo network, loaded.
///
/// # Panics
///
/// Never in practice; the fixture is validated by this module's tests.
pub fn cairo_snapshot() -> GraphSnapshot {
    GraphSnapshot::load(cairo_snapshot_payload()).expect("demo network has unique ids")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_network_loads() {
        let snapshot = cairo_snapshot();
        let counts = snapshot.counts();
        assert_eq!(counts.neighborhoods, 15);
        assert_eq!(counts.facilities, 12);
        assert_eq!(counts.existing_roads, 36);
        assert_eq!(counts.potential_roads, 15);
    }

    #[test]
    fn test_every_road_endpoint_resolves() {
        let snapshot = cairo_snapshot();
        for road in snapshot.existing_roads().iter().chain(snapshot.potential_roads()) {
            assert!(snapshot.resolve(&road.from).is_ok(), "{}", road.from);
            assert!(snapshot.resolve(&road.to).is_ok(), "{}", road.to);
        }
    }

    #[test]
    fn test_wire_ids_mix_numbers_and_strings() {
        let json = cairo_network_json();
        assert!(json["neighborhoods"][0]["id"].is_number());
        assert!(json["facilities"][0]["id"].is_string());
        assert!(json["existing_roads"][18]["to"].is_string());
    }
}

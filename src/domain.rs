//! Domain model for the city graph.
//!
//! # Overview
//!
//! - [`LocationId`]: node identifier, normalized to its string form
//! - [`Coord`]: geographic point (latitude, longitude)
//! - [`Location`]: a neighborhood or a facility
//! - [`Road`]: an existing or proposed undirected connection

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Type tag marking a facility as a hospital or clinic.
pub const MEDICAL_CATEGORY: &str = "Medical";

/// Identifier of a graph node.
///
/// The backend sends neighborhood ids as JSON numbers and facility ids as
/// strings; both are normalized so `1` and `"1"` name the same node.
///
/// ```
/// use city_planner::domain::LocationId;
///
/// let from_number: LocationId = serde_json::from_str("7").unwrap();
/// let from_string: LocationId = serde_json::from_str("\"7\"").unwrap();
/// assert_eq!(from_number, from_string);
/// assert_eq!(from_number.as_str(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(from = "RawLocationId")]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LocationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLocationId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<RawLocationId> for LocationId {
    fn from(raw: RawLocationId) -> Self {
        match raw {
            RawLocationId::Integer(n) => Self(n.to_string()),
            RawLocationId::Float(n) => Self(n.to_string()),
            RawLocationId::Text(s) => Self(s),
        }
    }
}

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Which of the two disjoint location groups a location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "group", rename_all = "snake_case")]
pub enum LocationKind {
    Neighborhood { population: u64 },
    Facility,
}

/// A named point in the city graph.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Type tag, e.g. "Residential", "Business", "Medical".
    pub category: String,
    pub coord: Coord,
    pub kind: LocationKind,
}

impl Location {
    /// Creates a neighborhood. `x` is longitude, `y` is latitude.
    pub fn neighborhood(
        id: impl Into<LocationId>,
        name: impl Into<String>,
        category: impl Into<String>,
        population: u64,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            coord: Coord::new(y, x),
            kind: LocationKind::Neighborhood { population },
        }
    }

    /// Creates a facility. `x` is longitude, `y` is latitude.
    pub fn facility(
        id: impl Into<LocationId>,
        name: impl Into<String>,
        category: impl Into<String>,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            coord: Coord::new(y, x),
            kind: LocationKind::Facility,
        }
    }

    /// Population of a neighborhood; `None` for facilities.
    pub fn population(&self) -> Option<u64> {
        match self.kind {
            LocationKind::Neighborhood { population } => Some(population),
            LocationKind::Facility => None,
        }
    }

    /// True for facilities whose type tag includes the medical category.
    ///
    /// ```
    /// use city_planner::domain::Location;
    ///
    /// let hospital = Location::facility("F9", "Qasr El Aini Hospital", "Medical", 31.23, 30.03);
    /// let museum = Location::facility("F5", "Egyptian Museum", "Tourism", 31.23, 30.05);
    /// assert!(hospital.is_medical());
    /// assert!(!museum.is_medical());
    /// ```
    pub fn is_medical(&self) -> bool {
        matches!(self.kind, LocationKind::Facility) && self.category.contains(MEDICAL_CATEGORY)
    }

    /// Selection label, e.g. `"Maadi (Residential)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.category)
    }
}

/// An undirected road between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Road {
    pub from: LocationId,
    pub to: LocationId,
    /// Length in km.
    pub distance: f64,
    /// Vehicles per hour.
    #[serde(default)]
    pub capacity: f64,
    /// Surface condition 1-10; absent for proposed roads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<f64>,
    /// Construction or repair cost in million EGP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// `false` for candidate roads.
    #[serde(default)]
    pub existing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_id_normalizes_floats() {
        let id: LocationId = serde_json::from_str("3.0").unwrap();
        assert_eq!(id, LocationId::from("3"));
    }

    #[test]
    fn test_neighborhood_coordinates_swap_axes() {
        let maadi = Location::neighborhood(1.to_string(), "Maadi", "Residential", 250_000, 31.25, 29.96);
        assert_eq!(maadi.coord, Coord::new(29.96, 31.25));
        assert_eq!(maadi.population(), Some(250_000));
        assert!(!maadi.is_medical());
    }

    #[test]
    fn test_medical_tag_matches_substring() {
        let clinic = Location::facility("F20", "Clinic", "Medical Center", 0.0, 0.0);
        assert!(clinic.is_medical());
    }

    #[test]
    fn test_neighborhood_is_never_medical() {
        let odd = Location::neighborhood("N1", "Odd", "Medical", 10, 0.0, 0.0);
        assert!(!odd.is_medical());
    }

    #[test]
    fn test_road_defaults_for_proposed_roads() {
        let road: Road =
            serde_json::from_str(r#"{"from": 1, "to": "F7", "distance": 27.4, "capacity": 3200, "cost": 550}"#)
                .unwrap();
        assert_eq!(road.from.as_str(), "1");
        assert_eq!(road.condition, None);
        assert_eq!(road.cost, Some(550.0));
        assert!(!road.existing);
    }

    #[test]
    fn test_label_format() {
        let loc = Location::facility("F1", "Cairo International Airport", "Airport", 31.41, 30.11);
        assert_eq!(loc.label(), "Cairo International Airport (Airport)");
    }
}

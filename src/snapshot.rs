//! In-memory city graph and the selection inputs derived from it.
//!
//! A [`GraphSnapshot`] is built once per load and shared read-only through
//! an `Arc`. Reloading replaces it wholesale.

use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use utoipa::ToSchema;

use crate::domain::{Location, LocationId, Road};
use crate::dto::SnapshotPayload;
use crate::error::{ResolutionError, SnapshotError};

/// Position of a location inside the snapshot's two groups.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Neighborhood(usize),
    Facility(usize),
}

/// Locations and roads as of the last load.
///
/// # Examples
///
/// ```
/// use city_planner::dto::SnapshotPayload;
/// use city_planner::snapshot::GraphSnapshot;
///
/// let payload: SnapshotPayload = serde_json::from_str(r#"{
///     "neighborhoods": [{"id": 1, "name": "Maadi", "type": "Residential", "population": 250000, "x": 31.25, "y": 29.96}],
///     "facilities": [{"id": "F9", "name": "Qasr El Aini Hospital", "type": "Medical", "x": 31.23, "y": 30.03}],
///     "existing_roads": [{"from": "F9", "to": 1, "distance": 6.0, "capacity": 2000, "condition": 8}],
///     "potential_roads": []
/// }"#).unwrap();
///
/// let snapshot = GraphSnapshot::load(payload).unwrap();
/// assert_eq!(snapshot.resolve(&"1".into()).unwrap().name, "Maadi");
/// assert_eq!(snapshot.medical_facilities().count(), 1);
/// assert!(snapshot.resolve(&"F404".into()).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    neighborhoods: Vec<Location>,
    facilities: Vec<Location>,
    existing_roads: Vec<Road>,
    potential_roads: Vec<Road>,
    index: HashMap<LocationId, Slot>,
}

impl GraphSnapshot {
    /// Validates a backend payload and builds the snapshot.
    ///
    /// Fails when any of the four groups is missing or when an id occurs
    /// twice, within a group or across groups.
    pub fn load(payload: SnapshotPayload) -> Result<Self, SnapshotError> {
        let neighborhoods = payload
            .neighborhoods
            .ok_or(SnapshotError::MissingField("neighborhoods"))?;
        let facilities = payload
            .facilities
            .ok_or(SnapshotError::MissingField("facilities"))?;
        let existing_roads = payload
            .existing_roads
            .ok_or(SnapshotError::MissingField("existing_roads"))?;
        let potential_roads = payload
            .potential_roads
            .ok_or(SnapshotError::MissingField("potential_roads"))?;

        let neighborhoods: Vec<Location> = neighborhoods
            .into_iter()
            .map(|n| Location::neighborhood(n.id, n.name, n.category, n.population, n.x, n.y))
            .collect();
        let facilities: Vec<Location> = facilities
            .into_iter()
            .map(|f| Location::facility(f.id, f.name, f.category, f.x, f.y))
            .collect();

        let mut index = HashMap::with_capacity(neighborhoods.len() + facilities.len());
        let slots = neighborhoods
            .iter()
            .enumerate()
            .map(|(i, loc)| (&loc.id, Slot::Neighborhood(i)))
            .chain(
                facilities
                    .iter()
                    .enumerate()
                    .map(|(i, loc)| (&loc.id, Slot::Facility(i))),
            );
        for (id, slot) in slots {
            match index.entry(id.clone()) {
                Entry::Occupied(_) => return Err(SnapshotError::DuplicateId(id.clone())),
                Entry::Vacant(v) => {
                    v.insert(slot);
                }
            }
        }

        let existing_roads = existing_roads
            .into_iter()
            .map(|r| Road { existing: true, ..r })
            .collect();
        let potential_roads = potential_roads
            .into_iter()
            .map(|r| Road { existing: false, ..r })
            .collect();

        Ok(Self {
            neighborhoods,
            facilities,
            existing_roads,
            potential_roads,
            index,
        })
    }

    /// Looks up a location, neighborhoods first.
    pub fn resolve(&self, id: &LocationId) -> Result<&Location, ResolutionError> {
        match self.index.get(id) {
            Some(Slot::Neighborhood(i)) => Ok(&self.neighborhoods[*i]),
            Some(Slot::Facility(i)) => Ok(&self.facilities[*i]),
            None => Err(ResolutionError(id.clone())),
        }
    }

    /// Display name of a location, or the raw id when it does not resolve.
    pub fn name_of(&self, id: &LocationId) -> String {
        self.resolve(id)
            .map(|loc| loc.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    /// Facilities whose type tag includes the medical category.
    pub fn medical_facilities(&self) -> impl Iterator<Item = &Location> {
        self.facilities.iter().filter(|f| f.is_medical())
    }

    /// True when `id` names a medical facility.
    pub fn is_medical(&self, id: &LocationId) -> bool {
        self.resolve(id).map(Location::is_medical).unwrap_or(false)
    }

    pub fn neighborhoods(&self) -> &[Location] {
        &self.neighborhoods
    }

    pub fn facilities(&self) -> &[Location] {
        &self.facilities
    }

    /// Every location, neighborhoods first.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.neighborhoods.iter().chain(self.facilities.iter())
    }

    pub fn existing_roads(&self) -> &[Road] {
        &self.existing_roads
    }

    pub fn potential_roads(&self) -> &[Road] {
        &self.potential_roads
    }

    /// Group sizes for status reporting.
    pub fn counts(&self) -> SnapshotCounts {
        SnapshotCounts {
            neighborhoods: self.neighborhoods.len(),
            facilities: self.facilities.len(),
            existing_roads: self.existing_roads.len(),
            potential_roads: self.potential_roads.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SnapshotCounts {
    pub neighborhoods: usize,
    pub facilities: usize,
    pub existing_roads: usize,
    pub potential_roads: usize,
}

// ============================================================================
// Selection inputs
// ============================================================================

/// Named input controls fed from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ControlId {
    StartLocation,
    EndLocation,
    EmergencyStart,
    EmergencyEnd,
    IntersectionsSelect,
}

impl ControlId {
    pub const ALL: [ControlId; 5] = [
        ControlId::StartLocation,
        ControlId::EndLocation,
        ControlId::EmergencyStart,
        ControlId::EmergencyEnd,
        ControlId::IntersectionsSelect,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SelectOption {
    pub value: LocationId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OptionGroup {
    pub label: &'static str,
    pub options: Vec<SelectOption>,
}

/// Options of one control.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ControlOptions {
    pub control: ControlId,
    pub groups: Vec<OptionGroup>,
}

/// Option lists for every named control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SelectionInputs {
    pub controls: Vec<ControlOptions>,
}

impl SelectionInputs {
    /// Rebuilds every control from a freshly loaded snapshot.
    ///
    /// The emergency destination only lists medical facilities; every other
    /// control lists neighborhoods and important facilities in two groups.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let to_options = |locations: &mut dyn Iterator<Item = &Location>| -> Vec<SelectOption> {
            locations
                .map(|loc| SelectOption {
                    value: loc.id.clone(),
                    label: loc.label(),
                })
                .collect()
        };

        let all_groups = vec![
            OptionGroup {
                label: "Neighborhoods",
                options: to_options(&mut snapshot.neighborhoods().iter()),
            },
            OptionGroup {
                label: "Important Facilities",
                options: to_options(&mut snapshot.facilities().iter()),
            },
        ];
        let medical_groups = vec![OptionGroup {
            label: "Medical Facilities",
            options: to_options(&mut snapshot.medical_facilities()),
        }];

        let controls = ControlId::ALL
            .into_iter()
            .map(|control| ControlOptions {
                control,
                groups: if control == ControlId::EmergencyEnd {
                    medical_groups.clone()
                } else {
                    all_groups.clone()
                },
            })
            .collect();

        Self { controls }
    }

    pub fn control(&self, id: ControlId) -> Option<&ControlOptions> {
        self.controls.iter().find(|c| c.control == id)
    }
}

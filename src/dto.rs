//! Wire contracts with the optimization backend.
//!
//! Field names follow the backend's JSON. Numeric fields default to zero
//! when absent so a partially populated result still renders.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LocationId, Road};
use crate::view::ViewKind;

// ============================================================================
// Snapshot
// ============================================================================

/// `GET /api/road_network` response.
///
/// Every group is optional on the wire so a missing one is reported as a
/// [`SnapshotError::MissingField`](crate::error::SnapshotError::MissingField)
/// rather than a generic decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotPayload {
    pub neighborhoods: Option<Vec<NeighborhoodDto>>,
    pub facilities: Option<Vec<FacilityDto>>,
    pub existing_roads: Option<Vec<Road>>,
    pub potential_roads: Option<Vec<Road>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodDto {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub population: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityDto {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: String,
    pub x: f64,
    pub y: f64,
}

// ============================================================================
// Requests
// ============================================================================

/// Spanning-tree algorithm the backend should use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Prim,
    Kruskal,
}

/// Traffic period used for congestion estimates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Body of `POST /api/optimize_network`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NetworkRequest {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default = "default_true")]
    pub prioritize_population: bool,
}

impl Default for NetworkRequest {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Prim,
            prioritize_population: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Body of `POST /api/shortest_path` and `POST /api/emergency_route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteRequest {
    pub start: LocationId,
    pub end: LocationId,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
}

/// Body of `POST /api/optimize_signals`.
///
/// An empty `intersections` list lets the backend choose the busiest ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SignalRequest {
    #[serde(default)]
    pub intersections: Vec<LocationId>,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
}

// ============================================================================
// Results
// ============================================================================

/// Minimum-cost road network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NetworkResult {
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_distance: f64,
    #[serde(default)]
    pub critical_facilities_connected: bool,
    #[serde(default)]
    pub edges: Vec<NetworkEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NetworkEdge {
    pub from: LocationId,
    pub to: LocationId,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub existing: bool,
}

/// Shortest or emergency route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteResult {
    #[serde(default)]
    pub distance: f64,
    /// Minutes.
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub path: Vec<LocationId>,
    #[serde(default)]
    pub path_details: PathDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PathDetails {
    #[serde(default)]
    pub average_congestion: f64,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteStep {
    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub to_name: String,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub traffic: f64,
    #[serde(default)]
    pub capacity: f64,
    #[serde(default)]
    pub congestion: f64,
}

/// Public transport schedules and road maintenance selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransportResult {
    #[serde(default)]
    pub estimated_improvement: Improvement,
    #[serde(default)]
    pub metro_schedules: Vec<MetroSchedule>,
    #[serde(default)]
    pub bus_schedules: Vec<BusSchedule>,
    #[serde(default)]
    pub maintenance_plan: MaintenancePlan,
}

/// Estimated fractional improvement per mode and overall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Improvement {
    #[serde(default)]
    pub metro: f64,
    #[serde(default)]
    pub bus: f64,
    #[serde(default)]
    pub road: f64,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetroSchedule {
    #[serde(default)]
    pub line_name: String,
    /// Trains per hour.
    #[serde(default)]
    pub optimal_frequency: f64,
    #[serde(default)]
    pub trains_needed: f64,
    #[serde(default)]
    pub stations: Vec<LocationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BusSchedule {
    pub route_id: LocationId,
    #[serde(default)]
    pub optimal_buses: f64,
    #[serde(default)]
    pub utilization: f64,
    #[serde(default)]
    pub stops: Vec<LocationId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MaintenancePlan {
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub average_improvement: f64,
    #[serde(default)]
    pub selected_roads: Vec<Road>,
}

/// Optimized timing for one intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IntersectionSignal {
    pub intersection: LocationId,
    #[serde(default)]
    pub intersection_name: String,
    #[serde(default)]
    pub approaches: u32,
    /// Seconds for one full rotation.
    #[serde(default)]
    pub cycle_time: f64,
    #[serde(default)]
    pub signal_phases: Vec<SignalPhase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SignalPhase {
    #[serde(default)]
    pub approach_name: String,
    /// Seconds.
    #[serde(default)]
    pub green_time: f64,
    #[serde(default)]
    pub priority: f64,
    #[serde(default)]
    pub emergency_priority: bool,
}

/// Any backend result, one case per operation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum OptimizationResult {
    Network(NetworkResult),
    Route(RouteResult),
    Emergency(RouteResult),
    Transport(TransportResult),
    Signals(Vec<IntersectionSignal>),
}

impl OptimizationResult {
    /// View this result is drawn on.
    pub fn view_kind(&self) -> ViewKind {
        match self {
            OptimizationResult::Network(_) => ViewKind::Network,
            OptimizationResult::Route(_) => ViewKind::Route,
            OptimizationResult::Emergency(_) => ViewKind::Emergency,
            OptimizationResult::Transport(_) => ViewKind::Transport,
            OptimizationResult::Signals(_) => ViewKind::Signals,
        }
    }
}

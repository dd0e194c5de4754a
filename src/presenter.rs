//! Human-readable summaries of optimization results.
//!
//! Presentation is pure: it reads a result and the snapshot (for names
//! only) and returns a [`PanelContent`]. Nothing here touches a view.

use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    IntersectionSignal, NetworkResult, OptimizationResult, RouteResult, TransportResult,
};
use crate::error::PlannerError;
use crate::snapshot::GraphSnapshot;
use crate::view::ViewKind;

/// Content of one result panel.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum PanelContent {
    Empty,
    Summary(Summary),
    Error(ErrorNotice),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Summary {
    pub title: String,
    pub metrics: Vec<Metric>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Section {
    pub heading: String,
    pub metrics: Vec<Metric>,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Items { items: Vec<Item> },
    Table { columns: Vec<String>, rows: Vec<Vec<String>> },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Item {
    pub title: String,
    pub details: Vec<String>,
    pub badges: Vec<Badge>,
    /// Drawn with emphasis, e.g. emergency-priority phases.
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Badge {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// Failure shown in place of a summary.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrorNotice {
    pub message: String,
    /// Suggested next steps; empty unless the failure has a known fix.
    pub remediation: Vec<String>,
}

fn metric(label: &str, value: impl Into<String>) -> Metric {
    Metric {
        label: label.to_string(),
        value: value.into(),
    }
}

fn badge(text: impl Into<String>, tone: Tone) -> Badge {
    Badge {
        text: text.into(),
        tone,
    }
}

/// Formats a number with thousands separators, keeping up to three
/// fractional digits.
///
/// ```
/// use city_planner::presenter::format_grouped;
///
/// assert_eq!(format_grouped(12345.0), "12,345");
/// assert_eq!(format_grouped(1234.5), "1,234.5");
/// assert_eq!(format_grouped(-980.0), "-980");
/// ```
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let millis = (value.abs() * 1000.0).round() as u64;
    let whole = (millis / 1000).to_formatted_string(&Locale::en);
    let frac = millis % 1000;
    let sign = if value < 0.0 && millis > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{}{}", sign, whole)
    } else {
        let digits = format!("{:03}", frac);
        format!("{}{}.{}", sign, whole, digits.trim_end_matches('0'))
    }
}

/// Summary for any result.
pub fn present(snapshot: &GraphSnapshot, result: &OptimizationResult) -> Summary {
    match result {
        OptimizationResult::Network(network) => present_network(snapshot, network),
        OptimizationResult::Route(route) => present_route("Optimal Route", route),
        OptimizationResult::Emergency(route) => present_route("Emergency Route", route),
        OptimizationResult::Transport(transport) => present_transport(snapshot, transport),
        OptimizationResult::Signals(signals) => present_signals(signals),
    }
}

pub fn present_network(snapshot: &GraphSnapshot, network: &NetworkResult) -> Summary {
    let new_roads = network
        .edges
        .iter()
        .filter(|e| !e.existing)
        .map(|e| Item {
            title: format!("{} to {}", snapshot.name_of(&e.from), snapshot.name_of(&e.to)),
            details: Vec::new(),
            badges: vec![badge(format!("{} km", e.distance), Tone::Primary)],
            highlight: false,
        })
        .collect();

    Summary {
        title: "Optimized Road Network".to_string(),
        metrics: vec![
            metric("Total Distance", format!("{:.1} km", network.total_distance)),
            metric(
                "Construction Cost",
                format!("{} million EGP", format_grouped(network.total_cost)),
            ),
            metric(
                "Critical Facilities Connected",
                if network.critical_facilities_connected { "Yes" } else { "No" },
            ),
            metric("Roads Included", network.edges.len().to_string()),
        ],
        sections: vec![Section {
            heading: "New Roads Recommended".to_string(),
            metrics: Vec::new(),
            block: Block::Items { items: new_roads },
        }],
    }
}

pub fn present_route(title: &str, route: &RouteResult) -> Summary {
    let steps = route
        .path_details
        .steps
        .iter()
        .map(|step| Item {
            title: format!("{} to {}", step.from_name, step.to_name),
            details: vec![
                format!("Distance: {} km | Time: {:.1} min", step.distance, step.time),
                format!(
                    "Traffic: {}/{} ({:.1}% congestion)",
                    step.traffic,
                    step.capacity,
                    step.congestion * 100.0
                ),
            ],
            badges: Vec::new(),
            highlight: false,
        })
        .collect();

    Summary {
        title: title.to_string(),
        metrics: vec![
            metric("Total Distance", format!("{:.1} km", route.distance)),
            metric("Estimated Time", format!("{:.1} minutes", route.time)),
            metric(
                "Average Congestion",
                format!("{:.1}%", route.path_details.average_congestion * 100.0),
            ),
        ],
        sections: vec![Section {
            heading: "Route Steps".to_string(),
            metrics: Vec::new(),
            block: Block::Items { items: steps },
        }],
    }
}

pub fn present_transport(snapshot: &GraphSnapshot, transport: &TransportResult) -> Summary {
    let metro = Section {
        heading: "Metro Line Optimizations".to_string(),
        metrics: Vec::new(),
        block: Block::Table {
            columns: vec!["Line".into(), "Optimal Frequency".into(), "Trains Needed".into()],
            rows: transport
                .metro_schedules
                .iter()
                .map(|line| {
                    vec![
                        line.line_name.clone(),
                        format!("{:.2} trains/hour", line.optimal_frequency),
                        line.trains_needed.to_string(),
                    ]
                })
                .collect(),
        },
    };

    let buses = Section {
        heading: "Bus Route Optimizations".to_string(),
        metrics: Vec::new(),
        block: Block::Table {
            columns: vec!["Route".into(), "Optimal Buses".into(), "Current Utilization".into()],
            rows: transport
                .bus_schedules
                .iter()
                .map(|route| {
                    vec![
                        route.route_id.to_string(),
                        route.optimal_buses.ceil().to_string(),
                        format!("{:.1}%", route.utilization * 100.0),
                    ]
                })
                .collect(),
        },
    };

    let plan = &transport.maintenance_plan;
    let roads = plan
        .selected_roads
        .iter()
        .map(|road| {
            let condition = road
                .condition
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".to_string());
            Item {
                title: format!("{} to {}", snapshot.name_of(&road.from), snapshot.name_of(&road.to)),
                details: Vec::new(),
                badges: vec![
                    badge(format!("Current: {}/10", condition), Tone::Secondary),
                    badge("Improved: 10/10", Tone::Success),
                    badge(format!("Cost: {}M EGP", road.cost.unwrap_or_default()), Tone::Primary),
                ],
                highlight: false,
            }
        })
        .collect();
    let maintenance = Section {
        heading: "Road Maintenance Plan".to_string(),
        metrics: vec![
            metric("Total Budget", format!("{} million EGP", format_grouped(plan.total_cost))),
            metric("Roads Selected", plan.selected_roads.len().to_string()),
            metric(
                "Average Condition Improvement",
                format!("{:.1} points", plan.average_improvement),
            ),
        ],
        block: Block::Items { items: roads },
    };

    Summary {
        title: "Public Transport Optimization".to_string(),
        metrics: vec![metric(
            "Estimated Improvement",
            format!("{:.1}%", transport.estimated_improvement.total * 100.0),
        )],
        sections: vec![metro, buses, maintenance],
    }
}

pub fn present_signals(signals: &[IntersectionSignal]) -> Summary {
    let sections = signals
        .iter()
        .map(|signal| Section {
            heading: signal.intersection_name.clone(),
            metrics: vec![
                metric("Approaches", signal.approaches.to_string()),
                metric("Cycle Time", format!("{} seconds", signal.cycle_time)),
            ],
            block: Block::Items {
                items: signal
                    .signal_phases
                    .iter()
                    .map(|phase| Item {
                        title: phase.approach_name.clone(),
                        details: vec![
                            format!("Green Time: {:.1} seconds", phase.green_time),
                            format!("Priority: {:.1}", phase.priority),
                        ],
                        badges: if phase.emergency_priority {
                            vec![badge("Emergency Priority", Tone::Danger)]
                        } else {
                            Vec::new()
                        },
                        highlight: phase.emergency_priority,
                    })
                    .collect(),
            },
        })
        .collect();

    Summary {
        title: "Optimized Traffic Signals".to_string(),
        metrics: vec![metric("Intersections Optimized", signals.len().to_string())],
        sections,
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Notice for a failed operation on `view`.
///
/// A "No path found" reply on the route or emergency view carries a list of
/// next steps.
pub fn present_error(view: ViewKind, err: &PlannerError) -> ErrorNotice {
    let (message, remediation) = match err {
        PlannerError::Request(req) if req.is_no_path() => (
            req.message().to_string(),
            no_path_remediation(view),
        ),
        PlannerError::Request(req) => (req.to_string(), Vec::new()),
        other => (other.to_string(), Vec::new()),
    };
    ErrorNotice {
        message,
        remediation,
    }
}

fn no_path_remediation(view: ViewKind) -> Vec<String> {
    let first = match view {
        ViewKind::Emergency => "Try a different hospital",
        ViewKind::Route => "Try a different destination",
        _ => return Vec::new(),
    };
    vec![
        first.to_string(),
        "Check if your starting location is properly connected".to_string(),
        "Report this location to city planners".to_string(),
    ]
}

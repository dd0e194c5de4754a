//! Colors, weights and glyphs shared by the renderers.

use crate::domain::Location;
use crate::overlay::Style;

pub const MUTED_ROAD: Style = Style::stroke("gray", 2.0).with_opacity(0.5);

pub const EXISTING_EDGE: Style = Style::stroke("blue", 3.0);
pub const PROPOSED_EDGE: Style = Style::stroke("green", 3.0).dashed("5, 5");

pub const ROUTE_LINE: Style = Style::stroke("blue", 5.0).with_opacity(0.7);
pub const EMERGENCY_LINE: Style = Style::stroke("red", 5.0).with_opacity(0.7).dashed("10, 10");

pub const METRO_LINE: Style = Style::stroke("red", 4.0).with_opacity(0.7);
pub const BUS_LINE: Style = Style::stroke("blue", 3.0).with_opacity(0.5).dashed("5, 5");
pub const MAINTENANCE_ROAD: Style = Style::stroke("orange", 4.0);

pub const FACILITY_RADIUS: f64 = 8.0;
pub const HOSPITAL_RADIUS: f64 = 10.0;
pub const STATION_RADIUS: f64 = 6.0;
pub const BUS_STOP_RADIUS: f64 = 4.0;
pub const SECTOR_RADIUS: f64 = 15.0;
pub const INTERSECTION_RADIUS: f64 = 5.0;

pub const MARKER_FILL: f64 = 0.8;
pub const FACILITY: Style = Style::filled("red", MARKER_FILL);
pub const STATION: Style = Style::filled("red", MARKER_FILL);
pub const BUS_STOP: Style = Style::filled("blue", MARKER_FILL);
pub const INTERSECTION: Style = Style::filled("#343a40", 1.0);

pub const GREEN_PHASE: Style = Style::solid("#28a745", 0.7);
pub const EMERGENCY_PHASE: Style = Style::solid("#dc3545", 0.7);

pub const START_GLYPH: (&str, &str) = ("🟢", "start-marker");
pub const END_GLYPH: (&str, &str) = ("🔴", "end-marker");
pub const HOSPITAL_GLYPH: (&str, &str) = ("🏥", "hospital-marker");

/// Marker radius grows with population, one pixel per 100k residents.
pub fn neighborhood_radius(population: u64) -> f64 {
    5.0 + population as f64 / 100_000.0
}

pub fn neighborhood_style(location: &Location) -> Style {
    let fill = match location.category.as_str() {
        "Residential" => "green",
        "Business" => "blue",
        _ => "orange",
    };
    Style::filled(fill, MARKER_FILL)
}

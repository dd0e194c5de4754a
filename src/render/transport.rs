use crate::domain::{Coord, Location, LocationId};
use crate::dto::{OptimizationResult, TransportResult};
use crate::error::MismatchedResult;
use crate::overlay::{Overlay, Style};
use crate::snapshot::GraphSnapshot;
use crate::view::ViewKind;

use super::style;
use super::{Drawing, Framing, Resolver, ViewRenderer};

/// Public transport view: metro lines, bus routes and maintenance roads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportRenderer;

impl ViewRenderer for TransportRenderer {
    fn kind(&self) -> ViewKind {
        ViewKind::Transport
    }

    fn context(&self, _snapshot: &GraphSnapshot) -> Vec<Overlay> {
        Vec::new()
    }

    fn draw(
        &self,
        snapshot: &GraphSnapshot,
        result: &OptimizationResult,
    ) -> Result<Drawing, MismatchedResult> {
        let OptimizationResult::Transport(transport) = result else {
            return Err(self.mismatch(result));
        };

        let mut resolver = Resolver::new(snapshot);
        let mut overlays = Vec::new();
        draw_metro(transport, &mut resolver, &mut overlays);
        draw_buses(transport, &mut resolver, &mut overlays);
        draw_maintenance(transport, &mut resolver, &mut overlays);

        Ok(Drawing {
            overlays,
            framing: Framing::Keep,
            skipped: resolver.skipped,
        })
    }
}

/// Line through the resolvable stops plus one marker per stop.
///
/// Fewer than two resolvable stops drops the whole line.
fn stop_line(
    stops: &[LocationId],
    resolver: &mut Resolver<'_>,
    line: impl FnOnce(Vec<Coord>) -> Overlay,
    marker: impl Fn(&Location) -> Overlay,
    out: &mut Vec<Overlay>,
) {
    let resolved: Vec<&Location> = stops.iter().filter_map(|id| resolver.location(id)).collect();
    if resolved.len() < 2 {
        resolver.skip();
        return;
    }
    out.push(line(resolved.iter().map(|loc| loc.coord).collect()));
    out.extend(resolved.into_iter().map(marker));
}

fn draw_metro(transport: &TransportResult, resolver: &mut Resolver<'_>, out: &mut Vec<Overlay>) {
    for line in &transport.metro_schedules {
        stop_line(
            &line.stations,
            resolver,
            |path| {
                Overlay::line(path, style::METRO_LINE).with_popup(format!(
                    "{}\nOptimal frequency: {:.2} trains/hour",
                    line.line_name, line.optimal_frequency
                ))
            },
            |station| marker(station, style::STATION_RADIUS, style::STATION, "Metro Station"),
            out,
        );
    }
}

fn draw_buses(transport: &TransportResult, resolver: &mut Resolver<'_>, out: &mut Vec<Overlay>) {
    for route in &transport.bus_schedules {
        stop_line(
            &route.stops,
            resolver,
            |path| {
                Overlay::line(path, style::BUS_LINE).with_popup(format!(
                    "Bus Route {}\nOptimal buses: {}",
                    route.route_id,
                    route.optimal_buses.ceil()
                ))
            },
            |stop| marker(stop, style::BUS_STOP_RADIUS, style::BUS_STOP, "Bus Stop"),
            out,
        );
    }
}

fn draw_maintenance(transport: &TransportResult, resolver: &mut Resolver<'_>, out: &mut Vec<Overlay>) {
    for road in &transport.maintenance_plan.selected_roads {
        let Some((from, to)) = resolver.segment(&road.from, &road.to) else {
            continue;
        };
        let condition = road
            .condition
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());
        let cost = road.cost.unwrap_or_default();
        out.push(
            Overlay::line(vec![from.coord, to.coord], style::MAINTENANCE_ROAD).with_popup(format!(
                "Maintenance Priority\nFrom: {}\nTo: {}\nCurrent condition: {}/10\nCost: {}M EGP",
                from.name, to.name, condition, cost
            )),
        );
    }
}

fn marker(location: &Location, radius: f64, marker_style: Style, label: &str) -> Overlay {
    Overlay::dot(location.coord, radius, marker_style).with_popup(format!("{}\n{}", location.name, label))
}

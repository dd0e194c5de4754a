use crate::dto::OptimizationResult;
use crate::error::MismatchedResult;
use crate::overlay::Overlay;
use crate::snapshot::GraphSnapshot;
use crate::view::ViewKind;

use super::style;
use super::{Drawing, Framing, Resolver, ViewRenderer};

/// Road network view: every location as context, network edges as results.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkRenderer;

impl ViewRenderer for NetworkRenderer {
    fn kind(&self) -> ViewKind {
        ViewKind::Network
    }

    fn context(&self, snapshot: &GraphSnapshot) -> Vec<Overlay> {
        let neighborhoods = snapshot.neighborhoods().iter().map(|loc| {
            let population = loc.population().unwrap_or_default();
            Overlay::dot(
                loc.coord,
                style::neighborhood_radius(population),
                style::neighborhood_style(loc),
            )
            .with_popup(format!(
                "{}\nType: {}\nPopulation: {}",
                loc.name, loc.category, population
            ))
        });
        let facilities = snapshot.facilities().iter().map(|loc| {
            Overlay::dot(loc.coord, style::FACILITY_RADIUS, style::FACILITY)
                .with_popup(format!("{}\nType: {}", loc.name, loc.category))
        });
        neighborhoods.chain(facilities).collect()
    }

    /// The current road layout, replaced by the first network result.
    fn initial_results(&self, snapshot: &GraphSnapshot) -> Vec<Overlay> {
        snapshot
            .existing_roads()
            .iter()
            .filter_map(|road| {
                let from = snapshot.resolve(&road.from).ok()?;
                let to = snapshot.resolve(&road.to).ok()?;
                let condition = road
                    .condition
                    .map(|c| format!("{}/10", c))
                    .unwrap_or_else(|| "unknown".to_string());
                Some(
                    Overlay::line(vec![from.coord, to.coord], style::EXISTING_EDGE).with_popup(
                        format!(
                            "Road from {} to {}\nDistance: {} km\nCapacity: {} vehicles/hour\nCondition: {}",
                            from.name, to.name, road.distance, road.capacity, condition
                        ),
                    ),
                )
            })
            .collect()
    }

    fn draw(
        &self,
        snapshot: &GraphSnapshot,
        result: &OptimizationResult,
    ) -> Result<Drawing, MismatchedResult> {
        let OptimizationResult::Network(network) = result else {
            return Err(self.mismatch(result));
        };

        let mut resolver = Resolver::new(snapshot);
        let overlays = network
            .edges
            .iter()
            .filter_map(|edge| {
                let (from, to) = resolver.segment(&edge.from, &edge.to)?;
                let (line_style, label) = if edge.existing {
                    (style::EXISTING_EDGE, "Existing")
                } else {
                    (style::PROPOSED_EDGE, "Proposed")
                };
                Some(
                    Overlay::line(vec![from.coord, to.coord], line_style).with_popup(format!(
                        "Road from {} to {}\nDistance: {} km\n{}",
                        from.name, to.name, edge.distance, label
                    )),
                )
            })
            .collect();

        Ok(Drawing {
            overlays,
            framing: Framing::Keep,
            skipped: resolver.skipped,
        })
    }
}

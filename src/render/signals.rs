use tracing::debug;

use crate::dto::OptimizationResult;
use crate::error::MismatchedResult;
use crate::geometry::phase_sectors;
use crate::overlay::Overlay;
use crate::snapshot::GraphSnapshot;
use crate::view::ViewKind;

use super::style;
use super::{muted_roads, Drawing, Framing, Resolver, ViewRenderer};

/// Signal timing view: one pie of green phases per intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalRenderer;

impl ViewRenderer for SignalRenderer {
    fn kind(&self) -> ViewKind {
        ViewKind::Signals
    }

    fn context(&self, snapshot: &GraphSnapshot) -> Vec<Overlay> {
        muted_roads(snapshot)
    }

    fn draw(
        &self,
        snapshot: &GraphSnapshot,
        result: &OptimizationResult,
    ) -> Result<Drawing, MismatchedResult> {
        let OptimizationResult::Signals(signals) = result else {
            return Err(self.mismatch(result));
        };

        let mut resolver = Resolver::new(snapshot);
        let mut overlays = Vec::new();
        let mut framed = Vec::new();

        for signal in signals {
            let Some(location) = resolver.location(&signal.intersection) else {
                continue;
            };
            if !signal.cycle_time.is_finite() || signal.cycle_time <= 0.0 {
                debug!(
                    intersection = %signal.intersection,
                    cycle_time = signal.cycle_time,
                    "Skipping intersection with unusable cycle time"
                );
                resolver.skip();
                continue;
            }

            let greens: Vec<f64> = signal.signal_phases.iter().map(|p| p.green_time).collect();
            let sectors = phase_sectors(signal.cycle_time, &greens);
            for (phase, (start, end)) in signal.signal_phases.iter().zip(sectors) {
                let sector_style = if phase.emergency_priority {
                    style::EMERGENCY_PHASE
                } else {
                    style::GREEN_PHASE
                };
                overlays.push(
                    Overlay::sector(location.coord, style::SECTOR_RADIUS, start, end, sector_style)
                        .with_popup(format!(
                            "{}\n{}\nGreen Time: {:.1}s\nPriority: {:.1}",
                            signal.intersection_name, phase.approach_name, phase.green_time, phase.priority
                        )),
                );
            }

            overlays.push(
                Overlay::dot(location.coord, style::INTERSECTION_RADIUS, style::INTERSECTION)
                    .with_popup(format!("{}\nOptimized traffic signals", signal.intersection_name)),
            );
            framed.push(location.coord);
        }

        Ok(Drawing {
            overlays,
            framing: Framing::Fit(framed),
            skipped: resolver.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo_data::cairo_snapshot;
    use crate::dto::{IntersectionSignal, SignalPhase};
    use crate::overlay::Shape;

    fn signal(id: &str, cycle_time: f64, phases: &[(f64, bool)]) -> IntersectionSignal {
        IntersectionSignal {
            intersection: id.into(),
            intersection_name: format!("Intersection {}", id),
            approaches: phases.len() as u32,
            cycle_time,
            signal_phases: phases
                .iter()
                .enumerate()
                .map(|(i, &(green_time, emergency_priority))| SignalPhase {
                    approach_name: format!("Approach {}", i),
                    green_time,
                    priority: 1.0,
                    emergency_priority,
                })
                .collect(),
        }
    }

    fn angles(drawing: &Drawing) -> Vec<(f64, f64, &'static str)> {
        drawing
            .overlays
            .iter()
            .filter_map(|o| match &o.shape {
                Shape::Sector {
                    start_angle,
                    end_angle,
                    style,
                    ..
                } => Some((*start_angle, *end_angle, style.color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sectors_are_contiguous_and_colored() {
        let snapshot = cairo_snapshot();
        let result = OptimizationResult::Signals(vec![signal(
            "3",
            120.0,
            &[(30.0, false), (45.0, true), (25.0, false)],
        )]);
        let drawing = SignalRenderer.draw(&snapshot, &result).unwrap();

        let sectors = angles(&drawing);
        assert_eq!(sectors.len(), 3);
        assert_eq!(sectors[0], (0.0, 90.0, "#28a745"));
        assert_eq!(sectors[1], (90.0, 225.0, "#dc3545"));
        assert!((sectors[2].1 - 300.0).abs() < 1e-9);
        assert_eq!(drawing.overlays.iter().filter(|o| o.is_marker()).count(), 1);
    }

    #[test]
    fn test_invalid_intersections_are_skipped() {
        let snapshot = cairo_snapshot();
        let result = OptimizationResult::Signals(vec![
            signal("X9", 60.0, &[(30.0, false)]),
            signal("5", 0.0, &[(30.0, false)]),
            signal("2", 60.0, &[(30.0, false), (30.0, false)]),
        ]);
        let drawing = SignalRenderer.draw(&snapshot, &result).unwrap();

        assert_eq!(drawing.skipped, 2);
        assert_eq!(angles(&drawing).len(), 2);
        match drawing.framing {
            Framing::Fit(coords) => assert_eq!(coords, vec![snapshot.resolve(&"2".into()).unwrap().coord]),
            Framing::Keep => panic!("signals should fit intersections"),
        }
    }

    #[test]
    fn test_empty_result_fits_nothing() {
        let snapshot = cairo_snapshot();
        let drawing = SignalRenderer
            .draw(&snapshot, &OptimizationResult::Signals(Vec::new()))
            .unwrap();
        assert!(drawing.overlays.is_empty());
        assert_eq!(drawing.framing, Framing::Fit(Vec::new()));
    }
}

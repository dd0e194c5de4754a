use crate::domain::Location;
use crate::dto::{OptimizationResult, RouteResult};
use crate::error::MismatchedResult;
use crate::overlay::Overlay;
use crate::snapshot::GraphSnapshot;
use crate::view::ViewKind;

use super::style;
use super::{muted_roads, Drawing, Framing, Resolver, ViewRenderer};

/// Route and emergency views.
///
/// Both draw the path as one line through the resolved entries in order,
/// marking the first and last entries when they resolve.
#[derive(Debug, Clone, Copy)]
pub struct RouteRenderer {
    emergency: bool,
}

impl RouteRenderer {
    pub const ROUTE: Self = Self { emergency: false };
    pub const EMERGENCY: Self = Self { emergency: true };

    fn route<'r>(&self, result: &'r OptimizationResult) -> Option<&'r RouteResult> {
        match (self.emergency, result) {
            (false, OptimizationResult::Route(route)) => Some(route),
            (true, OptimizationResult::Emergency(route)) => Some(route),
            _ => None,
        }
    }
}

impl ViewRenderer for RouteRenderer {
    fn kind(&self) -> ViewKind {
        if self.emergency {
            ViewKind::Emergency
        } else {
            ViewKind::Route
        }
    }

    /// Hospitals on the emergency view, the muted road layout otherwise.
    fn context(&self, snapshot: &GraphSnapshot) -> Vec<Overlay> {
        if !self.emergency {
            return muted_roads(snapshot);
        }
        snapshot
            .medical_facilities()
            .map(|loc| {
                Overlay::dot(loc.coord, style::HOSPITAL_RADIUS, style::FACILITY)
                    .with_popup(format!("{}\nMedical Facility", loc.name))
            })
            .collect()
    }

    fn draw(
        &self,
        snapshot: &GraphSnapshot,
        result: &OptimizationResult,
    ) -> Result<Drawing, MismatchedResult> {
        let route = self.route(result).ok_or_else(|| self.mismatch(result))?;

        let mut resolver = Resolver::new(snapshot);
        let resolved: Vec<(usize, &Location)> = route
            .path
            .iter()
            .enumerate()
            .filter_map(|(i, id)| resolver.location(id).map(|loc| (i, loc)))
            .collect();

        if resolved.len() < 2 {
            return Ok(Drawing {
                overlays: Vec::new(),
                framing: Framing::Fit(Vec::new()),
                skipped: resolver.skipped,
            });
        }

        let coords: Vec<_> = resolved.iter().map(|(_, loc)| loc.coord).collect();
        let line_style = if self.emergency {
            style::EMERGENCY_LINE
        } else {
            style::ROUTE_LINE
        };
        let mut overlays = vec![Overlay::line(coords.clone(), line_style)];

        if let Some(&(0, start)) = resolved.first() {
            let (glyph, class) = style::START_GLYPH;
            overlays.push(Overlay::glyph(start.coord, glyph, class).with_popup(format!("Start: {}", start.name)));
        }
        if let Some(&(i, end)) = resolved.last() {
            if i + 1 == route.path.len() {
                let ((glyph, class), label) = if self.emergency {
                    (style::HOSPITAL_GLYPH, "Hospital")
                } else {
                    (style::END_GLYPH, "Destination")
                };
                overlays.push(
                    Overlay::glyph(end.coord, glyph, class).with_popup(format!("{}: {}", label, end.name)),
                );
            }
        }

        Ok(Drawing {
            overlays,
            framing: Framing::Fit(coords),
            skipped: resolver.skipped,
        })
    }
}

//! Translation of optimization results into overlays.
//!
//! Each view kind has one [`ViewRenderer`]. Renderers are stateless: they
//! read the snapshot and a result and return a [`Drawing`]. [`redraw`]
//! applies a drawing to a view with clear-then-add semantics, so two
//! successive redraws leave exactly the second result plus the context.
//!
//! Identifiers that do not resolve against the snapshot skip only the
//! element that carries them; the count is reported in [`RedrawReport`].

mod network;
mod route;
mod signals;
pub mod style;
mod transport;

pub use network::NetworkRenderer;
pub use route::RouteRenderer;
pub use signals::SignalRenderer;
pub use transport::TransportRenderer;

use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Coord, Location, LocationId};
use crate::dto::OptimizationResult;
use crate::error::MismatchedResult;
use crate::overlay::{Overlay, OverlayTag};
use crate::snapshot::GraphSnapshot;
use crate::surface::DrawingSurface;
use crate::view::{View, ViewKind};

/// Draws one kind of view.
pub trait ViewRenderer {
    fn kind(&self) -> ViewKind;

    /// Static overlays drawn once at initialization.
    fn context(&self, snapshot: &GraphSnapshot) -> Vec<Overlay>;

    /// Result-tagged overlays shown before the first result arrives.
    fn initial_results(&self, _snapshot: &GraphSnapshot) -> Vec<Overlay> {
        Vec::new()
    }

    /// Overlays for one result. Fails when the result belongs to another view.
    fn draw(
        &self,
        snapshot: &GraphSnapshot,
        result: &OptimizationResult,
    ) -> Result<Drawing, MismatchedResult>;

    fn mismatch(&self, result: &OptimizationResult) -> MismatchedResult {
        MismatchedResult {
            view: self.kind(),
            result: result.view_kind(),
        }
    }
}

/// How the camera should follow a redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum Framing {
    Keep,
    /// Fit these coordinates, or return to the default camera when they
    /// cannot form a bounding box.
    Fit(Vec<Coord>),
}

/// Output of a renderer for one result.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub overlays: Vec<Overlay>,
    pub framing: Framing,
    /// Elements left out because an identifier did not resolve.
    pub skipped: usize,
}

/// What the camera did after a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CameraOutcome {
    Kept,
    Fitted,
    DefaultView,
}

/// Summary of one redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RedrawReport {
    pub view: ViewKind,
    pub removed: usize,
    pub drawn: usize,
    pub skipped: usize,
    pub camera: CameraOutcome,
}

/// Replaces the result overlays of `view` with those for `result`.
///
/// The drawing is computed before anything is removed, so a mismatched
/// result leaves the view untouched.
pub fn redraw<S: DrawingSurface>(
    view: &mut View<S>,
    snapshot: &GraphSnapshot,
    result: &OptimizationResult,
) -> Result<RedrawReport, MismatchedResult> {
    let drawing = view.kind().renderer().draw(snapshot, result)?;

    let removed = view.clear_results();
    let drawn = view.place(OverlayTag::Result, drawing.overlays);
    let camera = match drawing.framing {
        Framing::Keep => CameraOutcome::Kept,
        Framing::Fit(coords) => match view.frame(&coords) {
            Ok(_) => CameraOutcome::Fitted,
            Err(_) => CameraOutcome::DefaultView,
        },
    };

    let report = RedrawReport {
        view: view.kind(),
        removed,
        drawn,
        skipped: drawing.skipped,
        camera,
    };
    debug!(
        view = %report.view,
        removed = report.removed,
        drawn = report.drawn,
        skipped = report.skipped,
        "View redrawn"
    );
    Ok(report)
}

// ============================================================================
// Resolution helpers
// ============================================================================

/// Resolves ids against the snapshot, counting failures.
struct Resolver<'a> {
    snapshot: &'a GraphSnapshot,
    skipped: usize,
}

impl<'a> Resolver<'a> {
    fn new(snapshot: &'a GraphSnapshot) -> Self {
        Self {
            snapshot,
            skipped: 0,
        }
    }

    /// Resolves one id; a miss counts as one skipped element.
    fn location(&mut self, id: &LocationId) -> Option<&'a Location> {
        match self.snapshot.resolve(id) {
            Ok(loc) => Some(loc),
            Err(e) => {
                debug!(error = %e, "Skipping unresolvable element");
                self.skipped += 1;
                None
            }
        }
    }

    /// Resolves both ends of a segment; a miss on either counts once.
    fn segment(&mut self, from: &LocationId, to: &LocationId) -> Option<(&'a Location, &'a Location)> {
        match (self.snapshot.resolve(from), self.snapshot.resolve(to)) {
            (Ok(a), Ok(b)) => Some((a, b)),
            (Err(e), _) | (_, Err(e)) => {
                debug!(error = %e, "Skipping unresolvable segment");
                self.skipped += 1;
                None
            }
        }
    }

    /// Counts an element dropped for a reason other than resolution.
    fn skip(&mut self) {
        self.skipped += 1;
    }
}

/// Muted lines for every existing road, used as context.
fn muted_roads(snapshot: &GraphSnapshot) -> Vec<Overlay> {
    snapshot
        .existing_roads()
        .iter()
        .filter_map(|road| {
            let from = snapshot.resolve(&road.from).ok()?;
            let to = snapshot.resolve(&road.to).ok()?;
            Some(Overlay::line(vec![from.coord, to.coord], style::MUTED_ROAD))
        })
        .collect()
}

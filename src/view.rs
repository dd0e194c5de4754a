//! Map views and their lazy lifecycle.
//!
//! # Overview
//!
//! - [`ViewKind`]: the five independent map panels
//! - [`View`]: one surface plus the overlays currently on it, each tagged
//!   [`OverlayTag::Context`] or [`OverlayTag::Result`]
//! - [`ViewRegistry`]: creates a view on first use and keeps exactly one
//!   visible

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::Coord;
use crate::error::BoundsError;
use crate::geometry::Bounds;
use crate::overlay::{Overlay, OverlayTag};
use crate::render::{
    NetworkRenderer, RouteRenderer, SignalRenderer, TransportRenderer, ViewRenderer,
};
use crate::snapshot::GraphSnapshot;
use crate::surface::{DrawingSurface, OverlayHandle};

/// OpenStreetMap raster tiles.
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Network,
    Route,
    Emergency,
    Transport,
    Signals,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Network,
        ViewKind::Route,
        ViewKind::Emergency,
        ViewKind::Transport,
        ViewKind::Signals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Network => "network",
            ViewKind::Route => "route",
            ViewKind::Emergency => "emergency",
            ViewKind::Transport => "transport",
            ViewKind::Signals => "signals",
        }
    }

    /// Renderer that draws this kind of view.
    pub fn renderer(self) -> &'static dyn ViewRenderer {
        match self {
            ViewKind::Network => &NetworkRenderer,
            ViewKind::Route => &RouteRenderer::ROUTE,
            ViewKind::Emergency => &RouteRenderer::EMERGENCY,
            ViewKind::Transport => &TransportRenderer,
            ViewKind::Signals => &SignalRenderer,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial camera and base layer, copied into every view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapDefaults {
    pub center: Coord,
    pub zoom: u8,
    /// Pixels of padding when fitting bounds.
    pub fit_padding: f64,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            center: Coord::new(30.04, 31.24),
            zoom: 11,
            fit_padding: 50.0,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

// ============================================================================
// View
// ============================================================================

/// An initialized map view.
///
/// Overlays are only added through [`View::place`], which records the
/// handle together with its tag, so a redraw can remove exactly the result
/// overlays it owns.
#[derive(Debug)]
pub struct View<S> {
    kind: ViewKind,
    surface: S,
    layers: Vec<(OverlayHandle, OverlayTag)>,
    defaults: MapDefaults,
}

impl<S: DrawingSurface> View<S> {
    /// Opens the surface, draws the base layer at the default camera, then
    /// the static context.
    fn initialize(kind: ViewKind, defaults: MapDefaults, snapshot: &GraphSnapshot) -> Self {
        let mut surface = S::open(kind);
        surface.add_base_layer(&defaults.tile_url, &defaults.attribution);
        surface.set_view(defaults.center, defaults.zoom);

        let mut view = Self {
            kind,
            surface,
            layers: Vec::new(),
            defaults,
        };
        let renderer = kind.renderer();
        let context = view.place(OverlayTag::Context, renderer.context(snapshot));
        let initial = view.place(OverlayTag::Result, renderer.initial_results(snapshot));
        debug!(view = %kind, context, initial, "View initialized");
        view
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn defaults(&self) -> &MapDefaults {
        &self.defaults
    }

    /// Adds overlays under `tag`, overriding whatever tag they carry.
    /// Returns how many were added.
    pub fn place(&mut self, tag: OverlayTag, overlays: impl IntoIterator<Item = Overlay>) -> usize {
        let before = self.layers.len();
        for overlay in overlays {
            let handle = self.surface.add(&overlay.tagged(tag));
            self.layers.push((handle, tag));
        }
        self.layers.len() - before
    }

    /// Removes every result overlay; context overlays stay.
    pub fn clear_results(&mut self) -> usize {
        self.remove_tagged(OverlayTag::Result)
    }

    /// Replaces the context overlays with those drawn from `snapshot`.
    /// Result overlays are left for the next redraw.
    pub fn refresh_context(&mut self, snapshot: &GraphSnapshot) -> usize {
        let context = self.kind.renderer().context(snapshot);
        let removed = self.remove_tagged(OverlayTag::Context);
        let placed = self.place(OverlayTag::Context, context);
        debug!(view = %self.kind, removed, placed, "Context refreshed");
        placed
    }

    fn remove_tagged(&mut self, target: OverlayTag) -> usize {
        let surface = &mut self.surface;
        let mut removed = 0;
        self.layers.retain(|&(handle, tag)| {
            if tag == target {
                surface.remove(handle);
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Fits the camera to `coords`, or returns to the default camera when
    /// they cannot form a bounding box.
    pub fn frame(&mut self, coords: &[Coord]) -> Result<Bounds, BoundsError> {
        match Bounds::from_coords(coords) {
            Ok(bounds) => {
                self.surface.fit_bounds(bounds, self.defaults.fit_padding);
                Ok(bounds)
            }
            Err(e) => {
                debug!(view = %self.kind, error = %e, "Falling back to default camera");
                self.reset_camera();
                Err(e)
            }
        }
    }

    pub fn reset_camera(&mut self) {
        self.surface.set_view(self.defaults.center, self.defaults.zoom);
    }

    pub fn count(&self, tag: OverlayTag) -> usize {
        self.layers.iter().filter(|(_, t)| *t == tag).count()
    }

    fn set_visible(&mut self, visible: bool) {
        self.surface.set_visible(visible);
    }
}

// ============================================================================
// Registry
// ============================================================================

/// One lazily created view per kind, at most one visible.
#[derive(Debug)]
pub struct ViewRegistry<S> {
    defaults: MapDefaults,
    views: BTreeMap<ViewKind, View<S>>,
    visible: Option<ViewKind>,
}

impl<S: DrawingSurface> ViewRegistry<S> {
    pub fn new(defaults: MapDefaults) -> Self {
        Self {
            defaults,
            views: BTreeMap::new(),
            visible: None,
        }
    }

    /// Initializes `kind` on first call; later calls return the same view
    /// untouched. Visibility is not changed.
    pub fn ensure_initialized(&mut self, kind: ViewKind, snapshot: &GraphSnapshot) -> &mut View<S> {
        let defaults = &self.defaults;
        self.views
            .entry(kind)
            .or_insert_with(|| View::initialize(kind, defaults.clone(), snapshot))
    }

    /// Redraws the context of every initialized view from `snapshot`.
    pub fn refresh_context(&mut self, snapshot: &GraphSnapshot) {
        for view in self.views.values_mut() {
            view.refresh_context(snapshot);
        }
    }

    /// Brings `kind` to the foreground, initializing it if needed, and hides
    /// every other initialized view.
    pub fn activate(&mut self, kind: ViewKind, snapshot: &GraphSnapshot) -> &mut View<S> {
        for (k, view) in self.views.iter_mut() {
            if *k != kind {
                view.set_visible(false);
            }
        }
        self.visible = Some(kind);
        debug!(view = %kind, "View activated");

        let view = self.ensure_initialized(kind, snapshot);
        view.set_visible(true);
        view
    }

    pub fn get(&self, kind: ViewKind) -> Option<&View<S>> {
        self.views.get(&kind)
    }

    pub fn is_initialized(&self, kind: ViewKind) -> bool {
        self.views.contains_key(&kind)
    }

    pub fn visible(&self) -> Option<ViewKind> {
        self.visible
    }

    pub fn defaults(&self) -> &MapDefaults {
        &self.defaults
    }
}

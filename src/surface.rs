//! Boundary to the map drawing library.
//!
//! [`DrawingSurface`] is the narrow set of primitives a view needs. [`Scene`]
//! implements it in memory and exports a serializable [`SceneState`] that a
//! browser map can replay.

use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::domain::Coord;
use crate::geometry::{encode_polyline, Bounds};
use crate::overlay::{Overlay, Shape};
use crate::view::ViewKind;

/// Opaque id of an overlay on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
pub struct OverlayHandle(pub u64);

/// Drawing primitives of a map surface.
pub trait DrawingSurface {
    /// Creates an empty, hidden surface for a view.
    fn open(kind: ViewKind) -> Self
    where
        Self: Sized;

    fn add_base_layer(&mut self, tile_url: &str, attribution: &str);

    fn add(&mut self, overlay: &Overlay) -> OverlayHandle;

    /// Removes one overlay; returns false when the handle is unknown.
    fn remove(&mut self, handle: OverlayHandle) -> bool;

    fn fit_bounds(&mut self, bounds: Bounds, padding: f64);

    fn set_view(&mut self, center: Coord, zoom: u8);

    fn set_visible(&mut self, visible: bool);
}

/// Where the surface is looking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Camera {
    Unset,
    Centered { center: Coord, zoom: u8 },
    Fitted { bounds: Bounds, padding: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BaseLayer {
    pub tile_url: String,
    pub attribution: String,
}

/// In-memory surface.
#[derive(Debug, Clone)]
pub struct Scene {
    kind: ViewKind,
    base_layer: Option<BaseLayer>,
    camera: Camera,
    visible: bool,
    overlays: BTreeMap<OverlayHandle, Overlay>,
    next_handle: u64,
}

impl Scene {
    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn base_layer(&self) -> Option<&BaseLayer> {
        self.base_layer.as_ref()
    }

    /// Overlays in insertion order.
    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    pub fn state(&self) -> SceneState {
        SceneState {
            kind: self.kind,
            visible: self.visible,
            base_layer: self.base_layer.clone(),
            camera: self.camera,
            overlays: self
                .overlays
                .iter()
                .map(|(handle, overlay)| SceneOverlay {
                    handle: *handle,
                    polyline: match &overlay.shape {
                        Shape::Polyline { path, .. } => Some(encode_polyline(path)),
                        _ => None,
                    },
                    overlay: overlay.clone(),
                })
                .collect(),
        }
    }
}

impl DrawingSurface for Scene {
    fn open(kind: ViewKind) -> Self {
        Self {
            kind,
            base_layer: None,
            camera: Camera::Unset,
            visible: false,
            overlays: BTreeMap::new(),
            next_handle: 0,
        }
    }

    fn add_base_layer(&mut self, tile_url: &str, attribution: &str) {
        self.base_layer = Some(BaseLayer {
            tile_url: tile_url.to_string(),
            attribution: attribution.to_string(),
        });
    }

    fn add(&mut self, overlay: &Overlay) -> OverlayHandle {
        let handle = OverlayHandle(self.next_handle);
        self.next_handle += 1;
        self.overlays.insert(handle, overlay.clone());
        handle
    }

    fn remove(&mut self, handle: OverlayHandle) -> bool {
        self.overlays.remove(&handle).is_some()
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: f64) {
        self.camera = Camera::Fitted { bounds, padding };
    }

    fn set_view(&mut self, center: Coord, zoom: u8) {
        self.camera = Camera::Centered { center, zoom };
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Serializable snapshot of a [`Scene`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SceneState {
    pub kind: ViewKind,
    pub visible: bool,
    pub base_layer: Option<BaseLayer>,
    pub camera: Camera,
    pub overlays: Vec<SceneOverlay>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SceneOverlay {
    pub handle: OverlayHandle,
    pub overlay: Overlay,
    /// Encoded form of the path, for polylines only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}

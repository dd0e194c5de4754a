//! Drawable primitives placed on a view.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Coord;

/// Lifetime class of an overlay.
///
/// `Context` overlays are drawn at initialization and survive every redraw;
/// `Result` overlays are replaced by each redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverlayTag {
    Context,
    Result,
}

/// Stroke and fill settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Style {
    /// Stroke color.
    #[schema(value_type = String)]
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub dash: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub fill_color: Option<&'static str>,
    pub fill_opacity: f64,
}

impl Style {
    /// Solid stroke, fully opaque, no fill.
    pub const fn stroke(color: &'static str, weight: f64) -> Self {
        Self {
            color,
            weight,
            opacity: 1.0,
            dash: None,
            fill_color: None,
            fill_opacity: 0.0,
        }
    }

    /// Filled shape with a thin black outline.
    pub const fn filled(fill: &'static str, fill_opacity: f64) -> Self {
        Self {
            color: "#000",
            weight: 1.0,
            opacity: 1.0,
            dash: None,
            fill_color: Some(fill),
            fill_opacity,
        }
    }

    /// Filled shape without an outline.
    pub const fn solid(fill: &'static str, fill_opacity: f64) -> Self {
        Self {
            color: fill,
            weight: 0.0,
            opacity: 0.0,
            dash: None,
            fill_color: Some(fill),
            fill_opacity,
        }
    }

    pub const fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }

    pub const fn dashed(self, pattern: &'static str) -> Self {
        Self {
            dash: Some(pattern),
            ..self
        }
    }
}

/// Marker appearance.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    /// Filled circle with a pixel radius.
    Dot { radius: f64, style: Style },
    /// Text glyph with a CSS class.
    Glyph {
        #[schema(value_type = String)]
        glyph: &'static str,
        #[schema(value_type = String)]
        class: &'static str,
    },
}

/// Geometry of an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Marker { at: Coord, icon: Icon },
    Polyline { path: Vec<Coord>, style: Style },
    /// Circular sector; angles in degrees, radius in pixels.
    Sector {
        center: Coord,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        style: Style,
    },
}

/// One drawable primitive with its tag and optional popup text.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Overlay {
    pub tag: OverlayTag,
    pub shape: Shape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
}

impl Overlay {
    pub fn dot(at: Coord, radius: f64, style: Style) -> Self {
        Self::new(Shape::Marker {
            at,
            icon: Icon::Dot { radius, style },
        })
    }

    pub fn glyph(at: Coord, glyph: &'static str, class: &'static str) -> Self {
        Self::new(Shape::Marker {
            at,
            icon: Icon::Glyph { glyph, class },
        })
    }

    pub fn line(path: Vec<Coord>, style: Style) -> Self {
        Self::new(Shape::Polyline { path, style })
    }

    pub fn sector(center: Coord, radius: f64, start_angle: f64, end_angle: f64, style: Style) -> Self {
        Self::new(Shape::Sector {
            center,
            radius,
            start_angle,
            end_angle,
            style,
        })
    }

    /// Result-tagged by default; views retag when placing.
    fn new(shape: Shape) -> Self {
        Self {
            tag: OverlayTag::Result,
            shape,
            popup: None,
        }
    }

    pub fn with_popup(mut self, text: impl Into<String>) -> Self {
        self.popup = Some(text.into());
        self
    }

    pub fn tagged(mut self, tag: OverlayTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn is_line(&self) -> bool {
        matches!(self.shape, Shape::Polyline { .. })
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.shape, Shape::Marker { .. })
    }
}

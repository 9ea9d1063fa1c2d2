//! Canvas-space geometry: page formats, zoom, and coordinate conversion.
//!
//! Canvas-space is measured in unzoomed page pixels with the origin at the
//! top-left corner of the page. Screen-space is whatever the pointer reports.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete zoom levels, in percent.
pub const ZOOM_LEVELS: [u32; 5] = [50, 75, 100, 125, 150];

/// Named page formats a dashboard canvas can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanvasFormat {
    #[default]
    A4Portrait,
    A4Landscape,
    /// 16:9 widescreen.
    Widescreen,
    /// 4:3 presentation.
    Standard,
}

impl CanvasFormat {
    /// Parse a format name. Unknown names fall back to the default format.
    pub fn parse(name: &str) -> Self {
        match name {
            "a4-portrait" => CanvasFormat::A4Portrait,
            "a4-landscape" => CanvasFormat::A4Landscape,
            "16:9" => CanvasFormat::Widescreen,
            "4:3" => CanvasFormat::Standard,
            _ => CanvasFormat::default(),
        }
    }

    /// The wire name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanvasFormat::A4Portrait => "a4-portrait",
            CanvasFormat::A4Landscape => "a4-landscape",
            CanvasFormat::Widescreen => "16:9",
            CanvasFormat::Standard => "4:3",
        }
    }

    /// Page size in canvas pixels.
    pub fn dimensions(&self) -> Size {
        match self {
            CanvasFormat::A4Portrait => Size::new(794.0, 1123.0),
            CanvasFormat::A4Landscape => Size::new(1123.0, 794.0),
            CanvasFormat::Widescreen => Size::new(1920.0, 1080.0),
            CanvasFormat::Standard => Size::new(1024.0, 768.0),
        }
    }
}

impl From<String> for CanvasFormat {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<CanvasFormat> for String {
    fn from(format: CanvasFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for CanvasFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page size for a format name; unknown names use the default format.
pub fn canvas_dimensions(format: &str) -> Size {
    CanvasFormat::parse(format).dimensions()
}

/// Zoom level constrained to [`ZOOM_LEVELS`].
///
/// Stored as a bare percentage; stored values snap on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Zoom(u32);

impl From<u32> for Zoom {
    fn from(percent: u32) -> Self {
        Self::snap(percent)
    }
}

impl From<Zoom> for u32 {
    fn from(zoom: Zoom) -> Self {
        zoom.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(100)
    }
}

impl Zoom {
    /// Snap an arbitrary percentage to the nearest allowed level.
    pub fn snap(percent: u32) -> Self {
        let nearest = ZOOM_LEVELS
            .iter()
            .copied()
            .min_by_key(|level| level.abs_diff(percent))
            .unwrap_or(100);
        Self(nearest)
    }

    /// Current level in percent.
    pub fn percent(&self) -> u32 {
        self.0
    }

    /// Scale factor (1.0 = 100%).
    pub fn scale(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    fn index(&self) -> usize {
        ZOOM_LEVELS.iter().position(|&l| l == self.0).unwrap_or(2)
    }

    /// Next level up, or the same level at the top.
    pub fn zoomed_in(self) -> Self {
        let idx = (self.index() + 1).min(ZOOM_LEVELS.len() - 1);
        Self(ZOOM_LEVELS[idx])
    }

    /// Next level down, or the same level at the bottom.
    pub fn zoomed_out(self) -> Self {
        Self(ZOOM_LEVELS[self.index().saturating_sub(1)])
    }

    pub fn can_zoom_in(&self) -> bool {
        self.index() < ZOOM_LEVELS.len() - 1
    }

    pub fn can_zoom_out(&self) -> bool {
        self.index() > 0
    }

    /// Transform from canvas-space to screen-space for a canvas drawn at `origin`.
    pub fn transform(&self, origin: Point) -> Affine {
        Affine::translate(origin.to_vec2()) * Affine::scale(self.scale())
    }

    /// Scaled page size on screen.
    pub fn scaled_size(&self, canvas: Size) -> Size {
        Size::new(canvas.width * self.scale(), canvas.height * self.scale())
    }
}

/// Convert a screen-space pointer position into canvas-space.
///
/// `canvas_origin` is the on-screen bounding rect of the zoomed canvas. The
/// division happens last so whole-pixel inputs stay exact at every level in
/// [`ZOOM_LEVELS`].
pub fn pointer_to_canvas(pointer: Point, canvas_origin: Rect, zoom: Zoom) -> Point {
    let percent = f64::from(zoom.percent());
    Point::new(
        (pointer.x - canvas_origin.x0) * 100.0 / percent,
        (pointer.y - canvas_origin.y0) * 100.0 / percent,
    )
}

/// Convert a canvas-space point back to screen-space.
pub fn canvas_to_screen(point: Point, canvas_origin: Rect, zoom: Zoom) -> Point {
    zoom.transform(canvas_origin.origin()) * point
}

/// Clamp an element's top-left so its box does not start past the far edges.
///
/// The result is floored at zero, so an element larger than the canvas is
/// pinned to the origin.
pub fn clamp_placement(position: Point, size: Size, canvas: Size) -> Point {
    Point::new(
        position.x.min(canvas.width - size.width).max(0.0),
        position.y.min(canvas.height - size.height).max(0.0),
    )
}

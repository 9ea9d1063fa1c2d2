//! Drag and resize gestures.
//!
//! A gesture is three discrete events: start captures the original element,
//! moves produce live geometry, stop commits. Only start and stop are history
//! relevant; the editor drives that part.

use crate::elements::{Element, ElementId, GeometryPatch};
use crate::geometry::clamp_placement;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Resize handle on an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

impl HandleKind {
    /// Which sides of the box this handle moves: (left, top, right, bottom).
    fn moves(&self) -> (bool, bool, bool, bool) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (true, true, false, false),
            HandleKind::Corner(Corner::TopRight) => (false, true, true, false),
            HandleKind::Corner(Corner::BottomLeft) => (true, false, false, true),
            HandleKind::Corner(Corner::BottomRight) => (false, false, true, true),
            HandleKind::Edge(Edge::Top) => (false, true, false, false),
            HandleKind::Edge(Edge::Right) => (false, false, true, false),
            HandleKind::Edge(Edge::Bottom) => (false, false, false, true),
            HandleKind::Edge(Edge::Left) => (true, false, false, false),
        }
    }
}

/// State of an in-flight drag or resize.
#[derive(Debug, Clone)]
pub struct Gesture {
    /// The element being manipulated.
    pub element_id: ElementId,
    /// The handle being dragged (`None` = moving the whole element).
    pub handle: Option<HandleKind>,
    /// Starting point, canvas-space.
    pub start_point: Point,
    /// Latest point, canvas-space.
    pub current_point: Point,
    /// Element state at gesture start.
    pub original: Element,
}

impl Gesture {
    pub fn new(original: &Element, handle: Option<HandleKind>, start_point: Point) -> Self {
        Self {
            element_id: original.id.clone(),
            handle,
            start_point,
            current_point: start_point,
            original: original.clone(),
        }
    }

    pub fn is_resize(&self) -> bool {
        self.handle.is_some()
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Geometry for the current pointer position.
    ///
    /// Moves keep the box inside `canvas`. Resizes keep the opposite sides
    /// anchored, stay inside `canvas`, and never go below `min_size`.
    pub fn geometry(&self, canvas: Size, min_size: u32) -> GeometryPatch {
        match self.handle {
            None => {
                let position = clamp_placement(
                    self.original.position() + self.delta(),
                    self.original.size(),
                    canvas,
                );
                GeometryPatch::position(position)
            }
            Some(handle) => resize(
                self.original.bounds(),
                handle,
                self.delta(),
                canvas,
                f64::from(min_size),
            ),
        }
    }
}

fn resize(bounds: Rect, handle: HandleKind, delta: Vec2, canvas: Size, min: f64) -> GeometryPatch {
    let (left, top, right, bottom) = handle.moves();
    let mut r = bounds;

    if left {
        r.x0 = (r.x0 + delta.x).max(0.0).min(r.x1 - min);
    }
    if right {
        r.x1 = (r.x1 + delta.x).min(canvas.width).max(r.x0 + min);
    }
    if top {
        r.y0 = (r.y0 + delta.y).max(0.0).min(r.y1 - min);
    }
    if bottom {
        r.y1 = (r.y1 + delta.y).min(canvas.height).max(r.y0 + min);
    }

    GeometryPatch::rect(r.x0, r.y0, to_px(r.width()), to_px(r.height()))
}

fn to_px(value: f64) -> u32 {
    // Widths here are bounded below by the min size and above by the canvas.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let px = value.round().max(1.0) as u32;
    px
}

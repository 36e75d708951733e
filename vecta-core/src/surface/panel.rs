//! Panels: local coordinate scopes holding elements and buttons.

use serde::Serialize;

use super::transform::Transform;
use crate::display::Style;
use crate::graph::NodeId;
use crate::value::{Point, Rect};

/// Identifier of a panel within one [`super::Interactive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PanelId(pub(crate) usize);

/// Identifier of a button within one [`super::Interactive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ButtonId(pub(crate) usize);

/// A node rendered in a panel.
#[derive(Debug, Clone)]
pub struct PanelElement {
    pub node: NodeId,
    pub style: Style,
    /// Whether pointer drags may move this element.
    pub draggable: bool,
}

/// A clickable rectangle with a label.
#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub id: ButtonId,
    pub panel: PanelId,
    /// Bounds in the panel's local coordinates.
    pub bounds: Rect,
    pub label: String,
}

/// A rectangular region of its parent with its own coordinate frame.
///
/// Local coordinates are measured from `origin`, itself given in pixels from
/// the panel's top-left corner, and scaled by `scale`.
#[derive(Debug, Clone)]
pub struct Panel {
    pub(crate) id: PanelId,
    pub(crate) parent: Option<PanelId>,
    /// Top-left corner in the parent's local coordinates.
    pub(crate) position: Point,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) origin: Point,
    pub(crate) scale: f64,
    pub(crate) elements: Vec<PanelElement>,
    pub(crate) buttons: Vec<ButtonId>,
}

impl Panel {
    pub(crate) fn new(id: PanelId, parent: Option<PanelId>, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            parent,
            position,
            width,
            height,
            origin: Point::ORIGIN,
            scale: 1.0,
            elements: Vec::new(),
            buttons: Vec::new(),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn parent(&self) -> Option<PanelId> {
        self.parent
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn elements(&self) -> &[PanelElement] {
        &self.elements
    }

    /// Placement of the panel's box within its parent.
    pub(crate) fn box_transform(&self) -> Transform {
        Transform::translate(self.position.x, self.position.y)
    }

    /// Box pixels to local coordinates.
    pub(crate) fn frame_transform(&self) -> Transform {
        Transform::translate(self.origin.x, self.origin.y).then(Transform::scale(self.scale))
    }

    /// Whether a point in box pixels lies inside the panel.
    pub(crate) fn box_contains(&self, p: Point) -> bool {
        Rect::new(0.0, 0.0, self.width, self.height).contains(p)
    }
}

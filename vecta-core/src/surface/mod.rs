//! Interaction Surface
//!
//! An [`Interactive`] owns the scene graph and a tree of [`Panel`]s. Each
//! panel is a local coordinate scope: pointer positions arrive in screen
//! coordinates, are converted into the panel's frame, and are written into
//! draggable nodes through [`Graph::set_external`].
//!
//! # Gestures
//!
//! - `pointer_down` over a draggable element (within the hit radius) starts a
//!   drag; over a button it arms the button.
//! - `pointer_move` during a drag writes the pointer position, in the drag
//!   panel's frame, into the dragged node.
//! - `pointer_up` ends the gesture; releasing over the armed button is a
//!   click.

mod panel;
mod transform;

pub use panel::{Button, ButtonId, Panel, PanelElement, PanelId};
pub use transform::Transform;

use tracing::{debug, warn};

use crate::display::{DisplaySink, Element, PanelFrame, Style};
use crate::error::SurfaceError;
use crate::graph::{Graph, NodeId};
use crate::value::{Point, Rect};

/// Default pointer hit radius, in local units.
pub const DEFAULT_HIT_RADIUS: f64 = 10.0;

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// Nothing under the pointer, or no gesture in progress.
    Idle,
    DragStarted(NodeId),
    Dragged(NodeId),
    DragEnded(NodeId),
    /// A button was pressed; it clicks if released over it.
    Armed(ButtonId),
    Clicked(ButtonId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging { panel: PanelId, node: NodeId },
    Pressing { button: ButtonId },
}

/// A graph plus the panels that display and edit it.
#[derive(Debug)]
pub struct Interactive {
    graph: Graph,
    panels: Vec<Panel>,
    buttons: Vec<Button>,
    hit_radius: f64,
    gesture: Gesture,
}

impl Interactive {
    /// Create a surface whose root panel spans `width × height` screen pixels.
    pub fn new(width: f64, height: f64) -> Self {
        let root = Panel::new(PanelId(0), None, Point::ORIGIN, width, height);
        Self {
            graph: Graph::new(),
            panels: vec![root],
            buttons: Vec::new(),
            hit_radius: DEFAULT_HIT_RADIUS,
            gesture: Gesture::Idle,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn root(&self) -> PanelId {
        PanelId(0)
    }

    pub fn set_hit_radius(&mut self, radius: f64) {
        self.hit_radius = radius;
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id.0)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.get(id.0)
    }

    fn panel_mut(&mut self, id: PanelId) -> Result<&mut Panel, SurfaceError> {
        self.panels.get_mut(id.0).ok_or(SurfaceError::UnknownPanel(id))
    }

    /// Create a child panel of `parent`, with its top-left corner at `(x, y)`
    /// in the parent's local coordinates.
    pub fn add_panel(
        &mut self,
        parent: PanelId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<PanelId, SurfaceError> {
        if self.panel(parent).is_none() {
            return Err(SurfaceError::UnknownPanel(parent));
        }
        let id = PanelId(self.panels.len());
        self.panels
            .push(Panel::new(id, Some(parent), Point::new(x, y), width, height));
        Ok(id)
    }

    /// Move the local origin of a panel, in pixels from its top-left corner.
    pub fn set_origin(&mut self, panel: PanelId, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.panel_mut(panel)?.origin = Point::new(x, y);
        Ok(())
    }

    pub fn set_scale(&mut self, panel: PanelId, scale: f64) -> Result<(), SurfaceError> {
        self.panel_mut(panel)?.scale = scale;
        Ok(())
    }

    /// Full local-to-screen transform of a panel.
    pub fn transform(&self, panel: PanelId) -> Result<Transform, SurfaceError> {
        let mut current = self.panel(panel).ok_or(SurfaceError::UnknownPanel(panel))?;
        let mut transform = current.box_transform().then(current.frame_transform());
        while let Some(parent) = current.parent {
            current = self.panel(parent).ok_or(SurfaceError::UnknownPanel(parent))?;
            transform = current
                .box_transform()
                .then(current.frame_transform())
                .then(transform);
        }
        Ok(transform)
    }

    /// Screen-to-box transform (no origin or scale of the panel itself).
    fn box_screen_transform(&self, panel: &Panel) -> Result<Transform, SurfaceError> {
        let outer = match panel.parent {
            Some(parent) => self.transform(parent)?,
            None => Transform::IDENTITY,
        };
        Ok(outer.then(panel.box_transform()))
    }

    /// Convert a screen point into a panel's local coordinates.
    pub fn to_local(&self, panel: PanelId, screen: Point) -> Result<Point, SurfaceError> {
        Ok(self.transform(panel)?.invert(screen))
    }

    /// Render `node` in `panel`.
    pub fn add_element(
        &mut self,
        panel: PanelId,
        node: NodeId,
        style: Style,
    ) -> Result<(), SurfaceError> {
        self.attach(panel, node, style, false)
    }

    /// Render `node` in `panel` and let pointer drags move it.
    pub fn add_control(
        &mut self,
        panel: PanelId,
        node: NodeId,
        style: Style,
    ) -> Result<(), SurfaceError> {
        self.attach(panel, node, style, true)
    }

    fn attach(
        &mut self,
        panel: PanelId,
        node: NodeId,
        style: Style,
        draggable: bool,
    ) -> Result<(), SurfaceError> {
        if !self.graph.contains(node) {
            return Err(crate::error::GraphError::UnknownNode(node).into());
        }
        self.panel_mut(panel)?.elements.push(PanelElement {
            node,
            style,
            draggable,
        });
        Ok(())
    }

    /// Add a button with `bounds` in the panel's local coordinates.
    pub fn add_button(
        &mut self,
        panel: PanelId,
        bounds: Rect,
        label: impl Into<String>,
    ) -> Result<ButtonId, SurfaceError> {
        let id = ButtonId(self.buttons.len());
        self.panel_mut(panel)?.buttons.push(id);
        self.buttons.push(Button {
            id,
            panel,
            bounds,
            label: label.into(),
        });
        Ok(id)
    }

    /// Whether a gesture (drag or press) is in progress.
    pub fn is_busy(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn pointer_down(&mut self, screen: Point) -> Result<SurfaceEvent, SurfaceError> {
        // Later panels are drawn on top, so they get the first chance.
        for panel in self.panels.iter().rev() {
            let local_box = self.box_screen_transform(panel)?.invert(screen);
            if !panel.box_contains(local_box) {
                continue;
            }
            let local = self.transform(panel.id)?.invert(screen);

            let hit = panel.elements.iter().rev().find(|element| {
                element.draggable
                    && self
                        .graph
                        .point(element.node)
                        .is_some_and(|p| p.distance(local) <= self.hit_radius)
            });
            if let Some(element) = hit {
                let node = element.node;
                self.gesture = Gesture::Dragging {
                    panel: panel.id,
                    node,
                };
                debug!(node = ?node, "drag started");
                return Ok(SurfaceEvent::DragStarted(node));
            }

            let pressed = panel
                .buttons
                .iter()
                .rev()
                .copied()
                .find(|id| self.buttons[id.0].bounds.contains(local));
            if let Some(button) = pressed {
                self.gesture = Gesture::Pressing { button };
                return Ok(SurfaceEvent::Armed(button));
            }
        }
        Ok(SurfaceEvent::Idle)
    }

    pub fn pointer_move(&mut self, screen: Point) -> Result<SurfaceEvent, SurfaceError> {
        match self.gesture {
            Gesture::Dragging { panel, node } => {
                let local = self.to_local(panel, screen)?;
                self.graph.set_external(node, local)?;
                Ok(SurfaceEvent::Dragged(node))
            }
            _ => Ok(SurfaceEvent::Idle),
        }
    }

    pub fn pointer_up(&mut self, screen: Point) -> Result<SurfaceEvent, SurfaceError> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => Ok(SurfaceEvent::Idle),
            Gesture::Dragging { node, .. } => {
                debug!(node = ?node, "drag ended");
                Ok(SurfaceEvent::DragEnded(node))
            }
            Gesture::Pressing { button } => {
                let entry = self
                    .buttons
                    .get(button.0)
                    .ok_or(SurfaceError::UnknownButton(button))?;
                let local = self.to_local(entry.panel, screen)?;
                if entry.bounds.contains(local) {
                    debug!(button = ?button, label = %entry.label, "clicked");
                    Ok(SurfaceEvent::Clicked(button))
                } else {
                    Ok(SurfaceEvent::Idle)
                }
            }
        }
    }

    /// Hand every panel, element and button to `sink`, in creation order.
    ///
    /// A sink failure on one item is logged and the rest are still rendered.
    pub fn render(&self, sink: &mut dyn DisplaySink) -> Result<(), SurfaceError> {
        for panel in &self.panels {
            let frame = PanelFrame {
                id: panel.id,
                parent: panel.parent,
                transform: self.transform(panel.id)?,
                width: panel.width,
                height: panel.height,
            };
            if let Err(err) = sink.begin_panel(&frame) {
                warn!(panel = ?panel.id, error = %err, "panel not rendered");
                continue;
            }

            for element in &panel.elements {
                let Some(node) = self.graph.node(element.node) else {
                    continue;
                };
                let item = Element {
                    panel: panel.id,
                    node: element.node,
                    kind: node.kind(),
                    value: node.value(),
                    style: &element.style,
                    draggable: element.draggable,
                };
                if let Err(err) = sink.element(&item) {
                    warn!(node = ?element.node, error = %err, "element not rendered");
                }
            }

            for id in &panel.buttons {
                let button = &self.buttons[id.0];
                if let Err(err) = sink.button(button) {
                    warn!(button = ?id, error = %err, "button not rendered");
                }
            }
        }
        Ok(())
    }
}

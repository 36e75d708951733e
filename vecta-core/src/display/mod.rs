//! Display Adapters
//!
//! The boundary between the graph and whatever draws it. Nothing in here
//! writes back into the graph: a [`DisplaySink`] only receives the final
//! values after propagation has settled, and the label helpers in
//! [`format`] are what display nodes call from their update procedures.

pub mod format;
mod snapshot;

pub use snapshot::{ElementRecord, PanelRecord, Snapshot};

use serde::Serialize;

use crate::error::DisplayError;
use crate::graph::{NodeId, NodeKind};
use crate::surface::{Button, PanelId, Transform};
use crate::value::Value;

/// Presentation attributes of an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
}

impl Style {
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = Some(opacity);
        self
    }
}

/// A panel as seen by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelFrame {
    pub id: PanelId,
    pub parent: Option<PanelId>,
    /// Local-to-screen transform.
    pub transform: Transform,
    pub width: f64,
    pub height: f64,
}

/// One rendered node.
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    pub panel: PanelId,
    pub node: NodeId,
    pub kind: NodeKind,
    pub value: &'a Value,
    pub style: &'a Style,
    pub draggable: bool,
}

/// Receives a scene's final state, panel by panel.
///
/// `begin_panel` is called before the elements and buttons of that panel.
pub trait DisplaySink {
    fn begin_panel(&mut self, panel: &PanelFrame) -> Result<(), DisplayError>;

    fn element(&mut self, element: &Element<'_>) -> Result<(), DisplayError>;

    fn button(&mut self, _button: &Button) -> Result<(), DisplayError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Interactive;
    use crate::value::{Point, Rect};

    #[derive(Default)]
    struct Counter {
        panels: usize,
        elements: usize,
    }

    impl DisplaySink for Counter {
        fn begin_panel(&mut self, _panel: &PanelFrame) -> Result<(), DisplayError> {
            self.panels += 1;
            Ok(())
        }

        fn element(&mut self, _element: &Element<'_>) -> Result<(), DisplayError> {
            self.elements += 1;
            Ok(())
        }
    }

    #[test]
    fn sinks_may_ignore_buttons() {
        let mut surface = Interactive::new(50.0, 50.0);
        let root = surface.root();
        let dot = surface.graph_mut().add_node(NodeKind::Static, Point::ORIGIN);
        surface.add_element(root, dot, Style::default()).unwrap();
        surface
            .add_button(root, Rect::new(0.0, 0.0, 10.0, 10.0), "go")
            .unwrap();

        let mut counter = Counter::default();
        surface.render(&mut counter).unwrap();

        assert_eq!(counter.panels, 1);
        assert_eq!(counter.elements, 1);
    }
}

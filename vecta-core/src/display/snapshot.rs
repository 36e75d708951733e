//! A sink that records the rendered scene as plain data.

use serde::Serialize;

use super::{DisplaySink, Element, PanelFrame, Style};
use crate::error::DisplayError;
use crate::graph::{NodeId, NodeKind};
use crate::surface::Button;
use crate::value::Value;

#[derive(Debug, Clone, Serialize)]
pub struct ElementRecord {
    pub node: NodeId,
    pub kind: NodeKind,
    pub value: Value,
    pub style: Style,
    pub draggable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelRecord {
    pub frame: PanelFrame,
    pub elements: Vec<ElementRecord>,
    pub buttons: Vec<Button>,
}

/// Everything a render pass produced, in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub panels: Vec<PanelRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the record of a node, in whichever panel it was rendered.
    pub fn find(&self, node: NodeId) -> Option<&ElementRecord> {
        self.panels
            .iter()
            .flat_map(|panel| panel.elements.iter())
            .find(|element| element.node == node)
    }

    pub fn element_count(&self) -> usize {
        self.panels.iter().map(|panel| panel.elements.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl DisplaySink for Snapshot {
    fn begin_panel(&mut self, panel: &PanelFrame) -> Result<(), DisplayError> {
        self.panels.push(PanelRecord {
            frame: *panel,
            elements: Vec::new(),
            buttons: Vec::new(),
        });
        Ok(())
    }

    fn element(&mut self, element: &Element<'_>) -> Result<(), DisplayError> {
        let panel = self
            .panels
            .last_mut()
            .ok_or_else(|| DisplayError::Sink("element outside of a panel".into()))?;
        panel.elements.push(ElementRecord {
            node: element.node,
            kind: element.kind,
            value: element.value.clone(),
            style: element.style.clone(),
            draggable: element.draggable,
        });
        Ok(())
    }

    fn button(&mut self, button: &Button) -> Result<(), DisplayError> {
        let panel = self
            .panels
            .last_mut()
            .ok_or_else(|| DisplayError::Sink("button outside of a panel".into()))?;
        panel.buttons.push(button.clone());
        Ok(())
    }
}

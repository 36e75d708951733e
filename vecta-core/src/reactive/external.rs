//! External-Change Capability
//!
//! Fired only when a node's value is written by direct interaction
//! ([`Graph::set_external`]), never when the node is recomputed during
//! propagation. The handler may write other nodes with [`Graph::set_value`];
//! it is typically used to invert a geometric constraint back into the
//! semantic value that drives it (pointer position to angle).

use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

/// Reacts to an external write of a node.
pub trait ExternallyMutable: Send {
    fn on_external_change(&mut self, graph: &mut Graph, node: NodeId) -> Result<(), GraphError>;
}

impl<F> ExternallyMutable for F
where
    F: FnMut(&mut Graph, NodeId) -> Result<(), GraphError> + Send,
{
    fn on_external_change(&mut self, graph: &mut Graph, node: NodeId) -> Result<(), GraphError> {
        self(graph, node)
    }
}

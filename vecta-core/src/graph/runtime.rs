//! Graph Runtime
//!
//! The [`Graph`] owns every node of a scene and is the only way to change a
//! node's value. There are two write paths:
//!
//! - [`Graph::set_value`]: program-driven. Stores the value and propagates.
//! - [`Graph::set_external`]: user-driven (a drag). Stores the value, fires
//!   the node's external-change handler, then propagates if the handler did
//!   not already cause this node to be recomputed.
//!
//! Propagation itself is [`Graph::notify`]: every transitive dependent is
//! updated in depth-first pre-order (see [`super::order`]).

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::node::{Node, NodeId, NodeKind};
use super::order::{propagation_order, reaches};
use crate::constraint::Locus;
use crate::error::{GraphError, UpdateError};
use crate::reactive::{ExternallyMutable, Inputs, Updatable};
use crate::value::{Point, Value};

/// A dependency graph of reactive nodes.
#[derive(Debug, Default)]
pub struct Graph {
    /// All nodes, in creation order.
    nodes: IndexMap<NodeId, Node>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Create a node holding `value` and return its ID.
    pub fn add_node(&mut self, kind: NodeKind, value: impl Into<Value>) -> NodeId {
        let node = Node::new(kind, value.into());
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Get a reference to a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Iterate over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Current value of a node.
    pub fn value(&self, id: NodeId) -> Option<&Value> {
        self.nodes.get(&id).map(Node::value)
    }

    pub fn scalar(&self, id: NodeId) -> Option<f64> {
        self.value(id).and_then(Value::as_scalar)
    }

    pub fn point(&self, id: NodeId) -> Option<Point> {
        self.value(id).and_then(Value::as_point)
    }

    /// How many times the node's update has run.
    pub fn update_count(&self, id: NodeId) -> Option<u64> {
        self.nodes.get(&id).map(Node::update_count)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))
    }

    /// Declare that `node` depends on `on`.
    ///
    /// Changes to `on` will then update `node`. Declaring the same edge twice
    /// is a no-op. An edge that would close a cycle is rejected and the graph
    /// is left unchanged.
    pub fn add_dependency(&mut self, node: NodeId, on: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::UnknownNode(node));
        }
        if !self.nodes.contains_key(&on) {
            return Err(GraphError::UnknownNode(on));
        }
        if node == on {
            return Err(GraphError::SelfDependency(node));
        }
        if reaches(&self.nodes, node, on) {
            return Err(GraphError::Cycle { node, on });
        }

        if self.node_mut(node)?.add_dependency(on) {
            self.node_mut(on)?.add_dependent(node);
        }
        Ok(())
    }

    /// Install the update procedure of `node`.
    pub fn set_update<F>(&mut self, node: NodeId, update: F) -> Result<(), GraphError>
    where
        F: FnMut(&mut Value, &Inputs<'_>) -> Result<(), UpdateError> + Send + 'static,
    {
        self.set_updatable(node, Box::new(update))
    }

    /// Install a boxed update procedure.
    pub fn set_updatable(
        &mut self,
        node: NodeId,
        update: Box<dyn Updatable>,
    ) -> Result<(), GraphError> {
        self.node_mut(node)?.update = Some(update);
        Ok(())
    }

    /// Install the external-change handler of `node`.
    pub fn on_external_change<F>(&mut self, node: NodeId, handler: F) -> Result<(), GraphError>
    where
        F: FnMut(&mut Graph, NodeId) -> Result<(), GraphError> + Send + 'static,
    {
        self.set_externally_mutable(node, Box::new(handler))
    }

    /// Install a boxed external-change handler.
    pub fn set_externally_mutable(
        &mut self,
        node: NodeId,
        handler: Box<dyn ExternallyMutable>,
    ) -> Result<(), GraphError> {
        self.node_mut(node)?.external = Some(handler);
        Ok(())
    }

    /// Restrict the point value of `node` to `locus`.
    ///
    /// The current value is projected immediately, without propagating.
    pub fn constrain<L>(&mut self, node: NodeId, locus: L) -> Result<(), GraphError>
    where
        L: Locus + 'static,
    {
        let entry = self.node_mut(node)?;
        if let Some(p) = entry.value().as_point() {
            entry.store(Value::Point(locus.project(p)));
        }
        entry.locus = Some(Box::new(locus));
        entry.set_kind(NodeKind::Constrained);
        Ok(())
    }

    /// Store `value` in `node` and propagate to its dependents.
    ///
    /// Returns the number of update invocations.
    pub fn set_value(&mut self, node: NodeId, value: impl Into<Value>) -> Result<usize, GraphError> {
        let entry = self.nodes.get(&node).ok_or(GraphError::UnknownNode(node))?;
        let value = project(entry, value.into());
        self.node_mut(node)?.store(value);
        self.notify(node)
    }

    /// Write `value` into `node` as a direct user interaction.
    ///
    /// The value is projected onto the node's locus, then the external-change
    /// handler runs. If the handler's own writes already recomputed this node
    /// (the usual case for a constrained control), its dependents have been
    /// notified by that propagation and are not notified a second time.
    ///
    /// A failing handler does not skip propagation: the stored value still
    /// reaches the dependents before the handler's error is returned.
    pub fn set_external(&mut self, node: NodeId, value: impl Into<Value>) -> Result<(), GraphError> {
        let entry = self.nodes.get(&node).ok_or(GraphError::UnknownNode(node))?;
        let value = project(entry, value.into());

        let entry = self.node_mut(node)?;
        let before = entry.update_count();
        entry.store(value);
        let handler = entry.external.take();

        let mut result = Ok(());
        if let Some(mut handler) = handler {
            trace!(node = ?node, "external change");
            result = handler.on_external_change(self, node);
            if let Some(entry) = self.nodes.get_mut(&node) {
                if entry.external.is_none() {
                    entry.external = Some(handler);
                }
            }
            if let Err(err) = &result {
                warn!(node = ?node, error = %err, "external change handler failed");
            }
        }

        let after = self.node_mut(node)?.update_count();
        if after == before {
            self.notify(node)?;
        }
        result
    }

    /// Propagate the current value of `node` to all transitive dependents.
    ///
    /// Each planned dependent runs its update once; a failing update keeps
    /// its previous value and does not stop the others. Returns the number of
    /// update invocations.
    pub fn notify(&mut self, node: NodeId) -> Result<usize, GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::UnknownNode(node));
        }

        let order = propagation_order(&self.nodes, node);
        let mut updates = 0;

        for dependent in order {
            match self.run_update(dependent) {
                Ok(true) => updates += 1,
                Ok(false) => {}
                Err(err) => {
                    updates += 1;
                    warn!(error = %err, "update failed; keeping previous value");
                }
            }
        }

        debug!(root = ?node, updates, "propagated");
        Ok(updates)
    }

    /// Run the update procedure of a single node, without notifying its
    /// dependents.
    ///
    /// Returns `Ok(false)` if the node has no update procedure.
    pub fn refresh(&mut self, node: NodeId) -> Result<bool, GraphError> {
        self.run_update(node)
    }

    fn run_update(&mut self, id: NodeId) -> Result<bool, GraphError> {
        let entry = self.node_mut(id)?;
        let Some(mut update) = entry.update.take() else {
            return Ok(false);
        };
        let mut value = entry.value().clone();
        let declared: SmallVec<[NodeId; 4]> = SmallVec::from_slice(entry.dependencies());

        let result = {
            let inputs = Inputs::new(self, id, &declared);
            update.update(&mut value, &inputs)
        };

        let entry = self.node_mut(id)?;
        entry.update = Some(update);
        entry.record_update();

        match result {
            Ok(()) => {
                trace!(node = ?id, value = ?value, "updated");
                entry.store(value);
                Ok(true)
            }
            Err(source) => Err(GraphError::Update { node: id, source }),
        }
    }
}

fn project(node: &Node, value: Value) -> Value {
    match (&node.locus, value) {
        (Some(locus), Value::Point(p)) => Value::Point(locus.project(p)),
        (_, value) => value,
    }
}

//! Update Capability
//!
//! A node that derives its value from other nodes carries an [`Updatable`].
//! The graph calls it during propagation with the node's current value and a
//! read-only [`Inputs`] view of the node's declared dependencies.
//!
//! Updates cannot write into the graph. That is what keeps propagation free
//! of re-entrant writes: the only way back into the graph is the separate
//! external-change channel (see [`super::ExternallyMutable`]).

use crate::error::UpdateError;
use crate::graph::{Graph, NodeId};
use crate::value::{Point, Segment, Value};

/// Recomputes a node's value from its dependencies.
///
/// Implementations must always recompute from the current input values,
/// never from deltas: a node with several dependencies is updated once per
/// changed path.
pub trait Updatable: Send {
    fn update(&mut self, value: &mut Value, inputs: &Inputs<'_>) -> Result<(), UpdateError>;
}

impl<F> Updatable for F
where
    F: FnMut(&mut Value, &Inputs<'_>) -> Result<(), UpdateError> + Send,
{
    fn update(&mut self, value: &mut Value, inputs: &Inputs<'_>) -> Result<(), UpdateError> {
        self(value, inputs)
    }
}

/// Read access to the declared dependencies of the node being updated.
pub struct Inputs<'g> {
    graph: &'g Graph,
    node: NodeId,
    declared: &'g [NodeId],
}

impl<'g> Inputs<'g> {
    pub(crate) fn new(graph: &'g Graph, node: NodeId, declared: &'g [NodeId]) -> Self {
        Self {
            graph,
            node,
            declared,
        }
    }

    /// The node being updated.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Declared dependencies, in declaration order.
    pub fn dependencies(&self) -> &[NodeId] {
        self.declared
    }

    /// Current value of a declared dependency.
    pub fn value(&self, dependency: NodeId) -> Result<&'g Value, UpdateError> {
        if !self.declared.contains(&dependency) {
            return Err(UpdateError::UndeclaredDependency {
                node: self.node,
                dependency,
            });
        }
        self.graph
            .value(dependency)
            .ok_or(UpdateError::UndeclaredDependency {
                node: self.node,
                dependency,
            })
    }

    pub fn scalar(&self, dependency: NodeId) -> Result<f64, UpdateError> {
        let value = self.value(dependency)?;
        value
            .as_scalar()
            .ok_or_else(|| mismatch(dependency, "scalar", value))
    }

    pub fn point(&self, dependency: NodeId) -> Result<Point, UpdateError> {
        let value = self.value(dependency)?;
        value
            .as_point()
            .ok_or_else(|| mismatch(dependency, "point", value))
    }

    pub fn segment(&self, dependency: NodeId) -> Result<Segment, UpdateError> {
        let value = self.value(dependency)?;
        value
            .as_segment()
            .ok_or_else(|| mismatch(dependency, "segment", value))
    }
}

fn mismatch(node: NodeId, expected: &'static str, found: &Value) -> UpdateError {
    UpdateError::TypeMismatch {
        node,
        expected,
        found: found.kind_name(),
    }
}

/// Helpers for updates that rewrite part of their own value in place.
pub trait ValueMut {
    fn segment_mut(&mut self, node: NodeId) -> Result<&mut Segment, UpdateError>;
    fn text_mut(&mut self, node: NodeId) -> Result<&mut String, UpdateError>;
}

impl ValueMut for Value {
    fn segment_mut(&mut self, node: NodeId) -> Result<&mut Segment, UpdateError> {
        let found = self.kind_name();
        match self {
            Value::Segment(s) => Ok(s),
            _ => Err(UpdateError::TypeMismatch {
                node,
                expected: "segment",
                found,
            }),
        }
    }

    fn text_mut(&mut self, node: NodeId) -> Result<&mut String, UpdateError> {
        let found = self.kind_name();
        match self {
            Value::Text(label) => Ok(&mut label.contents),
            _ => Err(UpdateError::TypeMismatch {
                node,
                expected: "text",
                found,
            }),
        }
    }
}

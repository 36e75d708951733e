//! Graph Nodes
//!
//! This module defines the node type that lives in the dependency graph.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::constraint::Locus;
use crate::reactive::{ExternallyMutable, Updatable};
use crate::value::Value;

/// Unique identifier for a node in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What role a node plays in a scene.
///
/// The engine treats every kind the same way; the kind is carried for
/// display sinks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Written by program logic (an angle, a counter).
    Source,

    /// Recomputed from its dependencies (legs, hypotenuse).
    Derived,

    /// A draggable point restricted to a locus.
    Constrained,

    /// A text sink that formats upstream values.
    Display,

    /// Scenery that never changes after construction (grid, labels).
    Static,
}

/// A node in the dependency graph.
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// What kind of node this is.
    kind: NodeKind,

    /// Current value.
    value: Value,

    /// Nodes that this node reads from, in declaration order.
    dependencies: SmallVec<[NodeId; 4]>,

    /// Nodes to notify when this node changes, in registration order.
    dependents: IndexSet<NodeId>,

    /// Recomputes the value during propagation. Taken out of the slot while
    /// it runs.
    pub(crate) update: Option<Box<dyn Updatable>>,

    /// Fires on direct writes only. Taken out of the slot while it runs, so
    /// a nested external write to the same node does not re-enter it.
    pub(crate) external: Option<Box<dyn ExternallyMutable>>,

    /// Point writes are projected onto this locus before being stored.
    pub(crate) locus: Option<Box<dyn Locus>>,

    /// Number of times `update` has run.
    update_count: u64,
}

impl Node {
    /// Create a new node with the given kind and initial value.
    pub fn new(kind: NodeKind, value: Value) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            value,
            dependencies: SmallVec::new(),
            dependents: IndexSet::new(),
            update: None,
            external: None,
            locus: None,
            update_count: 0,
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
    }

    /// Get the current value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the value without notifying anyone.
    pub(crate) fn store(&mut self, value: Value) {
        self.value = value;
    }

    /// Whether the node has an update procedure.
    pub fn is_updatable(&self) -> bool {
        self.update.is_some()
    }

    /// Whether the node reacts to external writes.
    pub fn is_externally_mutable(&self) -> bool {
        self.external.is_some()
    }

    /// Whether point writes are constrained to a locus.
    pub fn is_constrained(&self) -> bool {
        self.locus.is_some()
    }

    /// Record a dependency. Returns false if it was already declared.
    pub(crate) fn add_dependency(&mut self, node_id: NodeId) -> bool {
        if self.dependencies.contains(&node_id) {
            return false;
        }
        self.dependencies.push(node_id);
        true
    }

    /// Get all dependencies, in declaration order.
    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    /// Record a dependent (a node that reads from this node).
    pub(crate) fn add_dependent(&mut self, node_id: NodeId) {
        self.dependents.insert(node_id);
    }

    /// Get all dependents, in registration order.
    pub fn dependents(&self) -> &IndexSet<NodeId> {
        &self.dependents
    }

    /// Number of times this node's update has run.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub(crate) fn record_update(&mut self) {
        self.update_count += 1;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("dependencies", &self.dependencies)
            .field("dependents", &self.dependents)
            .field("updatable", &self.is_updatable())
            .field("externally_mutable", &self.is_externally_mutable())
            .field("constrained", &self.is_constrained())
            .finish()
    }
}

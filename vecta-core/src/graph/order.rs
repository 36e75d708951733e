//! Propagation Order
//!
//! Decides which nodes are updated, and in what order, after a node changes.
//!
//! # Algorithm
//!
//! Depth-first, pre-order over the dependents edges, starting from the
//! changed node's direct dependents in registration order:
//!
//! 1. Update a dependent.
//! 2. Before moving on to its next sibling, visit that dependent's own
//!    dependents the same way.
//!
//! A node's update therefore always completes before any of its dependents
//! read it. There is no visited set: a node reachable through two paths is
//! updated once per path, which is why updates must recompute from current
//! inputs rather than apply deltas.
//!
//! The edge structure does not change while values propagate (updates only
//! see a read-only view), so the whole order can be planned up front.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::node::{Node, NodeId};

/// Plan the update sequence for a change of `root`.
///
/// `root` itself is not part of the result.
pub(crate) fn propagation_order(nodes: &IndexMap<NodeId, Node>, root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();

    if let Some(node) = nodes.get(&root) {
        stack.extend(node.dependents().iter().rev().copied());
    }

    while let Some(node_id) = stack.pop() {
        order.push(node_id);
        if let Some(node) = nodes.get(&node_id) {
            stack.extend(node.dependents().iter().rev().copied());
        }
    }

    order
}

/// Whether `to` can be reached from `from` by following dependents edges.
pub(crate) fn reaches(nodes: &IndexMap<NodeId, Node>, from: NodeId, to: NodeId) -> bool {
    if from == to {
        return true;
    }

    let mut visited = HashSet::new();
    let mut stack = vec![from];

    while let Some(node_id) = stack.pop() {
        if !visited.insert(node_id) {
            continue;
        }
        let Some(node) = nodes.get(&node_id) else {
            continue;
        };
        for &dependent in node.dependents() {
            if dependent == to {
                return true;
            }
            stack.push(dependent);
        }
    }

    false
}

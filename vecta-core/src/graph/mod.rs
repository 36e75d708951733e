//! Dependency Graph
//!
//! This module implements the dependency graph that keeps a scene's
//! interdependent elements consistent after a single mutation.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes hold a value and, optionally, an update procedure
//! - Edges represent dependencies: if A depends on B, there is an edge from B to A
//!
//! When a node is written, every node downstream of it is updated once per
//! path, in depth-first pre-order, before the write returns.
//!
//! # Design Decisions
//!
//! 1. Nodes live in a central arena indexed by ID rather than pointing at
//!    each other, so update procedures can be handed a read-only view of the
//!    whole graph while their own slot is borrowed out.
//!
//! 2. Edges that would close a cycle are rejected when declared. Apparent
//!    cycles (a control that both follows and edits an angle) are expressed
//!    with the external-change channel instead of an edge.
//!
//! 3. We maintain both forward (dependencies) and reverse (dependents) edges.
//!    Dependents drive traversal; dependencies bound what an update may read.

mod node;
mod order;
mod runtime;

pub use node::{Node, NodeId, NodeKind};
pub use runtime::Graph;

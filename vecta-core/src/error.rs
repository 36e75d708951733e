//! Error types.
//!
//! Graph configuration mistakes (cycles, unknown ids) surface as
//! [`GraphError`] at the call that made them. Failures inside a node's update
//! are [`UpdateError`]s; propagation logs them and carries on with the other
//! dependents.

use thiserror::Error;

use crate::graph::NodeId;
use crate::surface::{ButtonId, PanelId};

/// Errors returned by graph operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} cannot depend on itself")]
    SelfDependency(NodeId),

    #[error("{node:?} depending on {on:?} would create a cycle")]
    Cycle { node: NodeId, on: NodeId },

    #[error("update of {node:?} failed: {source}")]
    Update {
        node: NodeId,
        #[source]
        source: UpdateError,
    },
}

/// Errors raised by a node's update or external-change procedure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpdateError {
    #[error("{node:?} read {dependency:?} without declaring it")]
    UndeclaredDependency { node: NodeId, dependency: NodeId },

    #[error("{node:?} holds a {found} value, expected {expected}")]
    TypeMismatch {
        node: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("format error: {0}")]
    Format(String),
}

/// Errors raised by a display sink while rendering one element.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("sink error: {0}")]
    Sink(String),
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by the interaction surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("unknown panel {0:?}")]
    UnknownPanel(PanelId),

    #[error("unknown button {0:?}")]
    UnknownButton(ButtonId),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors raised while building or driving a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

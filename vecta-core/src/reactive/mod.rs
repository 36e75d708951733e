//! Reactive Capabilities
//!
//! A node in the graph can carry two independent behaviours:
//!
//! - [`Updatable`]: recompute the node from its dependencies. Runs during
//!   propagation, sees only a read-only view of the graph.
//! - [`ExternallyMutable`]: react to the node being written directly by the
//!   user. Runs outside propagation and may write other nodes.
//!
//! Keeping them in separate slots is what lets a control point be both
//! driven by an angle and a way to edit that angle: the forward path and the
//! inverse path never fire for the same write.

mod update;
mod external;

pub use update::{Inputs, Updatable, ValueMut};
pub use external::ExternallyMutable;

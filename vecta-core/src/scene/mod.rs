//! Ready-made scenes built on the engine.

pub mod unit_circle;

pub use unit_circle::{animate, Layout, UnitCircle, UnitCircleNodes};

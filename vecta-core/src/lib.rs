//! Vecta Core
//!
//! This crate provides the core runtime for the Vecta reactive
//! vector-graphics library. It implements:
//!
//! - A dependency graph of geometric values with depth-first propagation
//! - Separate update and external-change channels, so a draggable point and
//!   the number it is bound to can drive each other without looping
//! - Loci that constrain draggable points (circles, segments)
//! - Nested panels with pointer handling and a display-sink boundary
//! - A frame-driven animation driver
//!
//! # Architecture
//!
//! - `graph`: node storage, registration and propagation
//! - `reactive`: the update and external-change capabilities
//! - `constraint`: loci and the point/parameter binding
//! - `surface`: panels, coordinate transforms and pointer gestures
//! - `display`: rendering boundary and label formatting
//! - `animation`: frame scheduling and the animation driver
//! - `scene`: the unit circle interactive
//!
//! # Example
//!
//! ```rust
//! use vecta_core::constraint::constrain_to_circle;
//! use vecta_core::graph::{Graph, NodeKind};
//! use vecta_core::value::{Circle, Point};
//!
//! let mut graph = Graph::new();
//! let angle = graph.add_node(NodeKind::Source, 0.0);
//! let control = graph.add_node(NodeKind::Derived, Point::ORIGIN);
//! constrain_to_circle(&mut graph, control, Circle::new(0.0, 0.0, 100.0), angle).unwrap();
//!
//! // Dragging the control straight up sets the angle to π/2.
//! graph.set_external(control, Point::new(0.0, -250.0)).unwrap();
//! let theta = graph.scalar(angle).unwrap();
//! assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
//! ```

pub mod animation;
pub mod config;
pub mod constraint;
pub mod display;
pub mod error;
pub mod graph;
pub mod reactive;
pub mod scene;
pub mod surface;
pub mod value;

pub use config::SceneConfig;
pub use error::{GraphError, SceneError, SurfaceError, UpdateError};
pub use graph::{Graph, NodeId, NodeKind};
pub use scene::UnitCircle;
pub use value::{Circle, Label, Point, Rect, Segment, Value};

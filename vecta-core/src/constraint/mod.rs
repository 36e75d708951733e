//! Constraint Adapter
//!
//! A constrained node is a point restricted to a parametric [`Locus`]. Any
//! point written into it (typically a pointer position) is snapped to the
//! nearest point of the locus before being stored.
//!
//! [`constrain_to`] wires the two channels that tie such a node to the scalar
//! parameter driving it:
//!
//! - forward: the node's update evaluates the locus at the parameter;
//! - inverse: the node's external-change handler recovers the parameter from
//!   the dragged position and writes it back with [`Graph::set_value`], which
//!   re-propagates forward to the node and everything downstream.

mod circle;
mod line;

use std::fmt::Debug;

use crate::error::{GraphError, UpdateError};
use crate::graph::{Graph, NodeId};
use crate::value::{Circle, Point, Value};

/// A parametric curve.
pub trait Locus: Send + Sync + Debug {
    /// Nearest point of the locus to `p`.
    fn project(&self, p: Point) -> Point;

    /// Point of the locus at parameter `t`.
    fn point_at(&self, t: f64) -> Point;

    /// Parameter of the locus point closest to `p`. Must return a finite
    /// value for every input.
    fn parameter_of(&self, p: Point) -> f64;
}

/// Constrain `node` to `locus` and bind its position to the scalar node
/// `parameter`.
///
/// After this call `node` depends on `parameter`, follows it on every
/// propagation, and writes it back when dragged.
pub fn constrain_to<L>(
    graph: &mut Graph,
    node: NodeId,
    locus: L,
    parameter: NodeId,
) -> Result<(), GraphError>
where
    L: Locus + Clone + 'static,
{
    graph.constrain(node, locus.clone())?;
    graph.add_dependency(node, parameter)?;

    let forward = locus.clone();
    graph.set_update(node, move |value, inputs| {
        let t = inputs.scalar(parameter)?;
        *value = Value::Point(forward.point_at(t));
        Ok(())
    })?;

    graph.on_external_change(node, move |graph, id| {
        let value = graph.value(id).ok_or(GraphError::UnknownNode(id))?;
        let p = value.as_point().ok_or_else(|| GraphError::Update {
            node: id,
            source: UpdateError::TypeMismatch {
                node: id,
                expected: "point",
                found: value.kind_name(),
            },
        })?;
        graph.set_value(parameter, locus.parameter_of(p))?;
        Ok(())
    })?;

    graph.refresh(node)?;
    Ok(())
}

/// [`constrain_to`] for the common case of an angle on a circle.
pub fn constrain_to_circle(
    graph: &mut Graph,
    node: NodeId,
    circle: Circle,
    angle: NodeId,
) -> Result<(), GraphError> {
    constrain_to(graph, node, circle, angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use crate::value::Segment;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    #[test]
    fn drag_on_circle_updates_angle() {
        let mut graph = Graph::new();
        let angle = graph.add_node(NodeKind::Source, 0.0);
        let control = graph.add_node(NodeKind::Derived, Point::new(0.0, 0.0));
        constrain_to_circle(&mut graph, control, Circle::new(0.0, 0.0, 50.0), angle).unwrap();

        // Far outside the circle, straight up.
        graph.set_external(control, Point::new(0.0, -500.0)).unwrap();

        assert!((graph.scalar(angle).unwrap() - PI / 2.0).abs() < EPS);
        let p = graph.point(control).unwrap();
        assert!(p.x.abs() < EPS);
        assert!((p.y + 50.0).abs() < EPS);
    }

    #[test]
    fn binding_starts_consistent() {
        let mut graph = Graph::new();
        let angle = graph.add_node(NodeKind::Source, PI);
        let control = graph.add_node(NodeKind::Derived, Point::new(0.0, 0.0));
        constrain_to_circle(&mut graph, control, Circle::new(0.0, 0.0, 10.0), angle).unwrap();

        let p = graph.point(control).unwrap();
        assert!((p.x + 10.0).abs() < EPS);
        assert!(graph.node(control).unwrap().is_constrained());
    }

    #[test]
    fn slider_on_segment() {
        let mut graph = Graph::new();
        let t = graph.add_node(NodeKind::Source, 0.0);
        let handle = graph.add_node(NodeKind::Derived, Point::new(0.0, 0.0));
        let track = Segment::new(0.0, 0.0, 100.0, 0.0);
        constrain_to(&mut graph, handle, track, t).unwrap();

        graph.set_external(handle, Point::new(25.0, 40.0)).unwrap();
        assert!((graph.scalar(t).unwrap() - 0.25).abs() < EPS);
        assert_eq!(graph.point(handle), Some(Point::new(25.0, 0.0)));

        graph.set_value(t, 1.0).unwrap();
        assert_eq!(graph.point(handle), Some(Point::new(100.0, 0.0)));
    }
}

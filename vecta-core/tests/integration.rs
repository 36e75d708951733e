//! Integration Tests for the Propagation Engine
//!
//! These tests drive the public API the way a host would: build a graph or a
//! scene, write into it, and check what every node ends up holding.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};
use std::sync::Arc;

use parking_lot::Mutex;

use vecta_core::constraint::constrain_to_circle;
use vecta_core::graph::{Graph, NodeId, NodeKind};
use vecta_core::value::{Circle, Point, Segment};
use vecta_core::{GraphError, SceneConfig, UnitCircle};

const EPS: f64 = 1e-9;

/// Angle, control on a circle of radius 100, and a hypotenuse following it.
fn bound_circle() -> (Graph, NodeId, NodeId, NodeId) {
    let mut graph = Graph::new();
    let angle = graph.add_node(NodeKind::Source, 0.0);
    let control = graph.add_node(NodeKind::Derived, Point::ORIGIN);
    constrain_to_circle(&mut graph, control, Circle::new(0.0, 0.0, 100.0), angle).unwrap();

    let hypotenuse = graph.add_node(NodeKind::Derived, Segment::default());
    graph.add_dependency(hypotenuse, control).unwrap();
    graph
        .set_update(hypotenuse, move |value, inputs| {
            let p = inputs.point(control)?;
            *value = Segment::new(0.0, 0.0, p.x, p.y).into();
            Ok(())
        })
        .unwrap();
    graph.refresh(hypotenuse).unwrap();

    (graph, angle, control, hypotenuse)
}

fn assert_close(a: Point, b: Point) {
    assert!(a.distance(b) < 1e-6, "{a:?} != {b:?}");
}

/// Test that the control follows the latest angle after any write sequence.
#[test]
fn control_follows_every_angle_write() {
    let (mut graph, angle, control, _) = bound_circle();

    for theta in [0.3, 5.9, 1.0, 0.0, 3.0, 6.2, 2.5] {
        graph.set_value(angle, theta).unwrap();
        let p = graph.point(control).unwrap();
        assert_close(p, Point::new(100.0 * theta.cos(), -100.0 * theta.sin()));
    }
}

/// Test that writing a point on the circle reproduces the angle it came from.
#[test]
fn control_round_trips_through_angle() {
    let (mut graph, angle, control, _) = bound_circle();

    for theta in [0.0, FRAC_PI_4, FRAC_PI_2, PI, 3.0 * FRAC_PI_2, 7.0 * FRAC_PI_4] {
        let p = Point::new(100.0 * theta.cos(), -100.0 * theta.sin());
        graph.set_external(control, p).unwrap();
        let got = graph.scalar(angle).unwrap();
        // 0 and 2π name the same point
        let diff = (got - theta).rem_euclid(TAU);
        assert!(diff < 1e-6 || TAU - diff < 1e-6, "θ₀ = {theta}, got {got}");
    }
}

/// Test that notifying twice in a row changes nothing.
#[test]
fn repeated_notify_is_idempotent() {
    let (mut graph, angle, control, hypotenuse) = bound_circle();
    graph.set_value(angle, 2.0).unwrap();

    let before = (
        graph.value(control).cloned(),
        graph.value(hypotenuse).cloned(),
    );
    graph.notify(angle).unwrap();
    graph.notify(angle).unwrap();
    let after = (
        graph.value(control).cloned(),
        graph.value(hypotenuse).cloned(),
    );

    assert_eq!(before, after);
}

/// Test that one angle write runs each dependent's update exactly once.
#[test]
fn each_dependent_updates_once_per_write() {
    let (mut graph, angle, control, hypotenuse) = bound_circle();
    let control_before = graph.update_count(control).unwrap();
    let hyp_before = graph.update_count(hypotenuse).unwrap();

    assert_eq!(graph.set_value(angle, 1.0).unwrap(), 2);

    assert_eq!(graph.update_count(control).unwrap(), control_before + 1);
    assert_eq!(graph.update_count(hypotenuse).unwrap(), hyp_before + 1);
}

/// Test that a drag runs each downstream update exactly once.
#[test]
fn drag_updates_downstream_once() {
    let (mut graph, _, control, hypotenuse) = bound_circle();
    let before = graph.update_count(hypotenuse).unwrap();

    graph.set_external(control, Point::new(0.0, -300.0)).unwrap();

    assert_eq!(graph.update_count(hypotenuse).unwrap(), before + 1);
    let hyp = graph.value(hypotenuse).unwrap().as_segment().unwrap();
    assert_close(hyp.end(), Point::new(0.0, -100.0));
}

/// Test that the angle wraps without a jump in the control.
#[test]
fn wrap_is_continuous() {
    let (mut graph, angle, control, _) = bound_circle();

    graph.set_value(angle, 0.0).unwrap();
    let at_zero = graph.point(control).unwrap();
    graph.set_value(angle, TAU - 1e-12).unwrap();
    let before_wrap = graph.point(control).unwrap();

    assert_close(at_zero, before_wrap);
}

/// Test the quarter-turn scenario on a radius-100 circle.
#[test]
fn quarter_turn_points_straight_up() {
    let (mut graph, angle, control, _) = bound_circle();
    graph.set_value(angle, FRAC_PI_2).unwrap();
    assert_close(graph.point(control).unwrap(), Point::new(0.0, -100.0));
}

/// Test that a point below the centre maps to three quarters of a turn.
#[test]
fn point_below_centre_is_three_quarter_turn() {
    let (mut graph, angle, control, _) = bound_circle();
    graph.set_external(control, Point::new(0.0, 100.0)).unwrap();
    assert!((graph.scalar(angle).unwrap() - 3.0 * FRAC_PI_2).abs() < EPS);
}

/// Test that dragging onto the centre resolves to angle zero.
#[test]
fn centre_maps_to_angle_zero() {
    let (mut graph, angle, control, _) = bound_circle();
    graph.set_value(angle, 2.0).unwrap();

    graph.set_external(control, Point::ORIGIN).unwrap();

    assert_eq!(graph.scalar(angle), Some(0.0));
    assert_close(graph.point(control).unwrap(), Point::new(100.0, 0.0));
}

/// Test that a dependency closing a loop is rejected and leaves the graph
/// usable.
#[test]
fn cycles_are_rejected_at_registration() {
    let (mut graph, angle, control, hypotenuse) = bound_circle();

    assert_eq!(
        graph.add_dependency(angle, hypotenuse),
        Err(GraphError::Cycle {
            node: angle,
            on: hypotenuse
        })
    );
    assert_eq!(
        graph.add_dependency(control, control),
        Err(GraphError::SelfDependency(control))
    );

    assert_eq!(graph.set_value(angle, 1.0).unwrap(), 2);
}

/// Test that the scene stops moving once the animation is stopped.
#[test]
fn stopped_scene_does_not_move() {
    use vecta_core::animation::FrameTarget;

    let mut scene = UnitCircle::new(SceneConfig::default()).unwrap();
    scene.start_animation();
    for _ in 0..5 {
        scene.frame();
    }
    scene.stop_animation();
    let angle = scene.angle().unwrap();

    for _ in 0..5 {
        scene.frame();
    }

    assert_eq!(scene.angle().unwrap(), angle);
    assert_eq!(scene.ticks(), 5);
}

/// Test that dragging through the pointer API moves the scene.
#[test]
fn pointer_drag_moves_scene() {
    let mut scene = UnitCircle::new(SceneConfig::default()).unwrap();
    let panel = scene.circle_panel();
    let transform = scene.surface().transform(panel).unwrap();

    let grab = transform.apply(scene.control().unwrap());
    scene.pointer_down(grab).unwrap();
    let r = scene.radius();
    scene
        .pointer_move(transform.apply(Point::new(-r, 0.0)))
        .unwrap();
    scene.pointer_up(transform.apply(Point::new(-r, 0.0))).unwrap();

    assert!((scene.angle().unwrap() - PI).abs() < 1e-6);
    let nodes = scene.nodes();
    assert_eq!(scene.text(nodes.theta_display), Some("θ = 1.000π = 180.000°"));
}

/// Test that the scene snapshot serializes to JSON.
#[test]
fn scene_snapshot_serializes() {
    let scene = UnitCircle::new(SceneConfig::default()).unwrap();
    let json = scene.snapshot().unwrap().to_json().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let panels = parsed["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 3);
    assert!(json.contains("cosθ = 0.540"));
    assert!(json.contains("(√2/2 , √2/2)"));
}

/// Test that a scene can be shared with a tokio task and driven from it.
#[tokio::test]
async fn shared_scene_runs_on_tokio() {
    let scene = Arc::new(Mutex::new(
        UnitCircle::new(SceneConfig {
            frame_period_ms: 1,
            ..SceneConfig::default()
        })
        .unwrap(),
    ));
    scene.lock().start_animation();

    let (tx, rx) = tokio::sync::watch::channel(false);
    let task = tokio::spawn(vecta_core::scene::animate(scene.clone(), rx));
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    scene.lock().stop_animation();
    let _ = tx.send(true);
    task.await.unwrap();

    let angle = scene.lock().angle().unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(scene.lock().angle().unwrap(), angle);
}

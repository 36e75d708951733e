//! The unit circle interactive.
//!
//! A draggable point on a circle, bound to an angle. Moving either one moves
//! the other, and the hypotenuse, both legs and the three readouts follow.
//!
//! ```text
//! angle ──► control ──► hypotenuse ──► cosine leg
//!   ▲          │                   └──► sine leg
//!   └─ drag ───┤
//!              ├──► θ display
//!              ├──► cos display
//!              └──► sin display
//! ```

use std::f64::consts::PI;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::animation::{run_frames, AnimationDriver, FrameQueue, FrameTarget};
use crate::config::SceneConfig;
use crate::constraint::{constrain_to_circle, Locus};
use crate::display::format::{cos_label, sin_label, theta_label};
use crate::display::{DisplaySink, Snapshot, Style};
use crate::error::{GraphError, SceneError, SurfaceError};
use crate::graph::{Graph, NodeId, NodeKind};
use crate::reactive::ValueMut;
use crate::surface::{ButtonId, Interactive, PanelId, SurfaceEvent};
use crate::value::{Circle, Label, Point, Rect, Segment};

const BUTTON_WIDTH: f64 = 80.0;
const BUTTON_HEIGHT: f64 = 24.0;
const CENTER_DOT_RADIUS: f64 = 3.0;

/// Node ids of the scene's moving parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCircleNodes {
    pub angle: NodeId,
    pub circle: NodeId,
    pub control: NodeId,
    pub hypotenuse: NodeId,
    pub cosine_leg: NodeId,
    pub sine_leg: NodeId,
    pub theta_display: NodeId,
    pub cos_display: NodeId,
    pub sin_display: NodeId,
}

/// Panel layout derived from the configured width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub radius: f64,
    pub margin: f64,
}

impl Layout {
    pub fn new(width: f64) -> Self {
        let radius = (8.0 / 9.0) * width / PI;
        Self {
            width,
            radius,
            margin: 2.0 * radius - width / 2.0,
        }
    }

    /// Size of the whole interactive.
    pub fn size(&self) -> (f64, f64) {
        (
            self.margin + 2.0 * self.width + 2.0,
            2.0 * self.width + self.margin,
        )
    }

    /// Left edge of the readouts and the button in the info panel.
    pub fn info_x(&self) -> f64 {
        self.width / 2.0 - 2.0 * self.margin
    }

    /// Special points of the circle and where their labels sit on the root
    /// panel.
    fn special_point_labels(&self) -> [Label; 8] {
        let r = self.radius;
        let h = self.width;
        let k = 11.0 / 15.0;
        let right = r * (2.0 + k);
        let left = r / (2.0 + k);
        [
            Label::new(right + r / 7.0, h - r * (1.0 + k), "(1 , 0)"),
            Label::new(left - r / 14.0, h - r * (1.0 + k), "(-1 , 0)"),
            Label::new(r * 2.0 * k + r / 7.0, h - right - r / 7.0, "(0 , 1)"),
            Label::new(r * 2.0 * k + r / 7.0, h - 4.0 * r / 7.0, "(0 , -1)"),
            Label::new(right - 2.0 * r / 7.0, h - right, "(√2/2 , √2/2)"),
            Label::new(left - r / 28.0, h - right, "(-√2/2 , √2/2)"),
            Label::new(left - r / 28.0, h - 5.0 * r / 7.0, "(-√2/2 , -√2/2)"),
            Label::new(right - 2.0 * r / 7.0, h - 5.0 * r / 7.0, "(√2/2 , -√2/2)"),
        ]
    }
}

/// The unit circle scene: surface, graph, and animation state.
#[derive(Debug)]
pub struct UnitCircle {
    surface: Interactive,
    config: SceneConfig,
    layout: Layout,
    circle: Circle,
    nodes: UnitCircleNodes,
    circle_panel: PanelId,
    info_panel: PanelId,
    animate: ButtonId,
    driver: AnimationDriver,
    frames: FrameQueue,
}

impl UnitCircle {
    /// Build the scene and settle it at `config.angle`.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let layout = Layout::new(config.width);
        let (width, height) = layout.size();
        let r = layout.radius;
        let w = layout.width;

        let mut surface = Interactive::new(width, height);
        surface.set_hit_radius(config.hit_radius);
        let root = surface.root();

        let circle_panel = surface.add_panel(root, 0.0, 0.0, w, w)?;
        surface.set_origin(circle_panel, w / 2.0, w / 2.0)?;
        let info_panel = surface.add_panel(root, w + layout.margin, 0.0, w, w)?;

        let default = Style::default().class("default");

        // Scenery.
        let background = surface
            .graph_mut()
            .add_node(NodeKind::Static, Rect::new(-w / 2.0, -w / 2.0, w, w));
        surface.add_element(circle_panel, background, default.clone())?;

        let extent = config.grid_extent;
        for i in -extent..=extent {
            for j in -extent..=extent {
                let cell = Rect::new(f64::from(i) * r, f64::from(j) * r, r, r);
                let node = surface.graph_mut().add_node(NodeKind::Static, cell);
                surface.add_element(circle_panel, node, Style::default().stroke_opacity(0.25))?;
            }
        }

        let border = surface
            .graph_mut()
            .add_node(NodeKind::Static, Rect::new(0.0, 0.0, w, w));
        surface.add_element(info_panel, border, default)?;

        // The circle and everything bound to it.
        let circle = Circle::new(0.0, 0.0, r);
        let x = layout.info_x();
        let readouts = [
            Point::new(x, w / 5.0),
            Point::new(x, w * 2.0 / 5.0),
            Point::new(x, w * 3.0 / 5.0),
        ];
        let nodes = wire(surface.graph_mut(), circle, readouts)?;

        surface.add_element(
            circle_panel,
            nodes.circle,
            Style::default().fill("none").stroke("#333333"),
        )?;
        surface.add_control(circle_panel, nodes.control, Style::default().class("control"))?;
        surface.add_element(circle_panel, nodes.hypotenuse, Style::default())?;
        surface.add_element(circle_panel, nodes.cosine_leg, Style::default().stroke("#ff0000"))?;
        surface.add_element(circle_panel, nodes.sine_leg, Style::default().stroke("#0000ff"))?;

        let dot = surface.graph_mut().add_node(
            NodeKind::Static,
            Circle::new(0.0, 0.0, CENTER_DOT_RADIUS),
        );
        surface.add_element(circle_panel, dot, Style::default().fill("#404040"))?;

        for label in layout.special_point_labels() {
            let node = surface.graph_mut().add_node(NodeKind::Static, label);
            surface.add_element(root, node, Style::default())?;
        }

        // Readouts and the animate button.
        surface.add_element(info_panel, nodes.theta_display, Style::default())?;
        surface.add_element(info_panel, nodes.cos_display, Style::default().stroke("#ff0000"))?;
        surface.add_element(info_panel, nodes.sin_display, Style::default().stroke("#0000ff"))?;

        let animate = surface.add_button(
            info_panel,
            Rect::new(x, w * 4.0 / 5.0, BUTTON_WIDTH, BUTTON_HEIGHT),
            "animate",
        )?;

        surface.graph_mut().set_value(nodes.angle, config.angle)?;

        info!(
            nodes = surface.graph().node_count(),
            radius = r,
            angle = config.angle,
            "unit circle ready"
        );

        let driver = AnimationDriver::new(nodes.angle, config.animation_step);
        Ok(Self {
            surface,
            config,
            layout,
            circle,
            nodes,
            circle_panel,
            info_panel,
            animate,
            driver,
            frames: FrameQueue::new(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn radius(&self) -> f64 {
        self.layout.radius
    }

    pub fn circle(&self) -> Circle {
        self.circle
    }

    pub fn nodes(&self) -> UnitCircleNodes {
        self.nodes
    }

    pub fn circle_panel(&self) -> PanelId {
        self.circle_panel
    }

    pub fn info_panel(&self) -> PanelId {
        self.info_panel
    }

    pub fn animate_button(&self) -> ButtonId {
        self.animate
    }

    pub fn surface(&self) -> &Interactive {
        &self.surface
    }

    pub fn graph(&self) -> &Graph {
        self.surface.graph()
    }

    /// Current angle, in `[0, 2π)` once the scene has been driven.
    pub fn angle(&self) -> Result<f64, GraphError> {
        self.graph()
            .scalar(self.nodes.angle)
            .ok_or(GraphError::UnknownNode(self.nodes.angle))
    }

    /// Control position in the circle panel's frame.
    pub fn control(&self) -> Result<Point, GraphError> {
        self.graph()
            .point(self.nodes.control)
            .ok_or(GraphError::UnknownNode(self.nodes.control))
    }

    /// Text currently shown by a display or label node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.graph().value(node).and_then(|value| value.as_text())
    }

    /// Write the angle and propagate. Returns the number of updates run.
    pub fn set_angle(&mut self, angle: f64) -> Result<usize, GraphError> {
        self.surface.graph_mut().set_value(self.nodes.angle, angle)
    }

    /// Move the control to `p` (circle panel coordinates) as a drag would.
    pub fn drag_control(&mut self, p: Point) -> Result<(), GraphError> {
        self.surface.graph_mut().set_external(self.nodes.control, p)
    }

    pub fn pointer_down(&mut self, screen: Point) -> Result<SurfaceEvent, SurfaceError> {
        self.surface.pointer_down(screen)
    }

    pub fn pointer_move(&mut self, screen: Point) -> Result<SurfaceEvent, SurfaceError> {
        self.surface.pointer_move(screen)
    }

    /// Ends the gesture. A click on the animate button toggles the animation.
    pub fn pointer_up(&mut self, screen: Point) -> Result<SurfaceEvent, SurfaceError> {
        let event = self.surface.pointer_up(screen)?;
        if event == SurfaceEvent::Clicked(self.animate) {
            self.toggle_animation();
        }
        Ok(event)
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_running()
    }

    pub fn start_animation(&mut self) -> bool {
        self.driver.start(&mut self.frames)
    }

    pub fn stop_animation(&mut self) -> bool {
        self.driver.stop(&mut self.frames)
    }

    /// Returns whether the scene is animating afterwards.
    pub fn toggle_animation(&mut self) -> bool {
        self.driver.toggle(&mut self.frames)
    }

    /// Number of animation ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.driver.ticks()
    }

    pub fn render(&self, sink: &mut dyn DisplaySink) -> Result<(), SurfaceError> {
        self.surface.render(sink)
    }

    pub fn snapshot(&self) -> Result<Snapshot, SurfaceError> {
        let mut snapshot = Snapshot::new();
        self.render(&mut snapshot)?;
        Ok(snapshot)
    }
}

impl FrameTarget for UnitCircle {
    fn frame(&mut self) -> bool {
        let graph = self.surface.graph_mut();
        for handle in self.frames.take_due() {
            if let Err(err) = self.driver.on_frame(handle, graph, &mut self.frames) {
                warn!(error = %err, "animation frame failed");
            }
        }
        self.driver.is_running()
    }
}

/// Drive a shared scene from a tokio interval until it stops animating or
/// `stop` is set. Returns the number of frames delivered.
pub async fn animate(scene: Arc<Mutex<UnitCircle>>, stop: watch::Receiver<bool>) -> u64 {
    let period = scene.lock().config.frame_period();
    run_frames(scene, period, stop).await
}

/// Create the angle, the control and everything downstream of it.
///
/// `readouts` are the anchors of the θ, cos and sin displays.
fn wire(
    graph: &mut Graph,
    circle: Circle,
    readouts: [Point; 3],
) -> Result<UnitCircleNodes, GraphError> {
    let r = circle.r;
    let [theta_at, cos_at, sin_at] = readouts;

    let angle = graph.add_node(NodeKind::Source, 0.0);
    let circle_node = graph.add_node(NodeKind::Static, circle);

    let control = graph.add_node(NodeKind::Derived, Point::new(r, 0.0));
    constrain_to_circle(graph, control, circle, angle)?;

    let hypotenuse = graph.add_node(NodeKind::Derived, Segment::new(0.0, 0.0, r, 0.0));
    graph.add_dependency(hypotenuse, control)?;
    graph.set_update(hypotenuse, move |value, inputs| {
        let p = inputs.point(control)?;
        let segment = value.segment_mut(inputs.node())?;
        segment.x2 = p.x;
        segment.y2 = p.y;
        Ok(())
    })?;

    let cosine_leg = graph.add_node(NodeKind::Derived, Segment::new(0.0, 0.0, r, 0.0));
    graph.add_dependency(cosine_leg, hypotenuse)?;
    graph.set_update(cosine_leg, move |value, inputs| {
        let hyp = inputs.segment(hypotenuse)?;
        value.segment_mut(inputs.node())?.x2 = hyp.x2;
        Ok(())
    })?;

    let sine_leg = graph.add_node(NodeKind::Derived, Segment::new(0.0, 0.0, 0.0, r));
    graph.add_dependency(sine_leg, hypotenuse)?;
    graph.set_update(sine_leg, move |value, inputs| {
        let hyp = inputs.segment(hypotenuse)?;
        let segment = value.segment_mut(inputs.node())?;
        segment.y2 = hyp.y2;
        segment.x1 = hyp.x2;
        segment.x2 = segment.x1;
        Ok(())
    })?;

    let theta_display = graph.add_node(
        NodeKind::Display,
        Label::new(theta_at.x, theta_at.y, "θ = ..."),
    );
    graph.add_dependency(theta_display, control)?;
    graph.set_update(theta_display, move |value, inputs| {
        let p = inputs.point(control)?;
        *value.text_mut(inputs.node())? = theta_label(circle.parameter_of(p))?;
        Ok(())
    })?;

    let cos_display = graph.add_node(
        NodeKind::Display,
        Label::new(cos_at.x, cos_at.y, "cosθ = ..."),
    );
    graph.add_dependency(cos_display, control)?;
    graph.set_update(cos_display, move |value, inputs| {
        let p = inputs.point(control)?;
        *value.text_mut(inputs.node())? = cos_label((p.x - circle.cx) / circle.r)?;
        Ok(())
    })?;

    let sin_display = graph.add_node(
        NodeKind::Display,
        Label::new(sin_at.x, sin_at.y, "sinθ = ..."),
    );
    graph.add_dependency(sin_display, control)?;
    graph.set_update(sin_display, move |value, inputs| {
        let p = inputs.point(control)?;
        *value.text_mut(inputs.node())? = sin_label(-(p.y - circle.cy) / circle.r)?;
        Ok(())
    })?;

    Ok(UnitCircleNodes {
        angle,
        circle: circle_node,
        control,
        hypotenuse,
        cosine_leg,
        sine_leg,
        theta_display,
        cos_display,
        sin_display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    const EPS: f64 = 1e-9;

    fn scene() -> UnitCircle {
        UnitCircle::new(SceneConfig::default()).unwrap()
    }

    fn assert_on_circle(scene: &UnitCircle, angle: f64) {
        let p = scene.control().unwrap();
        let r = scene.radius();
        assert!((p.x - r * angle.cos()).abs() < 1e-6, "x = {}", p.x);
        assert!((p.y + r * angle.sin()).abs() < 1e-6, "y = {}", p.y);
    }

    #[test]
    fn layout_matches_width() {
        let layout = Layout::new(400.0);
        assert!((layout.radius - 3200.0 / (9.0 * PI)).abs() < EPS);
        assert!((layout.margin - (2.0 * layout.radius - 200.0)).abs() < EPS);
        let (w, h) = layout.size();
        assert!((w - (layout.margin + 802.0)).abs() < EPS);
        assert!((h - (layout.margin + 800.0)).abs() < EPS);
    }

    #[test]
    fn starts_consistent_at_configured_angle() {
        let scene = scene();
        let nodes = scene.nodes();
        assert!((scene.angle().unwrap() - 1.0).abs() < EPS);
        assert_on_circle(&scene, 1.0);

        let circle = scene.graph().value(nodes.circle).unwrap().as_circle().unwrap();
        assert_eq!(circle, scene.circle());
        assert!((circle.r - scene.radius()).abs() < EPS);

        let p = scene.control().unwrap();
        let hyp = scene.graph().value(nodes.hypotenuse).unwrap().as_segment().unwrap();
        assert_eq!(hyp.end(), p);

        let sine = scene.graph().value(nodes.sine_leg).unwrap().as_segment().unwrap();
        assert_eq!(sine, Segment::new(p.x, 0.0, p.x, p.y));

        assert_eq!(scene.text(nodes.theta_display), Some("θ = 0.318π = 57.296°"));
        assert_eq!(scene.text(nodes.cos_display), Some("cosθ = 0.540"));
        assert_eq!(scene.text(nodes.sin_display), Some("sinθ = 0.841"));
    }

    #[test]
    fn displays_keep_their_position() {
        let scene = scene();
        let x = scene.layout().info_x();
        match scene.graph().value(scene.nodes().cos_display) {
            Some(crate::value::Value::Text(label)) => {
                assert!((label.x - x).abs() < EPS);
                assert!((label.y - 160.0).abs() < EPS);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn setting_the_angle_moves_everything() {
        let mut scene = scene();
        let updates = scene.set_angle(FRAC_PI_2).unwrap();
        // control, hypotenuse, two legs, three displays
        assert_eq!(updates, 7);
        assert_on_circle(&scene, FRAC_PI_2);

        let cos = scene.graph().value(scene.nodes().cosine_leg).unwrap().as_segment().unwrap();
        assert!(cos.x2.abs() < 1e-6);
        assert_eq!(scene.text(scene.nodes().cos_display), Some("cosθ = 0.000"));
    }

    #[test]
    fn dragging_sets_the_angle() {
        let mut scene = scene();
        let r = scene.radius();
        scene.drag_control(Point::new(-2.0 * r, 0.0)).unwrap();

        assert!((scene.angle().unwrap() - PI).abs() < EPS);
        assert_on_circle(&scene, PI);
        assert_eq!(scene.text(scene.nodes().sin_display), Some("sinθ = 0.000"));
    }

    #[test]
    fn drag_just_below_start_wraps_to_zero() {
        let mut scene = scene();
        let r = scene.radius();
        scene.drag_control(Point::new(r, 1e-14)).unwrap();

        let angle = scene.angle().unwrap();
        assert!((0.0..TAU).contains(&angle), "got {angle}");
        assert_eq!(scene.text(scene.nodes().theta_display), Some("θ = 0.000π = 0.000°"));
    }

    #[test]
    fn drag_updates_each_dependent_once() {
        let mut scene = scene();
        let nodes = scene.nodes();
        let before = scene.graph().update_count(nodes.sine_leg).unwrap();

        let r = scene.radius();
        scene.drag_control(Point::new(0.0, r)).unwrap();

        assert_eq!(scene.graph().update_count(nodes.sine_leg).unwrap(), before + 1);
        assert!((scene.angle().unwrap() - 3.0 * FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn animate_button_toggles_the_driver() {
        let mut scene = scene();
        let button = scene.surface().button(scene.animate_button()).unwrap().clone();
        let transform = scene.surface().transform(button.panel).unwrap();
        let inside = transform.apply(Point::new(button.bounds.x + 1.0, button.bounds.y + 1.0));

        scene.pointer_down(inside).unwrap();
        assert_eq!(scene.pointer_up(inside).unwrap(), SurfaceEvent::Clicked(button.id));
        assert!(scene.is_animating());

        scene.pointer_down(inside).unwrap();
        scene.pointer_up(inside).unwrap();
        assert!(!scene.is_animating());
    }

    #[test]
    fn frames_advance_angle_until_stopped() {
        let mut scene = scene();
        scene.start_animation();
        assert!(scene.frame());
        assert!(scene.frame());
        assert!((scene.angle().unwrap() - 1.02).abs() < 1e-9);
        assert_on_circle(&scene, 1.02);

        scene.stop_animation();
        assert!(!scene.frame());
        assert!((scene.angle().unwrap() - 1.02).abs() < 1e-9);
        assert_eq!(scene.ticks(), 2);
    }

    #[test]
    fn animation_wraps_the_angle() {
        let mut scene = scene();
        scene.set_angle(TAU - 0.005).unwrap();
        scene.start_animation();
        scene.frame();
        assert!((scene.angle().unwrap() - 0.005).abs() < 1e-9);
    }

    #[test]
    fn snapshot_lists_every_panel() {
        let scene = scene();
        let snapshot = scene.snapshot().unwrap();
        assert_eq!(snapshot.panels.len(), 3);

        let control = snapshot.find(scene.nodes().control).unwrap();
        assert!(control.draggable);
        assert_eq!(snapshot.panels[0].elements.len(), 8);
        assert_eq!(snapshot.panels[2].buttons.len(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SceneConfig {
            width: 0.0,
            ..SceneConfig::default()
        };
        assert!(matches!(UnitCircle::new(config), Err(SceneError::Config(_))));
    }

    #[tokio::test]
    async fn shared_scene_animates_until_stopped() {
        let scene = Arc::new(Mutex::new(UnitCircle::new(SceneConfig {
            frame_period_ms: 1,
            ..SceneConfig::default()
        })
        .unwrap()));
        scene.lock().start_animation();

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(animate(scene.clone(), rx));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        tx.send(true).unwrap();
        let delivered = task.await.unwrap();

        assert!(delivered > 0);
        let angle = scene.lock().angle().unwrap();
        assert!(angle > 1.0);
    }
}

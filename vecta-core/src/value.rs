//! Node Values
//!
//! Every node in the graph holds one [`Value`]. Geometry uses screen
//! coordinates: x grows to the right and y grows downwards, so a point above
//! the origin has a negative y.

use serde::{Deserialize, Serialize};

/// A position in some panel's local coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A line segment from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

/// A circle given by its centre and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self { cx, cy, r }
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `p` lies inside the rectangle (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Text anchored at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub contents: String,
}

impl Label {
    pub fn new(x: f64, y: f64, contents: impl Into<String>) -> Self {
        Self {
            x,
            y,
            contents: contents.into(),
        }
    }
}

/// The value stored in a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Value {
    Scalar { value: f64 },
    Point(Point),
    Segment(Segment),
    Circle(Circle),
    Rect(Rect),
    Text(Label),
}

impl Value {
    pub fn scalar(value: f64) -> Self {
        Value::Scalar { value }
    }

    /// Text at the local origin.
    pub fn text(contents: impl Into<String>) -> Self {
        Value::Text(Label::new(0.0, 0.0, contents))
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar { .. } => "scalar",
            Value::Point(_) => "point",
            Value::Segment(_) => "segment",
            Value::Circle(_) => "circle",
            Value::Rect(_) => "rect",
            Value::Text(_) => "text",
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Value::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_segment(&self) -> Option<Segment> {
        match self {
            Value::Segment(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<Circle> {
        match self {
            Value::Circle(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(label) => Some(&label.contents),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::scalar(value)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl From<Segment> for Value {
    fn from(s: Segment) -> Self {
        Value::Segment(s)
    }
}

impl From<Circle> for Value {
    fn from(c: Circle) -> Self {
        Value::Circle(c)
    }
}

impl From<Label> for Value {
    fn from(label: Label) -> Self {
        Value::Text(label)
    }
}

impl From<Rect> for Value {
    fn from(r: Rect) -> Self {
        Value::Rect(r)
    }
}

//! Segment locus, parameterised by `t ∈ [0, 1]` from start to end.

use super::Locus;
use crate::value::{Point, Segment};

impl Locus for Segment {
    fn project(&self, p: Point) -> Point {
        self.point_at(self.parameter_of(p))
    }

    fn point_at(&self, t: f64) -> Point {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        Point::new(
            self.x1 + t * (self.x2 - self.x1),
            self.y1 + t * (self.y2 - self.y1),
        )
    }

    fn parameter_of(&self, p: Point) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return 0.0;
        }
        let t = ((p.x - self.x1) * dx + (p.y - self.y1) * dy) / len2;
        if t.is_finite() {
            t.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_clamps_to_ends() {
        let segment = Segment::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(segment.project(Point::new(-5.0, -5.0)), Point::new(0.0, 0.0));
        assert_eq!(segment.project(Point::new(20.0, 20.0)), Point::new(10.0, 10.0));
        assert_eq!(segment.project(Point::new(10.0, 0.0)), Point::new(5.0, 5.0));
    }

    #[test]
    fn degenerate_segment_is_a_point() {
        let segment = Segment::new(3.0, 4.0, 3.0, 4.0);
        assert_eq!(segment.parameter_of(Point::new(100.0, 0.0)), 0.0);
        assert_eq!(segment.project(Point::new(100.0, 0.0)), Point::new(3.0, 4.0));
    }
}

//! Circle locus, parameterised by angle.
//!
//! Screen coordinates have y pointing down, so the point at angle θ is
//! `(cx + r·cos θ, cy − r·sin θ)` and angles grow counter-clockwise on
//! screen. Recovered angles lie in `[0, 2π)` with the branch cut on the
//! positive x-axis.

use std::f64::consts::TAU;

use super::Locus;
use crate::value::{Circle, Point};

impl Locus for Circle {
    fn project(&self, p: Point) -> Point {
        let dx = p.x - self.cx;
        let dy = p.y - self.cy;
        let len = dx.hypot(dy);
        if !(len.is_finite() && len > 0.0) {
            // The centre has no nearest point; snap to angle 0.
            return self.point_at(0.0);
        }
        Point::new(self.cx + self.r * dx / len, self.cy + self.r * dy / len)
    }

    fn point_at(&self, angle: f64) -> Point {
        Point::new(
            self.cx + self.r * angle.cos(),
            self.cy - self.r * angle.sin(),
        )
    }

    fn parameter_of(&self, p: Point) -> f64 {
        let dx = p.x - self.cx;
        let dy = p.y - self.cy;
        if !(dx.is_finite() && dy.is_finite()) || (dx == 0.0 && dy == 0.0) {
            return 0.0;
        }
        let raw = dy.atan2(dx);
        if dy <= 0.0 {
            return raw.abs();
        }
        // Just below the positive x-axis `TAU - raw` rounds up to TAU.
        let angle = TAU - raw;
        if angle >= TAU {
            0.0
        } else {
            angle
        }
    }
}

//! Panel coordinate transforms.
//!
//! A transform maps a panel's local coordinates to its parent's (or, once
//! composed along the panel chain, to the screen): `p' = scale·p + (tx, ty)`.

use serde::Serialize;

use crate::value::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub tx: f64,
    pub ty: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        tx: 0.0,
        ty: 0.0,
        scale: 1.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { tx, ty, scale: 1.0 }
    }

    pub fn scale(scale: f64) -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            scale,
        }
    }

    /// The transform that applies `inner` first, then `self`.
    pub fn then(self, inner: Transform) -> Transform {
        Transform {
            tx: self.scale * inner.tx + self.tx,
            ty: self.scale * inner.ty + self.ty,
            scale: self.scale * inner.scale,
        }
    }

    /// Local to outer coordinates.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.scale * p.x + self.tx, self.scale * p.y + self.ty)
    }

    /// Outer to local coordinates. A zero scale collapses everything onto
    /// the local origin.
    pub fn invert(&self, p: Point) -> Point {
        if self.scale == 0.0 {
            return Point::ORIGIN;
        }
        Point::new((p.x - self.tx) / self.scale, (p.y - self.ty) / self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_applies_inner_first() {
        let outer = Transform::translate(100.0, 50.0);
        let inner = Transform::scale(2.0);
        let both = outer.then(inner);

        assert_eq!(both.apply(Point::new(1.0, 1.0)), Point::new(102.0, 52.0));
        assert_eq!(inner.then(outer).apply(Point::new(1.0, 1.0)), Point::new(202.0, 102.0));
    }

    #[test]
    fn invert_undoes_apply() {
        let t = Transform::translate(10.0, -4.0).then(Transform::scale(4.0));
        let p = Point::new(3.5, -2.0);
        assert_eq!(t.invert(t.apply(p)), p);
    }
}

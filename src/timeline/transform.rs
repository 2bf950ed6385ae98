//! 2D affine transforms and render-target geometry.
//!
//! Transforms use the row-vector convention: a point `[x y 1]` is multiplied
//! on the right by the matrix
//!
//! ```text
//! | a  b  0 |
//! | c  d  0 |
//! | tx ty 1 |
//! ```
//!
//! which is the convention video containers use for track display matrices.
//! `t1.then(t2)` applies `t1` first; the order is load-bearing for the
//! orientation correction and must not be swapped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D affine transform: linear part `(a, b, c, d)` plus translation `(tx, ty)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Create a transform from the four linear coefficients, no translation.
    pub const fn from_coefficients(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Uniform scale.
    pub fn scale(s: f64) -> Self {
        Self {
            a: s,
            b: 0.0,
            c: 0.0,
            d: s,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    /// Rotation by `angle` radians (counter-clockwise in the row-vector
    /// convention; a quarter turn gives coefficients `(0, 1, -1, 0)`).
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Compose with another transform: the result applies `self` first,
    /// then `other`.
    pub fn then(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }

    /// Apply the transform to a point.
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.a + y * self.c + self.tx,
            x * self.b + y * self.d + self.ty,
        )
    }

    /// The four linear coefficients as a tuple, for classification.
    #[inline]
    pub fn coefficients(self) -> (f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[a={} b={} c={} d={} tx={} ty={}]",
            self.a, self.b, self.c, self.d, self.tx, self.ty
        )
    }
}

/// Width and height in pixels, as floats to keep scale ratios exact-ish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Create a new dimensions value.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_apply() {
        let (x, y) = AffineTransform::IDENTITY.apply(3.0, 7.0);
        assert_eq!((x, y), (3.0, 7.0));
    }

    #[test]
    fn test_scale_then_translate() {
        let t = AffineTransform::scale(2.0).then(AffineTransform::translation(10.0, 20.0));
        let (x, y) = t.apply(1.0, 1.0);
        assert_eq!((x, y), (12.0, 22.0));
    }

    #[test]
    fn test_translate_then_scale_differs() {
        // Composition order changes the result
        let a = AffineTransform::scale(2.0).then(AffineTransform::translation(10.0, 0.0));
        let b = AffineTransform::translation(10.0, 0.0).then(AffineTransform::scale(2.0));
        assert_ne!(a.apply(1.0, 0.0), b.apply(1.0, 0.0));
    }

    #[test]
    fn test_quarter_turn_coefficients() {
        let t = AffineTransform::rotation(std::f64::consts::FRAC_PI_2);
        assert!(t.a.abs() < 1e-12);
        assert!((t.b - 1.0).abs() < 1e-12);
        assert!((t.c + 1.0).abs() < 1e-12);
        assert!(t.d.abs() < 1e-12);
    }

    #[test]
    fn test_then_is_associative() {
        let r = AffineTransform::rotation(0.3);
        let s = AffineTransform::scale(1.5);
        let t = AffineTransform::translation(4.0, -2.0);

        let left = r.then(s).then(t).apply(2.0, 5.0);
        let right = r.then(s.then(t)).apply(2.0, 5.0);
        assert!((left.0 - right.0).abs() < 1e-9);
        assert!((left.1 - right.1).abs() < 1e-9);
    }
}

use serde::{Deserialize, Serialize};

/// A position or displacement in the 2D ground plane.
///
/// Equality is exact value equality with no epsilon. The road graph relies
/// on this for membership tests, so callers must not expect tolerance-based
/// matching here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point2) -> Point2 {
        Point2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub(&self, other: &Point2) -> Point2 {
        Point2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn scale(&self, factor: f32) -> Point2 {
        Point2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction. Produces NaN components for the
    /// zero vector; degenerate inputs are the caller's responsibility.
    pub fn normalized(&self) -> Point2 {
        let len = self.magnitude();
        Point2 {
            x: self.x / len,
            y: self.y / len,
        }
    }

    pub fn distance(&self, other: &Point2) -> f32 {
        self.sub(other).magnitude()
    }

    /// Angle of this vector from the positive X axis, in radians.
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Offset this point by `offset` units along `angle`.
    pub fn translate(&self, angle: f32, offset: f32) -> Point2 {
        Point2 {
            x: self.x + angle.cos() * offset,
            y: self.y + angle.sin() * offset,
        }
    }

    /// Bit-pattern key for exact-position lookup tables. Positive and
    /// negative zero collapse to the same key so they match `==`.
    pub(crate) fn position_key(&self) -> (u32, u32) {
        let x = if self.x == 0.0 { 0.0f32 } else { self.x };
        let y = if self.y == 0.0 { 0.0f32 } else { self.y };
        (x.to_bits(), y.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(3.0, -1.0);

        assert_eq!(a.add(&b), Point2::new(4.0, 1.0));
        assert_eq!(b.sub(&a), Point2::new(2.0, -3.0));
        assert_eq!(a.scale(2.0), Point2::new(2.0, 4.0));
    }

    #[test]
    fn test_distance_and_magnitude() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);

        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.magnitude(), 5.0);
    }

    #[test]
    fn test_translate_along_angle() {
        let p = Point2::new(1.0, 1.0);
        let moved = p.translate(0.0, 2.0);

        assert!((moved.x - 3.0).abs() < 1e-6);
        assert!((moved.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_position_key_merges_signed_zero() {
        let pos = Point2::new(0.0, 5.0);
        let neg = Point2::new(-0.0, 5.0);

        assert_eq!(pos, neg);
        assert_eq!(pos.position_key(), neg.position_key());
    }
}

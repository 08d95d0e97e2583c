//! Planar vector math and axis-aligned bounding boxes.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Two-dimensional vector expressed in world pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component, growing to the right.
    pub x: f32,
    /// Vertical component, growing downwards.
    pub y: f32,
}

impl Vector2 {
    /// Vector with both components set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the component-wise sum of both vectors.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Returns the component-wise difference `self - other`.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Returns the vector multiplied by a scalar.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Adds `direction * factor` to the vector in place.
    pub fn add_scaled(&mut self, direction: Self, factor: f32) {
        self.x += direction.x * factor;
        self.y += direction.y * factor;
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared length, avoiding the square root.
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        self.subtract(other).length()
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// The zero vector has no direction, so `None` is returned for it.
    #[must_use]
    pub fn normalize(self) -> Option<Self> {
        let length = self.length();
        if length <= f32::EPSILON {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Heading of the vector in radians as reported by `atan2(y, x)`.
    #[must_use]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Vector2::add(self, rhs)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    min: Vector2,
    size: Vector2,
}

impl Aabb {
    /// Creates a box from its top-left corner and its dimensions.
    #[must_use]
    pub const fn from_top_left(min: Vector2, width: f32, height: f32) -> Self {
        Self {
            min,
            size: Vector2::new(width, height),
        }
    }

    /// Creates a box of the provided dimensions centred on `center`.
    #[must_use]
    pub fn from_center(center: Vector2, width: f32, height: f32) -> Self {
        Self {
            min: Vector2::new(center.x - width / 2.0, center.y - height / 2.0),
            size: Vector2::new(width, height),
        }
    }

    /// Top-left corner of the box.
    #[must_use]
    pub const fn min(&self) -> Vector2 {
        self.min
    }

    /// Bottom-right corner of the box.
    #[must_use]
    pub fn max(&self) -> Vector2 {
        self.min + self.size
    }

    /// Dimensions of the box.
    #[must_use]
    pub const fn size(&self) -> Vector2 {
        self.size
    }

    /// Centre point of the box.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.min + self.size * 0.5
    }

    /// Reports whether two boxes overlap. Boxes that merely touch do not.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }

    /// Reports whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Vector2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_return_new_values() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(1.0, -2.0);

        assert_eq!(a.add(b), Vector2::new(4.0, 2.0));
        assert_eq!(a.subtract(b), Vector2::new(2.0, 6.0));
        assert_eq!(a.scale(2.0), Vector2::new(6.0, 8.0));
        assert_eq!(a, Vector2::new(3.0, 4.0), "operands stay untouched");
        assert_eq!(a.length(), 5.0);
    }

    #[test]
    fn normalizing_zero_vector_yields_none() {
        assert!(Vector2::ZERO.normalize().is_none());
        let unit = Vector2::new(0.0, 10.0).normalize().expect("non-zero vector");
        assert_eq!(unit, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn add_scaled_moves_in_place() {
        let mut position = Vector2::new(1.0, 1.0);
        position.add_scaled(Vector2::new(1.0, 0.0), 4.0);
        assert_eq!(position, Vector2::new(5.0, 1.0));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::from_top_left(Vector2::new(0.0, 0.0), 10.0, 10.0);
        let b = Aabb::from_top_left(Vector2::new(10.0, 0.0), 10.0, 10.0);
        let c = Aabb::from_center(Vector2::new(9.0, 5.0), 4.0, 4.0);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(b.intersects(&c));
    }

    #[test]
    fn centred_box_reports_its_center() {
        let aabb = Aabb::from_center(Vector2::new(32.0, 48.0), 32.0, 32.0);
        assert_eq!(aabb.min(), Vector2::new(16.0, 32.0));
        assert_eq!(aabb.center(), Vector2::new(32.0, 48.0));
        assert!(aabb.contains(Vector2::new(16.0, 32.0)));
    }
}

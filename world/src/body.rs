//! Positioned, sized entity base shared by enemies, towers and projectiles.

use tower_defence_core::{Aabb, Vector2};

/// Point of the body that its position refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Position is the centre of the body.
    Center,
    /// Position is the top-left corner of the body.
    TopLeft,
}

/// Spatial footprint of an entity plus its deletion flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    position: Vector2,
    width: f32,
    height: f32,
    anchor: Anchor,
    marked_for_deletion: bool,
}

impl Body {
    /// Creates a live body.
    #[must_use]
    pub const fn new(position: Vector2, width: f32, height: f32, anchor: Anchor) -> Self {
        Self {
            position,
            width,
            height,
            anchor,
            marked_for_deletion: false,
        }
    }

    /// Anchor position of the body.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Moves the body by `direction * factor`.
    pub fn translate(&mut self, direction: Vector2, factor: f32) {
        self.position.add_scaled(direction, factor);
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre of the body regardless of its anchor.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.aabb().center()
    }

    /// Bounding box of the body.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        match self.anchor {
            Anchor::Center => Aabb::from_center(self.position, self.width, self.height),
            Anchor::TopLeft => Aabb::from_top_left(self.position, self.width, self.height),
        }
    }

    /// Reports whether the two bodies overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.aabb().intersects(&other.aabb())
    }

    /// Reports whether the body awaits removal.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.marked_for_deletion
    }

    /// Flags the body for removal at the end of the tick.
    pub fn mark_for_deletion(&mut self) {
        self.marked_for_deletion = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_change_the_bounding_box() {
        let centred = Body::new(Vector2::new(32.0, 32.0), 32.0, 32.0, Anchor::Center);
        let top_left = Body::new(Vector2::new(32.0, 32.0), 64.0, 64.0, Anchor::TopLeft);

        assert_eq!(centred.aabb().min(), Vector2::new(16.0, 16.0));
        assert_eq!(top_left.center(), Vector2::new(64.0, 64.0));
        assert!(centred.intersects(&top_left));
    }

    #[test]
    fn marking_is_sticky() {
        let mut body = Body::new(Vector2::ZERO, 8.0, 8.0, Anchor::Center);
        assert!(!body.is_marked());
        body.mark_for_deletion();
        body.mark_for_deletion();
        assert!(body.is_marked());
    }
}

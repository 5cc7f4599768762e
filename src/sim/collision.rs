//! Axis-aligned collision detection
//!
//! Everything that can collide is a screen-space AABB (y grows downward).
//! Overlap uses strict inequality on all four comparisons, so boxes that
//! merely touch at an edge do not count as colliding.

use glam::Vec2;

/// An axis-aligned bounding box (top-left anchored, y-down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Overlap test on both axes; edge contact is not a hit
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn aabb(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_hits() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_containment_hits() {
        let outer = aabb(0.0, 0.0, 100.0, 100.0);
        let inner = aabb(40.0, 40.0, 10.0, 10.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_separated_misses() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(20.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_edge_contact_is_not_a_hit() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        // a.right == b.left
        let b = aabb(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        // a.bottom == c.top
        let c = aabb(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&c));
        // Corner contact only
        let d = aabb(10.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&d));
    }

    #[test]
    fn test_one_axis_overlap_misses() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        // Overlaps on x, separated on y
        let b = aabb(5.0, 30.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    proptest! {
        #[test]
        fn intersects_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = aabb(ax, ay, aw, ah);
            let b = aabb(bx, by, bw, bh);
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn shared_vertical_edge_never_hits(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bw in 1.0f32..200.0, bh in 1.0f32..200.0,
        ) {
            let a = aabb(ax, ay, aw, ah);
            // b starts exactly where a ends
            let b = aabb(ax + aw, ay, bw, bh);
            prop_assert!(!a.intersects(&b));
        }
    }
}

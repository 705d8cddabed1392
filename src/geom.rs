//! Integer geometry primitives
//!
//! Everything here is a total function over `glam::IVec2` coordinates:
//! y grows downward, the field origin is the top-left corner. Collision
//! direction testing is deliberately approximate (four axis-aligned
//! probes, first hit wins) rather than swept.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Unit direction pointing up (negative y)
pub const UP: IVec2 = IVec2::new(0, -1);
/// Unit direction pointing down (positive y)
pub const DOWN: IVec2 = IVec2::new(0, 1);
/// Unit direction pointing left (negative x)
pub const LEFT: IVec2 = IVec2::new(-1, 0);
/// Unit direction pointing right (positive x)
pub const RIGHT: IVec2 = IVec2::new(1, 0);

/// Probe order for directional collision tests
pub const COLLISION_DIRS: [IVec2; 4] = [UP, DOWN, LEFT, RIGHT];

/// Mirror `v` over the unit axis normal `n`: `v - 2(v.n)n`
#[inline]
pub fn mirror_over(v: IVec2, n: IVec2) -> IVec2 {
    debug_assert_eq!(n.length_squared(), 1);
    v - n * (2 * v.dot(n))
}

/// Scale `v` by a fractional factor, rounding each component half away
/// from zero
#[inline]
pub fn scale_round(v: IVec2, factor: f64) -> IVec2 {
    IVec2::new(
        (f64::from(v.x) * factor).round() as i32,
        (f64::from(v.y) * factor).round() as i32,
    )
}

/// Whether `a` lies up-and-left of `b` (non-strict, both axes)
#[inline]
pub fn up_and_left(a: IVec2, b: IVec2) -> bool {
    a.x <= b.x && a.y <= b.y
}

/// A circle with an integer center and diameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    center: IVec2,
    diameter: i32,
}

impl Circle {
    /// Panics when `diameter` is negative (caller bug).
    pub fn new(center: IVec2, diameter: i32) -> Self {
        assert!(diameter >= 0, "circle diameter must be non-negative");
        Self { center, diameter }
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        self.center
    }

    #[inline]
    pub fn diameter(&self) -> i32 {
        self.diameter
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.diameter / 2
    }

    /// Outermost point of the circle in unit direction `dir`
    #[inline]
    pub fn outermost(&self, dir: IVec2) -> IVec2 {
        self.center + dir * self.radius()
    }

    /// Top-left corner of the bounding box
    pub fn top_left(&self) -> IVec2 {
        self.center - IVec2::splat(self.radius())
    }

    /// Bottom-right corner of the bounding box
    pub fn bottom_right(&self) -> IVec2 {
        self.center + IVec2::splat(self.radius())
    }

    /// Same diameter, different center
    pub fn with_center(&self, center: IVec2) -> Self {
        Self { center, diameter: self.diameter }
    }
}

/// An axis-aligned rectangle, top-left to bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    top_left: IVec2,
    bottom_right: IVec2,
}

impl Rect {
    /// Panics when the corners are inverted on either axis (caller bug).
    pub fn new(top_left: IVec2, bottom_right: IVec2) -> Self {
        assert!(
            up_and_left(top_left, bottom_right),
            "rect corners inverted: {top_left} / {bottom_right}"
        );
        Self { top_left, bottom_right }
    }

    #[inline]
    pub fn top_left(&self) -> IVec2 {
        self.top_left
    }

    #[inline]
    pub fn bottom_right(&self) -> IVec2 {
        self.bottom_right
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bottom_right.x - self.top_left.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom_right.y - self.top_left.y
    }

    pub fn contains_point(&self, p: IVec2) -> bool {
        up_and_left(self.top_left, p) && up_and_left(p, self.bottom_right)
    }

    /// Whether the circle lies fully inside this rectangle
    pub fn contains_circle(&self, c: &Circle) -> bool {
        let d = IVec2::splat(c.diameter());
        // The size guard also ensures the shrunken rect below is valid.
        up_and_left(self.top_left + d, self.bottom_right)
            && self.minus_margin(c.radius()).contains_point(c.center())
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        up_and_left(self.top_left, other.top_left)
            && up_and_left(other.bottom_right, self.bottom_right)
    }

    /// Directional collision test against a circle.
    ///
    /// Probes the circle's outermost point in each of up, down, left,
    /// right; the first probe landing inside this rectangle yields the
    /// collision direction (the mirror normal for the bounce).
    pub fn collide_with(&self, c: &Circle) -> Option<IVec2> {
        COLLISION_DIRS
            .into_iter()
            .find(|&dir| self.contains_point(c.outermost(dir)))
    }

    /// Shrink by `d` on every side
    pub fn minus_margin(&self, d: i32) -> Rect {
        self.minus_margin_xy(d, d)
    }

    /// Shrink by `dx` horizontally and `dy` vertically on each side
    pub fn minus_margin_xy(&self, dx: i32, dy: i32) -> Rect {
        let dv = IVec2::new(dx, dy);
        Rect::new(self.top_left + dv, self.bottom_right - dv)
    }

    /// Closest point inside this rectangle to `p`
    pub fn constrain_point(&self, p: IVec2) -> IVec2 {
        p.clamp(self.top_left, self.bottom_right)
    }

    /// Move the circle by the least amount that puts it fully inside
    /// this rectangle.
    ///
    /// Panics when the circle cannot fit (caller bug).
    pub fn constrain_circle(&self, c: &Circle) -> Circle {
        assert!(c.diameter() <= self.width() && c.diameter() <= self.height());
        let inner = self.minus_margin(c.radius());
        c.with_center(inner.constrain_point(c.center()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mirror_over_axis_normals() {
        let v = IVec2::new(3, -7);
        assert_eq!(mirror_over(v, UP), IVec2::new(3, 7));
        assert_eq!(mirror_over(v, DOWN), IVec2::new(3, 7));
        assert_eq!(mirror_over(v, LEFT), IVec2::new(-3, -7));
        assert_eq!(mirror_over(v, RIGHT), IVec2::new(-3, -7));
    }

    #[test]
    fn test_scale_round_half_away_from_zero() {
        assert_eq!(scale_round(IVec2::new(5, -5), 0.5), IVec2::new(3, -3));
        assert_eq!(scale_round(IVec2::new(4, -4), 0.5), IVec2::new(2, -2));
        assert_eq!(scale_round(IVec2::new(1, -1), 0.4), IVec2::new(0, 0));
        assert_eq!(scale_round(IVec2::new(10, -10), 0.26), IVec2::new(3, -3));
    }

    #[test]
    fn test_circle_outermost_points() {
        let c = Circle::new(IVec2::new(100, 100), 40);
        assert_eq!(c.outermost(UP), IVec2::new(100, 80));
        assert_eq!(c.outermost(DOWN), IVec2::new(100, 120));
        assert_eq!(c.outermost(LEFT), IVec2::new(80, 100));
        assert_eq!(c.outermost(RIGHT), IVec2::new(120, 100));
        assert_eq!(c.top_left(), IVec2::new(80, 80));
        assert_eq!(c.bottom_right(), IVec2::new(120, 120));
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(IVec2::ZERO, IVec2::new(100, 50));
        assert!(r.contains_point(IVec2::new(0, 0)));
        assert!(r.contains_point(IVec2::new(100, 50)));
        assert!(!r.contains_point(IVec2::new(101, 10)));

        assert!(r.contains_circle(&Circle::new(IVec2::new(50, 25), 20)));
        // Touching the edge from inside still counts as contained
        assert!(r.contains_circle(&Circle::new(IVec2::new(10, 25), 20)));
        assert!(!r.contains_circle(&Circle::new(IVec2::new(5, 25), 20)));
        // Circle larger than the rect
        assert!(!r.contains_circle(&Circle::new(IVec2::new(50, 25), 60)));

        assert!(r.contains_rect(&Rect::new(IVec2::new(10, 10), IVec2::new(90, 40))));
        assert!(!r.contains_rect(&Rect::new(IVec2::new(10, 10), IVec2::new(110, 40))));
    }

    #[test]
    fn test_collide_with_picks_first_axis_probe() {
        let wall = Rect::new(IVec2::new(0, -1000), IVec2::new(1000, 0));
        // Ball poking into the top wall: its topmost point is inside
        let ball = Circle::new(IVec2::new(500, 10), 40);
        assert_eq!(wall.collide_with(&ball), Some(UP));
        // Well clear of the wall
        let ball = Circle::new(IVec2::new(500, 100), 40);
        assert_eq!(wall.collide_with(&ball), None);
    }

    #[test]
    fn test_collide_with_side_wall() {
        let wall = Rect::new(IVec2::new(-1000, 0), IVec2::new(0, 1000));
        let ball = Circle::new(IVec2::new(15, 500), 40);
        assert_eq!(wall.collide_with(&ball), Some(LEFT));
    }

    #[test]
    fn test_minus_margin() {
        let r = Rect::new(IVec2::ZERO, IVec2::new(100, 50));
        let shrunk = r.minus_margin(10);
        assert_eq!(shrunk.top_left(), IVec2::new(10, 10));
        assert_eq!(shrunk.bottom_right(), IVec2::new(90, 40));

        let shrunk = r.minus_margin_xy(20, 0);
        assert_eq!(shrunk.top_left(), IVec2::new(20, 0));
        assert_eq!(shrunk.bottom_right(), IVec2::new(80, 50));
    }

    #[test]
    fn test_constrain_circle_moves_minimally() {
        let field = Rect::new(IVec2::ZERO, IVec2::new(1000, 1000));
        let c = Circle::new(IVec2::new(-30, 500), 40);
        let fixed = field.constrain_circle(&c);
        assert_eq!(fixed.center(), IVec2::new(20, 500));
        assert!(field.contains_circle(&fixed));
    }

    #[test]
    fn test_constrain_circle_admits_field_sized_circle() {
        // A circle as wide as the rect itself still fits (touching both
        // edges); it must clamp to the center, not panic.
        let field = Rect::new(IVec2::ZERO, IVec2::new(1000, 1000));
        let fixed = field.constrain_circle(&Circle::new(IVec2::new(200, 700), 1000));
        assert_eq!(fixed.center(), IVec2::new(500, 500));
        assert!(field.contains_circle(&fixed));
    }

    proptest! {
        #[test]
        fn prop_mirror_is_involutive(x in -10_000i32..10_000, y in -10_000i32..10_000, d in 0usize..4) {
            let v = IVec2::new(x, y);
            let n = COLLISION_DIRS[d];
            prop_assert_eq!(mirror_over(mirror_over(v, n), n), v);
            prop_assert_eq!(mirror_over(v, n), v - n * (2 * v.dot(n)));
        }

        #[test]
        fn prop_constrain_is_idempotent(x in -2000i32..4000, y in -2000i32..4000, diam in 0i32..500) {
            let field = Rect::new(IVec2::ZERO, IVec2::new(2000, 2000));
            let once = field.constrain_circle(&Circle::new(IVec2::new(x, y), diam));
            let twice = field.constrain_circle(&once);
            prop_assert_eq!(once, twice);
            prop_assert!(field.contains_circle(&once));
        }
    }
}

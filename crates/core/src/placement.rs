//! Placed boxes and their JSON-facing form.

use serde::{Deserialize, Serialize};

/// One placed box as an integer corner rectangle in the solver frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BoxRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Swaps corner coordinates so that `x0 <= x1` and `y0 <= y1`.
    pub fn fix(&mut self) {
        if self.x0 > self.x1 {
            std::mem::swap(&mut self.x0, &mut self.x1);
        }
        if self.y0 > self.y1 {
            std::mem::swap(&mut self.y0, &mut self.y1);
        }
    }

    pub fn shift_x(&mut self, delta: i32) {
        self.x0 += delta;
        self.x1 += delta;
    }

    pub fn shift_y(&mut self, delta: i32) {
        self.y0 += delta;
        self.y1 += delta;
    }

    /// True if the open interiors of the two boxes intersect.
    pub fn overlaps(&self, other: &BoxRect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

/// One placed box in the caller's pallet frame: the centroid (always a
/// half-integer) and whether the box stands with its long side along the
/// y-axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotated: bool,
}

impl Placement {
    /// Converts a solver-frame box to the caller's frame.
    ///
    /// When the caller passed `L < W` the solver worked on the swapped
    /// pallet, so the centroid coordinates swap back here. A box counts as
    /// rotated when its caller-frame height is the long box side; square
    /// boxes never do.
    pub fn from_box(b: &BoxRect, box_l: i32, box_w: i32, swapped: bool) -> Self {
        let cx = f64::from(b.x0 + b.x1) / 2.0;
        let cy = f64::from(b.y0 + b.y1) / 2.0;
        let (x, y) = if swapped { (cy, cx) } else { (cx, cy) };

        let height = if swapped { b.width() } else { b.height() };
        let rotated = box_l != box_w && height == box_l;

        Self { x, y, rotated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_and_shift() {
        let mut b = BoxRect::new(3, 4, 1, 2);
        b.fix();
        assert_eq!(b, BoxRect::new(1, 2, 3, 4));

        b.shift_x(10);
        b.shift_y(20);
        assert_eq!(b, BoxRect::new(11, 22, 13, 24));
        assert_eq!(b.width(), 2);
        assert_eq!(b.height(), 2);
    }

    #[test]
    fn test_overlap() {
        let a = BoxRect::new(0, 0, 2, 1);
        let b = BoxRect::new(2, 0, 4, 1);
        let c = BoxRect::new(1, 0, 3, 1);
        assert!(!a.overlaps(&b), "touching edges do not overlap");
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_placement_centroid() {
        let b = BoxRect::new(0, 0, 2, 1);
        let p = Placement::from_box(&b, 2, 1, false);
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, 0.5);
        assert!(!p.rotated);

        let b = BoxRect::new(0, 0, 1, 2);
        let p = Placement::from_box(&b, 2, 1, false);
        assert_eq!(p.x, 0.5);
        assert_eq!(p.y, 1.0);
        assert!(p.rotated);
    }

    #[test]
    fn test_placement_swap() {
        // Caller passed (W, L): coordinates swap back, rotation follows
        // the caller's frame.
        let b = BoxRect::new(0, 0, 2, 1);
        let p = Placement::from_box(&b, 2, 1, true);
        assert_eq!(p.x, 0.5);
        assert_eq!(p.y, 1.0);
        assert!(p.rotated, "long side lies along the caller's y-axis");
    }

    #[test]
    fn test_square_never_rotated() {
        let b = BoxRect::new(0, 0, 2, 2);
        assert!(!Placement::from_box(&b, 2, 2, false).rotated);
        assert!(!Placement::from_box(&b, 2, 2, true).rotated);
    }
}

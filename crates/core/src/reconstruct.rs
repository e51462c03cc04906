//! Placement reconstruction.
//!
//! Two cooperating walks replay the decisions recorded by the solvers and
//! emit absolute box rectangles. The rectangle walk replays five-block cut
//! records; the L walk replays B1..B9 divisions, drawing each child in its
//! own standardly positioned frame and mapping the result back into the
//! parent frame with one of eight plane isometries before shifting it to
//! the child's position.
//!
//! Which isometry applies depends on how the child reached its canonical
//! form: a degenerate rectangle was at most transposed (identity or P8),
//! while a proper L was reflected into standard position by the
//! subdivision geometry and possibly transposed on top of that.

use crate::bounds::BoundsTables;
use crate::error::{Error, Result};
use crate::memo::{solution_decision, unpack_division, MemoStore};
use crate::piece::{degenerate_form, is_empty, is_rectangle, normalize_piece, Quad};
use crate::placement::BoxRect;
use crate::raster::RasterTable;
use crate::subdivision::{standard_position, Decision, Division};

/// Isometry family applied to a proper-L child of a subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    /// The child sits in the parent frame as drawn (P4, or P8 when its
    /// canonical form is transposed).
    Keep,
    /// Reflect across the x-axis of the child frame (P1/P5).
    ReflectY,
    /// Reflect across the y-axis of the child frame (P2/P6).
    ReflectX,
    /// Rotate the child frame 180 degrees (P3/P7).
    Rotate,
}

/// Replays stored decisions into a list of absolute box rectangles.
pub struct Reconstructor<'a> {
    raster: &'a RasterTable,
    bounds: &'a BoundsTables,
    memo: Option<&'a MemoStore>,
    box_l: i32,
    box_w: i32,
    boxes: Vec<BoxRect>,
}

impl<'a> Reconstructor<'a> {
    pub fn new(
        raster: &'a RasterTable,
        bounds: &'a BoundsTables,
        memo: Option<&'a MemoStore>,
        box_l: i32,
        box_w: i32,
        expected: usize,
    ) -> Self {
        Self {
            raster,
            bounds,
            memo,
            box_l,
            box_w,
            boxes: Vec::with_capacity(expected),
        }
    }

    /// Replays the five-block cut tree of the whole pallet.
    pub fn run_rectangle(mut self) -> Result<Vec<BoxRect>> {
        self.rect_walk(self.raster.l_n(), self.raster.w_n(), 0, 0);
        Ok(self.boxes)
    }

    /// Replays the L decision tree of the whole pallet.
    pub fn run_piece(mut self) -> Result<Vec<BoxRect>> {
        let q = [
            self.raster.l_n(),
            self.raster.w_n(),
            self.raster.l_n(),
            self.raster.w_n(),
        ];
        self.piece_walk(&q)?;
        Ok(self.boxes)
    }

    fn memo(&self) -> Result<&'a MemoStore> {
        self.memo
            .ok_or_else(|| Error::Internal("L walk started without a memoization store".into()))
    }

    /* ---------------- rectangle walk ---------------- */

    /// Homogeneous tiling in whichever orientation packs more boxes.
    fn homogeneous(&mut self, x: i32, y: i32, dx: i32, dy: i32) {
        let a = (x / self.box_l) * (y / self.box_w);
        let b = (x / self.box_w) * (y / self.box_l);
        let (step_x, step_y) = if a > b {
            (self.box_l, self.box_w)
        } else {
            (self.box_w, self.box_l)
        };

        let mut i = 0;
        while i + step_x <= x {
            let mut j = 0;
            while j + step_y <= y {
                self.boxes
                    .push(BoxRect::new(i + dx, j + dy, i + step_x + dx, j + step_y + dy));
                j += step_y;
            }
            i += step_x;
        }
    }

    /// The five partitions of a stored cut, sides snapped to raster points.
    fn subproblems(&self, l: i32, w: i32, ix: usize, iy: usize) -> [(i32, i32); 5] {
        let cut = &self.bounds.cuts[ix][iy];
        let n = |v| self.raster.normalize(v);
        [
            (cut.x1, n(w - cut.y1)),
            (n(l - cut.x1), n(w - cut.y2)),
            (n(cut.x2 - cut.x1), n(cut.y2 - cut.y1)),
            (cut.x2, cut.y1),
            (n(l - cut.x2), cut.y2),
        ]
    }

    /// Replays one rectangle at offset `(dx, dy)`.
    fn rect_walk(&mut self, l: i32, w: i32, dx: i32, dy: i32) {
        if l >= w {
            self.rect_normal(l, w, dx, dy);
        } else {
            self.rect_rotated(l, w, dx, dy);
        }
    }

    /// Rectangle stored in its own orientation.
    fn rect_normal(&mut self, l: i32, w: i32, dx: i32, dy: i32) {
        let ix = self.raster.index_x(l);
        let iy = self.raster.index_y(w);

        if self.bounds.cuts[ix][iy].homogeneous {
            self.homogeneous(l, w, dx, dy);
            return;
        }

        let p = self.subproblems(l, w, ix, iy);
        for (i, &(a, b)) in p.iter().enumerate() {
            if a == 0 || b == 0 || (a == l && b == w) || (a == w && b == l) {
                continue;
            }
            match i {
                0 => self.rect_walk(a, b, dx, dy + p[3].1),
                1 => self.rect_walk(a, b, dx + p[0].0, dy + p[4].1),
                2 => self.rect_walk(a, b, dx + p[0].0, dy + p[3].1),
                3 => self.rect_walk(a, b, dx, dy),
                _ => self.rect_walk(a, b, dx + p[3].0, dy),
            }
        }
    }

    /// Rectangle encountered transposed: its record lives under `(w, l)`,
    /// so children swap axes and mirror into the parent frame.
    fn rect_rotated(&mut self, l: i32, w: i32, dx: i32, dy: i32) {
        let (sl, sw) = (w, l);
        let ix = self.raster.index_x(sl);
        let iy = self.raster.index_y(sw);

        if self.bounds.cuts[ix][iy].homogeneous {
            self.homogeneous(l, w, dx, dy);
            return;
        }

        let p = self.subproblems(sl, sw, ix, iy);
        for (i, &(a, b)) in p.iter().enumerate() {
            // Child in the caller's (transposed) orientation.
            let (a, b) = (b, a);
            if a == 0 || b == 0 || (a == sl && b == sw) || (a == sw && b == sl) {
                continue;
            }
            match i {
                0 => self.rect_walk(a, b, dx + p[3].1, dy + p[1].0),
                1 => self.rect_walk(a, b, dx + p[4].1, dy),
                2 => self.rect_walk(a, b, dx + p[3].1, dy + p[4].0),
                3 => self.rect_walk(a, b, dx, dy + p[4].0),
                _ => self.rect_walk(a, b, dx, dy),
            }
        }
    }

    /* ---------------- L walk ---------------- */

    /// Replays one normalized piece in its local frame at the origin.
    fn piece_walk(&mut self, q: &Quad) -> Result<()> {
        if is_empty(q) {
            return Ok(());
        }

        let memo = self.memo()?;
        let index = memo.index(self.raster, q);
        let key = memo.key(self.raster, q);

        let decision = match memo.solution(index, key) {
            // Pieces only consulted through the bound tables fall back to
            // their seed packing.
            None => Decision::Homogeneous,
            Some(word) => solution_decision(word).ok_or_else(|| {
                Error::Internal(format!("corrupt solution word for piece {q:?}"))
            })?,
        };

        match decision {
            Decision::Homogeneous => {
                if is_rectangle(q) {
                    self.rect_walk(q[0], q[1], 0, 0);
                } else {
                    self.replay_guillotine(q);
                }
                Ok(())
            }
            decision => {
                let div = unpack_division(memo.division(index, key));
                self.draw_subdivision(decision, div, q)
            }
        }
    }

    /// Guillotine fallback for a proper L without a stored subdivision:
    /// re-derive the better cut from the rectangle tables and replay both
    /// halves through the five-block records.
    fn replay_guillotine(&mut self, q: &Quad) {
        let vertical = self.bounds.rect_lower(self.raster, q[2], q[1])
            + self.bounds.rect_lower(self.raster, q[0] - q[2], q[3]);
        let horizontal = self.bounds.rect_lower(self.raster, q[2], q[1] - q[3])
            + self.bounds.rect_lower(self.raster, q[0], q[3]);

        if vertical > horizontal {
            self.rect_walk(q[2], q[1], 0, 0);
            let start = self.boxes.len();
            self.rect_walk(self.raster.normalize(q[0] - q[2]), q[3], 0, 0);
            for b in &mut self.boxes[start..] {
                b.shift_x(q[2]);
            }
        } else {
            let start = self.boxes.len();
            self.rect_walk(q[2], self.raster.normalize(q[1] - q[3]), 0, 0);
            for b in &mut self.boxes[start..] {
                b.shift_y(q[3]);
            }
            self.rect_walk(q[0], q[3], 0, 0);
        }
    }

    /// Replays one stored subdivision: forms both children, draws each in
    /// its local frame, and maps them back with the isometry and shift the
    /// subdivision geometry dictates.
    fn draw_subdivision(&mut self, decision: Decision, div: Division, q: &Quad) -> Result<()> {
        let (q1, q2) = standard_position(decision, div, q, self.raster);
        let tmp1 = degenerate_form(&q1);
        let tmp2 = degenerate_form(&q2);

        let (d1, f1, d2, f2) = match decision {
            Decision::B1 => {
                let mut d1 = (0, div[1]);
                if div[0] == 0 {
                    d1.1 = q[3];
                }
                let mut d2 = (0, 0);
                if div[1] == 0 {
                    d2.0 = div[0];
                }
                (d1, Flavor::ReflectY, d2, Flavor::ReflectX)
            }
            Decision::B2 => {
                let mut d1 = (0, q[3]);
                if div[1] == q[1] {
                    d1.0 = div[0];
                } else if tmp1[0] == tmp1[2] {
                    d1.1 = div[1];
                }
                (d1, Flavor::Rotate, (0, 0), Flavor::Keep)
            }
            Decision::B3 => ((0, 0), Flavor::Keep, (div[0], div[1]), Flavor::Keep),
            Decision::B4 => {
                let mut d2 = (q[2], 0);
                if div[0] == q[0] {
                    d2.1 = div[1];
                } else if tmp2[0] == tmp2[2] {
                    d2.0 = div[0];
                }
                ((0, 0), Flavor::Keep, d2, Flavor::Rotate)
            }
            Decision::B5 => {
                let mut d1 = (0, 0);
                if div[0] == 0 {
                    d1.1 = div[1];
                }
                let mut d2 = (div[0], 0);
                if div[1] == 0 {
                    d2.0 = q[2];
                }
                (d1, Flavor::ReflectY, d2, Flavor::ReflectX)
            }
            Decision::B6 => {
                let mut d1 = (0, 0);
                if div[0] == 0 {
                    d1.1 = div[1];
                }
                let mut d2 = (div[0], 0);
                if div[1] == 0 {
                    d2.0 = div[2];
                }
                (d1, Flavor::ReflectY, d2, Flavor::ReflectX)
            }
            Decision::B7 => {
                let mut d1 = (0, div[1]);
                if div[0] == 0 {
                    d1.1 = div[2];
                }
                let mut d2 = (0, 0);
                if div[1] == 0 {
                    d2.0 = div[0];
                }
                (d1, Flavor::ReflectY, d2, Flavor::ReflectX)
            }
            Decision::B8 => {
                let mut d1 = (0, 0);
                if div[0] == 0 {
                    d1.1 = div[1];
                }
                (d1, Flavor::ReflectY, (div[0], 0), Flavor::Keep)
            }
            Decision::B9 => {
                let mut d1 = (0, div[1]);
                if div[0] == 0 {
                    d1.1 = q[3];
                }
                let mut d2 = (0, 0);
                if div[1] == 0 {
                    d2.0 = div[0];
                }
                (d1, Flavor::Keep, d2, Flavor::ReflectX)
            }
            Decision::Homogeneous => {
                return Err(Error::Internal(
                    "homogeneous decision reached the subdivision replay".into(),
                ))
            }
        };

        self.draw_child(q1, tmp1, d1, f1)?;
        self.draw_child(q2, tmp2, d2, f2)
    }

    /// Draws one child in its local frame, then maps it into the parent.
    fn draw_child(
        &mut self,
        mut child: Quad,
        tmp: Quad,
        delta: (i32, i32),
        flavor: Flavor,
    ) -> Result<()> {
        normalize_piece(&mut child, self.box_l, self.box_w);
        if is_empty(&child) {
            return Ok(());
        }

        let start = self.boxes.len();
        self.piece_walk(&child)?;
        let slice = &mut self.boxes[start..];

        // Geometric extent before canonicalization decides whether the
        // child was transposed on its way to standard position; a square
        // bounding box defers to the inner corner.
        let (width, height) = if tmp[0] != tmp[1] {
            (tmp[0], tmp[1])
        } else {
            (tmp[2], tmp[3])
        };
        let upright = width >= height;

        if tmp[0] == tmp[2] || flavor == Flavor::Keep {
            if upright {
                p4(slice, delta);
            } else {
                p8(slice, delta);
            }
        } else {
            match flavor {
                Flavor::ReflectY => {
                    if upright {
                        p1(slice, &child, delta);
                    } else {
                        p5(slice, &child, delta);
                    }
                }
                Flavor::ReflectX => {
                    if upright {
                        p2(slice, &child, delta);
                    } else {
                        p6(slice, &child, delta);
                    }
                }
                Flavor::Rotate => {
                    if upright {
                        p3(slice, &child, delta);
                    } else {
                        p7(slice, &child, delta);
                    }
                }
                Flavor::Keep => unreachable!(),
            }
        }
        Ok(())
    }
}

/* ---------------- plane isometries ---------------- */

fn shift(slice: &mut [BoxRect], delta: (i32, i32)) {
    for b in slice {
        b.shift_x(delta.0);
        b.shift_y(delta.1);
    }
}

/// P1: reflect across the x-axis of the child frame.
fn p1(slice: &mut [BoxRect], q: &Quad, delta: (i32, i32)) {
    for b in slice.iter_mut() {
        b.y0 = q[1] - b.y0;
        b.y1 = q[1] - b.y1;
        b.fix();
    }
    shift(slice, delta);
}

/// P2: reflect across the y-axis of the child frame.
fn p2(slice: &mut [BoxRect], q: &Quad, delta: (i32, i32)) {
    for b in slice.iter_mut() {
        b.x0 = q[0] - b.x0;
        b.x1 = q[0] - b.x1;
        b.fix();
    }
    shift(slice, delta);
}

/// P3: rotate the child frame 180 degrees.
fn p3(slice: &mut [BoxRect], q: &Quad, delta: (i32, i32)) {
    for b in slice.iter_mut() {
        b.x0 = q[0] - b.x0;
        b.x1 = q[0] - b.x1;
        b.y0 = q[1] - b.y0;
        b.y1 = q[1] - b.y1;
        b.fix();
    }
    shift(slice, delta);
}

/// P4: identity plus shift.
fn p4(slice: &mut [BoxRect], delta: (i32, i32)) {
    shift(slice, delta);
}

/// P5: transpose, then reflect across the new x-axis.
fn p5(slice: &mut [BoxRect], q: &Quad, delta: (i32, i32)) {
    for b in slice.iter_mut() {
        let (y0, y1) = (b.y0, b.y1);
        b.y0 = q[0] - b.x0;
        b.y1 = q[0] - b.x1;
        b.x0 = y0;
        b.x1 = y1;
        b.fix();
    }
    shift(slice, delta);
}

/// P6: transpose, then reflect across the new y-axis.
fn p6(slice: &mut [BoxRect], q: &Quad, delta: (i32, i32)) {
    for b in slice.iter_mut() {
        let (x0, x1) = (b.x0, b.x1);
        b.x0 = q[1] - b.y0;
        b.x1 = q[1] - b.y1;
        b.y0 = x0;
        b.y1 = x1;
        b.fix();
    }
    shift(slice, delta);
}

/// P7: transpose with both reflections (rotate 90 then 180).
fn p7(slice: &mut [BoxRect], q: &Quad, delta: (i32, i32)) {
    for b in slice.iter_mut() {
        let (tx0, tx1) = (q[0] - b.x0, q[0] - b.x1);
        b.x0 = q[1] - b.y0;
        b.x1 = q[1] - b.y1;
        b.y0 = tx0;
        b.y1 = tx1;
        b.fix();
    }
    shift(slice, delta);
}

/// P8: transpose.
fn p8(slice: &mut [BoxRect], delta: (i32, i32)) {
    for b in slice.iter_mut() {
        std::mem::swap(&mut b.x0, &mut b.y0);
        std::mem::swap(&mut b.x1, &mut b.y1);
    }
    shift(slice, delta);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isometries_preserve_shape() {
        let frame: Quad = [10, 6, 10, 6];
        let original = BoxRect::new(1, 2, 4, 3);

        for (name, f) in [
            ("p1", p1 as fn(&mut [BoxRect], &Quad, (i32, i32))),
            ("p2", p2),
            ("p3", p3),
        ] {
            let mut v = [original];
            f(&mut v, &frame, (0, 0));
            assert_eq!(v[0].width(), 3, "{name} must keep the width");
            assert_eq!(v[0].height(), 1, "{name} must keep the height");
            assert!(v[0].x0 >= 0 && v[0].x1 <= frame[0]);
            assert!(v[0].y0 >= 0 && v[0].y1 <= frame[1]);
        }

        for (name, f) in [
            ("p5", p5 as fn(&mut [BoxRect], &Quad, (i32, i32))),
            ("p6", p6),
            ("p7", p7),
        ] {
            let mut v = [original];
            f(&mut v, &frame, (0, 0));
            assert_eq!(v[0].width(), 1, "{name} transposes the box");
            assert_eq!(v[0].height(), 3, "{name} transposes the box");
        }
    }

    #[test]
    fn test_p3_is_p1_then_p2() {
        let frame: Quad = [10, 6, 10, 6];
        let mut a = [BoxRect::new(1, 2, 4, 3)];
        let mut b = a;
        p3(&mut a, &frame, (0, 0));
        p1(&mut b, &frame, (0, 0));
        p2(&mut b, &frame, (0, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_p8_transposes() {
        let mut v = [BoxRect::new(1, 2, 4, 3)];
        p8(&mut v, (0, 0));
        assert_eq!(v[0], BoxRect::new(2, 1, 3, 4));
    }

    #[test]
    fn test_p4_shifts_only() {
        let mut v = [BoxRect::new(1, 2, 4, 3)];
        p4(&mut v, (5, 7));
        assert_eq!(v[0], BoxRect::new(6, 9, 9, 10));
    }
}

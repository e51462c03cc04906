//! Recursive L-block solver.
//!
//! Solves L-shaped pieces by trying the nine subdivisions B1..B9: each
//! candidate division point splits the piece in two smaller standardly
//! positioned pieces which are normalized, pruned against the area upper
//! bound, and solved recursively through the memoization store.
//!
//! Rectangles (degenerate Ls) are seeded from the five-block tables and
//! can only be improved by B6/B7, the two subdivisions that cut a
//! rectangle into two Ls along an inner step. Proper L-pieces are seeded
//! by the better of the two guillotine cuts, recorded as a trivial B1
//! division so the reconstruction walk can replay it uniformly.

use crate::bounds::{l_area_bound, BoundsTables};
use crate::memo::{
    pack_division, pack_solution, solution_count, MemoStore,
};
use crate::piece::{is_empty, is_rectangle, normalize_piece, Quad};
use crate::raster::RasterTable;
use crate::subdivision::{standard_position, Decision, Division};

/// L-block search over the memoization store.
pub struct LSolver<'a> {
    raster: &'a RasterTable,
    bounds: &'a mut BoundsTables,
    memo: &'a mut MemoStore,
    box_l: i32,
    box_w: i32,
}

impl<'a> LSolver<'a> {
    pub fn new(
        raster: &'a RasterTable,
        bounds: &'a mut BoundsTables,
        memo: &'a mut MemoStore,
        box_l: i32,
        box_w: i32,
    ) -> Self {
        Self {
            raster,
            bounds,
            memo,
            box_l,
            box_w,
        }
    }

    /// Solves the whole pallet as a degenerate L and returns the count.
    pub fn solve_root(&mut self) -> u32 {
        let l_n = self.raster.l_n();
        let w_n = self.raster.w_n();
        let q = [l_n, w_n, l_n, w_n];
        let count = solution_count(self.solve_piece(&q));
        log::debug!("L-block phase: {} boxes", count);
        count
    }

    /// Solves one normalized piece, returning the packed solution word.
    pub fn solve_piece(&mut self, q: &Quad) -> u32 {
        let index = self.memo.index(self.raster, q);
        let key = self.memo.key(self.raster, q);
        if let Some(word) = self.memo.solution(index, key) {
            return word;
        }

        if is_rectangle(q) {
            self.solve_rectangle(index, key, q)
        } else {
            self.solve_proper_l(index, key, q)
        }
    }

    /// Proper L: guillotine seed, then the seven L subdivisions swept over
    /// their three constraint boxes.
    fn solve_proper_l(&mut self, index: usize, key: u64, q: &Quad) -> u32 {
        let upper = l_area_bound(*q, self.box_l, self.box_w);

        let (seed, horizontal) = self.guillotine_seed(q);
        let mut word = pack_solution(seed, Decision::B1);
        let div = if horizontal { [0, q[3], 0] } else { [q[2], 0, 0] };
        self.memo.store_division(index, key, pack_division(div));
        self.memo.store_solution(index, key, word);

        if solution_count(word) != upper {
            let xs = self.raster.raster_points(q[0]);
            let ys = self.raster.raster_points(q[1]);
            let start_x = xs.iter().position(|&p| p >= q[2]).unwrap_or(xs.len());
            let start_y = ys.iter().position(|&p| p >= q[3]).unwrap_or(ys.len());
            let end_x = *xs.last().expect("raster sets are never empty");
            let end_y = *ys.last().expect("raster sets are never empty");

            // 0 <= x' <= x and 0 <= y' <= y.
            let constraint = [0, q[2], 0, q[3]];
            for decision in [Decision::B1, Decision::B3, Decision::B5] {
                word = self.sweep(index, key, q, constraint, decision, &xs, 0, &ys, 0, word, upper);
                if solution_count(word) == upper {
                    return word;
                }
            }

            // 0 <= x' <= x and y <= y' <= Y.
            let constraint = [0, q[2], q[3], end_y];
            for decision in [Decision::B2, Decision::B8] {
                word = self.sweep(
                    index, key, q, constraint, decision, &xs, 0, &ys, start_y, word, upper,
                );
                if solution_count(word) == upper {
                    return word;
                }
            }

            // x <= x' <= X and 0 <= y' <= y.
            let constraint = [q[2], end_x, 0, q[3]];
            for decision in [Decision::B4, Decision::B9] {
                word = self.sweep(
                    index, key, q, constraint, decision, &xs, start_x, &ys, 0, word, upper,
                );
                if solution_count(word) == upper {
                    return word;
                }
            }
        }
        word
    }

    /// Degenerate L: seed from the rectangle tables, then try B6 and B7.
    fn solve_rectangle(&mut self, index: usize, key: u64, q: &Quad) -> u32 {
        let ix = self.raster.index_x(q[0]);
        let iy = self.raster.index_y(q[1]);
        let upper = self.bounds.upper[ix][iy];

        let mut word = pack_solution(self.bounds.lower[ix][iy], Decision::Homogeneous);
        self.memo.store_solution(index, key, word);

        if solution_count(word) != upper {
            let xs = self.raster.raster_points(q[0]);
            let ys = self.raster.raster_points(q[1]);

            word = self.sweep_b6(index, key, q, &xs, &ys, word, upper);
            if solution_count(word) == upper {
                self.bounds.lower[ix][iy] = solution_count(word);
                return word;
            }

            word = self.sweep_b7(index, key, q, &xs, &ys, word, upper);
            self.bounds.lower[ix][iy] = solution_count(word);
        }
        word
    }

    /// Sweeps one subdivision over its constraint box.
    #[allow(clippy::too_many_arguments)]
    fn sweep(
        &mut self,
        index: usize,
        key: u64,
        q: &Quad,
        constraint: [i32; 4],
        decision: Decision,
        xs: &[i32],
        start_x: usize,
        ys: &[i32],
        start_y: usize,
        mut word: u32,
        upper: u32,
    ) -> u32 {
        for &xp in &xs[start_x..] {
            if xp > constraint[1] {
                break;
            }
            for &yp in &ys[start_y..] {
                if yp > constraint[3] {
                    break;
                }
                let div = [xp, yp, 0];
                if let Some(improved) = self.try_division(index, key, q, decision, div, word, upper)
                {
                    word = improved;
                    if solution_count(word) == upper {
                        return word;
                    }
                }
            }
        }
        word
    }

    /// B6 sweep: division points `(x', y', x'')` with `x' <= x''`.
    #[allow(clippy::too_many_arguments)]
    fn sweep_b6(
        &mut self,
        index: usize,
        key: u64,
        q: &Quad,
        xs: &[i32],
        ys: &[i32],
        mut word: u32,
        upper: u32,
    ) -> u32 {
        for (i, &xp) in xs.iter().enumerate() {
            for &xpp in &xs[i..] {
                if xp == 0 && xpp == 0 {
                    continue;
                }
                for &yp in ys {
                    let div = [xp, yp, xpp];
                    if let Some(improved) =
                        self.try_division(index, key, q, Decision::B6, div, word, upper)
                    {
                        word = improved;
                        if solution_count(word) == upper {
                            return word;
                        }
                    }
                }
            }
        }
        word
    }

    /// B7 sweep: division points `(x', y', y'')` with `y' <= y''`.
    #[allow(clippy::too_many_arguments)]
    fn sweep_b7(
        &mut self,
        index: usize,
        key: u64,
        q: &Quad,
        xs: &[i32],
        ys: &[i32],
        mut word: u32,
        upper: u32,
    ) -> u32 {
        for (j, &yp) in ys.iter().enumerate() {
            for &ypp in &ys[j..] {
                if yp == 0 && ypp == 0 {
                    continue;
                }
                for &xp in xs {
                    let div = [xp, yp, ypp];
                    if let Some(improved) =
                        self.try_division(index, key, q, Decision::B7, div, word, upper)
                    {
                        word = improved;
                        if solution_count(word) == upper {
                            return word;
                        }
                    }
                }
            }
        }
        word
    }

    /// Forms, prunes and recursively solves the two children of one
    /// division. Returns the new solution word when it improves.
    #[allow(clippy::too_many_arguments)]
    fn try_division(
        &mut self,
        index: usize,
        key: u64,
        q: &Quad,
        decision: Decision,
        div: Division,
        word: u32,
        upper: u32,
    ) -> Option<u32> {
        let (mut q1, mut q2) = standard_position(decision, div, q, self.raster);
        normalize_piece(&mut q1, self.box_l, self.box_w);
        normalize_piece(&mut q2, self.box_l, self.box_w);
        if is_empty(&q1) || is_empty(&q2) {
            return None;
        }

        let ub1 = l_area_bound(q1, self.box_l, self.box_w);
        let ub2 = l_area_bound(q2, self.box_l, self.box_w);
        if ub1 + ub2 <= solution_count(word) {
            // This division cannot beat the incumbent.
            return None;
        }

        let c1 = solution_count(self.solve_piece(&q1));
        let c2 = solution_count(self.solve_piece(&q2));
        let total = c1 + c2;
        if total <= solution_count(word) {
            return None;
        }

        debug_assert!(total <= upper);
        let improved = pack_solution(total, decision);
        self.memo.store_solution(index, key, improved);
        self.memo.store_division(index, key, pack_division(div));
        Some(improved)
    }

    /// The better of the two guillotine cuts of a proper L, with both
    /// sub-rectangles solved through the store so the reconstruction walk
    /// sees exactly the counts this seed was built from.
    ///
    /// Returns `(count, horizontal)`.
    fn guillotine_seed(&mut self, q: &Quad) -> (u32, bool) {
        let horizontal = self.rectangle_count(q[2], self.raster.normalize(q[1] - q[3]))
            + self.rectangle_count(q[0], q[3]);
        let vertical = self.rectangle_count(q[2], q[1])
            + self.rectangle_count(self.raster.normalize(q[0] - q[2]), q[3]);

        if horizontal > vertical {
            (horizontal, true)
        } else {
            (vertical, false)
        }
    }

    /// Solved count of a plain rectangle piece.
    fn rectangle_count(&mut self, x: i32, y: i32) -> u32 {
        let mut q = [x, y, x, y];
        normalize_piece(&mut q, self.box_l, self.box_w);
        if is_empty(&q) {
            return 0;
        }
        solution_count(self.solve_piece(&q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::five_block::FiveBlock;
    use crate::memo::solution_decision;

    struct Fixture {
        raster: RasterTable,
        bounds: BoundsTables,
        memo: MemoStore,
        bd: u32,
    }

    fn fixture(pallet_l: i32, pallet_w: i32, box_l: i32, box_w: i32) -> Fixture {
        let raster = RasterTable::new(pallet_l, pallet_w, box_l, box_w);
        let mut bounds = BoundsTables::new(&raster, box_l, box_w, i32::MAX);
        let bd = FiveBlock::new(&raster, &mut bounds, i32::MAX).solve();
        let memo = MemoStore::with_budget(raster.nx(), raster.ny(), usize::MAX).unwrap();
        Fixture {
            raster,
            bounds,
            memo,
            bd,
        }
    }

    #[test]
    fn test_root_rectangle_inherits_five_block_solution() {
        let mut f = fixture(10, 10, 3, 2);
        assert_eq!(f.bd, 16);
        let mut solver = LSolver::new(&f.raster, &mut f.bounds, &mut f.memo, 3, 2);
        assert_eq!(solver.solve_root(), 16);
    }

    #[test]
    fn test_l_phase_never_below_five_block() {
        for (pl, pw, bl, bw) in [(6, 4, 2, 1), (5, 5, 2, 1), (7, 5, 3, 2), (11, 9, 4, 3)] {
            let mut f = fixture(pl, pw, bl, bw);
            let mut solver = LSolver::new(&f.raster, &mut f.bounds, &mut f.memo, bl, bw);
            let count = solver.solve_root();
            assert!(count >= f.bd, "L phase lost boxes on {pl}x{pw}/{bl}x{bw}");
        }
    }

    #[test]
    fn test_proper_l_guillotine_certificate() {
        // 10x10 minus a 4x4 corner, boxes 3x2: both guillotine cuts reach
        // the area bound of 14, so the seed certifies the piece.
        let mut f = fixture(10, 10, 3, 2);
        let mut solver = LSolver::new(&f.raster, &mut f.bounds, &mut f.memo, 3, 2);
        let word = solver.solve_piece(&[10, 10, 6, 6]);
        assert_eq!(solution_count(word), 14);
        assert_eq!(solution_decision(word), Some(Decision::B1));
    }

    #[test]
    fn test_piece_too_small_for_one_box() {
        let mut f = fixture(6, 4, 2, 1);
        let mut solver = LSolver::new(&f.raster, &mut f.bounds, &mut f.memo, 2, 1);
        // A 1x1 rectangle holds nothing.
        assert_eq!(solver.rectangle_count(1, 1), 0);
    }
}

//! Recursive five-block solver for rectangular subproblems.
//!
//! Rectangles are cut by two coordinates per axis into up to five
//! partitions (first-order non-guillotine cuts) or by a single coordinate
//! into two (guillotine cuts). Each candidate cut is valued by the bounds
//! tables; a cut is explored only while the sum of its partitions' upper
//! bounds can still beat the incumbent, and partitions are re-solved
//! recursively unless they are already settled at a shallower depth.
//!
//! The sweep order below is part of the contract with the reconstruction
//! walk: the recorded cut of each rectangle is the first one that reached
//! its best count.

use crate::bounds::{BoundsTables, CutPoint};
use crate::raster::RasterTable;

/// Five-block search over the rectangle subproblem tables.
pub struct FiveBlock<'a> {
    raster: &'a RasterTable,
    bounds: &'a mut BoundsTables,
    /// Maximum recursion depth; partitions at this depth keep their best
    /// known bound instead of being searched.
    depth_limit: i32,
}

impl<'a> FiveBlock<'a> {
    pub fn new(raster: &'a RasterTable, bounds: &'a mut BoundsTables, depth_limit: i32) -> Self {
        Self {
            raster,
            bounds,
            depth_limit,
        }
    }

    /// Solves the whole pallet and records the result in the tables.
    pub fn solve(&mut self) -> u32 {
        let l = self.raster.l_n();
        let w = self.raster.w_n();
        let z = self.search(l, w, 1);
        let ix = self.raster.index_x(l);
        let iy = self.raster.index_y(w);
        self.bounds.lower[ix][iy] = z;
        log::debug!("five-block phase: {} boxes (upper bound {})", z, self.bounds.upper[ix][iy]);
        z
    }

    /// Searches one rectangle at the given depth.
    fn search(&mut self, l: i32, w: i32, depth: i32) -> u32 {
        let (l, w) = if w > l { (w, l) } else { (l, w) };
        let ix = self.raster.index_x(l);
        let iy = self.raster.index_y(w);

        let mut z_lb = self.bounds.lower[ix][iy];
        let z_ub = self.bounds.local_upper(ix, iy);

        if z_lb == 0 || z_lb == z_ub {
            // No box fits, or the bounds already meet: settled.
            self.bounds.solution_depth[ix][iy] = -1;
            self.bounds.reached_limit[ix][iy] = false;
            return z_lb;
        }

        let xs = self.raster.raster_points(l);
        let ys = self.raster.raster_points(w);
        self.bounds.reached_limit[ix][iy] = false;

        // First order non-guillotine cuts:
        //   0 < x1 <= L/2, x1 < x2, x1 + x2 <= L, 0 < y1 < y2 < W,
        //   and y1 + y2 <= W whenever x1 + x2 = L.
        //
        //      L1    L2
        //     -------------
        //    |    |   2    |
        //    | 1  |--------|
        //    |  | 3 |      |
        //    |------|  5   |
        //    |   4  |      |
        //     -------------
        for i1 in 1..xs.len() {
            let x1 = xs[i1];
            if x1 > l / 2 {
                break;
            }
            for i2 in (i1 + 1)..xs.len() {
                let x2 = xs[i2];
                if x1 + x2 > l {
                    break;
                }
                for j1 in 1..ys.len() {
                    let y1 = ys[j1];
                    if y1 >= w {
                        break;
                    }
                    for j2 in (j1 + 1)..ys.len() {
                        let y2 = ys[j2];
                        if y2 >= w {
                            break;
                        }
                        if x1 + x2 == l && y1 + y2 > w {
                            break;
                        }

                        let mut parts = [
                            (x1, w - y1),
                            (l - x1, w - y2),
                            (x2 - x1, y2 - y1),
                            (x2, y1),
                            (l - x2, y2),
                        ];
                        if self.try_cut(l, w, depth, &mut parts, &mut z_lb, z_ub, x1, x2, y1, y2)
                        {
                            return z_lb;
                        }
                    }
                }
            }
        }

        // Vertical guillotine cuts: 0 < x1 = x2 <= L/2, y1 = y2 = 0.
        for i1 in 1..xs.len() {
            let x1 = xs[i1];
            if x1 > l / 2 {
                break;
            }
            let mut parts = [(x1, w), (l - x1, w)];
            if self.try_cut(l, w, depth, &mut parts, &mut z_lb, z_ub, x1, x1, 0, 0) {
                return z_lb;
            }
        }

        // Horizontal guillotine cuts: 0 < y1 = y2 <= W/2, x1 = x2 = 0.
        for j1 in 1..ys.len() {
            let y1 = ys[j1];
            if y1 > w / 2 {
                break;
            }
            let mut parts = [(l, w - y1), (l, y1)];
            if self.try_cut(l, w, depth, &mut parts, &mut z_lb, z_ub, 0, 0, y1, y1) {
                return z_lb;
            }
        }

        z_lb
    }

    /// Values one candidate cut, recursing into partitions while the sum of
    /// their bounds can still improve the incumbent. Returns true when the
    /// rectangle reached its optimality certificate.
    #[allow(clippy::too_many_arguments)]
    fn try_cut(
        &mut self,
        l: i32,
        w: i32,
        depth: i32,
        parts: &mut [(i32, i32)],
        z_lb: &mut u32,
        z_ub: u32,
        x1: i32,
        x2: i32,
        y1: i32,
        y2: i32,
    ) -> bool {
        let pix = self.raster.index_x(l);
        let piy = self.raster.index_y(w);

        // Snap partitions to raster points, longest side first.
        let mut idx = [(0usize, 0usize); 5];
        for (k, part) in parts.iter_mut().enumerate() {
            let mut a = self.raster.normalize(part.0);
            let mut b = self.raster.normalize(part.1);
            if a < b {
                std::mem::swap(&mut a, &mut b);
            }
            *part = (a, b);
            idx[k] = (self.raster.index_x(a), self.raster.index_y(b));
        }

        if depth < self.depth_limit {
            let mut part_lb = [0u32; 5];
            let mut part_ub = [0u32; 5];
            let mut s_lb = 0;
            let mut s_ub = 0;
            for k in 0..parts.len() {
                let (kx, ky) = idx[k];
                part_lb[k] = self.bounds.lower[kx][ky];
                part_ub[k] = self.bounds.local_upper(kx, ky);
                s_lb += part_lb[k];
                s_ub += part_ub[k];
            }

            if *z_lb >= s_ub {
                // Already as good as anything this cut can yield.
                return false;
            }

            for k in 0..parts.len() {
                let (a, b) = parts[k];
                let (kx, ky) = idx[k];

                let z = if self.bounds.solution_depth[kx][ky] > depth {
                    // First visit, or a strictly shallower revisit.
                    let z = self.search(a, b, depth + 1);
                    self.bounds.lower[kx][ky] = z;
                    self.bounds.solution_depth[kx][ky] = if self.bounds.reached_limit[kx][ky] {
                        depth
                    } else {
                        -1
                    };
                    z
                } else {
                    self.bounds.lower[kx][ky]
                };

                if self.bounds.reached_limit[kx][ky] {
                    self.bounds.reached_limit[pix][piy] = true;
                }

                s_lb = s_lb - part_lb[k] + z;
                s_ub = s_ub - part_ub[k] + z;

                if *z_lb >= s_ub {
                    // The cut can no longer beat the incumbent.
                    return false;
                } else if s_lb > *z_lb {
                    *z_lb = s_lb;
                    self.store_cut(pix, piy, x1, x2, y1, y2);
                    if *z_lb == z_ub {
                        self.bounds.solution_depth[pix][piy] = -1;
                        self.bounds.reached_limit[pix][piy] = false;
                        return true;
                    }
                }
            }
        } else {
            // Depth limit: each partition keeps its best known bound and
            // the result of this rectangle becomes provisional.
            self.bounds.reached_limit[pix][piy] = true;

            let s_lb: u32 = idx
                .iter()
                .take(parts.len())
                .map(|&(kx, ky)| self.bounds.lower[kx][ky])
                .sum();

            if s_lb > *z_lb {
                *z_lb = s_lb;
                self.store_cut(pix, piy, x1, x2, y1, y2);
                if *z_lb == z_ub {
                    self.bounds.solution_depth[pix][piy] = -1;
                    self.bounds.reached_limit[pix][piy] = false;
                    return true;
                }
            }
        }
        false
    }

    fn store_cut(&mut self, pix: usize, piy: usize, x1: i32, x2: i32, y1: i32, y2: i32) {
        self.bounds.cuts[pix][piy] = CutPoint {
            x1,
            x2,
            y1,
            y2,
            homogeneous: false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsTables;

    fn run(pallet_l: i32, pallet_w: i32, box_l: i32, box_w: i32, depth_limit: i32) -> u32 {
        let raster = RasterTable::new(pallet_l, pallet_w, box_l, box_w);
        let mut bounds = BoundsTables::new(&raster, box_l, box_w, depth_limit);
        FiveBlock::new(&raster, &mut bounds, depth_limit).solve()
    }

    #[test]
    fn test_perfect_fill() {
        assert_eq!(run(6, 4, 2, 1, i32::MAX), 12);
    }

    #[test]
    fn test_pinwheel() {
        // 5x5 with 2x1 boxes: homogeneous reaches 10, the pinwheel 12.
        assert_eq!(run(5, 5, 2, 1, i32::MAX), 12);
    }

    #[test]
    fn test_known_instances() {
        assert_eq!(run(7, 5, 3, 2, i32::MAX), 5);
        assert_eq!(run(10, 10, 3, 2, i32::MAX), 16);
    }

    #[test]
    fn test_nothing_fits() {
        assert_eq!(run(1, 1, 2, 2, i32::MAX), 0);
    }

    #[test]
    fn test_depth_limit_is_sound() {
        // A depth-limited search never beats the unbounded one and never
        // drops below the homogeneous seed.
        for limit in [1, 2, 3] {
            let shallow = run(7, 5, 3, 2, limit);
            assert!((4..=5).contains(&shallow));
            let shallow = run(10, 10, 3, 2, limit);
            assert!((15..=16).contains(&shallow));
        }
    }
}

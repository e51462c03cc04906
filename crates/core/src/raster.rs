//! Raster point sets and coordinate normalization.
//!
//! Every meaningful cut coordinate in the pallet is an integer conic
//! combination of the box sides, `x = r*l + s*w`. This module builds the
//! conic combination set, the derived raster point sets X' and Y', and the
//! `normalize` table that snaps an arbitrary integer coordinate down to the
//! nearest raster point:
//!
//! ```text
//! X' = { <L - x>_X | x in X } U {0}
//! <v>_S = max { s in S | s <= v }
//! ```

/// Raster point sets and the normalization table for one solve call.
///
/// The merged point set covers both axes: positions in it index every
/// per-rectangle table in the solver. All coordinates are snapped through
/// [`RasterTable::normalize`] before they are stored or looked up.
#[derive(Debug)]
pub struct RasterTable {
    /// Sorted conic combinations of (l, w) up to the pallet length,
    /// with the pallet length itself always included.
    conic: Vec<i32>,
    /// `norm[v]` = largest conic combination <= v, for v in [0..L].
    norm: Vec<i32>,
    /// Merged raster point set X' U Y', ascending, ending at `l_n`.
    points: Vec<i32>,
    /// `index[v]` = position of the largest raster point <= v.
    index: Vec<usize>,
    /// Number of raster points <= `w_n`.
    ny: usize,
    /// Normalized pallet length.
    l_n: i32,
    /// Normalized pallet width.
    w_n: i32,
}

impl RasterTable {
    /// Builds the raster structures for a pallet `(pallet_l, pallet_w)`
    /// and boxes `(box_l, box_w)`. Assumes `pallet_l >= pallet_w`.
    pub fn new(pallet_l: i32, pallet_w: i32, box_l: i32, box_w: i32) -> Self {
        debug_assert!(pallet_l >= pallet_w);

        let conic = conic_combinations(pallet_l, box_l, box_w);

        // normalize[v] by a single left-to-right sweep over the conic set.
        let mut norm = vec![0i32; pallet_l as usize + 1];
        let mut i = 0;
        for (v, slot) in norm.iter_mut().enumerate() {
            while i < conic.len() && conic[i] <= v as i32 {
                i += 1;
            }
            *slot = conic[i - 1];
        }

        let l_n = norm[pallet_l as usize];
        let w_n = norm[pallet_w as usize];

        // Merge the raster sets of both axes into one indexable set.
        let raster_x = raster_set(pallet_l, &conic, &norm);
        let raster_y = raster_set(pallet_w, &conic, &norm);
        let mut points: Vec<i32> = raster_x
            .iter()
            .chain(raster_y.iter())
            .copied()
            .filter(|&p| p <= l_n)
            .collect();
        points.sort_unstable();
        points.dedup();
        if *points.last().expect("raster set contains 0") < l_n {
            points.push(l_n);
        }

        let mut index = vec![0usize; l_n as usize + 1];
        let mut pos = 0;
        for (v, slot) in index.iter_mut().enumerate() {
            if pos + 1 < points.len() && points[pos + 1] <= v as i32 {
                pos += 1;
            }
            *slot = pos;
        }

        let ny = points.iter().take_while(|&&p| p <= w_n).count();

        log::debug!(
            "raster table: {} conic points, {} raster points ({} along the width)",
            conic.len(),
            points.len(),
            ny
        );

        Self {
            conic,
            norm,
            points,
            index,
            ny,
            l_n,
            w_n,
        }
    }

    /// Snaps an integer coordinate down to the nearest raster point.
    #[inline]
    pub fn normalize(&self, v: i32) -> i32 {
        self.norm[v as usize]
    }

    /// Normalized pallet length.
    #[inline]
    pub fn l_n(&self) -> i32 {
        self.l_n
    }

    /// Normalized pallet width.
    #[inline]
    pub fn w_n(&self) -> i32 {
        self.w_n
    }

    /// Position of a normalized x-coordinate in the merged point set.
    #[inline]
    pub fn index_x(&self, v: i32) -> usize {
        self.index[v as usize]
    }

    /// Position of a normalized y-coordinate in the merged point set.
    #[inline]
    pub fn index_y(&self, v: i32) -> usize {
        debug_assert!(v <= self.w_n);
        self.index[v as usize]
    }

    /// Number of raster points along the length.
    #[inline]
    pub fn nx(&self) -> usize {
        self.points.len()
    }

    /// Number of raster points along the width.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// The raster point at position `i`.
    #[inline]
    pub fn point(&self, i: usize) -> i32 {
        self.points[i]
    }

    /// Raster point set for a sub-rectangle side of length `dim`,
    /// ascending, starting at 0.
    pub fn raster_points(&self, dim: i32) -> Vec<i32> {
        raster_set(dim, &self.conic, &self.norm)
    }
}

/// Constructs the set X of integer conic combinations of `l` and `w`:
/// `X = { x | x = r*l + s*w, x <= limit, r,s >= 0 }`, with `limit` itself
/// appended when it is not a combination.
fn conic_combinations(limit: i32, l: i32, w: i32) -> Vec<i32> {
    let n = limit as usize;
    let mut c = vec![0i32; n + 1];

    for side in [l, w] {
        let s = side as usize;
        for i in s..=n {
            if c[i] < c[i - s] + side {
                c[i] = c[i - s] + side;
            }
        }
    }

    let mut set = vec![0i32];
    for (i, &reach) in c.iter().enumerate().skip(1) {
        if reach == i as i32 {
            set.push(i as i32);
        }
    }
    if *set.last().unwrap() != limit {
        set.push(limit);
    }
    set
}

/// Derives the raster point set `{ <dim - x> | x in X, x <= dim } U {0}`.
fn raster_set(dim: i32, conic: &[i32], norm: &[i32]) -> Vec<i32> {
    let mut set = Vec::with_capacity(conic.len() + 1);
    for &c in conic.iter().rev() {
        if c > dim {
            continue;
        }
        let p = norm[(dim - c) as usize];
        if set.last() != Some(&p) {
            set.push(p);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conic_combinations() {
        // Combinations of 3 and 2 reach every integer except 1.
        let set = conic_combinations(10, 3, 2);
        assert_eq!(set, vec![0, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        // 4 and 3 leave gaps below their Frobenius number.
        let set = conic_combinations(11, 4, 3);
        assert_eq!(set, vec![0, 3, 4, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_conic_combinations_force_limit() {
        // 10 is not a combination of 3 and 3 but is appended.
        let set = conic_combinations(10, 3, 3);
        assert_eq!(set, vec![0, 3, 6, 9, 10]);
    }

    #[test]
    fn test_normalize_monotone_idempotent() {
        let raster = RasterTable::new(11, 9, 4, 3);
        let mut prev = 0;
        for v in 0..=11 {
            let n = raster.normalize(v);
            assert!(n <= v);
            assert!(n >= prev, "normalize must be nondecreasing");
            assert_eq!(raster.normalize(n), n, "normalize must be idempotent");
            prev = n;
        }
    }

    #[test]
    fn test_raster_set_derivation() {
        let raster = RasterTable::new(11, 9, 4, 3);
        // X' = { <11 - x> | x in X } U {0} for X = conic(11, 4, 3).
        let xs = raster.raster_points(11);
        assert_eq!(xs, vec![0, 3, 4, 7, 8, 11]);
        assert_eq!(xs[0], 0);
        assert!(xs.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn test_merged_index() {
        let raster = RasterTable::new(10, 10, 3, 2);
        assert_eq!(raster.l_n(), 10);
        assert_eq!(raster.w_n(), 10);
        // Dense conic set: every point from 2 on is a raster point.
        assert_eq!(raster.nx(), raster.ny());
        for i in 0..raster.nx() {
            assert_eq!(raster.index_x(raster.point(i)), i);
        }
        // Indices carry forward between raster points.
        assert_eq!(raster.index_x(1), raster.index_x(0));
    }
}

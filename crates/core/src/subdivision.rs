//! The nine L-subdivisions B1..B9.
//!
//! Each subdivision splits a piece in two smaller standardly positioned
//! pieces, parameterized by a division point drawn from the raster points
//! of the parent's bounding rectangle. B1..B5, B8 and B9 split a proper L;
//! B6 and B7 split a rectangle along an inner step. Side lengths of the
//! children are snapped through the raster `normalize` table.
//!
//! The formulas here and the shift rules in the reconstruction walk are
//! two halves of the same contract: a child produced by one must be placed
//! back by the other.

use crate::piece::Quad;
use crate::raster::RasterTable;

/// The decision stored with each solved piece: either the seed solution or
/// the subdivision that produced the best split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Seed solution: homogeneous/five-block packing for rectangles,
    /// guillotine cut for proper L-pieces (stored as a trivial B1).
    Homogeneous,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    B7,
    B8,
    B9,
}

impl Decision {
    /// Encodes the decision for the packed solution word.
    #[inline]
    pub fn to_bits(self) -> u32 {
        match self {
            Decision::Homogeneous => 0,
            Decision::B1 => 1,
            Decision::B2 => 2,
            Decision::B3 => 3,
            Decision::B4 => 4,
            Decision::B5 => 5,
            Decision::B6 => 6,
            Decision::B7 => 7,
            Decision::B8 => 8,
            Decision::B9 => 9,
        }
    }

    /// Decodes a stored decision. Returns `None` for corrupt words.
    #[inline]
    pub fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => Decision::Homogeneous,
            1 => Decision::B1,
            2 => Decision::B2,
            3 => Decision::B3,
            4 => Decision::B4,
            5 => Decision::B5,
            6 => Decision::B6,
            7 => Decision::B7,
            8 => Decision::B8,
            9 => Decision::B9,
            _ => return None,
        })
    }
}

/// Division point: two coordinates for B1..B5, B8, B9; three for B6/B7.
pub type Division = [i32; 3];

/// Applies the subdivision for `decision` to the parent `q`, returning the
/// two standardly positioned children (not yet canonicalized).
pub fn standard_position(
    decision: Decision,
    div: Division,
    q: &Quad,
    raster: &RasterTable,
) -> (Quad, Quad) {
    match decision {
        Decision::B1 => b1(div, q, raster),
        Decision::B2 => b2(div, q, raster),
        Decision::B3 => b3(div, q, raster),
        Decision::B4 => b4(div, q, raster),
        Decision::B5 => b5(div, q, raster),
        Decision::B6 => b6(div, q, raster),
        Decision::B7 => b7(div, q, raster),
        Decision::B8 => b8(div, q, raster),
        Decision::B9 => b9(div, q, raster),
        Decision::Homogeneous => unreachable!("homogeneous seeds are not subdivided"),
    }
}

/// B1: cut at `(x', y')` with `x' <= x`, `y' <= y`.
///
/// ```text
/// +------------+                 q1 = (x, Y-y', x', Y-y)
/// |            |(x,y)            q2 = (X, y, X-x', y')
/// |      +-----o-----+
/// |  L1  |           |
/// |      |     L2    |
/// +------o           |
/// |   (x',y')        |
/// +------------------+
/// ```
pub fn b1(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [q[2], r.normalize(q[1] - i[1]), i[0], r.normalize(q[1] - q[3])];
    let q2 = [q[0], q[3], r.normalize(q[0] - i[0]), i[1]];
    (q1, q2)
}

/// B2: cut at `(x', y')` with `x' <= x`, `y <= y'`.
///
/// ```text
/// +------------+
/// |   (x',y')  |                 q1 = (x, Y-y, x-x', Y-y')
/// +------o     |                 q2 = (X, y', x', y)
/// |      | L1  |(x,y)
/// |      +-----o-----+
/// |  L2              |
/// +------------------+
/// ```
pub fn b2(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [
        q[2],
        r.normalize(q[1] - q[3]),
        r.normalize(q[2] - i[0]),
        r.normalize(q[1] - i[1]),
    ];
    let q2 = [q[0], i[1], i[0], q[3]];
    (q1, q2)
}

/// B3: nested corner cut at `(x', y')` with `x' <= x`, `y' <= y`.
///
/// ```text
/// +------+-----+
/// |      | L2  |(x,y)            q1 = (X, Y, x', y')
/// |      |     o-----+           q2 = (X-x', Y-y', x-x', y-y')
/// |  L1  o-----------+
/// |   (x',y')        |
/// +------------------+
/// ```
pub fn b3(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [q[0], q[1], i[0], i[1]];
    let q2 = [
        r.normalize(q[0] - i[0]),
        r.normalize(q[1] - i[1]),
        r.normalize(q[2] - i[0]),
        r.normalize(q[3] - i[1]),
    ];
    (q1, q2)
}

/// B4: cut at `(x', y')` with `x <= x'`, `y' <= y`.
///
/// ```text
/// +------+
/// |      |(x,y)                  q1 = (x', Y, x, y')
/// |      o-----------+           q2 = (X-x, y, X-x', y-y')
/// |  L1  |  (x',y')  |
/// |      +-----o     |
/// |            | L2  |
/// +------------+-----+
/// ```
pub fn b4(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [i[0], q[1], q[2], i[1]];
    let q2 = [
        r.normalize(q[0] - q[2]),
        q[3],
        r.normalize(q[0] - i[0]),
        r.normalize(q[3] - i[1]),
    ];
    (q1, q2)
}

/// B5: cut at `(x', y')` with `x' <= x`, `y' <= y`.
///
/// ```text
/// +------------+
/// |     L1     |(x,y)            q1 = (x, Y, x', Y-y')
/// |            o-----+           q2 = (X-x', y, X-x, y')
/// |   (x',y')  |     |
/// |      o-----+     |
/// |      |     L2    |
/// +------+-----------+
/// ```
pub fn b5(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [q[2], q[1], i[0], r.normalize(q[1] - i[1])];
    let q2 = [
        r.normalize(q[0] - i[0]),
        q[3],
        r.normalize(q[0] - q[2]),
        i[1],
    ];
    (q1, q2)
}

/// B6: splits a rectangle along the step `(x', y')..(x'', y')`.
///
/// ```text
/// +-------------+--------+
/// |   (x',y')   |   L2   |       q1 = (x'', Y, x', Y-y')
/// |      o------o        |       q2 = (X-x', Y, X-x'', y')
/// |      |  (x'',y')     |
/// |  L1  |               |
/// +------+---------------+
/// ```
pub fn b6(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [i[2], q[1], i[0], r.normalize(q[1] - i[1])];
    let q2 = [
        r.normalize(q[0] - i[0]),
        q[1],
        r.normalize(q[0] - i[2]),
        i[1],
    ];
    (q1, q2)
}

/// B7: splits a rectangle along the step `(x', y')..(x', y'')`.
///
/// ```text
/// +-------------+
/// |   (x',y'')  |
/// |      o------+                q1 = (X, Y-y', x', Y-y'')
/// |  L1  |  L2  |                q2 = (X, y'', X-x', y')
/// +------o      |
/// |   (x',y')   |
/// +-------------+
/// ```
pub fn b7(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [q[0], r.normalize(q[1] - i[1]), i[0], r.normalize(q[1] - i[2])];
    let q2 = [q[0], i[2], r.normalize(q[0] - i[0]), i[1]];
    (q1, q2)
}

/// B8: cut at `(x', y')` with `x' <= x`, `y <= y'`.
///
/// ```text
/// +------------+
/// |   (x',y')  |                 q1 = (x, Y, x', Y-y')
/// |      o-----+                 q2 = (X-x', y', x-x', y)
/// |  L1  |     |(x,y)
/// |      |     o-----+
/// |      |  L2       |
/// +------+-----------+
/// ```
pub fn b8(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [q[2], q[1], i[0], r.normalize(q[1] - i[1])];
    let q2 = [
        r.normalize(q[0] - i[0]),
        i[1],
        r.normalize(q[2] - i[0]),
        q[3],
    ];
    (q1, q2)
}

/// B9: cut at `(x', y')` with `x <= x'`, `y' <= y`.
///
/// ```text
/// +---------+
/// |         |(x,y)               q1 = (x', Y-y', x, y-y')
/// |   L1    o---+----+           q2 = (X, y, X-x', y')
/// |             |    |
/// +-------------o    |
/// |     L2   (x',y') |
/// +------------------+
/// ```
pub fn b9(i: Division, q: &Quad, r: &RasterTable) -> (Quad, Quad) {
    let q1 = [i[0], r.normalize(q[1] - i[1]), q[2], r.normalize(q[3] - i[1])];
    let q2 = [q[0], q[3], r.normalize(q[0] - i[0]), i[1]];
    (q1, q2)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raster table whose normalize is the identity on [0..12].
    fn dense_raster() -> RasterTable {
        RasterTable::new(12, 10, 2, 1)
    }

    #[test]
    fn test_decision_bits_roundtrip() {
        for bits in 0..=9 {
            let d = Decision::from_bits(bits).unwrap();
            assert_eq!(d.to_bits(), bits);
        }
        assert_eq!(Decision::from_bits(10), None);
        assert_eq!(Decision::from_bits(15), None);
    }

    #[test]
    fn test_b1_geometry() {
        let r = dense_raster();
        let q = [10, 8, 6, 4];
        let (q1, q2) = b1([3, 2, 0], &q, &r);
        assert_eq!(q1, [6, 6, 3, 4]);
        assert_eq!(q2, [10, 4, 7, 2]);
    }

    #[test]
    fn test_b3_geometry() {
        let r = dense_raster();
        let q = [10, 8, 6, 4];
        let (q1, q2) = b3([3, 2, 0], &q, &r);
        assert_eq!(q1, [10, 8, 3, 2]);
        assert_eq!(q2, [7, 6, 3, 2]);
    }

    #[test]
    fn test_b5_geometry() {
        let r = dense_raster();
        let q = [10, 8, 6, 4];
        let (q1, q2) = b5([3, 2, 0], &q, &r);
        assert_eq!(q1, [6, 8, 3, 6]);
        assert_eq!(q2, [7, 4, 4, 2]);
    }

    #[test]
    fn test_b6_b7_rectangle_splits() {
        let r = dense_raster();
        let rect = [10, 8, 10, 8];

        let (q1, q2) = b6([3, 2, 5], &rect, &r);
        assert_eq!(q1, [5, 8, 3, 6]);
        assert_eq!(q2, [7, 8, 5, 2]);

        let (q1, q2) = b7([3, 2, 5], &rect, &r);
        assert_eq!(q1, [10, 6, 3, 3]);
        assert_eq!(q2, [10, 5, 7, 2]);
    }

    #[test]
    fn test_children_cover_parent_area() {
        // For divisions on raster points with identity normalization the
        // two children partition the parent exactly.
        let r = dense_raster();
        let q = [10, 8, 6, 4];
        let area = |p: &Quad| p[0] * p[1] - (p[0] - p[2]) * (p[1] - p[3]);
        let parent = area(&q);

        for (d, div) in [
            (Decision::B1, [3, 2, 0]),
            (Decision::B2, [3, 6, 0]),
            (Decision::B3, [3, 2, 0]),
            (Decision::B4, [8, 2, 0]),
            (Decision::B5, [3, 2, 0]),
            (Decision::B8, [3, 6, 0]),
            (Decision::B9, [8, 2, 0]),
        ] {
            let (q1, q2) = standard_position(d, div, &q, &r);
            assert_eq!(
                area(&q1) + area(&q2),
                parent,
                "children of {d:?} must partition the parent"
            );
        }
    }
}

//! Memoization store for L-piece solutions.
//!
//! Solutions are indexed by the normalized quadruple. The store picks one
//! of four layouts at construction time, from a dense four-dimensional
//! array down to a one-dimensional array of hash maps, stepping down until
//! the estimated footprint fits the memory budget. Whatever components of
//! the quadruple are not consumed by the array index become the residual
//! hash map key.
//!
//! | Tier | Array index                  | Residual key        |
//! |------|------------------------------|---------------------|
//! | 4    | iX(q0), iY(q1), iX(q2), iY(q3) | —                 |
//! | 3    | iX(q0), iY(q1), iX(q2)       | q3                  |
//! | 2    | iX(q0), iY(q1)               | (iX(q2), iY(q3))    |
//! | 1    | iX(q0)                       | (iY(q1), iX(q2), iY(q3)) |
//!
//! The solution word packs the box count (27 bits) and the subdivision
//! decision (4 bits); the division word packs up to three 11-bit cut
//! coordinates.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::piece::Quad;
use crate::raster::RasterTable;
use crate::subdivision::{Decision, Division};

/// Mask of the box count in a packed solution word.
pub const COUNT_MASK: u32 = (1 << 27) - 1;

/// Shift of the decision bits in a packed solution word.
const DECISION_SHIFT: u32 = 27;

/// Mask of one cut coordinate in a packed division word.
const DIV_MASK: u64 = (1 << 11) - 1;

/// Packs a box count and a decision into one solution word.
#[inline]
pub fn pack_solution(count: u32, decision: Decision) -> u32 {
    debug_assert!(count <= COUNT_MASK);
    count | (decision.to_bits() << DECISION_SHIFT)
}

/// The box count of a packed solution word.
#[inline]
pub fn solution_count(word: u32) -> u32 {
    word & COUNT_MASK
}

/// The decision of a packed solution word.
#[inline]
pub fn solution_decision(word: u32) -> Option<Decision> {
    Decision::from_bits(word >> DECISION_SHIFT)
}

/// Packs up to three cut coordinates into one division word.
#[inline]
pub fn pack_division(div: Division) -> u64 {
    debug_assert!(div.iter().all(|&c| c >= 0 && (c as u64) <= DIV_MASK));
    (div[0] as u64) | ((div[1] as u64) << 11) | ((div[2] as u64) << 22)
}

/// Unpacks a division word into its three coordinates.
#[inline]
pub fn unpack_division(word: u64) -> Division {
    [
        (word & DIV_MASK) as i32,
        ((word >> 11) & DIV_MASK) as i32,
        ((word >> 22) & DIV_MASK) as i32,
    ]
}

/// Storage layout tier, ordered by index dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

/// Adaptive memoization store for L-piece solutions.
#[derive(Debug)]
pub enum MemoStore {
    /// Tier 4: flat dense arrays directly indexed by the full quadruple.
    Dense {
        solutions: Vec<u32>,
        divisions: Vec<u64>,
    },
    /// Tiers 1..3: an array of reduced dimension whose cells map the
    /// residual key to the stored words.
    Hashed {
        tier: Tier,
        solutions: Vec<HashMap<u64, u32>>,
        divisions: Vec<HashMap<u64, u64>>,
    },
}

/// Estimated bytes per entry of the dense layout (solution + division).
const DENSE_ENTRY_BYTES: usize = 4 + 8;

impl MemoStore {
    /// Builds the store for a raster grid of `nx` x `ny` points, choosing
    /// the highest tier whose estimated footprint fits `budget` bytes.
    ///
    /// Failing to fit even tier 1 is a fatal out-of-memory condition.
    pub fn with_budget(nx: usize, ny: usize, budget: usize) -> Result<Self> {
        let hashed_entry = 2 * std::mem::size_of::<HashMap<u64, u64>>();

        for tier in [Tier::Four, Tier::Three, Tier::Two, Tier::One] {
            let Some(len) = Self::array_len(tier, nx, ny) else {
                continue;
            };
            let footprint = match tier {
                Tier::Four => len.checked_mul(DENSE_ENTRY_BYTES),
                _ => len.checked_mul(hashed_entry),
            };
            let Some(footprint) = footprint else { continue };
            if footprint > budget {
                continue;
            }

            if tier < Tier::Four {
                log::warn!(
                    "memoization store downgraded to tier {} ({} cells, ~{} bytes)",
                    tier as u8,
                    len,
                    footprint
                );
            } else {
                log::debug!("memoization store: dense tier 4, {} entries", len);
            }

            return Ok(match tier {
                Tier::Four => MemoStore::Dense {
                    solutions: vec![u32::MAX; len],
                    divisions: vec![0; len],
                },
                tier => MemoStore::Hashed {
                    tier,
                    solutions: vec![HashMap::new(); len],
                    divisions: vec![HashMap::new(); len],
                },
            });
        }

        Err(Error::OutOfMemory(format!(
            "no memoization tier fits a {} byte budget for a {}x{} raster grid",
            budget, nx, ny
        )))
    }

    fn array_len(tier: Tier, nx: usize, ny: usize) -> Option<usize> {
        match tier {
            Tier::Four => nx.checked_mul(ny)?.checked_mul(nx)?.checked_mul(ny),
            Tier::Three => nx.checked_mul(ny)?.checked_mul(nx),
            Tier::Two => nx.checked_mul(ny),
            Tier::One => Some(nx),
        }
    }

    #[inline]
    fn tier(&self) -> Tier {
        match self {
            MemoStore::Dense { .. } => Tier::Four,
            MemoStore::Hashed { tier, .. } => *tier,
        }
    }

    /// Array index of a normalized piece in the chosen layout.
    pub fn index(&self, raster: &RasterTable, q: &Quad) -> usize {
        let nx = raster.nx();
        let ny = raster.ny();
        let ix0 = raster.index_x(q[0]);
        let iy1 = raster.index_y(q[1]);
        match self.tier() {
            Tier::Four => {
                ((ix0 * ny + iy1) * nx + raster.index_x(q[2])) * ny + raster.index_y(q[3])
            }
            Tier::Three => (ix0 * ny + iy1) * nx + raster.index_x(q[2]),
            Tier::Two => ix0 * ny + iy1,
            Tier::One => ix0,
        }
    }

    /// Residual hash key of a normalized piece in the chosen layout.
    pub fn key(&self, raster: &RasterTable, q: &Quad) -> u64 {
        let nx = raster.nx() as u64;
        let ny = raster.ny() as u64;
        match self.tier() {
            Tier::Four => 0,
            Tier::Three => q[3] as u64,
            Tier::Two => raster.index_x(q[2]) as u64 * ny + raster.index_y(q[3]) as u64,
            Tier::One => {
                (raster.index_y(q[1]) as u64 * nx + raster.index_x(q[2]) as u64) * ny
                    + raster.index_y(q[3]) as u64
            }
        }
    }

    /// The stored solution word for a piece, if it has been solved.
    pub fn solution(&self, index: usize, key: u64) -> Option<u32> {
        match self {
            MemoStore::Dense { solutions, .. } => {
                let word = solutions[index];
                (word != u32::MAX).then_some(word)
            }
            MemoStore::Hashed { solutions, .. } => solutions[index].get(&key).copied(),
        }
    }

    /// Stores (or replaces) the solution word for a piece.
    pub fn store_solution(&mut self, index: usize, key: u64, word: u32) {
        match self {
            MemoStore::Dense { solutions, .. } => solutions[index] = word,
            MemoStore::Hashed { solutions, .. } => {
                solutions[index].insert(key, word);
            }
        }
    }

    /// The stored division word for a piece (0 when none was recorded).
    pub fn division(&self, index: usize, key: u64) -> u64 {
        match self {
            MemoStore::Dense { divisions, .. } => divisions[index],
            MemoStore::Hashed { divisions, .. } => {
                divisions[index].get(&key).copied().unwrap_or(0)
            }
        }
    }

    /// Stores (or replaces) the division word for a piece.
    pub fn store_division(&mut self, index: usize, key: u64, word: u64) {
        match self {
            MemoStore::Dense { divisions, .. } => divisions[index] = word,
            MemoStore::Hashed { divisions, .. } => {
                divisions[index].insert(key, word);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_word_roundtrip() {
        let word = pack_solution(12345, Decision::B7);
        assert_eq!(solution_count(word), 12345);
        assert_eq!(solution_decision(word), Some(Decision::B7));

        let word = pack_solution(0, Decision::Homogeneous);
        assert_eq!(solution_count(word), 0);
        assert_eq!(solution_decision(word), Some(Decision::Homogeneous));

        // The dense-tier unsolved sentinel never decodes to a decision.
        assert_eq!(solution_decision(u32::MAX), None);
    }

    #[test]
    fn test_division_word_roundtrip() {
        assert_eq!(unpack_division(pack_division([0, 0, 0])), [0, 0, 0]);
        assert_eq!(unpack_division(pack_division([5, 9, 0])), [5, 9, 0]);
        assert_eq!(
            unpack_division(pack_division([2047, 2047, 2047])),
            [2047, 2047, 2047]
        );
    }

    #[test]
    fn test_tier_selection_by_budget() {
        // Generous budget: dense tier 4.
        let store = MemoStore::with_budget(10, 10, usize::MAX).unwrap();
        assert!(matches!(store, MemoStore::Dense { .. }));

        // Tier 4 needs 10^4 * 12 bytes; cap below that forces tier 3.
        let store = MemoStore::with_budget(10, 10, 110_000).unwrap();
        match store {
            MemoStore::Hashed { tier, .. } => assert_eq!(tier, Tier::Three),
            _ => panic!("expected a hashed tier"),
        }

        // Nothing fits: fatal.
        assert!(MemoStore::with_budget(10, 10, 0).is_err());
    }

    #[test]
    fn test_store_roundtrip_all_tiers() {
        let raster = RasterTable::new(10, 10, 3, 2);
        let q: Quad = [10, 10, 8, 6];
        let other: Quad = [10, 10, 6, 5];

        for budget in [usize::MAX, 70_000, 8_000, 900] {
            let mut store = MemoStore::with_budget(raster.nx(), raster.ny(), budget).unwrap();
            let idx = store.index(&raster, &q);
            let key = store.key(&raster, &q);
            assert_eq!(store.solution(idx, key), None);

            store.store_solution(idx, key, pack_solution(7, Decision::B3));
            store.store_division(idx, key, pack_division([4, 2, 0]));

            assert_eq!(store.solution(idx, key), Some(pack_solution(7, Decision::B3)));
            assert_eq!(unpack_division(store.division(idx, key)), [4, 2, 0]);

            // A different piece maps to a different slot.
            let idx2 = store.index(&raster, &other);
            let key2 = store.key(&raster, &other);
            assert_ne!((idx, key), (idx2, key2));
            assert_eq!(store.solution(idx2, key2), None);
        }
    }
}

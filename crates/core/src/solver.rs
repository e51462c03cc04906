//! The public `pack` operation.
//!
//! A call builds the per-call solver state (raster sets, bounds tables,
//! memoization store), runs the five-block phase and, when that phase does
//! not already meet the Barnes bound, the L-block phase on top of it.
//! The stored decisions are then replayed into absolute box placements.
//!
//! Everything lives for exactly one call; concurrent calls are independent.

use crate::bounds::BoundsTables;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::five_block::FiveBlock;
use crate::l_solver::LSolver;
use crate::memo::MemoStore;
use crate::placement::Placement;
use crate::raster::RasterTable;
use crate::reconstruct::Reconstructor;
use crate::result::PackResult;

/// Largest supported pallet dimension: division coordinates are stored in
/// 11-bit fields of the memoization words.
pub const MAX_DIMENSION: i32 = 2047;

/// Packs `(box_l, box_w)` boxes into an `(pallet_l, pallet_w)` pallet with
/// the default configuration.
pub fn pack(pallet_l: i32, pallet_w: i32, box_l: i32, box_w: i32) -> Result<PackResult> {
    pack_with_config(pallet_l, pallet_w, box_l, box_w, &Config::default())
}

/// Packs with an explicit configuration.
pub fn pack_with_config(
    pallet_l: i32,
    pallet_w: i32,
    box_l: i32,
    box_w: i32,
    config: &Config,
) -> Result<PackResult> {
    validate(pallet_l, pallet_w, box_l, box_w)?;

    if config.stack_size == 0 {
        return solve(pallet_l, pallet_w, box_l, box_w, config);
    }

    // The recursion depth scales with the raster set cardinality; give the
    // search a stack sized for it instead of trusting the platform default.
    std::thread::scope(|scope| {
        std::thread::Builder::new()
            .name("palletpack-solver".into())
            .stack_size(config.stack_size)
            .spawn_scoped(scope, || solve(pallet_l, pallet_w, box_l, box_w, config))
            .map_err(|e| Error::Internal(format!("failed to spawn solver thread: {e}")))?
            .join()
            .map_err(|_| Error::Internal("solver thread panicked".into()))?
    })
}

/// Packs and serializes the placement list as the public JSON array.
pub fn pack_json(pallet_l: i32, pallet_w: i32, box_l: i32, box_w: i32) -> Result<String> {
    pack(pallet_l, pallet_w, box_l, box_w)?.to_json()
}

fn validate(pallet_l: i32, pallet_w: i32, box_l: i32, box_w: i32) -> Result<()> {
    for (name, v) in [
        ("pallet length", pallet_l),
        ("pallet width", pallet_w),
        ("box length", box_l),
        ("box width", box_w),
    ] {
        if v <= 0 {
            return Err(Error::InvalidInput(format!("{name} must be positive, got {v}")));
        }
    }
    if pallet_l > MAX_DIMENSION || pallet_w > MAX_DIMENSION {
        return Err(Error::InvalidInput(format!(
            "pallet dimensions are limited to {MAX_DIMENSION}"
        )));
    }
    Ok(())
}

fn solve(
    pallet_l: i32,
    pallet_w: i32,
    box_l: i32,
    box_w: i32,
    config: &Config,
) -> Result<PackResult> {
    // The solver works with length >= width and undoes the swap at output.
    let swapped = pallet_w > pallet_l;
    let (pl, pw) = if swapped {
        (pallet_w, pallet_l)
    } else {
        (pallet_l, pallet_w)
    };

    log::info!("packing {box_l}x{box_w} boxes into a {pl}x{pw} pallet");

    let raster = RasterTable::new(pl, pw, box_l, box_w);
    let mut bounds = BoundsTables::new(&raster, box_l, box_w, config.depth_limit());

    let bd_count = FiveBlock::new(&raster, &mut bounds, config.depth_limit()).solve();

    let root_x = raster.index_x(raster.l_n());
    let root_y = raster.index_y(raster.w_n());
    let upper = bounds.upper[root_x][root_y];

    let (count, boxes, used_l_phase) = if bd_count >= upper {
        let boxes = Reconstructor::new(&raster, &bounds, None, box_l, box_w, bd_count as usize)
            .run_rectangle()?;
        (bd_count, boxes, false)
    } else {
        let mut memo = MemoStore::with_budget(raster.nx(), raster.ny(), config.memory_limit)?;
        let count =
            LSolver::new(&raster, &mut bounds, &mut memo, box_l, box_w).solve_root();
        let boxes =
            Reconstructor::new(&raster, &bounds, Some(&memo), box_l, box_w, count as usize)
                .run_piece()?;
        (count, boxes, true)
    };

    if boxes.len() != count as usize {
        // A depth-limited search may refine a subproblem after a parent
        // recorded its count; the replayed tree is then strictly better
        // than the stored count. Anything else is a bug.
        if config.max_depth == 0 || boxes.len() < count as usize {
            return Err(Error::Internal(format!(
                "reconstruction produced {} boxes for a stored count of {}",
                boxes.len(),
                count
            )));
        }
        log::warn!(
            "depth-limited replay improved the count from {} to {}",
            count,
            boxes.len()
        );
    }
    let count = boxes.len();

    let placements: Vec<Placement> = boxes
        .iter()
        .map(|b| Placement::from_box(b, box_l, box_w, swapped))
        .collect();

    let optimal = count == upper as usize;
    log::info!(
        "packed {count} boxes (upper bound {upper}{})",
        if optimal { ", optimal" } else { "" }
    );

    Ok(PackResult {
        placements,
        boxes,
        count,
        upper_bound: upper as usize,
        optimal,
        swapped,
        used_l_phase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_dimensions() {
        assert!(matches!(pack(0, 4, 2, 1), Err(Error::InvalidInput(_))));
        assert!(matches!(pack(6, -4, 2, 1), Err(Error::InvalidInput(_))));
        assert!(matches!(pack(6, 4, 0, 1), Err(Error::InvalidInput(_))));
        assert!(matches!(pack(6, 4, 2, -1), Err(Error::InvalidInput(_))));
        assert!(matches!(pack(5000, 4, 2, 1), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_perfect_fill() {
        let result = pack(6, 4, 2, 1).unwrap();
        assert_eq!(result.count, 12);
        assert!(result.optimal);
        assert!(!result.swapped);
        assert_eq!(result.placements.len(), 12);
    }

    #[test]
    fn test_nothing_fits_is_empty_json() {
        let result = pack(1, 1, 2, 2).unwrap();
        assert_eq!(result.count, 0);
        assert_eq!(result.to_json().unwrap(), "[]");
    }

    #[test]
    fn test_inline_stack_matches_dedicated_stack() {
        let config = Config::default().with_stack_size(0);
        let inline = pack_with_config(7, 5, 3, 2, &config).unwrap();
        let threaded = pack(7, 5, 3, 2).unwrap();
        assert_eq!(inline.count, threaded.count);
        assert_eq!(inline.placements, threaded.placements);
    }
}

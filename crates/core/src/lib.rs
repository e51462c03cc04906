//! # palletpack-core
//!
//! Solver for the manufacturer's pallet loading problem: pack the maximum
//! number of identical `l x w` boxes into an `L x W` pallet, orthogonally
//! and with 90-degree rotations only.
//!
//! The solver combines two recursive partitioning heuristics over integer
//! raster points:
//!
//! - the **five-block** recursion cuts rectangles with guillotine and
//!   first-order non-guillotine patterns;
//! - the **L-block** recursion decomposes L-shaped pieces through nine
//!   subdivisions (B1..B9), seeded by the five-block tables.
//!
//! Both phases memoize on normalized piece coordinates and prune with
//! homogeneous lower bounds and the Barnes upper bound. When the achieved
//! count meets the Barnes bound the result carries an optimality
//! certificate. A reconstruction pass replays the stored decisions into
//! concrete box placements.
//!
//! ## Quick Start
//!
//! ```rust
//! use palletpack_core::pack;
//!
//! let result = pack(10, 10, 3, 2).unwrap();
//! assert_eq!(result.count, 16);
//! assert!(result.optimal);
//!
//! let json = result.to_json().unwrap();
//! assert!(json.starts_with('['));
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use palletpack_core::{pack_with_config, Config};
//!
//! let config = Config::new()
//!     .with_max_depth(3)
//!     .with_memory_limit(64 * 1024 * 1024);
//!
//! let result = pack_with_config(7, 5, 3, 2, &config).unwrap();
//! assert_eq!(result.count, 5);
//! ```

pub mod bounds;
pub mod config;
pub mod error;
pub mod five_block;
pub mod l_solver;
pub mod memo;
pub mod piece;
pub mod placement;
pub mod raster;
pub mod reconstruct;
pub mod result;
pub mod solver;
pub mod subdivision;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use placement::{BoxRect, Placement};
pub use result::PackResult;
pub use solver::{pack, pack_json, pack_with_config, MAX_DIMENSION};

//! Solve result representation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::placement::{BoxRect, Placement};

/// Result of one `pack` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResult {
    /// One entry per placed box, in the caller's pallet frame.
    pub placements: Vec<Placement>,

    /// The raw corner rectangles in the solver frame (length >= width).
    pub boxes: Vec<BoxRect>,

    /// Number of boxes packed.
    pub count: usize,

    /// Barnes upper bound for the pallet.
    pub upper_bound: usize,

    /// True when `count` equals the upper bound, certifying optimality.
    pub optimal: bool,

    /// True when the caller passed `L < W` and the solver worked on the
    /// swapped pallet.
    pub swapped: bool,

    /// True when the L-block phase ran; false when the five-block phase
    /// alone reached the upper bound.
    pub used_l_phase: bool,
}

impl PackResult {
    /// Serializes the placement list as the public JSON array.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.placements)
            .map_err(|e| crate::error::Error::Internal(format!("JSON serialization failed: {e}")))
    }

    /// Returns true if no box fits at all.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let result = PackResult {
            placements: vec![Placement {
                x: 1.0,
                y: 0.5,
                rotated: false,
            }],
            boxes: vec![BoxRect::new(0, 0, 2, 1)],
            count: 1,
            upper_bound: 1,
            optimal: true,
            swapped: false,
            used_l_phase: false,
        };
        let json = result.to_json().unwrap();
        assert_eq!(json, r#"[{"x":1.0,"y":0.5,"rotated":false}]"#);
    }

    #[test]
    fn test_empty_json() {
        let result = PackResult {
            placements: vec![],
            boxes: vec![],
            count: 0,
            upper_bound: 0,
            optimal: true,
            swapped: false,
            used_l_phase: false,
        };
        assert_eq!(result.to_json().unwrap(), "[]");
        assert!(result.is_empty());
    }
}

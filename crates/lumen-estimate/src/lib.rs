//! # Population estimation from minimum hash distances
//!
//! Estimates how many badges are in radio range from nothing but their
//! one-way identifier broadcasts. No peer lists are exchanged and no
//! coordination happens: every listening badge computes its own local
//! estimate independently.
//!
//! ## How it works
//!
//! Each badge hashes its id into [`HASH_SLOTS`] independent 16-bit values.
//! For every slot the estimator tracks the minimum XOR distance between
//! the local hash and any peer hash it has heard:
//!
//! ```text
//! best[i] = min over peers p of (local[i] ^ p[i])     (seeded to 0xffff)
//! ```
//!
//! Under a uniform-hash assumption the expected minimum of `n` independent
//! uniform samples in `[0, 0xffff]` scales as `0xffff / n`. Summing the
//! per-slot minima and inverting gives the population:
//!
//! ```text
//! estimate = (HASH_SLOTS * 0xffff) / sum(best)
//! ```
//!
//! This is a broadcast-only cousin of min-hash cardinality estimation:
//! more neighbors push the minima down, and averaging over independent
//! slots damps the variance of any single minimum.
//!
//! ## Degenerate inputs
//!
//! With nothing heard, `sum(best)` is exactly `HASH_SLOTS * 0xffff` and
//! the estimate is exactly 1 - the badge itself. If a peer with the
//! identical hash vector is heard on every slot the denominator reaches
//! zero; the estimate then clamps to [`ESTIMATE_CEILING`] instead of
//! dividing by zero.

use lumen_beacon::{HashVector, HASH_SLOTS, MAX_DISTANCE};

/// Largest estimate the arithmetic can produce.
///
/// Equal to the estimate at denominator 1; a zero denominator clamps here.
pub const ESTIMATE_CEILING: u32 = (HASH_SLOTS as u32) * (MAX_DISTANCE as u32);

/// Result of folding one peer observation into the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    /// Population estimate after the observation.
    pub estimate: u32,
    /// Whether the estimate moved, i.e. the display needs a redraw.
    pub changed: bool,
}

/// Per-session population estimator.
///
/// Owns the per-slot minimum distances for one badge. Minima only ever
/// decrease, so the estimate is monotonically non-decreasing over a
/// session until it saturates.
#[derive(Debug, Clone)]
pub struct PopulationEstimator {
    local: HashVector,
    best: [u16; HASH_SLOTS],
    estimate: u32,
}

impl PopulationEstimator {
    /// Create an estimator for the given local hash vector.
    ///
    /// All minima start at [`MAX_DISTANCE`], which makes the initial
    /// estimate exactly 1: just this badge.
    pub fn new(local: HashVector) -> Self {
        let mut estimator = Self {
            local,
            best: [MAX_DISTANCE; HASH_SLOTS],
            estimate: 0,
        };
        estimator.estimate = estimator.compute();
        estimator
    }

    /// Fold one heard peer vector into the per-slot minima.
    pub fn observe(&mut self, peer: &HashVector) -> Update {
        for (i, best) in self.best.iter_mut().enumerate() {
            let d = self.local.slot(i) ^ peer.slot(i);
            if d < *best {
                *best = d;
            }
        }
        let estimate = self.compute();
        let changed = estimate != self.estimate;
        self.estimate = estimate;
        Update { estimate, changed }
    }

    /// Current population estimate.
    pub fn estimate(&self) -> u32 {
        self.estimate
    }

    /// Per-slot minimum distances, for rendering the raw minima grid.
    pub fn residuals(&self) -> &[u16; HASH_SLOTS] {
        &self.best
    }

    /// The local hash vector this estimator compares against.
    pub fn local(&self) -> &HashVector {
        &self.local
    }

    fn compute(&self) -> u32 {
        let error: u32 = self.best.iter().map(|&b| b as u32).sum();
        if error == 0 {
            return ESTIMATE_CEILING;
        }
        ESTIMATE_CEILING / error
    }
}

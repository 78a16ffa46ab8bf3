//! Display-facing engine events.

use lumen_beacon::BeaconId;
use lumen_leveling::Award;
use lumen_routing::OccupancySummary;
use serde::{Deserialize, Serialize};

/// Everything a display needs to render the proximity screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    /// Current population estimate.
    pub estimate: u32,
    /// Per-slot minimum distances, for the raw minima grid.
    pub residuals: Vec<u16>,
    /// Machine-table occupancy per bucket.
    pub machine_occupancy: OccupancySummary,
    /// Confirmed-table occupancy per bucket.
    pub confirmed_occupancy: OccupancySummary,
    /// Most recently heard badges, newest first.
    pub recent: Vec<BeaconId>,
    /// Visual to celebrate, present only on a confirmation redraw.
    pub award_visual: Option<usize>,
}

/// Outputs of one engine call, in the order they occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// The screen contents are stale; here is the fresh state.
    Redraw(DisplaySnapshot),
    /// A confirmation gesture completed.
    Award(Award),
    /// Flash until acknowledged; raised with every award.
    Attention,
    /// A bucket index escaped its valid range. The offending event was
    /// dropped; the engine keeps running.
    Fault { bucket: usize },
}

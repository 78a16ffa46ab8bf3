//! The bucketed recency table.

use lumen_beacon::bucket_index;
use serde::{Deserialize, Serialize};

use crate::{Result, SightingEntry, TableError, TableShape, HUMAN_SHAPE, MACHINE_SHAPE};

/// Per-bucket occupancy counts, ready to hand to a display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySummary(pub Vec<u8>);

/// A fixed-shape table of sightings, bucketed by hash distance and
/// ordered most-recently-seen first within each bucket.
#[derive(Debug, Clone)]
pub struct BucketTable {
    shape: TableShape,
    buckets: Vec<Vec<SightingEntry>>,
}

impl BucketTable {
    /// Create an empty table of the given shape.
    pub fn new(shape: TableShape) -> Self {
        Self {
            shape,
            buckets: vec![vec![SightingEntry::EMPTY; shape.slots]; shape.buckets],
        }
    }

    /// Empty machine-shaped table.
    pub fn machine() -> Self {
        Self::new(MACHINE_SHAPE)
    }

    /// Empty human-shaped table.
    pub fn human() -> Self {
        Self::new(HUMAN_SHAPE)
    }

    /// The table's shape.
    pub fn shape(&self) -> TableShape {
        self.shape
    }

    /// Record a peer hash heard by the local hash.
    ///
    /// Computes the bucket from the XOR distance, performs the
    /// move-to-front insert and returns the bucket index for the caller
    /// to act on.
    pub fn observe(&mut self, local_hash: u16, peer_hash: u16) -> Result<usize> {
        let bucket = bucket_index(local_hash, peer_hash);
        self.insert(bucket, peer_hash)?;
        Ok(bucket)
    }

    /// Move-to-front insert of `peer_hash` into `bucket`.
    ///
    /// A hash already present moves to slot 0 without duplication; a new
    /// hash shifts the bucket down and the least-recently-seen slot falls
    /// off the end if the bucket was full.
    pub fn insert(&mut self, bucket: usize, peer_hash: u16) -> Result<()> {
        let slots = self.bucket_mut(bucket)?;

        // Existing occurrence, or the tail slot when absent.
        let pos = slots
            .iter()
            .position(|e| !e.is_empty() && e.peer_hash == peer_hash)
            .unwrap_or(slots.len() - 1);

        for i in (0..pos).rev() {
            slots[i + 1] = slots[i];
        }
        slots[0] = SightingEntry { peer_hash, age: 1 };
        Ok(())
    }

    /// Whether `bucket` currently holds `peer_hash`.
    pub fn contains(&self, bucket: usize, peer_hash: u16) -> bool {
        self.buckets
            .get(bucket)
            .map(|slots| slots.iter().any(|e| !e.is_empty() && e.peer_hash == peer_hash))
            .unwrap_or(false)
    }

    /// Most recently seen hash in `bucket`, if any.
    pub fn front(&self, bucket: usize) -> Option<u16> {
        self.buckets
            .get(bucket)
            .and_then(|slots| slots.first())
            .filter(|e| !e.is_empty())
            .map(|e| e.peer_hash)
    }

    /// Count of occupied slots in `bucket`.
    pub fn occupancy(&self, bucket: usize) -> usize {
        self.buckets
            .get(bucket)
            .map(|slots| slots.iter().filter(|e| !e.is_empty()).count())
            .unwrap_or(0)
    }

    /// Whether every slot of `bucket` is occupied.
    pub fn is_full(&self, bucket: usize) -> bool {
        self.occupancy(bucket) == self.shape.slots
    }

    /// Occupied slots across the whole table.
    pub fn total_occupancy(&self) -> usize {
        (0..self.shape.buckets).map(|b| self.occupancy(b)).sum()
    }

    /// Per-bucket occupancy counts.
    pub fn occupancy_summary(&self) -> OccupancySummary {
        OccupancySummary(
            (0..self.shape.buckets)
                .map(|b| self.occupancy(b) as u8)
                .collect(),
        )
    }

    /// The slots of one bucket, most recent first.
    pub fn entries(&self, bucket: usize) -> &[SightingEntry] {
        self.buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    fn bucket_mut(&mut self, bucket: usize) -> Result<&mut Vec<SightingEntry>> {
        let limit = self.shape.buckets;
        self.buckets
            .get_mut(bucket)
            .ok_or(TableError::BucketOutOfRange { bucket, limit })
    }
}

//! Per-session state bundle.

use std::collections::VecDeque;

use lumen_beacon::{BeaconId, HashOracle, HashVector};
use lumen_estimate::PopulationEstimator;
use lumen_leveling::{Leveler, LevelingConfig};
use lumen_routing::BucketTable;

/// All mutable state of one interactive session.
///
/// Created fresh at session start from the local badge id; nothing here
/// survives a power cycle. The bundle has exactly one owner - the engine
/// - and is mutated only synchronously from its polling calls.
#[derive(Debug)]
pub struct SessionState {
    id: BeaconId,
    local_vector: HashVector,
    pub(crate) estimator: PopulationEstimator,
    pub(crate) sightings: BucketTable,
    pub(crate) leveler: Leveler,
    pub(crate) recent: VecDeque<BeaconId>,
}

impl SessionState {
    /// Derive a fresh session for `id` under `oracle`.
    pub fn new<O: HashOracle>(oracle: &O, id: BeaconId, leveling: LevelingConfig) -> Self {
        let local_vector = HashVector::derive(oracle, id);
        Self {
            id,
            local_vector,
            estimator: PopulationEstimator::new(local_vector),
            sightings: BucketTable::machine(),
            leveler: Leveler::new(leveling),
            recent: VecDeque::new(),
        }
    }

    /// The local badge id.
    pub fn id(&self) -> BeaconId {
        self.id
    }

    /// The cached local hash vector.
    pub fn local_vector(&self) -> &HashVector {
        &self.local_vector
    }

    /// The local beacon hash the routing layer buckets against.
    pub fn beacon_hash(&self) -> u16 {
        self.local_vector.beacon_hash()
    }

    /// The population estimator.
    pub fn estimator(&self) -> &PopulationEstimator {
        &self.estimator
    }

    /// The machine sighting table.
    pub fn sightings(&self) -> &BucketTable {
        &self.sightings
    }

    /// The leveling state machine (and with it the confirmed table).
    pub fn leveler(&self) -> &Leveler {
        &self.leveler
    }

    /// Note a heard badge in the recency feed, newest first.
    pub(crate) fn note_sighting(&mut self, id: BeaconId, keep: usize) {
        self.recent.retain(|&seen| seen != id);
        self.recent.push_front(id);
        self.recent.truncate(keep);
    }
}

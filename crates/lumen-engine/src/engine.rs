//! The polling engine.

use lumen_beacon::{BeaconId, HashOracle, HashVector};
use lumen_leveling::{LevelingConfig, TickOutcome};
use lumen_radio::{Beacon, Transport};
use lumen_routing::TableError;
use tracing::{debug, trace, warn};

use crate::{DisplaySnapshot, EngineEvent, InputPoll, SessionState};

/// Tunables for the scan loop.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Transport polls per scan burst. Bounds the burst by iteration
    /// count so the loop always returns to input and display servicing.
    pub burst_polls: usize,
    /// How many recently heard badges the display feed keeps.
    pub recent_kept: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { burst_polls: 1024, recent_kept: 8 }
    }
}

impl ScanConfig {
    /// Config with a small burst budget, for tests and demos.
    #[must_use]
    pub fn brief() -> Self {
        Self { burst_polls: 32, ..Default::default() }
    }
}

/// The proximity engine: one badge's view of the crowd around it.
///
/// Owns the [`SessionState`] exclusively. See the crate docs for the
/// control-flow contract.
#[derive(Debug)]
pub struct Engine<O: HashOracle> {
    oracle: O,
    config: ScanConfig,
    session: SessionState,
}

impl<O: HashOracle> Engine<O> {
    /// Create an engine with default tunables.
    pub fn new(oracle: O, id: BeaconId) -> Self {
        Self::with_config(oracle, id, ScanConfig::default(), LevelingConfig::default())
    }

    /// Create an engine with explicit scan and leveling tunables.
    pub fn with_config(
        oracle: O,
        id: BeaconId,
        config: ScanConfig,
        leveling: LevelingConfig,
    ) -> Self {
        let session = SessionState::new(&oracle, id, leveling);
        debug!(
            "session started for {} (beacon hash {:04x})",
            session.id(),
            session.beacon_hash()
        );
        Self { oracle, config, session }
    }

    /// Poll the transport for one bounded burst of frames.
    ///
    /// Every well-formed beacon updates the estimator, the machine
    /// sighting table and the leveling gate. Irrelevant or malformed
    /// frames are dropped silently. The burst ends after the configured
    /// number of polls, or as soon as `input` requests cancel.
    pub fn scan_burst<T, I>(&mut self, transport: &mut T, input: &mut I) -> Vec<EngineEvent>
    where
        T: Transport,
        I: InputPoll,
    {
        let mut events = Vec::new();
        let mut heard = 0usize;

        for _ in 0..self.config.burst_polls {
            if input.cancel_requested() {
                break;
            }
            let Some(frame) = transport.poll_frame() else {
                continue;
            };
            let Some(beacon) = Beacon::decode(&frame) else {
                continue;
            };
            if self.handle_beacon(beacon, &mut events) {
                heard += 1;
            }
        }

        if heard > 0 {
            debug!(
                "scan burst heard {} beacons, estimate {}",
                heard,
                self.session.estimator.estimate()
            );
            events.push(EngineEvent::Redraw(self.snapshot()));
        }
        events
    }

    /// Advance the confirmation gesture by one tick.
    ///
    /// `input` is polled exactly once; a cancel drops the running
    /// attempt. A completed gesture yields the award, a fresh redraw
    /// carrying its visual, and the attention signal, in that order.
    pub fn tick<I: InputPoll>(&mut self, input: &mut I) -> Vec<EngineEvent> {
        match self.session.leveler.tick(input.cancel_requested()) {
            TickOutcome::Idle | TickOutcome::Counting { .. } => Vec::new(),
            TickOutcome::Cancelled { peer_hash, bucket } => {
                trace!("gesture for {:04x} in bucket {} dropped", peer_hash, bucket);
                Vec::new()
            }
            TickOutcome::Confirmed(award) => {
                let mut snapshot = self.snapshot();
                snapshot.award_visual = Some(award.visual);
                vec![
                    EngineEvent::Award(award),
                    EngineEvent::Redraw(snapshot),
                    EngineEvent::Attention,
                ]
            }
        }
    }

    /// Fold one decoded beacon into the session. Returns whether the
    /// beacon was processed (false only on a bucket fault).
    fn handle_beacon(&mut self, beacon: Beacon, events: &mut Vec<EngineEvent>) -> bool {
        trace!("beacon {} heard (sequence {})", beacon.id, beacon.sequence);

        let peer_vector = HashVector::derive(&self.oracle, beacon.id);
        let peer_hash = peer_vector.beacon_hash();
        let local_hash = self.session.beacon_hash();

        let bucket = match self.session.sightings.observe(local_hash, peer_hash) {
            Ok(bucket) => bucket,
            Err(TableError::BucketOutOfRange { bucket, .. }) => {
                warn!("bucket index {} out of range, beacon dropped", bucket);
                events.push(EngineEvent::Fault { bucket });
                return false;
            }
        };

        let update = self.session.estimator.observe(&peer_vector);
        if update.changed {
            trace!("estimate moved to {}", update.estimate);
        }

        match self.session.leveler.consider(bucket, peer_hash) {
            Ok(gate) => trace!("leveling gate for bucket {}: {:?}", bucket, gate),
            Err(TableError::BucketOutOfRange { bucket, .. }) => {
                warn!("bucket index {} out of range, attempt aborted", bucket);
                events.push(EngineEvent::Fault { bucket });
                return false;
            }
        }

        let keep = self.config.recent_kept;
        self.session.note_sighting(beacon.id, keep);
        true
    }

    /// A fresh display snapshot of the whole session.
    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            estimate: self.session.estimator.estimate(),
            residuals: self.session.estimator.residuals().to_vec(),
            machine_occupancy: self.session.sightings.occupancy_summary(),
            confirmed_occupancy: self.session.leveler.occupancy_summary(),
            recent: self.session.recent.iter().copied().collect(),
            award_visual: None,
        }
    }

    /// Current population estimate.
    pub fn estimate(&self) -> u32 {
        self.session.estimator.estimate()
    }

    /// Whether the attention flash is waiting to be acknowledged.
    pub fn attention_pending(&self) -> bool {
        self.session.leveler.attention_pending()
    }

    /// Acknowledge the attention flash.
    pub fn acknowledge_attention(&mut self) {
        self.session.leveler.acknowledge();
    }

    /// Read access to the session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }
}

//! Lumen Leveling
//!
//! Turns observed peers into confirmed encounters through a sustained,
//! cancellable user gesture, and awards a collectible visual per
//! confirmation.
//!
//! # State machine
//!
//! Every peer hash is in one of three states relative to a bucket:
//!
//! ```text
//! Unseen ──consider()── Pending ──tick()×N── Confirmed
//!            │                      │
//!            │ refused (bucket      │ cancel: attempt dropped,
//!            │ full / already       │ nothing written, back to
//!            │ confirmed / busy)    │ Unseen
//! ```
//!
//! `consider` opens an attempt only when the peer is not already in its
//! confirmed bucket and that bucket still has room - a full bucket stops
//! awarding until a slot frees. The Pending state is a countdown of
//! discrete host ticks; any tick that reports a cancel input aborts the
//! attempt with no trace. Only a completed countdown writes the confirmed
//! table, using the same move-to-front policy as raw sightings.
//!
//! Rarity falls out of the bucket geometry: hearing a peer whose hash
//! shares a long prefix with yours is exponentially unlikely, so awards
//! keyed to high buckets are exponentially rare.

use lumen_routing::{BucketTable, OccupancySummary, Result, TableError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Tunables for the confirmation gesture and award display.
#[derive(Debug, Clone, Copy)]
pub struct LevelingConfig {
    /// Ticks of uninterrupted confirmation required to confirm.
    /// At the nominal 50 ms host tick, 40 ticks is about two seconds.
    pub confirm_ticks: u32,
    /// Nominal milliseconds between host ticks. Informational; the host
    /// loop owns the clock.
    pub tick_interval_ms: u64,
    /// Number of distinct award visuals available to the display.
    pub visual_count: usize,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            confirm_ticks: 40,
            tick_interval_ms: 50,
            visual_count: 10,
        }
    }
}

impl LevelingConfig {
    /// Config with a single-tick gesture, for tests and demos.
    #[must_use]
    pub fn instant() -> Self {
        Self { confirm_ticks: 1, ..Default::default() }
    }
}

/// Where a peer hash stands in the leveling flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerStanding {
    /// Never confirmed, no attempt in flight.
    Unseen,
    /// The gesture countdown for this peer is running.
    Pending,
    /// Present in the confirmed table.
    Confirmed,
}

/// Outcome of offering an observed peer to the leveler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// An attempt was opened; the countdown starts at `remaining`.
    Opened { remaining: u32 },
    /// Another attempt is already counting down.
    Busy,
    /// This peer already occupies its confirmed bucket.
    AlreadyConfirmed,
    /// The confirmed bucket is at capacity.
    BucketFull,
}

/// A gesture countdown in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// Peer hash being confirmed.
    pub peer_hash: u16,
    /// Confirmed-table bucket the award would land in.
    pub bucket: usize,
    /// Ticks left until confirmation.
    pub remaining: u32,
}

/// A confirmed encounter, ready for the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    /// Bucket the encounter landed in; doubles as the award level.
    pub bucket: usize,
    /// Visual to show, clamped to the available set.
    pub visual: usize,
    /// The confirmed peer hash.
    pub peer_hash: u16,
}

/// Result of advancing the gesture by one host tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No attempt in flight.
    Idle,
    /// Countdown still running.
    Counting { remaining: u32 },
    /// Cancel input observed; the attempt is gone, nothing was written.
    Cancelled { peer_hash: u16, bucket: usize },
    /// Countdown completed; the confirmed table was updated.
    Confirmed(Award),
}

/// The leveling engine: owns the confirmed table and the single attempt
/// slot, and is the only writer of either.
#[derive(Debug)]
pub struct Leveler {
    config: LevelingConfig,
    confirmed: BucketTable,
    attempt: Option<Attempt>,
    attention: bool,
}

impl Leveler {
    /// Create a leveler with an empty human-shaped confirmed table.
    pub fn new(config: LevelingConfig) -> Self {
        Self {
            config,
            confirmed: BucketTable::human(),
            attempt: None,
            attention: false,
        }
    }

    /// Offer an observed peer for confirmation.
    ///
    /// Opens the gesture countdown when the gate conditions hold: no
    /// attempt is already in flight, the peer is not already confirmed in
    /// `bucket`, and `bucket` still has a free slot. `bucket` must be a
    /// valid confirmed-table index; anything else is rejected before any
    /// state changes.
    pub fn consider(&mut self, bucket: usize, peer_hash: u16) -> Result<Gate> {
        let limit = self.confirmed.shape().buckets;
        if bucket >= limit {
            return Err(TableError::BucketOutOfRange { bucket, limit });
        }
        if let Some(attempt) = &self.attempt {
            debug!(
                "gesture busy with {:04x}, peer {:04x} not considered",
                attempt.peer_hash, peer_hash
            );
            return Ok(Gate::Busy);
        }
        if self.confirmed.contains(bucket, peer_hash) {
            return Ok(Gate::AlreadyConfirmed);
        }
        if self.confirmed.is_full(bucket) {
            debug!("confirmed bucket {} full, peer not considered", bucket);
            return Ok(Gate::BucketFull);
        }

        let remaining = self.config.confirm_ticks;
        self.attempt = Some(Attempt { peer_hash, bucket, remaining });
        debug!(
            "gesture countdown opened for {:04x} in bucket {} ({} ticks)",
            peer_hash, bucket, remaining
        );
        Ok(Gate::Opened { remaining })
    }

    /// Advance the gesture by one host tick.
    ///
    /// `cancel` is the per-tick cancel/quit input. A cancelled attempt is
    /// dropped whole; a completed one writes the confirmed table, raises
    /// the attention latch and returns the award.
    pub fn tick(&mut self, cancel: bool) -> TickOutcome {
        let Some(mut attempt) = self.attempt.take() else {
            return TickOutcome::Idle;
        };

        if cancel {
            debug!(
                "gesture cancelled for {:04x} in bucket {}",
                attempt.peer_hash, attempt.bucket
            );
            return TickOutcome::Cancelled {
                peer_hash: attempt.peer_hash,
                bucket: attempt.bucket,
            };
        }

        attempt.remaining = attempt.remaining.saturating_sub(1);
        if attempt.remaining > 0 {
            let remaining = attempt.remaining;
            self.attempt = Some(attempt);
            return TickOutcome::Counting { remaining };
        }

        match self.confirmed.insert(attempt.bucket, attempt.peer_hash) {
            Ok(()) => {
                let award = Award {
                    bucket: attempt.bucket,
                    visual: attempt.bucket.min(self.config.visual_count.saturating_sub(1)),
                    peer_hash: attempt.peer_hash,
                };
                self.attention = true;
                info!(
                    "encounter {:04x} confirmed in bucket {} (visual {})",
                    award.peer_hash, award.bucket, award.visual
                );
                TickOutcome::Confirmed(award)
            }
            // Guarded in consider(); if the table still refuses, drop the
            // attempt rather than write anywhere.
            Err(_) => TickOutcome::Cancelled {
                peer_hash: attempt.peer_hash,
                bucket: attempt.bucket,
            },
        }
    }

    /// Where `peer_hash` currently stands relative to `bucket`.
    pub fn standing(&self, bucket: usize, peer_hash: u16) -> PeerStanding {
        if self.confirmed.contains(bucket, peer_hash) {
            return PeerStanding::Confirmed;
        }
        match &self.attempt {
            Some(a) if a.bucket == bucket && a.peer_hash == peer_hash => PeerStanding::Pending,
            _ => PeerStanding::Unseen,
        }
    }

    /// The attempt currently counting down, if any.
    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    /// Read access to the confirmed table.
    pub fn confirmed(&self) -> &BucketTable {
        &self.confirmed
    }

    /// Per-bucket confirmed occupancy for the display.
    pub fn occupancy_summary(&self) -> OccupancySummary {
        self.confirmed.occupancy_summary()
    }

    /// Whether the attention flash is waiting to be acknowledged.
    ///
    /// Set on every confirmation and latched until [`acknowledge`]
    /// is called, so the host cannot miss an award.
    ///
    /// [`acknowledge`]: Self::acknowledge
    pub fn attention_pending(&self) -> bool {
        self.attention
    }

    /// Clear the attention latch.
    pub fn acknowledge(&mut self) {
        self.attention = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leveler_with_ticks(ticks: u32) -> Leveler {
        Leveler::new(LevelingConfig { confirm_ticks: ticks, ..Default::default() })
    }

    /// Run a full uninterrupted gesture and return the award.
    fn confirm(leveler: &mut Leveler, bucket: usize, hash: u16) -> Award {
        assert!(matches!(
            leveler.consider(bucket, hash).unwrap(),
            Gate::Opened { .. }
        ));
        loop {
            match leveler.tick(false) {
                TickOutcome::Counting { .. } => continue,
                TickOutcome::Confirmed(award) => return award,
                other => panic!("gesture ended unexpectedly: {:?}", other),
            }
        }
    }

    #[test]
    fn full_countdown_confirms() {
        let mut leveler = leveler_with_ticks(3);
        assert_eq!(
            leveler.consider(4, 0xabcd).unwrap(),
            Gate::Opened { remaining: 3 }
        );

        assert_eq!(leveler.tick(false), TickOutcome::Counting { remaining: 2 });
        assert_eq!(leveler.tick(false), TickOutcome::Counting { remaining: 1 });
        let outcome = leveler.tick(false);
        let TickOutcome::Confirmed(award) = outcome else {
            panic!("expected confirmation, got {:?}", outcome);
        };

        assert_eq!(award.bucket, 4);
        assert_eq!(award.peer_hash, 0xabcd);
        assert!(leveler.confirmed().contains(4, 0xabcd));
        assert_eq!(leveler.standing(4, 0xabcd), PeerStanding::Confirmed);
        assert!(leveler.attention_pending());
    }

    #[test]
    fn cancel_before_the_deadline_writes_nothing() {
        let mut leveler = leveler_with_ticks(40);
        leveler.consider(2, 0x1234).unwrap();

        for _ in 0..39 {
            leveler.tick(false);
        }
        // One tick short of the budget.
        assert_eq!(
            leveler.tick(true),
            TickOutcome::Cancelled { peer_hash: 0x1234, bucket: 2 }
        );

        assert_eq!(leveler.confirmed().occupancy(2), 0);
        assert_eq!(leveler.standing(2, 0x1234), PeerStanding::Unseen);
        assert!(!leveler.attention_pending());
        assert_eq!(leveler.tick(false), TickOutcome::Idle);
    }

    #[test]
    fn cancelled_peer_can_try_again() {
        let mut leveler = leveler_with_ticks(2);
        leveler.consider(1, 0x5555).unwrap();
        leveler.tick(true);

        assert!(matches!(
            leveler.consider(1, 0x5555).unwrap(),
            Gate::Opened { .. }
        ));
    }

    #[test]
    fn busy_gesture_refuses_other_peers() {
        let mut leveler = leveler_with_ticks(5);
        leveler.consider(3, 0x1111).unwrap();

        assert_eq!(leveler.consider(6, 0x2222).unwrap(), Gate::Busy);
        assert_eq!(leveler.standing(6, 0x2222), PeerStanding::Unseen);
        // The running attempt is untouched.
        assert_eq!(leveler.attempt().unwrap().peer_hash, 0x1111);
    }

    #[test]
    fn confirmed_peer_is_not_reconsidered() {
        let mut leveler = leveler_with_ticks(1);
        confirm(&mut leveler, 4, 0xaaaa);

        assert_eq!(leveler.consider(4, 0xaaaa).unwrap(), Gate::AlreadyConfirmed);
    }

    #[test]
    fn full_bucket_refuses_until_a_slot_frees() {
        let mut leveler = leveler_with_ticks(1);
        confirm(&mut leveler, 4, 0xaaaa);
        confirm(&mut leveler, 4, 0xbbbb);

        // Human shape holds two per bucket.
        assert_eq!(leveler.consider(4, 0xcccc).unwrap(), Gate::BucketFull);
        assert_eq!(leveler.standing(4, 0xcccc), PeerStanding::Unseen);

        // Other buckets are unaffected by the full one.
        assert!(matches!(
            leveler.consider(9, 0xcccc).unwrap(),
            Gate::Opened { .. }
        ));
    }

    #[test]
    fn visual_is_clamped_to_the_available_set() {
        let mut leveler = Leveler::new(LevelingConfig {
            confirm_ticks: 1,
            visual_count: 10,
            ..Default::default()
        });

        let low = confirm(&mut leveler, 3, 0x0001);
        assert_eq!(low.visual, 3);

        let high = confirm(&mut leveler, 14, 0x0002);
        assert_eq!(high.visual, 9, "visual must clamp to the last available");
    }

    #[test]
    fn out_of_range_bucket_is_an_error_not_a_write() {
        let mut leveler = leveler_with_ticks(1);
        let limit = leveler.confirmed().shape().buckets;

        let err = leveler.consider(limit, 0x7777).unwrap_err();
        assert_eq!(err, TableError::BucketOutOfRange { bucket: limit, limit });
        assert!(leveler.attempt().is_none());
    }

    #[test]
    fn attention_latches_until_acknowledged() {
        let mut leveler = leveler_with_ticks(1);
        confirm(&mut leveler, 0, 0x9999);

        assert!(leveler.attention_pending());
        assert!(leveler.attention_pending(), "latch must hold across reads");
        leveler.acknowledge();
        assert!(!leveler.attention_pending());
    }
}

//! Simulated radio crowds for exercising the Lumen engine.
//!
//! A [`Crowd`] stands in for the radio: a seeded population of badges
//! whose beacon broadcasts arrive interleaved with silence and foreign
//! traffic, the way a real channel behaves. The same seed always
//! produces the same traffic, so whole sessions replay deterministically.

use bytes::Bytes;
use lumen_beacon::BeaconId;
use lumen_radio::{Beacon, Transport, FRAME_LEN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for a simulated crowd.
#[derive(Debug, Clone, Copy)]
pub struct CrowdConfig {
    /// Seed for deterministic traffic.
    pub seed: u64,
    /// Number of distinct badges on the air.
    pub population: usize,
    /// Probability a poll finds nothing waiting.
    pub silence: f64,
    /// Probability a poll yields foreign or mangled traffic.
    pub junk: f64,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            population: 50,
            silence: 0.3,
            junk: 0.05,
        }
    }
}

/// A deterministic crowd of broadcasting badges.
pub struct Crowd {
    rng: StdRng,
    config: CrowdConfig,
    ids: Vec<BeaconId>,
    sequences: Vec<u32>,
}

impl Crowd {
    /// Assemble a crowd from its configuration.
    ///
    /// Badge ids are drawn from the seeded generator; `exclude` keeps the
    /// listening badge itself out of the crowd.
    pub fn new(config: CrowdConfig, exclude: BeaconId) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut ids = Vec::with_capacity(config.population);
        while ids.len() < config.population {
            let id = BeaconId::new(rng.gen());
            if id != exclude && !ids.contains(&id) {
                ids.push(id);
            }
        }
        let sequences = vec![0u32; ids.len()];
        Self { rng, config, ids, sequences }
    }

    /// The badges on the air.
    pub fn ids(&self) -> &[BeaconId] {
        &self.ids
    }
}

impl Transport for Crowd {
    fn poll_frame(&mut self) -> Option<Bytes> {
        let roll: f64 = self.rng.gen();
        if roll < self.config.silence {
            return None;
        }
        if roll < self.config.silence + self.config.junk {
            // Foreign traffic: right length, wrong type, random payload.
            let mut junk = [0u8; FRAME_LEN];
            self.rng.fill(&mut junk[..]);
            junk[1] = 0x20;
            return Some(Bytes::copy_from_slice(&junk));
        }

        let which = self.rng.gen_range(0..self.ids.len());
        self.sequences[which] = self.sequences[which].wrapping_add(1);
        let beacon = Beacon {
            id: self.ids[which],
            sequence: self.sequences[which],
        };
        Some(Bytes::copy_from_slice(&beacon.encode()))
    }
}

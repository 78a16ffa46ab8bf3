//! The hash oracle: per-slot 16-bit hashes of a beacon id.
//!
//! The oracle is a deterministic keyed PRF. Equal `(salt, id)` pairs always
//! produce equal outputs; for a fixed salt the outputs over varying ids are
//! approximately uniform over `[0, 0xffff]`; for a fixed id the outputs
//! across distinct salts are pairwise approximately independent. The
//! population estimator relies only on this statistical contract, not on
//! any particular construction.

use crate::{BeaconId, HASH_SLOTS};

/// Fixed per-slot salts.
///
/// One distinct salt per hash slot. These are plain domain-separation
/// constants shared by every badge, not secrets.
pub const SLOT_SALTS: [u32; HASH_SLOTS] = [
    0x6220ddaf, 0x4f94e8fc, 0x540aa8ab, 0x728fefad,
    0xc5a14b8e, 0xa0ac8310, 0xf20b27dc, 0xd539d677,
    0x145f8491, 0xbce8d16e, 0x4a5efcc1, 0xc4da23cf,
    0x90c7e131, 0x9e19ea94, 0x7f20073a, 0x5366be65,
];

/// A keyed 16-bit hash of a beacon id.
pub trait HashOracle {
    /// Hash `id` under `salt` into a 16-bit value.
    fn hash16(&self, salt: u32, id: BeaconId) -> u16;
}

/// Default oracle: Blake3 over `salt || id`, truncated to 16 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Oracle;

impl HashOracle for Blake3Oracle {
    fn hash16(&self, salt: u32, id: BeaconId) -> u16 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&salt.to_be_bytes());
        hasher.update(&id.to_be_bytes());
        let digest = hasher.finalize();
        let bytes = digest.as_bytes();
        u16::from_be_bytes([bytes[0], bytes[1]])
    }
}

/// The per-slot hashes of one beacon id.
///
/// Derived on demand from an id; never stored persistently. The local
/// badge's vector is derived once per session and cached by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashVector([u16; HASH_SLOTS]);

impl HashVector {
    /// Derive the vector for `id` under `oracle`, one slot per salt.
    pub fn derive<O: HashOracle>(oracle: &O, id: BeaconId) -> Self {
        let mut slots = [0u16; HASH_SLOTS];
        for (slot, &salt) in slots.iter_mut().zip(SLOT_SALTS.iter()) {
            *slot = oracle.hash16(salt, id);
        }
        Self(slots)
    }

    /// Build directly from slot values. Mostly useful in tests.
    pub const fn from_slots(slots: [u16; HASH_SLOTS]) -> Self {
        Self(slots)
    }

    /// The hash for one slot.
    pub const fn slot(&self, index: usize) -> u16 {
        self.0[index]
    }

    /// The beacon hash used for routing: slot 0.
    pub const fn beacon_hash(&self) -> u16 {
        self.0[0]
    }

    /// Iterate over all slot hashes.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    /// All slot hashes as an array.
    pub const fn slots(&self) -> &[u16; HASH_SLOTS] {
        &self.0
    }
}

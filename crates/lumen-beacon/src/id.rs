//! Beacon identifier type.

use serde::{Deserialize, Serialize};

/// A 32-bit beacon identifier.
///
/// Names a badge for the duration of one session. The value is opaque and
/// unauthenticated: anyone listening on the channel can read or replay it,
/// so nothing security-relevant may ever hang off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeaconId(pub u32);

impl BeaconId {
    /// Create from a raw 32-bit value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Create from big-endian wire bytes.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Get the raw value.
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Big-endian wire bytes.
    pub const fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_be_bytes())
    }
}

impl From<u32> for BeaconId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for BeaconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

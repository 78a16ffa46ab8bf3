//! Beacon frame layout.
//!
//! A beacon frame is exactly 16 bytes:
//!
//! ```text
//! offset 0      protocol byte (ignored here)
//! offset 1      frame type, 0x17 for beacons
//! offset 2..4   flags (ignored here)
//! offset 4..8   sequence counter, big-endian u32
//! offset 8..12  beacon id, big-endian u32
//! offset 12..16 trailer (ignored here)
//! ```

use lumen_beacon::BeaconId;

/// Length of a beacon frame in bytes.
pub const FRAME_LEN: usize = 16;

/// Frame type byte marking a beacon broadcast.
pub const BEACON_TYPE: u8 = 0x17;

const TYPE_OFFSET: usize = 1;
const SEQ_OFFSET: usize = 4;
const ID_OFFSET: usize = 8;

/// One decoded beacon broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beacon {
    /// The broadcasting badge.
    pub id: BeaconId,
    /// The badge's send counter at broadcast time.
    pub sequence: u32,
}

impl Beacon {
    /// Decode a raw frame.
    ///
    /// Returns `None` for anything that is not a well-formed beacon:
    /// wrong length, wrong type byte. Foreign traffic on the channel is
    /// expected, so there is nothing to report.
    pub fn decode(frame: &[u8]) -> Option<Self> {
        if frame.len() != FRAME_LEN || frame[TYPE_OFFSET] != BEACON_TYPE {
            return None;
        }
        let sequence = u32::from_be_bytes(frame[SEQ_OFFSET..SEQ_OFFSET + 4].try_into().ok()?);
        let id_bytes: [u8; 4] = frame[ID_OFFSET..ID_OFFSET + 4].try_into().ok()?;
        Some(Self {
            id: BeaconId::from_be_bytes(id_bytes),
            sequence,
        })
    }

    /// Encode into the wire layout. Unspecified bytes are zero.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[TYPE_OFFSET] = BEACON_TYPE;
        frame[SEQ_OFFSET..SEQ_OFFSET + 4].copy_from_slice(&self.sequence.to_be_bytes());
        frame[ID_OFFSET..ID_OFFSET + 4].copy_from_slice(&self.id.to_be_bytes());
        frame
    }
}

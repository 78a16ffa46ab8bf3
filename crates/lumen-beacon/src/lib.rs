//! Lumen Beacon Primitives
//!
//! Identifiers, the hash oracle and XOR-distance bucketing shared by the
//! proximity engine.
//!
//! # Design
//!
//! Every badge broadcasts one opaque 32-bit [`BeaconId`] per beacon frame.
//! The oracle expands an id into a [`HashVector`] of [`HASH_SLOTS`]
//! independent 16-bit values, one per fixed salt. Slot 0 doubles as the
//! badge's *beacon hash*, the value the routing layer buckets on.
//!
//! # Bucketing
//!
//! Closeness between two beacon hashes is their XOR distance. The bucket
//! index counts the leading zero bits of that distance, so sharing a longer
//! hash prefix lands a peer in a higher (nearer) bucket. A 16-bit distance
//! space yields 16 prefix classes, truncated to [`BUCKET_COUNT`] usable
//! buckets: the two closest classes share the top bucket.

mod distance;
mod id;
mod oracle;

pub use distance::{bucket_index, xor_distance};
pub use id::BeaconId;
pub use oracle::{Blake3Oracle, HashOracle, HashVector, SLOT_SALTS};

/// Number of independent hash slots per beacon id.
pub const HASH_SLOTS: usize = 16;

/// Maximum representable XOR distance between two 16-bit hashes.
pub const MAX_DISTANCE: u16 = 0xffff;

/// Number of routing buckets.
pub const BUCKET_COUNT: usize = 15;

// The bucket index is derived from a 16-bit leading-zero count, so the
// bucket count can never exceed the distance width.
const _: () = assert!(BUCKET_COUNT <= 16);
const _: () = assert!(SLOT_SALTS.len() == HASH_SLOTS);

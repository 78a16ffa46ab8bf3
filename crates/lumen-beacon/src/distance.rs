//! XOR distance and bucket assignment.
//!
//! Two hashes are close when their XOR is small, i.e. when they share a
//! long prefix of high bits. The bucket index is the length of that shared
//! prefix, capped to the top bucket, so `bucket_index` maps a 16-bit
//! distance onto `[0, BUCKET_COUNT - 1]`: bucket 0 holds the farthest
//! peers, bucket `BUCKET_COUNT - 1` the nearest.

use crate::BUCKET_COUNT;

/// XOR distance between two 16-bit hashes.
pub const fn xor_distance(a: u16, b: u16) -> u16 {
    a ^ b
}

/// Bucket index for a peer hash relative to the local hash.
///
/// Counts the leading zero bits of the XOR distance, capped to
/// `BUCKET_COUNT - 1` (the two nearest prefix classes share the top
/// bucket). A zero distance (a self-echo, or a full hash collision)
/// maps to bucket 0 rather than the nearest bucket; see DESIGN.md for why
/// that historical quirk is kept.
///
/// # Examples
///
/// ```
/// use lumen_beacon::bucket_index;
///
/// assert_eq!(bucket_index(0x0001, 0x0000), 14); // distance 1: nearest
/// assert_eq!(bucket_index(0x0001, 0x8000), 0);  // top bit differs: farthest
/// assert_eq!(bucket_index(0x1234, 0x1234), 0);  // zero distance quirk
/// ```
pub const fn bucket_index(local: u16, peer: u16) -> usize {
    let x = xor_distance(local, peer);
    if x == 0 {
        return 0;
    }
    let zeros = x.leading_zeros() as usize;
    if zeros > BUCKET_COUNT - 1 {
        BUCKET_COUNT - 1
    } else {
        zeros
    }
}

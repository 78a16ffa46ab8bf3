//! Lumen Radio
//!
//! The beacon frame layout and the transport seam the engine polls.
//!
//! The radio itself - channel hopping, retransmission, anything with an
//! antenna - lives behind the [`Transport`] trait. This crate only knows
//! what a beacon frame looks like and how to fish a [`Beacon`] out of
//! one. Every other frame on the air is somebody else's traffic and is
//! dropped without comment.

mod config;
mod frame;
mod transport;

pub use config::RadioConfig;
pub use frame::{Beacon, BEACON_TYPE, FRAME_LEN};
pub use transport::{ScriptedTransport, Transport};

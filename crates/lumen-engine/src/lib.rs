//! Lumen Engine
//!
//! The session-owned state bundle and the cooperative polling loop that
//! drives the proximity applications.
//!
//! # Control flow
//!
//! One logical thread owns everything. The host alternates between two
//! calls:
//!
//! 1. [`Engine::scan_burst`] - polls the radio for a bounded number of
//!    iterations, folding each well-formed beacon into the population
//!    estimator and the machine sighting table, and offering it to the
//!    leveling gate.
//! 2. [`Engine::tick`] - advances the confirmation gesture by one tick,
//!    checking the cancel input at every boundary.
//!
//! Both calls return the display-facing [`EngineEvent`]s they produced;
//! nothing blocks, and no call runs longer than its iteration budget.
//! All state is owned exclusively by the engine and mutated only inside
//! these synchronous calls, so no locking is needed - a host that wants
//! concurrency must treat the whole engine as a single unit behind
//! message passing.

mod engine;
mod events;
mod input;
mod session;

pub use engine::{Engine, ScanConfig};
pub use events::{DisplaySnapshot, EngineEvent};
pub use input::{InputPoll, NoInput};
pub use session::SessionState;

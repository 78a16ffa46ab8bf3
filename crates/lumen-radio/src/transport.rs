//! The transport seam.

use bytes::Bytes;

/// A non-blocking source of raw radio frames.
///
/// One poll yields at most one frame; `None` means nothing is waiting
/// right now, not end-of-stream. Implementations must never block: the
/// engine's scan loop bounds its iteration count, not its wall-clock
/// time, and relies on polls returning promptly.
pub trait Transport {
    /// Take the next pending frame, if any.
    fn poll_frame(&mut self) -> Option<Bytes>;
}

/// A scripted transport: hands out a fixed sequence of frames.
///
/// Useful for tests and replay; implements the same seam a real radio
/// driver would.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    frames: std::collections::VecDeque<Bytes>,
}

impl ScriptedTransport {
    /// Create an empty scripted transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw frame for a later poll.
    pub fn push(&mut self, frame: impl Into<Bytes>) {
        self.frames.push_back(frame.into());
    }

    /// Number of frames still queued.
    pub fn pending(&self) -> usize {
        self.frames.len()
    }
}

impl Transport for ScriptedTransport {
    fn poll_frame(&mut self) -> Option<Bytes> {
        self.frames.pop_front()
    }
}

//! Request tagging for the "latest issued wins" discipline.
//!
//! The transport gives no ordering guarantee, so every outgoing request is
//! tagged with a [`RequestSeq`]. A response is applied only if its tag is
//! still the latest one issued by the same [`Sequencer`].

use serde::Serialize;

/// Monotonic tag attached to an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Raw counter value, for logging.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Issues [`RequestSeq`] values and decides which responses are current.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: u64,
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request. Every previously issued tag becomes stale.
    pub fn issue(&mut self) -> RequestSeq {
        self.latest += 1;
        RequestSeq(self.latest)
    }

    /// Whether a response tagged `seq` may still be applied.
    #[must_use]
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        seq.0 == self.latest
    }

    /// Make every outstanding tag stale without issuing a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

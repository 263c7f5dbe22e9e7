use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot "start acquisition" message.
///
/// The operator side raises it; the acquisition side polls with [`take`],
/// which observes and clears the slot in one atomic step, so each raise is
/// delivered to exactly one poll. Raising an already raised signal is a no-op.
///
/// [`take`]: StartSignal::take
#[derive(Debug, Default)]
pub struct StartSignal {
    pending: AtomicBool,
}

impl StartSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a start. Returns `false` if a request was already pending.
    pub fn raise(&self) -> bool {
        !self.pending.swap(true, Ordering::AcqRel)
    }

    /// Test-and-clear: `true` exactly once per pending request
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Observe without clearing
    pub fn peek(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

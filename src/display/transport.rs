//! Boundary between the display driver and the I²C collaborator.

use core::sync::atomic::{AtomicBool, Ordering};

/// Why the transport could not configure the bus or start a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Bus-level fault (arbitration loss, stuck line, unconfigured bus).
    Bus,
    /// The device did not acknowledge.
    Nack,
    /// A transaction is already outstanding.
    Busy,
    /// Address, speed or payload not supported by this transport.
    Unsupported,
}

/// Non-blocking, write-only I²C master used by the display driver.
///
/// `submit` starts one transaction and returns immediately. The outcome is
/// reported later by whoever owns the bus hardware calling
/// [`Completion::finish`]. Implementations must copy `bytes` before
/// returning; the driver reuses the buffer on the next tick.
pub trait Transport {
    /// Configure the bus for `address` at `speed_hz`.
    fn initialize(&mut self, address: u8, speed_hz: u32) -> Result<(), TransportError>;

    /// Start writing `bytes` to the configured device.
    fn submit(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

/// Completion flags shared between the tick context and the bus context.
///
/// The bus context only calls [`finish`](Self::finish): it stores the
/// status, then clears `busy` with release ordering. Everything else is
/// called from the tick context, which observes `busy` with acquire
/// ordering before it reads the status.
#[derive(Debug)]
pub struct Completion {
    busy: AtomicBool,
    failed: AtomicBool,
}

impl Completion {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            failed: AtomicBool::new(false),
        }
    }

    /// Mark a transaction as outstanding. Call before submitting it.
    pub fn arm(&self) {
        self.busy.store(true, Ordering::Relaxed);
    }

    /// Report the end of the outstanding transaction.
    pub fn finish(&self, ok: bool) {
        self.failed.store(!ok, Ordering::Relaxed);
        self.busy.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Consume the status of the last finished transaction.
    ///
    /// Returns `true` once per failure, so a recovered driver does not
    /// keep re-reading a stale failure.
    pub fn take_failure(&self) -> bool {
        self.failed.swap(false, Ordering::Relaxed)
    }

    /// Forget any outstanding or failed transaction.
    pub fn clear(&self) {
        self.failed.store(false, Ordering::Relaxed);
        self.busy.store(false, Ordering::Release);
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_is_reported_once() {
        let completion = Completion::new();
        completion.arm();
        assert!(completion.is_busy());

        completion.finish(false);
        assert!(!completion.is_busy());
        assert!(completion.take_failure());
        assert!(!completion.take_failure());
    }

    #[test]
    fn success_clears_previous_failure() {
        let completion = Completion::new();
        completion.arm();
        completion.finish(false);
        completion.arm();
        completion.finish(true);
        assert!(!completion.take_failure());
    }

    #[test]
    fn clear_drops_outstanding_transaction() {
        let completion = Completion::new();
        completion.arm();
        completion.clear();
        assert!(!completion.is_busy());
        assert!(!completion.take_failure());
    }
}

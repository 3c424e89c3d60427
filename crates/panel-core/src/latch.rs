//! One-shot button latches
//!
//! A press is recorded by the edge-event producer (an interrupt-driven task on
//! hardware, a stdin thread in the simulator) and consumed exactly once by the
//! request handler.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Single-producer, single-consumer press latch with capacity one.
///
/// Repeated presses before the next [`ButtonLatch::take`] collapse into one.
pub struct ButtonLatch {
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl ButtonLatch {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Record a press. Safe to call from any context that may take a
    /// critical section.
    pub fn press(&self) {
        self.signal.signal(());
    }

    /// Consume a pending press, clearing the latch.
    pub fn take(&self) -> bool {
        self.signal.try_take().is_some()
    }

    /// Whether a press is pending, without consuming it.
    pub fn is_set(&self) -> bool {
        self.signal.signaled()
    }
}

impl Default for ButtonLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// The two panel buttons
pub struct ButtonLatches {
    pub a: ButtonLatch,
    pub b: ButtonLatch,
}

impl ButtonLatches {
    pub const fn new() -> Self {
        Self {
            a: ButtonLatch::new(),
            b: ButtonLatch::new(),
        }
    }

    /// Take both latches at once.
    pub fn take(&self) -> Presses {
        Presses {
            a: self.a.take(),
            b: self.b.take(),
        }
    }
}

impl Default for ButtonLatches {
    fn default() -> Self {
        Self::new()
    }
}

/// Presses consumed by one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presses {
    pub a: bool,
    pub b: bool,
}

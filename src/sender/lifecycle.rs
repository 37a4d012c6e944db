//! `Connected → Started → Completed` tracking for leaf operations.

use core::sync::atomic::{AtomicU8, Ordering};

const CONNECTED: u8 = 0;
const STARTED: u8 = 1;
const COMPLETED: u8 = 2;

/// Lifecycle of one operation state. Each transition fires exactly once.
///
/// Completion may happen on a different thread than `start`, hence atomics.
pub(crate) struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub(crate) const fn new() -> Self {
        Self {
            state: AtomicU8::new(CONNECTED),
        }
    }

    /// `Connected → Started`; panics on a second start.
    #[track_caller]
    pub(crate) fn start(&self, subject: &'static str) {
        if let Err(seen) =
            self.state
                .compare_exchange(CONNECTED, STARTED, Ordering::AcqRel, Ordering::Acquire)
        {
            panic!(
                "contract violation: {subject} started twice (state {})",
                name(seen)
            );
        }
    }

    /// `Started → Completed`; panics when not started or already completed.
    #[track_caller]
    pub(crate) fn complete(&self, subject: &'static str) {
        if let Err(seen) =
            self.state
                .compare_exchange(STARTED, COMPLETED, Ordering::AcqRel, Ordering::Acquire)
        {
            panic!(
                "contract violation: {subject} completed from state {}",
                name(seen)
            );
        }
    }

    /// Started but not yet completed.
    pub(crate) fn in_flight(&self) -> bool {
        self.state.load(Ordering::Acquire) == STARTED
    }
}

fn name(state: u8) -> &'static str {
    match state {
        CONNECTED => "connected",
        STARTED => "started",
        _ => "completed",
    }
}

/// Abort if an operation whose node may still be linked is being dropped.
///
/// Unwinding here could free memory a run loop is about to execute.
pub(crate) fn abort_if_in_flight(lifecycle: &Lifecycle, subject: &'static str) {
    if lifecycle.in_flight() {
        tracing::error!(subject, "operation dropped while started and not completed");
        eprintln!("pex: {subject} dropped before completion; aborting");
        std::process::abort();
    }
}

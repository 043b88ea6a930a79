//! Wall-clock seam.
//!
//! The store stamps `createdAt`/`updatedAt` and drives the time-tracking
//! state machine from a `Clock` rather than calling `Utc::now()` inline, so
//! tests can simulate elapsed time deterministically.

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

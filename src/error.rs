// SPDX-License-Identifier: Apache-2.0
//! Error taxonomy for the virtual timer subsystem.
//!
//! The core is deliberately hard to fail: the only caller-visible fault is
//! capacity exhaustion on [`crate::api::OpenTimers::start`]. Everything else
//! (an out-of-range [`crate::slot::TimerId`] passed to `stop`/`set_period`, a
//! saturating tick conversion) is a silent no-op or a saturated value, per
//! the bounds-check-and-ignore contract the rest of this stack uses for
//! ISR-reachable paths.

use core::fmt;

/// Failure modes of the public timer API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The virtual timer table has no idle slot left.
    ///
    /// Mirrors the distinguished `TOO_MANY_TIMERS_ERROR` sentinel of the
    /// original C API; kept as a named variant instead of a magic id.
    TooManyTimers,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TooManyTimers => f.write_str("no free virtual timer slot"),
        }
    }
}

/// Result alias used throughout the public API.
pub type Result<T> = core::result::Result<T, Error>;

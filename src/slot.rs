// SPDX-License-Identifier: Apache-2.0
//! Logical timer slot: one entry of the virtual timer table.

use crate::hal::Ticks;

/// Stable handle to a slot. A weak reference: the slot behind an id may be
/// recycled after [`crate::api::OpenTimers::stop`], so ids must not be
/// retained across logical lifetimes. No generation counter is kept.
pub type TimerId = usize;

/// Distinguished sentinel for capacity exhaustion on `start`. Kept for
/// callers that match on the raw id; idiomatic callers should prefer
/// [`crate::error::Error::TooManyTimers`] via the `Result`-returning API.
pub const TOO_MANY_TIMERS_ERROR: TimerId = TimerId::MAX;

/// One-shot vs. periodic: a small closed sum, not a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires exactly once, then the slot becomes idle.
    OneShot,
    /// Fires every `period_ticks` until stopped.
    Periodic,
}

/// A nullary callback invoked from interrupt context on expiry.
///
/// Plain function pointers only, no captured state: the ISR context this
/// runs in has no allocator and no stack room to spare for a trait object's
/// vtable. Callbacks close over state through `static` globals or
/// `critical_section`-guarded cells instead.
pub type Callback = fn();

/// One entry of the fixed-capacity virtual timer table.
#[derive(Clone, Copy)]
pub(crate) struct TimerSlot {
    pub(crate) period_ticks: Ticks,
    pub(crate) ticks_remaining: Ticks,
    pub(crate) kind: TimerKind,
    pub(crate) is_running: bool,
    pub(crate) has_expired: bool,
    pub(crate) callback: Option<Callback>,
}

impl TimerSlot {
    pub(crate) const fn idle() -> Self {
        Self {
            period_ticks: 0,
            ticks_remaining: 0,
            kind: TimerKind::OneShot,
            is_running: false,
            has_expired: false,
            callback: None,
        }
    }
}

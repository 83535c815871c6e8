// SPDX-License-Identifier: Apache-2.0
//! Virtual Timer Table: a fixed-capacity, index-addressable container of
//! [`TimerSlot`]s. `N` is `MAX_NUM_TIMERS`, a compile-time constant so the
//! table needs no heap allocation.
//!
//! The table has no concurrency protection of its own: every entry point
//! here is only ever called with interrupts masked (foreground, via
//! [`crate::api::OpenTimers`]) or from the uninterruptible dispatcher ISR.

use crate::slot::{Callback, TimerId, TimerKind, TimerSlot};
use crate::hal::Ticks;

/// Fixed-capacity table of `N` logical timer slots.
pub(crate) struct VirtualTimers<const N: usize> {
    slots: [TimerSlot; N],
}

impl<const N: usize> VirtualTimers<N> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: [TimerSlot::idle(); N],
        }
    }

    /// Lowest-indexed idle slot, if any, populated and marked running.
    /// Returns the lowest free index.
    pub(crate) fn allocate(
        &mut self,
        period_ticks: Ticks,
        kind: TimerKind,
        callback: Callback,
    ) -> Option<TimerId> {
        let idx = self.slots.iter().position(|s| !s.is_running)?;
        self.slots[idx] = TimerSlot {
            period_ticks,
            ticks_remaining: period_ticks,
            kind,
            is_running: true,
            has_expired: false,
            callback: Some(callback),
        };
        Some(idx)
    }

    /// Mark a slot idle. Out-of-range ids and already-idle slots are
    /// silently ignored, so `stop` is idempotent.
    pub(crate) fn stop(&mut self, id: TimerId) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.is_running = false;
        }
    }

    /// Overwrite a slot's period without touching `ticks_remaining`. The
    /// new period takes effect on the next periodic reload, not the
    /// current cycle. Out-of-range ids are silently ignored. Clamped to at
    /// least one tick so a later periodic reload never re-arms the
    /// hardware with a zero delta.
    pub(crate) fn set_period(&mut self, id: TimerId, new_period_ticks: Ticks) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.period_ticks = new_period_ticks.max(1);
        }
    }

    pub(crate) fn is_running(&self, id: TimerId) -> bool {
        self.slots.get(id).map(|s| s.is_running).unwrap_or(false)
    }

    /// `true` iff at least one slot is running.
    pub(crate) fn any_running(&self) -> bool {
        self.slots.iter().any(|s| s.is_running)
    }

    /// The minimum `ticks_remaining` among running slots, and its index.
    /// Ties resolve to the lowest index, matching iteration order.
    ///
    /// Deliberately built on `Iterator::min_by_key` over an `Option`
    /// accumulator rather than an unguarded sentinel variable, so there is
    /// no uninitialised `min_timeout` local to reason about.
    pub(crate) fn min_running(&self) -> Option<(TimerId, Ticks)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_running)
            .map(|(i, s)| (i, s.ticks_remaining))
            .min_by_key(|&(_, remaining)| remaining)
    }

    pub(crate) fn len(&self) -> usize {
        N
    }

    pub(crate) fn slot_mut(&mut self, id: TimerId) -> Option<&mut TimerSlot> {
        self.slots.get_mut(id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimerSlot> {
        self.slots.iter_mut()
    }
}

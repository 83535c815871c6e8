// SPDX-License-Identifier: Apache-2.0
//! Public API: `start`, `stop`, `set_period`, each executing with
//! interrupts masked via a scoped `critical_section::with`, acquired on
//! entry and released on every exit path.

use crate::error::{Error, Result};
use crate::hal::{HardwareTimer, Ticks};
use crate::slot::{Callback, TimerId, TimerKind};
use crate::table::VirtualTimers;

/// Milliseconds-to-ticks conversion, saturating on overflow rather than
/// wrapping. A naive `duration_ms * TICS_PER_MS` in a narrow integer type
/// has no overflow check at all; this saturates instead.
pub(crate) fn ms_to_ticks(duration_ms: u32, tics_per_ms: u32) -> Ticks {
    duration_ms.saturating_mul(tics_per_ms)
}

/// The virtual timer manager: owns the slot table and the bookkeeping of
/// whether the hardware timer is currently armed.
///
/// `N` is `MAX_NUM_TIMERS`, `TICS_PER_MS` is the platform's tick rate. Both
/// are compile-time constants, so a board selects its capacity and
/// resolution at the type level rather than through a runtime config
/// struct.
pub struct OpenTimers<H: HardwareTimer, const N: usize, const TICS_PER_MS: u32> {
    hal: H,
    table: VirtualTimers<N>,
    running: bool,
    current_timeout: Ticks,
}

impl<H: HardwareTimer, const N: usize, const TICS_PER_MS: u32> OpenTimers<H, N, TICS_PER_MS> {
    /// Build the manager. Does not touch the HAL; call [`Self::init`] once
    /// at boot before any `start`/`stop`/`set_period` call.
    pub const fn new(hal: H) -> Self {
        Self {
            hal,
            table: VirtualTimers::new(),
            running: false,
            current_timeout: 0,
        }
    }

    /// One-time boot initialisation: registers the dispatcher as the HAL's
    /// callback. The HAL itself is left disarmed until the first `start`.
    ///
    /// # Safety
    /// `dispatch_entry` must be the function that calls
    /// [`Self::dispatch_from_isr`] on this exact instance. There is no way
    /// to express "points back to `self`" through a bare `fn()` pointer, so
    /// the board bring-up code is responsible for wiring them together
    /// correctly (see the `board` module for the canonical pattern).
    pub fn init(&self, dispatch_entry: fn()) {
        self.hal.register_callback(dispatch_entry);
    }

    /// Allocate the lowest-indexed idle slot and (re)arm the hardware as
    /// needed. Returns [`Error::TooManyTimers`] if the table is full.
    pub fn start(&mut self, duration_ms: u32, kind: TimerKind, callback: Callback) -> Result<TimerId> {
        critical_section::with(|_cs| self.start_locked(duration_ms, kind, callback))
    }

    fn start_locked(&mut self, duration_ms: u32, kind: TimerKind, callback: Callback) -> Result<TimerId> {
        let ticks = ms_to_ticks(duration_ms, TICS_PER_MS).max(1);
        let id = self.table.allocate(ticks, kind, callback).ok_or_else(|| {
            #[cfg(feature = "log")]
            log::warn!("opentimers: start() rejected, table of {N} slots is full");
            Error::TooManyTimers
        })?;

        if !self.running {
            self.hal.reset();
            self.hal.schedule_in(ticks);
            self.current_timeout = ticks;
            self.running = true;
        } else if ticks < self.current_timeout {
            // The newly armed interval is measured from "now", not from
            // the last compare boundary. Other slots' `ticks_remaining`
            // are not retroactively adjusted; they're decremented by the
            // original `current_timeout` on the next tick, a bounded
            // overestimate.
            self.hal.schedule_in(ticks);
            self.current_timeout = ticks;
        }
        Ok(id)
    }

    /// Mark a slot idle. Idempotent; out-of-range ids are silently
    /// ignored. Does not recompute the next deadline; at worst the
    /// hardware fires one harmless early wake.
    pub fn stop(&mut self, id: TimerId) {
        critical_section::with(|_cs| self.table.stop(id));
    }

    /// Overwrite a slot's period. Does not alter `ticks_remaining`; takes
    /// effect on the slot's next periodic reload.
    pub fn set_period(&mut self, id: TimerId, new_period_ticks: Ticks) {
        critical_section::with(|_cs| self.table.set_period(id, new_period_ticks));
    }

    /// Whether `id` currently names a running slot.
    pub fn is_running(&self, id: TimerId) -> bool {
        self.table.is_running(id)
    }

    /// Whether the underlying hardware timer is currently armed.
    pub fn hardware_running(&self) -> bool {
        self.running
    }

    /// Run one dispatch cycle. Call this, and only this, from the HAL's
    /// registered interrupt callback (see [`Self::init`]). It is the ISR
    /// entry point and assumes it is already running with interrupts
    /// masked, per the HAL's contract.
    pub fn dispatch_from_isr(&mut self) {
        match crate::dispatcher::dispatch(&mut self.table, &self.hal, self.current_timeout) {
            Some(next_timeout) => self.current_timeout = next_timeout,
            None => self.running = false,
        }
    }
}

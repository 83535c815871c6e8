// SPDX-License-Identifier: Apache-2.0
//! Hardware Timer HAL: the narrow port the dispatcher is built on.
//!
//! One free-running counter with a single compare register and one
//! registered callback hook, not a SysTick-style overflow-counted monotonic
//! clock.
//!
//! The trait lets the dispatcher and public API stay generic over "the real
//! peripheral" and "a host-side mock", so the virtual timer table is reused
//! unchanged by both a target build and a host test build.

/// Tick type of the underlying counter. A plain `u32` covers the
/// `PORT_TIMER_WIDTH` of every board this crate targets (16 or 32 bits);
/// narrower counters simply don't use the top bits.
pub type Ticks = u32;

/// A single hardware comparator, as consumed by the dispatcher.
pub trait HardwareTimer {
    /// Zero the underlying counter and disarm any pending compare.
    fn reset(&self);

    /// Arm a compare match `delta_ticks` from *now*. Overwrites any
    /// previously pending compare. `delta_ticks` must be non-zero.
    fn schedule_in(&self, delta_ticks: Ticks);

    /// Install the dispatcher entry point. Called exactly once, during
    /// board bring-up, before interrupts are unmasked.
    fn register_callback(&self, callback: fn());

    /// How many ticks have elapsed on the live counter since the last
    /// `schedule_in`/`reset`, if the backend can report it.
    ///
    /// Not used by the dispatch path today; the re-arm skew on `start`'s
    /// shorter-deadline path is accepted rather than compensated. Left as a
    /// seam for a precision-sensitive backend that wants to compensate other
    /// slots' `ticks_remaining` instead of tolerating the bounded skew. The
    /// default backends report `0`.
    fn read_elapsed(&self) -> Ticks {
        0
    }
}

/// Host-side stand-in for the hardware comparator.
///
/// Tests poke `armed`/`fired` directly to simulate compare-match events and
/// to assert on what the dispatcher last programmed.
pub struct MockTimer {
    armed: core::cell::Cell<Option<u32>>,
    callback: core::cell::Cell<Option<fn()>>,
    reset_count: core::cell::Cell<u32>,
}

impl MockTimer {
    pub const fn new() -> Self {
        Self {
            armed: core::cell::Cell::new(None),
            callback: core::cell::Cell::new(None),
            reset_count: core::cell::Cell::new(0),
        }
    }

    /// The delta, in ticks, the dispatcher most recently armed, if any.
    pub fn armed_delta(&self) -> Option<u32> {
        self.armed.get()
    }

    /// How many times `reset()` has been called.
    pub fn reset_count(&self) -> u32 {
        self.reset_count.get()
    }

    /// Simulate a compare-match interrupt firing right now.
    ///
    /// Panics if no callback was registered, mirroring the HAL's contract
    /// that a compare can only be scheduled after `register_callback`.
    pub fn fire(&self) {
        let cb = self.callback.get().expect("no dispatcher callback registered");
        cb();
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareTimer for MockTimer {
    fn reset(&self) {
        self.armed.set(None);
        self.reset_count.set(self.reset_count.get() + 1);
    }

    fn schedule_in(&self, delta_ticks: u32) {
        debug_assert!(delta_ticks > 0, "schedule_in requires a non-zero delta");
        self.armed.set(Some(delta_ticks));
    }

    fn register_callback(&self, callback: fn()) {
        self.callback.set(Some(callback));
    }
}

/// Cortex-M backend built on a generic 32-bit compare-match timer
/// peripheral: a free-running counter, a single compare register, and a
/// callback hook, rather than the SysTick-overflow-counting shape.
///
/// The actual register block is board-specific and out of scope for this
/// crate. `CompareRegisters` is the seam a board crate implements to plug
/// its real comparator in.
#[cfg(feature = "cortex-m")]
pub trait CompareRegisters {
    /// Read the free-running counter's current value.
    fn counter(&self) -> u32;
    /// Program the compare register to `value`.
    fn set_compare(&self, value: u32);
    /// Enable the compare interrupt.
    fn enable_interrupt(&self);
    /// Disable the compare interrupt.
    fn disable_interrupt(&self);
}

/// A [`HardwareTimer`] over any board's [`CompareRegisters`].
#[cfg(feature = "cortex-m")]
pub struct CortexMTimer<R: CompareRegisters> {
    regs: R,
    callback: core::cell::Cell<Option<fn()>>,
}

#[cfg(feature = "cortex-m")]
impl<R: CompareRegisters> CortexMTimer<R> {
    pub const fn new(regs: R) -> Self {
        Self {
            regs,
            callback: core::cell::Cell::new(None),
        }
    }

    /// Call from the comparator's interrupt vector.
    pub fn on_interrupt(&self) {
        self.regs.disable_interrupt();
        if let Some(cb) = self.callback.get() {
            cb();
        }
    }
}

#[cfg(feature = "cortex-m")]
impl<R: CompareRegisters> HardwareTimer for CortexMTimer<R> {
    fn reset(&self) {
        self.regs.disable_interrupt();
        self.regs.set_compare(0);
    }

    fn schedule_in(&self, delta_ticks: u32) {
        debug_assert!(delta_ticks > 0, "schedule_in requires a non-zero delta");
        let target = self.regs.counter().wrapping_add(delta_ticks);
        self.regs.set_compare(target);
        self.regs.enable_interrupt();
    }

    fn register_callback(&self, callback: fn()) {
        self.callback.set(Some(callback));
    }
}

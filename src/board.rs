// SPDX-License-Identifier: Apache-2.0
//! Board bring-up: install ISR vectors, initialise the HAL, unmask
//! interrupts, sleep between events. Peripheral bring-up beyond the timer
//! (LEDs, UART, SPI, radio, IPv6, MAC) is an external collaborator and is
//! represented only as a seam, never implemented here.
//!
//! Follows an `#[cortex_m_rt::entry] fn main` / `#[cortex_m_rt::exception]`
//! split: bring-up steps run with interrupts masked, then interrupts are
//! unmasked and the idle loop sleeps between events.

/// One step of board-specific bring-up, run in order at boot before
/// interrupts are unmasked. A board crate supplies its own closures for
/// whichever peripherals it actually has (LEDs, UART, SPI, radio, ...);
/// this type only names the seam.
pub type BringupStep = fn();

/// Runs `steps` in order, then unmasks global interrupts.
///
/// Every step here executes with interrupts still masked, so each one is
/// free to touch shared state without a critical section of its own:
/// nothing can preempt bring-up before interrupts are unmasked.
///
/// # Safety
/// Must be called exactly once, from the reset handler, before any other
/// code observes interrupts as unmasked.
pub unsafe fn bring_up(steps: &[BringupStep]) {
    #[cfg(feature = "log")]
    log::debug!("opentimers: running {} bring-up step(s)", steps.len());
    for step in steps {
        step();
    }
    unsafe {
        cortex_m::interrupt::enable();
    }
    #[cfg(feature = "log")]
    log::debug!("opentimers: bring-up complete, interrupts unmasked");
}

/// Put the CPU to sleep until the next interrupt (`wfi`).
///
/// Used as the idle loop's only suspension point: the foreground never
/// blocks anywhere else. Relies on the board having configured a low-power
/// mode that keeps the timer's clock source alive; that configuration is
/// out of this crate's scope and must be done by one of the
/// `BringupStep`s above.
pub fn sleep_until_interrupt() {
    cortex_m::asm::wfi();
}

/// Raise/lower a debug pin around an ISR body, for the common "toggle a
/// debug GPIO before/after" wrapper convention in an ISR vector table. The
/// pin itself is a board-specific collaborator; this just sequences the
/// calls around it.
pub fn with_debug_pin<F: FnOnce()>(raise: fn(), lower: fn(), isr_body: F) {
    raise();
    isr_body();
    lower();
}

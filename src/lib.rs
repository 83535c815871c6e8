// SPDX-License-Identifier: Apache-2.0
#![no_std]

//! Virtual software-timer multiplexer for low-power wireless motes.
//!
//! A single hardware comparator ([`hal::HardwareTimer`]) is virtualized to
//! support an arbitrary bounded number of independent one-shot or periodic
//! logical timers ([`slot::TimerKind`]), each dispatching a user callback
//! from interrupt context. See [`api::OpenTimers`] for the entry point.

pub mod api;
pub mod error;
pub mod hal;
pub mod slot;

pub(crate) mod dispatcher;
pub(crate) mod table;

#[cfg(feature = "cortex-m")]
pub mod board;

pub use api::OpenTimers;
pub use error::{Error, Result};
pub use hal::{HardwareTimer, MockTimer, Ticks};
pub use slot::{Callback, TimerId, TimerKind, TOO_MANY_TIMERS_ERROR};

#[cfg(feature = "cortex-m")]
pub use hal::{CompareRegisters, CortexMTimer};

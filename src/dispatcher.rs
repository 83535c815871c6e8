// SPDX-License-Identifier: Apache-2.0
//! Dispatcher: the ISR-context routine that advances counters, fires
//! callbacks, and re-arms the hardware. Runs to completion without
//! re-entry; the HAL guarantees no re-entrant compare.

use crate::hal::{HardwareTimer, Ticks};
use crate::slot::TimerKind;
use crate::table::VirtualTimers;

/// Run one dispatch cycle against `table`/`hal`, given the `current_timeout`
/// the hardware was last armed with (the elapsed interval since the
/// previous compare event). Returns the new `current_timeout` to store,
/// or `None` if no slot remained running (the hardware is left disarmed).
///
/// Phases, in order:
///   1. mark expired slots, decrement the rest,
///   2. dispatch callbacks for expired slots, reload-or-retire them,
///   3. find the next minimum deadline among slots left running,
///   4. re-arm the HAL, or report the subsystem has gone idle.
///
/// Callbacks may call `start`/`stop`/`set_period` (including on their own
/// slot or a slot that hasn't been reached yet in phase 2). That mutation
/// is observed by later iterations of phase 2 and by phase 3 on this same
/// dispatch.
pub(crate) fn dispatch<const N: usize>(
    table: &mut VirtualTimers<N>,
    hal: &impl HardwareTimer,
    current_timeout: Ticks,
) -> Option<Ticks> {
    // Phase 1: mark expired, decrement survivors.
    for slot in table.iter_mut() {
        if !slot.is_running {
            continue;
        }
        if slot.ticks_remaining <= current_timeout {
            slot.has_expired = true;
        } else {
            slot.ticks_remaining -= current_timeout;
        }
    }

    // Phase 2: dispatch in slot-index order. Re-reads `table` by index on
    // every iteration so a callback's own mutations (including to slots
    // not yet visited) are observed immediately, which covers same-tick
    // `stop`/`start` calls from an earlier callback.
    for idx in 0..table.len() {
        let slot = table.slot_mut(idx).expect("idx < table.len()");
        // A slot a lower-index callback has since stopped is no longer
        // running even though `has_expired` may still be set from phase 1;
        // that stop must suppress this firing.
        let due = slot.has_expired && slot.is_running;
        // Clear the transient flag unconditionally so it reads false
        // between dispatches even for a slot that was marked expired but
        // then stopped before its turn.
        slot.has_expired = false;
        let callback = slot.callback;

        if !due {
            continue;
        }
        if let Some(callback) = callback {
            callback();
        }
        let slot = table.slot_mut(idx).expect("idx < table.len()");
        match slot.kind {
            TimerKind::Periodic => slot.ticks_remaining = slot.period_ticks,
            TimerKind::OneShot => slot.is_running = false,
        }
    }

    // Phase 3: next deadline among whatever is still (or newly) running.
    let next = table.min_running();

    // Phase 4: re-arm, or go idle.
    match next {
        Some((_, min_timeout)) => {
            hal.schedule_in(min_timeout);
            Some(min_timeout)
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockTimer;
    use crate::slot::TimerKind;
    use core::sync::atomic::{AtomicU32, Ordering};

    static FIRED: AtomicU32 = AtomicU32::new(0);
    static ORDER: core::sync::atomic::AtomicU32 = core::sync::atomic::AtomicU32::new(0);
    static FIRST_FIRED_AT: AtomicU32 = AtomicU32::new(u32::MAX);
    static SECOND_FIRED_AT: AtomicU32 = AtomicU32::new(u32::MAX);

    fn record_first() {
        let order = ORDER.fetch_add(1, Ordering::SeqCst);
        FIRST_FIRED_AT.store(order, Ordering::SeqCst);
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    fn record_second() {
        let order = ORDER.fetch_add(1, Ordering::SeqCst);
        SECOND_FIRED_AT.store(order, Ordering::SeqCst);
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    fn reset_globals() {
        FIRED.store(0, Ordering::SeqCst);
        ORDER.store(0, Ordering::SeqCst);
        FIRST_FIRED_AT.store(u32::MAX, Ordering::SeqCst);
        SECOND_FIRED_AT.store(u32::MAX, Ordering::SeqCst);
    }

    #[test]
    fn single_oneshot_fires_once_then_idles() {
        reset_globals();
        let mut table: VirtualTimers<4> = VirtualTimers::new();
        let hal = MockTimer::new();
        table.allocate(100, TimerKind::OneShot, record_first);

        let next = dispatch(&mut table, &hal, 100);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
        assert_eq!(next, None);
        assert!(!table.any_running());
    }

    #[test]
    fn periodic_timer_reloads_after_firing() {
        reset_globals();
        let mut table: VirtualTimers<4> = VirtualTimers::new();
        let hal = MockTimer::new();
        table.allocate(20, TimerKind::Periodic, record_first);

        let next = dispatch(&mut table, &hal, 20);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
        assert_eq!(next, Some(20));
        assert!(table.any_running());
    }

    #[test]
    fn co_expiring_slots_both_fire_in_index_order() {
        reset_globals();
        let mut table: VirtualTimers<4> = VirtualTimers::new();
        let hal = MockTimer::new();
        table.allocate(50, TimerKind::OneShot, record_first);
        table.allocate(50, TimerKind::OneShot, record_second);

        dispatch(&mut table, &hal, 50);
        assert_eq!(FIRED.load(Ordering::SeqCst), 2);
        assert!(FIRST_FIRED_AT.load(Ordering::SeqCst) < SECOND_FIRED_AT.load(Ordering::SeqCst));
    }

    #[test]
    fn non_expired_slot_is_only_decremented() {
        reset_globals();
        let mut table: VirtualTimers<4> = VirtualTimers::new();
        let hal = MockTimer::new();
        table.allocate(100, TimerKind::OneShot, record_first);
        table.allocate(50, TimerKind::OneShot, record_second);

        // Shortest deadline (50) is what the hardware was armed with.
        let next = dispatch(&mut table, &hal, 50);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
        // Remaining slot (id 0) should have 50 ticks left, now the new minimum.
        assert_eq!(next, Some(50));
    }

    #[test]
    fn stopped_slot_with_stale_expired_flag_does_not_fire() {
        // Simulates a lower-index callback that already called `stop` on a
        // higher-index slot before phase 2 reaches it: phase 1 marked it
        // expired, but it must not fire.
        reset_globals();
        let mut table: VirtualTimers<4> = VirtualTimers::new();
        let hal = MockTimer::new();

        table.allocate(10, TimerKind::OneShot, record_first);
        table.allocate(10, TimerKind::OneShot, record_second);
        table.stop(1); // simulate: slot 0's callback already suppressed slot 1
        table.iter_mut().nth(1).unwrap().has_expired = true; // stale flag must not fire a stopped slot

        dispatch(&mut table, &hal, 10);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    }
}

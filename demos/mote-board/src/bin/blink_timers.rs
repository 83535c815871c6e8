//! Reference bring-up sequence for `opentimers`: a
//! `#[cortex_m_rt::entry] fn main` that brings the board up once, and a
//! single exception vector that feeds the dispatcher.
//!
//! This binary has no vendor HAL dependency, so the "hardware" comparator
//! is a software one driven off SysTick's 1kHz exception. Real boards
//! substitute their own `CompareRegisters` impl over an actual free-running
//! counter and keep everything below `main` unchanged.
#![no_main]
#![no_std]

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use cortex_m::interrupt::Mutex;
use cortex_m_rt::{entry, exception};
use rtt_target::{rprintln, rtt_init_log};

use opentimers::{board, CompareRegisters, CortexMTimer, OpenTimers, TimerKind};

/// 1kHz software counter, advanced by the SysTick exception below. Stands
/// in for a real free-running peripheral counter.
static TICKS: AtomicU32 = AtomicU32::new(0);
static COMPARE: AtomicU32 = AtomicU32::new(0);
static ARMED: AtomicBool = AtomicBool::new(false);

struct SoftCompare;

impl CompareRegisters for SoftCompare {
    fn counter(&self) -> u32 {
        TICKS.load(Ordering::Relaxed)
    }

    fn set_compare(&self, value: u32) {
        COMPARE.store(value, Ordering::Relaxed);
    }

    fn enable_interrupt(&self) {
        ARMED.store(true, Ordering::Relaxed);
    }

    fn disable_interrupt(&self) {
        ARMED.store(false, Ordering::Relaxed);
    }
}

type Motes = OpenTimers<CortexMTimer<SoftCompare>, 8, 1>;

static TIMERS: Mutex<RefCell<Option<Motes>>> = Mutex::new(RefCell::new(None));

fn blink_fast() {
    rprintln!("blink: fast one-shot fired");
}

fn blink_slow() {
    rprintln!("blink: slow periodic fired");
}

fn dispatch_entry() {
    cortex_m::interrupt::free(|cs| {
        if let Some(motes) = TIMERS.borrow(cs).borrow_mut().as_mut() {
            motes.dispatch_from_isr();
        }
    });
}

#[entry]
fn main() -> ! {
    rtt_init_log!();
    rprintln!("opentimers demo: bring-up starting");

    let motes = Motes::new(CortexMTimer::new(SoftCompare));
    motes.init(dispatch_entry);
    cortex_m::interrupt::free(|cs| {
        *TIMERS.borrow(cs).borrow_mut() = Some(motes);
    });

    unsafe {
        board::bring_up(&[configure_systick]);
    }

    cortex_m::interrupt::free(|cs| {
        let mut slot = TIMERS.borrow(cs).borrow_mut();
        let motes = slot.as_mut().expect("bring_up initialised TIMERS");
        motes.start(250, TimerKind::OneShot, blink_fast).unwrap();
        motes.start(1000, TimerKind::Periodic, blink_slow).unwrap();
    });

    loop {
        board::sleep_until_interrupt();
    }
}

fn configure_systick() {
    let mut syst = unsafe { cortex_m::Peripherals::steal() }.SYST;
    syst.set_clock_source(cortex_m::peripheral::syst::SystClkSource::Core);
    syst.set_reload(cortex_m::peripheral::SYST::get_ticks_per_10ms() / 10);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

#[exception]
fn SysTick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
    if ARMED.load(Ordering::Relaxed) && TICKS.load(Ordering::Relaxed) >= COMPARE.load(Ordering::Relaxed) {
        // Mirrors `CortexMTimer::on_interrupt`'s own first step: disarm
        // before running the callback, since `dispatch_from_isr` may
        // re-arm for the next deadline before returning.
        ARMED.store(false, Ordering::Relaxed);
        dispatch_entry();
    }
}

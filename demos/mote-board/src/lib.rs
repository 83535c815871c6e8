#![no_main]
#![no_std]

use panic_rtt_target as _;

#[cortex_m_rt::exception]
unsafe fn HardFault(_frame: &cortex_m_rt::ExceptionFrame) -> ! {
    loop {}
}

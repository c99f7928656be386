//! Worker threads behind the engine: one blinks, one expires flashes.
//!
//! Neither thread holds the engine mutex while it waits; each wakes,
//! takes the lock briefly, and goes back to waiting.  The expiry worker
//! parks on the `embassy-sync` channel through `block_on`; the blink
//! worker parks on the rearm latch with a timeout of one half-period.
//!
//! The blink worker never learns about pushes and pops directly.  It
//! re-reads the arming (period + epoch) before every wait, and the
//! engine notifies the latch whenever the arming may have changed — a
//! parked worker wakes at once and picks up the new cadence instead of
//! sleeping out the old one.

use std::thread;
use std::time::Duration;

use futures_lite::future::block_on;
use log::debug;

use crate::drivers::task_pin;

use super::engine::StatusLed;
use super::{FLASH_PULSE_MS, LedWriter};

/// Worker stack size.  The loops only sleep, lock and log.
const WORKER_STACK_KB: usize = 6;
/// Above the idle/main priority so cadence holds under load, below the
/// protocol stacks.
const WORKER_PRIORITY: u8 = 6;

/// Spawn both workers for `led`.  Threads run for the engine's lifetime,
/// which on this firmware is the device's lifetime.
pub(super) fn spawn<W: LedWriter>(led: StatusLed<W>) -> std::io::Result<()> {
    let blink = led.clone();
    let _ = task_pin::spawn_on_core(
        task_pin::Core::App,
        WORKER_PRIORITY,
        WORKER_STACK_KB,
        "led-blink\0",
        move || blink_loop(&blink),
    )?;
    let _ = task_pin::spawn_on_core(
        task_pin::Core::App,
        WORKER_PRIORITY,
        WORKER_STACK_KB,
        "led-flash\0",
        move || expiry_loop(&led),
    )?;
    Ok(())
}

/// Wait one half-period, toggle, repeat.  Parks on the rearm latch
/// while the top of the stack is solid.
fn blink_loop<W: LedWriter>(led: &StatusLed<W>) {
    debug!("led-blink worker up");
    loop {
        match led.armed_blink() {
            None => led.shared().rearm.wait(),
            Some((period_ms, epoch)) => {
                // A notify ending the wait early means the arming
                // changed; re-read it instead of firing a stale tick.
                let interrupted = led
                    .shared()
                    .rearm
                    .wait_timeout(Duration::from_millis(u64::from(period_ms)));
                if !interrupted {
                    led.blink_tick(epoch);
                }
            }
        }
    }
}

/// Receive one expiry token per `flash()`, wait out the pulse window,
/// then pop the overlay like any other caller would.
fn expiry_loop<W: LedWriter>(led: &StatusLed<W>) {
    debug!("led-flash worker up");
    loop {
        let _token = block_on(led.shared().expiry.receive());
        thread::sleep(Duration::from_millis(u64::from(FLASH_PULSE_MS)));
        led.off();
    }
}

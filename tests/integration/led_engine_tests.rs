//! Integration tests for the status LED engine.
//!
//! These run on the host (x86_64) with a recording writer in place of
//! the LEDC channels.  The blink and pulse workers are real threads, so
//! timing assertions use generous polling deadlines rather than exact
//! sleeps.

use std::time::Duration;

use envirolog::led::{Color, LedStats, StatusLed, BLINK_FAST_MS, BLINK_SLOW_MS, STACK_DEPTH};

use crate::mock_led::{ready_led, wait_for_base, RecordingLed, WriteLog};

// ── Stack discipline ──────────────────────────────────────────

#[test]
fn render_follows_every_stack_mutation() {
    let (led, log) = ready_led();
    assert_eq!(log.last(), Some(Color::BLACK), "base renders on startup");

    assert!(led.on(Color::BLUE));
    assert_eq!(led.rendered(), Color::BLUE);

    assert!(led.on(Color::RED));
    assert_eq!(led.rendered(), Color::RED);

    led.off();
    assert_eq!(led.rendered(), Color::BLUE, "pop re-renders the new top");

    led.off();
    assert_eq!(led.rendered(), Color::BLACK);
    assert_eq!(led.overlay_depth(), 0);
}

#[test]
fn off_at_base_is_a_no_op() {
    let (led, log) = ready_led();
    let writes_after_init = log.len();

    led.off();
    led.off();

    assert_eq!(led.rendered(), Color::BLACK);
    assert_eq!(
        log.len(),
        writes_after_init,
        "popping an empty stack must not touch the hardware"
    );
}

#[test]
fn overlay_capacity_is_enforced() {
    let (led, _log) = ready_led();

    for _ in 0..STACK_DEPTH - 1 {
        assert!(led.on(Color::GREEN));
    }
    assert_eq!(led.overlay_depth(), STACK_DEPTH - 1);

    assert!(!led.on(Color::RED), "overflow push must be refused");
    assert_eq!(led.rendered(), Color::GREEN, "top is unchanged on refusal");
    assert_eq!(
        led.stats(),
        LedStats {
            overflow_drops: 1,
            expiry_drops: 0
        }
    );
}

#[test]
fn uninitialized_engine_is_inert() {
    let log = WriteLog::default();
    let led = StatusLed::new(RecordingLed::from_log(&log));

    assert!(!led.on(Color::BLUE));
    assert!(!led.flash(Color::RED));
    led.off();
    led.blink(200);

    assert_eq!(log.len(), 0, "nothing may reach the hardware before init");
    assert_eq!(led.overlay_depth(), 0);
}

#[test]
fn initialize_is_idempotent() {
    let (led, log) = ready_led();
    let writes = log.len();

    assert!(led.initialize(), "second call reports ready");
    assert_eq!(log.len(), writes, "no re-render on repeat initialize");
}

// ── Flash (transient pulse) ───────────────────────────────────

#[test]
fn flash_shows_then_pops_automatically() {
    let (led, _log) = ready_led();

    assert!(led.flash(Color::WHITE));
    assert_eq!(led.rendered(), Color::WHITE);
    assert_eq!(led.overlay_depth(), 1);

    wait_for_base(&led);
    assert_eq!(led.rendered(), Color::BLACK);
}

#[test]
fn flash_restores_the_previous_status() {
    let (led, _log) = ready_led();

    assert!(led.on(Color::GREEN));
    assert!(led.flash(Color::BLUE));
    assert_eq!(led.rendered(), Color::BLUE);

    let deadline = std::time::Instant::now() + Duration::from_secs(3);
    while led.overlay_depth() > 1 {
        assert!(std::time::Instant::now() < deadline, "pulse never expired");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(led.rendered(), Color::GREEN);
}

#[test]
fn flash_burst_drains_back_to_base() {
    let (led, _log) = ready_led();

    let mut accepted = 0;
    for _ in 0..STACK_DEPTH + 5 {
        if led.flash(Color::ORANGE) {
            accepted += 1;
        }
    }
    assert!(accepted >= 1);
    assert!(
        led.overlay_depth() <= STACK_DEPTH - 1,
        "burst must never exceed capacity"
    );

    wait_for_base(&led);
    assert_eq!(led.rendered(), Color::BLACK);
}

// ── Blink ─────────────────────────────────────────────────────

#[test]
fn blink_toggles_between_color_and_dark() {
    let (led, log) = ready_led();

    assert!(led.on(Color::BLUE));
    log.clear();
    led.blink(BLINK_FAST_MS);

    log.wait_for("four dark phases", |w| {
        w.iter().filter(|c| **c == Color::BLACK).count() >= 4
    });
    log.wait_for("four bright phases", |w| {
        w.iter().filter(|c| **c == Color::BLUE).count() >= 4
    });
    assert!(led.is_blinking());
}

#[test]
fn blink_reconfigure_switches_cadence() {
    let (led, log) = ready_led();

    assert!(led.on(Color::YELLOW));
    led.blink(BLINK_SLOW_MS);
    led.blink(BLINK_FAST_MS);
    log.clear();

    // Eight toggles arrive well inside the deadline at the fast cadence
    // but would need several seconds at the slow one.
    log.wait_for("eight fast toggles", |w| w.len() >= 8);
}

#[test]
fn rearm_interrupts_a_long_half_period() {
    let (led, log) = ready_led();

    // Park the worker inside a one-minute half-period, then re-arm at
    // the fast cadence.  The worker must pick up the new period at once
    // instead of sleeping out the old one.
    assert!(led.on(Color::YELLOW));
    led.blink(60_000);
    std::thread::sleep(Duration::from_millis(50));
    led.blink(BLINK_FAST_MS);
    log.clear();

    log.wait_for("six fast toggles", |w| w.len() >= 6);
}

#[test]
fn stop_clears_cadence_and_optionally_pops() {
    let (led, _log) = ready_led();

    led.blink_color(Color::YELLOW, BLINK_SLOW_MS);
    assert!(led.is_blinking());

    led.stop(false);
    assert!(!led.is_blinking());
    assert_eq!(led.rendered(), Color::YELLOW, "entry stays, now solid");
    assert_eq!(led.overlay_depth(), 1);

    led.blink(BLINK_SLOW_MS);
    led.stop(true);
    assert_eq!(led.overlay_depth(), 0);
    assert_eq!(led.rendered(), Color::BLACK);
}

#[test]
fn blink_at_base_is_refused() {
    let (led, log) = ready_led();
    log.clear();

    led.blink(BLINK_FAST_MS);
    std::thread::sleep(Duration::from_millis(100));

    assert!(!led.is_blinking(), "the base never blinks");
    assert_eq!(log.len(), 0);
}

// ── Disable ───────────────────────────────────────────────────

#[test]
fn disable_mid_blink_goes_dark_and_stays_dark() {
    let (led, log) = ready_led();

    led.blink_color(Color::RED, BLINK_FAST_MS);
    log.wait_for("a couple of toggles", |w| w.len() >= 2);

    led.set_disabled(true);
    assert_eq!(led.rendered(), Color::BLACK);
    assert_eq!(led.overlay_depth(), 0);

    log.clear();
    std::thread::sleep(Duration::from_millis(300));
    assert_eq!(
        log.len(),
        0,
        "a fenced-off blink timer must not write after disable"
    );
}

#[test]
fn disabled_engine_refuses_status_changes() {
    let (led, _log) = ready_led();
    led.set_disabled(true);

    assert!(!led.on(Color::GREEN));
    assert!(!led.flash(Color::BLUE));
    assert_eq!(led.overlay_depth(), 0);

    led.set_disabled(false);
    assert!(led.on(Color::GREEN));
    assert_eq!(led.rendered(), Color::GREEN);
}

// ── Concurrency ───────────────────────────────────────────────

#[test]
fn concurrent_hammer_leaves_consistent_state() {
    let (led, _log) = ready_led();

    let mut handles = Vec::new();
    for worker in 0..4u32 {
        let led = led.clone();
        handles.push(std::thread::spawn(move || {
            for i in 0..30u32 {
                match (worker + i) % 4 {
                    0 => {
                        let _ = led.on(Color::GREEN);
                    }
                    1 => led.off(),
                    2 => {
                        let _ = led.flash(Color::BLUE);
                    }
                    _ => led.blink(BLINK_FAST_MS),
                }
                std::thread::sleep(Duration::from_millis(1));
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert!(led.overlay_depth() <= STACK_DEPTH - 1);

    led.set_disabled(true);
    assert_eq!(led.overlay_depth(), 0);
    assert_eq!(led.rendered(), Color::BLACK);
}

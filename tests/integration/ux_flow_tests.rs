//! Integration tests for the user-facing flows: button escalation,
//! settings session bracketing, and battery indication.
//!
//! The real LED engine runs underneath; assertions stick to solid
//! states and stack depth so blink phase timing cannot flake them.

use envirolog::adapters::led_sink::LedEventSink;
use envirolog::adapters::nvs::NvsAdapter;
use envirolog::app::escalation::{EscalationAction, ResetEscalation, SettingsSession};
use envirolog::app::events::AppEvent;
use envirolog::app::ports::{ConfigPort, EventSink, FuelGaugePort, GaugeError};
use envirolog::app::{battery, escalation, preferences};
use envirolog::drivers::button::{ButtonEvent, UserButton};
use envirolog::led::Color;

use crate::mock_led::{ready_led, wait_for_base};

// ── Escalation ────────────────────────────────────────────────

#[test]
fn full_hold_escalates_to_restart() {
    let (led, _log) = ready_led();
    let mut esc = ResetEscalation::new();

    for n in 1..=3u16 {
        let action = esc.handle(ButtonEvent::HeldIncrement(n), &led);
        assert_eq!(action, EscalationAction::None);
        assert!(led.is_blinking(), "stage {} should blink", n);
    }

    let action = esc.handle(ButtonEvent::HeldIncrement(4), &led);
    assert_eq!(action, EscalationAction::Restart);
    assert!(!led.is_blinking(), "commit stage is solid");
    assert_eq!(led.rendered(), Color::RED);
}

#[test]
fn early_release_backs_out_cleanly() {
    let (led, _log) = ready_led();
    let mut esc = ResetEscalation::new();

    esc.handle(ButtonEvent::HeldIncrement(1), &led);
    esc.handle(ButtonEvent::HeldIncrement(2), &led);
    assert!(esc.armed());

    let action = esc.handle(ButtonEvent::Released(2), &led);
    assert_eq!(action, EscalationAction::None);
    assert!(!esc.armed());
    assert_eq!(led.overlay_depth(), 0);
    assert_eq!(led.rendered(), Color::BLACK);
}

#[test]
fn momentary_press_requests_settings_toggle() {
    let (led, _log) = ready_led();
    let mut esc = ResetEscalation::new();

    let action = esc.handle(ButtonEvent::MomentaryPress, &led);
    assert_eq!(action, EscalationAction::ToggleSettings);
    assert_eq!(led.overlay_depth(), 0, "escalation itself leaves the LED alone");
}

#[test]
fn settings_session_brackets_with_light_gray() {
    let (led, _log) = ready_led();
    let mut session = SettingsSession::new();

    assert!(session.toggle(&led), "first toggle opens");
    assert!(session.is_open());
    assert_eq!(led.rendered(), Color::LIGHT_GRAY);

    assert!(!session.toggle(&led), "second toggle closes");
    assert_eq!(led.rendered(), Color::BLACK);
    assert_eq!(led.overlay_depth(), 0);
}

// ── Button pipeline: raw edges → escalation → LED ─────────────

#[test]
fn held_button_walks_the_whole_escalation() {
    let (led, _log) = ready_led();
    let mut button = UserButton::new(5);
    let mut esc = ResetEscalation::new();

    assert!(button.on_edge(true, 1_000).is_none(), "press alone emits nothing");

    let mut last_action = EscalationAction::None;
    for n in 1..=4u32 {
        let ev = button
            .poll(1_000 + n * 5_000)
            .expect("increment must fire at each boundary");
        assert_eq!(ev, ButtonEvent::HeldIncrement(n as u16));
        last_action = esc.handle(ev, &led);
    }

    assert_eq!(last_action, EscalationAction::Restart);
    assert_eq!(led.rendered(), Color::RED);
}

#[test]
fn tap_produces_momentary_press_only() {
    let (led, _log) = ready_led();
    let mut button = UserButton::new(5);
    let mut esc = ResetEscalation::new();

    assert!(button.on_edge(true, 500).is_none());
    let ev = button.on_edge(false, 900).expect("release classifies the press");
    assert_eq!(ev, ButtonEvent::MomentaryPress);

    let action = esc.handle(ev, &led);
    assert_eq!(action, EscalationAction::ToggleSettings);
    assert_eq!(led.overlay_depth(), 0);
}

#[test]
fn abandoned_hold_turns_the_led_back_off() {
    let (led, _log) = ready_led();
    let mut button = UserButton::new(5);
    let mut esc = ResetEscalation::new();

    button.on_edge(true, 0);
    let ev = button.poll(5_001).unwrap();
    esc.handle(ev, &led);
    assert!(led.is_blinking());

    let ev = button.on_edge(false, 7_000).expect("long release classifies");
    assert_eq!(ev, ButtonEvent::Released(1));
    esc.handle(ev, &led);

    assert_eq!(led.overlay_depth(), 0);
    assert_eq!(led.rendered(), Color::BLACK);
}

// ── Battery → sink → LED ──────────────────────────────────────

struct FixedGauge(f32);

impl FuelGaugePort for FixedGauge {
    fn state_of_charge(&mut self) -> Result<f32, GaugeError> {
        Ok(self.0)
    }

    fn cell_voltage_mv(&mut self) -> Result<u32, GaugeError> {
        Ok(3_700)
    }
}

struct DeadGauge;

impl FuelGaugePort for DeadGauge {
    fn state_of_charge(&mut self) -> Result<f32, GaugeError> {
        Err(GaugeError::Bus)
    }

    fn cell_voltage_mv(&mut self) -> Result<u32, GaugeError> {
        Err(GaugeError::Bus)
    }
}

#[test]
fn battery_check_flashes_the_threshold_colour() {
    let (led, _log) = ready_led();
    let mut sink = LedEventSink::new(led.clone(), 10.0, 50.0);

    battery::check_battery(&mut FixedGauge(7.0), &mut sink);
    assert_eq!(led.rendered(), Color::RED);
    wait_for_base(&led);

    battery::check_battery(&mut FixedGauge(35.0), &mut sink);
    assert_eq!(led.rendered(), Color::YELLOW);
    wait_for_base(&led);

    battery::check_battery(&mut FixedGauge(88.0), &mut sink);
    assert_eq!(led.rendered(), Color::GREEN);
    wait_for_base(&led);
}

#[test]
fn dead_gauge_leaves_the_led_alone() {
    let (led, log) = ready_led();
    let mut sink = LedEventSink::new(led.clone(), 10.0, 50.0);
    log.clear();

    battery::check_battery(&mut DeadGauge, &mut sink);

    assert_eq!(led.overlay_depth(), 0);
    assert_eq!(log.len(), 0, "a failed reading must not flash anything");
}

#[test]
fn sink_flash_survives_escalation_in_progress() {
    let (led, _log) = ready_led();
    let mut sink = LedEventSink::new(led.clone(), 10.0, 50.0);
    let mut esc = ResetEscalation::new();

    esc.handle(ButtonEvent::HeldIncrement(1), &led);
    sink.emit(&AppEvent::ErrorLogged);
    assert_eq!(led.rendered(), Color::RED, "flash overlays the blink");
    assert_eq!(led.overlay_depth(), 2);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(3);
    while led.overlay_depth() > 1 {
        assert!(std::time::Instant::now() < deadline, "pulse never expired");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    assert!(led.is_blinking(), "the escalation stage keeps blinking underneath");

    esc.handle(ButtonEvent::Released(1), &led);
    assert_eq!(led.overlay_depth(), 0);
}

// ── LED preference: runtime toggle + persistence ──────────────

#[test]
fn led_preference_toggle_gates_the_engine_and_persists() {
    let (led, _log) = ready_led();
    let nvs = NvsAdapter::new().unwrap();
    let mut config = nvs.load().unwrap();
    assert!(config.led_enabled, "factory default is enabled");

    assert!(!preferences::toggle_led_enabled(&mut config, &nvs, &led));
    assert!(led.disabled());
    assert!(!led.on(Color::GREEN), "disabled engine refuses indications");
    assert!(
        !nvs.load().unwrap().led_enabled,
        "the choice survives a config reload"
    );

    assert!(preferences::toggle_led_enabled(&mut config, &nvs, &led));
    assert!(!led.disabled());
    assert!(led.on(Color::GREEN));
    assert_eq!(led.rendered(), Color::GREEN);
    assert!(nvs.load().unwrap().led_enabled);
}

#[test]
fn restart_stage_constant_matches_increment_count() {
    // Four held increments commit the restart; the constant is part of
    // the public contract used by the main loop.
    assert_eq!(escalation::RESTART_INCREMENTS, 4);
}

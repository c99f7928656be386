//! EnviroLog Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  LedEventSink   GaugeAdapter   NvsAdapter      Esp32Time       │
//! │  (EventSink)    (FuelGauge)    (Config+NVS)    (uptime)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Policies (pure logic)                     │    │
//! │  │  Battery thresholds · Reset escalation · Settings      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  StatusLed engine (stack + blink/flash workers)                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod events;
mod pins;

pub mod app;
mod adapters;
mod drivers;
pub mod led;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{debug, info, warn};

use adapters::device_id::DeviceId;
#[cfg(target_os = "espidf")]
use adapters::gauge::GaugeAdapter;
use adapters::led_sink::LedEventSink;
use adapters::nvs::NvsAdapter;
use adapters::time::Esp32TimeAdapter;
use app::battery;
use app::escalation::{EscalationAction, ResetEscalation, SettingsSession};
use app::events::AppEvent;
use app::ports::{ConfigPort, EventSink};
use app::preferences;
use config::SystemConfig;
use drivers::button::UserButton;
#[cfg(target_os = "espidf")]
use drivers::fuel_gauge::Max17048;
use drivers::status_led::{StatusLedDriver, DEFAULT_BRIGHTNESS};
use events::{push_event, Event};
use led::{Color, LedWriter, StatusLed};

#[cfg(not(target_os = "espidf"))]
use app::ports::{FuelGaugePort, GaugeError};

// ── Escalation / settings plumbing ────────────────────────────
//
// Classified button activity funnels through here.  With the settings
// session closed, events feed the reset escalation; with it open, the
// hold gesture edits the LED preference instead.  The escalation
// tracker drives the LED itself; apply_action translates the resulting
// action into system behaviour (settings session bracket, config
// persistence, device restart).

fn handle_button_event<W: LedWriter>(
    ev: drivers::button::ButtonEvent,
    session: &mut SettingsSession,
    escalation: &mut ResetEscalation,
    led: &StatusLed<W>,
    sink: &mut LedEventSink<W>,
    nvs: &NvsAdapter,
    config: &mut SystemConfig,
) {
    use drivers::button::ButtonEvent;

    if session.is_open() {
        match ev {
            ButtonEvent::MomentaryPress => {
                apply_action(
                    EscalationAction::ToggleSettings,
                    session,
                    led,
                    sink,
                    nvs,
                    config,
                );
            }
            // First hold increment inside the session flips the LED
            // preference and persists it; further increments wait for
            // the next press.
            ButtonEvent::HeldIncrement(1) => {
                let _ = preferences::toggle_led_enabled(config, nvs, led);
            }
            ButtonEvent::HeldIncrement(_) | ButtonEvent::Released(_) => {}
        }
        return;
    }

    let action = escalation.handle(ev, led);
    apply_action(action, session, led, sink, nvs, config);
}

fn apply_action<W: LedWriter>(
    action: EscalationAction,
    session: &mut SettingsSession,
    led: &StatusLed<W>,
    sink: &mut LedEventSink<W>,
    nvs: &NvsAdapter,
    config: &SystemConfig,
) {
    match action {
        EscalationAction::None => {}
        EscalationAction::ToggleSettings => {
            if session.toggle(led) {
                info!("BTN | settings session opened");
            } else {
                info!("BTN | settings session closed, persisting config");
                if let Err(e) = nvs.save(config) {
                    warn!("BTN | config save failed: {}", e);
                    sink.emit(&AppEvent::ErrorLogged);
                }
            }
        }
        EscalationAction::Restart => {
            warn!("BTN | restart hold confirmed, restarting now");
            #[cfg(target_os = "espidf")]
            unsafe {
                esp_idf_svc::sys::esp_restart();
            }
        }
    }
}

// On non-ESP targets there is no I2C bus; the gauge port reports
// NotReady so the battery policy exercises its skip path.
#[cfg(not(target_os = "espidf"))]
struct SimGauge;

#[cfg(not(target_os = "espidf"))]
impl FuelGaugePort for SimGauge {
    fn state_of_charge(&mut self) -> std::result::Result<f32, GaugeError> {
        Err(GaugeError::NotReady)
    }

    fn cell_voltage_mv(&mut self) -> std::result::Result<u32, GaugeError> {
        Err(GaugeError::NotReady)
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  EnviroLog v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    debug!(
        "pins: LED R/G/B={}/{}/{} BTN={} I2C SDA/SCL={}/{}",
        pins::LED_R_GPIO,
        pins::LED_G_GPIO,
        pins::LED_B_GPIO,
        pins::BUTTON_GPIO,
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
    );

    // ── 1b. Initialise hardware peripherals ───────────────────
    // LED/button bring-up failure is not fatal for a data logger:
    // the LED engine simply stays inert and logging continues.
    let hw_ok = match drivers::hw_init::init_peripherals() {
        Ok(()) => true,
        Err(e) => {
            log::error!("HAL init failed: {} — running without status LED", e);
            false
        }
    };
    if let Err(e) = drivers::hw_init::init_isr_service() {
        log::error!("ISR service init failed: {} — continuing without button", e);
    }

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!(
                "NVS init failed ({}), running with defaults and no persistence",
                e
            );
            // Continue without NVS — config will not be persisted this
            // session.  On next reboot, NVS should self-heal.
            NvsAdapter::default()
        }
    };
    let mut config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    debug!(
        "config: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );

    // ── 3. Device identity ────────────────────────────────────
    let dev_id = DeviceId::from_efuse();
    info!("Device ID: {}", dev_id);

    // ── 4. Status LED engine ──────────────────────────────────
    let status = StatusLed::new(StatusLedDriver::new(DEFAULT_BRIGHTNESS));
    if hw_ok {
        if !status.initialize() {
            warn!("status LED engine failed to start, continuing without it");
        }
        status.set_disabled(!config.led_enabled);
        // Green while the rest of the system comes up.
        let _ = status.on(Color::GREEN);
    }

    // ── 5. Battery fuel gauge (I2C) ───────────────────────────
    #[cfg(target_os = "espidf")]
    let mut gauge = {
        use esp_idf_hal::gpio::AnyIOPin;
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::peripherals::Peripherals;
        use esp_idf_hal::prelude::*;

        match Peripherals::take() {
            Ok(p) => {
                let i2c_cfg = I2cConfig::new().baudrate(100.kHz().into());
                // SAFETY: the pin-map constants name free I2C-capable pins;
                // nothing else in the firmware claims them.
                let (sda, scl) = unsafe {
                    (
                        AnyIOPin::new(pins::I2C_SDA_GPIO),
                        AnyIOPin::new(pins::I2C_SCL_GPIO),
                    )
                };
                match I2cDriver::new(p.i2c0, sda, scl, &i2c_cfg) {
                    Ok(bus) => {
                        let mut mx = Max17048::new(bus);
                        match mx.version() {
                            Ok(v) => info!("MAX17048 present (version 0x{:04X})", v),
                            Err(_) => {
                                warn!("MAX17048 not responding, battery checks will fail soft");
                            }
                        }
                        Some(GaugeAdapter::new(mx))
                    }
                    Err(e) => {
                        warn!("I2C init failed ({}), no battery telemetry", e);
                        None
                    }
                }
            }
            Err(e) => {
                warn!("peripherals unavailable ({}), no battery telemetry", e);
                None
            }
        }
    };
    #[cfg(not(target_os = "espidf"))]
    let mut gauge = Some(SimGauge);

    // ── 6. Policies and adapters ──────────────────────────────
    let time = Esp32TimeAdapter::new();
    let mut sink = LedEventSink::new(
        status.clone(),
        config.battery_low_percent,
        config.battery_warn_percent,
    );
    let mut button = UserButton::new(config.button_increment_secs);
    let mut escalation = ResetEscalation::new();
    let mut session = SettingsSession::new();

    // Boot indication done; first battery reading straight away.
    status.off();
    push_event(Event::BatteryCheckTick);
    info!("System ready. Entering event loop.");

    // ── 7. Event loop ─────────────────────────────────────────
    let tick_ms = config.loop_tick_interval_ms;
    let battery_interval_ms = config.battery_check_interval_secs.saturating_mul(1000);
    let mut battery_elapsed_ms: u32 = 0;

    loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(tick_ms)));
        let now_ms = time.uptime_ms();

        battery_elapsed_ms = battery_elapsed_ms.saturating_add(tick_ms);
        if battery_elapsed_ms >= battery_interval_ms {
            push_event(Event::BatteryCheckTick);
            battery_elapsed_ms = 0;
        }

        // Process all pending events.
        events::drain_events(|event| match event {
            Event::ButtonDown => {
                if let Some(ev) = button.on_edge(true, now_ms) {
                    handle_button_event(
                        ev,
                        &mut session,
                        &mut escalation,
                        &status,
                        &mut sink,
                        &nvs,
                        &mut config,
                    );
                }
            }
            Event::ButtonUp => {
                if let Some(ev) = button.on_edge(false, now_ms) {
                    handle_button_event(
                        ev,
                        &mut session,
                        &mut escalation,
                        &status,
                        &mut sink,
                        &nvs,
                        &mut config,
                    );
                }
            }
            Event::BatteryCheckTick => {
                if let Some(g) = gauge.as_mut() {
                    battery::check_battery(g, &mut sink);
                }
            }
        });

        // Long-hold increments are time-driven, not edge-driven.
        if let Some(ev) = button.poll(now_ms) {
            handle_button_event(
                ev,
                &mut session,
                &mut escalation,
                &status,
                &mut sink,
                &nvs,
                &mut config,
            );
        }
    }
}

//! Persisted user preferences applied at runtime.
//!
//! The LED enable flag is the one preference a user can change on the
//! device itself (hold the button inside an open settings session).
//! Changing it does three things in order: flip the config field, gate
//! or re-arm the LED engine, and write the config back through the
//! config port so the choice survives a reboot.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;
use crate::led::{LedWriter, StatusLed};

/// Set the LED enable preference, apply it to the engine, and persist.
/// Returns the persistence outcome; the in-memory config and the engine
/// are updated even when the save fails (the choice still holds until
/// the next reboot, and the failure is logged).
pub fn set_led_enabled<W: LedWriter>(
    config: &mut SystemConfig,
    port: &impl ConfigPort,
    led: &StatusLed<W>,
    enable: bool,
) -> Result<(), ConfigError> {
    if config.led_enabled == enable {
        return Ok(());
    }
    config.led_enabled = enable;
    led.set_disabled(!enable);
    info!(
        "PREF | status LED {}",
        if enable { "enabled" } else { "disabled" }
    );
    port.save(config).inspect_err(|err| {
        warn!("PREF | led_enabled not persisted: {err}");
    })
}

/// Toggle the LED enable preference.  Returns the new state.
pub fn toggle_led_enabled<W: LedWriter>(
    config: &mut SystemConfig,
    port: &impl ConfigPort,
    led: &StatusLed<W>,
) -> bool {
    let enable = !config.led_enabled;
    let _ = set_led_enabled(config, port, led, enable);
    enable
}

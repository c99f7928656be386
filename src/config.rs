//! System configuration parameters
//!
//! All tunable parameters for the EnviroLog firmware.
//! Values can be overridden via NVS (non-volatile storage) from the
//! on-device settings session.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Status LED ---
    /// Whether the status LED indicates at all (user preference; the
    /// logger itself keeps running with the LED dark).
    pub led_enabled: bool,

    // --- User button ---
    /// Hold time between successive long-press increments (seconds)
    pub button_increment_secs: u16,

    // --- Battery ---
    /// Battery check cadence (seconds)
    pub battery_check_interval_secs: u32,
    /// At or below this state of charge the battery flash shows yellow
    pub battery_warn_percent: f32,
    /// At or below this state of charge the battery flash shows red
    pub battery_low_percent: f32,

    // --- Timing ---
    /// Main loop tick interval (milliseconds)
    pub loop_tick_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Status LED
            led_enabled: true,

            // Button
            button_increment_secs: 5,

            // Battery
            battery_check_interval_secs: 60,
            battery_warn_percent: 50.0,
            battery_low_percent: 10.0,

            // Timing
            loop_tick_interval_ms: 20, // 50 Hz, keeps button timing crisp
        }
    }
}

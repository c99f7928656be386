//! RGB status LED driver.
//!
//! Three LEDC PWM channels drive a discrete common-cathode RGB LED.  A
//! global brightness scale keeps the indicator readable without lighting
//! up the room — the enclosure puts the LED behind a light pipe.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: duty writes go to the LEDC channels configured by
//! `hw_init`.  On host/test: `hw_init::ledc_set` is a no-op and the
//! driver just tracks the last scaled output.

use crate::drivers::hw_init;
use crate::led::{Color, LedWriter};

/// Factory brightness (out of 255), matching the light-pipe calibration.
pub const DEFAULT_BRIGHTNESS: u8 = 20;

pub struct StatusLedDriver {
    brightness: u8,
    current: (u8, u8, u8),
}

impl StatusLedDriver {
    pub fn new(brightness: u8) -> Self {
        Self {
            brightness,
            current: (0, 0, 0),
        }
    }

    /// Last duty triple written to the channels (after brightness
    /// scaling).
    pub fn current_rgb(&self) -> (u8, u8, u8) {
        self.current
    }

    fn scale(&self, channel: u8) -> u8 {
        ((u16::from(channel) * u16::from(self.brightness)) / 255) as u8
    }
}

impl LedWriter for StatusLedDriver {
    fn write(&mut self, color: Color) {
        let rgb = (
            self.scale(color.r()),
            self.scale(color.g()),
            self.scale(color.b()),
        );
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, rgb.0);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, rgb.1);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, rgb.2);
        self.current = rgb;
    }
}

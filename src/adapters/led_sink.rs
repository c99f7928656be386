//! LED-based event sink adapter.
//!
//! Implements [`EventSink`] by translating application events into short
//! status-LED flashes, mirroring how the serial log narrates the same
//! events in text. A future MQTT or display adapter would implement the
//! same trait.
//!
//! Colour vocabulary:
//!
//! | Event          | Flash colour             |
//! |----------------|--------------------------|
//! | `ErrorLogged`  | red                      |
//! | `WarningLogged`| yellow                   |
//! | `NetworkSent`  | blue                     |
//! | `SampleStored` | gray                     |
//! | `BatteryLevel` | green / yellow / red     |

use log::{debug, info};

use crate::app::battery::color_for_charge;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::led::{Color, LedWriter, StatusLed};

/// Adapter that flashes the status LED for every [`AppEvent`].
pub struct LedEventSink<W: LedWriter> {
    led: StatusLed<W>,
    battery_low_percent: f32,
    battery_warn_percent: f32,
}

impl<W: LedWriter> LedEventSink<W> {
    pub fn new(led: StatusLed<W>, battery_low_percent: f32, battery_warn_percent: f32) -> Self {
        Self {
            led,
            battery_low_percent,
            battery_warn_percent,
        }
    }
}

impl<W: LedWriter> EventSink for LedEventSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        // A refused flash (engine not ready, or pulse queue full) is
        // already counted and logged by the engine itself.
        match event {
            // No log call on the error path: the error has been logged
            // already by whoever raised it, and a sink that logs errors
            // while reacting to ErrorLogged would chase its own tail.
            AppEvent::ErrorLogged => {
                let _ = self.led.flash(Color::RED);
            }
            AppEvent::WarningLogged => {
                let _ = self.led.flash(Color::YELLOW);
            }
            AppEvent::NetworkSent => {
                debug!("SINK | network send -> blue flash");
                let _ = self.led.flash(Color::BLUE);
            }
            AppEvent::SampleStored => {
                debug!("SINK | sample stored -> gray flash");
                let _ = self.led.flash(Color::GRAY);
            }
            AppEvent::BatteryLevel(percent) => {
                let color = color_for_charge(
                    *percent,
                    self.battery_low_percent,
                    self.battery_warn_percent,
                );
                info!("BATT | {:.1}% -> {} flash", percent, color);
                let _ = self.led.flash(color);
            }
        }
    }
}

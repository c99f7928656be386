//! Battery state-of-charge policy.
//!
//! Every battery cadence tick the main loop reads the fuel gauge and
//! reports the level through the event sink; the LED sink picks the
//! flash colour with [`color_for_charge`].  Thresholds come from
//! [`SystemConfig`](crate::config::SystemConfig) so field units can be
//! tuned without a firmware build.

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, FuelGaugePort};
use crate::led::Color;

/// Map a state of charge to the indication colour: red at or below the
/// low threshold, yellow at or below the warn threshold, green above.
pub fn color_for_charge(percent: f32, low_percent: f32, warn_percent: f32) -> Color {
    if percent <= low_percent {
        Color::RED
    } else if percent <= warn_percent {
        Color::YELLOW
    } else {
        Color::GREEN
    }
}

/// Read the gauge once and report.  A failed read is logged and skipped;
/// the next cadence tick retries.
pub fn check_battery(gauge: &mut impl FuelGaugePort, sink: &mut impl EventSink) {
    match gauge.state_of_charge() {
        Ok(percent) => sink.emit(&AppEvent::BatteryLevel(percent)),
        Err(err) => warn!("battery check skipped: {err}"),
    }
}

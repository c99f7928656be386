//! Button hold escalation toward a device restart.
//!
//! Holding the user button walks through warning stages, each one more
//! urgent on the LED; releasing before the final stage backs out.  The
//! momentary tap, by contrast, toggles the on-device settings session.
//!
//! | Increment | LED                       | Meaning                 |
//! |-----------|---------------------------|-------------------------|
//! | 1         | yellow, slow blink        | restart armed           |
//! | 2         | yellow, medium blink      | keep holding…           |
//! | 3         | yellow, fast blink        | last chance to release  |
//! | 4         | solid red                 | restart commits         |
//!
//! The policy only talks to the LED engine and reports an
//! [`EscalationAction`]; actually restarting the device stays in the
//! composition root.

use crate::drivers::button::ButtonEvent;
use crate::led::{BLINK_FAST_MS, BLINK_MEDIUM_MS, BLINK_SLOW_MS, Color, LedWriter, StatusLed};

/// Hold increments before the restart commits.
pub const RESTART_INCREMENTS: u16 = 4;

/// What the main loop must do after feeding one button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationAction {
    None,
    /// Momentary tap: open or close the settings session.
    ToggleSettings,
    /// Final stage reached: restart the device.
    Restart,
}

pub struct ResetEscalation {
    stage: u16,
}

impl ResetEscalation {
    pub fn new() -> Self {
        Self { stage: 0 }
    }

    /// True once an escalation overlay is on the LED.
    pub fn armed(&self) -> bool {
        self.stage > 0
    }

    /// Feed one classified button event and drive the LED accordingly.
    pub fn handle<W: LedWriter>(
        &mut self,
        event: ButtonEvent,
        led: &StatusLed<W>,
    ) -> EscalationAction {
        match event {
            ButtonEvent::MomentaryPress => EscalationAction::ToggleSettings,
            ButtonEvent::HeldIncrement(n) => self.advance(n, led),
            ButtonEvent::Released(_) => {
                if (1..RESTART_INCREMENTS).contains(&self.stage) {
                    led.off();
                    self.stage = 0;
                }
                EscalationAction::None
            }
        }
    }

    fn advance<W: LedWriter>(&mut self, increment: u16, led: &StatusLed<W>) -> EscalationAction {
        if self.stage >= RESTART_INCREMENTS {
            // Restart already committed; ignore the stragglers.
            return EscalationAction::None;
        }
        self.stage = increment;
        match increment {
            1 => {
                led.blink_color(Color::YELLOW, BLINK_SLOW_MS);
                EscalationAction::None
            }
            2 => {
                led.blink(BLINK_MEDIUM_MS);
                EscalationAction::None
            }
            3 => {
                led.blink(BLINK_FAST_MS);
                EscalationAction::None
            }
            _ => {
                led.stop(false);
                let _ = led.on(Color::RED);
                EscalationAction::Restart
            }
        }
    }
}

/// On-device settings session, bracketed on the LED with light gray.
pub struct SettingsSession {
    open: bool,
}

impl SettingsSession {
    pub fn new() -> Self {
        Self { open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Toggle the session; returns whether it is open afterwards.
    pub fn toggle<W: LedWriter>(&mut self, led: &StatusLed<W>) -> bool {
        if self.open {
            led.off();
        } else {
            let _ = led.on(Color::LIGHT_GRAY);
        }
        self.open = !self.open;
        self.open
    }
}

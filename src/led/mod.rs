//! Status LED engine.
//!
//! Owns the board's RGB status LED and layers indications on a bounded
//! LIFO stack of colour states, so a nested subsystem can overlay its own
//! indication and later restore whatever it covered:
//!
//! ```text
//!  on() / off()      ┌────────────────┐   write()   ┌────────────┐
//!  blink() / flash() │  StatusLed     │────────────▶│  LedWriter │──▶ PWM
//!  ─────────────────▶│  (colour stack)│             └────────────┘
//!                    └───────┬────────┘
//!              ┌─────────────┴───────────────┐
//!        blink worker                 flash-expiry worker
//!        (toggles the phase)          (pops ~100 ms later)
//! ```
//!
//! The LED always shows the top of the stack (the base entry is black and
//! can never be removed).  Every mutation re-renders the top and retimes
//! the blink worker inside the same critical section, so observers never
//! see a stale colour.
//!
//! ## Execution contexts
//!
//! | Context            | Role                                        |
//! |--------------------|---------------------------------------------|
//! | API callers        | push/pop/retime under the engine mutex      |
//! | blink worker       | sleeps one half-period, toggles the phase   |
//! | flash-expiry worker| waits on the expiry queue, then `off()`     |

pub mod engine;
pub mod stack;
mod worker;

pub use engine::{LedStats, StatusLed};
pub use stack::{ColorState, StatusStack, STACK_DEPTH};

use core::fmt;

/// 24-bit RGB colour, stored as `0x00RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0x0000_0000);
    pub const BLUE: Color = Color::rgb(0x0000_00FF);
    pub const GREEN: Color = Color::rgb(0x0000_8000);
    pub const YELLOW: Color = Color::rgb(0x00FF_FF00);
    pub const RED: Color = Color::rgb(0x00FF_0000);
    pub const GRAY: Color = Color::rgb(0x0080_8080);
    pub const LIGHT_GRAY: Color = Color::rgb(0x0077_8899);
    pub const ORANGE: Color = Color::rgb(0x00FF_A500);
    pub const WHITE: Color = Color::rgb(0x00FF_FFFF);
    pub const PURPLE: Color = Color::rgb(0x0080_0080);

    /// Build a colour from a packed `0xRRGGBB` value.  The top byte is
    /// ignored so palette constants can be written as plain hex.
    pub const fn rgb(packed: u32) -> Self {
        Self(packed & 0x00FF_FFFF)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

// ── Blink cadences (half-period per timer fire) ───────────────

/// Slow attention blink — first stage of the reset escalation.
pub const BLINK_SLOW_MS: u32 = 600;
/// Medium blink — second escalation stage.
pub const BLINK_MEDIUM_MS: u32 = 200;
/// Fast blink — final warning before the escalation commits.
pub const BLINK_FAST_MS: u32 = 80;

/// How long a `flash()` overlay stays up before the expiry worker pops it.
pub const FLASH_PULSE_MS: u32 = 100;

/// Output seam for the engine.  The device adapter drives LEDC PWM; tests
/// substitute a recording fake.  Writes are infallible — anything that can
/// fail belongs in the writer's constructor.
pub trait LedWriter: Send + 'static {
    fn write(&mut self, color: Color);
}

//! GPIO / peripheral pin assignments for the EnviroLog main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, common cathode, one LEDC channel per color)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 4;
pub const LED_G_GPIO: i32 = 5;
pub const LED_B_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// User button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: short press opens/closes the settings session,
/// long press escalates toward a device restart.
pub const BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// I²C bus (MAX17048 fuel gauge, environmental sensor header)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;

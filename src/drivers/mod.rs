//! Hardware drivers, peripheral bring-up, and thread helpers.

pub mod button;
pub mod fuel_gauge;
pub mod hw_init;
pub mod status_led;
pub mod task_pin;

//! Fuel-gauge port adapter.
//!
//! Wraps the raw [`Max17048`] register driver behind [`FuelGaugePort`]
//! so the battery policy stays generic over the bus and its error type.

use embedded_hal::i2c::I2c;

use crate::app::ports::{FuelGaugePort, GaugeError};
use crate::drivers::fuel_gauge::Max17048;

pub struct GaugeAdapter<I2C> {
    gauge: Max17048<I2C>,
}

impl<I2C: I2c> GaugeAdapter<I2C> {
    pub fn new(gauge: Max17048<I2C>) -> Self {
        Self { gauge }
    }
}

impl<I2C: I2c> FuelGaugePort for GaugeAdapter<I2C> {
    fn state_of_charge(&mut self) -> Result<f32, GaugeError> {
        self.gauge.state_of_charge().map_err(|_| GaugeError::Bus)
    }

    fn cell_voltage_mv(&mut self) -> Result<u32, GaugeError> {
        self.gauge.cell_voltage_mv().map_err(|_| GaugeError::Bus)
    }
}

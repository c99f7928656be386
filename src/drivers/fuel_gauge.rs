//! MAX17048 LiPo fuel gauge driver.
//!
//! Minimal register access over I²C: state of charge for the battery
//! indication policy, cell voltage and chip version for the boot log.
//! Generic over `embedded-hal`'s `I2c`, so the same driver runs against
//! `esp-idf-hal` on the device and a scripted mock in tests.
//!
//! The MAX17048 ModelGauge runs entirely on-chip; there is no
//! calibration or configuration to push.  First valid SOC appears a few
//! hundred ms after power-on, which boot comfortably exceeds.

use embedded_hal::i2c::I2c;

/// Fixed 7-bit bus address (not strappable on this part).
pub const MAX17048_ADDR: u8 = 0x36;

const REG_VCELL: u8 = 0x02;
const REG_SOC: u8 = 0x04;
const REG_VERSION: u8 = 0x08;

pub struct Max17048<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Max17048<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// State of charge in percent.  LSB = 1/256 %; fresh cells can read
    /// slightly above 100.
    pub fn state_of_charge(&mut self) -> Result<f32, I2C::Error> {
        Ok(f32::from(self.read_register(REG_SOC)?) / 256.0)
    }

    /// Cell voltage in millivolts.  LSB = 78.125 µV.
    pub fn cell_voltage_mv(&mut self) -> Result<u32, I2C::Error> {
        let raw = self.read_register(REG_VCELL)?;
        Ok((u64::from(raw) * 78_125 / 1_000_000) as u32)
    }

    /// Silicon version word, useful as a liveness probe at boot.
    pub fn version(&mut self) -> Result<u16, I2C::Error> {
        self.read_register(REG_VERSION)
    }

    fn read_register(&mut self, reg: u8) -> Result<u16, I2C::Error> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(MAX17048_ADDR, &[reg], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }
}

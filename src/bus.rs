use crate::error::{Result, UplinkError};
use embedded_hal::blocking::i2c;

const REG_CHIP_ID: u8 = 0xD0;
const REG_VARIANT_ID: u8 = 0xF0;
const REG_RESET: u8 = 0xE0;

const CHIP_ID: u8 = 0x61;
const CMD_SOFT_RESET: u8 = 0xB6;

/// The two supported I2C addresses
#[allow(dead_code)]
#[derive(Default, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum DeviceAddr {
    Low = 0x76,
    #[default]
    High = 0x77,
}

/// Gas variant reported by the chip
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum Variant {
    /// BME680
    GasLow,
    /// BME688
    GasHigh,
}

/// Presence check and reset for the BME68X before the fusion engine takes
/// over the bus. Measurement and compensation stay with the engine.
#[derive(Copy, Clone, Debug)]
pub struct Bme68xBus<I2C> {
    i2c: I2C,
    address: u8,
}

#[allow(dead_code)]
impl<I2C> Bme68xBus<I2C>
    where
        I2C: i2c::WriteRead + i2c::Write,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DeviceAddr::default() as u8,
        }
    }

    /// Change the sensor's I2C address
    pub fn with_address(mut self, address: DeviceAddr) -> Self {
        self.address = address as u8;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Confirms a BME68X answers on the bus and reports which variant
    pub fn probe(&mut self) -> Result<Variant> {
        let mut buffer = [0u8; 1];
        self.i2c_read(&[REG_CHIP_ID], &mut buffer)?;
        if buffer[0] != CHIP_ID {
            return Err(UplinkError::UnknownChipIdError { found: buffer[0] });
        }

        self.i2c_read(&[REG_VARIANT_ID], &mut buffer)?;
        match buffer[0] {
            0x01 => Ok(Variant::GasHigh),
            _ => Ok(Variant::GasLow),
        }
    }

    pub fn soft_reset(&mut self) -> Result<()> {
        self.i2c_write(&[REG_RESET, CMD_SOFT_RESET])
    }

    /// Hands the bus back, typically to the fusion engine's driver
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn i2c_write(&mut self, bytes: &[u8]) -> Result<()> {
        match self.i2c.write(self.address, bytes) {
            Ok(res) => Ok(res),
            Err(_) => Err(UplinkError::WriteI2CError),
        }
    }

    fn i2c_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<()> {
        match self.i2c.write_read(self.address, bytes, buffer) {
            Ok(res) => Ok(res),
            Err(_) => Err(UplinkError::WriteReadI2CError),
        }
    }
}

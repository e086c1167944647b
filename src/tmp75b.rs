/// Driver for the TI TMP75B digital temperature sensor, operated in
/// shutdown mode with manually triggered one-shot conversions.
use crate::error::SensorError;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Default 7-bit device address (A2..A0 grounded).
pub const TMP75B_ADDR: u8 = 0x48;

const GENERAL_CALL_ADDR: u8 = 0x00;
const REG_TEMP: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;
const CMD_RESET: u8 = 0x06;
const CFG_SHUTDOWN: u8 = 0x01;
const CFG_ONE_SHOT: u8 = 0x80;

/// Fixed wait between triggering a one-shot conversion and reading the
/// result. The sensor exposes no ready flag over the bus, so the driver
/// assumes conversion timing: the datasheet worst case is 28 ms for a
/// 12-bit conversion and this constant carries the margin on top.
pub const CONVERSION_DELAY_MS: u32 = 50;

/// One decoded temperature reading, kept as the two raw register bytes.
///
/// The register holds a 12-bit two's-complement value left-justified in
/// 16 bits, 0.0625 °C per LSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct TemperatureSample {
    bytes: [u8; 2],
}

impl TemperatureSample {
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self { bytes }
    }

    /// The raw register bytes, most significant first — the exact form in
    /// which a sample is persisted.
    pub const fn to_bytes(self) -> [u8; 2] {
        self.bytes
    }

    /// The 12 significant bits, right-justified.
    pub fn raw12(self) -> u16 {
        ((self.bytes[0] as u16) << 4) | (self.bytes[1] as u16 >> 4)
    }

    fn signed(self) -> i16 {
        ((self.raw12() << 4) as i16) >> 4
    }

    pub fn celsius(self) -> f32 {
        self.signed() as f32 * 0.0625
    }

    /// Hundredths of a degree, for float-free text formatting.
    pub fn centi_celsius(self) -> i32 {
        self.signed() as i32 * 25 / 4
    }
}

pub struct Tmp75b<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> Tmp75b<I2C>
where
    I2C: I2c,
{
    /// Creates a driver for a sensor at the default address.
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, TMP75B_ADDR)
    }

    pub fn with_address(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    /// Releases the bus handle.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Issues a general-call reset. This addresses every device on the bus,
    /// not just this sensor.
    pub fn reset(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.i2c
            .write(GENERAL_CALL_ADDR, &[CMD_RESET])
            .map_err(SensorError::Reset)
    }

    /// Puts the sensor in shutdown mode so that every subsequent conversion
    /// must be triggered individually through the one-shot bit.
    pub fn configure_shutdown(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.i2c
            .write(self.addr, &[REG_CONFIG, CFG_SHUTDOWN])
            .map_err(SensorError::Config)
    }

    /// Reads back the configuration register.
    pub fn read_config(&mut self) -> Result<[u8; 2], SensorError<I2C::Error>> {
        self.i2c
            .write(self.addr, &[REG_CONFIG])
            .map_err(SensorError::Pointer)?;
        let mut buf = [0u8; 2];
        self.i2c
            .read(self.addr, &mut buf)
            .map_err(SensorError::Read)?;
        Ok(buf)
    }

    /// Triggers a one-shot conversion, waits [`CONVERSION_DELAY_MS`], then
    /// reads and decodes the temperature register.
    ///
    /// Any bus failure aborts the acquisition; no sample is ever fabricated
    /// from whatever the read buffer happened to hold.
    pub fn trigger_and_read<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<TemperatureSample, SensorError<I2C::Error>> {
        self.i2c
            .write(self.addr, &[REG_CONFIG, CFG_ONE_SHOT | CFG_SHUTDOWN])
            .map_err(SensorError::Trigger)?;

        delay.delay_ms(CONVERSION_DELAY_MS);

        self.i2c
            .write(self.addr, &[REG_TEMP])
            .map_err(SensorError::Pointer)?;
        let mut buf = [0u8; 2];
        self.i2c
            .read(self.addr, &mut buf)
            .map_err(SensorError::Read)?;
        Ok(TemperatureSample::from_bytes(buf))
    }
}

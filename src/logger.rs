/// End-to-end acquisition loop: one sensor sample per even EEPROM address,
/// start of the address space to the end, with a completion indicator.
use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;
use heapless::String;

use crate::diag::DiagnosticSink;
use crate::eeprom::{Eeprom25, EEPROM_CAPACITY};
use crate::error::{EepromError, LogError, SensorError};
use crate::tmp75b::{TemperatureSample, Tmp75b};

/// Default pause between consecutive samples.
pub const LOG_PERIOD_MS: u32 = 100;

/// What a full-log run does when a sample cannot be acquired or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ErrorPolicy {
    /// Abort the run with the error. Nothing indeterminate is ever written.
    Halt,
    /// Report the failure and keep going. A failed acquisition re-persists
    /// the last successfully read sample (zero before the first success);
    /// a failed write leaves its slot as-is and moves on.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct LoggerConfig {
    /// Pause between consecutive iterations, applied between samples but
    /// never after the final one.
    pub period_ms: u32,
    /// Bytes of EEPROM to fill. Must be even; one 2-byte sample lands on
    /// every even address below it.
    pub capacity: u16,
    pub policy: ErrorPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            period_ms: LOG_PERIOD_MS,
            capacity: EEPROM_CAPACITY as u16,
            policy: ErrorPolicy::Halt,
        }
    }
}

/// Owns the two drivers, the completion indicator and the diagnostic sink.
/// All bus access is serialized through [`run_full_log`].
///
/// [`run_full_log`]: TempLogger::run_full_log
pub struct TempLogger<I2C, SPI, LED, TX> {
    sensor: Tmp75b<I2C>,
    eeprom: Eeprom25<SPI>,
    indicator: LED,
    diag: TX,
    config: LoggerConfig,
    last_sample: TemperatureSample,
}

impl<I2C, SPI, LED, TX> TempLogger<I2C, SPI, LED, TX>
where
    I2C: I2c,
    SPI: SpiDevice,
    LED: OutputPin,
    TX: DiagnosticSink,
{
    pub fn new(sensor: Tmp75b<I2C>, eeprom: Eeprom25<SPI>, indicator: LED, diag: TX) -> Self {
        Self::with_config(sensor, eeprom, indicator, diag, LoggerConfig::default())
    }

    pub fn with_config(
        sensor: Tmp75b<I2C>,
        eeprom: Eeprom25<SPI>,
        indicator: LED,
        diag: TX,
        config: LoggerConfig,
    ) -> Self {
        Self {
            sensor,
            eeprom,
            indicator,
            diag,
            config,
            last_sample: TemperatureSample::default(),
        }
    }

    pub fn config(&self) -> LoggerConfig {
        self.config
    }

    /// Gives the drivers, indicator and sink back.
    pub fn release(self) -> (Tmp75b<I2C>, Eeprom25<SPI>, LED, TX) {
        (self.sensor, self.eeprom, self.indicator, self.diag)
    }

    /// Fills the configured address range with temperature samples, one per
    /// even address in increasing order, then asserts the indicator.
    ///
    /// The sensor is reset and put in shutdown mode first; failures there
    /// are reported and the run proceeds regardless, as a sensor left in
    /// continuous mode still converts. Indicator pin errors are ignored.
    pub fn run_full_log<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), LogError<I2C::Error, SPI::Error>> {
        self.indicator.set_low().ok();

        match self.sensor.reset() {
            Ok(()) => self.diag.write_line("RESET Success\r\n"),
            Err(_) => self.diag.write_line("RESET Error\r\n"),
        }
        match self.sensor.configure_shutdown() {
            Ok(()) => self.diag.write_line("SD Mode ON\r\n"),
            Err(_) => self.diag.write_line("CONFIG Tx Error\r\n"),
        }

        let mut addr: u16 = 0;
        while addr < self.config.capacity {
            let sample = self.acquire(delay)?;
            self.persist(addr, sample)?;
            if addr + 2 < self.config.capacity {
                delay.delay_ms(self.config.period_ms);
            }
            addr += 2;
        }

        self.indicator.set_high().ok();
        Ok(())
    }

    /// Reads one slot back and reports its contents, for post-run
    /// verification of the final address.
    pub fn verify_slot(
        &mut self,
        addr: u16,
    ) -> Result<[u8; 2], LogError<I2C::Error, SPI::Error>> {
        let mut buf = [0u8; 2];
        self.eeprom.read(addr, &mut buf).map_err(LogError::Eeprom)?;
        let mut line: String<48> = String::new();
        let _ = write!(line, "Offset {:#06x}: {:#04x} {:#04x}\r\n", addr, buf[0], buf[1]);
        self.diag.write_line(&line);
        Ok(buf)
    }

    fn acquire<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<TemperatureSample, LogError<I2C::Error, SPI::Error>> {
        match self.sensor.trigger_and_read(delay) {
            Ok(sample) => {
                self.last_sample = sample;
                self.report_temperature(sample);
                Ok(sample)
            }
            Err(e) => {
                self.diag.write_line(match e {
                    SensorError::Trigger(_) => "OS Tx Error\r\n",
                    SensorError::Pointer(_) => "TEMP Tx Error\r\n",
                    _ => "TEMP Rx Error\r\n",
                });
                match self.config.policy {
                    ErrorPolicy::Halt => Err(LogError::Sensor(e)),
                    ErrorPolicy::Continue => Ok(self.last_sample),
                }
            }
        }
    }

    fn persist(
        &mut self,
        addr: u16,
        sample: TemperatureSample,
    ) -> Result<(), LogError<I2C::Error, SPI::Error>> {
        match self.eeprom.page_write(addr, &sample.to_bytes()) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.diag.write_line(match e {
                    EepromError::WriteEnable(_) => "WREN Error\r\n",
                    EepromError::WriteTimedOut => "WRITE Timeout\r\n",
                    EepromError::BoundaryHazard { .. } | EepromError::OutOfRange { .. } => {
                        "WRITE Bounds Error\r\n"
                    }
                    EepromError::Spi(_) => "WRITE Error\r\n",
                });
                match self.config.policy {
                    ErrorPolicy::Halt => Err(LogError::Eeprom(e)),
                    ErrorPolicy::Continue => Ok(()),
                }
            }
        }
    }

    fn report_temperature(&mut self, sample: TemperatureSample) {
        let centi = sample.centi_celsius();
        let (sign, magnitude) = if centi < 0 { ("-", -centi) } else { ("", centi) };
        let mut line: String<48> = String::new();
        let _ = write!(
            line,
            "ABS TEMP READ: {}{}.{:02} C\r\n",
            sign,
            magnitude / 100,
            magnitude % 100
        );
        self.diag.write_line(&line);
    }
}

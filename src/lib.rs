//! Bare-metal temperature logger: samples a TMP75B sensor over I²C and
//! persists each reading into a 25-series SPI EEPROM, one two-byte sample
//! per even address, until the whole device is filled.
//!
//! The drivers are generic over the `embedded-hal` 1.0 bus traits, so the
//! pipeline runs unchanged against real peripherals or simulated devices.
//! Everything is blocking and single-threaded; the orchestrator serializes
//! all bus access by construction.
//!
//! ```ignore
//! let sensor = Tmp75b::new(i2c);
//! let eeprom = Eeprom25::new(spi);
//! let mut logger = TempLogger::new(sensor, eeprom, led, FmtSink(uart));
//! logger.run_full_log(&mut delay)?;
//! logger.verify_slot(EEPROM_CAPACITY as u16 - 2)?;
//! ```
#![no_std]

pub mod diag;
pub mod eeprom;
pub mod error;
pub mod logger;
pub mod tmp75b;

pub use diag::{DiagnosticSink, FmtSink, NullSink};
pub use eeprom::{Eeprom25, Status, EEPROM_CAPACITY, EEPROM_PAGE_SIZE, WIP_POLL_LIMIT};
pub use error::{EepromError, LogError, SensorError};
pub use logger::{ErrorPolicy, LoggerConfig, TempLogger, LOG_PERIOD_MS};
pub use tmp75b::{TemperatureSample, Tmp75b, CONVERSION_DELAY_MS, TMP75B_ADDR};

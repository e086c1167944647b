/// Errors raised by the TMP75B driver.
///
/// Each variant names the phase of the transaction that failed so callers
/// can report the failure precisely without inspecting bus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum SensorError<E> {
    /// The general-call reset was not acknowledged.
    Reset(E),
    /// The configuration register write was not acknowledged.
    Config(E),
    /// The one-shot conversion trigger write was not acknowledged.
    Trigger(E),
    /// The temperature register pointer write was not acknowledged.
    Pointer(E),
    /// Reading the temperature register failed.
    Read(E),
}

/// Errors raised by the SPI EEPROM driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum EepromError<E> {
    /// The write-enable command failed, so the program operation that was
    /// about to follow never started.
    WriteEnable(E),
    /// An SPI transfer failed.
    Spi(E),
    /// The write would cross a page boundary. The device wraps within the
    /// page and corrupts the write without signalling an error, so this is
    /// rejected up front.
    BoundaryHazard { addr: u16, len: usize },
    /// The access runs past the end of the address space.
    OutOfRange { addr: u16, len: usize },
    /// The write-in-progress flag never cleared within the poll limit.
    WriteTimedOut,
}

/// Errors surfaced by a logging run under [`ErrorPolicy::Halt`].
///
/// [`ErrorPolicy::Halt`]: crate::logger::ErrorPolicy::Halt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum LogError<EI, ES> {
    /// Acquiring a sample from the sensor failed.
    Sensor(SensorError<EI>),
    /// Persisting a sample to the EEPROM failed.
    Eeprom(EepromError<ES>),
}

impl<EI, ES> From<SensorError<EI>> for LogError<EI, ES> {
    fn from(e: SensorError<EI>) -> Self {
        LogError::Sensor(e)
    }
}

impl<EI, ES> From<EepromError<ES>> for LogError<EI, ES> {
    fn from(e: EepromError<ES>) -> Self {
        LogError::Eeprom(e)
    }
}

/// Driver for 25-series SPI EEPROMs (8 KiB parts with 32-byte pages,
/// e.g. M95080 / 25LC64 class). Device-select is handled by the
/// [`SpiDevice`] transaction frame.
use crate::error::EepromError;
use core::fmt::Debug;
use embedded_hal::spi::{Operation, SpiDevice};

/// Total addressable bytes.
pub const EEPROM_CAPACITY: usize = 8192;

/// Bytes per page. A single program operation must stay within the page
/// containing its start address.
pub const EEPROM_PAGE_SIZE: usize = 32;

/// Upper bound on status polls per write. The device commits a page in a
/// few milliseconds; at typical SPI clocks this limit is hit only when the
/// part is absent or wedged.
pub const WIP_POLL_LIMIT: u32 = 100_000;

pub struct Eeprom25<SPI> {
    spi: SPI,
}

impl<SPI> Debug for Eeprom25<SPI> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Eeprom25")
    }
}

enum Opcode {
    /// Write the status register.
    WriteStatus = 0x01,
    /// Program bytes within one page.
    Write = 0x02,
    /// Sequential read starting at a 16-bit address.
    Read = 0x03,
    /// Clear the write-enable latch.
    WriteDisable = 0x04,
    /// Read the 8-bit status register.
    ReadStatus = 0x05,
    /// Set the write-enable latch.
    WriteEnable = 0x06,
}

/// Status register contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Status(u8);

impl Status {
    const WIP: u8 = 1 << 0;
    const WEL: u8 = 1 << 1;

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Write in progress: a program operation has not yet committed.
    pub fn wip(self) -> bool {
        self.0 & Self::WIP != 0
    }

    /// Write-enable latch. The device clears it after every completed
    /// program operation.
    pub fn wel(self) -> bool {
        self.0 & Self::WEL != 0
    }
}

impl<SPI> Eeprom25<SPI>
where
    SPI: SpiDevice,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the bus handle.
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Sets the write-enable latch. Must immediately precede every program
    /// operation: the device auto-clears the latch after any write.
    pub fn write_enable(&mut self) -> Result<(), EepromError<SPI::Error>> {
        self.command(&[Opcode::WriteEnable as u8])
            .map_err(EepromError::WriteEnable)
    }

    /// Clears the write-enable latch.
    pub fn write_disable(&mut self) -> Result<(), EepromError<SPI::Error>> {
        self.command(&[Opcode::WriteDisable as u8])
            .map_err(EepromError::Spi)
    }

    /// Writes the status register (block-protection bits). The write cycles
    /// through the same latch-and-commit sequence as a page program.
    pub fn write_status(&mut self, bits: u8) -> Result<(), EepromError<SPI::Error>> {
        self.write_enable()?;
        self.command(&[Opcode::WriteStatus as u8, bits])
            .map_err(EepromError::Spi)?;
        self.wait_ready()
    }

    /// Programs `data` at `addr` within a single page, then blocks until
    /// the device commits the write.
    ///
    /// The bytes must lie within the page containing `addr`; a write that
    /// would cross the page boundary is rejected as
    /// [`EepromError::BoundaryHazard`] because the device would silently
    /// wrap within the page instead of spilling into the next one.
    pub fn page_write(&mut self, addr: u16, data: &[u8]) -> Result<(), EepromError<SPI::Error>> {
        check_page_bounds(addr, data.len())?;
        self.write_enable()?;

        self.spi
            .transaction(&mut [
                Operation::Write(&[Opcode::Write as u8, (addr >> 8) as u8, addr as u8]),
                Operation::Write(data),
            ])
            .map_err(EepromError::Spi)?;

        self.wait_ready()
    }

    /// Reads `buf.len()` bytes starting at `addr`.
    pub fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), EepromError<SPI::Error>> {
        check_capacity(addr, buf.len())?;
        self.spi
            .transaction(&mut [
                Operation::Write(&[Opcode::Read as u8, (addr >> 8) as u8, addr as u8]),
                Operation::Read(buf),
            ])
            .map_err(EepromError::Spi)
    }

    /// Reads the status register.
    pub fn read_status(&mut self) -> Result<Status, EepromError<SPI::Error>> {
        let mut response = [0u8; 1];
        self.command_with_response(&[Opcode::ReadStatus as u8], &mut response)
            .map_err(EepromError::Spi)?;
        Ok(Status(response[0]))
    }

    /// Polls the status register until the write-in-progress flag clears.
    ///
    /// Bounded by [`WIP_POLL_LIMIT`]; a device that never clears the flag
    /// yields [`EepromError::WriteTimedOut`] instead of hanging the caller.
    pub fn wait_ready(&mut self) -> Result<(), EepromError<SPI::Error>> {
        for _ in 0..WIP_POLL_LIMIT {
            if !self.read_status()?.wip() {
                return Ok(());
            }
        }
        Err(EepromError::WriteTimedOut)
    }

    /// Writes a command to the SPI bus
    fn command(&mut self, bytes: &[u8]) -> Result<(), SPI::Error> {
        self.spi.transaction(&mut [Operation::Write(bytes)])
    }

    /// Writes a command to the SPI bus and clocks the response into `response`
    fn command_with_response(
        &mut self,
        instruction: &[u8],
        response: &mut [u8],
    ) -> Result<(), SPI::Error> {
        self.spi.transaction(&mut [
            Operation::Write(instruction),
            Operation::Read(response),
        ])
    }
}

fn check_capacity<E>(addr: u16, len: usize) -> Result<(), EepromError<E>> {
    if addr as usize + len > EEPROM_CAPACITY {
        return Err(EepromError::OutOfRange { addr, len });
    }
    Ok(())
}

fn check_page_bounds<E>(addr: u16, len: usize) -> Result<(), EepromError<E>> {
    check_capacity(addr, len)?;
    let page_end = (addr as usize / EEPROM_PAGE_SIZE + 1) * EEPROM_PAGE_SIZE;
    if addr as usize + len > page_end {
        return Err(EepromError::BoundaryHazard { addr, len });
    }
    Ok(())
}

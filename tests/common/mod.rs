//! Simulated devices for exercising the pipeline without hardware: an SPI
//! EEPROM model with write-enable latch and busy-cycle behavior, a scripted
//! TMP75B, and recording doubles for the delay, indicator and sink.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, I2c};
use embedded_hal::spi::{self, Operation, SpiDevice};

use tmp75b_eeprom_logger::DiagnosticSink;

const PAGE: usize = 32;

/// One observable device-side event, in bus order. Shared between the
/// EEPROM and indicator mocks so cross-device ordering can be asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    WriteEnable,
    Program { addr: u16, len: usize },
    StatusRead { wip: bool },
    StatusWrite { bits: u8 },
    MemRead { addr: u16, len: usize },
    IndicatorLow,
    IndicatorHigh,
}

pub type Transcript = Rc<RefCell<Vec<Event>>>;

pub fn transcript() -> Transcript {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiFault;

impl spi::Error for SpiFault {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

/// Byte-array-backed 25-series EEPROM model. Programs only land when the
/// write-enable latch is set, wrap within the 32-byte page containing the
/// start address, clear the latch, and report write-in-progress for
/// `busy_per_write` status polls afterwards.
pub struct MockEeprom {
    pub mem: Vec<u8>,
    pub busy_per_write: u32,
    pub fail_write_enable: bool,
    pub fail_program: bool,
    wel: bool,
    busy_left: u32,
    log: Transcript,
}

impl MockEeprom {
    pub fn new(size: usize, busy_per_write: u32, log: Transcript) -> Self {
        Self {
            mem: vec![0xFF; size],
            busy_per_write,
            fail_write_enable: false,
            fail_program: false,
            wel: false,
            busy_left: 0,
            log,
        }
    }
}

impl spi::ErrorType for MockEeprom {
    type Error = SpiFault;
}

impl SpiDevice for MockEeprom {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), SpiFault> {
        let (first, rest) = operations.split_first_mut().expect("empty transaction");
        let cmd: Vec<u8> = match first {
            Operation::Write(bytes) => bytes.to_vec(),
            _ => panic!("transaction must open with a command write"),
        };
        match cmd[0] {
            0x06 => {
                if self.fail_write_enable {
                    return Err(SpiFault);
                }
                self.wel = true;
                self.log.borrow_mut().push(Event::WriteEnable);
            }
            0x04 => {
                self.wel = false;
            }
            0x01 => {
                let bits = cmd[1];
                self.log.borrow_mut().push(Event::StatusWrite { bits });
                if self.wel {
                    self.wel = false;
                    self.busy_left = self.busy_per_write;
                }
            }
            0x02 => {
                let addr = u16::from_be_bytes([cmd[1], cmd[2]]);
                let data: Vec<u8> = match rest {
                    [Operation::Write(data)] => data.to_vec(),
                    _ => panic!("program expects exactly one data write"),
                };
                self.log.borrow_mut().push(Event::Program {
                    addr,
                    len: data.len(),
                });
                if self.fail_program {
                    return Err(SpiFault);
                }
                if self.wel {
                    let base = addr as usize / PAGE * PAGE;
                    let offset = addr as usize % PAGE;
                    for (i, byte) in data.iter().enumerate() {
                        let a = base + (offset + i) % PAGE;
                        if a < self.mem.len() {
                            self.mem[a] = *byte;
                        }
                    }
                    self.wel = false;
                    self.busy_left = self.busy_per_write;
                }
            }
            0x05 => {
                let wip = self.busy_left > 0;
                if wip {
                    self.busy_left -= 1;
                }
                let status = u8::from(wip) | (u8::from(self.wel) << 1);
                match rest {
                    [Operation::Read(buf)] => buf[0] = status,
                    _ => panic!("status read expects exactly one read"),
                }
                self.log.borrow_mut().push(Event::StatusRead { wip });
            }
            0x03 => {
                let addr = u16::from_be_bytes([cmd[1], cmd[2]]) as usize;
                match rest {
                    [Operation::Read(buf)] => {
                        for (i, slot) in buf.iter_mut().enumerate() {
                            *slot = self.mem[(addr + i) % self.mem.len()];
                        }
                        self.log.borrow_mut().push(Event::MemRead {
                            addr: addr as u16,
                            len: buf.len(),
                        });
                    }
                    _ => panic!("read expects exactly one read"),
                }
            }
            other => panic!("unexpected opcode {other:#04x}"),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cFault;

impl i2c::Error for I2cFault {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::Other
    }
}

/// Scripted TMP75B: answers every temperature read with `temp_bytes` and
/// records resets and configuration writes. Failures can be injected per
/// phase; `fail_reads_after = Some(n)` lets the first `n` data reads
/// succeed and fails the rest.
pub struct MockSensor {
    pub temp_bytes: [u8; 2],
    pub resets: u32,
    pub config_writes: Vec<u8>,
    pub fail_reset: bool,
    pub fail_trigger: bool,
    pub fail_reads_after: Option<u32>,
    reads: u32,
    pointer: u8,
}

impl MockSensor {
    pub fn new(temp_bytes: [u8; 2]) -> Self {
        Self {
            temp_bytes,
            resets: 0,
            config_writes: Vec::new(),
            fail_reset: false,
            fail_trigger: false,
            fail_reads_after: None,
            reads: 0,
            pointer: 0x00,
        }
    }
}

impl i2c::ErrorType for MockSensor {
    type Error = I2cFault;
}

impl I2c for MockSensor {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), I2cFault> {
        for op in operations {
            match op {
                i2c::Operation::Write(bytes) => {
                    if address == 0x00 {
                        if self.fail_reset {
                            return Err(I2cFault);
                        }
                        assert_eq!(bytes[0], 0x06, "unexpected general-call payload");
                        self.resets += 1;
                    } else {
                        assert_eq!(address, 0x48);
                        match **bytes {
                            [0x01, cfg] => {
                                if cfg & 0x80 != 0 && self.fail_trigger {
                                    return Err(I2cFault);
                                }
                                self.config_writes.push(cfg);
                            }
                            [reg] => self.pointer = reg,
                            _ => panic!("unexpected i2c write {bytes:?}"),
                        }
                    }
                }
                i2c::Operation::Read(buf) => {
                    if let Some(limit) = self.fail_reads_after {
                        if self.reads >= limit {
                            return Err(I2cFault);
                        }
                    }
                    self.reads += 1;
                    match self.pointer {
                        0x00 => buf.copy_from_slice(&self.temp_bytes),
                        0x01 => {
                            buf[0] = *self.config_writes.last().unwrap_or(&0x00);
                            buf[1] = 0x00;
                        }
                        reg => panic!("read from unexpected register {reg:#04x}"),
                    }
                }
            }
        }
        Ok(())
    }
}

/// Completion indicator wired into the shared transcript.
pub struct MockPin {
    pub state: bool,
    log: Transcript,
}

impl MockPin {
    pub fn new(log: Transcript) -> Self {
        Self { state: false, log }
    }
}

impl digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        self.log.borrow_mut().push(Event::IndicatorLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state = true;
        self.log.borrow_mut().push(Event::IndicatorHigh);
        Ok(())
    }
}

/// Records every requested delay in nanoseconds instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub delays_ns: Vec<u64>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.delays_ns.push(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ns.push(ms as u64 * 1_000_000);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl DiagnosticSink for RecordingSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

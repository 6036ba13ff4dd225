//! Raw register storage.
//!
//! `RegisterBank` records the last value written to each address of one
//! 256-entry register port. It holds no interpretation; decoding happens
//! in the chip state that owns the bank.

/// Last-written values for a single 8-bit register port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBank {
    registers: [Option<u8>; 256],
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self {
            registers: [None; 256],
        }
    }
}

impl RegisterBank {
    pub fn write(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = Some(value);
    }

    /// Returns `None` if `register` has never been written.
    pub fn read(&self, register: u8) -> Option<u8> {
        self.registers[register as usize]
    }
}

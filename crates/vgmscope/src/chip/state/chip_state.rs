//! Chip state tracking trait.
//!
//! `ChipState` is the seam between a register-write stream and a chip
//! model. Implementations decode writes into structured state and keep
//! the raw register values for inspection.

/// Base trait for chip state tracking
pub trait ChipState: Send {
    /// Apply a register write on `port`.
    ///
    /// Writes never fail. Registers the chip does not implement are
    /// recorded and otherwise ignored.
    fn write(&mut self, port: u8, register: u8, value: u8);

    /// Read back the last value written to `register` on `port`.
    ///
    /// Returns `None` if the register has not been written since the last
    /// reset.
    fn read_register(&self, port: u8, register: u8) -> Option<u8>;

    /// Return the chip to its power-on state.
    fn reset(&mut self);
}

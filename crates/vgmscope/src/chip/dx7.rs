//! YM2612 to DX7 voice adaption.
//!
//! The YM2612 has 8 four-operator algorithms; the DX7 has 32 six-operator
//! algorithms. `adapt_snapshot` picks, for each YM2612 algorithm, the DX7
//! algorithm with the closest carrier/modulator topology. Only the
//! algorithm is carried over; operator envelopes are not translated.
use std::fmt;

use crate::chip::state::ChannelSnapshot;

/// DX7 algorithm number, 1-32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dx7Algorithm(u8);

impl Dx7Algorithm {
    /// Returns `None` unless `1 <= number <= 32`.
    pub fn new(number: u8) -> Option<Self> {
        (1..=32).contains(&number).then_some(Self(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A named DX7 voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dx7Voice {
    pub name: String,
    pub algorithm: Dx7Algorithm,
}

impl fmt::Display for Dx7Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[dx7-voice ")?;
        writeln!(f, "  [name {}]", self.name)?;
        writeln!(f, "  [algorithm {}]]", self.algorithm.get())
    }
}

/// DX7 algorithm for each YM2612 algorithm 0-7.
const ALGORITHMS: [Dx7Algorithm; 8] = [
    Dx7Algorithm(1),
    Dx7Algorithm(14),
    Dx7Algorithm(8),
    Dx7Algorithm(7),
    Dx7Algorithm(29),
    Dx7Algorithm(22),
    Dx7Algorithm(31),
    Dx7Algorithm(32),
];

/// Adapt a channel snapshot to a named DX7 voice.
pub fn adapt_snapshot(name: impl Into<String>, snapshot: &ChannelSnapshot) -> Dx7Voice {
    Dx7Voice {
        name: name.into(),
        algorithm: ALGORITHMS[(snapshot.algorithm & 0b111) as usize],
    }
}

//! Immutable value copies of YM2612 voice state.
//!
//! Snapshots compare by value, so two snapshots of a channel are equal
//! exactly when their text forms are equal. Frequency, stereo, key-on,
//! rate scaling and amplitude modulation state are not captured.
//!
//! `ChannelSnapshot` implements `Display` using the bracketed text format
//! written to snapshot files:
//!
//! ```text
//! [channel
//!   [index 0]
//!   [algorithm 2]
//!   [feedback 6]
//!   [op
//!     [index 0]
//!     [envelope
//!       [attack-rate 31]
//!       ...
//! ```
use std::fmt;

/// Operator parameters captured from one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperatorSnapshot {
    pub index: u8,
    /// Total level; 0 is loudest.
    pub volume_inverse: u8,
    pub attack_rate: u8,
    pub decay_1_rate: u8,
    /// Secondary amplitude, the level at which decay 2 takes over.
    pub decay_1_level: u8,
    pub decay_2_rate: u8,
    pub release_rate: u8,
    pub multiply: u8,
    pub detune: u8,
}

impl OperatorSnapshot {
    /// Volume on a 0..=127 scale where 127 is loudest.
    pub fn volume(&self) -> u8 {
        127 - self.volume_inverse.min(127)
    }
}

/// Voice parameters captured from one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelSnapshot {
    pub index: u8,
    pub algorithm: u8,
    pub feedback: u8,
    pub operators: [OperatorSnapshot; 4],
}

impl ChannelSnapshot {
    /// Operator `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    pub fn operator(&self, index: usize) -> &OperatorSnapshot {
        &self.operators[index]
    }
}

impl fmt::Display for ChannelSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[channel ")?;
        writeln!(f, "  [index {}]", self.index)?;
        writeln!(f, "  [algorithm {}]", self.algorithm)?;
        writeln!(f, "  [feedback {}]", self.feedback)?;
        for (i, op) in self.operators.iter().enumerate() {
            writeln!(f, "  [op ")?;
            writeln!(f, "    [index {}]", i)?;
            writeln!(f, "    [envelope ")?;
            writeln!(f, "      [attack-rate {}]", op.attack_rate)?;
            writeln!(f, "      [decay-1-level {}]", op.decay_1_level)?;
            writeln!(f, "      [decay-1-rate {}]", op.decay_1_rate)?;
            writeln!(f, "      [decay-2-rate {}]", op.decay_2_rate)?;
            writeln!(f, "      [release-rate {}]]", op.release_rate)?;
            writeln!(f, "    [detune {}]", op.detune)?;
            writeln!(f, "    [multiply {}]", op.multiply)?;
            writeln!(f, "    [volume-inverse {}]]", op.volume_inverse)?;
        }
        writeln!(f, "]")?;
        writeln!(f)
    }
}

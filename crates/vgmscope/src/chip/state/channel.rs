//! YM2612 channel and operator state.
//!
//! Each setter decodes one register byte into its bit fields. The
//! interpreter in `ym2612` decides which channel and operator a register
//! addresses; the types here only hold the decoded values.

use super::snapshot::{ChannelSnapshot, OperatorSnapshot};

/// One of the four FM operators of a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operator {
    index: u8,
    channel: u8,
    detune: u8,
    multiply: u8,
    volume_inverse: u8,
    rate_scaling: u8,
    attack_rate: u8,
    amplitude_modulation: bool,
    decay_1_rate: u8,
    decay_2_rate: u8,
    secondary_amplitude: u8,
    release_rate: u8,
    frequency_lsb: u8,
    frequency_msb: u8,
    frequency_octave: u8,
    enabled: bool,
}

impl Operator {
    fn new(channel: u8, index: u8) -> Self {
        Self {
            index,
            channel,
            ..Default::default()
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn detune(&self) -> u8 {
        self.detune
    }

    pub fn multiply(&self) -> u8 {
        self.multiply
    }

    pub fn volume_inverse(&self) -> u8 {
        self.volume_inverse
    }

    pub fn rate_scaling(&self) -> u8 {
        self.rate_scaling
    }

    pub fn attack_rate(&self) -> u8 {
        self.attack_rate
    }

    pub fn amplitude_modulation(&self) -> bool {
        self.amplitude_modulation
    }

    pub fn decay_1_rate(&self) -> u8 {
        self.decay_1_rate
    }

    pub fn decay_2_rate(&self) -> u8 {
        self.decay_2_rate
    }

    /// Decay 1 level.
    pub fn secondary_amplitude(&self) -> u8 {
        self.secondary_amplitude
    }

    pub fn release_rate(&self) -> u8 {
        self.release_rate
    }

    /// Frequency LSB, only meaningful in channel 3/6 special mode.
    pub fn frequency_lsb(&self) -> u8 {
        self.frequency_lsb
    }

    pub fn frequency_msb(&self) -> u8 {
        self.frequency_msb
    }

    pub fn frequency_octave(&self) -> u8 {
        self.frequency_octave
    }

    /// Key-on state from the last 0x28 write addressing this channel.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn snapshot(&self) -> OperatorSnapshot {
        OperatorSnapshot {
            index: self.index,
            volume_inverse: self.volume_inverse,
            attack_rate: self.attack_rate,
            decay_1_rate: self.decay_1_rate,
            decay_1_level: self.secondary_amplitude,
            decay_2_rate: self.decay_2_rate,
            release_rate: self.release_rate,
            multiply: self.multiply,
            detune: self.detune,
        }
    }

    pub(crate) fn set_detune_multiply(&mut self, value: u8) {
        self.detune = (value >> 4) & 0b111;
        self.multiply = value & 0b1111;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            detune = self.detune,
            multiply = self.multiply,
            "set detune/multiply"
        );
    }

    pub(crate) fn set_volume_inverse(&mut self, value: u8) {
        self.volume_inverse = value & 0x7F;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            volume_inverse = self.volume_inverse,
            "set volume inverse"
        );
    }

    pub(crate) fn set_rate_scaling_attack(&mut self, value: u8) {
        self.rate_scaling = (value >> 6) & 0b11;
        self.attack_rate = value & 0b1_1111;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            rate_scaling = self.rate_scaling,
            attack_rate = self.attack_rate,
            "set rate scaling/attack"
        );
    }

    pub(crate) fn set_amplitude_modulation_decay_1(&mut self, value: u8) {
        self.amplitude_modulation = value & 0x80 != 0;
        self.decay_1_rate = value & 0b1_1111;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            amplitude_modulation = self.amplitude_modulation,
            decay_1_rate = self.decay_1_rate,
            "set am/decay 1"
        );
    }

    pub(crate) fn set_decay_2(&mut self, value: u8) {
        self.decay_2_rate = value & 0b1_1111;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            decay_2_rate = self.decay_2_rate,
            "set decay 2"
        );
    }

    pub(crate) fn set_secondary_amplitude_release(&mut self, value: u8) {
        self.secondary_amplitude = (value >> 4) & 0b1111;
        self.release_rate = value & 0b1111;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            secondary_amplitude = self.secondary_amplitude,
            release_rate = self.release_rate,
            "set secondary amplitude/release"
        );
    }

    pub(crate) fn set_frequency_lsb(&mut self, value: u8) {
        self.frequency_lsb = value;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            lsb = value,
            "set special mode frequency lsb"
        );
    }

    pub(crate) fn set_frequency_msb(&mut self, value: u8) {
        self.frequency_msb = value & 0b111;
        self.frequency_octave = (value >> 3) & 0b111;
        tracing::trace!(
            channel = self.channel,
            operator = self.index,
            msb = self.frequency_msb,
            octave = self.frequency_octave,
            "set special mode frequency msb"
        );
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// One of the six FM channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    index: u8,
    operators: [Operator; 4],
    frequency_lsb: u8,
    frequency_msb: u8,
    frequency_octave: u8,
    feedback: u8,
    algorithm: u8,
    stereo_left: bool,
    stereo_right: bool,
    lfo_amplitude_sensitivity: u8,
    lfo_frequency_sensitivity: u8,
}

impl Channel {
    pub(crate) fn new(index: u8) -> Self {
        Self {
            index,
            operators: std::array::from_fn(|op| Operator::new(index, op as u8)),
            frequency_lsb: 0,
            frequency_msb: 0,
            frequency_octave: 0,
            feedback: 0,
            algorithm: 0,
            stereo_left: false,
            stereo_right: false,
            lfo_amplitude_sensitivity: 0,
            lfo_frequency_sensitivity: 0,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// Operator `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    pub fn operator(&self, index: usize) -> &Operator {
        assert!(index < 4, "operator index {} out of range", index);
        &self.operators[index]
    }

    pub fn operators(&self) -> &[Operator; 4] {
        &self.operators
    }

    pub fn frequency_lsb(&self) -> u8 {
        self.frequency_lsb
    }

    pub fn frequency_msb(&self) -> u8 {
        self.frequency_msb
    }

    /// Block number.
    pub fn frequency_octave(&self) -> u8 {
        self.frequency_octave
    }

    /// The 11-bit F-number assembled from the MSB and LSB registers.
    pub fn frequency_number(&self) -> u16 {
        (u16::from(self.frequency_msb) << 8) | u16::from(self.frequency_lsb)
    }

    pub fn feedback(&self) -> u8 {
        self.feedback
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn stereo_left(&self) -> bool {
        self.stereo_left
    }

    pub fn stereo_right(&self) -> bool {
        self.stereo_right
    }

    pub fn lfo_amplitude_sensitivity(&self) -> u8 {
        self.lfo_amplitude_sensitivity
    }

    pub fn lfo_frequency_sensitivity(&self) -> u8 {
        self.lfo_frequency_sensitivity
    }

    /// Capture the voice parameters of this channel.
    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            index: self.index,
            algorithm: self.algorithm,
            feedback: self.feedback,
            operators: std::array::from_fn(|op| self.operators[op].snapshot()),
        }
    }

    pub(crate) fn operator_mut(&mut self, index: usize) -> &mut Operator {
        &mut self.operators[index]
    }

    pub(crate) fn set_frequency_lsb(&mut self, value: u8) {
        self.frequency_lsb = value;
        tracing::trace!(channel = self.index, lsb = value, "set frequency lsb");
    }

    pub(crate) fn set_frequency_msb(&mut self, value: u8) {
        self.frequency_msb = value & 0b111;
        self.frequency_octave = (value >> 3) & 0b111;
        tracing::trace!(
            channel = self.index,
            msb = self.frequency_msb,
            octave = self.frequency_octave,
            "set frequency msb"
        );
    }

    pub(crate) fn set_algorithm_feedback(&mut self, value: u8) {
        self.feedback = (value >> 3) & 0b111;
        self.algorithm = value & 0b111;
        tracing::trace!(
            channel = self.index,
            feedback = self.feedback,
            algorithm = self.algorithm,
            "set algorithm/feedback"
        );
    }

    pub(crate) fn set_stereo_lfo_sensitivity(&mut self, value: u8) {
        self.stereo_left = value & 0x80 != 0;
        self.stereo_right = value & 0x40 != 0;
        self.lfo_amplitude_sensitivity = (value >> 4) & 0b11;
        self.lfo_frequency_sensitivity = value & 0b111;
        tracing::trace!(
            channel = self.index,
            left = self.stereo_left,
            right = self.stereo_right,
            ams = self.lfo_amplitude_sensitivity,
            fms = self.lfo_frequency_sensitivity,
            "set stereo/lfo sensitivity"
        );
    }

    /// Apply a key-on mask; bit 0 controls operator 0.
    pub(crate) fn set_key_mask(&mut self, mask: u8) {
        for (op, operator) in self.operators.iter_mut().enumerate() {
            operator.set_enabled(mask & (1 << op) != 0);
        }
        tracing::trace!(
            channel = self.index,
            operators = format_args!("{:04b}", mask & 0x0F),
            "key on/off"
        );
    }
}

//! YM2612 (OPN2) chip state implementation.
//!
//! This module provides register-state tracking for the Yamaha YM2612 FM
//! synthesis chip found in the Sega Genesis/Mega Drive.
//!
//! # Port Handling
//!
//! The chip has two 256-entry register ports:
//! - Port 0: global registers and channels 0-2
//! - Port 1: channels 3-5
//!
//! Both ports share one decode table; the channel slot decoded from the
//! register address is offset by 3 for port 1. Global registers
//! (0x22-0x2B) exist only on port 0.
//!
//! # Channel 3/6 special mode
//!
//! When bits 6-7 of register 0x27 are `01`, channels 2 and 5 take a
//! separate frequency per operator. Writes to 0xA2/0xA6 then address
//! operator 0, while 0xA8-0xAA/0xAC-0xAE always address operators 1-3.

use super::channel::Channel;
use super::chip_state::ChipState;
use super::storage::RegisterBank;

/// YM2612 has 6 FM channels
const YM2612_CHANNELS: usize = 6;

/// Operator register kinds in the 0x30-0x8F blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum OperatorField {
    DetuneMultiply,
    VolumeInverse,
    RateScalingAttack,
    AmplitudeModulationDecay1,
    Decay2,
    SecondaryAmplitudeRelease,
}

/// What a register address controls, independent of port.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RegisterTarget {
    Unmapped,
    Lfo,
    TimerB,
    TimersAndMode,
    KeyOnOff,
    DacData,
    DacEnable,
    Proprietary,
    Operator {
        slot: u8,
        operator: u8,
        field: OperatorField,
    },
    FrequencyLsb {
        slot: u8,
    },
    FrequencyMsb {
        slot: u8,
    },
    /// 0xA8-0xAA: special-mode LSB of operator 1-3 of channel 2/5.
    SpecialFrequencyLsb {
        operator: u8,
    },
    /// 0xAC-0xAE: special-mode MSB of operator 1-3 of channel 2/5.
    SpecialFrequencyMsb {
        operator: u8,
    },
    AlgorithmFeedback {
        slot: u8,
    },
    StereoLfoSensitivity {
        slot: u8,
    },
}

impl RegisterTarget {
    fn is_global(self) -> bool {
        matches!(
            self,
            RegisterTarget::Lfo
                | RegisterTarget::TimerB
                | RegisterTarget::TimersAndMode
                | RegisterTarget::KeyOnOff
                | RegisterTarget::DacData
                | RegisterTarget::DacEnable
        )
    }
}

const fn classify(register: u8) -> RegisterTarget {
    match register {
        0x22 => RegisterTarget::Lfo,
        0x26 => RegisterTarget::TimerB,
        0x27 => RegisterTarget::TimersAndMode,
        0x28 => RegisterTarget::KeyOnOff,
        0x2A => RegisterTarget::DacData,
        0x2B => RegisterTarget::DacEnable,
        0x30..=0x8F => {
            // register = base + operator * 4 + slot
            let slot = register & 0b11;
            if slot == 3 {
                return RegisterTarget::Unmapped;
            }
            let field = match register >> 4 {
                0x3 => OperatorField::DetuneMultiply,
                0x4 => OperatorField::VolumeInverse,
                0x5 => OperatorField::RateScalingAttack,
                0x6 => OperatorField::AmplitudeModulationDecay1,
                0x7 => OperatorField::Decay2,
                _ => OperatorField::SecondaryAmplitudeRelease,
            };
            RegisterTarget::Operator {
                slot,
                operator: (register >> 2) & 0b11,
                field,
            }
        }
        0x90..=0x9E => RegisterTarget::Proprietary,
        0xA0..=0xA2 => RegisterTarget::FrequencyLsb {
            slot: register - 0xA0,
        },
        0xA4..=0xA6 => RegisterTarget::FrequencyMsb {
            slot: register - 0xA4,
        },
        0xA8..=0xAA => RegisterTarget::SpecialFrequencyLsb {
            operator: register - 0xA8 + 1,
        },
        0xAC..=0xAE => RegisterTarget::SpecialFrequencyMsb {
            operator: register - 0xAC + 1,
        },
        0xB0..=0xB2 => RegisterTarget::AlgorithmFeedback {
            slot: register - 0xB0,
        },
        0xB4..=0xB6 => RegisterTarget::StereoLfoSensitivity {
            slot: register - 0xB4,
        },
        _ => RegisterTarget::Unmapped,
    }
}

const fn build_register_table() -> [RegisterTarget; 256] {
    let mut table = [RegisterTarget::Unmapped; 256];
    let mut register = 0;
    while register < 256 {
        table[register] = classify(register as u8);
        register += 1;
    }
    table
}

/// Decode table shared by both ports.
static REGISTER_TABLE: [RegisterTarget; 256] = build_register_table();

/// Map the channel bits of a 0x28 write to a channel index.
fn key_on_channel(bits: u8) -> Option<usize> {
    match bits & 0b111 {
        0b000 => Some(0),
        0b001 => Some(1),
        0b010 => Some(2),
        0b100 => Some(3),
        0b101 => Some(4),
        0b110 => Some(5),
        _ => None,
    }
}

/// YM2612 timer control bits written through register 0x27.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub a_reset: bool,
    pub a_enable: bool,
    pub a_load: bool,
    pub b_reset: bool,
    pub b_enable: bool,
    pub b_load: bool,
    /// Timer B reload value from register 0x26.
    pub b_value: u8,
}

/// YM2612 register state tracker
///
/// Tracks all 6 channels (4 operators each), the global LFO, DAC and timer
/// registers, and the raw value of every register written on either port.
/// Only register *state* is modelled; no audio is produced.
///
/// # Examples
///
/// ```
/// use vgmscope::chip::state::Ym2612State;
///
/// let mut state = Ym2612State::new();
/// state.write_port0(0xB0, 0x32); // feedback 6, algorithm 2
/// state.write_port0(0x30, 0x11); // channel 0, operator 0: detune 1, multiply 1
///
/// let ch0 = state.channel(0);
/// assert_eq!(ch0.algorithm(), 2);
/// assert_eq!(ch0.feedback(), 6);
/// assert_eq!(ch0.operator(0).multiply(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ym2612State {
    channels: [Channel; YM2612_CHANNELS],
    lfo_enable: bool,
    lfo_frequency: u8,
    dac_enable: bool,
    dac_data: u8,
    timers: Timers,
    channel_3_6_special_mode: bool,
    /// Raw register values, indexed by port.
    registers: [RegisterBank; 2],
}

impl Default for Ym2612State {
    fn default() -> Self {
        Self::new()
    }
}

impl Ym2612State {
    /// Create a tracker in the power-on state.
    pub fn new() -> Self {
        Self {
            channels: std::array::from_fn(|ch| Channel::new(ch as u8)),
            lfo_enable: false,
            lfo_frequency: 0,
            dac_enable: false,
            dac_data: 0,
            timers: Timers::default(),
            channel_3_6_special_mode: false,
            registers: [RegisterBank::default(), RegisterBank::default()],
        }
    }

    /// Apply a write to port 0 (globals and channels 0-2).
    pub fn write_port0(&mut self, register: u8, value: u8) {
        self.write(0, register, value);
    }

    /// Apply a write to port 1 (channels 3-5).
    pub fn write_port1(&mut self, register: u8, value: u8) {
        self.write(1, register, value);
    }

    /// Channel `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    pub fn channel(&self, index: usize) -> &Channel {
        assert!(
            index < YM2612_CHANNELS,
            "channel index {} out of range",
            index
        );
        &self.channels[index]
    }

    /// Channel `index`, or `None` if `index >= 6`.
    pub fn try_channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[Channel; YM2612_CHANNELS] {
        &self.channels
    }

    pub fn lfo_enable(&self) -> bool {
        self.lfo_enable
    }

    pub fn lfo_frequency(&self) -> u8 {
        self.lfo_frequency
    }

    pub fn dac_enable(&self) -> bool {
        self.dac_enable
    }

    /// Last sample written to the DAC data register.
    pub fn dac_data(&self) -> u8 {
        self.dac_data
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// True when channels 2 and 5 take per-operator frequencies.
    pub fn channel_3_6_special_mode(&self) -> bool {
        self.channel_3_6_special_mode
    }

    fn apply(&mut self, port: u8, register: u8, value: u8) {
        let target = REGISTER_TABLE[register as usize];
        if port == 1 && target.is_global() {
            self.unrecognized(port, register, value);
            return;
        }

        let base = port as usize * 3;
        match target {
            RegisterTarget::Unmapped => self.unrecognized(port, register, value),
            RegisterTarget::Lfo => {
                self.lfo_enable = (value >> 3) & 1 != 0;
                self.lfo_frequency = value & 0b111;
                tracing::trace!(
                    enable = self.lfo_enable,
                    frequency = self.lfo_frequency,
                    "set lfo"
                );
            }
            RegisterTarget::TimerB => {
                self.timers.b_value = value;
                tracing::trace!(value, "set timer b");
            }
            RegisterTarget::TimersAndMode => self.set_timers_and_mode(value),
            RegisterTarget::KeyOnOff => match key_on_channel(value) {
                Some(ch) => self.channels[ch].set_key_mask(value >> 4),
                None => tracing::warn!(
                    channel_bits = value & 0b111,
                    "key on/off: invalid channel"
                ),
            },
            RegisterTarget::DacData => {
                self.dac_data = value;
                tracing::trace!(value, "set dac data");
            }
            RegisterTarget::DacEnable => {
                self.dac_enable = value >> 7 != 0;
                tracing::trace!(enable = self.dac_enable, "set dac enable");
            }
            RegisterTarget::Proprietary => {
                tracing::trace!(port, register, value, "proprietary register");
            }
            RegisterTarget::Operator {
                slot,
                operator,
                field,
            } => {
                let op = self.channels[base + slot as usize].operator_mut(operator as usize);
                match field {
                    OperatorField::DetuneMultiply => op.set_detune_multiply(value),
                    OperatorField::VolumeInverse => op.set_volume_inverse(value),
                    OperatorField::RateScalingAttack => op.set_rate_scaling_attack(value),
                    OperatorField::AmplitudeModulationDecay1 => {
                        op.set_amplitude_modulation_decay_1(value)
                    }
                    OperatorField::Decay2 => op.set_decay_2(value),
                    OperatorField::SecondaryAmplitudeRelease => {
                        op.set_secondary_amplitude_release(value)
                    }
                }
            }
            RegisterTarget::FrequencyLsb { slot } => {
                let special = slot == 2 && self.channel_3_6_special_mode;
                let ch = &mut self.channels[base + slot as usize];
                if special {
                    ch.operator_mut(0).set_frequency_lsb(value);
                } else {
                    ch.set_frequency_lsb(value);
                }
            }
            RegisterTarget::FrequencyMsb { slot } => {
                let special = slot == 2 && self.channel_3_6_special_mode;
                let ch = &mut self.channels[base + slot as usize];
                if special {
                    ch.operator_mut(0).set_frequency_msb(value);
                } else {
                    ch.set_frequency_msb(value);
                }
            }
            RegisterTarget::SpecialFrequencyLsb { operator } => self.channels[base + 2]
                .operator_mut(operator as usize)
                .set_frequency_lsb(value),
            RegisterTarget::SpecialFrequencyMsb { operator } => self.channels[base + 2]
                .operator_mut(operator as usize)
                .set_frequency_msb(value),
            RegisterTarget::AlgorithmFeedback { slot } => {
                self.channels[base + slot as usize].set_algorithm_feedback(value)
            }
            RegisterTarget::StereoLfoSensitivity { slot } => {
                self.channels[base + slot as usize].set_stereo_lfo_sensitivity(value)
            }
        }
    }

    fn set_timers_and_mode(&mut self, value: u8) {
        match (value >> 6) & 0b11 {
            0b00 => self.channel_3_6_special_mode = false,
            0b01 => self.channel_3_6_special_mode = true,
            mode => tracing::warn!(mode, "timers/channel 3/6 mode: invalid mode"),
        }

        let bit = |n: u8| (value >> n) & 1 != 0;
        self.timers.b_reset = bit(5);
        self.timers.a_reset = bit(4);
        self.timers.b_enable = bit(3);
        self.timers.a_enable = bit(2);
        self.timers.b_load = bit(1);
        self.timers.a_load = bit(0);

        tracing::trace!(
            special_mode = self.channel_3_6_special_mode,
            timers = ?self.timers,
            "set timers/channel 3/6 mode"
        );
    }

    fn unrecognized(&self, port: u8, register: u8, value: u8) {
        tracing::warn!(
            port,
            register = format_args!("0x{:02x}", register),
            value = format_args!("0x{:02x}", value),
            "unrecognized or unimplemented register"
        );
    }
}

impl ChipState for Ym2612State {
    fn write(&mut self, port: u8, register: u8, value: u8) {
        let port = port & 1;
        tracing::trace!(port, register, value, "write");
        self.registers[port as usize].write(register, value);
        self.apply(port, register, value);
    }

    fn read_register(&self, port: u8, register: u8) -> Option<u8> {
        self.registers[(port & 1) as usize].read(register)
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

//! VGM command catalog
//!
//! This module defines the closed set of commands the body parser can
//! produce:
//! - `CommandType`: one enumerator per tag byte. The discriminant *is*
//!   the tag, so `CommandType::Ym2612Port0Write as u8 == 0x52`.
//! - `VgmCommand`: the decoded command, one variant per command kind,
//!   each carrying only its payload.
//! - `WaitShort` / `PcmWriteWait`: validated 4-bit wait arguments for
//!   the 0x7n and 0x8n tag families.
//!
//! `Eof` (tag 0x00) is synthetic: it never appears in a file and is
//! returned once the stream is exhausted or after the end-of-sound-data
//! command has been returned.
use std::fmt;

/// Tag byte of every command kind the parser understands.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandType {
    Eof = 0x00,
    GameGearPsgStereoWrite = 0x4F,
    PsgWrite = 0x50,
    Ym2413Write = 0x51,
    Ym2612Port0Write = 0x52,
    Ym2612Port1Write = 0x53,
    WaitLong = 0x61,
    Wait735 = 0x62,
    Wait882 = 0x63,
    EndOfSoundData = 0x66,
    DataBlock = 0x67,
    WaitShort0 = 0x70,
    WaitShort1 = 0x71,
    WaitShort2 = 0x72,
    WaitShort3 = 0x73,
    WaitShort4 = 0x74,
    WaitShort5 = 0x75,
    WaitShort6 = 0x76,
    WaitShort7 = 0x77,
    WaitShort8 = 0x78,
    WaitShort9 = 0x79,
    WaitShortA = 0x7A,
    WaitShortB = 0x7B,
    WaitShortC = 0x7C,
    WaitShortD = 0x7D,
    WaitShortE = 0x7E,
    WaitShortF = 0x7F,
    Ym2612PcmWriteWait0 = 0x80,
    Ym2612PcmWriteWait1 = 0x81,
    Ym2612PcmWriteWait2 = 0x82,
    Ym2612PcmWriteWait3 = 0x83,
    Ym2612PcmWriteWait4 = 0x84,
    Ym2612PcmWriteWait5 = 0x85,
    Ym2612PcmWriteWait6 = 0x86,
    Ym2612PcmWriteWait7 = 0x87,
    Ym2612PcmWriteWait8 = 0x88,
    Ym2612PcmWriteWait9 = 0x89,
    Ym2612PcmWriteWaitA = 0x8A,
    Ym2612PcmWriteWaitB = 0x8B,
    Ym2612PcmWriteWaitC = 0x8C,
    Ym2612PcmWriteWaitD = 0x8D,
    Ym2612PcmWriteWaitE = 0x8E,
    Ym2612PcmWriteWaitF = 0x8F,
    Ym2612SeekPcm = 0xE0,
}

const WAIT_SHORT_TYPES: [CommandType; 16] = [
    CommandType::WaitShort0,
    CommandType::WaitShort1,
    CommandType::WaitShort2,
    CommandType::WaitShort3,
    CommandType::WaitShort4,
    CommandType::WaitShort5,
    CommandType::WaitShort6,
    CommandType::WaitShort7,
    CommandType::WaitShort8,
    CommandType::WaitShort9,
    CommandType::WaitShortA,
    CommandType::WaitShortB,
    CommandType::WaitShortC,
    CommandType::WaitShortD,
    CommandType::WaitShortE,
    CommandType::WaitShortF,
];

const PCM_WRITE_WAIT_TYPES: [CommandType; 16] = [
    CommandType::Ym2612PcmWriteWait0,
    CommandType::Ym2612PcmWriteWait1,
    CommandType::Ym2612PcmWriteWait2,
    CommandType::Ym2612PcmWriteWait3,
    CommandType::Ym2612PcmWriteWait4,
    CommandType::Ym2612PcmWriteWait5,
    CommandType::Ym2612PcmWriteWait6,
    CommandType::Ym2612PcmWriteWait7,
    CommandType::Ym2612PcmWriteWait8,
    CommandType::Ym2612PcmWriteWait9,
    CommandType::Ym2612PcmWriteWaitA,
    CommandType::Ym2612PcmWriteWaitB,
    CommandType::Ym2612PcmWriteWaitC,
    CommandType::Ym2612PcmWriteWaitD,
    CommandType::Ym2612PcmWriteWaitE,
    CommandType::Ym2612PcmWriteWaitF,
];

impl CommandType {
    /// The tag byte for this command kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look up the command kind for a tag byte.
    ///
    /// Returns `None` for reserved ranges and unknown tags. `0x00` maps to
    /// the synthetic `Eof` kind.
    pub fn from_tag(tag: u8) -> Option<Self> {
        let ty = match tag {
            0x00 => CommandType::Eof,
            0x4F => CommandType::GameGearPsgStereoWrite,
            0x50 => CommandType::PsgWrite,
            0x51 => CommandType::Ym2413Write,
            0x52 => CommandType::Ym2612Port0Write,
            0x53 => CommandType::Ym2612Port1Write,
            0x61 => CommandType::WaitLong,
            0x62 => CommandType::Wait735,
            0x63 => CommandType::Wait882,
            0x66 => CommandType::EndOfSoundData,
            0x67 => CommandType::DataBlock,
            0x70..=0x7F => WAIT_SHORT_TYPES[(tag & 0x0F) as usize],
            0x80..=0x8F => PCM_WRITE_WAIT_TYPES[(tag & 0x0F) as usize],
            0xE0 => CommandType::Ym2612SeekPcm,
            _ => return None,
        };
        Some(ty)
    }
}

impl TryFrom<u8> for CommandType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        CommandType::from_tag(tag).ok_or(tag)
    }
}

impl From<CommandType> for u8 {
    fn from(ty: CommandType) -> Self {
        ty.tag()
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:02X})", self, self.tag())
    }
}

/// Argument of a 0x70–0x7F wait: waits `nibble + 1` samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WaitShort(u8);

impl WaitShort {
    /// Returns `None` when `nibble > 0x0F`.
    pub fn new(nibble: u8) -> Option<Self> {
        (nibble <= 0x0F).then_some(Self(nibble))
    }

    /// Build from a tag byte, keeping its low nibble.
    pub fn from_tag(tag: u8) -> Self {
        Self(tag & 0x0F)
    }

    pub fn nibble(self) -> u8 {
        self.0
    }

    pub fn samples(self) -> u32 {
        u32::from(self.0) + 1
    }
}

/// Argument of a 0x80–0x8F PCM write: waits `nibble` samples afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PcmWriteWait(u8);

impl PcmWriteWait {
    /// Returns `None` when `nibble > 0x0F`.
    pub fn new(nibble: u8) -> Option<Self> {
        (nibble <= 0x0F).then_some(Self(nibble))
    }

    /// Build from a tag byte, keeping its low nibble.
    pub fn from_tag(tag: u8) -> Self {
        Self(tag & 0x0F)
    }

    pub fn nibble(self) -> u8 {
        self.0
    }

    pub fn samples(self) -> u32 {
        u32::from(self.0)
    }
}

/// A decoded VGM command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VgmCommand {
    /// End of stream or end of sound data was reached.
    Eof,
    GameGearPsgStereoWrite(u8),
    PsgWrite(u8),
    Ym2413Write { register: u8, value: u8 },
    Ym2612Port0Write { register: u8, value: u8 },
    Ym2612Port1Write { register: u8, value: u8 },
    /// Seek to an offset in the PCM data bank.
    Ym2612SeekPcm(u32),
    WaitLong(u16),
    Wait735,
    Wait882,
    /// The 0x66 tag. Every later parse call yields `Eof`.
    EndOfSoundData,
    /// A data block whose contents were skipped.
    DataBlock { data_type: u8, size: u32 },
    WaitShort(WaitShort),
    Ym2612PcmWriteWait(PcmWriteWait),
}

impl VgmCommand {
    /// The tag enumerator for this command.
    pub fn command_type(&self) -> CommandType {
        match self {
            VgmCommand::Eof => CommandType::Eof,
            VgmCommand::GameGearPsgStereoWrite(_) => CommandType::GameGearPsgStereoWrite,
            VgmCommand::PsgWrite(_) => CommandType::PsgWrite,
            VgmCommand::Ym2413Write { .. } => CommandType::Ym2413Write,
            VgmCommand::Ym2612Port0Write { .. } => CommandType::Ym2612Port0Write,
            VgmCommand::Ym2612Port1Write { .. } => CommandType::Ym2612Port1Write,
            VgmCommand::Ym2612SeekPcm(_) => CommandType::Ym2612SeekPcm,
            VgmCommand::WaitLong(_) => CommandType::WaitLong,
            VgmCommand::Wait735 => CommandType::Wait735,
            VgmCommand::Wait882 => CommandType::Wait882,
            VgmCommand::EndOfSoundData => CommandType::EndOfSoundData,
            VgmCommand::DataBlock { .. } => CommandType::DataBlock,
            VgmCommand::WaitShort(w) => WAIT_SHORT_TYPES[w.nibble() as usize],
            VgmCommand::Ym2612PcmWriteWait(w) => PCM_WRITE_WAIT_TYPES[w.nibble() as usize],
        }
    }

    /// Number of samples this command waits, or `None` for commands that
    /// do not advance time.
    pub fn samples(&self) -> Option<u32> {
        match self {
            VgmCommand::WaitLong(n) => Some(u32::from(*n)),
            VgmCommand::Wait735 => Some(735),
            VgmCommand::Wait882 => Some(882),
            VgmCommand::WaitShort(w) => Some(w.samples()),
            VgmCommand::Ym2612PcmWriteWait(w) => Some(w.samples()),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, VgmCommand::Eof)
    }
}

impl fmt::Display for VgmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = self.command_type();
        match self {
            VgmCommand::GameGearPsgStereoWrite(v) | VgmCommand::PsgWrite(v) => {
                write!(f, "{} value=0x{:02X}", ty, v)
            }
            VgmCommand::Ym2413Write { register, value }
            | VgmCommand::Ym2612Port0Write { register, value }
            | VgmCommand::Ym2612Port1Write { register, value } => {
                write!(f, "{} register=0x{:02X} value=0x{:02X}", ty, register, value)
            }
            VgmCommand::Ym2612SeekPcm(offset) => write!(f, "{} offset=0x{:08X}", ty, offset),
            VgmCommand::DataBlock { data_type, size } => {
                write!(f, "{} type=0x{:02X} size={}", ty, data_type, size)
            }
            _ => match self.samples() {
                Some(n) => write!(f, "{} samples={}", ty, n),
                None => write!(f, "{}", ty),
            },
        }
    }
}

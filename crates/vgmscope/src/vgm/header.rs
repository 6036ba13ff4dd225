//! VGM header
//!
//! This module defines `VgmHeader`, the in-memory representation of the
//! fixed 64-byte VGM main header, together with the field layout used
//! by the header parser.
//!
//! Contents and responsibilities:
//! - `VgmHeaderField` enumerates the header fields read by the parser
//!   and their on-disk offsets and lengths.
//! - `VgmHeader` holds decoded values. Relative offsets stored in the
//!   file are already resolved to absolute stream positions.
//! - `SUPPORTED_VERSIONS` lists the format versions the parser accepts.
//!
//! Notes:
//! - A raw data offset of `0` resolves to `12`, not to the end of the
//!   header. Command decoding still begins at byte 64 in that case
//!   because the header is always read in full.
//! - Zero clocks mean the chip is not used and are stored as `None`.

/// Magic bytes at the start of every VGM file.
pub const VGM_MAGIC: [u8; 4] = *b"Vgm ";

/// Format versions accepted by the header parser.
pub const SUPPORTED_VERSIONS: [u32; 6] = [0x150, 0x151, 0x160, 0x161, 0x170, 0x171];

/// Size in bytes of the header fields the parser reads.
pub const VGM_HEADER_SIZE: u64 = 0x40;

/// Enum identifying header fields and their on-disk offsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VgmHeaderField {
    Ident,
    EofOffset,
    Version,
    Sn76489Clock,
    Ym2413Clock,
    Gd3Offset,
    TotalSamples,
    LoopOffset,
    LoopSamples,
    SampleRate,
    SnFb,
    Snw,
    Sf,
    Ym2612Clock,
    Ym2151Clock,
    DataOffset,
    SegaPcmClock,
    SpcmInterface,
}

impl VgmHeaderField {
    pub fn offset(self) -> u64 {
        match self {
            VgmHeaderField::Ident => 0x00,
            VgmHeaderField::EofOffset => 0x04,
            VgmHeaderField::Version => 0x08,
            VgmHeaderField::Sn76489Clock => 0x0C,
            VgmHeaderField::Ym2413Clock => 0x10,
            VgmHeaderField::Gd3Offset => 0x14,
            VgmHeaderField::TotalSamples => 0x18,
            VgmHeaderField::LoopOffset => 0x1C,
            VgmHeaderField::LoopSamples => 0x20,
            VgmHeaderField::SampleRate => 0x24,
            VgmHeaderField::SnFb => 0x28,
            VgmHeaderField::Snw => 0x2A,
            VgmHeaderField::Sf => 0x2B,
            VgmHeaderField::Ym2612Clock => 0x2C,
            VgmHeaderField::Ym2151Clock => 0x30,
            VgmHeaderField::DataOffset => 0x34,
            VgmHeaderField::SegaPcmClock => 0x38,
            VgmHeaderField::SpcmInterface => 0x3C,
        }
    }

    /// Return the length in bytes for this field as stored in the header.
    pub fn len(self) -> u64 {
        match self {
            VgmHeaderField::SnFb => 2,
            VgmHeaderField::Snw | VgmHeaderField::Sf => 1,
            _ => 4,
        }
    }

    /// Position immediately after this field.
    pub fn end(self) -> u64 {
        self.offset() + self.len()
    }

    /// Value added to a non-zero relative offset stored in this field to
    /// obtain an absolute stream position.
    pub fn relative_base(self) -> Option<u64> {
        match self {
            VgmHeaderField::EofOffset
            | VgmHeaderField::Gd3Offset
            | VgmHeaderField::LoopOffset
            | VgmHeaderField::DataOffset => Some(self.offset()),
            _ => None,
        }
    }
}

/// Decoded VGM header.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct VgmHeader {
    /// Absolute position of the end of the file.
    pub eof_offset: u64,
    pub version: u32,
    pub sn76489_clock: Option<u32>,
    pub ym2413_clock: Option<u32>,
    /// Absolute position of the GD3 tag, if any.
    pub gd3_offset: Option<u64>,
    pub sample_count: u32,
    /// Absolute loop position, if the track loops.
    pub loop_offset: Option<u64>,
    pub loop_sample_count: Option<u32>,
    pub rate: u32,
    pub sn76489_feedback: u16,
    pub sn76489_shift_register_width: u8,
    pub sn76489_flags: u8,
    pub ym2612_clock: Option<u32>,
    pub ym2151_clock: Option<u32>,
    /// Absolute position where the command stream starts.
    pub data_offset: u64,
    pub sega_pcm_clock: Option<u32>,
    pub sega_pcm_interface_register: u32,
}

impl VgmHeader {
    /// Returns true when `version` is in `SUPPORTED_VERSIONS`.
    pub fn is_supported_version(version: u32) -> bool {
        SUPPORTED_VERSIONS.contains(&version)
    }

    /// Render the version as `major.minor`, e.g. `1.50` for `0x150`.
    pub fn version_string(&self) -> String {
        format!("{:x}.{:02x}", self.version >> 8, self.version & 0xFF)
    }

    /// Returns true when reserved opcodes 0x40–0x4E carry two payload
    /// bytes instead of one.
    pub fn has_wide_reserved_40(&self) -> bool {
        self.version >= 0x160
    }

    /// Duration in seconds at the nominal 44100 Hz sample rate.
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.sample_count) / 44100.0
    }
}

/// Resolve a raw relative offset read from `field`.
///
/// Returns `None` when the raw value is zero.
pub(crate) fn resolve_offset(field: VgmHeaderField, raw: u32) -> Option<u64> {
    let base = field.relative_base()?;
    (raw != 0).then(|| u64::from(raw) + base)
}

/// Treat a zero clock as "chip not present".
pub(crate) fn clock(raw: u32) -> Option<u32> {
    (raw != 0).then_some(raw)
}

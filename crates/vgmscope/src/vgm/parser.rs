//! VGM stream parser
//!
//! This module decodes VGM files from any `std::io::Read` source in two
//! stages:
//! - `HeaderParser` validates the magic number and version, decodes the
//!   fixed header, and positions the stream at the start of the command
//!   data. It is one-shot: `parse` consumes the parser.
//! - `BodyParser` is a resumable cursor that decodes one `VgmCommand`
//!   per call and keeps returning `VgmCommand::Eof` once the stream is
//!   exhausted or the end-of-sound-data command has been returned.
//!
//! Reserved opcode ranges are skipped silently. Data blocks are skipped
//! without buffering their contents.
//!
//! Errors are reported as `ParseErrors` carrying the number of bytes
//! consumed when the problem was detected. Running out of input inside
//! the command stream is not an error; it ends the stream.
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::binutil::{CountingReader, ParseError, ParseErrors};
use crate::vgm::command::{PcmWriteWait, VgmCommand, WaitShort};
use crate::vgm::header::{
    SUPPORTED_VERSIONS, VGM_HEADER_SIZE, VGM_MAGIC, VgmHeader, VgmHeaderField, clock,
    resolve_offset,
};

/// One-shot parser for the VGM header.
#[derive(Debug)]
pub struct HeaderParser<R> {
    path: Option<PathBuf>,
    reader: CountingReader<R>,
}

impl<R: Read> HeaderParser<R> {
    /// Bind a parser to `reader`. `path` is only used in diagnostics.
    pub fn open(path: Option<&Path>, reader: R) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            reader: CountingReader::new(reader),
        }
    }

    /// Parse the header and return a body parser positioned at the first
    /// command together with the decoded header.
    pub fn parse(mut self) -> Result<(BodyParser<R>, VgmHeader), ParseErrors> {
        let header = self.parse_header()?;

        let position = self.reader.position();
        if position < header.data_offset {
            let gap = header.data_offset - position;
            self.reader.skip(gap).map_err(|e| {
                self.error_with(
                    format!("stream ended before data offset 0x{:x}", header.data_offset),
                    e,
                )
            })?;
        }

        tracing::debug!(
            version = %header.version_string(),
            data_offset = header.data_offset,
            "parsed vgm header"
        );

        let body = BodyParser {
            path: self.path,
            reader: self.reader,
            header: header.clone(),
            finished: false,
        };
        Ok((body, header))
    }

    fn parse_header(&mut self) -> Result<VgmHeader, ParseError> {
        let magic: [u8; 4] = self.reader.read_array().map_err(|e| self.io_error(e))?;
        if magic != VGM_MAGIC {
            return Err(self.error(format!(
                "bad magic number: received {}, expected {}",
                hex_bytes(&magic),
                hex_bytes(&VGM_MAGIC)
            )));
        }

        assert_eq!(
            self.reader.position(),
            VgmHeaderField::EofOffset.offset(),
            "position must be 4"
        );
        let raw_eof = self.read_u32()?;
        let eof_offset = u64::from(raw_eof) + VgmHeaderField::EofOffset.offset();
        tracing::trace!(raw = raw_eof, absolute = eof_offset, "eof offset");

        let version = self.read_u32()?;
        if !VgmHeader::is_supported_version(version) {
            let expected: Vec<String> = SUPPORTED_VERSIONS
                .iter()
                .map(|v| format!("0x{:x}", v))
                .collect();
            return Err(self.error(format!(
                "unsupported format version: received 0x{:x}, expected one of {}",
                version,
                expected.join(" ")
            )));
        }
        tracing::trace!(version = format_args!("0x{:x}", version), "header version");

        assert_eq!(
            self.reader.position(),
            VgmHeaderField::Sn76489Clock.offset(),
            "position must be 12"
        );

        let sn76489_clock = clock(self.read_u32()?);
        let ym2413_clock = clock(self.read_u32()?);

        let raw_gd3 = self.read_u32()?;
        let gd3_offset = resolve_offset(VgmHeaderField::Gd3Offset, raw_gd3);
        tracing::trace!(raw = raw_gd3, absolute = ?gd3_offset, "gd3 offset");

        let sample_count = self.read_u32()?;

        let raw_loop = self.read_u32()?;
        let loop_offset = resolve_offset(VgmHeaderField::LoopOffset, raw_loop);
        tracing::trace!(raw = raw_loop, absolute = ?loop_offset, "loop offset");

        let loop_sample_count = clock(self.read_u32()?);
        let rate = self.read_u32()?;
        let sn76489_feedback = self.read_u16()?;
        let sn76489_shift_register_width = self.read_u8()?;
        let sn76489_flags = self.read_u8()?;
        let ym2612_clock = clock(self.read_u32()?);
        let ym2151_clock = clock(self.read_u32()?);

        let raw_data = self.read_u32()?;
        let data_offset = resolve_offset(VgmHeaderField::DataOffset, raw_data).unwrap_or(12);
        tracing::trace!(raw = raw_data, absolute = data_offset, "data offset");

        let sega_pcm_clock = clock(self.read_u32()?);
        let sega_pcm_interface_register = self.read_u32()?;

        assert_eq!(
            self.reader.position(),
            VGM_HEADER_SIZE,
            "position must be 64"
        );

        Ok(VgmHeader {
            eof_offset,
            version,
            sn76489_clock,
            ym2413_clock,
            gd3_offset,
            sample_count,
            loop_offset,
            loop_sample_count,
            rate,
            sn76489_feedback,
            sn76489_shift_register_width,
            sn76489_flags,
            ym2612_clock,
            ym2151_clock,
            data_offset,
            sega_pcm_clock,
            sega_pcm_interface_register,
        })
    }

    fn read_u8(&mut self) -> Result<u8, ParseError> {
        self.reader.read_u8().map_err(|e| self.io_error(e))
    }

    fn read_u16(&mut self) -> Result<u16, ParseError> {
        self.reader.read_u16_le().map_err(|e| self.io_error(e))
    }

    fn read_u32(&mut self) -> Result<u32, ParseError> {
        self.reader.read_u32_le().map_err(|e| self.io_error(e))
    }

    fn error(&self, message: String) -> ParseError {
        ParseError::new(self.reader.position(), self.path.as_deref(), message)
    }

    fn error_with(&self, message: String, cause: io::Error) -> ParseError {
        let mut err = ParseError::io(self.reader.position(), self.path.as_deref(), cause);
        err.message = message;
        err
    }

    fn io_error(&self, cause: io::Error) -> ParseError {
        ParseError::io(self.reader.position(), self.path.as_deref(), cause)
    }
}

/// Failure inside a single body parse step.
enum Fault {
    Io(io::Error),
    Format(String),
}

impl From<io::Error> for Fault {
    fn from(e: io::Error) -> Self {
        Fault::Io(e)
    }
}

/// Resumable decoder for the VGM command stream.
#[derive(Debug)]
pub struct BodyParser<R> {
    path: Option<PathBuf>,
    reader: CountingReader<R>,
    header: VgmHeader,
    finished: bool,
}

impl<R: Read> BodyParser<R> {
    /// Decode the next command.
    ///
    /// Returns `VgmCommand::Eof` on every call once the stream has ended.
    /// After an error the stream position is unspecified and callers
    /// should stop.
    pub fn parse(&mut self) -> Result<VgmCommand, ParseErrors> {
        if self.finished {
            return Ok(VgmCommand::Eof);
        }

        match self.next_command() {
            Ok(command) => {
                if command == VgmCommand::EndOfSoundData {
                    self.finished = true;
                }
                tracing::trace!(offset = self.reader.position(), %command, "command");
                Ok(command)
            }
            // A command cut short, data-block payload included, is dropped.
            Err(Fault::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::trace!(offset = self.reader.position(), "end of stream");
                self.finished = true;
                Ok(VgmCommand::Eof)
            }
            Err(Fault::Io(e)) => Err(ParseError::io(
                self.reader.position(),
                self.path.as_deref(),
                e,
            )
            .into()),
            Err(Fault::Format(message)) => Err(ParseError::new(
                self.reader.position(),
                self.path.as_deref(),
                message,
            )
            .into()),
        }
    }

    /// Number of bytes consumed from the start of the file.
    pub fn offset(&self) -> u64 {
        self.reader.position()
    }

    pub fn header(&self) -> &VgmHeader {
        &self.header
    }

    /// Returns true once `parse` can only return `Eof`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Iterate over the remaining commands.
    ///
    /// The iterator stops before `Eof` and after the first error.
    pub fn commands(&mut self) -> Commands<'_, R> {
        Commands {
            parser: self,
            failed: false,
        }
    }

    fn next_command(&mut self) -> Result<VgmCommand, Fault> {
        loop {
            let tag = self.reader.read_u8()?;
            if let Some(len) = self.reserved_len(tag) {
                self.reader.skip(len)?;
                continue;
            }

            let command = match tag {
                0x4F => VgmCommand::GameGearPsgStereoWrite(self.reader.read_u8()?),
                0x50 => VgmCommand::PsgWrite(self.reader.read_u8()?),
                0x51 => {
                    let [register, value] = self.reader.read_array()?;
                    VgmCommand::Ym2413Write { register, value }
                }
                0x52 => {
                    let [register, value] = self.reader.read_array()?;
                    VgmCommand::Ym2612Port0Write { register, value }
                }
                0x53 => {
                    let [register, value] = self.reader.read_array()?;
                    VgmCommand::Ym2612Port1Write { register, value }
                }
                0xE0 => VgmCommand::Ym2612SeekPcm(self.reader.read_u32_le()?),
                0x61 => VgmCommand::WaitLong(self.reader.read_u16_le()?),
                0x62 => VgmCommand::Wait735,
                0x63 => VgmCommand::Wait882,
                0x66 => VgmCommand::EndOfSoundData,
                0x67 => self.data_block()?,
                0x70..=0x7F => VgmCommand::WaitShort(WaitShort::from_tag(tag)),
                0x80..=0x8F => VgmCommand::Ym2612PcmWriteWait(PcmWriteWait::from_tag(tag)),
                _ => {
                    return Err(Fault::Format(format!(
                        "unrecognized command tag 0x{:02x}",
                        tag
                    )));
                }
            };
            return Ok(command);
        }
    }

    fn data_block(&mut self) -> Result<VgmCommand, Fault> {
        let compat = self.reader.read_u8()?;
        if compat != 0x66 {
            return Err(Fault::Format(format!(
                "bad data block: received 67 {:02x}, expected 67 66",
                compat
            )));
        }
        let data_type = self.reader.read_u8()?;
        let size = self.reader.read_u32_le()?;
        self.reader.skip(u64::from(size))?;
        Ok(VgmCommand::DataBlock { data_type, size })
    }

    /// Payload length of a reserved opcode, or `None` if `tag` is not
    /// reserved.
    fn reserved_len(&self, tag: u8) -> Option<u64> {
        match tag {
            0x30..=0x3F => Some(1),
            0x40..=0x4E if self.header.has_wide_reserved_40() => Some(2),
            0x40..=0x4E => Some(1),
            0xA1..=0xAF => Some(2),
            0xC9..=0xCF | 0xD7..=0xDF => Some(3),
            0xE2..=0xFF => Some(4),
            _ => None,
        }
    }
}

/// Iterator returned by `BodyParser::commands`.
#[derive(Debug)]
pub struct Commands<'a, R> {
    parser: &'a mut BodyParser<R>,
    failed: bool,
}

impl<R: Read> Iterator for Commands<'_, R> {
    type Item = Result<VgmCommand, ParseErrors>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.parser.parse() {
            Ok(VgmCommand::Eof) => None,
            Ok(command) => Some(Ok(command)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

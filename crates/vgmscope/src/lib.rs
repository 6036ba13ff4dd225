#![doc = include_str!("../README.md")]
//! vgmscope: VGM log parser and YM2612 register-state interpreter
//!
//! Key features:
//! - Streaming, resumable parsing from any `std::io::Read`; nothing is
//!   buffered beyond the current command.
//! - A closed command catalog (`VgmCommand`, `CommandType`) where each
//!   variant carries only its payload.
//! - Table-driven decoding of both YM2612 register ports into channel and
//!   operator state, with channel 3/6 special-mode addressing.
//! - Value snapshots of channel voices and a debounced preset-change
//!   detector.
//!
//! Errors are returned as `ParseErrors`, a non-empty list of `ParseError`
//! values, each carrying the byte offset at which the problem was found.
//! Running out of input inside the command stream is not an error.
//!
//! Logging goes through `tracing`: trace level for header fields, decoded
//! commands and register writes; warn level for registers the model does
//! not implement.
//!
//! Example: interpret a file and collect voice changes
//!
//! ```no_run
//! use std::fs::File;
//! use std::path::Path;
//!
//! use vgmscope::VgmCommand;
//! use vgmscope::chip::state::{PresetTracker, Ym2612State};
//! use vgmscope::vgm::HeaderParser;
//!
//! let path = Path::new("song.vgm");
//! let file = File::open(path).unwrap();
//! let (mut body, _header) = HeaderParser::open(Some(path), file).parse().unwrap();
//!
//! let mut state = Ym2612State::new();
//! let mut tracker = PresetTracker::new(&state);
//! let mut dumps = Vec::new();
//! for command in body.commands() {
//!     match command.unwrap() {
//!         VgmCommand::Ym2612Port0Write { register, value } => state.write_port0(register, value),
//!         VgmCommand::Ym2612Port1Write { register, value } => state.write_port1(register, value),
//!         _ => continue,
//!     }
//!     dumps.extend(tracker.observe(&state));
//! }
//! dumps.extend(tracker.finish(&state));
//! ```
mod binutil;
pub mod chip;
pub mod vgm;

pub use binutil::{ParseError, ParseErrors};
pub use vgm::command::{CommandType, PcmWriteWait, VgmCommand, WaitShort};
pub use vgm::{BodyParser, HeaderParser, VgmHeader};

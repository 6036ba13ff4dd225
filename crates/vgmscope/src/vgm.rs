//! VGM format support: the command catalog, the decoded header and the
//! streaming header/body parsers.
pub mod command;
mod header;
pub mod parser;

pub use command::{CommandType, VgmCommand};
pub use header::{SUPPORTED_VERSIONS, VGM_MAGIC, VgmHeader, VgmHeaderField};
pub use parser::{BodyParser, Commands, HeaderParser};

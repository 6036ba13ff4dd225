//! Command implementations behind the `vgmscope` subcommands.
pub mod dump;
pub mod interpret;

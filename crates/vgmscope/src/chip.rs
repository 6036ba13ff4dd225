//! Sound chip models driven by decoded VGM commands.
//!
//! `state` holds the YM2612 register-state interpreter and its snapshot
//! types; `dx7` converts captured voices into DX7 patch descriptions.
pub mod dx7;
pub mod state;

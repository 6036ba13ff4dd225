//! Chip register state tracking.
//!
//! This module turns a stream of register writes into structured chip
//! state and provides the snapshot types used to detect voice changes.
//!
//! # Architecture
//!
//! - **ChipState**: trait implemented by chip models (`write`,
//!   `read_register`, `reset`)
//! - **Ym2612State**: the YM2612 model, 6 channels of 4 operators each
//! - **RegisterBank**: raw last-written values for one register port
//! - **ChannelSnapshot / OperatorSnapshot**: value copies of voice state
//! - **PresetTracker**: debounced detection of voice changes
//!
//! # Examples
//!
//! ```
//! use vgmscope::chip::state::{ChipState, Ym2612State};
//!
//! let mut state = Ym2612State::new();
//! state.write_port1(0xB4, 0xC0); // channel 3: left and right on
//! assert!(state.channel(3).stereo_left());
//! assert_eq!(state.read_register(1, 0xB4), Some(0xC0));
//! ```

pub mod channel;
pub mod chip_state;
pub mod preset;
pub mod snapshot;
pub mod storage;
pub mod ym2612;

pub use channel::{Channel, Operator};
pub use chip_state::ChipState;
pub use preset::{PresetDump, PresetTracker};
pub use snapshot::{ChannelSnapshot, OperatorSnapshot};
pub use storage::RegisterBank;
pub use ym2612::{Timers, Ym2612State};

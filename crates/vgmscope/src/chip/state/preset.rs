//! Preset-change detection over a stream of YM2612 writes.
//!
//! `PresetTracker` watches channel snapshots after every write and
//! decides when a voice worth keeping has been seen. A run of
//! consecutive writes that each change some channel's voice (a preset
//! being loaded register by register) is collapsed: only the snapshots
//! held immediately *before* the run started are emitted. Each channel
//! is emitted at most once per distinct voice, numbered from 1.

use super::snapshot::ChannelSnapshot;
use super::ym2612::Ym2612State;

const CHANNELS: usize = 6;

/// A channel voice selected for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDump {
    /// Channel index, 0-5.
    pub channel: usize,
    /// Per-channel sequence number starting at 1.
    pub sequence: u32,
    pub snapshot: ChannelSnapshot,
}

/// Debounced preset-change detector.
///
/// ```
/// use vgmscope::chip::state::{PresetTracker, Ym2612State};
///
/// let mut state = Ym2612State::new();
/// let mut tracker = PresetTracker::new(&state);
///
/// state.write_port0(0xB0, 0x07);
/// // The first change flushes the power-on voices.
/// let dumps = tracker.observe(&state);
/// assert_eq!(dumps.len(), 6);
///
/// let dumps = tracker.finish(&state);
/// assert_eq!(dumps.len(), 1);
/// assert_eq!(dumps[0].snapshot.algorithm, 7);
/// ```
#[derive(Debug, Clone)]
pub struct PresetTracker {
    /// Snapshots taken after the previous write.
    last: [ChannelSnapshot; CHANNELS],
    /// Last snapshot emitted for each channel.
    dumped: [Option<ChannelSnapshot>; CHANNELS],
    counts: [u32; CHANNELS],
    /// Whether the previous write changed the preset.
    changed: bool,
}

fn snapshots(state: &Ym2612State) -> [ChannelSnapshot; CHANNELS] {
    std::array::from_fn(|ch| state.channel(ch).snapshot())
}

impl PresetTracker {
    /// Start tracking from the current state of `state`.
    pub fn new(state: &Ym2612State) -> Self {
        Self {
            last: snapshots(state),
            dumped: [None; CHANNELS],
            counts: [0; CHANNELS],
            changed: false,
        }
    }

    /// Observe the state after one write.
    ///
    /// Returns the dumps to emit, which is empty unless this write starts
    /// a run of preset changes.
    pub fn observe(&mut self, state: &Ym2612State) -> Vec<PresetDump> {
        let current = snapshots(state);
        let preset_changed = current != self.last;

        let dumps = if preset_changed && !self.changed {
            tracing::debug!("preset change started, flushing previous voices");
            let previous = self.last;
            self.flush(&previous)
        } else {
            Vec::new()
        };

        self.changed = preset_changed;
        self.last = current;
        dumps
    }

    /// Flush the final state at end of stream.
    pub fn finish(&mut self, state: &Ym2612State) -> Vec<PresetDump> {
        let current = snapshots(state);
        self.last = current;
        self.flush(&current)
    }

    /// Number of dumps emitted so far for `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= 6`.
    pub fn count(&self, channel: usize) -> u32 {
        self.counts[channel]
    }

    fn flush(&mut self, snapshots: &[ChannelSnapshot; CHANNELS]) -> Vec<PresetDump> {
        let mut dumps = Vec::new();
        for (ch, snapshot) in snapshots.iter().enumerate() {
            if self.dumped[ch].as_ref() == Some(snapshot) {
                continue;
            }
            self.dumped[ch] = Some(*snapshot);
            self.counts[ch] += 1;
            tracing::debug!(channel = ch, sequence = self.counts[ch], "preset dump");
            dumps.push(PresetDump {
                channel: ch,
                sequence: self.counts[ch],
                snapshot: *snapshot,
            });
        }
        dumps
    }
}

use vgmscope::chip::state::{ChipState, Ym2612State};

#[test]
fn test_ym2612_every_register_and_value() {
    // No write on either port may panic or corrupt unrelated channels.
    let mut state = Ym2612State::new();
    for register in 0..=0xFFu8 {
        for value in 0..=0xFFu8 {
            state.write_port0(register, value);
            state.write_port1(register, value);
        }
    }
    for ch in 0..6 {
        let channel = state.channel(ch);
        assert_eq!(channel.index() as usize, ch);
        assert!(channel.algorithm() <= 7);
        assert!(channel.feedback() <= 7);
        assert!(channel.frequency_octave() <= 7);
        for op in channel.operators() {
            assert!(op.multiply() <= 15);
            assert!(op.detune() <= 7);
            assert!(op.volume_inverse() <= 127);
            assert!(op.attack_rate() <= 31);
        }
    }
}

#[test]
fn test_ym2612_channel_0_voice() {
    let mut state = Ym2612State::new();
    state.write_port0(0xB0, 0x32);
    state.write_port0(0x30, 0x11);

    let ch0 = state.channel(0);
    assert_eq!(ch0.algorithm(), 2);
    assert_eq!(ch0.feedback(), 6);
    assert_eq!(ch0.operator(0).multiply(), 1);
    assert_eq!(ch0.operator(0).detune(), 1);

    // Other channels untouched.
    assert_eq!(state.channel(1).algorithm(), 0);
    assert_eq!(state.channel(3).algorithm(), 0);
}

#[test]
fn test_ym2612_operator_envelope_fields() {
    let mut state = Ym2612State::new();
    // Channel 1, operator 2: register = base + operator * 4 + channel.
    let reg = |base: u8| base + 2 * 4 + 1;
    state.write_port0(reg(0x40), 0xFF);
    state.write_port0(reg(0x50), 0xDF);
    state.write_port0(reg(0x60), 0x8A);
    state.write_port0(reg(0x70), 0x07);
    state.write_port0(reg(0x80), 0x5C);

    let op = state.channel(1).operator(2);
    assert_eq!(op.volume_inverse(), 0x7F);
    assert_eq!(op.rate_scaling(), 3);
    assert_eq!(op.attack_rate(), 0x1F);
    assert!(op.amplitude_modulation());
    assert_eq!(op.decay_1_rate(), 0x0A);
    assert_eq!(op.decay_2_rate(), 0x07);
    assert_eq!(op.secondary_amplitude(), 5);
    assert_eq!(op.release_rate(), 0x0C);

    let snapshot = op.snapshot();
    assert_eq!(snapshot.decay_1_level, 5);
    assert_eq!(snapshot.volume(), 0);
}

#[test]
fn test_ym2612_port1_maps_to_upper_channels() {
    let mut state = Ym2612State::new();
    for slot in 0..3u8 {
        for op in 0..4u8 {
            let value = 0x10 + slot * 4 + op;
            state.write_port1(0x40 + op * 4 + slot, value);
        }
        state.write_port1(0xB0 + slot, slot + 1);
    }

    for slot in 0..3usize {
        let lower = state.channel(slot);
        let upper = state.channel(slot + 3);
        assert_eq!(upper.algorithm() as usize, slot + 1);
        assert_eq!(lower.algorithm(), 0);
        for op in 0..4usize {
            assert_eq!(upper.operator(op).volume_inverse() as usize, 0x10 + slot * 4 + op);
            assert_eq!(lower.operator(op).volume_inverse(), 0);
        }
    }
}

#[test]
fn test_ym2612_unused_slot_is_ignored() {
    let mut state = Ym2612State::new();
    let before = state.clone();
    // Slot 3 of every operator block has no channel.
    state.write_port0(0x33, 0x7F);
    state.write_port0(0xB3, 0x07);
    state.write_port1(0x4F, 0x7F);
    assert_eq!(state.channels(), before.channels());
    // The raw value is still recorded.
    assert_eq!(state.read_register(0, 0x33), Some(0x7F));
}

#[test]
fn test_ym2612_key_on_off() {
    let mut state = Ym2612State::new();
    state.write_port0(0x28, 0xF5); // channel 4, all operators
    assert!(state.channel(4).operators().iter().all(|op| op.enabled()));

    state.write_port0(0x28, 0x35); // operators 0 and 1 only
    let enabled: Vec<bool> = state.channel(4).operators().iter().map(|op| op.enabled()).collect();
    assert_eq!(enabled, vec![true, true, false, false]);

    // Invalid channel selectors change nothing.
    let before = state.clone();
    state.write_port0(0x28, 0xF3);
    state.write_port0(0x28, 0xF7);
    assert_eq!(state.channels(), before.channels());
}

#[test]
fn test_ym2612_special_mode_frequencies() {
    let mut state = Ym2612State::new();
    state.write_port0(0x27, 0x40);
    assert!(state.channel_3_6_special_mode());

    // Channel 2 frequency registers now address operator 0.
    state.write_port0(0xA6, 0x22);
    state.write_port0(0xA2, 0x44);
    let ch2 = state.channel(2);
    assert_eq!(ch2.operator(0).frequency_lsb(), 0x44);
    assert_eq!(ch2.operator(0).frequency_msb(), 0x02);
    assert_eq!(ch2.operator(0).frequency_octave(), 0x04);
    assert_eq!(ch2.frequency_lsb(), 0);

    // Supplementary registers address operators 1-3.
    state.write_port0(0xA8, 0x01);
    state.write_port0(0xA9, 0x02);
    state.write_port0(0xAA, 0x03);
    state.write_port0(0xAC, 0x09);
    let ch2 = state.channel(2);
    assert_eq!(ch2.operator(1).frequency_lsb(), 0x01);
    assert_eq!(ch2.operator(2).frequency_lsb(), 0x02);
    assert_eq!(ch2.operator(3).frequency_lsb(), 0x03);
    assert_eq!(ch2.operator(1).frequency_msb(), 0x01);
    assert_eq!(ch2.operator(1).frequency_octave(), 0x01);

    // Port 1 supplementary registers address channel 5.
    state.write_port1(0xA9, 0x55);
    assert_eq!(state.channel(5).operator(2).frequency_lsb(), 0x55);

    // Back to normal mode.
    state.write_port0(0x27, 0x00);
    assert!(!state.channel_3_6_special_mode());
    state.write_port0(0xA2, 0x66);
    assert_eq!(state.channel(2).frequency_lsb(), 0x66);
}

#[test]
fn test_ym2612_invalid_mode_keeps_previous() {
    let mut state = Ym2612State::new();
    state.write_port0(0x27, 0x40);
    state.write_port0(0x27, 0x80 | 0x15);
    assert!(state.channel_3_6_special_mode());
    // Timer bits still apply.
    let timers = state.timers();
    assert!(timers.a_reset);
    assert!(timers.a_enable);
    assert!(timers.a_load);
    assert!(!timers.b_reset);
    assert!(!timers.b_enable);

    state.write_port0(0x27, 0xC0);
    assert!(state.channel_3_6_special_mode());
}

#[test]
fn test_ym2612_globals() {
    let mut state = Ym2612State::new();
    state.write_port0(0x22, 0x0D);
    state.write_port0(0x26, 0xC8);
    state.write_port0(0x2A, 0x80);
    state.write_port0(0x2B, 0x80);
    assert!(state.lfo_enable());
    assert_eq!(state.lfo_frequency(), 5);
    assert_eq!(state.timers().b_value, 0xC8);
    assert_eq!(state.dac_data(), 0x80);
    assert!(state.dac_enable());

    // Globals are only decoded on port 0.
    state.write_port1(0x2B, 0x00);
    state.write_port1(0x22, 0x00);
    assert!(state.dac_enable());
    assert!(state.lfo_enable());
}

#[test]
fn test_ym2612_stereo_lfo_sensitivity() {
    let mut state = Ym2612State::new();
    state.write_port1(0xB5, 0xB3);
    let ch = state.channel(4);
    assert!(ch.stereo_left());
    assert!(!ch.stereo_right());
    assert_eq!(ch.lfo_amplitude_sensitivity(), 3);
    assert_eq!(ch.lfo_frequency_sensitivity(), 3);
}

#[test]
fn test_ym2612_snapshot_ignores_frequency() {
    let mut state = Ym2612State::new();
    let before = state.channel(0).snapshot();
    state.write_port0(0xA4, 0x22);
    state.write_port0(0xA0, 0x69);
    state.write_port0(0xB4, 0xC0);
    state.write_port0(0x28, 0xF0);
    assert_eq!(state.channel(0).snapshot(), before);
    assert_eq!(state.channel(0).frequency_number(), 0x269);

    state.write_port0(0x30, 0x70);
    assert_ne!(state.channel(0).snapshot(), before);
}

#[test]
fn test_ym2612_reset() {
    let mut state = Ym2612State::new();
    state.write_port0(0xB0, 0x07);
    state.write(1, 0xB0, 0x07);
    assert_eq!(state.read_register(1, 0xB0), Some(0x07));
    state.reset();
    assert_eq!(state, Ym2612State::new());
    assert_eq!(state.read_register(0, 0xB0), None);
}

#[test]
fn test_ym2612_try_channel() {
    let state = Ym2612State::new();
    assert!(state.try_channel(5).is_some());
    assert!(state.try_channel(6).is_none());
}

#[test]
#[should_panic]
fn test_ym2612_channel_out_of_range() {
    let state = Ym2612State::new();
    let _ = state.channel(6);
}

#[test]
#[should_panic]
fn test_ym2612_operator_out_of_range() {
    let state = Ym2612State::new();
    let _ = state.channel(0).operator(4);
}

use std::path::Path;

use vgmscope::vgm::{HeaderParser, SUPPORTED_VERSIONS};
use vgmscope::{CommandType, PcmWriteWait, VgmCommand, VgmHeader, WaitShort};

/// Builds VGM files in memory: a 64-byte header followed by raw body bytes.
struct VgmBytes {
    bytes: Vec<u8>,
}

impl VgmBytes {
    fn new(version: u32) -> Self {
        let mut bytes = vec![0u8; 0x40];
        bytes[0..4].copy_from_slice(b"Vgm ");
        bytes[0x08..0x0C].copy_from_slice(&version.to_le_bytes());
        Self { bytes }
    }

    fn field(mut self, offset: usize, value: u32) -> Self {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    fn body(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(data);
        self
    }

    fn build(self) -> Vec<u8> {
        self.bytes
    }
}

fn parse_header(bytes: &[u8]) -> VgmHeader {
    let (_, header) = HeaderParser::open(None, bytes)
        .parse()
        .expect("header should parse");
    header
}

/// Decode every command up to and including `Eof`.
fn parse_body(bytes: &[u8]) -> Vec<VgmCommand> {
    let (mut body, _) = HeaderParser::open(None, bytes)
        .parse()
        .expect("header should parse");
    let mut out = Vec::new();
    loop {
        let cmd = body.parse().expect("body should parse");
        out.push(cmd);
        if cmd == VgmCommand::Eof {
            return out;
        }
    }
}

#[test]
fn every_catalog_tag_decodes_in_order() {
    let mut body = vec![
        0x4F, 0x12, // game gear stereo
        0x50, 0x34, // psg
        0x51, 0x01, 0x02, // ym2413
        0x52, 0x22, 0x08, // ym2612 port 0
        0x53, 0xB4, 0xC0, // ym2612 port 1
        0xE0, 0x78, 0x56, 0x34, 0x12, // seek pcm
        0x61, 0x44, 0x01, // wait 0x144
        0x62, 0x63, // wait 735, wait 882
        0x67, 0x66, 0x00, 0x03, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0xCC, // data block
    ];
    body.extend(0x70..=0x7Fu8);
    body.extend(0x80..=0x8Fu8);
    body.push(0x66);

    let mut expected = vec![
        VgmCommand::GameGearPsgStereoWrite(0x12),
        VgmCommand::PsgWrite(0x34),
        VgmCommand::Ym2413Write {
            register: 0x01,
            value: 0x02,
        },
        VgmCommand::Ym2612Port0Write {
            register: 0x22,
            value: 0x08,
        },
        VgmCommand::Ym2612Port1Write {
            register: 0xB4,
            value: 0xC0,
        },
        VgmCommand::Ym2612SeekPcm(0x1234_5678),
        VgmCommand::WaitLong(0x144),
        VgmCommand::Wait735,
        VgmCommand::Wait882,
        VgmCommand::DataBlock {
            data_type: 0x00,
            size: 3,
        },
    ];
    expected.extend((0x70..=0x7Fu8).map(|t| VgmCommand::WaitShort(WaitShort::from_tag(t))));
    expected.extend((0x80..=0x8Fu8).map(|t| VgmCommand::Ym2612PcmWriteWait(PcmWriteWait::from_tag(t))));
    expected.push(VgmCommand::EndOfSoundData);
    expected.push(VgmCommand::Eof);

    let bytes = VgmBytes::new(0x150).body(&body).build();
    let commands = parse_body(&bytes);
    assert_eq!(commands, expected);

    // Every tag enumerator matches the byte that produced it.
    let tags: Vec<u8> = commands[..commands.len() - 1]
        .iter()
        .map(|c| c.command_type().tag())
        .collect();
    let mut expected_tags = vec![
        0x4F, 0x50, 0x51, 0x52, 0x53, 0xE0, 0x61, 0x62, 0x63, 0x67,
    ];
    expected_tags.extend(0x70..=0x8Fu8);
    expected_tags.push(0x66);
    assert_eq!(tags, expected_tags);
}

#[test]
fn short_wait_lengths() {
    let bytes = VgmBytes::new(0x150)
        .body(&[0x70, 0x7F, 0x80, 0x8F])
        .build();
    let samples: Vec<Option<u32>> = parse_body(&bytes).iter().map(|c| c.samples()).collect();
    assert_eq!(samples, vec![Some(1), Some(16), Some(0), Some(15), None]);
}

#[test]
fn bad_data_block_compatibility_byte() {
    let bytes = VgmBytes::new(0x150).body(&[0x67, 0x65, 0x00]).build();
    let (mut body, _) = HeaderParser::open(None, &bytes[..]).parse().unwrap();
    let errors = body.parse().unwrap_err();
    assert_eq!(errors.len(), 1);
    let err = errors.first();
    // Just past the compatibility byte.
    assert_eq!(err.offset, 0x42);
    assert!(err.message.contains("received 67 65"), "{}", err.message);
    assert!(err.message.contains("expected 67 66"), "{}", err.message);
}

#[test]
fn gd3_and_loop_offsets() {
    let bytes = VgmBytes::new(0x150).build();
    let header = parse_header(&bytes);
    assert_eq!(header.gd3_offset, None);
    assert_eq!(header.loop_offset, None);
    assert_eq!(header.loop_sample_count, None);

    let bytes = VgmBytes::new(0x150)
        .field(0x14, 100)
        .field(0x1C, 0x10)
        .field(0x20, 44100)
        .build();
    let header = parse_header(&bytes);
    assert_eq!(header.gd3_offset, Some(120));
    assert_eq!(header.loop_offset, Some(0x2C));
    assert_eq!(header.loop_sample_count, Some(44100));
}

#[test]
fn data_offset_resolution() {
    // Zero resolves to 12 but commands still start after the header.
    let bytes = VgmBytes::new(0x150).body(&[0x62]).build();
    let header = parse_header(&bytes);
    assert_eq!(header.data_offset, 12);
    assert_eq!(parse_body(&bytes), vec![VgmCommand::Wait735, VgmCommand::Eof]);

    // 0x38 + 0x34 = 108: 44 bytes of padding are skipped. The padding is
    // made of bytes that would not decode as commands.
    let mut body = vec![0x01u8; 108 - 64];
    body.push(0x63);
    let bytes = VgmBytes::new(0x150).field(0x34, 0x38).body(&body).build();
    assert_eq!(parse_header(&bytes).data_offset, 108);

    let (mut parser, _) = HeaderParser::open(None, &bytes[..]).parse().unwrap();
    assert_eq!(parser.offset(), 108);
    assert_eq!(parser.parse().unwrap(), VgmCommand::Wait882);
    assert_eq!(parser.offset(), 109);
}

#[test]
fn header_fields() {
    let mut bytes = VgmBytes::new(0x161)
        .field(0x04, 0x1000)
        .field(0x0C, 3_579_545)
        .field(0x18, 88200)
        .field(0x24, 60)
        .field(0x2C, 7_670_453)
        .build();
    bytes[0x28..0x2A].copy_from_slice(&0x0009u16.to_le_bytes());
    bytes[0x2A] = 16;
    bytes[0x2B] = 0x01;

    let header = parse_header(&bytes);
    assert_eq!(header.eof_offset, 0x1004);
    assert_eq!(header.version, 0x161);
    assert_eq!(header.sn76489_clock, Some(3_579_545));
    assert_eq!(header.ym2413_clock, None);
    assert_eq!(header.sample_count, 88200);
    assert_eq!(header.rate, 60);
    assert_eq!(header.sn76489_feedback, 9);
    assert_eq!(header.sn76489_shift_register_width, 16);
    assert_eq!(header.sn76489_flags, 1);
    assert_eq!(header.ym2612_clock, Some(7_670_453));
    assert_eq!(header.ym2151_clock, None);
    assert_eq!(header.version_string(), "1.61");
}

#[test]
fn bad_magic_number() {
    let mut bytes = VgmBytes::new(0x150).build();
    bytes[3] = b'!';
    let errors = HeaderParser::open(Some(Path::new("bad.vgm")), &bytes[..])
        .parse()
        .unwrap_err();
    let err = errors.first();
    assert_eq!(err.offset, 4);
    assert!(err.message.contains("56676D21"), "{}", err.message);
    assert!(err.message.contains("56676D20"), "{}", err.message);
    assert!(errors.to_string().starts_with("bad.vgm: 0x4: bad magic number"));
}

#[test]
fn unsupported_version_lists_supported_set() {
    let bytes = VgmBytes::new(0x101).build();
    let errors = HeaderParser::open(None, &bytes[..]).parse().unwrap_err();
    let err = errors.first();
    assert_eq!(err.offset, 12);
    assert!(err.message.contains("0x101"), "{}", err.message);
    for v in SUPPORTED_VERSIONS {
        assert!(err.message.contains(&format!("0x{:x}", v)), "{}", err.message);
    }
}

#[test]
fn every_supported_version_parses() {
    for v in SUPPORTED_VERSIONS {
        let bytes = VgmBytes::new(v).build();
        assert_eq!(parse_header(&bytes).version, v);
    }
}

#[test]
fn truncated_header_is_an_io_error() {
    let bytes = VgmBytes::new(0x150).build();
    // Cut inside the GD3 offset field: the partial field is counted.
    let errors = HeaderParser::open(None, &bytes[..22]).parse().unwrap_err();
    let err = errors.first();
    assert_eq!(err.offset, 22);
    let cause = err.cause.as_ref().expect("io cause");
    assert_eq!(cause.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[test]
fn reserved_ranges_are_skipped() {
    let bytes = VgmBytes::new(0x150)
        .body(&[
            0x30, 0xFF, // 1 byte
            0x4E, 0x62, // 1 byte before 1.60
            0xA1, 0x01, 0x02, // 2 bytes
            0xC9, 0x01, 0x02, 0x03, // 3 bytes
            0xDF, 0x01, 0x02, 0x03, // 3 bytes
            0xE2, 0x01, 0x02, 0x03, 0x04, // 4 bytes
            0xFF, 0x01, 0x02, 0x03, 0x04, // 4 bytes
            0x62,
        ])
        .build();
    assert_eq!(parse_body(&bytes), vec![VgmCommand::Wait735, VgmCommand::Eof]);
}

#[test]
fn raw_end_of_stream_is_not_an_error() {
    // Truncated inside a port 0 write.
    let bytes = VgmBytes::new(0x150).body(&[0x62, 0x52, 0x2A]).build();
    let (mut body, _) = HeaderParser::open(None, &bytes[..]).parse().unwrap();
    assert_eq!(body.parse().unwrap(), VgmCommand::Wait735);
    assert_eq!(body.parse().unwrap(), VgmCommand::Eof);
    assert_eq!(body.parse().unwrap(), VgmCommand::Eof);
    assert!(body.is_finished());
}

#[test]
fn truncated_data_block_ends_stream() {
    let bytes = VgmBytes::new(0x150)
        .body(&[0x67, 0x66, 0x00, 0x10, 0x00, 0x00, 0x00, 0xAA])
        .build();
    assert_eq!(parse_body(&bytes), vec![VgmCommand::Eof]);
}

#[test]
fn end_of_sound_data_is_terminal() {
    let bytes = VgmBytes::new(0x150).body(&[0x66, 0x62, 0x63]).build();
    let (mut body, _) = HeaderParser::open(None, &bytes[..]).parse().unwrap();
    assert_eq!(body.parse().unwrap(), VgmCommand::EndOfSoundData);
    let offset = body.offset();
    for _ in 0..3 {
        assert_eq!(body.parse().unwrap(), VgmCommand::Eof);
    }
    // Nothing after the end tag is read.
    assert_eq!(body.offset(), offset);
}

#[test]
fn unknown_tag_is_an_error() {
    let bytes = VgmBytes::new(0x150).body(&[0x62, 0x64]).build();
    let (mut body, _) = HeaderParser::open(Some(Path::new("x.vgm")), &bytes[..])
        .parse()
        .unwrap();
    let commands: Vec<_> = body.commands().collect();
    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], Ok(VgmCommand::Wait735)));
    let errors = commands[1].as_ref().unwrap_err();
    assert_eq!(errors.first().offset, 0x42);
    assert_eq!(errors.first().path.as_deref(), Some(Path::new("x.vgm")));
}

#[test]
fn command_type_lookup() {
    assert_eq!(CommandType::from_tag(0x52), Some(CommandType::Ym2612Port0Write));
    assert_eq!(CommandType::from_tag(0x30), None);
    assert_eq!(CommandType::from_tag(0x64), None);
    assert_eq!(CommandType::Ym2612SeekPcm.tag(), 0xE0);
}

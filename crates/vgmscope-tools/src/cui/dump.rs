use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};
use vgmscope::{HeaderParser, VgmCommand, VgmHeader};

fn clock(value: Option<u32>) -> String {
    value
        .map(|hz| format!("{} Hz", hz))
        .unwrap_or_else(|| "(unused)".to_string())
}

fn offset(value: Option<u64>) -> String {
    value
        .map(|o| format!("0x{:08X}", o))
        .unwrap_or_else(|| "(none)".to_string())
}

/// Key/value rows describing a header.
fn summarize_header(header: &VgmHeader) -> Vec<(&'static str, String)> {
    vec![
        (
            "version",
            format!("{} (0x{:08X})", header.version_string(), header.version),
        ),
        ("eof_offset", format!("0x{:08X}", header.eof_offset)),
        ("gd3_offset", offset(header.gd3_offset)),
        ("data_offset", format!("0x{:08X}", header.data_offset)),
        (
            "total_samples",
            format!(
                "{} ({:.3} s @ 44100Hz)",
                header.sample_count,
                header.duration_secs()
            ),
        ),
        ("loop_offset", offset(header.loop_offset)),
        (
            "loop_samples",
            header
                .loop_sample_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "(none)".to_string()),
        ),
        ("rate", header.rate.to_string()),
        ("sn76489_clock", clock(header.sn76489_clock)),
        (
            "sn76489_lfsr",
            format!(
                "feedback=0x{:04X} width={} flags=0x{:02X}",
                header.sn76489_feedback,
                header.sn76489_shift_register_width,
                header.sn76489_flags
            ),
        ),
        ("ym2413_clock", clock(header.ym2413_clock)),
        ("ym2612_clock", clock(header.ym2612_clock)),
        ("ym2151_clock", clock(header.ym2151_clock)),
        ("sega_pcm_clock", clock(header.sega_pcm_clock)),
        (
            "sega_pcm_interface",
            format!("0x{:08X}", header.sega_pcm_interface_register),
        ),
    ]
}

fn header_table(header: &VgmHeader) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Field"), Cell::new("Value")]);
    for (key, value) in summarize_header(header) {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

/// Print the header summary and every command of a VGM stream.
///
/// Body errors are logged and counted; dumping continues past them as
/// long as the stream keeps advancing. Returns the number of errors.
pub fn dump_vgm<R: Read, W: Write>(
    path: Option<&Path>,
    reader: R,
    out: &mut W,
) -> anyhow::Result<usize> {
    let (mut body, header) = HeaderParser::open(path, reader)
        .parse()
        .context("failed to parse VGM header")?;

    writeln!(out, "{}", header_table(&header))?;
    writeln!(out)?;
    writeln!(out, "{:<10} Command", "Offset")?;
    writeln!(out, "{}", "-".repeat(72))?;

    let mut errors = 0;
    loop {
        let start = body.offset();
        match body.parse() {
            Ok(VgmCommand::Eof) => break,
            Ok(command) => writeln!(out, "0x{:08X} {}", start, command)?,
            Err(e) => {
                for err in &e {
                    tracing::error!(offset = err.offset, "{}", err.message);
                }
                errors += e.len();
                if body.offset() == start {
                    tracing::error!(offset = start, "stream did not advance, stopping");
                    break;
                }
            }
        }
    }

    tracing::info!(errors, end = body.offset(), "dump finished");
    Ok(errors)
}

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use vgmscope::chip::dx7::adapt_snapshot;
use vgmscope::chip::state::{PresetDump, PresetTracker, Ym2612State};
use vgmscope::{HeaderParser, VgmCommand};

/// File name for a dump: `chNN-SSSS.txt`.
fn dump_file_name(dump: &PresetDump) -> String {
    format!("ch{:02}-{:04}.txt", dump.channel, dump.sequence)
}

fn write_dump(output: &Path, dump: &PresetDump, dx7: bool) -> anyhow::Result<PathBuf> {
    let name = dump_file_name(dump);
    let path = output.join(&name);

    let mut text = dump.snapshot.to_string();
    if dx7 {
        let stem = name.trim_end_matches(".txt");
        text.push_str(&adapt_snapshot(stem, &dump.snapshot).to_string());
    }

    fs::write(&path, text)
        .with_context(|| format!("failed to write snapshot: {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote snapshot");
    Ok(path)
}

/// Result of an interpret run.
#[derive(Debug, Default)]
pub struct InterpretReport {
    /// Snapshot files written, in emission order.
    pub written: Vec<PathBuf>,
    /// Body parse errors logged along the way.
    pub errors: usize,
}

/// Replay the YM2612 writes of a VGM stream and write every selected
/// channel voice into `output`.
///
/// Body errors are logged and counted; replay continues past them as long
/// as the stream keeps advancing, and the final voices are flushed either
/// way.
pub fn interpret_vgm<R: Read>(
    path: Option<&Path>,
    reader: R,
    output: &Path,
    dx7: bool,
) -> anyhow::Result<InterpretReport> {
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    let (mut body, header) = HeaderParser::open(path, reader)
        .parse()
        .context("failed to parse VGM header")?;
    if header.ym2612_clock.is_none() {
        tracing::warn!("header declares no YM2612 clock");
    }

    let mut state = Ym2612State::new();
    let mut tracker = PresetTracker::new(&state);
    let mut report = InterpretReport::default();

    loop {
        let start = body.offset();
        match body.parse() {
            Ok(VgmCommand::Eof) => break,
            Ok(VgmCommand::Ym2612Port0Write { register, value }) => {
                state.write_port0(register, value)
            }
            Ok(VgmCommand::Ym2612Port1Write { register, value }) => {
                state.write_port1(register, value)
            }
            Ok(_) => continue,
            Err(e) => {
                for err in &e {
                    tracing::error!(offset = err.offset, "{}", err.message);
                }
                report.errors += e.len();
                if body.offset() == start {
                    tracing::error!(offset = start, "stream did not advance, stopping");
                    break;
                }
                continue;
            }
        }
        for dump in tracker.observe(&state) {
            report.written.push(write_dump(output, &dump, dx7)?);
        }
    }
    for dump in tracker.finish(&state) {
        report.written.push(write_dump(output, &dump, dx7)?);
    }

    tracing::info!(
        files = report.written.len(),
        errors = report.errors,
        "interpret finished"
    );
    Ok(report)
}

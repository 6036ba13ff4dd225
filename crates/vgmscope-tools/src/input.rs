use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context;
use flate2::read::GzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Open a VGM stream from a path or stdin (`-`).
///
/// Gzip input is decoded when `gzip` is set, when the path ends in `.vgz`
/// or `.gz`, or when the stream starts with the gzip magic bytes.
pub fn open_input(path: &Path, gzip: bool) -> anyhow::Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = if path == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(path)
            .with_context(|| format!("failed to open input file: {}", path.display()))?;
        Box::new(file)
    };
    let mut reader = BufReader::new(reader);

    let is_gzip = gzip
        || has_gzip_extension(path)
        || reader
            .fill_buf()
            .with_context(|| format!("failed to read input: {}", path.display()))?
            .starts_with(&GZIP_MAGIC);

    if is_gzip {
        tracing::debug!(path = %path.display(), "decoding gzip input");
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// The path to report in parse errors, `None` for stdin.
pub fn source_path(path: &Path) -> Option<&Path> {
    (path != Path::new("-")).then_some(path)
}

fn has_gzip_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("vgz") || s.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

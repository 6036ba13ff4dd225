//! Utilities used by parsers: parse error types and a position-tracking
//! little-endian byte reader.
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// A single structured parse error.
///
/// - `offset` is the number of bytes consumed from the stream when the
///   error was detected.
/// - `path` is the source file, when the stream was opened from one.
/// - `message` is a human-readable description.
/// - `cause` carries the underlying I/O error, if any.
#[derive(Debug, thiserror::Error)]
#[error("0x{offset:x}: {message}")]
pub struct ParseError {
    pub offset: u64,
    pub path: Option<PathBuf>,
    pub message: String,
    #[source]
    pub cause: Option<io::Error>,
}

impl ParseError {
    /// Create an error without an underlying cause.
    pub fn new(offset: u64, path: Option<&Path>, message: impl Into<String>) -> Self {
        Self {
            offset,
            path: path.map(Path::to_path_buf),
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap an I/O error, keeping it as the cause.
    pub fn io(offset: u64, path: Option<&Path>, cause: io::Error) -> Self {
        Self {
            offset,
            path: path.map(Path::to_path_buf),
            message: cause.to_string(),
            cause: Some(cause),
        }
    }
}

/// A non-empty list of parse errors.
///
/// Every parse call currently reports exactly one error, but the list
/// shape leaves room for accumulating several.
#[derive(Debug)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Append another error to the list.
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// The first (and usually only) error.
    pub fn first(&self) -> &ParseError {
        &self.errors[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; the list holds at least one error.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if let Some(path) = &e.path {
                write!(f, "{}: ", path.display())?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.first())
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Little-endian reader that counts consumed bytes.
///
/// The count is the stream position used for diagnostics and for the
/// header layout assertions.
#[derive(Debug)]
pub(crate) struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> CountingReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    /// Number of bytes consumed so far.
    pub(crate) fn position(&self) -> u64 {
        self.count
    }

    /// Read exactly `N` bytes.
    ///
    /// Bytes read before a short read or an error are still counted.
    pub(crate) fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        let mut filled = 0;
        while filled < N {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("stream ended after reading {} of {} bytes", filled, N),
                    ));
                }
                Ok(n) => {
                    filled += n;
                    self.count += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(buf)
    }

    pub(crate) fn read_u8(&mut self) -> io::Result<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub(crate) fn read_u16_le(&mut self) -> io::Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub(crate) fn read_u32_le(&mut self) -> io::Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Discard exactly `len` bytes.
    ///
    /// Returns `ErrorKind::UnexpectedEof` if the stream ends first; the
    /// bytes that were available are still counted.
    pub(crate) fn skip(&mut self, len: u64) -> io::Result<()> {
        let copied = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())?;
        self.count += copied;
        if copied < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("stream ended after skipping {} of {} bytes", copied, len),
            ));
        }
        Ok(())
    }
}

//! Interchange file I/O.
//!
//! Export files are written to a temporary file next to the target and
//! renamed into place on [`InterchangeWriter::commit`]. A writer dropped
//! without committing leaves nothing behind.

use crate::error::{StorageError, StorageResult};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression applied to an interchange file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Gzip stream.
    Gzip,
    /// Plain UTF-8 text.
    None,
}

impl Compression {
    /// Chooses compression from the file extension (`.gz` means gzip).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Self::Gzip,
            _ => Self::None,
        }
    }

    /// Detects compression from the leading bytes of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn detect(path: &Path) -> StorageResult<Self> {
        let mut magic = [0u8; 2];
        let mut file = File::open(path)?;
        let mut filled = 0;
        while filled < magic.len() {
            match file.read(&mut magic[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(if filled == magic.len() && magic == GZIP_MAGIC {
            Self::Gzip
        } else {
            Self::None
        })
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::None => "none",
        }
    }
}

enum Sink {
    Plain(BufWriter<NamedTempFile>),
    Gzip(GzEncoder<BufWriter<NamedTempFile>>),
}

/// Writer for an interchange file that only appears at its target path
/// once committed.
pub struct InterchangeWriter {
    sink: Sink,
    target: PathBuf,
    compression: Compression,
}

impl std::fmt::Debug for InterchangeWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterchangeWriter")
            .field("target", &self.target)
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

impl InterchangeWriter {
    /// Starts writing `target`. The temporary file is created in the same
    /// directory so the final rename stays on one filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn create(target: &Path, compression: Compression) -> StorageResult<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = BufWriter::new(NamedTempFile::new_in(dir)?);
        let sink = match compression {
            Compression::Gzip => Sink::Gzip(GzEncoder::new(temp, flate2::Compression::default())),
            Compression::None => Sink::Plain(temp),
        };
        Ok(Self {
            sink,
            target: target.to_path_buf(),
            compression,
        })
    }

    /// The final path.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The compression in use.
    #[must_use]
    pub const fn compression(&self) -> Compression {
        self.compression
    }

    /// Flushes, syncs and atomically moves the file into place.
    ///
    /// # Errors
    ///
    /// Returns an error if any write, sync or the final rename fails. The
    /// target path is left untouched in that case.
    pub fn commit(self) -> StorageResult<PathBuf> {
        let buffered = match self.sink {
            Sink::Plain(w) => w,
            Sink::Gzip(encoder) => encoder.finish()?,
        };
        let temp = buffered.into_inner().map_err(io::IntoInnerError::into_error)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.target)
            .map_err(|e| StorageError::Io(e.error))?;
        Ok(self.target)
    }
}

impl Write for InterchangeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}

/// Opens an interchange file for line reading, decompressing if the content
/// is gzip regardless of extension.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open(path: &Path) -> StorageResult<Box<dyn BufRead>> {
    let compression = Compression::detect(path)?;
    let file = File::open(path)?;
    Ok(match compression {
        Compression::Gzip => Box::new(BufReader::new(GzDecoder::new(file))),
        Compression::None => Box::new(BufReader::new(file)),
    })
}

/// Reads an entire interchange file as text.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_all(path: &Path) -> StorageResult<String> {
    let mut text = String::new();
    open(path)?.read_to_string(&mut text)?;
    Ok(text)
}

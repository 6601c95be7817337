// Output Sink - one "append a line" operation over every destination
//
// The destination and compression are fixed when the sink is opened. Files
// are buffered; gzip streams are finished when the sink is closed or dropped.

use crate::config::Compression;
use crate::errors::{ProofError, Result};
use flate2::write::GzEncoder;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Byte buffer shared between a sink and whoever wants to read it back
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where a stream goes
#[derive(Debug, Clone)]
pub enum Destination {
    /// `path` is the requested path; compression may add a suffix
    File {
        path: PathBuf,
        compression: Compression,
    },
    Memory(SharedBuffer),
}

impl Destination {
    pub fn file(path: impl Into<PathBuf>, compression: Compression) -> Self {
        Self::File {
            path: path.into(),
            compression,
        }
    }

    pub fn memory(buffer: &SharedBuffer) -> Self {
        Self::Memory(buffer.clone())
    }

    /// Path the bytes actually land in, for error reporting
    pub fn display_path(&self) -> PathBuf {
        match self {
            Self::File { path, compression } => compression.output_path(path),
            Self::Memory(_) => PathBuf::from("<memory>"),
        }
    }
}

enum Writer {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
    Memory(SharedBuffer),
}

impl Writer {
    fn as_write(&mut self) -> &mut dyn Write {
        match self {
            Writer::Plain(w) => w,
            Writer::Gzip(w) => w,
            Writer::Memory(w) => w,
        }
    }
}

/// Exclusively owned output stream
pub struct OutputSink {
    writer: Option<Writer>,
    path: PathBuf,
    bytes_written: u64,
}

impl OutputSink {
    pub fn open(destination: Destination) -> Result<Self> {
        let path = destination.display_path();
        let writer = match destination {
            Destination::File { compression, .. } => {
                let file = File::create(&path)
                    .map_err(|e| ProofError::io(&path, "creating", e))?;
                match compression {
                    Compression::None => Writer::Plain(BufWriter::new(file)),
                    Compression::Gzip => Writer::Gzip(BufWriter::new(GzEncoder::new(
                        file,
                        flate2::Compression::default(),
                    ))),
                }
            }
            Destination::Memory(buffer) => Writer::Memory(buffer),
        };

        Ok(Self {
            writer: Some(writer),
            path,
            bytes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Append `line` plus a newline
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_raw(line.as_bytes())?;
        self.write_raw(b"\n")
    }

    /// Append raw bytes (no newline added)
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let path = &self.path;
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| ProofError::contract(format!("'{}' is already closed", path.display())))?;
        writer
            .as_write()
            .write_all(bytes)
            .map_err(|e| ProofError::io(path, "writing", e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .as_write()
                .flush()
                .map_err(|e| ProofError::io(&self.path, "flushing", e))?;
        }
        Ok(())
    }

    /// Flush everything and finish compression; further writes are rejected
    pub fn close(&mut self) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let path = &self.path;
        match writer {
            Writer::Plain(mut w) => w.flush().map_err(|e| ProofError::io(path, "flushing", e)),
            Writer::Gzip(w) => {
                let encoder = w
                    .into_inner()
                    .map_err(|e| ProofError::io(path, "flushing", e.into_error()))?;
                encoder
                    .finish()
                    .map(|_| ())
                    .map_err(|e| ProofError::io(path, "finishing", e))
            }
            Writer::Memory(_) => Ok(()),
        }
    }
}

impl Drop for OutputSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to close output stream");
        }
    }
}

//! Request-scoped storage for uploaded image bytes.
//!
//! Small uploads stay in memory; larger ones spill into an anonymous temporary
//! file. Either way the storage is released when the `Upload` is dropped, on
//! success and on every error path.

use std::io::{self, BufReader, Seek, SeekFrom, Write};

use tempfile::SpooledTempFile;

pub const DEFAULT_SPOOL_THRESHOLD: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct SpoolConfig {
    /// Bytes kept in memory before spilling to disk.
    pub threshold: usize,
}

impl Default for SpoolConfig {
    fn default() -> Self {
        SpoolConfig {
            threshold: DEFAULT_SPOOL_THRESHOLD,
        }
    }
}

pub struct Upload {
    spool: SpooledTempFile,
    len: u64,
}

impl Upload {
    pub fn new(config: SpoolConfig) -> Self {
        Upload {
            spool: SpooledTempFile::new(config.threshold),
            len: 0,
        }
    }

    pub fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.spool.write_all(chunk)?;
        self.len += chunk.len() as u64;
        Ok(())
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the bytes have spilled to a temporary file.
    pub fn on_disk(&self) -> bool {
        self.spool.is_rolled()
    }

    /// Rewinds the storage for decoding.
    pub fn into_reader(mut self) -> io::Result<BufReader<SpooledTempFile>> {
        self.spool.flush()?;
        self.spool.seek(SeekFrom::Start(0))?;
        Ok(BufReader::new(self.spool))
    }
}

//! Byte sources a document can be read from.
//!
//! Every input kind (local file, in-memory upload) is adapted once into
//! [`ByteSource`], a named `Read + Seek` handle.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{RedactorError, RedactorResult};

/// Anything that can be read and rewound.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// A named source of document bytes.
pub trait ByteSource {
    /// Identifier used in logs and error reports.
    fn identifier(&self) -> String;

    /// Opens a fresh reader positioned at the start.
    fn open(&self) -> RedactorResult<Box<dyn ReadSeek + '_>>;

    /// Reads the whole source into memory.
    fn read_all(&self) -> RedactorResult<Vec<u8>> {
        let mut reader = self.open()?;
        let mut bytes = Vec::new();
        reader
            .seek(SeekFrom::Start(0))
            .and_then(|_| reader.read_to_end(&mut bytes))
            .map_err(|e| RedactorError::Io {
                path: PathBuf::from(self.identifier()),
                source: e,
            })?;
        Ok(bytes)
    }
}

/// A document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn identifier(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> RedactorResult<Box<dyn ReadSeek + '_>> {
        let file = File::open(&self.path).map_err(|e| RedactorError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Box::new(file))
    }
}

/// A document already held in memory, e.g. an upload.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl ByteSource for MemorySource {
    fn identifier(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> RedactorResult<Box<dyn ReadSeek + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }
}

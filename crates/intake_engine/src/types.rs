use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Identifies one submission; stale timer and ingest events carry an old id.
pub type AttemptId = u64;

/// What the caller knows about a file before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub media_type: Option<String>,
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, media_type: Option<&str>, size: u64) -> Self {
        Self {
            name: name.into(),
            media_type: media_type
                .map(str::trim)
                .filter(|mt| !mt.is_empty())
                .map(ToOwned::to_owned),
            size,
        }
    }
}

/// Where the bytes of a submitted file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Bytes already held in memory (picker or drop target).
    Memory(Arc<[u8]>),
    /// A file on local disk.
    Path(PathBuf),
}

/// A file descriptor paired with its byte source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub descriptor: FileDescriptor,
    pub source: FileSource,
}

impl RawFile {
    pub fn from_bytes(name: impl Into<String>, media_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let descriptor = FileDescriptor::new(name, media_type, bytes.len() as u64);
        Self {
            descriptor,
            source: FileSource::Memory(bytes.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(text) => serializer.serialize_str(text),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// How rows of a parsed sheet are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableShape {
    /// Each row is a sequence of cells aligned to the headers by index.
    #[default]
    Positional,
    /// Each row maps a header name to its cell.
    Keyed,
}

/// One row in keyed form. Field order follows the header order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyedRecord(pub Vec<(String, CellValue)>);

impl KeyedRecord {
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for KeyedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableRows {
    Positional(Vec<Vec<CellValue>>),
    Keyed(Vec<KeyedRecord>),
}

impl TableRows {
    pub fn len(&self) -> usize {
        match self {
            TableRows::Positional(rows) => rows.len(),
            TableRows::Keyed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> TableShape {
        match self {
            TableRows::Positional(_) => TableShape::Positional,
            TableRows::Keyed(_) => TableShape::Keyed,
        }
    }
}

/// The decoded contents of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: TableRows,
}

impl ParsedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn shape(&self) -> TableShape {
        self.rows.shape()
    }

    /// Row `index` laid out by header position, whatever the shape.
    ///
    /// Missing trailing cells come back as [`CellValue::Empty`].
    pub fn row_cells(&self, index: usize) -> Option<Vec<CellValue>> {
        match &self.rows {
            TableRows::Positional(rows) => rows.get(index).map(|row| {
                let mut cells = row.clone();
                cells.resize(self.headers.len().max(row.len()), CellValue::Empty);
                cells
            }),
            TableRows::Keyed(rows) => rows.get(index).map(|record| {
                self.headers
                    .iter()
                    .map(|h| record.get(h).cloned().unwrap_or_default())
                    .collect()
            }),
        }
    }
}

/// Structured failure from any stage of ingestion or artifact production.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported file format: {filename}")]
    InvalidFormat { filename: String },
    #[error("the file contains no data rows")]
    EmptyFile,
    #[error("the file could not be decoded: {reason}")]
    CorruptFile { reason: String },
    #[error("the file could not be read: {reason}")]
    ReadFailure { reason: String },
    #[error("the output could not be produced: {reason}")]
    SerializationFailure { reason: String },
}

impl IngestError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        IngestError::CorruptFile {
            reason: reason.into(),
        }
    }

    pub(crate) fn read(reason: impl Into<String>) -> Self {
        IngestError::ReadFailure {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            IngestError::InvalidFormat { .. } => FailureKind::InvalidFormat,
            IngestError::EmptyFile => FailureKind::EmptyFile,
            IngestError::CorruptFile { .. } => FailureKind::CorruptFile,
            IngestError::ReadFailure { .. } => FailureKind::ReadFailure,
            IngestError::SerializationFailure { .. } => FailureKind::SerializationFailure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidFormat,
    EmptyFile,
    CorruptFile,
    ReadFailure,
    SerializationFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidFormat => write!(f, "invalid format"),
            FailureKind::EmptyFile => write!(f, "empty file"),
            FailureKind::CorruptFile => write!(f, "corrupt file"),
            FailureKind::ReadFailure => write!(f, "read failure"),
            FailureKind::SerializationFailure => write!(f, "serialization failure"),
        }
    }
}

/// Events the engine reports back to the driver loop.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Ingested {
        attempt: AttemptId,
        result: Result<ParsedTable, IngestError>,
    },
    ProgressTick {
        attempt: AttemptId,
    },
    ProcessingElapsed {
        attempt: AttemptId,
    },
}

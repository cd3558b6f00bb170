//! Intake engine: validation, spreadsheet decoding, artifact output and the
//! background runtime that times each attempt.
mod decode;
mod engine;
mod export;
mod filename;
mod load;
mod parse;
mod persist;
mod preview;
mod settings;
mod sink;
mod timer;
mod types;
mod validate;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::{EngineConfig, EngineHandle};
pub use export::{build_artifact, Artifact, ARTIFACT_FILENAME};
pub use filename::{display_name, extension_of};
pub use load::{FileLoader, LoadSettings, LocalFileLoader};
pub use parse::{parse, sniff_format, SourceFormat};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use preview::{preview_cell, preview_rows, MAX_PREVIEW_CELL_CHARS, PREVIEW_ROW_LIMIT};
pub use settings::{
    IngestSettings, TimerSettings, MEDIA_TYPE_CSV, MEDIA_TYPE_XLS, MEDIA_TYPE_XLSX,
};
pub use sink::{ChannelEventSink, EventSink};
pub use timer::{run_processing_delay, run_progress_ticker};
pub use types::{
    AttemptId, CellValue, EngineEvent, FailureKind, FileDescriptor, FileSource, IngestError,
    KeyedRecord, ParsedTable, RawFile, TableRows, TableShape,
};
pub use validate::validate;

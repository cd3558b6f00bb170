use intake_engine::{AttemptId, IngestError, ParsedTable, RawFile};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked or dropped a file.
    FileSubmitted(RawFile),
    /// Drag pointer entered (`true`) or left (`false`) the drop zone.
    DragHoverChanged(bool),
    /// Engine finished loading and parsing the bytes of an attempt.
    IngestFinished {
        attempt: AttemptId,
        result: Result<ParsedTable, IngestError>,
    },
    /// Simulated upload progress.
    ProgressTick { attempt: AttemptId },
    /// User confirmed the preview.
    ConfirmClicked,
    /// Simulated processing finished.
    ProcessingElapsed { attempt: AttemptId },
    /// User asked to start over.
    ResetClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}

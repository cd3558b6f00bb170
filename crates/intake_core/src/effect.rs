use intake_engine::{Artifact, AttemptId, RawFile, TableShape};

use crate::Severity;

/// Work the shell performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load and parse the file; answer with `Msg::IngestFinished`.
    StartIngest {
        attempt: AttemptId,
        file: RawFile,
        shape: TableShape,
    },
    /// Answer with `Msg::ProgressTick` at a fixed pace.
    StartProgressTicker { attempt: AttemptId },
    StopProgressTicker,
    /// Answer once with `Msg::ProcessingElapsed`.
    StartProcessingDelay { attempt: AttemptId },
    /// Cancel the ingest, ticker and delay, whichever are outstanding.
    CancelPending,
    /// Hand the finished artifact to the user.
    OfferDownload { artifact: Artifact },
    /// Transient toast.
    Notify { severity: Severity, message: String },
}

use intake_engine::{
    display_name, preview_rows, Artifact, AttemptId, FileDescriptor, IngestError, ParsedTable,
    PREVIEW_ROW_LIMIT,
};

use crate::view_model::{format_size, AppViewModel, ArtifactView, FileView};
use crate::{Clock, LogEntry, Severity, WorkflowSettings};

/// Lifecycle of one intake attempt. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Preview,
    Processing,
    Completed,
    Error,
}

impl Phase {
    /// A file is in flight and new submissions are refused.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Uploading | Phase::Processing)
    }

    pub fn accepts_file(self) -> bool {
        matches!(self, Phase::Idle | Phase::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    phase: Phase,
    file: Option<FileDescriptor>,
    table: Option<ParsedTable>,
    progress: u8,
    drag_hover: bool,
    /// Most recent first.
    log: Vec<LogEntry>,
    artifact: Option<Artifact>,
    last_error: Option<IngestError>,
    attempt: Option<AttemptId>,
    last_attempt: AttemptId,
    settings: WorkflowSettings,
    clock: Clock,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: WorkflowSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_attempt(&self) -> Option<AttemptId> {
        self.attempt
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn table(&self) -> Option<&ParsedTable> {
        self.table.as_ref()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn last_error(&self) -> Option<&IngestError> {
        self.last_error.as_ref()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Confirm is only offered when a table with at least one row is loaded.
    pub fn can_confirm(&self) -> bool {
        self.phase == Phase::Preview && self.table.as_ref().is_some_and(|t| t.row_count() > 0)
    }

    pub fn view(&self) -> AppViewModel {
        let (headers, row_count, rows) = match &self.table {
            Some(table) => (
                table.headers.clone(),
                table.row_count(),
                preview_rows(table, PREVIEW_ROW_LIMIT),
            ),
            None => (Vec::new(), 0, Vec::new()),
        };

        AppViewModel {
            phase: self.phase,
            file: self.file.as_ref().map(|file| FileView {
                name: display_name(&file.name),
                size_label: format_size(file.size),
            }),
            progress: self.progress,
            drag_hover: self.drag_hover,
            headers,
            row_count,
            preview_rows: rows,
            can_select_file: self.phase.accepts_file(),
            can_confirm: self.can_confirm(),
            can_reset: self.phase != Phase::Idle || !self.log.is_empty(),
            artifact: self.artifact.as_ref().map(|artifact| ArtifactView {
                filename: artifact.filename.clone(),
                byte_len: artifact.byte_len(),
            }),
            error: self.last_error.as_ref().map(ToString::to_string),
            log: self.log.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_current(&self, attempt: AttemptId) -> bool {
        self.attempt == Some(attempt)
    }

    pub(crate) fn push_log(&mut self, severity: Severity, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: self.clock.timestamp(),
            message: message.into(),
            severity,
        };
        self.log.insert(0, entry);
        self.mark_dirty();
    }

    pub(crate) fn set_drag_hover(&mut self, hover: bool) {
        if self.drag_hover != hover {
            self.drag_hover = hover;
            self.mark_dirty();
        }
    }

    /// Start a fresh attempt for `file`, dropping results of any earlier one.
    pub(crate) fn begin_upload(&mut self, file: FileDescriptor) -> AttemptId {
        self.last_attempt += 1;
        let attempt = self.last_attempt;
        self.attempt = Some(attempt);
        self.phase = Phase::Uploading;
        self.file = Some(file);
        self.table = None;
        self.artifact = None;
        self.last_error = None;
        self.progress = 0;
        self.drag_hover = false;
        self.mark_dirty();
        attempt
    }

    /// Adds one step and returns the new progress, saturating at 100.
    pub(crate) fn advance_progress(&mut self) -> u8 {
        let step = self.settings.progress_step();
        self.progress = self.progress.saturating_add(step).min(100);
        self.mark_dirty();
        self.progress
    }

    pub(crate) fn attach_table(&mut self, table: ParsedTable) {
        self.table = Some(table);
    }

    pub(crate) fn enter_preview(&mut self) {
        self.phase = Phase::Preview;
        self.mark_dirty();
    }

    pub(crate) fn enter_processing(&mut self) {
        self.phase = Phase::Processing;
        self.mark_dirty();
    }

    pub(crate) fn complete(&mut self, artifact: Artifact) {
        self.phase = Phase::Completed;
        self.artifact = Some(artifact);
        self.mark_dirty();
    }

    /// Terminal failure for the current attempt.
    pub(crate) fn fail(&mut self, file: Option<FileDescriptor>, error: IngestError) {
        if file.is_some() {
            self.file = file;
            self.table = None;
            self.artifact = None;
            self.progress = 0;
        }
        self.phase = Phase::Error;
        self.attempt = None;
        self.drag_hover = false;
        self.last_error = Some(error);
        self.mark_dirty();
    }

    /// Back to `Idle` with everything cleared, including the log.
    ///
    /// The attempt counter survives so stale engine events stay stale.
    pub(crate) fn reset(&mut self) {
        let fresh = Self {
            last_attempt: self.last_attempt,
            settings: self.settings.clone(),
            clock: self.clock,
            ..Self::default()
        };
        *self = fresh;
        self.mark_dirty();
    }
}

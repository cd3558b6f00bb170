use engine_logging::{engine_debug, engine_info, engine_warn};
use intake_engine::{build_artifact, display_name, validate, IngestError, ParsedTable, RawFile};

use crate::view_model::format_size;
use crate::{AppState, Effect, Msg, Phase, Severity};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSubmitted(file) => submit_file(&mut state, file),
        Msg::DragHoverChanged(hover) => {
            // Hover is meaningless while the drop zone is hidden.
            if state.phase().accepts_file() || !hover {
                state.set_drag_hover(hover);
            }
            Vec::new()
        }
        Msg::IngestFinished { attempt, result } => {
            if !state.is_current(attempt) || state.phase() != Phase::Uploading {
                engine_debug!("Dropping stale ingest result for attempt {}", attempt);
                return (state, Vec::new());
            }
            match result {
                Ok(table) => ingest_succeeded(&mut state, table),
                Err(err) => fail_attempt(&mut state, err, vec![Effect::StopProgressTicker]),
            }
        }
        Msg::ProgressTick { attempt } => {
            if !state.is_current(attempt) || state.phase() != Phase::Uploading {
                return (state, Vec::new());
            }
            progress_tick(&mut state)
        }
        Msg::ConfirmClicked => confirm(&mut state),
        Msg::ProcessingElapsed { attempt } => {
            if !state.is_current(attempt) || state.phase() != Phase::Processing {
                engine_debug!("Dropping stale processing timer for attempt {}", attempt);
                return (state, Vec::new());
            }
            finish_processing(&mut state)
        }
        Msg::ResetClicked => {
            engine_info!("Workflow reset from {:?}", state.phase());
            state.reset();
            vec![Effect::CancelPending]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_file(state: &mut AppState, file: RawFile) -> Vec<Effect> {
    let name = display_name(&file.descriptor.name);

    if !state.phase().accepts_file() {
        engine_warn!(
            "Refusing {} while workflow is {:?}",
            name,
            state.phase()
        );
        let message = if state.phase().is_busy() {
            "Please wait for the current file to finish".to_string()
        } else {
            "Reset before selecting another file".to_string()
        };
        return vec![notify(Severity::Error, message)];
    }

    if let Err(err) = validate(&file.descriptor, &state.settings().ingest) {
        let message = format!(
            "Invalid file format: {name}. Please upload an Excel (.xlsx, .xls) or CSV file"
        );
        engine_warn!("{}", err);
        state.push_log(Severity::Error, message.clone());
        state.fail(Some(file.descriptor), err);
        return vec![notify(Severity::Error, message)];
    }

    let shape = state.settings().shape();
    let size = format_size(file.descriptor.size);
    let attempt = state.begin_upload(file.descriptor.clone());
    state.push_log(Severity::Info, format!("File selected: {name} ({size})"));
    engine_info!("Attempt {} started for {}", attempt, name);

    vec![
        Effect::StartIngest {
            attempt,
            file,
            shape,
        },
        Effect::StartProgressTicker { attempt },
    ]
}

fn ingest_succeeded(state: &mut AppState, table: ParsedTable) -> Vec<Effect> {
    engine_debug!(
        "Parsed {} rows x {} columns",
        table.row_count(),
        table.headers.len()
    );
    state.attach_table(table);
    if state.progress() >= 100 {
        // The ticker already finished and was waiting on the parse.
        upload_complete(state)
    } else {
        Vec::new()
    }
}

fn progress_tick(state: &mut AppState) -> Vec<Effect> {
    if state.advance_progress() < 100 {
        return Vec::new();
    }
    let mut effects = vec![Effect::StopProgressTicker];
    if state.table().is_some() {
        effects.extend(upload_complete(state));
    }
    effects
}

fn upload_complete(state: &mut AppState) -> Vec<Effect> {
    let rows = state.table().map(ParsedTable::row_count).unwrap_or(0);
    state.enter_preview();
    state.push_log(
        Severity::Info,
        format!("Upload complete: {rows} rows ready for preview"),
    );
    vec![notify(Severity::Info, "File uploaded successfully")]
}

fn confirm(state: &mut AppState) -> Vec<Effect> {
    if !state.can_confirm() {
        return Vec::new();
    }
    let Some(attempt) = state.current_attempt() else {
        return Vec::new();
    };
    state.enter_processing();
    state.push_log(Severity::Info, "Processing started");
    vec![Effect::StartProcessingDelay { attempt }]
}

fn finish_processing(state: &mut AppState) -> Vec<Effect> {
    let built = match state.table() {
        Some(table) => build_artifact(table),
        None => Err(IngestError::SerializationFailure {
            reason: "no table to serialize".to_string(),
        }),
    };

    match built {
        Ok(artifact) => {
            let rows = state.table().map(ParsedTable::row_count).unwrap_or(0);
            state.push_log(
                Severity::Info,
                format!(
                    "Generated {} with {} rows ({})",
                    artifact.filename,
                    rows,
                    format_size(artifact.byte_len() as u64)
                ),
            );
            state.complete(artifact.clone());
            vec![
                Effect::OfferDownload { artifact },
                notify(Severity::Info, "Processing complete"),
            ]
        }
        Err(err) => fail_attempt(state, err, Vec::new()),
    }
}

fn fail_attempt(state: &mut AppState, err: IngestError, mut effects: Vec<Effect>) -> Vec<Effect> {
    let message = match &err {
        IngestError::EmptyFile => "The file is empty or has no data rows".to_string(),
        IngestError::CorruptFile { .. } => {
            "Error parsing file. Please make sure it is a valid Excel or CSV file".to_string()
        }
        IngestError::ReadFailure { reason } => format!("Could not read file: {reason}"),
        IngestError::SerializationFailure { reason } => {
            format!("Could not generate output: {reason}")
        }
        IngestError::InvalidFormat { filename } => {
            format!("Invalid file format: {}", display_name(filename))
        }
    };
    engine_warn!("Attempt failed ({}): {}", err.kind(), err);
    state.push_log(Severity::Error, message.clone());
    state.fail(None, err);
    effects.push(notify(Severity::Error, message));
    effects
}

fn notify(severity: Severity, message: impl Into<String>) -> Effect {
    Effect::Notify {
        severity,
        message: message.into(),
    }
}

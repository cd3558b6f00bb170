use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_error, engine_info};
use tokio_util::sync::CancellationToken;

use crate::load::{FileLoader, LoadSettings, LocalFileLoader};
use crate::parse::parse;
use crate::timer::{run_processing_delay, run_progress_ticker};
use crate::{
    AttemptId, EngineEvent, EventSink, IngestSettings, RawFile, TableShape, TimerSettings,
};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub ingest: IngestSettings,
    pub timers: TimerSettings,
}

enum EngineCommand {
    Ingest { attempt: AttemptId, file: RawFile, shape: TableShape },
    StartProgress { attempt: AttemptId },
    StopProgress,
    StartProcessing { attempt: AttemptId },
    CancelAll,
}

/// Handle to the background runtime that loads, parses and times attempts.
///
/// Events are delivered through the sink given at construction.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let loader: Arc<dyn FileLoader> = Arc::new(LocalFileLoader::new(LoadSettings {
            max_bytes: config.ingest.max_bytes,
        }));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut timers = AttemptTimers::default();
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &config, &loader, &sink, &mut timers, command);
            }
            timers.cancel_all();
            engine_debug!("Engine command channel closed");
        });

        Self { cmd_tx }
    }

    pub fn ingest(&self, attempt: AttemptId, file: RawFile, shape: TableShape) {
        let _ = self.cmd_tx.send(EngineCommand::Ingest {
            attempt,
            file,
            shape,
        });
    }

    pub fn start_progress(&self, attempt: AttemptId) {
        let _ = self.cmd_tx.send(EngineCommand::StartProgress { attempt });
    }

    pub fn stop_progress(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopProgress);
    }

    pub fn start_processing(&self, attempt: AttemptId) {
        let _ = self.cmd_tx.send(EngineCommand::StartProcessing { attempt });
    }

    pub fn cancel_all(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelAll);
    }
}

/// At most one of each outstanding operation.
#[derive(Default)]
struct AttemptTimers {
    ingest: Option<CancellationToken>,
    progress: Option<CancellationToken>,
    processing: Option<CancellationToken>,
}

impl AttemptTimers {
    fn replace(slot: &mut Option<CancellationToken>) -> CancellationToken {
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        token
    }

    fn cancel(slot: &mut Option<CancellationToken>) {
        if let Some(token) = slot.take() {
            token.cancel();
        }
    }

    fn cancel_all(&mut self) {
        Self::cancel(&mut self.ingest);
        Self::cancel(&mut self.progress);
        Self::cancel(&mut self.processing);
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    config: &EngineConfig,
    loader: &Arc<dyn FileLoader>,
    sink: &Arc<dyn EventSink>,
    timers: &mut AttemptTimers,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Ingest {
            attempt,
            file,
            shape,
        } => {
            let token = AttemptTimers::replace(&mut timers.ingest);
            let loader = loader.clone();
            let sink = sink.clone();
            engine_info!(
                "Ingest attempt={} name={} size={}",
                attempt,
                file.descriptor.name,
                file.descriptor.size
            );
            runtime.spawn(async move {
                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => return,
                    loaded = loader.load(&file.source) => loaded,
                };
                let result = match result {
                    Ok(bytes) => tokio::task::spawn_blocking(move || parse(&bytes, shape))
                        .await
                        .unwrap_or_else(|err| {
                            Err(crate::IngestError::corrupt(format!("parse task failed: {err}")))
                        }),
                    Err(err) => Err(err),
                };
                if token.is_cancelled() {
                    return;
                }
                sink.emit(EngineEvent::Ingested { attempt, result });
            });
        }
        EngineCommand::StartProgress { attempt } => {
            let token = AttemptTimers::replace(&mut timers.progress);
            let sink = sink.clone();
            let period = config.timers.progress_interval;
            runtime.spawn(async move {
                run_progress_ticker(attempt, period, token, sink.as_ref()).await;
            });
        }
        EngineCommand::StopProgress => AttemptTimers::cancel(&mut timers.progress),
        EngineCommand::StartProcessing { attempt } => {
            let token = AttemptTimers::replace(&mut timers.processing);
            let sink = sink.clone();
            let delay = config.timers.processing_delay;
            runtime.spawn(async move {
                run_processing_delay(attempt, delay, token, sink.as_ref()).await;
            });
        }
        EngineCommand::CancelAll => timers.cancel_all(),
    }
}

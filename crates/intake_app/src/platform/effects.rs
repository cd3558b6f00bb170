use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use engine_logging::{engine_error, engine_info};
use intake_core::{Effect, Msg, Severity};
use intake_engine::{AtomicFileWriter, EngineConfig, EngineEvent, EngineHandle, EventSink};

use super::ui::render;

/// Feeds engine events back into the message loop.
struct MsgSink {
    tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::Ingested { attempt, result } => Msg::IngestFinished { attempt, result },
            EngineEvent::ProgressTick { attempt } => Msg::ProgressTick { attempt },
            EngineEvent::ProcessingElapsed { attempt } => Msg::ProcessingElapsed { attempt },
        };
        let _ = self.tx.send(msg);
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    downloads: AtomicFileWriter,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>, config: EngineConfig, output_dir: PathBuf) -> Self {
        let engine = EngineHandle::new(config, Arc::new(MsgSink { tx: msg_tx }));
        Self {
            engine,
            downloads: AtomicFileWriter::new(output_dir),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartIngest {
                    attempt,
                    file,
                    shape,
                } => self.engine.ingest(attempt, file, shape),
                Effect::StartProgressTicker { attempt } => self.engine.start_progress(attempt),
                Effect::StopProgressTicker => self.engine.stop_progress(),
                Effect::StartProcessingDelay { attempt } => self.engine.start_processing(attempt),
                Effect::CancelPending => self.engine.cancel_all(),
                Effect::OfferDownload { artifact } => {
                    match self.downloads.write_artifact(&artifact) {
                        Ok(path) => {
                            engine_info!("Saved {} bytes to {:?}", artifact.byte_len(), path);
                            render::toast(Severity::Info, &format!("Saved {}", path.display()));
                        }
                        Err(err) => {
                            engine_error!("Failed to save {}: {}", artifact.filename, err);
                            render::toast(
                                Severity::Error,
                                &format!("Could not save {}: {err}", artifact.filename),
                            );
                        }
                    }
                }
                Effect::Notify { severity, message } => render::toast(severity, &message),
            }
        }
    }
}

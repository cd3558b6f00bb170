use intake_engine::{IngestSettings, TableShape};

pub const DEFAULT_PROGRESS_STEP: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Percentage added per progress tick, clamped to `1..=100`.
    pub progress_step: u8,
    pub ingest: IngestSettings,
}

impl WorkflowSettings {
    pub fn progress_step(&self) -> u8 {
        self.progress_step.clamp(1, 100)
    }

    pub fn shape(&self) -> TableShape {
        self.ingest.shape
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            progress_step: DEFAULT_PROGRESS_STEP,
            ingest: IngestSettings::default(),
        }
    }
}

//! Intake core: pure workflow state machine and view-model helpers.
mod activity;
mod effect;
mod msg;
mod settings;
mod state;
mod update;
mod view_model;

pub use activity::{Clock, LogEntry, Severity};
pub use effect::Effect;
pub use intake_engine::AttemptId;
pub use msg::Msg;
pub use settings::{WorkflowSettings, DEFAULT_PROGRESS_STEP};
pub use state::{AppState, Phase};
pub use update::update;
pub use view_model::{format_size, AppViewModel, ArtifactView, FileView};

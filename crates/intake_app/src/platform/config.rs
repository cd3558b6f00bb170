use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, LogDestination};
use intake_core::WorkflowSettings;
use intake_engine::{EngineConfig, IngestSettings, TableShape, TimerSettings};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const CONFIG_FILENAME: &str = "intake.ron";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
enum ShapeSetting {
    #[default]
    Positional,
    Keyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
enum LogSetting {
    File,
    #[default]
    Terminal,
    Both,
}

/// On-disk form of the shell configuration. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PersistedConfig {
    shape: ShapeSetting,
    progress_step: u8,
    progress_interval_ms: u64,
    processing_delay_ms: u64,
    max_bytes: Option<u64>,
    output_dir: PathBuf,
    log_destination: LogSetting,
    log_level: String,
    auto_confirm: bool,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        let timers = TimerSettings::default();
        Self {
            shape: ShapeSetting::default(),
            progress_step: intake_core::DEFAULT_PROGRESS_STEP,
            progress_interval_ms: timers.progress_interval.as_millis() as u64,
            processing_delay_ms: timers.processing_delay.as_millis() as u64,
            max_bytes: None,
            output_dir: PathBuf::from("output"),
            log_destination: LogSetting::default(),
            log_level: "info".to_string(),
            auto_confirm: true,
        }
    }
}

/// Resolved settings for one run of the shell.
#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub workflow: WorkflowSettings,
    pub engine: EngineConfig,
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    /// Confirm the preview without waiting for a user.
    pub auto_confirm: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        PersistedConfig::default().into()
    }
}

impl From<PersistedConfig> for AppConfig {
    fn from(persisted: PersistedConfig) -> Self {
        let ingest = IngestSettings {
            shape: match persisted.shape {
                ShapeSetting::Positional => TableShape::Positional,
                ShapeSetting::Keyed => TableShape::Keyed,
            },
            max_bytes: persisted.max_bytes,
            ..IngestSettings::default()
        };
        let timers = TimerSettings {
            progress_interval: Duration::from_millis(persisted.progress_interval_ms.max(1)),
            processing_delay: Duration::from_millis(persisted.processing_delay_ms),
        };
        Self {
            workflow: WorkflowSettings {
                progress_step: persisted.progress_step,
                ingest: ingest.clone(),
            },
            engine: EngineConfig { ingest, timers },
            output_dir: persisted.output_dir,
            log_destination: match persisted.log_destination {
                LogSetting::File => LogDestination::File,
                LogSetting::Terminal => LogDestination::Terminal,
                LogSetting::Both => LogDestination::Both,
            },
            log_level: persisted.log_level.parse().unwrap_or(LevelFilter::Info),
            auto_confirm: persisted.auto_confirm,
        }
    }
}

/// Load the configuration at `path`, or `./intake.ron` when none is given.
///
/// A missing default file yields defaults; an explicitly named file must exist.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(AppConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let persisted: PersistedConfig =
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;

    engine_info!("Loaded configuration from {:?}", path);
    Ok(persisted.into())
}

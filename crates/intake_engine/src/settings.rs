use std::time::Duration;

use crate::TableShape;

pub const MEDIA_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MEDIA_TYPE_XLS: &str = "application/vnd.ms-excel";
pub const MEDIA_TYPE_CSV: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSettings {
    pub shape: TableShape,
    pub allowed_media_types: Vec<String>,
    /// Lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
    /// Files larger than this fail to load with a read failure.
    pub max_bytes: Option<u64>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            shape: TableShape::default(),
            allowed_media_types: vec![
                MEDIA_TYPE_XLSX.to_string(),
                MEDIA_TYPE_XLS.to_string(),
                MEDIA_TYPE_CSV.to_string(),
            ],
            allowed_extensions: vec!["xlsx".to_string(), "xls".to_string(), "csv".to_string()],
            max_bytes: None,
        }
    }
}

/// Pacing of the simulated upload and processing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    pub progress_interval: Duration,
    pub processing_delay: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_millis(200),
            processing_delay: Duration::from_millis(2000),
        }
    }
}

use crate::{LogEntry, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileView {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactView {
    pub filename: String,
    pub byte_len: usize,
}

/// Everything a renderer needs; derived from `AppState` on demand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub file: Option<FileView>,
    pub progress: u8,
    pub drag_hover: bool,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub preview_rows: Vec<Vec<String>>,
    pub can_select_file: bool,
    pub can_confirm: bool,
    pub can_reset: bool,
    pub artifact: Option<ArtifactView>,
    pub error: Option<String>,
    pub log: Vec<LogEntry>,
    pub dirty: bool,
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < MB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / MB)
    }
}

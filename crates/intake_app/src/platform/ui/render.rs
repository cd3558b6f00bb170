use intake_core::{AppViewModel, LogEntry, Phase, Severity};

const BAR_WIDTH: usize = 20;

/// Text lines describing the current view, top to bottom.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let phase_label = match view.phase {
        Phase::Idle => "Idle",
        Phase::Uploading => "Uploading",
        Phase::Preview => "Preview",
        Phase::Processing => "Processing",
        Phase::Completed => "Completed",
        Phase::Error => "Error",
    };
    match &view.file {
        Some(file) => lines.push(format!(
            "[{phase_label}] {} ({})",
            file.name, file.size_label
        )),
        None => lines.push(format!("[{phase_label}] drop a .xlsx, .xls or .csv file")),
    }

    if view.phase == Phase::Uploading {
        lines.push(progress_bar(view.progress));
    }

    if matches!(view.phase, Phase::Preview | Phase::Processing | Phase::Completed) {
        lines.push(format!("{} rows | {}", view.row_count, view.headers.join(" | ")));
        for row in &view.preview_rows {
            lines.push(format!("  {}", row.join(" | ")));
        }
        if view.row_count > view.preview_rows.len() {
            lines.push(format!(
                "  ... {} more rows",
                view.row_count - view.preview_rows.len()
            ));
        }
    }

    if let Some(artifact) = &view.artifact {
        lines.push(format!(
            "Ready: {} ({} bytes)",
            artifact.filename, artifact.byte_len
        ));
    }
    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}"));
    }
    if let Some(latest) = view.log.first() {
        lines.push(log_line(latest));
    }
    lines
}

pub fn log_line(entry: &LogEntry) -> String {
    let tag = match entry.severity {
        Severity::Info => "info",
        Severity::Error => "error",
    };
    format!("{} {:<5} {}", entry.timestamp, tag, entry.message)
}

pub fn toast(severity: Severity, message: &str) {
    match severity {
        Severity::Info => eprintln!("* {message}"),
        Severity::Error => eprintln!("! {message}"),
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {progress}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

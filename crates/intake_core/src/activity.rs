use std::fmt;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

/// One line of the on-screen activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub message: String,
    pub severity: Severity,
}

/// Source of wall-clock time for log entries.
///
/// Two clocks always compare equal so that state comparisons only look at
/// workflow data.
#[derive(Clone, Copy)]
pub struct Clock(fn() -> DateTime<Local>);

impl Clock {
    pub const fn new(now: fn() -> DateTime<Local>) -> Self {
        Self(now)
    }

    pub fn timestamp(&self) -> String {
        (self.0)().format("%H:%M:%S").to_string()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self(Local::now)
    }
}

impl PartialEq for Clock {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock")
    }
}

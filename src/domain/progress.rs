//! Feedback channel for long-running optimizations.
//!
//! Model building and MIP solves can run for minutes (the recommended
//! options cap a solve at 300 seconds), so every operation reports
//! through a [`ProgressSink`]: informational lines, warnings, raw solver
//! console output, and coarse progress percentages. Cancellation is
//! cooperative; callers consult [`ProgressSink::is_canceled`] between
//! phases only, an in-flight solve is never interrupted.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

/// Severity of a sink message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkLevel {
    Info,
    Warning,
    Console,
    Error,
}

/// Receiver of operation feedback
pub trait ProgressSink: Send + Sync {
    fn push_info(&self, message: &str);

    fn push_warning(&self, message: &str);

    /// Raw solver output, forwarded line-buffered as it is produced
    fn push_console(&self, line: &str);

    fn report_error(&self, message: &str);

    fn set_progress(&self, percent: u8);

    fn is_canceled(&self) -> bool {
        false
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn push_info(&self, _message: &str) {}
    fn push_warning(&self, _message: &str) {}
    fn push_console(&self, _line: &str) {}
    fn report_error(&self, _message: &str) {}
    fn set_progress(&self, _percent: u8) {}
}

/// Collects messages in memory, used by tests
#[derive(Debug, Default)]
pub struct BufferSink {
    messages: Mutex<Vec<(SinkLevel, String)>>,
    progress: AtomicU8,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(SinkLevel, String)> {
        self.messages.lock().expect("sink poisoned").clone()
    }

    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn contains(&self, level: SinkLevel, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn push(&self, level: SinkLevel, message: &str) {
        self.messages
            .lock()
            .expect("sink poisoned")
            .push((level, message.to_string()));
    }
}

impl ProgressSink for BufferSink {
    fn push_info(&self, message: &str) {
        self.push(SinkLevel::Info, message);
    }

    fn push_warning(&self, message: &str) {
        self.push(SinkLevel::Warning, message);
    }

    fn push_console(&self, line: &str) {
        self.push(SinkLevel::Console, line);
    }

    fn report_error(&self, message: &str) {
        self.push(SinkLevel::Error, message);
    }

    fn set_progress(&self, percent: u8) {
        self.progress.store(percent, Ordering::Relaxed);
    }
}

/// Bridges sink traffic into the process-wide `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn push_info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn push_warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn push_console(&self, line: &str) {
        tracing::debug!(target: "fireopt::solver", "{line}");
    }

    fn report_error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn set_progress(&self, percent: u8) {
        tracing::debug!(percent, "progress");
    }
}

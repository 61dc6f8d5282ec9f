//! The user-visible status channel.

use std::sync::Mutex;
use tracing::info;

/// An append-only, write-only status channel shown to the user.
///
/// This is the page's visible log, not diagnostics: anything appended here
/// is meant for the person redeeming the code. There is deliberately no way
/// to read back, rewrite or drop earlier lines through this trait.
pub trait StatusSink: Send + Sync {
    /// Appends one status line.
    fn append(&self, line: &str);
}

/// Prints status lines to stdout and mirrors them into tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn append(&self, line: &str) {
        println!("{line}");
        info!("{line}");
    }
}

/// Collects status lines in memory, in order. The test double.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything appended so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("status lock poisoned").clone()
    }

    /// True if any appended line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl StatusSink for MemorySink {
    fn append(&self, line: &str) {
        self.lines
            .lock()
            .expect("status lock poisoned")
            .push(line.to_string());
    }
}

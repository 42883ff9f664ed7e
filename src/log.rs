// ABOUTME: Event log collaborator - one atomic textual line per simulation event.
// ABOUTME: Provides a timestamped stdout writer and an in-memory capture for tests.

use std::sync::Mutex;

/// Sink for simulation events.
///
/// Each call emits exactly one line. Ordering across callers is not globally
/// serialized, but a line is never interleaved with another.
pub trait EventLog: Send + Sync {
    /// Emit one line for an event attributed to `source`.
    fn line(&self, source: &str, message: &str);
}

/// Writes timestamped lines to stdout.
pub struct StdoutLog;

impl EventLog for StdoutLog {
    fn line(&self, source: &str, message: &str) {
        // println! locks stdout for the whole call, keeping the line atomic.
        println!(
            "[{}] {} : {}",
            chrono::Local::now().format("%H:%M:%S"),
            source,
            message
        );
    }
}

/// Captures lines in memory, in arrival order.
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// How many captured lines contain `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl EventLog for MemoryLog {
    fn line(&self, source: &str, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{} : {}", source, message));
    }
}

//! Console transcript collected from the page under test

use std::sync::{Arc, Mutex};

/// Console message emitted by the page
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    /// Level such as "log", "warn", or "error"
    pub level: String,
    /// Textual content of the message
    pub text: String,
}

impl ConsoleMessage {
    /// Whether this message has error severity
    pub fn is_error(&self) -> bool {
        self.level == "error"
    }

    /// Transcript form, e.g. `[error] something broke`
    pub fn line(&self) -> String {
        format!("[{}] {}", self.level, self.text)
    }
}

/// Append-only buffer of console messages for the lifetime of the page
///
/// The page-side binding pushes from the CDP handler thread while the
/// checker reads after navigation settles, so the buffer is shared behind
/// a mutex. It is never cleared within a run.
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    entries: Arc<Mutex<Vec<ConsoleMessage>>>,
}

impl ConsoleLog {
    pub fn push(&self, message: ConsoleMessage) {
        self.entries.lock().unwrap().push(message);
    }

    /// Every buffered message, in arrival order
    pub fn snapshot(&self) -> Vec<ConsoleMessage> {
        self.entries.lock().unwrap().clone()
    }

    /// Transcript lines for every error-severity message, in arrival order
    pub fn error_lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_error())
            .map(|m| m.line())
            .collect()
    }
}

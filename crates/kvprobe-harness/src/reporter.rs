//! Two-channel line reporter
//!
//! Every stage reports operator-facing lines through an info channel and a
//! diagnostic-error channel. The console sink flushes each line immediately
//! to stdout/stderr; the memory sink accumulates lines for assertions.

use parking_lot::Mutex;

/// Line-oriented reporter with an info and an error channel
pub struct Reporter {
    sink: Sink,
}

enum Sink {
    Console,
    Memory {
        info: Mutex<Vec<String>>,
        error: Mutex<Vec<String>>,
    },
}

impl Reporter {
    /// Reporter that writes info lines to stdout and error lines to stderr
    pub fn console() -> Self {
        Self {
            sink: Sink::Console,
        }
    }

    /// Reporter that accumulates lines in memory
    pub fn memory() -> Self {
        Self {
            sink: Sink::Memory {
                info: Mutex::new(Vec::new()),
                error: Mutex::new(Vec::new()),
            },
        }
    }

    /// Emit a line on the info channel
    pub fn info(&self, line: impl AsRef<str>) {
        match &self.sink {
            Sink::Console => println!("{}", line.as_ref()),
            Sink::Memory { info, .. } => info.lock().push(line.as_ref().to_string()),
        }
    }

    /// Emit a line on the diagnostic-error channel
    pub fn error(&self, line: impl AsRef<str>) {
        match &self.sink {
            Sink::Console => eprintln!("{}", line.as_ref()),
            Sink::Memory { error, .. } => error.lock().push(line.as_ref().to_string()),
        }
    }

    /// Accumulated info lines; empty for the console sink
    pub fn info_lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Console => Vec::new(),
            Sink::Memory { info, .. } => info.lock().clone(),
        }
    }

    /// Accumulated error lines; empty for the console sink
    pub fn error_lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Console => Vec::new(),
            Sink::Memory { error, .. } => error.lock().clone(),
        }
    }
}

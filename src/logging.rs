use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log lines kept for the in-app log popup.
const MAX_LOG_LINES: usize = 500;

/// One captured log line with its arrival time.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: String,
    pub message: String,
}

impl LogLine {
    fn new(message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            message,
        }
    }

    pub fn format_for_display(&self) -> String {
        format!("[{}] {}", self.timestamp, self.message)
    }
}

/// Shared ring buffer the tracing subscriber writes into. Stdout belongs to
/// the alternate screen while the TUI runs, so logs are kept in memory and
/// shown in a popup instead.
#[derive(Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: String) {
        let mut lines = self.lines.lock().unwrap();
        if lines.len() >= MAX_LOG_LINES {
            lines.pop_front();
        }
        lines.push_back(LogLine::new(message));
    }

    /// Most recent `count` lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<LogLine> {
        let lines = self.lines.lock().unwrap();
        lines.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().unwrap().is_empty()
    }
}

/// `MakeWriter` adapter feeding the ring buffer.
#[derive(Clone)]
pub struct LogBufferWriter {
    buffer: LogBuffer,
}

impl std::io::Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(message) = std::str::from_utf8(buf) {
            let message = message.trim_end();
            if !message.is_empty() {
                self.buffer.push(message.to_string());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the tracing subscriber and return the buffer handle for the UI.
pub fn init_tracing() -> LogBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LogBuffer::new();
    let writer = LogBufferWriter {
        buffer: buffer.clone(),
    };

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(target: "system", "logging initialized");
    buffer
}

#![forbid(unsafe_code)]

//! Line-buffered log capture for `tracing-subscriber`.
//!
//! [`LogBuffer`] is a [`MakeWriter`]: every formatted event is split into
//! lines, kept in a bounded queue for the host to drain, and optionally
//! echoed to a sink (the browser console on wasm).

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

/// Lines kept before the oldest are dropped.
pub const MAX_LOG_LINES: usize = 512;

/// Shared, bounded log line queue.
#[derive(Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    echo: Option<fn(&str)>,
}

impl LogBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::new())),
            echo: None,
        }
    }

    /// Also hand every line to `echo` as it is written.
    #[must_use]
    pub fn with_echo(echo: fn(&str)) -> Self {
        Self {
            echo: Some(echo),
            ..Self::new()
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        let line = line.into();
        if let Some(echo) = self.echo {
            echo(&line);
        }
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() >= MAX_LOG_LINES {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Take every buffered line, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogBuffer")
            .field("lines", &self.len())
            .field("echo", &self.echo.is_some())
            .finish()
    }
}

/// Writer for one formatted event. Complete lines are pushed on drop.
pub struct LineWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl io::Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let pending = std::mem::take(&mut self.pending);
        for line in String::from_utf8_lossy(&pending).lines() {
            let line = line.trim_end();
            if !line.is_empty() {
                self.buffer.push(line);
            }
        }
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

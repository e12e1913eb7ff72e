//! Tracing setup that collects formatted log lines in memory.
//!
//! Mobile hosts rarely surface native stderr, so the subscriber writes into a
//! bounded [`LogStore`] that the `logs` command drains.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Once};

use parking_lot::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::common::config::AppCfg;

/// Bounded FIFO of formatted log lines.
#[derive(Debug)]
pub struct LogStore {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity.min(256))),
            capacity,
        }
    }

    /// Append a line, evicting the oldest one when the store is full.
    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Take every stored line, leaving the store empty.
    pub fn drain(&self) -> Vec<String> {
        self.lines.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `MakeWriter` handing out writers that flush into a shared [`LogStore`].
#[derive(Clone, Debug)]
pub struct StoreMakeWriter {
    store: Arc<LogStore>,
}

impl StoreMakeWriter {
    pub fn new(store: Arc<LogStore>) -> Self {
        Self { store }
    }
}

impl<'a> MakeWriter<'a> for StoreMakeWriter {
    type Writer = StoreWriter;

    fn make_writer(&'a self) -> Self::Writer {
        StoreWriter {
            store: Arc::clone(&self.store),
            buffer: Vec::new(),
        }
    }
}

/// Buffers one formatted event and pushes it as a single line on flush or drop.
pub struct StoreWriter {
    store: Arc<LogStore>,
    buffer: Vec<u8>,
}

impl Write for StoreWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buffer).trim().to_string();
        self.buffer.clear();
        if !line.is_empty() {
            self.store.push(line);
        }
        Ok(())
    }
}

impl Drop for StoreWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Install the global subscriber once. Later calls are ignored, as is an
/// already installed subscriber owned by the embedding process.
pub fn init(cfg: &AppCfg, store: Arc<LogStore>) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(&cfg.log_level);

        let installed = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(StoreMakeWriter::new(store)),
            )
            .with(filter)
            .try_init();

        if installed.is_ok() {
            tracing::debug!(level = %cfg.log_level, capacity = cfg.log_capacity, "logging ready");
        }
    });
}

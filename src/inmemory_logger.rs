// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Logger
//!
//! An in-memory logging implementation for tests and debugging. The `InMemoryLogger`
//! keeps finished records in memory instead of writing them anywhere, so a test can assert
//! on both the rendered text and the extra info each record carried.

use crate::log_record::LogRecord;
use crate::logger::Logger;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// An in-memory logger that stores finished records.
///
/// Thread-safe; share it with `Arc` and install it with
/// [`set_global_loggers`](crate::global_logger::set_global_loggers) or
/// [`add_global_logger`](crate::global_logger::add_global_logger).
///
/// # Example
///
/// ```rust
/// use goodlog::InMemoryLogger;
/// use goodlog::global_logger::set_global_loggers;
/// use std::sync::Arc;
///
/// let logger = Arc::new(InMemoryLogger::new());
/// set_global_loggers(vec![logger.clone()]);
///
/// goodlog::ephemeral_info!(request_id = "r-9").scope(|| {
///     goodlog::warn_sync!("slow upstream: {}ms", 1200);
/// });
///
/// let records = logger.drain_records();
/// assert_eq!(records.len(), 1);
/// assert!(records[0].message().contains("slow upstream: 1200ms"));
/// assert_eq!(records[0].field("request_id").unwrap(), "r-9");
/// ```
///
/// # Restoring the previous loggers
///
/// ```rust
/// use goodlog::InMemoryLogger;
/// use goodlog::global_logger::{global_loggers, set_global_loggers};
/// use std::sync::Arc;
///
/// let original_loggers = global_loggers();
/// let test_logger = Arc::new(InMemoryLogger::new());
/// set_global_loggers(vec![test_logger.clone()]);
///
/// goodlog::error_sync!("Test-specific log message");
/// assert!(test_logger.drain_logs().contains("Test-specific log message"));
///
/// set_global_loggers(original_loggers);
/// ```
#[derive(Debug)]
pub struct InMemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

// Not Clone: two handles to one buffer is what `Arc<InMemoryLogger>` is for.

impl Default for InMemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    // a test that panicked mid-log must not disable logging for the others
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes and returns every stored record.
    pub fn drain_records(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// Drains all records into one string, one rendered record per line.
    pub fn drain_logs(&self) -> String {
        self.drain_records()
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes all stored records to the console and clears the buffer.
    pub fn drain_to_console(&self) {
        for record in self.drain_records() {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&record.to_string().into());
            #[cfg(not(target_arch = "wasm32"))]
            eprintln!("{}", record);
        }
    }
}

impl Logger for InMemoryLogger {
    fn finish_log_record(&self, record: LogRecord) {
        self.lock().push(record);
    }
}

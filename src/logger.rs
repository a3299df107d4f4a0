// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sink interface.

use crate::log_record::LogRecord;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

/// A sink for finished log records.
///
/// Each record arrives with the effective extra info already attached as
/// [`LogRecord::fields`], captured on the emitting path when the record was created. A sink
/// runs on whatever thread or task emitted the record, so it must not rely on
/// [`get_info`](crate::get_info) itself; the fields are the source of truth.
///
/// Only [`finish_log_record`](Logger::finish_log_record) is required.
///
/// ```rust
/// use goodlog::{LogRecord, Logger};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// /// Counts records that belong to some request.
/// #[derive(Debug, Default)]
/// struct RequestCounter(AtomicUsize);
///
/// impl Logger for RequestCounter {
///     fn finish_log_record(&self, record: LogRecord) {
///         if record.field("request_id").is_some() {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
///
/// let counter = RequestCounter::default();
/// let mut record = LogRecord::new(goodlog::Level::Warning);
/// record.set_fields([("request_id".to_string(), goodlog::InfoValue::from("r-1"))].into());
/// counter.finish_log_record(record);
/// counter.finish_log_record(LogRecord::new(goodlog::Level::Warning));
/// assert_eq!(counter.0.load(Ordering::Relaxed), 1);
/// ```
pub trait Logger: Debug + Send + Sync {
    /// Takes ownership of one finished record.
    fn finish_log_record(&self, record: LogRecord);

    /// Async delivery, used by the `*_async!` macros.
    ///
    /// Defaults to [`finish_log_record`](Logger::finish_log_record). Override it when the
    /// sink can do its I/O without blocking the caller's executor.
    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 's>> {
        Box::pin(async move { self.finish_log_record(record) })
    }

    /// The process may exit soon; flush anything buffered. Unbuffered sinks do nothing.
    fn prepare_to_die(&self) {}
}

/*
Boilerplate notes for Logger:

- Send + Sync: records are submitted from every thread and task.
- Debug: the global logger list is printable.
- No Clone/PartialEq/Default: a logger owns its sink, and two sinks are never "the same".
*/

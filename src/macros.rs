// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging macros and the functions they expand to.
//!
//! Every macro follows the same three steps:
//! 1. [`record_pre`] creates a [`LogRecord`] with level, location, timestamp and the
//!    effective extra info from [`get_info`](crate::get_info);
//! 2. the formatted message is appended;
//! 3. [`record_sync_post`] or [`record_async_post`] hands the record to every global logger.
//!
//! # Levels
//!
//! | Macro                          | Level     | Builds      |
//! |--------------------------------|-----------|-------------|
//! | `debug_sync!` / `debug_async!` | `Debug`   | debug only  |
//! | `info_sync!` / `info_async!`   | `Info`    | debug only  |
//! | `warn_sync!` / `warn_async!`   | `Warning` | all         |
//! | `error_sync!` / `error_async!` | `Error`   | all         |
//!
//! Arguments are the same as [`format!`]. The arguments are only evaluated when the level
//! is enabled.
//!
//! ```rust
//! # let user = "alice";
//! goodlog::register_persistent!("svc", service = "auth");
//! goodlog::ephemeral_info!(request_id = "r-1").scope(|| {
//!     // emits e.g. `WARN: src/main.rs:5:5 [1.2ms] login failed for alice request_id=r-1 service=auth`
//!     goodlog::warn_sync!("login failed for {}", user);
//! });
//! # goodlog::reset();
//! ```

use crate::Level;
use crate::log_record::LogRecord;

/// Returns whether logging is enabled for a given [`Level`](crate::Level).
///
/// `Debug` and `Info` are compiled out of release builds; `Warning` and `Error` always log.
#[macro_export]
macro_rules! log_enabled {
    ($level:expr) => {{
        #[allow(unreachable_patterns)]
        match $level {
            $crate::Level::Debug | $crate::Level::Info => cfg!(debug_assertions),
            _ => true,
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_sync {
    ($level:expr, $($arg:tt)+) => {{
        if $crate::log_enabled!($level) {
            let mut record = $crate::hidden::record_pre($level, file!(), line!(), column!());
            record.log_owned(format!($($arg)+));
            $crate::hidden::record_sync_post(record);
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_async {
    ($level:expr, $($arg:tt)+) => {{
        if $crate::log_enabled!($level) {
            let mut record = $crate::hidden::record_pre($level, file!(), line!(), column!());
            record.log_owned(format!($($arg)+));
            $crate::hidden::record_async_post(record).await;
        }
    }};
}

/// Logs at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug_sync {
    ($($arg:tt)+) => { $crate::__log_sync!($crate::Level::Debug, $($arg)+) };
}

/// Logs at [`Level::Debug`](crate::Level::Debug), delivering through the loggers' async path.
#[macro_export]
macro_rules! debug_async {
    ($($arg:tt)+) => { $crate::__log_async!($crate::Level::Debug, $($arg)+) };
}

/// Logs at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! info_sync {
    ($($arg:tt)+) => { $crate::__log_sync!($crate::Level::Info, $($arg)+) };
}

/// Logs at [`Level::Info`](crate::Level::Info), delivering through the loggers' async path.
#[macro_export]
macro_rules! info_async {
    ($($arg:tt)+) => { $crate::__log_async!($crate::Level::Info, $($arg)+) };
}

/// Logs at [`Level::Warning`](crate::Level::Warning).
#[macro_export]
macro_rules! warn_sync {
    ($($arg:tt)+) => { $crate::__log_sync!($crate::Level::Warning, $($arg)+) };
}

/// Logs at [`Level::Warning`](crate::Level::Warning), delivering through the loggers' async path.
#[macro_export]
macro_rules! warn_async {
    ($($arg:tt)+) => { $crate::__log_async!($crate::Level::Warning, $($arg)+) };
}

/// Logs at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! error_sync {
    ($($arg:tt)+) => { $crate::__log_sync!($crate::Level::Error, $($arg)+) };
}

/// Logs at [`Level::Error`](crate::Level::Error), delivering through the loggers' async path.
#[macro_export]
macro_rules! error_async {
    ($($arg:tt)+) => { $crate::__log_async!($crate::Level::Error, $($arg)+) };
}

/// Creates a log record with the standard prelude and the current extra info.
///
/// The prelude is `LEVEL: file:line:column [elapsed] `.
pub fn record_pre(level: Level, file: &'static str, line: u32, column: u32) -> LogRecord {
    let mut record = LogRecord::new(level);
    record.set_fields(crate::info::get_info());

    record.log(level.label());
    record.log(": ");

    //file, line
    record.log(file);
    record.log_owned(format!(":{}:{} ", line, column));

    record.log_timestamp();
    record
}

/// Hands a finished record to every global logger.
pub fn record_sync_post(record: LogRecord) {
    for logger in crate::global_logger::global_loggers() {
        logger.finish_log_record(record.clone());
    }
}

/// Hands a finished record to every global logger through the async path.
pub async fn record_async_post(record: LogRecord) {
    for logger in crate::global_logger::global_loggers() {
        logger.finish_log_record_async(record.clone()).await;
    }
}

#[cfg(test)]
mod tests {
    use crate::Level;

    #[test]
    fn enablement_follows_build() {
        assert_eq!(crate::log_enabled!(Level::Debug), cfg!(debug_assertions));
        assert_eq!(crate::log_enabled!(Level::Info), cfg!(debug_assertions));
        assert!(crate::log_enabled!(Level::Warning));
        assert!(crate::log_enabled!(Level::Error));
    }

    #[test]
    fn prelude_has_level_and_location() {
        let record = super::record_pre(Level::Warning, "src/x.rs", 3, 9);
        let text = record.to_string();
        assert!(text.starts_with("WARN: src/x.rs:3:9 ["), "{text}");
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::log_record::LogRecord;
use crate::logger::Logger;

/// The default sink: one line per record on stderr.
///
/// A line is the rendered message followed by the record's extra info, e.g.
/// `WARN: src/pay.rs:40:9 [12ms] card declined request_id=r-42 service=checkout`.
/// On wasm32 the line goes to the browser console instead, at the console level matching
/// the record's level.
///
/// Writes are unbuffered. A failed write (closed stderr) drops the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StdErrorLogger;

impl StdErrorLogger {
    pub const fn new() -> Self {
        StdErrorLogger
    }
}

fn line(record: &LogRecord) -> String {
    let mut line = record.to_string();
    line.push('\n');
    line
}

impl Logger for StdErrorLogger {
    #[cfg(not(target_arch = "wasm32"))]
    fn finish_log_record(&self, record: LogRecord) {
        use std::io::Write;
        // one write_all under one lock, so concurrent records never interleave mid-line
        let _ = std::io::stderr().lock().write_all(line(&record).as_bytes());
    }

    #[cfg(target_arch = "wasm32")]
    fn finish_log_record(&self, record: LogRecord) {
        use crate::Level;
        use web_sys::console;
        let msg = record.to_string().into();
        match record.level() {
            Level::Debug => console::debug_1(&msg),
            Level::Info => console::info_1(&msg),
            Level::Warning => console::warn_1(&msg),
            Level::Error => console::error_1(&msg),
            #[allow(unreachable_patterns)]
            _ => console::log_1(&msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    #[test]
    fn one_line_with_fields() {
        let mut record = LogRecord::new(Level::Error);
        record.log("disk full");
        record.set_fields([("volume".to_string(), crate::InfoValue::from("/data"))].into());
        assert_eq!(line(&record), "disk full volume=/data\n");
    }

    #[test]
    fn writing_does_not_panic() {
        StdErrorLogger::new().finish_log_record(LogRecord::new(Level::Warning));
    }
}

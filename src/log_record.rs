// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type.
//!
//! A [`LogRecord`] accumulates message parts progressively and carries the extra info that
//! was in effect when it was created. Records are built by the logging macros and handed by
//! value to every global [`Logger`](crate::Logger).
//!
//! # Example
//!
//! ```rust
//! use goodlog::{Level, LogRecord};
//!
//! let mut record = LogRecord::new(Level::Info);
//! record.log("Processing request ");
//! record.log_owned(format!("#{}", 42));
//! record.set_fields([("request_id".to_string(), "r-1".into())].into_iter().collect());
//! assert_eq!(record.to_string(), "Processing request #42 request_id=r-1");
//! ```

use crate::Level;
use crate::value::{InfoMap, InfoValue};
use std::fmt::{Debug, Display};
use std::sync::OnceLock;

static INITIAL_TIMESTAMP: OnceLock<crate::sys::Instant> = OnceLock::new();

fn initial_timestamp() -> crate::sys::Instant {
    *INITIAL_TIMESTAMP.get_or_init(crate::sys::Instant::now)
}

/**
A log record.

The design is as follows:

1.  Create a new [LogRecord]. The macros attach [`get_info`](crate::get_info) as its fields.
2.  Progressively write message parts to the [LogRecord].
3.  Finish the [LogRecord] and submit it to the [crate::Logger].

Fields are a snapshot: entering or leaving a scope after the record was created does not
change what the record carries.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub(crate) parts: Vec<String>,
    level: Level,
    fields: InfoMap,
}

impl LogRecord {
    pub fn new(level: Level) -> Self {
        Self {
            parts: Vec::new(),
            level,
            fields: InfoMap::new(),
        }
    }

    /**
    Append the message to the record.

    This is called in the case that a message is not already owned.
    */
    pub fn log(&mut self, message: &str) {
        self.parts.push(message.to_string());
    }

    /**
    Append the message to the record, taking ownership of the message.
    */
    pub fn log_owned(&mut self, message: String) {
        self.parts.push(message);
    }

    /**
    Log the time since the first record of the process, followed by a space.
    */
    pub fn log_timestamp(&mut self) -> crate::sys::Instant {
        let time = crate::sys::Instant::now();
        let duration = time.duration_since(initial_timestamp());
        self.log_owned(format!("[{:?}] ", duration));
        time
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// The extra info attached to this record.
    pub fn fields(&self) -> &InfoMap {
        &self.fields
    }

    /// Looks up one field.
    pub fn field(&self, key: &str) -> Option<&InfoValue> {
        self.fields.get(key)
    }

    pub fn set_fields(&mut self, fields: InfoMap) {
        self.fields = fields;
    }

    /// The message parts joined, without fields.
    pub fn message(&self) -> String {
        self.parts.concat()
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in &self.parts {
            write!(f, "{}", part)?;
        }
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}
/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug, Clone: derived, records are forwarded to several loggers
- PartialEq: derived, handy in tests
- Default: Info level, no parts, no fields
- Display: parts, then ` key=value` per field in key order

NOT IMPLEMENTED:
- Eq/Hash: fields may hold floats
- Copy: heap data
- Ord/PartialOrd: no meaningful ordering for log records
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_fields_is_just_parts() {
        let mut record = LogRecord::new(Level::Warning);
        record.log("a");
        record.log("b");
        assert_eq!(record.to_string(), "ab");
        assert_eq!(record.message(), "ab");
    }

    #[test]
    fn fields_render_in_key_order() {
        let mut record = LogRecord::new(Level::Info);
        record.log("done");
        let mut fields = InfoMap::new();
        fields.insert("zone".into(), "b".into());
        fields.insert("attempt".into(), 2u8.into());
        record.set_fields(fields);
        assert_eq!(record.to_string(), "done attempt=2 zone=b");
        assert_eq!(record.field("zone"), Some(&"b".into()));
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::Display;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Print-style debugging, debug builds only
    Debug,
    /// Ordinary progress messages, debug builds only
    Info,
    /// Suspicious condition, all builds
    Warning,
    /// Runtime error, all builds
    Error,
}

impl Level {
    /// The prefix written before the message, e.g. `INFO`.
    pub const fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

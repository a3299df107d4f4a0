// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide list of sinks.
//!
//! Every record produced by the logging macros is handed to each logger in this list, in
//! order. Until something is configured the list is a single
//! [`StdErrorLogger`](crate::StdErrorLogger), so an application that never touches this
//! module still sees its records, extra info included, on stderr.
//!
//! ```
//! use goodlog::global_logger::set_global_loggers;
//! use goodlog::InMemoryLogger;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(InMemoryLogger::new());
//! set_global_loggers(vec![logger.clone()]);
//!
//! goodlog::warn_sync!("only captured in memory");
//! assert!(logger.drain_logs().contains("only captured in memory"));
//! ```
//!
//! The list shares the persistent registry's locking: a spinlock held only to clone or
//! replace a `Vec` of `Arc`s. Delivery itself happens outside the lock, so a logger may
//! emit records of its own or reconfigure the list without deadlocking.

use crate::logger::Logger;
use crate::spinlock::Spinlock;
use crate::stderror_logger::StdErrorLogger;
use std::sync::Arc;

type Loggers = Vec<Arc<dyn Logger>>;

/// `None` until first use or first configuration.
static LOGGERS: Spinlock<Option<Loggers>> = Spinlock::new(None);

fn default_loggers() -> Loggers {
    vec![Arc::new(StdErrorLogger::new())]
}

/// A snapshot of the current loggers.
///
/// ```
/// assert!(!goodlog::global_loggers().is_empty());
/// ```
pub fn global_loggers() -> Vec<Arc<dyn Logger>> {
    if let Some(loggers) = LOGGERS.with(|slot| slot.clone()) {
        return loggers;
    }
    LOGGERS.with_mut(|slot| slot.get_or_insert_with(default_loggers).clone())
}

/// Appends a logger after the current ones, keeping the default stderr logger if nothing
/// was configured before.
pub fn add_global_logger(logger: Arc<dyn Logger>) {
    LOGGERS.with_mut(|slot| slot.get_or_insert_with(default_loggers).push(logger));
}

/// Replaces the whole list.
///
/// An empty list is allowed; records are then dropped.
pub fn set_global_loggers(new_loggers: Vec<Arc<dyn Logger>>) {
    let old = LOGGERS.with_mut(|slot| slot.replace(new_loggers));
    // a logger's Drop may log or read the list, so release the lock first
    drop(old);
}

/// Asks every logger to flush, e.g. right before the process exits.
pub fn prepare_to_die() {
    for logger in global_loggers() {
        logger.prepare_to_die();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_logger::InMemoryLogger;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard, mpsc};
    use std::time::Duration;

    static TEST_LOGGER_GUARD: Mutex<()> = Mutex::new(());

    /// Serializes tests that reconfigure the list and puts the old list back afterwards.
    struct Swap {
        original: Loggers,
        _guard: MutexGuard<'static, ()>,
    }

    impl Swap {
        fn new() -> Self {
            let guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
            Swap {
                original: global_loggers(),
                _guard: guard,
            }
        }
    }

    impl Drop for Swap {
        fn drop(&mut self) {
            set_global_loggers(std::mem::take(&mut self.original));
        }
    }

    #[test]
    fn add_appends() {
        let _swap = Swap::new();
        set_global_loggers(vec![Arc::new(StdErrorLogger::new())]);
        add_global_logger(Arc::new(InMemoryLogger::new()));
        assert_eq!(global_loggers().len(), 2);
    }

    #[test]
    fn every_logger_receives_the_record_with_fields() {
        let _swap = Swap::new();
        let first = Arc::new(InMemoryLogger::new());
        let second = Arc::new(InMemoryLogger::new());
        set_global_loggers(vec![first.clone(), second.clone()]);

        crate::EphemeralInfo::new()
            .with("fanout", true)
            .scope(|| crate::error_sync!("to both"));

        // other unit tests may log concurrently, so look for ours rather than count
        for logger in [first, second] {
            let records = logger.drain_records();
            let ours = records
                .iter()
                .find(|r| r.message().ends_with("to both"))
                .expect("record delivered");
            assert_eq!(ours.field("fanout"), Some(&crate::InfoValue::Bool(true)));
        }
    }

    #[test]
    fn empty_list_drops_records() {
        let _swap = Swap::new();
        set_global_loggers(Vec::new());
        crate::error_sync!("nowhere");
        assert!(global_loggers().is_empty());
    }

    /// Reads the global list while being dropped.
    #[derive(Debug)]
    struct ReadsListOnDrop(Arc<AtomicBool>);

    impl Logger for ReadsListOnDrop {
        fn finish_log_record(&self, _record: crate::LogRecord) {}
    }

    impl Drop for ReadsListOnDrop {
        fn drop(&mut self) {
            let _ = global_loggers();
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn replaced_logger_may_use_the_list_while_dropping() {
        let swap = Swap::new();
        let dropped = Arc::new(AtomicBool::new(false));
        set_global_loggers(vec![Arc::new(ReadsListOnDrop(dropped.clone()))]);

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            set_global_loggers(Vec::new());
            let _ = tx.send(());
        });
        let returned = rx.recv_timeout(Duration::from_secs(5)).is_ok();
        if !returned {
            // the lock is wedged; restoring the old list would hang too
            std::mem::forget(swap);
        }
        assert!(returned, "replacing the list deadlocked");

        // another test may still hold a snapshot containing the logger
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !dropped.load(Ordering::SeqCst) && std::time::Instant::now() < deadline {
            std::thread::yield_now();
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn reconfiguring_from_another_thread_is_visible() {
        let _swap = Swap::new();
        set_global_loggers(Vec::new());
        std::thread::spawn(|| add_global_logger(Arc::new(InMemoryLogger::new())))
            .join()
            .unwrap();
        assert_eq!(global_loggers().len(), 1);
    }
}

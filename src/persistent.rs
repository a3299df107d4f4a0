// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide registry of persistent info.
//!
//! Persistent info describes facts that hold for the whole process, such as which service
//! this is and which version is running. It is grouped into named entries so that
//! independent components can each register their own bag of attributes:
//!
//! ```rust
//! goodlog::register_persistent("service", [("service", "billing")]);
//! goodlog::register_persistent("build", [("version", "1.4.2")]);
//!
//! let all = goodlog::all_persistent();
//! assert_eq!(all["service"], "billing");
//! assert_eq!(all["version"], "1.4.2");
//! # goodlog::clear_persistent();
//! ```
//!
//! # Merging
//!
//! Registering a name that already exists merges into the existing entry: new values
//! overwrite same-named keys and everything else is kept. This supports enriching an entry
//! over time (service name at startup, version once it has been read from somewhere).
//!
//! When two different entries define the same key, the entry registered later wins. An
//! entry's position is fixed by its *first* registration; merging into it later does not
//! move it.
//!
//! # Thread safety
//!
//! The registry is the one piece of shared mutable state in goodlog. Writes are serialized
//! by a spinlock and are visible to every thread as soon as they return. Reads hold the lock
//! only long enough to clone.

use crate::spinlock::Spinlock;
use crate::value::{InfoMap, InfoValue};

#[derive(Debug)]
struct PersistentEntry {
    name: String,
    attributes: InfoMap,
}

static REGISTRY: Spinlock<Vec<PersistentEntry>> = Spinlock::new(Vec::new());

/// Creates or merges into the persistent entry called `name`.
pub fn register_persistent<K, V>(name: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>)
where
    K: Into<String>,
    V: Into<InfoValue>,
{
    let name = name.into();
    let attributes: InfoMap = attributes
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let merged = REGISTRY.with_mut(|entries| {
        match entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.attributes.extend(attributes);
                true
            }
            None => {
                entries.push(PersistentEntry {
                    name: name.clone(),
                    attributes,
                });
                false
            }
        }
    });
    if merged {
        crate::debug_sync!("merged into persistent entry `{}`", name);
    }
}

/// The union of every entry's attributes; later entries win on key collision.
pub fn all_persistent() -> InfoMap {
    REGISTRY.with(|entries| {
        let mut all = InfoMap::new();
        for entry in entries {
            all.extend(
                entry
                    .attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        all
    })
}

/// The attributes of one entry, if it exists.
pub fn persistent_entry(name: &str) -> Option<InfoMap> {
    REGISTRY.with(|entries| {
        entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.attributes.clone())
    })
}

/// Removes one entry, returning its attributes.
pub fn remove_persistent(name: &str) -> Option<InfoMap> {
    let removed = REGISTRY.with_mut(|entries| {
        let idx = entries.iter().position(|e| e.name == name)?;
        Some(entries.remove(idx).attributes)
    });
    match &removed {
        Some(_) => crate::debug_sync!("removed persistent entry `{}`", name),
        None => crate::debug_sync!("no persistent entry `{}` to remove", name),
    }
    removed
}

/// Removes every entry.
///
/// Intended for tests and administrative tooling; production code registers once and
/// leaves the registry alone.
pub fn clear_persistent() {
    REGISTRY.with_mut(|entries| entries.clear());
}

/// Builder for a persistent entry.
///
/// ```rust
/// goodlog::PersistentInfo::new("service")
///     .with("service", "search")
///     .with("replica", 3u16)
///     .register();
/// assert_eq!(goodlog::get_info()["replica"], goodlog::InfoValue::UInt(3));
/// # goodlog::clear_persistent();
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use = "nothing is registered until `register` is called"]
pub struct PersistentInfo {
    name: String,
    attributes: InfoMap,
}

impl PersistentInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: InfoMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Creates or merges into the entry, as [`register_persistent`].
    pub fn register(self) {
        register_persistent(self.name, self.attributes);
    }
}

/// Registers persistent info from `key = value` pairs.
///
/// ```rust
/// goodlog::register_persistent!("service", service = "ledger", region = "eu-west-1");
/// assert_eq!(goodlog::get_info()["region"], "eu-west-1");
/// # goodlog::clear_persistent();
/// ```
#[macro_export]
macro_rules! register_persistent {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::PersistentInfo::new($name)$(.with(stringify!($key), $value))*.register()
    };
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    static TEST_REGISTRY_GUARD: Mutex<()> = Mutex::new(());

    /// Serializes unit tests that touch the process-wide registry and starts them empty.
    pub(crate) fn isolated() -> MutexGuard<'static, ()> {
        let guard = TEST_REGISTRY_GUARD
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        clear_persistent();
        guard
    }

    #[test]
    fn register_then_read() {
        let _guard = isolated();
        register_persistent("svc", [("service", "x")]);
        assert_eq!(persistent_entry("svc").unwrap()["service"], "x");
        assert_eq!(all_persistent()["service"], "x");
    }

    #[test]
    fn reregistering_merges() {
        let _guard = isolated();
        register_persistent("svc", [("service", "x"), ("env", "dev")]);
        register_persistent("svc", [("env", "prod"), ("version", "2")]);
        let entry = persistent_entry("svc").unwrap();
        assert_eq!(entry.len(), 3);
        assert_eq!(entry["service"], "x");
        assert_eq!(entry["env"], "prod");
        assert_eq!(entry["version"], "2");
    }

    #[test]
    fn later_registration_wins_and_merge_keeps_position() {
        let _guard = isolated();
        register_persistent("first", [("owner", "first")]);
        register_persistent("second", [("owner", "second")]);
        assert_eq!(all_persistent()["owner"], "second");

        // merging into `first` does not move it after `second`
        register_persistent("first", [("other", 1u8)]);
        assert_eq!(all_persistent()["owner"], "second");
    }

    #[test]
    fn remove_and_clear() {
        let _guard = isolated();
        register_persistent("a", [("k", 1u8)]);
        register_persistent("b", [("j", 2u8)]);
        let removed = remove_persistent("a").unwrap();
        assert_eq!(removed["k"], InfoValue::UInt(1));
        assert!(remove_persistent("a").is_none());
        assert!(persistent_entry("a").is_none());
        assert_eq!(all_persistent().len(), 1);
        clear_persistent();
        assert!(all_persistent().is_empty());
    }

    #[test]
    fn builder_and_macro() {
        let _guard = isolated();
        PersistentInfo::new("svc").with("service", "api").register();
        crate::register_persistent!("svc", version = "3", canary = false);
        let entry = persistent_entry("svc").unwrap();
        assert_eq!(entry["service"], "api");
        assert_eq!(entry["version"], "3");
        assert_eq!(entry["canary"], InfoValue::Bool(false));
    }

    #[test]
    fn visible_to_other_threads_immediately() {
        let _guard = isolated();
        register_persistent("svc", [("service", "x")]);
        let seen = std::thread::spawn(|| all_persistent().get("service").cloned())
            .join()
            .unwrap();
        assert_eq!(seen, Some("x".into()));
    }
}

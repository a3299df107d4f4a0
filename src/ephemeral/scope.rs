// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped overrides with guaranteed restoration.

use super::apply_frame::WithFrame;
use super::frame::Frame;
use crate::value::{InfoMap, InfoValue};
use std::future::Future;

/// A set of ephemeral overrides waiting to be entered.
///
/// Build one with [`EphemeralInfo::new`] and [`with`](EphemeralInfo::with) (or the
/// [`ephemeral_info!`](crate::ephemeral_info) macro), then pick the shape of scope that fits
/// the code:
///
/// - [`enter`](EphemeralInfo::enter) returns a guard that restores on drop;
/// - [`scope`](EphemeralInfo::scope) runs a closure;
/// - [`in_scope`](EphemeralInfo::in_scope) wraps a future.
///
/// ```rust
/// use goodlog::EphemeralInfo;
///
/// let seen = EphemeralInfo::new()
///     .with("request_id", "r-1")
///     .scope(|| goodlog::get_info()["request_id"].clone());
/// assert_eq!(seen, "r-1");
/// assert!(goodlog::get_info().get("request_id").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "overrides do nothing until entered"]
pub struct EphemeralInfo {
    overrides: InfoMap,
}

impl EphemeralInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one override. A later `with` for the same key replaces the earlier one.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// The overrides collected so far.
    pub fn overrides(&self) -> &InfoMap {
        &self.overrides
    }

    /// Layers the overrides on the calling thread's frame until the returned guard drops.
    ///
    /// Guards must be dropped in the reverse order they were entered, on the thread that
    /// entered them; ordinary lexical scoping does this for you. Holding a guard across `.await` is only sound inside a
    /// future wrapped by [`in_scope`](EphemeralInfo::in_scope) or
    /// [`in_current_info`](super::FrameFutureExt::in_current_info), which carry the frame
    /// between polls.
    ///
    /// ```rust
    /// use goodlog::EphemeralInfo;
    ///
    /// {
    ///     let _outer = EphemeralInfo::new().with("user", "alice").enter();
    ///     {
    ///         let _inner = EphemeralInfo::new().with("user", "bob").enter();
    ///         assert_eq!(goodlog::get_info()["user"], "bob");
    ///     }
    ///     assert_eq!(goodlog::get_info()["user"], "alice");
    /// }
    /// assert!(goodlog::get_info().get("user").is_none());
    /// ```
    pub fn enter(self) -> EphemeralGuard {
        let merged = Frame::current().merged_with(self.overrides);
        let previous = Frame::replace(merged.clone());
        EphemeralGuard {
            previous: Some(previous),
            installed: merged,
        }
    }

    /// Runs `f` with the overrides active. Restores on return and on panic.
    pub fn scope<R>(self, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        f()
    }

    /// Wraps `future` so that every poll sees the overrides.
    ///
    /// The merged frame is computed now, from the caller's current frame, so the future
    /// inherits whatever scope it was created in even if it is polled somewhere else.
    ///
    /// ```rust
    /// use goodlog::EphemeralInfo;
    ///
    /// # async fn example() {
    /// let id = EphemeralInfo::new()
    ///     .with("request_id", 9u32)
    ///     .in_scope(async { goodlog::get_info()["request_id"].clone() })
    ///     .await;
    /// assert_eq!(id, goodlog::InfoValue::UInt(9));
    /// # }
    /// ```
    pub fn in_scope<F: Future>(self, future: F) -> WithFrame<F> {
        WithFrame::new(Frame::current().merged_with(self.overrides), future)
    }
}

impl<K, V> FromIterator<(K, V)> for EphemeralInfo
where
    K: Into<String>,
    V: Into<InfoValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(EphemeralInfo::new(), |info, (k, v)| info.with(k, v))
    }
}

/// Restores the frame that was current before [`EphemeralInfo::enter`].
///
/// Restoration happens in `Drop`, so it runs on normal exit, early return, `?` and panic
/// unwinding alike.
///
/// A guard only restores if the frame it installed is still the current one. Dropping it on
/// another thread, out of order, or after an await outside a wrapped future finds some other
/// path's frame installed; that frame is left alone, a warning is logged, and debug builds
/// panic.
#[derive(Debug)]
#[must_use = "the overrides are removed as soon as the guard is dropped"]
pub struct EphemeralGuard {
    previous: Option<Frame>,
    installed: Frame,
}

impl Drop for EphemeralGuard {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        if Frame::current().is_same(&self.installed) {
            Frame::replace(previous);
            return;
        }
        let keys: Vec<&str> = self.installed.iter().map(|(k, _)| k.as_str()).collect();
        crate::warn_sync!(
            "ephemeral scope {:?} was not restored: its guard was dropped on another thread or out of order",
            keys
        );
        debug_assert!(
            std::thread::panicking(),
            "EphemeralGuard dropped while a different frame was current"
        );
    }
}

/// Runs `f` with `overrides` layered on the calling path's ephemeral info.
///
/// ```rust
/// let n = goodlog::with_ephemeral_info([("attempt", 2u8)], || {
///     goodlog::get_info()["attempt"].to_string()
/// });
/// assert_eq!(n, "2");
/// ```
pub fn with_ephemeral_info<K, V, R>(
    overrides: impl IntoIterator<Item = (K, V)>,
    f: impl FnOnce() -> R,
) -> R
where
    K: Into<String>,
    V: Into<InfoValue>,
{
    overrides.into_iter().collect::<EphemeralInfo>().scope(f)
}

/// Async form of [`with_ephemeral_info`]: wraps `future` so every poll sees `overrides`.
pub fn with_ephemeral_info_async<K, V, F>(
    overrides: impl IntoIterator<Item = (K, V)>,
    future: F,
) -> WithFrame<F>
where
    K: Into<String>,
    V: Into<InfoValue>,
    F: Future,
{
    overrides.into_iter().collect::<EphemeralInfo>().in_scope(future)
}

/// Builds an [`EphemeralInfo`] from `key = value` pairs.
///
/// ```rust
/// let request_id = "abc";
/// goodlog::ephemeral_info!(request_id = request_id, attempt = 1).scope(|| {
///     assert_eq!(goodlog::get_info()["request_id"], "abc");
/// });
/// ```
#[macro_export]
macro_rules! ephemeral_info {
    ($($key:ident = $value:expr),* $(,)?) => {
        $crate::EphemeralInfo::new()$(.with(stringify!($key), $value))*
    };
}

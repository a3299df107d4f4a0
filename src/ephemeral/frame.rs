// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-path frame store.

use crate::value::{InfoMap, InfoValue};
use std::cell::Cell;
use std::sync::Arc;

/// An immutable snapshot of the ephemeral overrides active on one execution path.
///
/// Frames are cheap to clone (one `Arc` increment) and never change once built; entering a
/// scope builds a new frame rather than editing the current one. The empty frame does not
/// allocate.
///
/// # Examples
///
/// ```rust
/// use goodlog::ephemeral::Frame;
///
/// let frame = Frame::empty().merged_with([("request_id", "abc")]);
/// assert_eq!(frame.get("request_id").unwrap(), "abc");
///
/// let nested = frame.merged_with([("request_id", "def"), ("stage", "parse")]);
/// assert_eq!(nested.get("request_id").unwrap(), "def");
/// assert_eq!(frame.get("request_id").unwrap(), "abc");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame(Option<Arc<InfoMap>>);

thread_local! {
    static CURRENT: Cell<Frame> = const { Cell::new(Frame::empty()) };
}

impl Frame {
    /// The frame with no overrides.
    #[inline]
    pub const fn empty() -> Frame {
        Frame(None)
    }

    /// Returns the calling thread's current frame.
    ///
    /// A thread that never entered a scope, and a thread whose locals are being torn down,
    /// both observe the empty frame.
    #[inline]
    pub fn current() -> Frame {
        CURRENT
            .try_with(|cell| {
                let frame = cell.take();
                let copy = frame.clone();
                cell.set(frame);
                copy
            })
            .unwrap_or_default()
    }

    /// Installs `frame` as the calling thread's current frame, returning the one it replaced.
    ///
    /// Only the calling thread is affected. During thread teardown this is a no-op that
    /// hands `frame` straight back.
    #[inline]
    pub fn replace(frame: Frame) -> Frame {
        let mut slot = Some(frame);
        CURRENT
            .try_with(|cell| cell.replace(slot.take().unwrap_or_default()))
            .unwrap_or_else(|_| slot.unwrap_or_default())
    }

    /// Snapshot of the current frame, for handing to a child thread or task.
    ///
    /// This is [`Frame::current`] under a name that reads well at spawn sites.
    #[inline]
    pub fn capture() -> Frame {
        Frame::current()
    }

    /// Runs `f` with this frame installed on the calling thread, then restores whatever was
    /// there before, even if `f` panics.
    ///
    /// Use this when handing work to an executor or pool that goodlog doesn't know about.
    ///
    /// ```rust
    /// use goodlog::ephemeral::Frame;
    ///
    /// let frame = Frame::empty().merged_with([("job", 7u32)]);
    /// let seen = frame.apply(|| goodlog::get_info().get("job").cloned());
    /// assert_eq!(seen, Some(goodlog::InfoValue::UInt(7)));
    /// assert!(Frame::current().is_empty());
    /// ```
    pub fn apply<R>(&self, f: impl FnOnce() -> R) -> R {
        let _restore = Restore(Some(Frame::replace(self.clone())));
        f()
    }

    /// Builds a new frame from this one with `overrides` layered on top.
    ///
    /// Overrides win on key collision. Self is left untouched.
    pub fn merged_with<K, V>(&self, overrides: impl IntoIterator<Item = (K, V)>) -> Frame
    where
        K: Into<String>,
        V: Into<InfoValue>,
    {
        let mut map = self.to_map();
        map.extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        Frame::from(map)
    }

    /// Looks up one key.
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.0.as_ref().and_then(|m| m.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|m| m.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |m| m.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoValue)> {
        self.0.iter().flat_map(|m| m.iter())
    }

    /// Whether both are the same snapshot, not merely equal contents.
    ///
    /// Every non-empty frame built by [`merged_with`](Frame::merged_with) is a fresh
    /// allocation, so this identifies which scope installed a frame.
    pub(crate) fn is_same(&self, other: &Frame) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Copies the frame out into an owned map.
    pub fn to_map(&self) -> InfoMap {
        self.0.as_deref().cloned().unwrap_or_default()
    }
}

impl From<InfoMap> for Frame {
    fn from(map: InfoMap) -> Self {
        if map.is_empty() {
            Frame::empty()
        } else {
            Frame(Some(Arc::new(map)))
        }
    }
}

/// Puts a frame back on drop.
pub(crate) struct Restore(pub(crate) Option<Frame>);

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(previous) = self.0.take() {
            Frame::replace(previous);
        }
    }
}

/*
Boilerplate notes for Frame:

- Clone: the whole point, it is how a snapshot is handed to a child.
- PartialEq: compares contents, two separately built frames with the same pairs are equal.
- Eq/Hash: not implemented, InfoValue holds floats.
- Default: the empty frame.
- Send/Sync: automatic, Arc<InfoMap> is both.
*/

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging the persistent and ephemeral layers.

use crate::ephemeral::Frame;
use crate::persistent::{all_persistent, clear_persistent};
use crate::value::InfoMap;

/// Returns the extra info to attach to a log record emitted right now.
///
/// This is every persistent entry merged in registration order, with the calling path's
/// ephemeral frame layered on top; ephemeral values win on key collision. The result is
/// computed fresh on every call.
///
/// ```rust
/// goodlog::register_persistent("svc", [("service", "x")]);
/// assert_eq!(goodlog::get_info()["service"], "x");
///
/// goodlog::ephemeral_info!(service = "y").scope(|| {
///     assert_eq!(goodlog::get_info()["service"], "y");
/// });
/// assert_eq!(goodlog::get_info()["service"], "x");
/// # goodlog::reset();
/// ```
pub fn get_info() -> InfoMap {
    let mut info = all_persistent();
    info.extend(
        Frame::current()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    info
}

/// Clears all persistent info and the calling path's ephemeral frame.
///
/// For test isolation, between scopes: a guard still alive when this runs will find its
/// frame gone and refuse to restore. Other threads' frames are not touched; they belong to
/// those threads.
pub fn reset() {
    clear_persistent();
    Frame::replace(Frame::empty());
}

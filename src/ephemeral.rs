// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ephemeral info: overrides that live for a bounded block on one execution path.
//!
//! Each thread holds one current [`Frame`], an immutable snapshot of the overrides in
//! effect. Entering a scope builds a new frame (the old one plus the overrides) and installs
//! it; leaving the scope puts the old frame back. Nothing here is shared between threads, so
//! there is nothing to lock.
//!
//! # Shapes of scope
//!
//! ```rust
//! use goodlog::EphemeralInfo;
//!
//! // guard
//! {
//!     let _g = EphemeralInfo::new().with("request_id", "a").enter();
//!     assert_eq!(goodlog::get_info()["request_id"], "a");
//! }
//!
//! // closure
//! goodlog::with_ephemeral_info([("request_id", "b")], || {
//!     assert_eq!(goodlog::get_info()["request_id"], "b");
//! });
//!
//! assert!(goodlog::get_info().get("request_id").is_none());
//! ```
//!
//! # Tasks and threads
//!
//! Async tasks share worker threads, and Rust threads start with empty thread-locals. So
//! propagation to children is explicit:
//!
//! - [`EphemeralInfo::in_scope`] and [`FrameFutureExt::in_current_info`] wrap a future in a
//!   [`WithFrame`] that owns the task's frame and installs it around every poll;
//! - [`crate::thread::spawn`] hands a snapshot to a new OS thread;
//! - [`Frame::apply`] runs a closure under a captured frame, for any other pool.
//!
//! ```rust
//! use goodlog::ephemeral::FrameFutureExt;
//!
//! # async fn example() {
//! async fn worker(i: u32) {
//!     goodlog::ephemeral_info!(request_id = i)
//!         .in_scope(async move {
//!             // interleave freely with other workers here
//!             assert_eq!(goodlog::get_info()["request_id"], goodlog::InfoValue::UInt(i as u64));
//!         })
//!         .await
//! }
//! worker(1).in_current_info().await;
//! # }
//! ```

mod apply_frame;
mod frame;
mod scope;


pub use apply_frame::{FrameFutureExt, WithFrame};
pub use frame::Frame;
pub use scope::{EphemeralGuard, EphemeralInfo, with_ephemeral_info, with_ephemeral_info_async};

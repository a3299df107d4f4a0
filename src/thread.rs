// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spawning threads that inherit the spawner's ephemeral info.
//!
//! `std::thread::spawn` starts the child with fresh thread-locals, so a request id set by
//! the parent would silently vanish. These wrappers snapshot the parent's frame at spawn time
//! and install it in the child before running the closure. After that the two threads are
//! independent: scopes entered in one are never visible in the other.
//!
//! ```rust
//! let _g = goodlog::ephemeral_info!(request_id = "r-1").enter();
//! let handle = goodlog::thread::spawn(|| goodlog::get_info()["request_id"].to_string());
//! assert_eq!(handle.join().unwrap(), "r-1");
//! ```

use crate::ephemeral::Frame;

#[cfg(target_arch = "wasm32")]
use wasm_thread as thread;

#[cfg(not(target_arch = "wasm32"))]
use std::thread;

pub use thread::JoinHandle;

/// Spawns a thread that starts with a snapshot of the calling thread's frame.
pub fn spawn<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let frame = Frame::capture();
    thread::spawn(move || frame.apply(f))
}

/// Like [`spawn`], with a thread name. Fails only if the OS refuses to create the thread.
pub fn spawn_named<F, T>(name: impl Into<String>, f: F) -> std::io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let frame = Frame::capture();
    thread::Builder::new()
        .name(name.into())
        .spawn(move || frame.apply(f))
}

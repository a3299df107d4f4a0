//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# goodlog

goodlog attaches a small amount of extra info (service name, request id, tenant...) to
every log record emitted while that info is in scope, without threading it through every
function call.

# The problem

A request handler knows the request id. The database helper three calls down, which is the
one that logs the slow query, does not. The classic fix is a mutable global holding "the
current request id". That works until two requests run concurrently: they overwrite each
other's value, and the slow-query line names the wrong request. Tests that don't exercise
concurrency never notice.

# Two layers

goodlog keeps extra info in two layers:

* **Persistent info** is process-wide and long-lived: which service this is, which version.
  It lives in a named registry, registered once at startup.
* **Ephemeral info** is scoped to one execution path: the request id for *this* request.
  It is stored per thread, entered for a bounded block, and restored exactly when the block
  exits, however it exits.

[`get_info`] merges the two for the calling path, ephemeral winning on key collision, and
is what gets attached to each [`LogRecord`].

```rust
goodlog::register_persistent!("service", service = "checkout");

fn charge_card() {
    // no request id in sight, but the record still carries it
    goodlog::warn_sync!("card declined");
    assert_eq!(goodlog::get_info()["request_id"], "r-42");
}

goodlog::ephemeral_info!(request_id = "r-42").scope(charge_card);
assert!(goodlog::get_info().get("request_id").is_none());
assert_eq!(goodlog::get_info()["service"], "checkout");
# goodlog::reset();
```

# Multithreading and async

Each thread has its own ephemeral frame, so concurrent threads never see each other's
scopes. Async tasks are a little different, because one worker thread runs many tasks.
Scopes that span `.await` are expressed as wrapped futures, which carry their frame with
them and swap it in for every poll:

```rust
# async fn example() {
async fn handle(id: u64) {
    goodlog::ephemeral_info!(request_id = id)
        .in_scope(async move {
            // any number of awaits; other tasks interleave freely
            goodlog::info_async!("handling");
        })
        .await
}
# handle(1).await;
# }
```

Rust threads and tasks don't inherit thread-locals, so a child that should inherit the
parent's scope is spawned through [`thread::spawn`] or wrapped with
[`in_current_info`](ephemeral::FrameFutureExt::in_current_info). After the spawn, parent
and child are independent.

The [`scoped_info`] attribute wraps a whole function body, sync or async:

```rust
#[goodlog::scoped_info(order_id = order_id)]
fn ship(order_id: u64) {
    goodlog::info_sync!("shipping");
}
# ship(3);
```

# Logging

goodlog includes a small emission layer: [`Level`], [`LogRecord`], the [`Logger`] trait,
a global logger list defaulting to stderr, an [`InMemoryLogger`] for tests, and the
`debug_*`, `info_*`, `warn_*` and `error_*` macros. Records render their extra info as
trailing ` key=value` pairs.
*/

mod level;
mod logger;
mod stderror_logger;
mod inmemory_logger;
pub mod global_logger;
mod macros;
mod log_record;
mod value;
mod persistent;
mod info;
pub mod ephemeral;
pub mod thread;
mod sys;
mod spinlock;

pub use level::Level;
pub use logger::Logger;
pub use log_record::LogRecord;
pub use inmemory_logger::InMemoryLogger;
pub use stderror_logger::StdErrorLogger;
pub use global_logger::{add_global_logger, set_global_loggers, global_loggers};

pub use value::{InfoMap, InfoValue};
pub use persistent::{
    PersistentInfo, all_persistent, clear_persistent, persistent_entry, register_persistent,
    remove_persistent,
};
pub use ephemeral::{
    EphemeralGuard, EphemeralInfo, with_ephemeral_info, with_ephemeral_info_async,
};
pub use info::{get_info, reset};

pub use goodlog_proc::scoped_info;

#[doc(hidden)]
pub mod hidden {
    pub use crate::macros::{record_async_post, record_pre, record_sync_post};
}
extern crate self as goodlog;

// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
On the wasm main thread, we can't necessarily lock.

Instead we use a spinlock.  It is important to ensure that the spinlock
must be held for as short a time as possible.

Both the persistent registry and the global logger list live behind one of these.
*/

use std::cell::UnsafeCell;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u8 = 0;
//we allow for 254 readers or 1 writer (val = 255)
const LOCKED_WRITE: u8 = u8::MAX;

pub(crate) struct Spinlock<T> {
    data: UnsafeCell<T>,
    locked: AtomicU8,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send + Sync> Sync for Spinlock<T> {}

/// Releases the lock on drop, so a panicking closure can't wedge every other thread.
struct Unlock<'a> {
    locked: &'a AtomicU8,
    write: bool,
}

impl Drop for Unlock<'_> {
    fn drop(&mut self) {
        if self.write {
            self.locked.store(UNLOCKED, Release);
        } else {
            self.locked.fetch_sub(1, Release);
        }
    }
}

impl<T> Spinlock<T> {
    pub(crate) const fn new(data: T) -> Self {
        Spinlock {
            data: UnsafeCell::new(data),
            locked: AtomicU8::new(UNLOCKED),
        }
    }

    fn spin_lock_write(&self) -> Unlock<'_> {
        while self
            .locked
            .compare_exchange_weak(UNLOCKED, LOCKED_WRITE, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
        Unlock {
            locked: &self.locked,
            write: true,
        }
    }

    fn spin_lock_read(&self) -> Unlock<'_> {
        while self
            .locked
            .fetch_update(Acquire, Relaxed, |v| {
                if v < (LOCKED_WRITE - 1) {
                    Some(v + 1)
                } else {
                    None
                }
            })
            .is_err()
        {
            std::hint::spin_loop();
        }
        Unlock {
            locked: &self.locked,
            write: false,
        }
    }

    pub(crate) fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let _release = self.spin_lock_write();
        // SAFETY: We have exclusive access to the data now
        unsafe { f(&mut *self.data.get()) }
    }

    pub(crate) fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let _release = self.spin_lock_read();
        // SAFETY: We have shared access to the data now
        unsafe { f(&*self.data.get()) }
    }
}

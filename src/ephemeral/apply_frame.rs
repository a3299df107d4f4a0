// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async frame preservation.

use std::future::Future;
use std::mem::ManuallyDrop;
use std::pin::Pin;
use std::task::Poll;

use super::frame::{Frame, Restore};

/// A [`Future`] wrapper that carries an ephemeral frame across executor boundaries.
///
/// Executors interleave many tasks on the same threads, and a multi-threaded executor may
/// poll one task on several threads over its lifetime, so a thread-local frame on its own
/// would leak between tasks. `WithFrame` owns its task's frame instead and swaps it in for
/// the duration of each poll:
///
/// 1. install the wrapped frame, remembering the thread's previous one;
/// 2. poll the inner future;
/// 3. save whatever frame the poll left behind and reinstall the previous one.
///
/// Because of step 3, an [`EphemeralGuard`](super::EphemeralGuard) held across `.await`
/// inside the wrapped future keeps working even if the next poll happens on another thread.
///
/// The inner future is also dropped with its frame installed, so guards it still owns
/// restore into the wrapper's frame rather than into whatever the dropping thread had.
///
/// # Examples
///
/// ```rust
/// use goodlog::ephemeral::FrameFutureExt;
///
/// async fn handle() -> Option<goodlog::InfoValue> {
///     goodlog::get_info().get("request_id").cloned()
/// }
///
/// # async fn example() {
/// let fut = goodlog::ephemeral_info!(request_id = "r-7").scope(|| handle().in_current_info());
/// // the scope has ended, but the future captured it
/// assert_eq!(fut.await, Some("r-7".into()));
/// # }
/// ```
#[must_use = "futures do nothing unless polled"]
pub struct WithFrame<F> {
    frame: Frame,
    future: ManuallyDrop<F>,
}

impl<F> WithFrame<F> {
    /// Wraps `future` so that it always runs under `frame`.
    pub fn new(frame: Frame, future: F) -> Self {
        Self {
            frame,
            future: ManuallyDrop::new(future),
        }
    }

    /// The frame the future will see on its next poll.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl<F> std::fmt::Debug for WithFrame<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithFrame").field("frame", &self.frame).finish()
    }
}

/// Swaps the task frame back out after a poll, including when the poll panics.
struct SwapBack<'a> {
    saved: &'a mut Frame,
    prior: Option<Frame>,
}

impl Drop for SwapBack<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            *self.saved = Frame::replace(prior);
        }
    }
}

impl<F> Future for WithFrame<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        // SAFETY: `future` is never moved out of the pinned wrapper; `frame` is not
        // structurally pinned.
        let (frame, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (&mut d.frame, Pin::new_unchecked(&mut *d.future))
        };
        let prior = Frame::replace(std::mem::take(frame));
        let _swap_back = SwapBack {
            saved: frame,
            prior: Some(prior),
        };
        fut.poll(cx)
    }
}

impl<F> Drop for WithFrame<F> {
    fn drop(&mut self) {
        let _restore = Restore(Some(Frame::replace(self.frame.clone())));
        // SAFETY: the future is dropped exactly once, here, and never touched again. Dropping
        // in place is allowed for pinned data.
        unsafe { ManuallyDrop::drop(&mut self.future) }
    }
}

/// Extension methods for carrying ephemeral info into futures.
///
/// Rust tasks don't inherit thread-locals from the code that spawned them. Wrap a future
/// with [`in_current_info`](FrameFutureExt::in_current_info) before handing it to
/// `spawn` so that the child starts with a snapshot of the parent's frame:
///
/// ```rust
/// use goodlog::ephemeral::FrameFutureExt;
///
/// # async fn example() {
/// let _g = goodlog::ephemeral_info!(tenant = "acme").enter();
/// let child = async { goodlog::get_info()["tenant"].to_string() }.in_current_info();
/// drop(_g);
/// assert_eq!(child.await, "acme");
/// # }
/// ```
pub trait FrameFutureExt: Future + Sized {
    /// Wraps the future with a snapshot of the caller's current frame.
    fn in_current_info(self) -> WithFrame<Self> {
        WithFrame::new(Frame::capture(), self)
    }

    /// Wraps the future with an explicit frame.
    fn with_frame(self, frame: Frame) -> WithFrame<Self> {
        WithFrame::new(frame, self)
    }
}

impl<F: Future> FrameFutureExt for F {}

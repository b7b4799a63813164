//! Single-threaded cancellation token for pool builds.
//!
//! A token is cheap to clone; all clones observe the same signal. Cancelling
//! wakes every task waiting on [`CancelToken::cancelled`] and runs the abort
//! hooks registered with [`CancelToken::on_cancel`] (the browser fetcher uses
//! one to abort its `AbortController`).

use crate::error::BuildError;
use futures::future::{select, Either};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::{pin, Pin};
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

type AbortHook = Box<dyn FnOnce()>;

#[derive(Default)]
struct Signal {
    cancelled: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
    hooks: RefCell<Vec<AbortHook>>,
}

#[derive(Clone, Default)]
pub struct CancelToken {
    signal: Rc<Signal>,
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.cancelled.get()
    }

    /// Whether both handles belong to the same token.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.signal, &other.signal)
    }

    /// Cancel the token. Idempotent.
    pub fn cancel(&self) {
        if self.signal.cancelled.replace(true) {
            return;
        }
        // Take the lists before running anything so hooks may touch the token.
        let wakers = std::mem::take(&mut *self.signal.wakers.borrow_mut());
        let hooks = std::mem::take(&mut *self.signal.hooks.borrow_mut());
        for waker in wakers {
            waker.wake();
        }
        for hook in hooks {
            hook();
        }
    }

    /// Register a hook run once on cancellation; runs immediately if the
    /// token is already cancelled.
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.is_cancelled() {
            hook();
        } else {
            self.signal.hooks.borrow_mut().push(Box::new(hook));
        }
    }

    /// `Err(Cancelled)` once the token has been cancelled.
    pub fn check(&self) -> Result<(), BuildError> {
        if self.is_cancelled() {
            Err(BuildError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the token is cancelled.
    pub fn cancelled(&self) -> Cancelled {
        Cancelled {
            token: self.clone(),
        }
    }

    /// Drive `fut` until it completes or the token is cancelled, whichever
    /// happens first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, BuildError> {
        self.check()?;
        let fut = pin!(fut);
        let cancelled = pin!(self.cancelled());
        match select(fut, cancelled).await {
            Either::Left((output, _)) => Ok(output),
            Either::Right(((), _)) => Err(BuildError::Cancelled),
        }
    }
}

/// Future returned by [`CancelToken::cancelled`].
pub struct Cancelled {
    token: CancelToken,
}

impl Future for Cancelled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.token.is_cancelled() {
            return Poll::Ready(());
        }
        let mut wakers = self.token.signal.wakers.borrow_mut();
        if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

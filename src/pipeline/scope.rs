//! Cancellation scope shared by every task of one run.
//!
//! A [`Scope`] is canceled at most once. Canceling a scope cancels every scope derived from it
//! with [`Scope::child`]; canceling a child never affects its parent. Tasks poll
//! [`Scope::is_canceled`] between units of work and can block on [`Scope::done`] inside a
//! `crossbeam_channel::select!` so a blocked send or receive wakes up on cancellation.

use crossbeam_channel::{Receiver, Sender, after, bounded, select};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;
use std::time::Duration;

struct ScopeInner {
    canceled: AtomicBool,
    /// Dropped on cancel; every clone of `done_rx` then reports disconnected.
    done_tx: Mutex<Option<Sender<()>>>,
    done_rx: Receiver<()>,
    children: Mutex<Vec<Weak<ScopeInner>>>,
}

/// Cheap to clone; all clones observe the same cancellation.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("canceled", &self.is_canceled())
            .finish()
    }
}

impl Scope {
    /// A scope with no parent. Only an explicit [`cancel`](Self::cancel) ends it.
    pub fn root() -> Self {
        let (done_tx, done_rx) = bounded::<()>(0);
        Scope {
            inner: Arc::new(ScopeInner {
                canceled: AtomicBool::new(false),
                done_tx: Mutex::new(Some(done_tx)),
                done_rx,
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Derive a scope that is canceled together with `self`. Already canceled if `self` is.
    pub fn child(&self) -> Scope {
        let child = Scope::root();
        let mut children = lock(&self.inner.children);
        if self.is_canceled() {
            drop(children);
            child.cancel();
        } else {
            children.retain(|c| c.strong_count() > 0);
            children.push(Arc::downgrade(&child.inner));
        }
        child
    }

    /// Derive a child scope that cancels itself once `timeout` elapses.
    ///
    /// The watcher thread exits as soon as the child is canceled for any reason.
    pub fn with_deadline(&self, timeout: Duration) -> std::io::Result<Scope> {
        let child = self.child();
        let watched = child.clone();
        thread::Builder::new()
            .name("scope-deadline".to_string())
            .spawn(move || {
                select! {
                    recv(watched.done()) -> _ => {}
                    recv(after(timeout)) -> _ => {
                        if watched.cancel() {
                            debug!("deadline of {:?} reached, scope canceled", timeout);
                        }
                    }
                }
            })?;
        Ok(child)
    }

    /// Cancel this scope and all of its descendants. Returns true only for the call that
    /// actually performed the cancellation.
    pub fn cancel(&self) -> bool {
        let first = {
            let mut done_tx = lock(&self.inner.done_tx);
            self.inner.canceled.store(true, Ordering::SeqCst);
            done_tx.take().is_some()
        };
        if first {
            let children = std::mem::take(&mut *lock(&self.inner.children));
            for inner in children.iter().filter_map(Weak::upgrade) {
                Scope { inner }.cancel();
            }
        }
        first
    }

    pub fn is_canceled(&self) -> bool {
        self.inner.canceled.load(Ordering::SeqCst)
    }

    /// Receiver that becomes ready (disconnected) once the scope is canceled. Never yields a value.
    pub fn done(&self) -> &Receiver<()> {
        &self.inner.done_rx
    }

    /// Block until the scope is canceled.
    pub fn wait(&self) {
        let _ = self.inner.done_rx.recv();
    }

    /// Block until the scope is canceled or `timeout` elapses. Returns true if canceled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let _ = self.inner.done_rx.recv_timeout(timeout);
        self.is_canceled()
    }
}

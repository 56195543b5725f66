//! Structured group of named threads sharing one scope and one first-error slot.
//!
//! The first task to return an error (or panic) cancels the group's scope so its peers stop at
//! their next cancellation check. [`TaskGroup::wait`] joins every thread and returns that first
//! error. Dropping a group without waiting cancels and joins it as well, so no thread outlives it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::UploadError;

use super::error_handler::FirstError;
use super::observer::UploadObserver;
use super::scope::Scope;

/// Cancels the scope when the owning thread unwinds.
struct CancelOnPanic(Scope);

impl Drop for CancelOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.cancel();
        }
    }
}

pub struct TaskGroup {
    scope: Scope,
    first_error: Arc<FirstError>,
    observer: Arc<dyn UploadObserver>,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl TaskGroup {
    pub fn new(scope: Scope, observer: Arc<dyn UploadObserver>) -> Self {
        Self {
            scope,
            first_error: Arc::new(FirstError::new()),
            observer,
            handles: Vec::new(),
        }
    }

    /// Number of tasks spawned and not yet joined.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Run `task` on its own thread named `name`. A spawn failure is recorded like a task error.
    pub fn spawn<F>(&mut self, name: impl Into<String>, task: F)
    where
        F: FnOnce(&Scope) -> Result<(), UploadError> + Send + 'static,
    {
        let name = name.into();
        let scope = self.scope.clone();
        let first_error = Arc::clone(&self.first_error);
        let observer = Arc::clone(&self.observer);
        let task_name = name.clone();

        let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
            let _guard = CancelOnPanic(scope.clone());
            if let Err(err) = task(&scope) {
                fail(&scope, &first_error, observer.as_ref(), &task_name, err);
            }
        });
        match spawned {
            Ok(handle) => self.handles.push((name, handle)),
            Err(source) => {
                let err = UploadError::Spawn {
                    task: name.clone(),
                    source,
                };
                fail(
                    &self.scope,
                    &self.first_error,
                    self.observer.as_ref(),
                    &name,
                    err,
                );
            }
        }
    }

    /// Join every task. Returns the first error any of them reported.
    pub fn wait(mut self) -> Result<(), UploadError> {
        self.join_all();
        match self.first_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn join_all(&mut self) {
        for (name, handle) in std::mem::take(&mut self.handles) {
            if handle.join().is_err() {
                let err = UploadError::TaskPanicked { task: name.clone() };
                fail(
                    &self.scope,
                    &self.first_error,
                    self.observer.as_ref(),
                    &name,
                    err,
                );
            }
        }
    }
}

impl Drop for TaskGroup {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            self.scope.cancel();
            self.join_all();
        }
    }
}

/// Record `err` (first wins) and cancel the scope.
fn fail(
    scope: &Scope,
    first_error: &FirstError,
    observer: &dyn UploadObserver,
    task: &str,
    err: UploadError,
) {
    observer.task_failed(task, &err);
    if let Some(discarded) = first_error.record(err) {
        observer.error_discarded(task, &discarded);
    }
    scope.cancel();
}

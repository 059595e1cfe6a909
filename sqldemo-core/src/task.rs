//! Background load of the email table
//!
//! A [`LoadTask`] runs the store lookup and the full read on tokio's blocking
//! pool. The task belongs to whoever holds the `LoadTask`: dropping it aborts
//! the work, and [`LoadTask::join`] hands back the outcome so it can be
//! logged or shown.
//!
//! Blocking work cannot be preempted. Cancelling aborts the async side at
//! once and raises a flag the blocking side checks before it queries; a query
//! already in progress runs to the end and its rows are discarded.

use crate::db::{Store, StoreCell, StoreContext};
use crate::error::{Error, Result};
use crate::types::Email;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// How a [`LoadTask`] ended
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Email>),
    Failed(Error),
    Cancelled,
}

/// Owned, cancellable fetch-all.
#[derive(Debug)]
pub struct LoadTask {
    handle: Option<JoinHandle<Result<Vec<Email>>>>,
    cancelled: Arc<AtomicBool>,
}

impl LoadTask {
    /// Load through the process-wide store.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(ctx: StoreContext) -> Self {
        Self::spawn_in(Store::global(), ctx)
    }

    /// Load through the store held by `cell`.
    pub fn spawn_in(cell: &'static StoreCell, ctx: StoreContext) -> Self {
        Self::spawn_work(move |cancelled| {
            let store = cell.get_or_open(&ctx)?;
            if cancelled.load(Ordering::SeqCst) {
                return Err(Error::Cancelled);
            }
            store.email_dao().get_all()
        })
    }

    fn spawn_work<F>(work: F) -> Self
    where
        F: FnOnce(&AtomicBool) -> Result<Vec<Email>> + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = tokio::spawn(async move {
            tokio::task::spawn_blocking(move || work(&flag))
                .await
                .unwrap_or_else(|e| Err(Error::Task(e.to_string())))
        });

        tracing::debug!("Startup load spawned");
        Self {
            handle: Some(handle),
            cancelled,
        }
    }

    /// Abort the load. A later [`join`](Self::join) reports
    /// [`LoadOutcome::Cancelled`] unless the work had already finished.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Wait for the load to finish.
    pub async fn join(mut self) -> LoadOutcome {
        // Keep the handle in `self` while waiting so a dropped join still aborts
        let Some(handle) = self.handle.as_mut() else {
            return LoadOutcome::Cancelled;
        };
        let result = handle.await;
        self.handle = None;

        match result {
            Ok(Ok(emails)) => LoadOutcome::Loaded(emails),
            Ok(Err(Error::Cancelled)) => LoadOutcome::Cancelled,
            Ok(Err(e)) => LoadOutcome::Failed(e),
            Err(e) if e.is_cancelled() => LoadOutcome::Cancelled,
            Err(e) => LoadOutcome::Failed(Error::Task(e.to_string())),
        }
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancelled.store(true, Ordering::SeqCst);
            handle.abort();
        }
    }
}

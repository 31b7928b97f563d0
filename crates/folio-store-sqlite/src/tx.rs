//! Unit-of-work coordinator.
//!
//! Every store operation runs inside one SQLite transaction on the connection
//! thread. Steps receive the open [`Transaction`] explicitly. The first step
//! that fails aborts the unit: the transaction is rolled back and that error
//! is returned unchanged.
//!
//! If the awaiting future is dropped (request cancelled or timed out) the unit
//! is flagged, and a flagged unit rolls back instead of committing.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use rusqlite::{Transaction, TransactionBehavior};

use crate::{Error, Result};

/// Whether a unit of work writes.
///
/// Writers take the database lock up front (`BEGIN IMMEDIATE`) so they never
/// fail half-way through on a lock upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
  Read,
  Write,
}

impl Access {
  fn behavior(self) -> TransactionBehavior {
    match self {
      Self::Read => TransactionBehavior::Deferred,
      Self::Write => TransactionBehavior::Immediate,
    }
  }
}

/// Shared flag raised when the caller stops waiting for a unit of work.
#[derive(Debug, Clone, Default)]
pub(crate) struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
  pub(crate) fn cancel(&self) { self.0.store(true, Ordering::Release) }

  pub(crate) fn is_cancelled(&self) -> bool { self.0.load(Ordering::Acquire) }

  fn cancel_on_drop(&self) -> CancelOnDrop {
    CancelOnDrop { flag: self.clone(), armed: true }
  }
}

/// Raises the flag if dropped before [`CancelOnDrop::disarm`].
struct CancelOnDrop {
  flag:  Cancellation,
  armed: bool,
}

impl CancelOnDrop {
  fn disarm(mut self) { self.armed = false; }
}

impl Drop for CancelOnDrop {
  fn drop(&mut self) {
    if self.armed {
      self.flag.cancel();
    }
  }
}

/// Run `work` as one unit of work named `unit`.
pub(crate) async fn run<T, F>(
  conn:   &tokio_rusqlite::Connection,
  unit:   &'static str,
  access: Access,
  work:   F,
) -> Result<T>
where
  F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  T: Send + 'static,
{
  run_with(conn, unit, access, Cancellation::default(), work).await
}

/// [`run`] with a caller-supplied cancellation flag.
pub(crate) async fn run_with<T, F>(
  conn:   &tokio_rusqlite::Connection,
  unit:   &'static str,
  access: Access,
  cancel: Cancellation,
  work:   F,
) -> Result<T>
where
  F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  T: Send + 'static,
{
  let guard = cancel.cancel_on_drop();
  let outcome = conn
    .call(move |conn| Ok(execute(conn, unit, access, &cancel, work)))
    .await;
  guard.disarm();
  outcome?
}

fn execute<T, F>(
  conn:   &mut rusqlite::Connection,
  unit:   &'static str,
  access: Access,
  cancel: &Cancellation,
  work:   F,
) -> Result<T>
where
  F: FnOnce(&Transaction<'_>) -> Result<T>,
{
  if cancel.is_cancelled() {
    tracing::debug!(unit, "cancelled before start");
    return Err(Error::Cancelled(unit));
  }

  let tx = conn.transaction_with_behavior(access.behavior())?;

  match work(&tx) {
    Ok(_) if cancel.is_cancelled() => {
      tracing::warn!(unit, "caller went away; rolling back instead of committing");
      tx.rollback()?;
      Err(Error::Cancelled(unit))
    }
    Ok(value) => {
      tx.commit()?;
      tracing::trace!(unit, "committed");
      Ok(value)
    }
    Err(err) => {
      match tx.rollback() {
        Ok(()) => tracing::debug!(unit, error = %err, "rolled back"),
        Err(rollback) => {
          tracing::error!(unit, error = %err, %rollback, "rollback failed")
        }
      }
      Err(err)
    }
  }
}

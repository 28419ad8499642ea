//! Scoped sessions.
//!
//! A scope is anything that owns a [`Session`]: a generated client, or a
//! hand-written struct holding endpoints next to their session. [`scoped`]
//! runs a body against a scope and closes the session on every exit path,
//! panics included. [`single_session`] additionally opens the scope, so a
//! single call gets its own short-lived transport.

use std::future::Future;
use std::panic::{AssertUnwindSafe, resume_unwind};
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::debug;

use crate::{HttpTransport, Result, Session};

/// Something that owns a [`Session`].
pub trait Scope: Send + Sync {
    /// The transport of the owned session.
    type Transport: HttpTransport;

    /// The owned session.
    fn session(&self) -> &Session<Self::Transport>;
}

impl<T: HttpTransport> Scope for Session<T> {
    type Transport = T;

    fn session(&self) -> &Session<T> {
        self
    }
}

/// Run `body` against `scope`, then close the session.
///
/// The session is closed whether the body returns `Ok`, returns `Err` or
/// panics; a panic is resumed once the session is closed.
///
/// # Errors
///
/// Returns the body error.
pub async fn scoped<S, F, Fut, R>(scope: S, body: F) -> Result<R>
where
    S: Scope,
    F: FnOnce(Arc<S>) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let scope = Arc::new(scope);
    let handle = Arc::clone(&scope);
    let outcome = AssertUnwindSafe(async move { body(handle).await })
        .catch_unwind()
        .await;

    debug!("leaving session scope");
    scope.session().close().await;

    match outcome {
        Ok(result) => result,
        Err(panic) => resume_unwind(panic),
    }
}

/// Open a scope, run `body` against it, then close its session.
///
/// ```ignore
/// let station = tether::single_session(MetroClient::connect, |metro| async move {
///     metro.get_station("Gangnam".to_string()).await
/// })
/// .await?;
/// ```
///
/// # Errors
///
/// Returns the error of `open`, or the body error.
pub async fn single_session<S, O, F, Fut, R>(open: O, body: F) -> Result<R>
where
    S: Scope,
    O: FnOnce() -> Result<S>,
    F: FnOnce(Arc<S>) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let scope = open()?;
    scoped(scope, body).await
}

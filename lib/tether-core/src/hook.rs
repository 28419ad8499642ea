//! Before/after hooks and hook chains.
//!
//! A before-hook receives the working request and the rendered path and
//! returns a possibly modified pair. An after-hook receives the transport
//! response and returns a possibly transformed response. Both shapes compose,
//! so a chain of hooks behaves like a single hook.
//!
//! A [`HookChain`] moves through three states:
//!
//! ```text
//! Unset --set--> Single --add--> Multi
//!   |                              ^
//!   +------------add---------------+
//! ```
//!
//! Adding a hook to a `Single` chain keeps the original hook at index 0.
//! A `Multi` chain runs its hooks by ascending index; ties run in
//! registration order.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::working::WorkingRequest;
use crate::{Response, Result};

/// Future returned by hooks.
pub type HookFuture<T> = BoxFuture<'static, Result<T>>;

/// A hook that runs before the request is dispatched.
///
/// Implemented for every `Fn(WorkingRequest, String) -> impl Future` closure.
///
/// ```
/// use tether_core::{BeforeHook, Error, WorkingRequest};
///
/// fn assert_hook(_: impl BeforeHook) {}
///
/// assert_hook(|mut request: WorkingRequest, path: String| async move {
///     request.set_header("X-Trace", "1");
///     Ok::<_, Error>((request, path))
/// });
/// ```
pub trait BeforeHook: Send + Sync + 'static {
    /// Inspect or modify the request and rendered path.
    fn run(&self, request: WorkingRequest, path: String) -> HookFuture<(WorkingRequest, String)>;
}

impl<F, Fut> BeforeHook for F
where
    F: Fn(WorkingRequest, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(WorkingRequest, String)>> + Send + 'static,
{
    fn run(&self, request: WorkingRequest, path: String) -> HookFuture<(WorkingRequest, String)> {
        Box::pin(self(request, path))
    }
}

/// A hook that runs after the transport returned a response.
pub trait AfterHook: Send + Sync + 'static {
    /// Inspect or transform the response.
    fn run(&self, response: Response) -> HookFuture<Response>;
}

impl<F, Fut> AfterHook for F
where
    F: Fn(Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    fn run(&self, response: Response) -> HookFuture<Response> {
        Box::pin(self(response))
    }
}

/// The state of a [`HookChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookState {
    /// No hook.
    Unset,
    /// One hook set directly.
    Single,
    /// An ordered list of indexed hooks.
    Multi,
}

struct Entry<H: ?Sized> {
    index: i32,
    hook: Arc<H>,
}

enum Chain<H: ?Sized> {
    Unset,
    Single(Arc<H>),
    Multi(Vec<Entry<H>>),
}

/// An ordered chain of hooks of one kind.
pub struct HookChain<H: ?Sized> {
    chain: Chain<H>,
}

impl<H: ?Sized> Default for HookChain<H> {
    fn default() -> Self {
        Self {
            chain: Chain::Unset,
        }
    }
}

impl<H: ?Sized> Clone for HookChain<H> {
    fn clone(&self) -> Self {
        let chain = match &self.chain {
            Chain::Unset => Chain::Unset,
            Chain::Single(hook) => Chain::Single(Arc::clone(hook)),
            Chain::Multi(entries) => Chain::Multi(
                entries
                    .iter()
                    .map(|entry| Entry {
                        index: entry.index,
                        hook: Arc::clone(&entry.hook),
                    })
                    .collect(),
            ),
        };
        Self { chain }
    }
}

impl<H: ?Sized> fmt::Debug for HookChain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("HookChain");
        debug.field("state", &self.state());
        if let Chain::Multi(entries) = &self.chain {
            let indices: Vec<i32> = entries.iter().map(|entry| entry.index).collect();
            debug.field("indices", &indices);
        }
        debug.finish()
    }
}

impl<H: ?Sized> HookChain<H> {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> HookState {
        match self.chain {
            Chain::Unset => HookState::Unset,
            Chain::Single(_) => HookState::Single,
            Chain::Multi(_) => HookState::Multi,
        }
    }

    /// Set a single hook, replacing the whole chain.
    pub fn set(&mut self, hook: Arc<H>) {
        self.chain = Chain::Single(hook);
    }

    /// Add a hook with an ordering index (default 0).
    ///
    /// A single hook already set is kept as the entry with index 0.
    pub fn add(&mut self, hook: Arc<H>, index: Option<i32>) {
        let index = index.unwrap_or(0);
        let mut entries = match std::mem::replace(&mut self.chain, Chain::Unset) {
            Chain::Unset => Vec::new(),
            Chain::Single(original) => vec![Entry {
                index: 0,
                hook: original,
            }],
            Chain::Multi(entries) => entries,
        };
        let at = entries
            .iter()
            .position(|entry| entry.index > index)
            .unwrap_or(entries.len());
        entries.insert(at, Entry { index, hook });
        self.chain = Chain::Multi(entries);
    }

    /// Remove every hook.
    pub fn clear(&mut self) {
        self.chain = Chain::Unset;
    }

    /// Number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.chain {
            Chain::Unset => 0,
            Chain::Single(_) => 1,
            Chain::Multi(entries) => entries.len(),
        }
    }

    /// Returns `true` if the chain has no hook.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hooks in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<H>> {
        let (single, entries) = match &self.chain {
            Chain::Unset => (None, &[][..]),
            Chain::Single(hook) => (Some(hook), &[][..]),
            Chain::Multi(entries) => (None, entries.as_slice()),
        };
        single
            .into_iter()
            .chain(entries.iter().map(|entry| &entry.hook))
    }
}

impl HookChain<dyn BeforeHook> {
    /// Run every before-hook in order.
    ///
    /// The first error stops the chain.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing hook.
    pub async fn run(
        &self,
        mut request: WorkingRequest,
        mut path: String,
    ) -> Result<(WorkingRequest, String)> {
        for hook in self.iter() {
            (request, path) = hook.run(request, path).await?;
        }
        Ok((request, path))
    }
}

impl HookChain<dyn AfterHook> {
    /// Run every after-hook in order.
    ///
    /// The first error stops the chain.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing hook.
    pub async fn run(&self, mut response: Response) -> Result<Response> {
        for hook in self.iter() {
            response = hook.run(response).await?;
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::{Error, Method, PathTemplate};

    fn working() -> WorkingRequest {
        WorkingRequest::new("test", Method::Get, PathTemplate::new("/"))
    }

    fn recording(log: &Arc<Mutex<Vec<i32>>>, id: i32) -> Arc<dyn BeforeHook> {
        let log = Arc::clone(log);
        Arc::new(move |request: WorkingRequest, path: String| {
            let log = Arc::clone(&log);
            async move {
                log.lock().expect("lock").push(id);
                Ok::<_, Error>((request, path))
            }
        })
    }

    #[test]
    fn state_transitions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: HookChain<dyn BeforeHook> = HookChain::new();
        assert_eq!(chain.state(), HookState::Unset);
        assert!(chain.is_empty());

        chain.set(recording(&log, 1));
        assert_eq!(chain.state(), HookState::Single);

        chain.add(recording(&log, 2), None);
        assert_eq!(chain.state(), HookState::Multi);
        assert_eq!(chain.len(), 2);

        chain.set(recording(&log, 3));
        assert_eq!(chain.state(), HookState::Single);
        assert_eq!(chain.len(), 1);
    }

    #[tokio::test]
    async fn explicit_indices_run_ascending() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: HookChain<dyn BeforeHook> = HookChain::new();
        chain.add(recording(&log, 2), Some(2));
        chain.add(recording(&log, 0), Some(0));
        chain.add(recording(&log, 1), Some(1));

        chain.run(working(), "/".to_string()).await.expect("run");
        assert_eq!(*log.lock().expect("lock"), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn original_single_hook_is_index_zero() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: HookChain<dyn BeforeHook> = HookChain::new();
        chain.add(recording(&log, 10), Some(-1));
        chain.set(recording(&log, 20));
        chain.add(recording(&log, 30), None);
        chain.add(recording(&log, 40), Some(-5));

        chain.run(working(), "/".to_string()).await.expect("run");
        assert_eq!(*log.lock().expect("lock"), vec![40, 20, 30]);
    }

    #[tokio::test]
    async fn before_hooks_compose() {
        let mut chain: HookChain<dyn BeforeHook> = HookChain::new();
        chain.add(
            Arc::new(|mut request: WorkingRequest, path: String| async move {
                request.set_header("X-First", "1");
                Ok::<_, Error>((request, format!("{path}first/")))
            }),
            None,
        );
        chain.add(
            Arc::new(|mut request: WorkingRequest, path: String| async move {
                request.set_header("X-Second", "2");
                Ok::<_, Error>((request, format!("{path}second")))
            }),
            None,
        );

        let (request, path) = chain.run(working(), "/".to_string()).await.expect("run");
        assert_eq!(path, "/first/second");
        assert_eq!(request.header("X-First"), Some("1"));
        assert_eq!(request.header("X-Second"), Some("2"));
    }

    #[tokio::test]
    async fn failing_hook_stops_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: HookChain<dyn BeforeHook> = HookChain::new();
        chain.add(recording(&log, 0), Some(0));
        chain.add(
            Arc::new(|_: WorkingRequest, _: String| async move {
                Err::<(WorkingRequest, String), _>(Error::validation("refused"))
            }),
            Some(1),
        );
        chain.add(recording(&log, 2), Some(2));

        let err = chain
            .run(working(), "/".to_string())
            .await
            .expect_err("second hook fails");
        assert_eq!(err.to_string(), "model validation failed: refused");
        assert_eq!(*log.lock().expect("lock"), vec![0]);
    }

    #[tokio::test]
    async fn after_hooks_transform_response() {
        let mut chain: HookChain<dyn AfterHook> = HookChain::new();
        chain.set(Arc::new(|response: Response| async move {
            Ok::<_, Error>(response.map_body(|body| {
                Bytes::from(format!("{}!", String::from_utf8_lossy(&body)))
            }))
        }));

        let response = Response::new(200, HashMap::new(), Bytes::from("ok"));
        let response = chain.run(response).await.expect("run");
        assert_eq!(response.body().as_ref(), b"ok!");
    }
}

//! Sessions: the owner of the transport and the dispatch entrypoint.
//!
//! A [`Session`] combines an [`HttpTransport`] with a base URL, session-level
//! hooks and the session-level directly-respond flag. Calling an endpoint
//! through a session runs the whole pipeline:
//!
//! ```text
//! bind -> prepare -> session before-hooks -> endpoint before-hooks
//!      -> dispatch -> endpoint after-hooks -> session after-hooks
//!      -> Reply::Direct(response) | Reply::Handler(invocation)
//! ```
//!
//! Every failure is reported with the [`Stage`] it happened in, and the
//! session stays open: closing it is the job of the owner or of
//! [`scoped`](crate::scoped).

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{Instrument, debug, debug_span, trace, warn};
use url::Url;

use crate::{
    AfterHook, BeforeHook, BoundArguments, CallArguments, Error, HookChain, HttpTransport,
    HyperTransport, RequestDescriptor, Response, Result, SessionConfig, Stage, WorkingRequest,
};

/// The outcome of a call before the endpoint handler runs.
#[derive(Debug)]
pub enum Reply<R = Invocation> {
    /// Directly-respond mode: the response, the handler was not run.
    Direct(Response),
    /// The handler input or output.
    Handler(R),
}

impl<R> Reply<R> {
    /// Returns `true` for a direct response.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }

    /// The direct response, if any.
    #[must_use]
    pub fn into_direct(self) -> Option<Response> {
        match self {
            Self::Direct(response) => Some(response),
            Self::Handler(_) => None,
        }
    }

    /// The handler value, if any.
    #[must_use]
    pub fn into_handler(self) -> Option<R> {
        match self {
            Self::Direct(_) => None,
            Self::Handler(value) => Some(value),
        }
    }
}

/// What an endpoint handler receives: the bound arguments, with every
/// response slot filled, and the response itself.
#[derive(Debug, Clone)]
pub struct Invocation {
    arguments: BoundArguments,
    response: Response,
}

impl Invocation {
    /// Bound arguments, including response slots.
    #[must_use]
    pub const fn arguments(&self) -> &BoundArguments {
        &self.arguments
    }

    /// The response after every after-hook.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Take the response injected into a response slot.
    pub fn take_response(&mut self, slot: &str) -> Option<Response> {
        self.arguments.take_response(slot)
    }

    /// Split into arguments and response.
    #[must_use]
    pub fn into_parts(self) -> (BoundArguments, Response) {
        (self.arguments, self.response)
    }
}

/// Owns the transport and dispatches endpoint calls.
///
/// ```ignore
/// use tether::{CallArguments, RequestDescriptor, Session};
///
/// let session = Session::connect("https://metro.example.com")?;
/// let endpoint = RequestDescriptor::get("/metro/station")
///     .query_params(["name"])
///     .param(tether::Parameter::new("name"))
///     .build()?;
///
/// let response = session
///     .send(&endpoint, CallArguments::new().arg("Gangnam"))
///     .await?;
/// session.close().await;
/// ```
pub struct Session<T = HyperTransport> {
    transport: T,
    base_url: Url,
    directly_response: bool,
    before: HookChain<dyn BeforeHook>,
    after: HookChain<dyn AfterHook>,
    closed: AtomicBool,
}

impl<T> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("directly_response", &self.directly_response)
            .field("before", &self.before)
            .field("after", &self.after)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Session<HyperTransport> {
    /// A hyper-backed session built from configuration.
    #[must_use]
    pub fn open(config: &SessionConfig) -> Self {
        let transport = HyperTransport::with_config(config.transport.clone());
        Self::from_config(transport, config)
    }

    /// A hyper-backed session with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL cannot be parsed.
    pub fn connect(base_url: impl AsRef<str>) -> Result<Self> {
        SessionConfig::new(base_url).map(|config| Self::open(&config))
    }
}

impl<T> Session<T> {
    /// Create a session over a transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL cannot be parsed.
    pub fn new(transport: T, base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?;
        Ok(Self::with_url(transport, base_url))
    }

    /// Create a session with a pre-parsed URL.
    #[must_use]
    pub fn with_url(transport: T, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            directly_response: false,
            before: HookChain::new(),
            after: HookChain::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Create a session from configuration, using the given transport.
    #[must_use]
    pub fn from_config(transport: T, config: &SessionConfig) -> Self {
        Self::with_url(transport, config.base_url.clone())
            .with_directly_response(config.directly_response)
    }

    /// Set the session-level directly-respond flag.
    #[must_use]
    pub fn with_directly_response(mut self, directly_response: bool) -> Self {
        self.directly_response = directly_response;
        self
    }

    /// Change the session-level directly-respond flag.
    pub fn set_directly_response(&mut self, directly_response: bool) {
        self.directly_response = directly_response;
    }

    /// Session-level directly-respond flag.
    #[must_use]
    pub const fn directly_response(&self) -> bool {
        self.directly_response
    }

    /// Base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Set the session before-hook, replacing the chain.
    pub fn before_request(&mut self, hook: impl BeforeHook) {
        self.before.set(Arc::new(hook));
    }

    /// Add a session before-hook at an ordering index (default 0).
    pub fn add_before_request(&mut self, hook: impl BeforeHook, index: Option<i32>) {
        self.before.add(Arc::new(hook), index);
    }

    /// Set the session after-hook, replacing the chain.
    pub fn after_request(&mut self, hook: impl AfterHook) {
        self.after.set(Arc::new(hook));
    }

    /// Add a session after-hook at an ordering index (default 0).
    pub fn add_after_request(&mut self, hook: impl AfterHook, index: Option<i32>) {
        self.after.add(Arc::new(hook), index);
    }

    /// Session before-hooks.
    #[must_use]
    pub const fn before_hooks(&self) -> &HookChain<dyn BeforeHook> {
        &self.before
    }

    /// Session after-hooks.
    #[must_use]
    pub const fn after_hooks(&self) -> &HookChain<dyn AfterHook> {
        &self.after
    }

    /// Returns `true` once [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl<T: HttpTransport> Session<T> {
    /// Close the transport. Only the first call reaches the transport.
    pub async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(base_url = %self.base_url, "closing session");
            self.transport.close().await;
        }
    }

    /// Build the final request and send it through the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] after [`close`](Self::close), or the
    /// transport error unchanged.
    pub async fn dispatch(&self, request: WorkingRequest, path: &str) -> Result<Response> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        debug!(method = %request.method(), %path, "dispatching request");
        let request = request.into_request(&self.base_url, path)?;
        self.transport.send(request).await
    }

    /// Run the whole pipeline and return the final response, ignoring the
    /// directly-respond flags.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing stage; see [`Error::stage`].
    pub async fn send(
        &self,
        endpoint: &RequestDescriptor,
        arguments: CallArguments,
    ) -> Result<Response> {
        self.exchange(endpoint, arguments)
            .await
            .map(|(_, response)| response)
    }

    /// Run the pipeline up to the handler.
    ///
    /// Returns [`Reply::Direct`] when the endpoint or the session asks for
    /// direct responses, otherwise the [`Invocation`] for the handler.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing stage; see [`Error::stage`].
    pub async fn invoke(
        &self,
        endpoint: &RequestDescriptor,
        arguments: CallArguments,
    ) -> Result<Reply> {
        let (mut arguments, response) = self.exchange(endpoint, arguments).await?;
        if endpoint.directly_response() || self.directly_response {
            return Ok(Reply::Direct(response));
        }
        for slot in endpoint.registry().responses() {
            arguments.insert(slot.clone(), response.clone());
        }
        Ok(Reply::Handler(Invocation {
            arguments,
            response,
        }))
    }

    /// Run the pipeline, then the handler unless the call is direct.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing stage, or the handler error.
    pub async fn call<F, Fut, R>(
        &self,
        endpoint: &RequestDescriptor,
        arguments: CallArguments,
        handler: F,
    ) -> Result<Reply<R>>
    where
        F: FnOnce(Invocation) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        match self.invoke(endpoint, arguments).await? {
            Reply::Direct(response) => Ok(Reply::Direct(response)),
            Reply::Handler(invocation) => handler(invocation).await.map(Reply::Handler),
        }
    }

    async fn exchange(
        &self,
        endpoint: &RequestDescriptor,
        arguments: CallArguments,
    ) -> Result<(BoundArguments, Response)> {
        let span = debug_span!(
            "endpoint",
            name = endpoint.name(),
            method = %endpoint.method(),
        );
        async {
            let result = self.run_pipeline(endpoint, arguments).await;
            if let Err(err) = &result {
                let stage = err.stage().map(|stage| stage.to_string());
                warn!(stage = stage.as_deref().unwrap_or("-"), error = %err, "call failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_pipeline(
        &self,
        endpoint: &RequestDescriptor,
        arguments: CallArguments,
    ) -> Result<(BoundArguments, Response)> {
        let arguments = endpoint.bind(arguments)?;
        let (request, path) = endpoint.prepare(&arguments)?;

        let (request, path) = run_before(&self.before, request, path, "session").await?;
        let (request, path) = run_before(endpoint.before_hooks(), request, path, "endpoint").await?;

        let response = self.dispatch(request, &path).await?;

        let response = run_after(endpoint.after_hooks(), response, "endpoint").await?;
        let response = run_after(&self.after, response, "session").await?;

        Ok((arguments, response))
    }
}

async fn run_before(
    chain: &HookChain<dyn BeforeHook>,
    request: WorkingRequest,
    path: String,
    owner: &str,
) -> Result<(WorkingRequest, String)> {
    if chain.is_empty() {
        return Ok((request, path));
    }
    trace!(owner, hooks = chain.len(), "running before-hooks");
    chain
        .run(request, path)
        .await
        .map_err(|err| Error::hook(Stage::BeforeHook, err))
}

async fn run_after(
    chain: &HookChain<dyn AfterHook>,
    response: Response,
    owner: &str,
) -> Result<Response> {
    if chain.is_empty() {
        return Ok(response);
    }
    trace!(owner, hooks = chain.len(), "running after-hooks");
    chain
        .run(response)
        .await
        .map_err(|err| Error::hook(Stage::AfterHook, err))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::{BindingError, Parameter, Request, RoleMarker, TypeHint};

    #[derive(Default)]
    struct Recording {
        requests: Mutex<Vec<String>>,
        closed: Mutex<usize>,
    }

    impl HttpTransport for Recording {
        async fn send(&self, request: Request<Bytes>) -> Result<Response> {
            let url = request.url().to_string();
            self.requests.lock().expect("lock").push(url.clone());
            Ok(Response::new(200, HashMap::new(), Bytes::from(url)))
        }

        async fn close(&self) {
            *self.closed.lock().expect("lock") += 1;
        }
    }

    fn session() -> Session<Recording> {
        Session::new(Recording::default(), "http://metro.test/api/").expect("session")
    }

    fn station_endpoint() -> RequestDescriptor {
        station_endpoint_with(false)
    }

    fn station_endpoint_with(directly_response: bool) -> RequestDescriptor {
        RequestDescriptor::get("/metro/station")
            .param(Parameter::new("station_name").marker(RoleMarker::query().custom_name("name")))
            .param(Parameter::new("response").hint(TypeHint::Response))
            .directly_response(directly_response)
            .build()
            .expect("endpoint")
    }

    #[tokio::test]
    async fn invoke_injects_response_slots() {
        let session = session();
        let reply = session
            .invoke(&station_endpoint(), CallArguments::new().arg("Gangnam"))
            .await
            .expect("invoke");

        let mut invocation = reply.into_handler().expect("handler reply");
        let response = invocation.take_response("response").expect("response slot");
        assert_eq!(
            response.text().expect("text"),
            "http://metro.test/api/metro/station?name=Gangnam"
        );
    }

    #[tokio::test]
    async fn directly_response_is_endpoint_or_session() {
        let endpoint = station_endpoint();
        let session = session();

        let reply = session
            .invoke(&endpoint, CallArguments::new().arg("Gangnam"))
            .await
            .expect("invoke");
        assert!(!reply.is_direct());

        let reply = session
            .invoke(&station_endpoint_with(true), CallArguments::new().arg("Gangnam"))
            .await
            .expect("invoke");
        assert!(reply.is_direct());

        let session = session.with_directly_response(true);
        let reply = session
            .invoke(&endpoint, CallArguments::new().arg("Gangnam"))
            .await
            .expect("invoke");
        assert!(reply.is_direct());
    }

    #[tokio::test]
    async fn call_skips_handler_on_direct_reply() {
        let endpoint = station_endpoint_with(true);
        let session = session();

        let ran = AtomicBool::new(false);
        let reply = session
            .call(&endpoint, CallArguments::new().arg("Gangnam"), |_| async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await
            .expect("call");

        assert!(reply.is_direct());
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn binding_error_has_binding_stage() {
        let session = session();
        let err = session
            .send(&station_endpoint(), CallArguments::new())
            .await
            .expect_err("missing station name");

        assert_eq!(err.stage(), Some(Stage::Binding));
        assert!(matches!(
            err,
            Error::Binding(BindingError::MissingArgument { .. })
        ));
        assert!(session.transport().requests.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn closed_session_refuses_dispatch() {
        let session = session();
        session.close().await;
        session.close().await;
        assert!(session.is_closed());
        assert_eq!(*session.transport().closed.lock().expect("lock"), 1);

        let err = session
            .send(&station_endpoint(), CallArguments::new().arg("Gangnam"))
            .await
            .expect_err("closed");
        assert!(matches!(err, Error::SessionClosed));
        assert_eq!(err.stage(), Some(Stage::Transport));
    }
}

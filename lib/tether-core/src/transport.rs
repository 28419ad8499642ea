//! The HTTP transport contract.
//!
//! The core never touches the network itself: a [`Session`] hands every
//! fully-built [`Request`] to an [`HttpTransport`] and gets a fully-read
//! [`Response`] back. Connection pooling, TLS, timeouts and retries are the
//! transport's business.
//!
//! Implement [`HttpTransport`] directly for custom stacks or for tests:
//!
//! ```
//! use std::future::Future;
//!
//! use bytes::Bytes;
//! use tether_core::{HttpTransport, Request, Response, Result};
//!
//! struct Echo;
//!
//! impl HttpTransport for Echo {
//!     fn send(&self, request: Request<Bytes>) -> impl Future<Output = Result<Response<Bytes>>> + Send {
//!         let body = request.body().cloned().unwrap_or_default();
//!         async move { Ok(Response::new(200, Default::default(), body)) }
//!     }
//! }
//! ```
//!
//! [`Session`]: https://docs.rs/tether/latest/tether/struct.Session.html

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Executes HTTP requests for a session.
pub trait HttpTransport: Send + Sync {
    /// Send a request and read the whole response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn send(&self, request: Request<Bytes>) -> impl Future<Output = Result<Response<Bytes>>> + Send;

    /// Release the transport resources.
    ///
    /// Called once when the owning session closes. The default does nothing.
    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    fn send(&self, request: Request<Bytes>) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).send(request)
    }

    fn close(&self) -> impl Future<Output = ()> + Send {
        (**self).close()
    }
}

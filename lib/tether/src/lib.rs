//! Declarative request binding for async HTTP clients.
//!
//! Declare endpoints once, as an annotated trait or through
//! [`RequestDescriptor`] builders; every call binds its arguments to headers,
//! query parameters, path segments and body, runs the hook chains and
//! dispatches through a [`Session`].
//!
//! # Example
//!
//! ```ignore
//! use tether::prelude::*;
//!
//! #[derive(Debug, Clone, Deserialize)]
//! pub struct Station {
//!     name: String,
//!     line: u8,
//! }
//!
//! #[tether(url = "https://metro.example.com")]
//! pub trait Metro {
//!     #[get("/metro/station")]
//!     async fn get_station(&self, #[query(name = "name")] station_name: String) -> tether::Result<Station>;
//! }
//!
//! let metro = MetroClient::connect()?;
//! let station = metro.get_station("Gangnam".to_string()).await?;
//! metro.session().close().await;
//! ```

mod config;
mod connector;
pub mod extension;
pub mod middleware;
pub mod prelude;
mod scope;
mod session;
mod transport;

pub use config::{SessionConfig, SessionConfigBuilder, TransportConfig, TransportConfigBuilder};
pub use extension::{JsonModel, ModelValidator, decode, response_model};
pub use scope::{Scope, scoped, single_session};
pub use session::{Invocation, Reply, Session};
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use tether_core::{
    AfterHook, Argument, BeforeHook, BindingError, BodyGroup, BodyKind, BoundArguments,
    CallArguments, ComponentRegistry, DeclarationError, DescriptorBuilder, EndpointName, Error,
    ExplicitRoles, Form, HookChain, HookFuture, HookState, HttpTransport, IntoArgument, Method,
    NameTransform, Parameter, Part, PathTemplate, RawBodySlot, Request, RequestBody,
    RequestBuilder, RequestDescriptor, RequestOptions, Response, Result, Role, RoleMarker,
    Signature, Slot, Stage, TypeHint, WorkingRequest, classify, from_json, from_json_value,
    to_camel_case, to_json, to_pascal_case,
};

// Re-export http types for status codes and headers
pub use tether_core::{StatusCode, header};

// Re-export crates for macro-generated code
pub use bytes;
pub use serde_json;
pub use url;

// Re-export macros
pub use tether_macro::tether;

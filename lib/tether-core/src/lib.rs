//! Core types and traits for the tether declarative request-binding layer.
//!
//! This crate turns an endpoint declaration into a fully-specified HTTP
//! request, without touching the network:
//! - [`RoleMarker`], [`ExplicitRoles`] and [`classify`] - decide where each parameter goes
//! - [`NameTransform`] - derive wire names from parameter names
//! - [`ComponentRegistry`] - per-role wire-name storage and body exclusivity
//! - [`Signature`] and [`CallArguments`] - bind call-site arguments
//! - [`RequestDescriptor`] - the immutable per-endpoint template
//! - [`WorkingRequest`] - the per-call mutable copy
//! - [`HookChain`], [`BeforeHook`] and [`AfterHook`] - hooks around dispatch
//! - [`HttpTransport`] - the transport contract
//! - [`Request`], [`Response`], [`Form`] - HTTP values
//! - [`Error`] and [`Result`] - error handling
//! - [`StatusCode`] and [`header`] - re-exported from the `http` crate

mod argument;
mod body;
mod descriptor;
mod error;
mod hook;
mod method;
mod multipart;
mod name;
mod path_template;
mod registry;
mod request;
mod response;
mod role;
mod signature;
mod transport;
mod working;

pub use argument::{Argument, BoundArguments, CallArguments, IntoArgument};
pub use body::{BodyKind, RequestBody, from_json, from_json_value, to_json};
pub use descriptor::{DescriptorBuilder, RequestDescriptor};
pub use error::{BindingError, DeclarationError, Error, Result, Stage};
pub use hook::{AfterHook, BeforeHook, HookChain, HookFuture, HookState};
pub use method::Method;
pub use multipart::{Form, Part};
pub use name::{NameTransform, to_camel_case, to_pascal_case};
pub use path_template::PathTemplate;
pub use registry::{BodyGroup, ComponentRegistry, RawBodySlot, Slot};
pub use request::{Request, RequestBuilder, RequestParts};
pub use response::Response;
pub use role::{ExplicitRoles, Role, RoleMarker, classify};
pub use signature::{Parameter, Signature, TypeHint};
pub use transport::HttpTransport;
pub use working::{EndpointName, RequestOptions, WorkingRequest};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};

//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tether::prelude::*;
//! ```

pub use crate::{
    CallArguments, Error, Form, HttpTransport, HyperTransport, JsonModel, Method, Parameter, Part,
    Reply, RequestBody, RequestDescriptor, Response, Result, RoleMarker, Scope, Session,
    SessionConfig, StatusCode, TypeHint, WorkingRequest, header, response_model, scoped,
    single_session, tether,
};
pub use serde::{Deserialize, Serialize};

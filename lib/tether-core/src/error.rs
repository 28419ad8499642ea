//! Error types for tether.
//!
//! Errors come in three layers:
//! - [`DeclarationError`]: raised while an endpoint is declared, never during a call
//! - [`BindingError`]: raised per call while arguments are bound to the request
//! - [`Error`]: the crate-wide error which wraps both, plus hook and transport failures

use derive_more::{Display, Error, From};

use crate::registry::BodyGroup;
use crate::role::Role;

// ============================================================================
// Stage
// ============================================================================

/// The stage of an endpoint call that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Stage {
    /// Binding call arguments, filling the working request, rendering the path.
    #[display("binding")]
    Binding,
    /// Running the before-hook chain.
    #[display("before-hook")]
    BeforeHook,
    /// Dispatching through the transport.
    #[display("transport")]
    Transport,
    /// Running the after-hook chain.
    #[display("after-hook")]
    AfterHook,
}

// ============================================================================
// Declaration Errors
// ============================================================================

/// Programmer errors detected while an endpoint is declared.
///
/// These are raised once, when the descriptor is built, and must not be retried.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DeclarationError {
    /// Two body-producing groups were declared on the same endpoint.
    #[display("parameter `{parameter}` declares a {requested} body but a {existing} body is already declared")]
    ConflictingBodyRole {
        /// The parameter being registered.
        parameter: String,
        /// The body group it asked for.
        requested: BodyGroup,
        /// The body group already present.
        existing: BodyGroup,
    },

    /// Two parameters of the same role resolve to the same wire name.
    #[display("{role} wire name `{wire_name}` is used by both `{first}` and `{second}`")]
    DuplicateWireName {
        /// The role both parameters share.
        role: Role,
        /// The clashing wire name.
        wire_name: String,
        /// The parameter registered first.
        first: String,
        /// The parameter registered second.
        second: String,
    },

    /// A name transform was requested on a role that only accepts identity names.
    #[display("{role} parameter `{parameter}` does not support renaming")]
    UnsupportedTransform {
        /// The role that rejected the transform.
        role: Role,
        /// The parameter carrying the transform.
        parameter: String,
    },

    /// An explicit name list refers to a parameter that is not declared.
    #[display("`{name}` is listed as a {role} parameter but no such parameter is declared")]
    UnknownParameter {
        /// The role of the list.
        role: Role,
        /// The unknown parameter name.
        name: String,
    },

    /// The same parameter name is declared twice.
    #[display("parameter `{name}` is declared more than once")]
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
    },
}

// ============================================================================
// Binding Errors
// ============================================================================

/// Per-call errors raised while call arguments are bound to a request.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BindingError {
    /// A parameter without a default received no value.
    #[display("missing argument `{name}`")]
    MissingArgument {
        /// The parameter name.
        name: String,
    },

    /// A named argument does not match any declared parameter.
    #[display("unexpected argument `{name}`")]
    UnexpectedArgument {
        /// The argument name.
        name: String,
    },

    /// A parameter received both a positional and a named value.
    #[display("argument `{name}` given more than once")]
    DuplicateArgument {
        /// The parameter name.
        name: String,
    },

    /// More positional arguments than declared parameters.
    #[display("expected at most {expected} positional arguments, got {given}")]
    TooManyArguments {
        /// Number of declared parameters.
        expected: usize,
        /// Number of positional arguments supplied.
        given: usize,
    },

    /// A `{name}` placeholder of the path template has no bound value.
    #[display("missing value for path placeholder `{placeholder}`")]
    MissingPathArgument {
        /// The placeholder name.
        placeholder: String,
    },

    /// A raw body value does not match the declared body type.
    #[display("body parameter `{parameter}` expects {expected}, got {found}")]
    InvalidBodyType {
        /// The body parameter.
        parameter: String,
        /// What the declaration allows.
        expected: &'static str,
        /// What was supplied.
        found: &'static str,
    },

    /// A value cannot be placed where its role puts it.
    #[display("{role} parameter `{parameter}` cannot carry {found}")]
    UnsupportedValue {
        /// The parameter.
        parameter: String,
        /// Its role.
        role: Role,
        /// What was supplied.
        found: &'static str,
    },
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for tether operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Invalid endpoint declaration.
    #[display("declaration error: {_0}")]
    #[from]
    Declaration(DeclarationError),

    /// Call arguments could not be bound to the request.
    #[display("binding error: {_0}")]
    #[from]
    Binding(BindingError),

    /// A before- or after-hook failed; the remaining chain was skipped.
    #[display("{stage} failed: {source}")]
    #[from(skip)]
    Hook {
        /// Which hook chain failed.
        stage: Stage,
        /// The error returned by the hook.
        source: Box<Error>,
    },

    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The request could not be assembled by the transport.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// The session was closed before the call.
    #[display("session is closed")]
    #[from(skip)]
    SessionClosed,

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "station.line.id").
        path: String,
        /// Error message.
        message: String,
    },

    /// A response model rejected the payload.
    #[display("model validation failed: {_0}")]
    #[from(skip)]
    Validation(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error returned by a hook.
    #[must_use]
    pub fn hook(stage: Stage, source: Self) -> Self {
        Self::Hook {
            stage,
            source: Box::new(source),
        }
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a model validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The call stage this error belongs to.
    ///
    /// Declaration errors and decoding errors raised outside the hook chain
    /// have no stage.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Binding(_) | Self::JsonSerialization(_) => Some(Stage::Binding),
            Self::Hook { stage, .. } => Some(*stage),
            Self::Http { .. }
            | Self::Connection(_)
            | Self::Tls(_)
            | Self::Timeout
            | Self::InvalidRequest(_)
            | Self::SessionClosed
            | Self::InvalidUrl(_) => Some(Stage::Transport),
            Self::Declaration(_) | Self::JsonDeserialization { .. } | Self::Validation(_) => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

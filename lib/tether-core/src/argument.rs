//! Call-time argument values.
//!
//! The binder works on an untyped view of the caller's values: structured
//! data travels as [`serde_json::Value`], raw payloads as [`Bytes`], and the
//! two values that cannot be expressed as JSON ([`Form`] and [`Response`])
//! keep their own variants.

use bytes::Bytes;
use derive_more::From;
use serde_json::Value;

use crate::{Form, Response, Result};

/// One argument value.
#[derive(Debug, Clone, From)]
pub enum Argument {
    /// Any serde-serializable value.
    Json(Value),
    /// Raw bytes.
    Bytes(Bytes),
    /// A multipart form.
    Form(Form),
    /// A transport response, injected into response slots.
    Response(Response),
}

impl Argument {
    /// Serialize a value into an argument.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// The JSON `null` argument, used for absent optional values.
    #[must_use]
    pub const fn null() -> Self {
        Self::Json(Value::Null)
    }

    /// Returns `true` for JSON `null`.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// Short description of the value kind, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Json(Value::Null) => "null",
            Self::Json(Value::Bool(_)) => "a boolean",
            Self::Json(Value::Number(_)) => "a number",
            Self::Json(Value::String(_)) => "a string",
            Self::Json(Value::Array(_)) => "an array",
            Self::Json(Value::Object(_)) => "an object",
            Self::Bytes(_) => "bytes",
            Self::Form(_) => "a multipart form",
            Self::Response(_) => "a response",
        }
    }

    /// The JSON value, if this is a JSON argument.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The response, if this is a response argument.
    #[must_use]
    pub const fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

/// Text form of a scalar JSON value, `None` for `null`.
///
/// Strings are used verbatim; arrays and objects become JSON text.
pub(crate) fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Arguments supplied by a caller, before binding.
///
/// ```
/// use tether_core::CallArguments;
///
/// let args = CallArguments::new().arg("Gangnam").named("line", 2);
/// assert_eq!(args.positional().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallArguments {
    positional: Vec<Argument>,
    named: Vec<(String, Argument)>,
}

impl CallArguments {
    /// No arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl IntoArgument) -> Self {
        self.positional.push(value.into_argument());
        self
    }

    /// Add a named argument.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: impl IntoArgument) -> Self {
        self.named.push((name.into(), value.into_argument()));
        self
    }

    /// Positional arguments in call order.
    #[must_use]
    pub fn positional(&self) -> &[Argument] {
        &self.positional
    }

    /// Named arguments in call order.
    #[must_use]
    pub fn named_arguments(&self) -> &[(String, Argument)] {
        &self.named
    }

    pub(crate) fn into_parts(self) -> (Vec<Argument>, Vec<(String, Argument)>) {
        (self.positional, self.named)
    }
}

/// Conversion used by [`CallArguments`] builders.
///
/// Implemented for [`Argument`] itself and for the common scalar types, so
/// call sites can write `.arg("Gangnam")` or `.named("line", 2)`.
pub trait IntoArgument {
    /// Perform the conversion.
    fn into_argument(self) -> Argument;
}

impl IntoArgument for Argument {
    fn into_argument(self) -> Argument {
        self
    }
}

macro_rules! into_json_argument {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArgument for $ty {
                fn into_argument(self) -> Argument {
                    Argument::Json(Value::from(self))
                }
            }
        )*
    };
}

into_json_argument!(&str, String, bool, i32, i64, u32, u64, f64, Value);

impl IntoArgument for Bytes {
    fn into_argument(self) -> Argument {
        Argument::Bytes(self)
    }
}

impl IntoArgument for Form {
    fn into_argument(self) -> Argument {
        Argument::Form(self)
    }
}

impl<T: IntoArgument> IntoArgument for Option<T> {
    fn into_argument(self) -> Argument {
        self.map_or_else(Argument::null, IntoArgument::into_argument)
    }
}

/// Arguments bound to a signature, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct BoundArguments {
    values: Vec<(String, Argument)>,
}

impl BoundArguments {
    /// No bound arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value bound to a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Bind a value, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Argument>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    /// Builder form of [`BoundArguments::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.insert(name, value);
        self
    }

    /// Remove and return the value bound to a parameter.
    pub fn remove(&mut self, name: &str) -> Option<Argument> {
        let index = self.values.iter().position(|(n, _)| n == name)?;
        Some(self.values.remove(index).1)
    }

    /// Remove the response injected into a response slot.
    pub fn take_response(&mut self, name: &str) -> Option<Response> {
        let index = self
            .values
            .iter()
            .position(|(n, value)| n == name && matches!(value, Argument::Response(_)))?;
        match self.values.remove(index).1 {
            Argument::Response(response) => Some(response),
            _ => None,
        }
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.values.iter().map(|(n, value)| (n.as_str(), value))
    }

    /// Number of bound values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

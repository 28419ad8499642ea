//! Declared parameters and argument binding.

use crate::argument::{Argument, BoundArguments, CallArguments};
use crate::error::BindingError;
use crate::role::RoleMarker;

/// Coarse shape of a parameter's declared type.
///
/// The hint never decides the role on its own (except for
/// [`TypeHint::Response`]); it constrains how a raw body value is
/// serialized and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeHint {
    /// No constraint.
    #[default]
    Any,
    /// A string.
    Text,
    /// Raw bytes.
    Bytes,
    /// A list or map.
    Collection,
    /// A multipart form.
    Form,
    /// The transport response type.
    Response,
}

impl TypeHint {
    /// Description of the accepted values, used in error messages.
    #[must_use]
    pub const fn expectation(self) -> &'static str {
        match self {
            Self::Any => "any value",
            Self::Text => "a string",
            Self::Bytes => "bytes",
            Self::Collection => "an array or an object",
            Self::Form => "a multipart form",
            Self::Response => "a response",
        }
    }

    /// Returns `true` if the argument is acceptable for this hint.
    #[must_use]
    pub fn accepts(self, argument: &Argument) -> bool {
        use serde_json::Value;

        match (self, argument) {
            (_, Argument::Json(Value::Null)) => true,
            (Self::Any, Argument::Json(_) | Argument::Bytes(_) | Argument::Form(_))
            | (Self::Text, Argument::Json(Value::String(_)))
            | (Self::Bytes, Argument::Bytes(_))
            | (Self::Collection, Argument::Json(Value::Array(_) | Value::Object(_)))
            | (Self::Form, Argument::Form(_))
            | (Self::Response, Argument::Response(_)) => true,
            _ => false,
        }
    }
}

/// One declared parameter.
///
/// ```
/// use tether_core::{Parameter, RoleMarker, TypeHint};
///
/// let parameter = Parameter::new("station_name")
///     .hint(TypeHint::Text)
///     .marker(RoleMarker::query().custom_name("name"));
/// assert_eq!(parameter.name(), "station_name");
/// ```
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    hint: TypeHint,
    marker: Option<RoleMarker>,
    default: Option<Argument>,
}

impl Parameter {
    /// A required parameter with no type constraint and no marker.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: TypeHint::Any,
            marker: None,
            default: None,
        }
    }

    /// Set the type hint.
    #[must_use]
    pub const fn hint(mut self, hint: TypeHint) -> Self {
        self.hint = hint;
        self
    }

    /// Attach a role marker.
    #[must_use]
    pub fn marker(mut self, marker: RoleMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Give the parameter a default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Argument>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Make the parameter optional, defaulting to `null`.
    #[must_use]
    pub fn optional(self) -> Self {
        self.default_value(Argument::null())
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type hint.
    #[must_use]
    pub const fn type_hint(&self) -> TypeHint {
        self.hint
    }

    /// Attached role marker.
    #[must_use]
    pub const fn role_marker(&self) -> Option<&RoleMarker> {
        self.marker.as_ref()
    }

    /// Default value.
    #[must_use]
    pub const fn default_argument(&self) -> Option<&Argument> {
        self.default.as_ref()
    }
}

/// The caller-visible parameter list of an endpoint.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Create a signature.
    #[must_use]
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Bind call arguments.
    ///
    /// Positional arguments fill parameters in order, named arguments fill
    /// the parameter of the same name, and declared defaults fill the rest.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] when there are too many positional
    /// arguments, an unknown or repeated name, or a parameter without a
    /// value and without a default.
    pub fn bind(&self, arguments: CallArguments) -> Result<BoundArguments, BindingError> {
        let (positional, named) = arguments.into_parts();
        if positional.len() > self.parameters.len() {
            return Err(BindingError::TooManyArguments {
                expected: self.parameters.len(),
                given: positional.len(),
            });
        }

        let mut slots: Vec<Option<Argument>> = vec![None; self.parameters.len()];
        for (slot, value) in slots.iter_mut().zip(positional) {
            *slot = Some(value);
        }

        for (name, value) in named {
            let index = self
                .parameters
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| BindingError::UnexpectedArgument { name: name.clone() })?;
            let slot = slots
                .get_mut(index)
                .ok_or_else(|| BindingError::UnexpectedArgument { name: name.clone() })?;
            if slot.is_some() {
                return Err(BindingError::DuplicateArgument { name });
            }
            *slot = Some(value);
        }

        let mut bound = BoundArguments::new();
        for (parameter, slot) in self.parameters.iter().zip(slots) {
            let value = match slot.or_else(|| parameter.default.clone()) {
                Some(value) => value,
                None => {
                    return Err(BindingError::MissingArgument {
                        name: parameter.name.clone(),
                    });
                }
            };
            bound.insert(parameter.name.clone(), value);
        }
        Ok(bound)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn signature() -> Signature {
        Signature::new(vec![
            Parameter::new("station_name").hint(TypeHint::Text),
            Parameter::new("line").default_value(Argument::json(&2).expect("serialize")),
            Parameter::new("verbose").optional(),
        ])
    }

    fn json_of<'a>(bound: &'a BoundArguments, name: &str) -> &'a serde_json::Value {
        bound
            .get(name)
            .and_then(Argument::as_json)
            .expect("json argument")
    }

    #[test]
    fn bind_positional_and_defaults() {
        let bound = signature()
            .bind(CallArguments::new().arg("Gangnam"))
            .expect("bind");

        assert_eq!(json_of(&bound, "station_name"), &json!("Gangnam"));
        assert_eq!(json_of(&bound, "line"), &json!(2));
        assert!(bound.get("verbose").expect("bound").is_absent());
    }

    #[test]
    fn bind_named_overrides_default() {
        let bound = signature()
            .bind(CallArguments::new().named("line", 9).named("station_name", "Jamsil"))
            .expect("bind");

        assert_eq!(json_of(&bound, "line"), &json!(9));
        let names: Vec<_> = bound.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["station_name", "line", "verbose"]);
    }

    #[test]
    fn bind_missing_argument() {
        let err = signature()
            .bind(CallArguments::new())
            .expect_err("station_name has no default");
        assert_eq!(
            err,
            BindingError::MissingArgument {
                name: "station_name".to_string()
            }
        );
    }

    #[test]
    fn bind_unexpected_and_duplicate() {
        let err = signature()
            .bind(CallArguments::new().arg("a").named("color", "red"))
            .expect_err("unknown name");
        assert_eq!(
            err,
            BindingError::UnexpectedArgument {
                name: "color".to_string()
            }
        );

        let err = signature()
            .bind(CallArguments::new().arg("a").named("station_name", "b"))
            .expect_err("given twice");
        assert_eq!(
            err,
            BindingError::DuplicateArgument {
                name: "station_name".to_string()
            }
        );
    }

    #[test]
    fn bind_too_many_positional() {
        let err = signature()
            .bind(CallArguments::new().arg("a").arg(1).arg(true).arg("extra"))
            .expect_err("four positional for three parameters");
        assert_eq!(
            err,
            BindingError::TooManyArguments {
                expected: 3,
                given: 4
            }
        );
    }

    #[test]
    fn hint_accepts() {
        assert!(TypeHint::Any.accepts(&Argument::from("x")));
        assert!(TypeHint::Collection.accepts(&Argument::Json(json!([1, 2]))));
        assert!(!TypeHint::Collection.accepts(&Argument::from("x")));
        assert!(TypeHint::Form.accepts(&Argument::Form(crate::Form::new())));
        assert!(!TypeHint::Form.accepts(&Argument::Json(json!({"a": 1}))));
        assert!(TypeHint::Bytes.accepts(&Argument::null()));
    }
}

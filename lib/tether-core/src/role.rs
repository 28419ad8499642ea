//! Parameter roles and the role classifier.
//!
//! Each declared parameter ends up with exactly one [`Role`]. The classifier
//! tries, in order:
//! 1. an explicit [`RoleMarker`] attached to the parameter
//! 2. the endpoint-level name lists ([`ExplicitRoles`])
//! 3. the transport response type ([`TypeHint::Response`])
//! 4. otherwise [`Role::None`]

use derive_more::Display;

use crate::name::NameTransform;
use crate::signature::{Parameter, TypeHint};

/// Where a parameter's value goes in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Role {
    /// HTTP header.
    #[display("header")]
    Header,
    /// Query-string parameter.
    #[display("query")]
    Query,
    /// `{name}` placeholder of the path template.
    #[display("path")]
    Path,
    /// Field of a multipart form body.
    #[display("form")]
    FormField,
    /// Field of a JSON object body.
    #[display("JSON body")]
    BodyJson,
    /// The whole body, sent as-is.
    #[display("body")]
    RawBody,
    /// Receives the transport response instead of a caller value.
    #[display("response")]
    ResponseSlot,
    /// Plain argument, not part of the request.
    #[display("plain")]
    None,
}

impl Role {
    /// Returns `true` if the role only accepts the identity name transform.
    #[must_use]
    pub const fn requires_identity(self) -> bool {
        matches!(self, Self::Path | Self::RawBody)
    }

    /// Returns `true` if the caller supplies a value for this role.
    #[must_use]
    pub const fn is_caller_supplied(self) -> bool {
        !matches!(self, Self::ResponseSlot)
    }
}

/// An explicit role annotation attached to a parameter.
///
/// ```
/// use tether_core::{Role, RoleMarker};
///
/// let marker = RoleMarker::query().custom_name("name");
/// assert_eq!(marker.role(), Role::Query);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleMarker {
    role: Role,
    transform: NameTransform,
}

impl RoleMarker {
    /// Marker for the given role with the identity transform.
    #[must_use]
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            transform: NameTransform::Identity,
        }
    }

    /// Header marker.
    #[must_use]
    pub const fn header() -> Self {
        Self::new(Role::Header)
    }

    /// Query marker.
    #[must_use]
    pub const fn query() -> Self {
        Self::new(Role::Query)
    }

    /// Path marker.
    #[must_use]
    pub const fn path() -> Self {
        Self::new(Role::Path)
    }

    /// Multipart form field marker.
    #[must_use]
    pub const fn form() -> Self {
        Self::new(Role::FormField)
    }

    /// JSON body field marker.
    #[must_use]
    pub const fn body_json() -> Self {
        Self::new(Role::BodyJson)
    }

    /// Raw body marker.
    #[must_use]
    pub const fn body() -> Self {
        Self::new(Role::RawBody)
    }

    /// Response slot marker.
    #[must_use]
    pub const fn response() -> Self {
        Self::new(Role::ResponseSlot)
    }

    /// Use an explicit wire name.
    #[must_use]
    pub fn custom_name(self, name: impl Into<String>) -> Self {
        self.with_transform(NameTransform::Custom(name.into()))
    }

    /// Derive the wire name in `camelCase`.
    #[must_use]
    pub fn to_camel(self) -> Self {
        self.with_transform(NameTransform::CamelCase)
    }

    /// Derive the wire name in `PascalCase`.
    #[must_use]
    pub fn to_pascal(self) -> Self {
        self.with_transform(NameTransform::PascalCase)
    }

    /// Replace the name transform.
    #[must_use]
    pub fn with_transform(mut self, transform: NameTransform) -> Self {
        self.transform = transform;
        self
    }

    /// The marked role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The name transform.
    #[must_use]
    pub const fn transform(&self) -> &NameTransform {
        &self.transform
    }
}

/// Endpoint-level parameter name lists, one per role.
///
/// These play the part of "these parameter names are headers" declarations
/// made on the endpoint rather than on each parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitRoles {
    pub(crate) headers: Vec<String>,
    pub(crate) queries: Vec<String>,
    pub(crate) paths: Vec<String>,
    pub(crate) form_fields: Vec<String>,
    pub(crate) body_json: Vec<String>,
    pub(crate) body: Option<String>,
    pub(crate) responses: Vec<String>,
}

impl ExplicitRoles {
    /// The role implied by the lists for a parameter name, if any.
    ///
    /// Lists are checked in the order header, query, path, form,
    /// JSON body, raw body, response.
    #[must_use]
    pub fn role_of(&self, name: &str) -> Option<Role> {
        let listed = |names: &[String]| names.iter().any(|n| n == name);
        if listed(&self.headers) {
            Some(Role::Header)
        } else if listed(&self.queries) {
            Some(Role::Query)
        } else if listed(&self.paths) {
            Some(Role::Path)
        } else if listed(&self.form_fields) {
            Some(Role::FormField)
        } else if listed(&self.body_json) {
            Some(Role::BodyJson)
        } else if self.body.as_deref() == Some(name) {
            Some(Role::RawBody)
        } else if listed(&self.responses) {
            Some(Role::ResponseSlot)
        } else {
            None
        }
    }

    /// Every `(role, name)` pair mentioned by the lists.
    pub fn entries(&self) -> impl Iterator<Item = (Role, &str)> {
        fn list(role: Role, names: &[String]) -> impl Iterator<Item = (Role, &str)> {
            names.iter().map(move |n| (role, n.as_str()))
        }

        list(Role::Header, &self.headers)
            .chain(list(Role::Query, &self.queries))
            .chain(list(Role::Path, &self.paths))
            .chain(list(Role::FormField, &self.form_fields))
            .chain(list(Role::BodyJson, &self.body_json))
            .chain(self.body.iter().map(|n| (Role::RawBody, n.as_str())))
            .chain(list(Role::ResponseSlot, &self.responses))
    }
}

/// Classify one parameter.
///
/// Returns the role together with the name transform to apply. Only an
/// explicit marker can carry a non-identity transform.
#[must_use]
pub fn classify(parameter: &Parameter, lists: &ExplicitRoles) -> (Role, NameTransform) {
    if let Some(marker) = parameter.role_marker() {
        return (marker.role(), marker.transform().clone());
    }
    if let Some(role) = lists.role_of(parameter.name()) {
        return (role, NameTransform::Identity);
    }
    if parameter.type_hint() == TypeHint::Response {
        return (Role::ResponseSlot, NameTransform::Identity);
    }
    (Role::None, NameTransform::Identity)
}

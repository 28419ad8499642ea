//! Per-endpoint component registry.
//!
//! The registry stores, for each role, the ordered mapping from wire name to
//! the declared parameter. It enforces the declaration-time invariants:
//! unique wire names per role, identity names for path and raw body
//! parameters, and a single body-producing group per endpoint.

use derive_more::Display;

use crate::body::BodyKind;
use crate::error::DeclarationError;
use crate::name::NameTransform;
use crate::role::Role;
use crate::signature::TypeHint;

/// A registered parameter and its wire name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    wire_name: String,
    parameter: String,
}

impl Slot {
    /// The key used on the wire.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// The declared parameter name.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }
}

/// The raw body parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBodySlot {
    parameter: String,
    hint: TypeHint,
}

impl RawBodySlot {
    /// The declared parameter name.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Its declared type hint.
    #[must_use]
    pub const fn hint(&self) -> TypeHint {
        self.hint
    }
}

/// The three mutually exclusive body-producing groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BodyGroup {
    /// Multipart form fields.
    #[display("multipart form")]
    Form,
    /// JSON object fields.
    #[display("JSON")]
    Json,
    /// A single raw body parameter.
    #[display("raw")]
    Raw,
}

impl BodyGroup {
    const fn of(role: Role) -> Option<Self> {
        match role {
            Role::FormField => Some(Self::Form),
            Role::BodyJson => Some(Self::Json),
            Role::RawBody => Some(Self::Raw),
            _ => None,
        }
    }
}

/// Ordered role mappings for one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRegistry {
    headers: Vec<Slot>,
    queries: Vec<Slot>,
    paths: Vec<Slot>,
    form_fields: Vec<Slot>,
    body_json: Vec<Slot>,
    raw_body: Option<RawBodySlot>,
    responses: Vec<String>,
}

impl ComponentRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a classified parameter and return its wire name.
    ///
    /// Plain ([`Role::None`]) parameters are not stored; their name is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`DeclarationError::UnsupportedTransform`] for a renamed path or raw body parameter
    /// - [`DeclarationError::ConflictingBodyRole`] when body groups are mixed or a second raw
    ///   body is declared
    /// - [`DeclarationError::DuplicateWireName`] when the wire name is already taken in that role
    pub fn register(
        &mut self,
        parameter: &str,
        hint: TypeHint,
        role: Role,
        transform: &NameTransform,
    ) -> Result<String, DeclarationError> {
        if role.requires_identity() && !transform.is_identity() {
            return Err(DeclarationError::UnsupportedTransform {
                role,
                parameter: parameter.to_string(),
            });
        }

        if let Some(requested) = BodyGroup::of(role)
            && let Some(existing) = self.body_group()
            && (requested != existing || requested == BodyGroup::Raw)
        {
            return Err(DeclarationError::ConflictingBodyRole {
                parameter: parameter.to_string(),
                requested,
                existing,
            });
        }

        let wire_name = transform.apply(parameter);
        let slots = match role {
            Role::Header => &mut self.headers,
            Role::Query => &mut self.queries,
            Role::Path => &mut self.paths,
            Role::FormField => &mut self.form_fields,
            Role::BodyJson => &mut self.body_json,
            Role::RawBody => {
                self.raw_body = Some(RawBodySlot {
                    parameter: parameter.to_string(),
                    hint,
                });
                return Ok(wire_name);
            }
            Role::ResponseSlot => {
                self.responses.push(parameter.to_string());
                return Ok(wire_name);
            }
            Role::None => return Ok(wire_name),
        };

        if let Some(first) = slots.iter().find(|slot| slot.wire_name == wire_name) {
            return Err(DeclarationError::DuplicateWireName {
                role,
                wire_name,
                first: first.parameter.clone(),
                second: parameter.to_string(),
            });
        }
        slots.push(Slot {
            wire_name: wire_name.clone(),
            parameter: parameter.to_string(),
        });
        Ok(wire_name)
    }

    /// Slots registered for a role, in registration order.
    ///
    /// Raw body, response and plain roles have no slots.
    #[must_use]
    pub fn slots(&self, role: Role) -> &[Slot] {
        match role {
            Role::Header => &self.headers,
            Role::Query => &self.queries,
            Role::Path => &self.paths,
            Role::FormField => &self.form_fields,
            Role::BodyJson => &self.body_json,
            Role::RawBody | Role::ResponseSlot | Role::None => &[],
        }
    }

    /// The raw body parameter, if declared.
    #[must_use]
    pub const fn raw_body(&self) -> Option<&RawBodySlot> {
        self.raw_body.as_ref()
    }

    /// Response slot parameter names.
    #[must_use]
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// The body group in use, if any.
    #[must_use]
    pub fn body_group(&self) -> Option<BodyGroup> {
        if !self.form_fields.is_empty() {
            Some(BodyGroup::Form)
        } else if !self.body_json.is_empty() {
            Some(BodyGroup::Json)
        } else if self.raw_body.is_some() {
            Some(BodyGroup::Raw)
        } else {
            None
        }
    }

    /// The body kind derived from the registered parameters.
    ///
    /// A raw body is multipart when declared as a form, binary when declared
    /// as bytes, and JSON otherwise.
    #[must_use]
    pub fn body_kind(&self) -> BodyKind {
        match (self.body_group(), &self.raw_body) {
            (None, _) => BodyKind::None,
            (Some(BodyGroup::Form), _) => BodyKind::Multipart,
            (Some(BodyGroup::Json), _) => BodyKind::Json,
            (Some(BodyGroup::Raw), Some(raw)) => match raw.hint {
                TypeHint::Form => BodyKind::Multipart,
                TypeHint::Bytes => BodyKind::Binary,
                _ => BodyKind::Json,
            },
            (Some(BodyGroup::Raw), None) => BodyKind::None,
        }
    }
}

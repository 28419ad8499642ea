//! Request descriptors.
//!
//! A [`RequestDescriptor`] is the immutable template of one endpoint: method,
//! path template, classified parameters, static defaults and hook chains.
//! It is built once, at declaration time, by [`DescriptorBuilder::build`],
//! which runs the role classifier over every parameter and fails fast on
//! conflicting or duplicate declarations.
//!
//! Every call then clones a [`WorkingRequest`] from the template, so
//! concurrent calls to the same endpoint never share mutable state.
//!
//! # Example
//!
//! ```
//! use tether_core::{BoundArguments, Parameter, RequestDescriptor, RoleMarker};
//!
//! let endpoint = RequestDescriptor::get("/metro/station")
//!     .param(Parameter::new("station_name").marker(RoleMarker::query().custom_name("name")))
//!     .build()
//!     .expect("valid declaration");
//!
//! let arguments = BoundArguments::new().with("station_name", "Gangnam");
//! let (request, path) = endpoint.prepare(&arguments).expect("bind");
//! assert_eq!(path, "/metro/station");
//! assert_eq!(request.query_value("name"), Some("Gangnam"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::argument::{Argument, BoundArguments, CallArguments, json_text};
use crate::body::{BodyKind, RequestBody};
use crate::error::{BindingError, DeclarationError};
use crate::hook::{AfterHook, BeforeHook, HookChain};
use crate::path_template::PathTemplate;
use crate::registry::{BodyGroup, ComponentRegistry};
use crate::role::{ExplicitRoles, Role, classify};
use crate::signature::{Parameter, Signature};
use crate::working::{RequestOptions, WorkingRequest};
use crate::Method;

/// The immutable template of one endpoint.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    template: WorkingRequest,
    signature: Signature,
    registry: ComponentRegistry,
    directly_response: bool,
    before: HookChain<dyn BeforeHook>,
    after: HookChain<dyn AfterHook>,
}

impl RequestDescriptor {
    /// Start declaring an endpoint.
    #[must_use]
    pub fn builder(method: Method, path: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(method, path)
    }

    /// Start declaring a `GET` endpoint.
    #[must_use]
    pub fn get(path: impl Into<String>) -> DescriptorBuilder {
        Self::builder(Method::Get, path)
    }

    /// Start declaring a `POST` endpoint.
    #[must_use]
    pub fn post(path: impl Into<String>) -> DescriptorBuilder {
        Self::builder(Method::Post, path)
    }

    /// Start declaring a `PUT` endpoint.
    #[must_use]
    pub fn put(path: impl Into<String>) -> DescriptorBuilder {
        Self::builder(Method::Put, path)
    }

    /// Start declaring a `DELETE` endpoint.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> DescriptorBuilder {
        Self::builder(Method::Delete, path)
    }

    /// Start declaring a `PATCH` endpoint.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> DescriptorBuilder {
        Self::builder(Method::Patch, path)
    }

    /// Start declaring an `OPTIONS` endpoint.
    #[must_use]
    pub fn options(path: impl Into<String>) -> DescriptorBuilder {
        Self::builder(Method::Options, path)
    }

    /// Endpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.template.endpoint()
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.template.method()
    }

    /// Path template.
    #[must_use]
    pub const fn path_template(&self) -> &PathTemplate {
        self.template.template()
    }

    /// Caller-visible signature; response slots are not part of it.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The component registry.
    #[must_use]
    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The body kind this endpoint produces.
    #[must_use]
    pub fn body_kind(&self) -> BodyKind {
        match self.registry.body_kind() {
            BodyKind::None => self.template.body().map_or(BodyKind::None, RequestBody::kind),
            kind => kind,
        }
    }

    /// Whether the transport response is returned without running the handler.
    #[must_use]
    pub const fn directly_response(&self) -> bool {
        self.directly_response
    }

    /// Transport options of this endpoint.
    #[must_use]
    pub const fn request_options(&self) -> &RequestOptions {
        self.template.options()
    }

    /// The before-hook chain.
    #[must_use]
    pub const fn before_hooks(&self) -> &HookChain<dyn BeforeHook> {
        &self.before
    }

    /// The after-hook chain.
    #[must_use]
    pub const fn after_hooks(&self) -> &HookChain<dyn AfterHook> {
        &self.after
    }

    /// Set the before-hook, replacing the chain.
    pub fn before_hook(&mut self, hook: impl BeforeHook) {
        self.before.set(Arc::new(hook));
    }

    /// Add a before-hook at an ordering index (default 0).
    pub fn add_before_hook(&mut self, hook: impl BeforeHook, index: Option<i32>) {
        self.before.add(Arc::new(hook), index);
    }

    /// Set the after-hook, replacing the chain.
    pub fn after_hook(&mut self, hook: impl AfterHook) {
        self.after.set(Arc::new(hook));
    }

    /// Add an after-hook at an ordering index (default 0).
    pub fn add_after_hook(&mut self, hook: impl AfterHook, index: Option<i32>) {
        self.after.add(Arc::new(hook), index);
    }

    /// A fresh working copy carrying the static defaults.
    #[must_use]
    pub fn instantiate(&self) -> WorkingRequest {
        self.template.clone()
    }

    /// Bind call arguments against the visible signature.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] when the arguments do not match the signature.
    pub fn bind(&self, arguments: CallArguments) -> Result<BoundArguments, BindingError> {
        self.signature.bind(arguments)
    }

    /// Render the path template from the path-role arguments.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingPathArgument`] when a placeholder has no
    /// bound path value, or [`BindingError::UnsupportedValue`] when a value
    /// cannot be written in a path.
    pub fn render_path(&self, arguments: &BoundArguments) -> Result<String, BindingError> {
        let mut values = HashMap::new();
        for slot in self.registry.slots(Role::Path) {
            let Some(argument) = arguments.get(slot.parameter()) else {
                continue;
            };
            let text = match argument {
                Argument::Json(value) => json_text(value),
                Argument::Bytes(bytes) => std::str::from_utf8(bytes).ok().map(str::to_string),
                Argument::Form(_) | Argument::Response(_) => None,
            };
            match text {
                Some(text) => {
                    values.insert(slot.wire_name(), text);
                }
                None if argument.is_absent() => {}
                None => {
                    return Err(BindingError::UnsupportedValue {
                        parameter: slot.parameter().to_string(),
                        role: Role::Path,
                        found: argument.kind_name(),
                    });
                }
            }
        }
        self.path_template()
            .render(|placeholder| values.get(placeholder).cloned())
    }

    /// Clone the template, fill it and render the path.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] when filling or rendering fails.
    pub fn prepare(
        &self,
        arguments: &BoundArguments,
    ) -> Result<(WorkingRequest, String), BindingError> {
        let mut request = self.instantiate();
        request.fill(&self.registry, arguments)?;
        let path = self.render_path(arguments)?;
        Ok((request, path))
    }
}

/// Declares a [`RequestDescriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    method: Method,
    path: String,
    name: Option<String>,
    parameters: Vec<Parameter>,
    roles: ExplicitRoles,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    directly_response: bool,
    options: RequestOptions,
}

impl DescriptorBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            name: None,
            parameters: Vec::new(),
            roles: ExplicitRoles::default(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            directly_response: false,
            options: RequestOptions::default(),
        }
    }

    /// Endpoint name; defaults to `"<METHOD> <path>"`.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare a parameter.
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Declare several parameters.
    #[must_use]
    pub fn params(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Parameter names carried as headers.
    #[must_use]
    pub fn header_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.headers.extend(names.into_iter().map(Into::into));
        self
    }

    /// Parameter names carried as query parameters.
    #[must_use]
    pub fn query_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.queries.extend(names.into_iter().map(Into::into));
        self
    }

    /// Parameter names substituted into the path.
    #[must_use]
    pub fn path_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.paths.extend(names.into_iter().map(Into::into));
        self
    }

    /// Parameter names sent as multipart form fields.
    #[must_use]
    pub fn form_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.form_fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Parameter names sent as JSON body fields.
    #[must_use]
    pub fn body_json_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.body_json.extend(names.into_iter().map(Into::into));
        self
    }

    /// The parameter sent as the whole body.
    #[must_use]
    pub fn body_param(mut self, name: impl Into<String>) -> Self {
        self.roles.body = Some(name.into());
        self
    }

    /// Parameter names receiving the transport response.
    #[must_use]
    pub fn response_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.responses.extend(names.into_iter().map(Into::into));
        self
    }

    /// A header sent with every call.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// A query parameter sent with every call.
    #[must_use]
    pub fn default_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// A body sent with every call.
    #[must_use]
    pub fn default_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Return the transport response without running the handler.
    #[must_use]
    pub const fn directly_response(mut self, directly_response: bool) -> Self {
        self.directly_response = directly_response;
        self
    }

    /// Timeout for this endpoint.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Classify every parameter and build the descriptor.
    ///
    /// # Errors
    ///
    /// Returns a [`DeclarationError`] for duplicate parameters, unknown
    /// names in the role lists, conflicting body roles, duplicate wire names
    /// or a rename on a path or raw body parameter.
    pub fn build(self) -> Result<RequestDescriptor, DeclarationError> {
        for (i, parameter) in self.parameters.iter().enumerate() {
            let repeated = self
                .parameters
                .iter()
                .skip(i + 1)
                .any(|other| other.name() == parameter.name());
            if repeated {
                return Err(DeclarationError::DuplicateParameter {
                    name: parameter.name().to_string(),
                });
            }
        }

        for (role, name) in self.roles.entries() {
            if !self.parameters.iter().any(|p| p.name() == name) {
                return Err(DeclarationError::UnknownParameter {
                    role,
                    name: name.to_string(),
                });
            }
        }

        let mut registry = ComponentRegistry::new();
        let mut visible = Vec::with_capacity(self.parameters.len());
        for parameter in self.parameters {
            let (role, transform) = classify(&parameter, &self.roles);
            registry.register(parameter.name(), parameter.type_hint(), role, &transform)?;
            if role.is_caller_supplied() {
                visible.push(parameter);
            }
        }

        if let Some(body) = &self.body {
            check_static_body(body, &registry)?;
        }

        let name = self
            .name
            .unwrap_or_else(|| format!("{} {}", self.method, self.path));
        let mut template = WorkingRequest::new(name, self.method, PathTemplate::new(self.path));
        for (key, value) in self.headers {
            template.set_header(key, value);
        }
        for (key, value) in self.query {
            template.set_query(key, value);
        }
        template.set_body(self.body);
        template.set_options(self.options);

        Ok(RequestDescriptor {
            template,
            signature: Signature::new(visible),
            registry,
            directly_response: self.directly_response,
            before: HookChain::new(),
            after: HookChain::new(),
        })
    }
}

/// A static body may only be extended by the field group of the same kind.
fn check_static_body(
    body: &RequestBody,
    registry: &ComponentRegistry,
) -> Result<(), DeclarationError> {
    let existing = match body {
        RequestBody::Json(_) => BodyGroup::Json,
        RequestBody::Multipart(_) => BodyGroup::Form,
        RequestBody::Binary(_) => BodyGroup::Raw,
    };
    let conflict = |parameter: &str, requested: BodyGroup| DeclarationError::ConflictingBodyRole {
        parameter: parameter.to_string(),
        requested,
        existing,
    };

    if let Some(raw) = registry.raw_body() {
        return Err(conflict(raw.parameter(), BodyGroup::Raw));
    }
    if let Some(slot) = registry.slots(Role::FormField).first()
        && !matches!(body, RequestBody::Multipart(_))
    {
        return Err(conflict(slot.parameter(), BodyGroup::Form));
    }
    if let Some(slot) = registry.slots(Role::BodyJson).first()
        && !matches!(body, RequestBody::Json(Value::Object(_)))
    {
        return Err(conflict(slot.parameter(), BodyGroup::Json));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{Form, NameTransform, RoleMarker, TypeHint};

    #[test]
    fn metro_station_query_uses_custom_name() {
        let endpoint = RequestDescriptor::get("/metro/station")
            .param(
                Parameter::new("station_name")
                    .hint(TypeHint::Text)
                    .marker(RoleMarker::query().custom_name("name")),
            )
            .build()
            .expect("build");

        let arguments = endpoint
            .bind(CallArguments::new().named("station_name", "Gangnam"))
            .expect("bind");
        let (request, path) = endpoint.prepare(&arguments).expect("prepare");

        assert_eq!(path, "/metro/station");
        assert_eq!(request.query(), [("name".to_string(), "Gangnam".to_string())]);
        assert_eq!(endpoint.name(), "GET /metro/station");
    }

    #[test]
    fn explicit_lists_classify_parameters() {
        let endpoint = RequestDescriptor::post("/lines/{line}/stations")
            .name("create_station")
            .params([
                Parameter::new("line"),
                Parameter::new("token"),
                Parameter::new("name"),
                Parameter::new("opened"),
                Parameter::new("response").hint(TypeHint::Response),
            ])
            .path_params(["line"])
            .header_params(["token"])
            .body_json_params(["name", "opened"])
            .build()
            .expect("build");

        assert_eq!(endpoint.body_kind(), BodyKind::Json);
        assert_eq!(endpoint.registry().responses(), ["response".to_string()]);
        let visible: Vec<_> = endpoint
            .signature()
            .parameters()
            .iter()
            .map(Parameter::name)
            .collect();
        assert_eq!(visible, vec!["line", "token", "name", "opened"]);

        let arguments = endpoint
            .bind(
                CallArguments::new()
                    .arg(2)
                    .arg("secret")
                    .arg("Gangnam")
                    .arg(1982),
            )
            .expect("bind");
        let (request, path) = endpoint.prepare(&arguments).expect("prepare");

        assert_eq!(path, "/lines/2/stations");
        assert_eq!(request.header("token"), Some("secret"));
        assert_eq!(
            request.body(),
            Some(&RequestBody::Json(json!({"name": "Gangnam", "opened": 1982})))
        );
    }

    #[test]
    fn conflicting_body_roles_fail_at_declaration() {
        let err = RequestDescriptor::post("/upload")
            .param(Parameter::new("name").marker(RoleMarker::form()))
            .param(Parameter::new("payload"))
            .body_param("payload")
            .build()
            .expect_err("form field and raw body");
        assert_eq!(
            err,
            DeclarationError::ConflictingBodyRole {
                parameter: "payload".to_string(),
                requested: BodyGroup::Raw,
                existing: BodyGroup::Form,
            }
        );
    }

    #[test]
    fn unknown_and_duplicate_parameters() {
        let err = RequestDescriptor::get("/")
            .param(Parameter::new("a"))
            .query_params(["b"])
            .build()
            .expect_err("unknown list entry");
        assert_eq!(
            err,
            DeclarationError::UnknownParameter {
                role: Role::Query,
                name: "b".to_string()
            }
        );

        let err = RequestDescriptor::get("/")
            .param(Parameter::new("a"))
            .param(Parameter::new("a"))
            .build()
            .expect_err("declared twice");
        assert_eq!(
            err,
            DeclarationError::DuplicateParameter {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn renamed_path_parameter_is_rejected() {
        let err = RequestDescriptor::get("/stations/{stationId}")
            .param(Parameter::new("station_id").marker(RoleMarker::path().to_camel()))
            .build()
            .expect_err("path rename");
        assert_eq!(
            err,
            DeclarationError::UnsupportedTransform {
                role: Role::Path,
                parameter: "station_id".to_string()
            }
        );
    }

    #[test]
    fn render_path() {
        let endpoint = RequestDescriptor::get("/{id}")
            .param(Parameter::new("id").marker(RoleMarker::path()))
            .build()
            .expect("build");

        let path = endpoint
            .render_path(&BoundArguments::new().with("id", "42"))
            .expect("render");
        assert_eq!(path, "/42");

        let err = endpoint
            .render_path(&BoundArguments::new().with("id", Argument::null()))
            .expect_err("null id");
        assert_eq!(
            err,
            BindingError::MissingPathArgument {
                placeholder: "id".to_string()
            }
        );
    }

    #[test]
    fn placeholder_without_path_parameter() {
        let endpoint = RequestDescriptor::get("/stations/{id}")
            .param(Parameter::new("id"))
            .build()
            .expect("build");

        let err = endpoint
            .render_path(&BoundArguments::new().with("id", "42"))
            .expect_err("id is a plain parameter");
        assert!(matches!(err, BindingError::MissingPathArgument { .. }));
    }

    #[test]
    fn defaults_are_merged_and_overridden() {
        let endpoint = RequestDescriptor::get("/search")
            .param(Parameter::new("page").marker(RoleMarker::query()).optional())
            .default_header("Accept", "application/json")
            .default_query("page", "1")
            .default_query("format", "json")
            .build()
            .expect("build");

        let (request, _) = endpoint
            .prepare(&endpoint.bind(CallArguments::new()).expect("bind"))
            .expect("prepare");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.query_value("page"), Some("1"));

        let (request, _) = endpoint
            .prepare(&endpoint.bind(CallArguments::new().arg(3)).expect("bind"))
            .expect("prepare");
        assert_eq!(request.query_value("page"), Some("3"));
        assert_eq!(request.query_value("format"), Some("json"));
    }

    #[test]
    fn static_body_rules() {
        let endpoint = RequestDescriptor::post("/stations")
            .param(Parameter::new("name").marker(RoleMarker::body_json()))
            .default_body(RequestBody::Json(json!({"source": "app"})))
            .build()
            .expect("json fields extend a static object");
        let (request, _) = endpoint
            .prepare(&BoundArguments::new().with("name", "Gangnam"))
            .expect("prepare");
        assert_eq!(
            request.body(),
            Some(&RequestBody::Json(json!({"source": "app", "name": "Gangnam"})))
        );

        let err = RequestDescriptor::post("/stations")
            .param(Parameter::new("payload").marker(RoleMarker::body()))
            .default_body(RequestBody::Json(json!({})))
            .build()
            .expect_err("static body and raw body");
        assert!(matches!(
            err,
            DeclarationError::ConflictingBodyRole {
                requested: BodyGroup::Raw,
                ..
            }
        ));

        let err = RequestDescriptor::post("/stations")
            .param(Parameter::new("name").marker(RoleMarker::form()))
            .default_body(RequestBody::Json(json!({})))
            .build()
            .expect_err("form fields on a JSON body");
        assert_eq!(
            err,
            DeclarationError::ConflictingBodyRole {
                parameter: "name".to_string(),
                requested: BodyGroup::Form,
                existing: BodyGroup::Json,
            }
        );

        let endpoint = RequestDescriptor::post("/upload")
            .param(Parameter::new("note").marker(RoleMarker::form()))
            .default_body(RequestBody::Multipart(Form::new().text("kind", "map")))
            .build()
            .expect("form fields extend a static form");
        assert_eq!(endpoint.body_kind(), BodyKind::Multipart);
    }

    #[test]
    fn each_call_gets_its_own_copy() {
        let endpoint = RequestDescriptor::get("/search")
            .param(Parameter::new("q").marker(RoleMarker::query()))
            .build()
            .expect("build");

        let (first, _) = endpoint
            .prepare(&BoundArguments::new().with("q", "a"))
            .expect("prepare");
        let (second, _) = endpoint
            .prepare(&BoundArguments::new().with("q", "b"))
            .expect("prepare");

        assert_eq!(first.query_value("q"), Some("a"));
        assert_eq!(second.query_value("q"), Some("b"));
        assert!(endpoint.instantiate().query().is_empty());
    }

    #[test]
    fn transforms_on_markers() {
        let endpoint = RequestDescriptor::get("/")
            .param(Parameter::new("api_key").marker(RoleMarker::header().to_pascal()))
            .param(Parameter::new("page_size").marker(RoleMarker::query().to_camel()))
            .param(
                Parameter::new("x").marker(
                    RoleMarker::query().with_transform(NameTransform::Custom("y".to_string())),
                ),
            )
            .build()
            .expect("build");

        let (request, _) = endpoint
            .prepare(
                &BoundArguments::new()
                    .with("api_key", "k")
                    .with("page_size", json!(10))
                    .with("x", "z"),
            )
            .expect("prepare");
        assert_eq!(request.header("ApiKey"), Some("k"));
        assert_eq!(request.query_value("pageSize"), Some("10"));
        assert_eq!(request.query_value("y"), Some("z"));
    }

    #[test]
    fn timeout_travels_in_options() {
        let endpoint = RequestDescriptor::get("/slow")
            .timeout(Duration::from_millis(250))
            .build()
            .expect("build");
        assert_eq!(endpoint.request_options().timeout, Some(Duration::from_millis(250)));
        assert_eq!(
            endpoint.instantiate().options().timeout,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn header_argument_overrides_default_of_other_case() {
        let endpoint = RequestDescriptor::get("/metro/station")
            .default_header("Accept", "application/json")
            .param(Parameter::new("accept").marker(RoleMarker::header()))
            .build()
            .expect("build");

        let arguments = endpoint
            .bind(CallArguments::new().arg("text/plain"))
            .expect("bind");
        let (request, _) = endpoint.prepare(&arguments).expect("prepare");

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Accept"), Some("text/plain"));
    }

    #[test]
    fn options_shorthand_declares_options_endpoint() {
        let endpoint = RequestDescriptor::options("/metro/lines")
            .build()
            .expect("build");

        assert_eq!(endpoint.method(), Method::Options);
        assert_eq!(endpoint.path_template().as_str(), "/metro/lines");
        assert_eq!(endpoint.name(), "OPTIONS /metro/lines");
        assert_eq!(endpoint.request_options(), &RequestOptions::default());
    }

    #[test]
    fn directly_response_is_set_through_builder() {
        let endpoint = RequestDescriptor::get("/metro/status")
            .directly_response(true)
            .build()
            .expect("build");
        assert!(endpoint.directly_response());
        let endpoint = RequestDescriptor::get("/metro/status").build().expect("build");
        assert!(!endpoint.directly_response());
    }
}

//! The per-call working request.
//!
//! A [`WorkingRequest`] is cloned from an endpoint's defaults for every call,
//! filled from the bound arguments, handed through the before-hooks and
//! finally turned into a transport [`Request`]. It is owned by exactly one
//! in-flight call.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::argument::{Argument, BoundArguments, json_text};
use crate::body::RequestBody;
use crate::error::BindingError;
use crate::multipart::{Form, Part};
use crate::path_template::PathTemplate;
use crate::registry::{BodyGroup, ComponentRegistry};
use crate::request::header_key;
use crate::role::Role;
use crate::{Method, Request, Result};

/// Name of the endpoint a request was built for.
///
/// Stored in request extensions for middleware.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointName(pub String);

impl EndpointName {
    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-endpoint transport options.
///
/// Stored in request extensions; transports that understand an option
/// apply it, others ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestOptions {
    /// Timeout for this endpoint, overriding the transport default.
    pub timeout: Option<Duration>,
}

/// The mutable, per-call copy of an endpoint's request template.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingRequest {
    endpoint: String,
    method: Method,
    template: PathTemplate,
    headers: HashMap<String, String>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    options: RequestOptions,
}

impl WorkingRequest {
    /// An empty working request.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, method: Method, template: PathTemplate) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            template,
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    /// Endpoint name.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Change the HTTP method.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// Path template.
    #[must_use]
    pub const fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Headers, keyed by lower-cased name.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&header_key(name)).map(String::as_str)
    }

    /// Set a header, replacing any previous value under any casing.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(header_key(&name.into()), value.into());
    }

    /// Remove a header.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(&header_key(name))
    }

    /// Query pairs in order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// First query value for a key.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a query key to a single value, replacing previous values.
    pub fn set_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.set_query_values(&key, vec![value.into()]);
    }

    /// Replace every value of a query key.
    pub fn set_query_values(&mut self, key: &str, values: Vec<String>) {
        let position = self.query.iter().position(|(k, _)| k == key);
        self.query.retain(|(k, _)| k != key);
        let at = position.unwrap_or(self.query.len()).min(self.query.len());
        let tail = self.query.split_off(at);
        self.query
            .extend(values.into_iter().map(|value| (key.to_string(), value)));
        self.query.extend(tail);
    }

    /// Body.
    #[must_use]
    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: Option<RequestBody>) {
        self.body = body;
    }

    /// Transport options.
    #[must_use]
    pub const fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Replace the transport options.
    pub fn set_options(&mut self, options: RequestOptions) {
        self.options = options;
    }

    /// Fill headers, query and body from bound arguments.
    ///
    /// Filling twice with the same arguments yields the same request: each
    /// wire name is set, never appended.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] when a value cannot be carried by its role
    /// or a raw body does not match its declared type.
    pub fn fill(
        &mut self,
        registry: &ComponentRegistry,
        arguments: &BoundArguments,
    ) -> std::result::Result<(), BindingError> {
        for slot in registry.slots(Role::Header) {
            let Some(argument) = present(arguments, slot.parameter()) else {
                continue;
            };
            let values = text_values(argument, slot.parameter(), Role::Header)?;
            if !values.is_empty() {
                self.set_header(slot.wire_name(), values.join(","));
            }
        }

        for slot in registry.slots(Role::Query) {
            let Some(argument) = present(arguments, slot.parameter()) else {
                continue;
            };
            let values = text_values(argument, slot.parameter(), Role::Query)?;
            self.set_query_values(slot.wire_name(), values);
        }

        match registry.body_group() {
            Some(BodyGroup::Form) => self.fill_form(registry, arguments)?,
            Some(BodyGroup::Json) => self.fill_json(registry, arguments),
            Some(BodyGroup::Raw) => self.fill_raw(registry, arguments)?,
            None => {}
        }
        Ok(())
    }

    fn fill_form(
        &mut self,
        registry: &ComponentRegistry,
        arguments: &BoundArguments,
    ) -> std::result::Result<(), BindingError> {
        let mut form = match self.body.take() {
            Some(RequestBody::Multipart(form)) => form,
            _ => Form::new(),
        };
        for slot in registry.slots(Role::FormField) {
            let Some(argument) = present(arguments, slot.parameter()) else {
                continue;
            };
            form.remove(slot.wire_name());
            for part in form_parts(slot.wire_name(), slot.parameter(), argument)? {
                form.push(part);
            }
        }
        self.body = Some(RequestBody::Multipart(form));
        Ok(())
    }

    fn fill_json(&mut self, registry: &ComponentRegistry, arguments: &BoundArguments) {
        let mut object = match self.body.take() {
            Some(RequestBody::Json(Value::Object(object))) => object,
            _ => Map::new(),
        };
        for slot in registry.slots(Role::BodyJson) {
            let value = match arguments.get(slot.parameter()) {
                Some(Argument::Json(value)) => value.clone(),
                Some(Argument::Bytes(bytes)) => {
                    Value::String(String::from_utf8_lossy(bytes).into_owned())
                }
                Some(Argument::Form(_) | Argument::Response(_)) | None => Value::Null,
            };
            object.insert(slot.wire_name().to_string(), value);
        }
        self.body = Some(RequestBody::Json(Value::Object(object)));
    }

    fn fill_raw(
        &mut self,
        registry: &ComponentRegistry,
        arguments: &BoundArguments,
    ) -> std::result::Result<(), BindingError> {
        let Some(raw) = registry.raw_body() else {
            return Ok(());
        };
        let Some(argument) = present(arguments, raw.parameter()) else {
            return Ok(());
        };
        let invalid = || BindingError::InvalidBodyType {
            parameter: raw.parameter().to_string(),
            expected: raw.hint().expectation(),
            found: argument.kind_name(),
        };
        if !raw.hint().accepts(argument) {
            return Err(invalid());
        }
        self.body = Some(match argument {
            Argument::Json(value) => RequestBody::Json(value.clone()),
            Argument::Bytes(bytes) => RequestBody::Binary(bytes.clone()),
            Argument::Form(form) => RequestBody::Multipart(form.clone()),
            Argument::Response(_) => return Err(invalid()),
        });
        Ok(())
    }

    /// Build the transport request against a base URL.
    ///
    /// The rendered path is joined to `base_url`. The endpoint name, path
    /// template and options are attached as request extensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built or the body cannot be encoded.
    pub fn into_request(self, base_url: &url::Url, path: &str) -> Result<Request<Bytes>> {
        let url = join_url(base_url, path)?;
        let has_content_type = self.headers.contains_key("content-type");
        let mut builder = Request::builder(self.method, url)
            .headers(self.headers)
            .query_pairs(self.query)
            .extension(EndpointName(self.endpoint))
            .extension(self.template)
            .extension(self.options);

        if let Some(body) = self.body {
            let (content_type, bytes) = body.encode()?;
            if !has_content_type {
                builder = builder.header("Content-Type", content_type);
            }
            builder = builder.body(bytes);
        }
        Ok(builder.build())
    }
}

/// Join a rendered path onto a base URL.
///
/// The base URL is treated as a directory, so `https://host/api` joined with
/// `/metro/station` gives `https://host/api/metro/station`. Absolute URLs
/// replace the base.
fn join_url(base_url: &url::Url, path: &str) -> Result<url::Url> {
    if path.contains("://") {
        return Ok(url::Url::parse(path)?);
    }
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

fn present<'a>(arguments: &'a BoundArguments, name: &str) -> Option<&'a Argument> {
    arguments.get(name).filter(|argument| !argument.is_absent())
}

/// Text values of a header or query argument.
///
/// Arrays give one value per non-null element.
fn text_values(
    argument: &Argument,
    parameter: &str,
    role: Role,
) -> std::result::Result<Vec<String>, BindingError> {
    match argument {
        Argument::Json(Value::Array(items)) => Ok(items.iter().filter_map(json_text).collect()),
        Argument::Json(value) => Ok(json_text(value).into_iter().collect()),
        Argument::Bytes(bytes) => std::str::from_utf8(bytes)
            .map(|text| vec![text.to_string()])
            .map_err(|_| unsupported(argument, parameter, role)),
        Argument::Form(_) | Argument::Response(_) => Err(unsupported(argument, parameter, role)),
    }
}

fn form_parts(
    wire_name: &str,
    parameter: &str,
    argument: &Argument,
) -> std::result::Result<Vec<Part>, BindingError> {
    match argument {
        Argument::Json(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(json_text)
            .map(|text| Part::text(wire_name, text))
            .collect()),
        Argument::Json(value @ Value::Object(_)) => Ok(vec![Part::json(wire_name, value)]),
        Argument::Json(value) => Ok(json_text(value)
            .map(|text| Part::text(wire_name, text))
            .into_iter()
            .collect()),
        Argument::Bytes(bytes) => Ok(vec![Part::bytes(wire_name, bytes.clone())]),
        Argument::Form(_) | Argument::Response(_) => {
            Err(unsupported(argument, parameter, Role::FormField))
        }
    }
}

fn unsupported(argument: &Argument, parameter: &str, role: Role) -> BindingError {
    BindingError::UnsupportedValue {
        parameter: parameter.to_string(),
        role,
        found: argument.kind_name(),
    }
}

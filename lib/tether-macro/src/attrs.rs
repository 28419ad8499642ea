//! Attribute parsing for the tether proc-macro.

use std::time::Duration;

use syn::punctuated::Punctuated;
use syn::{Ident, LitStr, Token, Type};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// The `tether::Method` variant name, for code generation.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Delete => "Delete",
            Self::Patch => "Patch",
            Self::Head => "Head",
            Self::Options => "Options",
        }
    }

    /// Parse an HTTP method from a string (case-insensitive).
    /// Returns `None` for unsupported methods.
    #[must_use]
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// The method for a shorthand attribute such as `#[get]`.
    #[must_use]
    pub(crate) fn from_attr(ident: &Ident) -> Option<Self> {
        match ident.to_string().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            _ => None,
        }
    }
}

/// How a parameter's wire name is derived.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum WireName {
    /// The parameter name itself.
    #[default]
    Identity,
    /// An explicit name.
    Custom(String),
    /// `camelCase` of the parameter name.
    Camel,
    /// `PascalCase` of the parameter name.
    Pascal,
}

/// Role attribute found on a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamKind {
    /// `#[header]`
    Header,
    /// `#[query]`
    Query,
    /// `#[path]`, or an argument named after a placeholder.
    Path,
    /// `#[form]`
    Form,
    /// `#[body_json]`
    BodyJson,
    /// `#[body]`
    Body,
    /// `#[response]`, or an argument of type `Response`.
    Response,
    /// No attribute: left to the handler.
    Unmarked,
}

impl ParamKind {
    /// The `RoleMarker` constructor, for code generation.
    #[must_use]
    pub(crate) const fn marker_fn(self) -> Option<&'static str> {
        match self {
            Self::Header => Some("header"),
            Self::Query => Some("query"),
            Self::Path => Some("path"),
            Self::Form => Some("form"),
            Self::BodyJson => Some("body_json"),
            Self::Body => Some("body"),
            Self::Response => Some("response"),
            Self::Unmarked => None,
        }
    }

    /// Returns `true` if the caller passes a value for this argument.
    #[must_use]
    pub(crate) const fn is_caller_supplied(self) -> bool {
        !matches!(self, Self::Response)
    }
}

/// A parsed method parameter.
#[derive(Debug)]
pub(crate) struct MethodParam {
    /// Parameter name from the function signature.
    pub(crate) name: Ident,
    /// Parameter type.
    pub(crate) ty: Type,
    /// Role attribute.
    pub(crate) kind: ParamKind,
    /// Wire name derivation.
    pub(crate) wire: WireName,
}

/// Method-level options parsed from attributes.
#[derive(Debug, Clone, Default)]
pub(crate) struct MethodOptions {
    /// `#[directly_response]`: hand the raw response back, skipping the handler.
    pub(crate) directly_response: bool,

    /// `#[timeout("30s")]`: per-endpoint timeout.
    pub(crate) timeout: Option<Duration>,

    /// `#[default_header("k", "v")]`, in declaration order.
    pub(crate) default_headers: Vec<(String, String)>,

    /// `#[default_query("k", "v")]`, in declaration order.
    pub(crate) default_queries: Vec<(String, String)>,
}

/// Parse method-level options from attributes.
///
/// Recognized attributes:
/// - `#[directly_response]`
/// - `#[timeout("30s")]` or `#[timeout(secs = 30)]`
/// - `#[default_header("k", "v")]`, `#[default_query("k", "v")]`
pub(crate) fn parse_method_options(attrs: &[syn::Attribute]) -> syn::Result<MethodOptions> {
    let mut options = MethodOptions::default();

    for attr in attrs {
        let path = attr.path();

        if path.is_ident("directly_response") {
            attr.meta.require_path_only()?;
            options.directly_response = true;
        } else if path.is_ident("timeout")
            && let Some(duration) = parse_duration_attr(attr)?
        {
            options.timeout = Some(duration);
        } else if path.is_ident("default_header") {
            options.default_headers.push(parse_key_value(attr)?);
        } else if path.is_ident("default_query") {
            options.default_queries.push(parse_key_value(attr)?);
        }
    }

    Ok(options)
}

/// Parse `("key", "value")`.
fn parse_key_value(attr: &syn::Attribute) -> syn::Result<(String, String)> {
    let values = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
    let mut values = values.into_iter();
    match (values.next(), values.next(), values.next()) {
        (Some(key), Some(value), None) => Ok((key.value(), value.value())),
        _ => Err(syn::Error::new_spanned(
            attr,
            "expected two string arguments: (\"name\", \"value\")",
        )),
    }
}

/// Parse a duration from an attribute like `#[timeout("30s")]` or `#[timeout(secs = 30)]`.
fn parse_duration_attr(attr: &syn::Attribute) -> syn::Result<Option<Duration>> {
    match &attr.meta {
        syn::Meta::List(meta_list) => {
            if let Ok(str_lit) = syn::parse2::<LitStr>(meta_list.tokens.clone()) {
                let value = str_lit.value();
                return parse_duration_string(&value).map(Some).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &str_lit,
                        "invalid duration format. Expected: \"30s\", \"1m\", \"500ms\"",
                    )
                });
            }

            if let Ok(name_value) = syn::parse2::<syn::MetaNameValue>(meta_list.tokens.clone())
                && let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Int(lit_int),
                    ..
                }) = &name_value.value
            {
                if name_value.path.is_ident("secs") {
                    return Ok(Some(Duration::from_secs(lit_int.base10_parse()?)));
                }
                if name_value.path.is_ident("millis") {
                    return Ok(Some(Duration::from_millis(lit_int.base10_parse()?)));
                }
            }

            Err(syn::Error::new_spanned(
                &meta_list.tokens,
                "expected duration string like \"30s\" or `secs = 30`",
            ))
        }
        _ => Err(syn::Error::new_spanned(
            attr,
            "expected a duration: #[timeout(\"30s\")]",
        )),
    }
}

/// Parse a duration string like "30s", "1m", "500ms".
fn parse_duration_string(s: &str) -> Option<Duration> {
    let s = s.trim();

    if let Some(secs) = s.strip_suffix('s') {
        if let Some(millis) = secs.strip_suffix('m') {
            return millis.parse().ok().map(Duration::from_millis);
        }
        return secs.parse().ok().map(Duration::from_secs);
    }

    if let Some(mins) = s.strip_suffix('m') {
        let mins: u64 = mins.parse().ok()?;
        return Some(Duration::from_secs(mins * 60));
    }

    None
}

/// Parameter attribute names consumed by the macro.
pub(crate) const PARAM_ATTRS: &[&str] = &[
    "header",
    "query",
    "path",
    "form",
    "body_json",
    "body",
    "response",
];

/// Parse a parameter attribute and return its kind and wire name.
///
/// Accepted forms: `#[query]`, `#[query("name")]`, `#[query(name = "name")]`,
/// `#[query(camel)]` and `#[query(pascal)]`.
pub(crate) fn parse_param_attr(
    attr: &syn::Attribute,
) -> syn::Result<Option<(ParamKind, WireName)>> {
    let Some(ident) = attr.path().get_ident() else {
        return Ok(None);
    };
    let kind = match ident.to_string().as_str() {
        "header" => ParamKind::Header,
        "query" => ParamKind::Query,
        "path" => ParamKind::Path,
        "form" => ParamKind::Form,
        "body_json" => ParamKind::BodyJson,
        "body" => ParamKind::Body,
        "response" => ParamKind::Response,
        _ => return Ok(None),
    };

    let wire = match &attr.meta {
        syn::Meta::Path(_) => WireName::Identity,
        syn::Meta::List(meta_list) => {
            if let Ok(str_lit) = syn::parse2::<LitStr>(meta_list.tokens.clone()) {
                WireName::Custom(str_lit.value())
            } else {
                parse_wire_name(attr)?
            }
        }
        syn::Meta::NameValue(_) => {
            return Err(syn::Error::new_spanned(
                attr,
                format!("expected #[{ident}] or #[{ident}(name = \"...\")]"),
            ));
        }
    };

    Ok(Some((kind, wire)))
}

fn parse_wire_name(attr: &syn::Attribute) -> syn::Result<WireName> {
    let mut wire = WireName::Identity;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let value: LitStr = meta.value()?.parse()?;
            wire = WireName::Custom(value.value());
            Ok(())
        } else if meta.path.is_ident("camel") {
            wire = WireName::Camel;
            Ok(())
        } else if meta.path.is_ident("pascal") {
            wire = WireName::Pascal;
            Ok(())
        } else {
            Err(meta.error("expected `name = \"...\"`, `camel` or `pascal`"))
        }
    })?;
    Ok(wire)
}

/// Extract placeholder names from a URL path template.
///
/// E.g., `/metro/{line}/stations/{id}` returns `["line", "id"]`
#[must_use]
pub(crate) fn extract_path_placeholders(path: &str) -> Vec<String> {
    let mut placeholders = Vec::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' {
            let mut name = String::new();
            for next in chars.by_ref() {
                if next == '}' {
                    break;
                }
                name.push(next);
            }
            if !name.is_empty() {
                placeholders.push(name);
            }
        }
    }
    placeholders
}

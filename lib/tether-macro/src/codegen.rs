//! Code generation for the tether proc-macro.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Type, Visibility};

use crate::attrs::{HttpMethod, MethodOptions, MethodParam, ParamKind, WireName};

/// Generate the endpoints struct, the client struct and their impls.
pub fn generate_client_struct(
    vis: &Visibility,
    client_name: &Ident,
    endpoints_name: &Ident,
    base_url: &str,
    declarations: &[(Ident, TokenStream)],
) -> TokenStream {
    let fields = declarations.iter().map(|(name, _)| name);
    let field_docs = declarations
        .iter()
        .map(|(name, _)| format!("Declaration of `{name}`."));
    let inits = declarations
        .iter()
        .map(|(name, declaration)| quote! { #name: #declaration });

    quote! {
        /// Endpoint declarations, one per trait method.
        #[derive(Debug, Clone)]
        #vis struct #endpoints_name {
            #(
                #[doc = #field_docs]
                pub #fields: ::tether::RequestDescriptor,
            )*
        }

        impl #endpoints_name {
            /// Declare every endpoint.
            ///
            /// # Errors
            ///
            /// Returns the first invalid declaration.
            pub fn declare() -> ::tether::Result<Self> {
                Ok(Self {
                    #(#inits,)*
                })
            }
        }

        /// Generated client dispatching the trait methods through a session.
        #vis struct #client_name<T = ::tether::HyperTransport> {
            session: ::tether::Session<T>,
            endpoints: #endpoints_name,
        }

        impl #client_name {
            /// Base URL given to the macro.
            pub const BASE_URL: &'static str = #base_url;

            /// Open a session on the default hyper transport.
            ///
            /// # Errors
            ///
            /// Returns an error if the base URL or a declaration is invalid.
            pub fn connect() -> ::tether::Result<Self> {
                Self::new(::tether::Session::connect(Self::BASE_URL)?)
            }
        }

        impl<T> #client_name<T> {
            /// Declare the endpoints on top of an existing session.
            ///
            /// # Errors
            ///
            /// Returns the first invalid declaration.
            pub fn new(session: ::tether::Session<T>) -> ::tether::Result<Self> {
                Ok(Self {
                    session,
                    endpoints: #endpoints_name::declare()?,
                })
            }

            /// The session.
            #[must_use]
            pub const fn session(&self) -> &::tether::Session<T> {
                &self.session
            }

            /// The session, for hook registration.
            pub fn session_mut(&mut self) -> &mut ::tether::Session<T> {
                &mut self.session
            }

            /// The endpoint declarations.
            #[must_use]
            pub const fn endpoints(&self) -> &#endpoints_name {
                &self.endpoints
            }

            /// The endpoint declarations, for hook registration.
            pub fn endpoints_mut(&mut self) -> &mut #endpoints_name {
                &mut self.endpoints
            }

            /// Give the session back.
            #[must_use]
            pub fn into_session(self) -> ::tether::Session<T> {
                self.session
            }
        }

        impl<T> ::core::fmt::Debug for #client_name<T> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(stringify!(#client_name))
                    .field("session", &self.session)
                    .field("endpoints", &self.endpoints)
                    .finish()
            }
        }

        impl<T: ::tether::HttpTransport> ::tether::Scope for #client_name<T> {
            type Transport = T;

            fn session(&self) -> &::tether::Session<T> {
                &self.session
            }
        }
    }
}

/// Generate the `RequestDescriptor` declaration of one method.
pub fn generate_declaration(
    endpoint_name: &str,
    http_method: HttpMethod,
    path: &str,
    params: &[MethodParam],
    options: &MethodOptions,
) -> TokenStream {
    let method = format_ident!("{}", http_method.as_str());
    let parameters = params.iter().map(generate_parameter);
    let headers = options
        .default_headers
        .iter()
        .map(|(name, value)| quote! { .default_header(#name, #value) });
    let queries = options
        .default_queries
        .iter()
        .map(|(name, value)| quote! { .default_query(#name, #value) });
    let directly = options
        .directly_response
        .then(|| quote! { .directly_response(true) });
    let timeout = options.timeout.map(|timeout| {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        quote! { .timeout(::core::time::Duration::from_millis(#millis)) }
    });

    quote! {
        ::tether::RequestDescriptor::builder(::tether::Method::#method, #path)
            .name(#endpoint_name)
            #(.param(#parameters))*
            #(#headers)*
            #(#queries)*
            #directly
            #timeout
            .build()?
    }
}

/// Generate one `Parameter`.
fn generate_parameter(param: &MethodParam) -> TokenStream {
    let name = param.name.to_string();
    let hint = format_ident!("{}", type_hint(&param.ty).as_str());
    let optional = is_option_type(strip_reference(&param.ty)).then(|| quote! { .optional() });

    let marker = param.kind.marker_fn().map(|constructor| {
        let constructor = format_ident!("{}", constructor);
        let transform = match &param.wire {
            WireName::Identity => quote! {},
            WireName::Custom(wire) => quote! { .custom_name(#wire) },
            WireName::Camel => quote! { .to_camel() },
            WireName::Pascal => quote! { .to_pascal() },
        };
        quote! { .marker(::tether::RoleMarker::#constructor()#transform) }
    });

    quote! {
        ::tether::Parameter::new(#name)
            .hint(::tether::TypeHint::#hint)
            #optional
            #marker
    }
}

/// Generate the `CallArguments` for the caller-supplied parameters.
///
/// Values are borrowed so the handler body can still use them.
pub fn generate_call_arguments(params: &[MethodParam]) -> TokenStream {
    let named = params
        .iter()
        .filter(|p| p.kind.is_caller_supplied())
        .map(|p| {
            let key = p.name.to_string();
            let value = generate_argument(&p.name, &p.ty);
            quote! { .named(#key, #value) }
        });

    quote! {
        ::tether::CallArguments::new()
            #(#named)*
    }
}

/// Convert one argument according to its declared type.
fn generate_argument(name: &Ident, ty: &Type) -> TokenStream {
    let ty = strip_reference(ty);
    let inner = unwrap_option_type(ty);
    let value = inner.unwrap_or(ty);

    let convert = |expr: TokenStream| match type_hint(value) {
        TypeHintKind::Bytes => quote! {
            ::tether::Argument::Bytes(::tether::bytes::Bytes::copy_from_slice(
                ::core::convert::AsRef::<[u8]>::as_ref(#expr),
            ))
        },
        TypeHintKind::Form => quote! {
            ::tether::Argument::Form(::tether::Form::clone(#expr))
        },
        _ => quote! { ::tether::Argument::json(#expr)? },
    };

    match (inner, type_hint(value)) {
        (Some(_), TypeHintKind::Bytes | TypeHintKind::Form) => {
            let converted = convert(quote! { value });
            quote! {
                match &#name {
                    ::core::option::Option::Some(value) => #converted,
                    ::core::option::Option::None => ::tether::Argument::null(),
                }
            }
        }
        _ => convert(quote! { &#name }),
    }
}

/// Generate the handler prologue binding `#[response]` arguments.
pub fn generate_response_bindings(params: &[MethodParam]) -> TokenStream {
    let bindings = params
        .iter()
        .filter(|p| p.kind == ParamKind::Response)
        .map(|p| {
            let name = &p.name;
            let slot = name.to_string();
            let missing = format!("no response injected into `{slot}`");
            quote! {
                let #name = tether_invocation
                    .take_response(#slot)
                    .ok_or_else(|| ::tether::Error::invalid_request(#missing))?;
            }
        });

    quote! { #(#bindings)* }
}

/// The kind of return type for a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTypeKind {
    /// Decoded model (default): `Result<T>`
    Json,
    /// Raw response: `Result<Response>`
    RawResponse,
    /// Unit type: `Result<()>`
    Unit,
}

/// Analyze the return type to determine how to handle the response.
///
/// Extracts the inner type from `Result<T>` and determines:
/// - `RawResponse`: If the type is `Response` or `Response<_>`
/// - `Unit`: If the type is `()`
/// - `Json`: Everything else (decode the model)
pub fn analyze_return_type(return_type: &syn::ReturnType) -> ReturnTypeKind {
    let ty = match return_type {
        syn::ReturnType::Default => return ReturnTypeKind::Unit,
        syn::ReturnType::Type(_, ty) => ty.as_ref(),
    };

    let inner = unwrap_result_type(ty).unwrap_or(ty);

    if is_unit_type(inner) {
        return ReturnTypeKind::Unit;
    }

    if is_response_type(inner) {
        return ReturnTypeKind::RawResponse;
    }

    ReturnTypeKind::Json
}

/// Generate the conversion of `response` into the method's return value.
pub fn generate_return_conversion(kind: ReturnTypeKind) -> TokenStream {
    match kind {
        ReturnTypeKind::RawResponse => quote! { Ok(response) },
        ReturnTypeKind::Unit => quote! {
            response.error_for_status()?;
            Ok(())
        },
        ReturnTypeKind::Json => quote! { Ok(::tether::decode(response)?) },
    }
}

/// Coarse type classes, mirroring `tether::TypeHint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHintKind {
    Any,
    Text,
    Bytes,
    Collection,
    Form,
    Response,
}

impl TypeHintKind {
    /// The `TypeHint` variant name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Text => "Text",
            Self::Bytes => "Bytes",
            Self::Collection => "Collection",
            Self::Form => "Form",
            Self::Response => "Response",
        }
    }
}

/// Classify a parameter type.
pub fn type_hint(ty: &Type) -> TypeHintKind {
    let ty = strip_reference(ty);
    let ty = unwrap_option_type(ty).unwrap_or(ty);
    let ty = strip_reference(ty);

    match ty {
        Type::Slice(slice) if is_u8(&slice.elem) => TypeHintKind::Bytes,
        Type::Slice(_) | Type::Array(_) => TypeHintKind::Collection,
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return TypeHintKind::Any;
            };
            match segment.ident.to_string().as_str() {
                "String" | "str" | "Cow" => TypeHintKind::Text,
                "Bytes" => TypeHintKind::Bytes,
                "Vec" if first_generic(segment).is_some_and(is_u8) => TypeHintKind::Bytes,
                "Vec" | "VecDeque" | "HashMap" | "BTreeMap" | "HashSet" | "BTreeSet" | "Map" => {
                    TypeHintKind::Collection
                }
                "Form" => TypeHintKind::Form,
                "Response" => TypeHintKind::Response,
                _ => TypeHintKind::Any,
            }
        }
        _ => TypeHintKind::Any,
    }
}

fn first_generic(segment: &syn::PathSegment) -> Option<&Type> {
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path.path.is_ident("u8"))
}

/// Remove any leading `&` / `&mut`.
pub fn strip_reference(ty: &Type) -> &Type {
    match ty {
        Type::Reference(reference) => strip_reference(&reference.elem),
        Type::Paren(paren) => strip_reference(&paren.elem),
        other => other,
    }
}

/// Check if a type is `Option<T>`.
fn is_option_type(ty: &Type) -> bool {
    unwrap_option_type(ty).is_some()
}

/// Check if a type is the unit type `()`.
pub fn is_unit_type(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

/// Check if a type is `Response` or `Response<_>`.
pub fn is_response_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = strip_reference(ty)
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == "Response";
    }
    false
}

/// Unwrap `Result<T>` to get `T`, returns None if not a Result.
fn unwrap_result_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Result"
    {
        return first_generic(segment);
    }
    None
}

/// Unwrap `Option<T>` to get `T`, returns None if not an Option.
fn unwrap_option_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Option"
    {
        return first_generic(segment);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, ty: Type, kind: ParamKind, wire: WireName) -> MethodParam {
        MethodParam {
            name: format_ident!("{}", name),
            ty,
            kind,
            wire,
        }
    }

    #[test]
    fn test_type_hint() {
        let cases: Vec<(Type, TypeHintKind)> = vec![
            (syn::parse_quote!(String), TypeHintKind::Text),
            (syn::parse_quote!(&str), TypeHintKind::Text),
            (syn::parse_quote!(Option<&str>), TypeHintKind::Text),
            (syn::parse_quote!(Bytes), TypeHintKind::Bytes),
            (syn::parse_quote!(Vec<u8>), TypeHintKind::Bytes),
            (syn::parse_quote!(&[u8]), TypeHintKind::Bytes),
            (syn::parse_quote!(Vec<String>), TypeHintKind::Collection),
            (syn::parse_quote!(HashMap<String, u32>), TypeHintKind::Collection),
            (syn::parse_quote!(tether::Form), TypeHintKind::Form),
            (syn::parse_quote!(Response), TypeHintKind::Response),
            (syn::parse_quote!(u32), TypeHintKind::Any),
            (syn::parse_quote!(Station), TypeHintKind::Any),
        ];
        for (ty, expected) in cases {
            assert_eq!(type_hint(&ty), expected, "{}", quote!(#ty));
        }
    }

    #[test]
    fn test_is_option_type() {
        let ty: Type = syn::parse_quote!(Option<String>);
        assert!(is_option_type(&ty));

        let ty: Type = syn::parse_quote!(String);
        assert!(!is_option_type(&ty));
    }

    #[test]
    fn test_analyze_return_type() {
        let ty: syn::ReturnType = syn::parse_quote!(-> tether::Result<Station>);
        assert_eq!(analyze_return_type(&ty), ReturnTypeKind::Json);

        let ty: syn::ReturnType = syn::parse_quote!(-> tether::Result<tether::Response>);
        assert_eq!(analyze_return_type(&ty), ReturnTypeKind::RawResponse);

        let ty: syn::ReturnType = syn::parse_quote!(-> Result<()>);
        assert_eq!(analyze_return_type(&ty), ReturnTypeKind::Unit);

        assert_eq!(
            analyze_return_type(&syn::ReturnType::Default),
            ReturnTypeKind::Unit
        );
    }

    #[test]
    fn parameter_carries_marker_and_transform() {
        let generated = generate_parameter(&param(
            "station_name",
            syn::parse_quote!(Option<String>),
            ParamKind::Query,
            WireName::Custom("name".to_string()),
        ))
        .to_string();

        assert!(generated.contains("TypeHint :: Text"), "{generated}");
        assert!(generated.contains(". optional ()"), "{generated}");
        assert!(
            generated.contains("RoleMarker :: query () . custom_name (\"name\")"),
            "{generated}"
        );
    }

    #[test]
    fn unmarked_parameter_has_no_marker() {
        let generated = generate_parameter(&param(
            "note",
            syn::parse_quote!(u32),
            ParamKind::Unmarked,
            WireName::Identity,
        ))
        .to_string();

        assert!(!generated.contains("marker"), "{generated}");
    }

    #[test]
    fn call_arguments_skip_response_slots() {
        let params = vec![
            param(
                "token",
                syn::parse_quote!(&str),
                ParamKind::Header,
                WireName::Identity,
            ),
            param(
                "response",
                syn::parse_quote!(Response),
                ParamKind::Response,
                WireName::Identity,
            ),
        ];
        let generated = generate_call_arguments(&params).to_string();

        assert!(generated.contains(". named (\"token\""), "{generated}");
        assert!(!generated.contains("\"response\""), "{generated}");
    }

    #[test]
    fn optional_bytes_map_none_to_null() {
        let generated =
            generate_argument(&format_ident!("payload"), &syn::parse_quote!(Option<Vec<u8>>))
                .to_string();

        assert!(generated.contains("Argument :: null ()"), "{generated}");
        assert!(generated.contains("copy_from_slice"), "{generated}");
    }

    #[test]
    fn declaration_includes_method_options() {
        let options = MethodOptions {
            directly_response: true,
            timeout: Some(std::time::Duration::from_secs(2)),
            default_headers: vec![("Accept".to_string(), "application/json".to_string())],
            default_queries: Vec::new(),
        };
        let generated =
            generate_declaration("get_station", HttpMethod::Get, "/metro/station", &[], &options)
                .to_string();

        assert!(generated.contains("Method :: Get"), "{generated}");
        assert!(generated.contains(". name (\"get_station\")"), "{generated}");
        assert!(
            generated.contains(". default_header (\"Accept\" , \"application/json\")"),
            "{generated}"
        );
        assert!(generated.contains(". directly_response (true)"), "{generated}");
        assert!(generated.contains("from_millis (2000u64)"), "{generated}");
    }
}

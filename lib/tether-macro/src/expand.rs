//! Macro expansion logic for tether.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ItemTrait, Pat, TraitItem, TraitItemFn, parse2};

use crate::attrs::{
    HttpMethod, MethodOptions, MethodParam, PARAM_ATTRS, ParamKind, WireName,
    extract_path_placeholders, parse_method_options, parse_param_attr,
};
use crate::codegen::{
    analyze_return_type, generate_call_arguments, generate_client_struct, generate_declaration,
    generate_response_bindings, generate_return_conversion, is_response_type,
};

/// Arguments for the `#[tether]` attribute.
#[derive(Debug, Default)]
pub struct TetherArgs {
    pub url: Option<String>,
}

/// Parse the tether attribute arguments.
fn parse_tether_args(attr: TokenStream) -> syn::Result<TetherArgs> {
    let mut args = TetherArgs::default();

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("url") {
            let value: syn::LitStr = meta.value()?.parse()?;
            args.url = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported tether attribute"))
        }
    });

    syn::parse::Parser::parse2(parser, attr)?;

    if args.url.is_none() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "missing `url` attribute",
        ));
    }

    Ok(args)
}

/// Information about a parsed trait method.
pub struct TraitMethodInfo {
    /// The method signature.
    pub sig: syn::Signature,
    /// The HTTP method (GET, POST, etc.).
    pub http_method: HttpMethod,
    /// The URL path template.
    pub path: String,
    /// Parsed parameters.
    pub params: Vec<MethodParam>,
    /// Documentation attributes.
    pub docs: Vec<syn::Attribute>,
    /// Method-level options.
    pub options: MethodOptions,
    /// Default body, run as the handler once the response is in.
    pub handler: Option<syn::Block>,
}

/// Expand the `#[tether]` attribute on a trait.
pub fn expand_tether_trait(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let trait_def: ItemTrait = parse2(item)?;
    let args = parse_tether_args(attr)?;

    let trait_name = &trait_def.ident;
    let vis = &trait_def.vis;
    let base_url = args
        .url
        .as_deref()
        .ok_or_else(|| syn::Error::new(trait_name.span(), "missing `url` attribute"))?;

    let methods = extract_trait_methods(&trait_def)?;
    let clean_trait = generate_clean_trait(vis, trait_name, &methods, &trait_def);

    let client_name = format_ident!("{}Client", trait_name);
    let endpoints_name = format_ident!("{}Endpoints", trait_name);
    let declarations: Vec<_> = methods
        .iter()
        .map(|m| {
            let declaration = generate_declaration(
                &m.sig.ident.to_string(),
                m.http_method,
                &m.path,
                &m.params,
                &m.options,
            );
            (m.sig.ident.clone(), declaration)
        })
        .collect();

    let client = generate_client_struct(
        vis,
        &client_name,
        &endpoints_name,
        base_url,
        &declarations,
    );
    let trait_impl = generate_trait_impl(trait_name, &client_name, &methods);

    Ok(quote! {
        #clean_trait
        #client
        #trait_impl
    })
}

/// Extract methods from a trait definition.
fn extract_trait_methods(trait_def: &ItemTrait) -> syn::Result<Vec<TraitMethodInfo>> {
    let mut methods = Vec::new();

    for item in &trait_def.items {
        let TraitItem::Fn(method) = item else {
            return Err(syn::Error::new_spanned(
                item,
                "only methods are supported in a #[tether] trait",
            ));
        };

        let (http_method, path) = find_http_attribute(&method.attrs)?.ok_or_else(|| {
            syn::Error::new_spanned(
                &method.sig,
                "missing HTTP method attribute: expected #[get], #[post], #[put], #[delete], \
                 #[patch], #[head], #[options] or #[request]",
            )
        })?;
        validate_signature(method)?;

        let params = parse_trait_method_params(method, &path)?;
        if method.default.is_none()
            && let Some(param) = params.iter().find(|p| p.kind == ParamKind::Response)
        {
            return Err(syn::Error::new_spanned(
                &param.name,
                "response arguments are only available to a method with a default body",
            ));
        }

        let docs = method
            .attrs
            .iter()
            .filter(|a| a.path().is_ident("doc"))
            .cloned()
            .collect();
        let options = parse_method_options(&method.attrs)?;

        methods.push(TraitMethodInfo {
            sig: method.sig.clone(),
            http_method,
            path,
            params,
            docs,
            options,
            handler: method.default.clone(),
        });
    }

    Ok(methods)
}

/// Reject handlers that cannot be driven by a session.
fn validate_signature(method: &TraitItemFn) -> syn::Result<()> {
    let sig = &method.sig;

    if sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            sig.fn_token,
            format!("NotAsyncHandler: `{}` must be an `async fn`", sig.ident),
        ));
    }

    let borrows_self = sig
        .receiver()
        .is_some_and(|receiver| receiver.reference.is_some() && receiver.mutability.is_none());
    if !borrows_self {
        return Err(syn::Error::new_spanned(
            &sig.ident,
            format!("MissingSelfParameter: `{}` must take `&self`", sig.ident),
        ));
    }

    if matches!(sig.output, syn::ReturnType::Default) {
        return Err(syn::Error::new_spanned(
            &sig.ident,
            format!("`{}` must return a `tether::Result`", sig.ident),
        ));
    }

    Ok(())
}

/// Find and parse the HTTP method attribute from a method's attributes.
fn find_http_attribute(attrs: &[syn::Attribute]) -> syn::Result<Option<(HttpMethod, String)>> {
    for attr in attrs {
        let Some(ident) = attr.path().get_ident() else {
            continue;
        };

        if let Some(method) = HttpMethod::from_attr(ident) {
            let path: syn::LitStr = attr.parse_args()?;
            return Ok(Some((method, path.value())));
        }

        // #[request("VERB", "/path")]
        if ident == "request" {
            let (verb, path) = attr.parse_args_with(parse_request_args)?;

            let method = HttpMethod::parse(&verb.value()).ok_or_else(|| {
                syn::Error::new_spanned(
                    &verb,
                    format!(
                        "unsupported HTTP method: {}. Supported: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS",
                        verb.value()
                    ),
                )
            })?;

            return Ok(Some((method, path.value())));
        }
    }

    Ok(None)
}

/// Parse `("VERB", "/path")`.
fn parse_request_args(
    input: syn::parse::ParseStream<'_>,
) -> syn::Result<(syn::LitStr, syn::LitStr)> {
    let verb: syn::LitStr = input.parse()?;
    input.parse::<syn::Token![,]>()?;
    let path: syn::LitStr = input.parse()?;
    input.parse::<Option<syn::Token![,]>>()?;
    Ok((verb, path))
}

/// Parse method parameters from a trait method.
///
/// Parameters are classified as follows:
/// 1. An explicit attribute (`#[query]`, `#[body]`, etc.) wins
/// 2. A `Response` argument is a response slot
/// 3. An argument named after a URL placeholder is a path parameter
/// 4. Anything else stays unmarked and is only seen by the handler
fn parse_trait_method_params(
    method: &TraitItemFn,
    path_template: &str,
) -> syn::Result<Vec<MethodParam>> {
    let placeholders = extract_path_placeholders(path_template);
    let mut params = Vec::new();

    for input in &method.sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };

        let name = match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => pat_ident.ident.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected a plain argument name",
                ));
            }
        };
        let ty = (*pat_type.ty).clone();

        let mut explicit = None;
        for attr in &pat_type.attrs {
            if let Some(found) = parse_param_attr(attr)? {
                if explicit.is_some() {
                    return Err(syn::Error::new_spanned(
                        attr,
                        format!("argument `{name}` has more than one role attribute"),
                    ));
                }
                explicit = Some(found);
            }
        }

        let (kind, wire) = match explicit {
            Some(found) => found,
            None if is_response_type(&ty) => (ParamKind::Response, WireName::Identity),
            None if placeholders.contains(&name.to_string()) => {
                (ParamKind::Path, WireName::Identity)
            }
            None => (ParamKind::Unmarked, WireName::Identity),
        };

        params.push(MethodParam {
            name,
            ty,
            kind,
            wire,
        });
    }

    Ok(params)
}

/// Generate a clean trait without tether-specific attributes.
fn generate_clean_trait(
    vis: &syn::Visibility,
    name: &Ident,
    methods: &[TraitMethodInfo],
    original: &ItemTrait,
) -> TokenStream {
    let trait_attrs: Vec<_> = original
        .attrs
        .iter()
        .filter(|a| {
            let path = a.path();
            path.is_ident("doc") || path.is_ident("allow") || path.is_ident("cfg")
        })
        .collect();

    let method_signatures: Vec<_> = methods
        .iter()
        .map(|m| {
            let docs = &m.docs;
            let sig = clean_signature(&m.sig, &m.params);
            quote! {
                #(#docs)*
                #sig;
            }
        })
        .collect();

    quote! {
        #(#trait_attrs)*
        #[allow(async_fn_in_trait)]
        #vis trait #name {
            #(#method_signatures)*
        }
    }
}

/// Check if an attribute is a tether parameter attribute.
fn is_tether_param_attr(attr: &syn::Attribute) -> bool {
    let path = attr.path();
    PARAM_ATTRS.iter().any(|name| path.is_ident(name))
}

/// Strip tether attributes and response arguments from a method signature.
fn clean_signature(sig: &syn::Signature, params: &[MethodParam]) -> syn::Signature {
    let is_response_slot = |pat_type: &syn::PatType| {
        matches!(pat_type.pat.as_ref(), Pat::Ident(pat_ident)
            if params
                .iter()
                .any(|p| p.kind == ParamKind::Response && p.name == pat_ident.ident))
    };

    let mut clean_sig = sig.clone();
    clean_sig.inputs = sig
        .inputs
        .iter()
        .filter(|arg| !matches!(arg, FnArg::Typed(pat_type) if is_response_slot(pat_type)))
        .map(|arg| match arg {
            FnArg::Typed(pat_type) => {
                let mut clean = pat_type.clone();
                clean.attrs.retain(|attr| !is_tether_param_attr(attr));
                FnArg::Typed(clean)
            }
            FnArg::Receiver(receiver) => FnArg::Receiver(receiver.clone()),
        })
        .collect();
    clean_sig
}

/// Generate the trait implementation for the client struct.
fn generate_trait_impl(
    trait_name: &Ident,
    client_name: &Ident,
    methods: &[TraitMethodInfo],
) -> TokenStream {
    let method_impls: Vec<_> = methods
        .iter()
        .map(|m| {
            let sig = clean_signature(&m.sig, &m.params);
            let body = generate_method_body(m);

            quote! {
                #sig {
                    #body
                }
            }
        })
        .collect();

    quote! {
        impl<T: ::tether::HttpTransport> #trait_name for #client_name<T> {
            #(#method_impls)*
        }
    }
}

/// Generate the body of one client method.
///
/// Without a default body the final response is converted into the return
/// type. With one, the call goes through `Session::invoke` and the default
/// body runs as the handler unless the reply is direct.
fn generate_method_body(method: &TraitMethodInfo) -> TokenStream {
    let endpoint = &method.sig.ident;
    let arguments = generate_call_arguments(&method.params);
    let conversion = generate_return_conversion(analyze_return_type(&method.sig.output));

    let Some(handler) = &method.handler else {
        return quote! {
            let tether_arguments = #arguments;
            let response = self
                .session
                .send(&self.endpoints.#endpoint, tether_arguments)
                .await?;
            #conversion
        };
    };

    let bindings = generate_response_bindings(&method.params);
    let invocation = if method.params.iter().any(|p| p.kind == ParamKind::Response) {
        quote! { mut tether_invocation }
    } else {
        quote! { _ }
    };

    quote! {
        let tether_arguments = #arguments;
        match self
            .session
            .invoke(&self.endpoints.#endpoint, tether_arguments)
            .await?
        {
            ::tether::Reply::Direct(response) => {
                #conversion
            }
            ::tether::Reply::Handler(#invocation) => {
                #bindings
                #handler
            }
        }
    }
}

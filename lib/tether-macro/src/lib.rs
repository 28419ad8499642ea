//! Procedural macro for tether declarative HTTP clients.
//!
//! `#[tether]` turns an annotated trait into endpoint declarations and a
//! generated client. Inside the trait it reads:
//! - `#[get]`, `#[post]`, `#[put]`, `#[delete]`, `#[patch]`, `#[head]`,
//!   `#[options]` and `#[request("VERB", "/path")]` on methods
//! - `#[default_header("k", "v")]`, `#[default_query("k", "v")]`,
//!   `#[directly_response]` and `#[timeout("30s")]` on methods
//! - `#[header]`, `#[query]`, `#[path]`, `#[form]`, `#[body_json]`, `#[body]`
//!   and `#[response]` on arguments
//!
//! # Example
//!
//! ```ignore
//! use tether::prelude::*;
//!
//! #[tether(url = "https://metro.example.com")]
//! pub trait Metro {
//!     #[get("/metro/station")]
//!     async fn get_station(&self, #[query("name")] station_name: String) -> tether::Result<Station>;
//! }
//!
//! let metro = MetroClient::connect()?;
//! let station = metro.get_station("Gangnam".to_string()).await?;
//! ```

mod attrs;
mod codegen;
mod expand;

use proc_macro::TokenStream;

/// Mark a trait as a tether HTTP client.
///
/// This macro generates:
/// - A clean trait (without tether attributes or response arguments)
/// - `<Trait>Endpoints`, one public `RequestDescriptor` per method
/// - `<Trait>Client<T = HyperTransport>` implementing the trait through a `Session`
///
/// A method with a default body is a handler: the body runs once the
/// response is in, with `#[response]` arguments bound to it. A method
/// without one returns the response converted into its return type.
///
/// # Attributes
///
/// - `url` (required): The base URL used by `<Trait>Client::connect`
///
/// # Example
///
/// ```ignore
/// #[tether(url = "https://metro.example.com")]
/// pub trait Metro {
///     #[post("/metro/reports")]
///     async fn report(
///         &self,
///         #[body_json] station: String,
///         #[body_json] delay: u32,
///         #[response] response: tether::Response,
///     ) -> tether::Result<u16> {
///         Ok(response.status())
///     }
/// }
///
/// let mut metro = MetroClient::new(Session::connect("http://localhost:8080")?)?;
/// metro.endpoints_mut().report.before_hook(|mut request: WorkingRequest, path: String| async move {
///     request.set_header("X-Line", "2");
///     Ok::<_, tether::Error>((request, path))
/// });
/// ```
#[proc_macro_attribute]
pub fn tether(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_tether_trait(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

//! HTTP response handling.
//!
//! [`Response`] is what the transport returns and what after-hooks receive.
//! Besides status, headers and body it carries extensions, which after-hooks
//! use to attach decoded data (for example a validated response model).
//!
//! # Example
//!
//! ```ignore
//! let station: Station = response.error_for_status()?.json()?;
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use http::Extensions;

/// HTTP response with status, headers, body and extensions.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
    extensions: Extensions,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
            extensions: Extensions::new(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    ///
    /// Header names are matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Typed data attached by hooks.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to extensions.
    #[must_use]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 3xx.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.status >= 300 && self.status < 400
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Transform the body, keeping status, headers and extensions.
    pub fn map_body<F, B2>(self, f: F) -> Response<B2>
    where
        F: FnOnce(B) -> B2,
    {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
            extensions: self.extensions,
        }
    }
}

impl Response<Bytes> {
    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Turn a non-2xx response into [`Error::Http`](crate::Error::Http).
    ///
    /// # Errors
    ///
    /// Returns an HTTP error carrying the status, reason phrase and body.
    pub fn error_for_status(self) -> crate::Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown Status");
        Err(crate::Error::http_with_body(self.status, message, self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_basic() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        let response = Response::new(200, headers, Bytes::from(r#"{"id":1}"#));

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_status_checks() {
        assert!(Response::new(301, HashMap::new(), Bytes::new()).is_redirection());
        assert!(Response::new(404, HashMap::new(), Bytes::new()).is_client_error());
        assert!(Response::new(500, HashMap::new(), Bytes::new()).is_server_error());
    }

    #[test]
    fn response_json_and_text() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Station {
            id: u64,
            name: String,
        }

        let body = Bytes::from(r#"{"id":1,"name":"Gangnam"}"#);
        let response = Response::new(200, HashMap::new(), body);

        let station: Station = response.json().expect("deserialize");
        assert_eq!(
            station,
            Station {
                id: 1,
                name: "Gangnam".to_string()
            }
        );
        assert_eq!(response.text().expect("text"), r#"{"id":1,"name":"Gangnam"}"#);
    }

    #[test]
    fn error_for_status() {
        let ok = Response::new(204, HashMap::new(), Bytes::new());
        assert!(ok.error_for_status().is_ok());

        let err = Response::new(404, HashMap::new(), Bytes::from("missing"))
            .error_for_status()
            .expect_err("404");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");
        assert_eq!(err.body().map(|b| b.to_vec()), Some(b"missing".to_vec()));
    }

    #[test]
    fn extensions_follow_map_body() {
        let mut response = Response::new(200, HashMap::new(), Bytes::from("test"));
        response.extensions_mut().insert(7_u32);

        let mapped = response.map_body(|b| b.len());
        assert_eq!(*mapped.body(), 4);
        assert_eq!(mapped.extensions().get::<u32>(), Some(&7));
    }
}

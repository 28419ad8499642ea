//! Request bodies and body serialization utilities.

use bytes::Bytes;
use serde_json::Value;

use crate::{Form, Result};

/// The kind of body an endpoint produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyKind {
    /// No body.
    #[default]
    None,
    /// A JSON document (`application/json`).
    Json,
    /// A multipart form (`multipart/form-data`).
    Multipart,
    /// Raw bytes (`application/octet-stream`).
    Binary,
}

/// A request body before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A JSON document.
    Json(Value),
    /// A multipart form.
    Multipart(Form),
    /// Raw bytes.
    Binary(Bytes),
}

impl RequestBody {
    /// The kind of this body.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        match self {
            Self::Json(_) => BodyKind::Json,
            Self::Multipart(_) => BodyKind::Multipart,
            Self::Binary(_) => BodyKind::Binary,
        }
    }

    /// Encode into `(content type, bytes)`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn encode(&self) -> Result<(String, Bytes)> {
        match self {
            Self::Json(value) => Ok(("application/json".to_string(), to_json(value)?)),
            Self::Multipart(form) => Ok(form.encode()),
            Self::Binary(bytes) => Ok(("application/octet-stream".to_string(), bytes.clone())),
        }
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use tether_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Station { name: String }
///
/// let station = Station { name: "Gangnam".to_string() };
/// let bytes = to_json(&station).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Gangnam"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the field that failed
/// (e.g. `station.line`).
///
/// # Errors
///
/// Returns an error if JSON deserialization fails.
///
/// # Example
///
/// ```
/// use tether_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Station { name: String }
///
/// let station: Station = from_json(br#"{"name":"Gangnam"}"#).expect("deserialize");
/// assert_eq!(station, Station { name: "Gangnam".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Deserialize an already-parsed JSON value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if the value does not match `T`.
pub fn from_json_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Part;

    #[test]
    fn json_body_encode() {
        let body = RequestBody::Json(json!({"name": "Gangnam"}));
        assert_eq!(body.kind(), BodyKind::Json);

        let (content_type, bytes) = body.encode().expect("encode");
        assert_eq!(content_type, "application/json");
        assert_eq!(bytes.as_ref(), br#"{"name":"Gangnam"}"#);
    }

    #[test]
    fn multipart_body_encode() {
        let form = Form::with_boundary("b0").part(Part::text("name", "Gangnam"));
        let body = RequestBody::Multipart(form);
        assert_eq!(body.kind(), BodyKind::Multipart);

        let (content_type, bytes) = body.encode().expect("encode");
        assert_eq!(content_type, "multipart/form-data; boundary=b0");
        assert!(String::from_utf8_lossy(&bytes).contains("name=\"name\""));
    }

    #[test]
    fn binary_body_encode() {
        let body = RequestBody::Binary(Bytes::from_static(b"\x00\x01"));
        let (content_type, bytes) = body.encode().expect("encode");
        assert_eq!(content_type, "application/octet-stream");
        assert_eq!(bytes.as_ref(), b"\x00\x01");
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Line {
            #[allow(dead_code)]
            id: u32,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Station {
            #[allow(dead_code)]
            line: Line,
        }

        let err = from_json::<Station>(br#"{"line":{}}"#).expect_err("missing id");
        let msg = err.to_string();
        assert!(msg.contains("line"), "Expected path 'line' in error: {msg}");
        assert!(msg.contains("id"), "Expected field 'id' in error: {msg}");
    }

    #[test]
    fn from_json_value_type_error() {
        let err = from_json_value::<Vec<u32>>(json!([1, "two"])).expect_err("string in list");
        assert!(err.to_string().contains("JSON deserialization error at '[1]'"));
    }
}

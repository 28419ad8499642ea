//! Multipart form data.
//!
//! A [`Form`] is what form-field parameters are collected into, and what a
//! raw body parameter declared as a form must be.
//!
//! ```
//! use tether_core::{Form, Part};
//!
//! let form = Form::with_boundary("xyz")
//!     .text("station", "Gangnam")
//!     .part(Part::file("map", "line2.png", vec![0x89, 0x50]));
//!
//! let (content_type, _body) = form.encode();
//! assert_eq!(content_type, "multipart/form-data; boundary=xyz");
//! ```

use bytes::{BufMut, Bytes, BytesMut};

/// A single part in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// A part with no content type.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// A `text/plain; charset=utf-8` part.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Bytes::from(value.into())).with_content_type("text/plain; charset=utf-8")
    }

    /// An `application/json` part.
    #[must_use]
    pub fn json(name: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::new(name, Bytes::from(value.to_string())).with_content_type("application/json")
    }

    /// An `application/octet-stream` part.
    #[must_use]
    pub fn bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(name, data).with_content_type("application/octet-stream")
    }

    /// A file part; the content type is guessed from the extension.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename);
        Self::new(name, data)
            .with_filename(filename)
            .with_content_type(content_type)
    }

    /// Set the filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename, if set.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

fn guess_content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "csv" => "text/csv",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// A multipart form.
///
/// Two forms are equal when they carry the same parts; the boundary is only
/// compared when both forms set one explicitly.
#[derive(Debug, Clone, Default)]
pub struct Form {
    parts: Vec<Part>,
    boundary: Option<String>,
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        let boundaries_match = match (&self.boundary, &other.boundary) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        boundaries_match && self.parts == other.parts
    }
}

impl Form {
    /// An empty form; the boundary is generated on encoding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty form with a fixed boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: Some(boundary.into()),
        }
    }

    /// Add a part.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.push(part);
        self
    }

    /// Add a text field.
    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    /// Add a file.
    #[must_use]
    pub fn file(
        self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.part(Part::file(name, filename, data))
    }

    /// Add a part in place.
    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Remove every part with the given name.
    pub fn remove(&mut self, name: &str) {
        self.parts.retain(|part| part.name != name);
    }

    /// Parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns `true` if the form has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Encode into `(content type, body)`.
    ///
    /// The content type is `multipart/form-data; boundary=<boundary>`.
    #[must_use]
    pub fn encode(&self) -> (String, Bytes) {
        let boundary = self.boundary.clone().unwrap_or_else(generate_boundary);
        let content_type = format!("multipart/form-data; boundary={boundary}");

        let mut buf = BytesMut::new();
        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(part.name.as_bytes());
            buf.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(filename.as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(content_type.as_bytes());
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"--");
        buf.put_slice(boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        (content_type, buf.freeze())
    }
}

fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    format!("----TetherBoundary{timestamp:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_constructors() {
        let part = Part::text("field", "value");
        assert_eq!(part.name(), "field");
        assert_eq!(part.data().as_ref(), b"value");
        assert_eq!(part.content_type(), Some("text/plain; charset=utf-8"));
        assert!(part.filename().is_none());

        let part = Part::json("meta", &serde_json::json!({"line": 2}));
        assert_eq!(part.data().as_ref(), br#"{"line":2}"#);
        assert_eq!(part.content_type(), Some("application/json"));

        let part = Part::file("upload", "Photo.JPG", vec![0xFF, 0xD8]);
        assert_eq!(part.filename(), Some("Photo.JPG"));
        assert_eq!(part.content_type(), Some("image/jpeg"));
    }

    #[test]
    fn guess_content_type_without_extension() {
        assert_eq!(guess_content_type("README"), "application/octet-stream");
        assert_eq!(guess_content_type("data.csv"), "text/csv");
    }

    #[test]
    fn form_encode() {
        let (content_type, body) = Form::with_boundary("boundary123")
            .text("field", "value")
            .file("upload", "test.txt", "file content")
            .encode();

        assert_eq!(content_type, "multipart/form-data; boundary=boundary123");

        let body = String::from_utf8_lossy(&body);
        assert!(body.starts_with("--boundary123\r\n"));
        assert!(body.contains("Content-Disposition: form-data; name=\"field\"\r\n"));
        assert!(body.contains("name=\"upload\"; filename=\"test.txt\""));
        assert!(body.contains("Content-Type: text/plain\r\n"));
        assert!(body.ends_with("--boundary123--\r\n"));
    }

    #[test]
    fn generated_boundary() {
        let (content_type, _) = Form::new().encode();
        assert!(content_type.starts_with("multipart/form-data; boundary=----TetherBoundary"));
    }

    #[test]
    fn form_equality_ignores_generated_boundary() {
        let a = Form::new().text("name", "Gangnam");
        let b = Form::with_boundary("fixed").text("name", "Gangnam");
        assert_eq!(a, b);
        assert_ne!(b, Form::with_boundary("other").text("name", "Gangnam"));
        assert_ne!(a, Form::new().text("name", "Jamsil"));
    }
}

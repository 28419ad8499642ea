//! Path templates with `{name}` placeholders.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::BindingError;
use crate::role::Role;

/// Characters escaped in a substituted path segment.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// An endpoint path before placeholder substitution.
///
/// It is also stored in request extensions so middleware can report the
/// template (`/stations/{id}`) rather than the rendered path.
///
/// ```
/// use tether_core::PathTemplate;
///
/// let template = PathTemplate::new("/lines/{line}/stations/{id}");
/// assert_eq!(template.placeholders(), ["line", "id"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate {
    template: String,
    placeholders: Vec<String>,
}

impl PathTemplate {
    /// Parse a template.
    ///
    /// A `{` without a matching `}` is kept as literal text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut placeholders = Vec::new();
        let mut rest = template.as_str();
        while let Some(start) = rest.find('{') {
            let after = rest.get(start + 1..).unwrap_or_default();
            let Some(end) = after.find('}') else {
                break;
            };
            let name = after.get(..end).unwrap_or_default();
            if !name.is_empty() && !placeholders.iter().any(|p| p == name) {
                placeholders.push(name.to_string());
            }
            rest = after.get(end + 1..).unwrap_or_default();
        }
        Self {
            template,
            placeholders,
        }
    }

    /// The template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Substitute every placeholder.
    ///
    /// `lookup` returns the text for a placeholder, or `None` when no value
    /// is bound. Values are percent-encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingPathArgument`] for the first
    /// placeholder without a value, and [`BindingError::UnsupportedValue`]
    /// for a `.` or `..` value, which URL resolution would drop.
    pub fn render<F>(&self, mut lookup: F) -> Result<String, BindingError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut path = self.template.clone();
        for placeholder in &self.placeholders {
            let value =
                lookup(placeholder.as_str()).ok_or_else(|| BindingError::MissingPathArgument {
                    placeholder: placeholder.clone(),
                })?;
            if is_dot_segment(&value) {
                return Err(BindingError::UnsupportedValue {
                    parameter: placeholder.clone(),
                    role: Role::Path,
                    found: "a dot segment",
                });
            }
            let encoded = utf8_percent_encode(&value, PATH_SEGMENT_ENCODE_SET).to_string();
            path = path.replace(&format!("{{{placeholder}}}"), &encoded);
        }
        Ok(path)
    }
}

fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        &self.template
    }
}

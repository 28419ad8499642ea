//! Wire-name transforms.
//!
//! A [`NameTransform`] turns a declared parameter name into the literal key
//! used on the wire (header name, query key, JSON or form field).

/// Strategy used to derive a wire name from a parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NameTransform {
    /// Use the parameter name unchanged.
    #[default]
    Identity,
    /// `station_name` becomes `stationName`.
    CamelCase,
    /// `station_name` becomes `StationName`.
    PascalCase,
    /// Use an explicit wire name.
    Custom(String),
}

impl NameTransform {
    /// Apply the transform to a parameter name.
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Identity => name.to_string(),
            Self::CamelCase => to_camel_case(name),
            Self::PascalCase => to_pascal_case(name),
            Self::Custom(custom) => custom.clone(),
        }
    }

    /// Returns `true` for [`NameTransform::Identity`].
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

/// Convert a `snake_case` (or already `PascalCase`) name to `PascalCase`.
///
/// Underscores are removed and the letter following each one is upper-cased.
///
/// ```
/// use tether_core::to_pascal_case;
///
/// assert_eq!(to_pascal_case("station_name"), "StationName");
/// assert_eq!(to_pascal_case("stationName"), "StationName");
/// ```
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a `snake_case` (or `PascalCase`) name to `camelCase`.
///
/// ```
/// use tether_core::to_camel_case;
///
/// assert_eq!(to_camel_case("station_name"), "stationName");
/// assert_eq!(to_camel_case("StationName"), "stationName");
/// ```
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case() {
        assert_eq!(to_camel_case("station_name"), "stationName");
        assert_eq!(to_camel_case("test_form"), "testForm");
        assert_eq!(to_camel_case("name"), "name");
        assert_eq!(to_camel_case("line_2_code"), "line2Code");
    }

    #[test]
    fn pascal_case() {
        assert_eq!(to_pascal_case("station_name"), "StationName");
        assert_eq!(to_pascal_case("test_query"), "TestQuery");
        assert_eq!(to_pascal_case("_private"), "Private");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn camel_of_pascal_starts_lowercase() {
        for name in [
            "station_name",
            "StationName",
            "x",
            "_leading",
            "a__b",
            "URL",
            "already_camelCase",
        ] {
            let camel = to_camel_case(&to_pascal_case(name));
            let first = camel.chars().next().expect("non-empty");
            assert!(!first.is_uppercase(), "{name} -> {camel}");
        }
    }

    #[test]
    fn transform_apply() {
        assert_eq!(NameTransform::Identity.apply("station_name"), "station_name");
        assert_eq!(NameTransform::CamelCase.apply("station_name"), "stationName");
        assert_eq!(NameTransform::PascalCase.apply("station_name"), "StationName");
        assert_eq!(
            NameTransform::Custom("name".to_string()).apply("station_name"),
            "name"
        );
        assert!(NameTransform::default().is_identity());
    }
}

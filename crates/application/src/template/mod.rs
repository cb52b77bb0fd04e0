//! URL template resolution
//!
//! Templates such as `/users/{id}` are resolved by substituting URL-encoded values
//! for their placeholders.

pub mod parser;

pub use parser::{
    Placeholder, has_placeholders, is_valid_placeholder_name, parse_placeholders,
    placeholder_names,
};

/// Sub-delimiters left literal in encoded path segments.
const LITERAL_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encodes a path segment value, keeping `!'()*` readable.
#[must_use]
pub fn encode_segment(value: &str) -> String {
    LITERAL_MARKS
        .iter()
        .fold(urlencoding::encode(value).into_owned(), |encoded, (escape, mark)| {
            encoded.replace(escape, mark)
        })
}

/// Outcome of substituting parameters into a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The path after substitution.
    pub path: String,
    /// Placeholders still present after substitution.
    pub unresolved: Vec<String>,
}

/// Substitutes each `(name, value)` pair into `template`.
///
/// The first `{name}` occurrence is replaced with the encoded value. Parameters
/// without a matching placeholder are ignored.
pub fn resolve_path<'a, I>(template: &str, params: I) -> ResolvedPath
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut path = template.to_string();
    for (name, value) in params {
        path = path.replacen(&format!("{{{name}}}"), &encode_segment(value), 1);
    }
    let unresolved = placeholder_names(&path);
    ResolvedPath { path, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_single_param() {
        let resolved = resolve_path("/users/{id}", [("id", "42")]);
        assert_eq!(resolved.path, "/users/42");
        assert!(resolved.unresolved.is_empty());
    }

    #[test]
    fn test_values_are_url_encoded() {
        let resolved = resolve_path("/files/{name}", [("name", "a b/c")]);
        assert_eq!(resolved.path, "/files/a%20b%2Fc");
    }

    #[test]
    fn test_marks_stay_literal() {
        assert_eq!(encode_segment("O'Brien (x)!*"), "O'Brien%20(x)!*");
        assert_eq!(encode_segment("100%21"), "100%2521");
        let resolved = resolve_path("/people/{name}", [("name", "O'Brien (x)!")]);
        assert_eq!(resolved.path, "/people/O'Brien%20(x)!");
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let resolved = resolve_path("/{id}/copy/{id}", [("id", "7")]);
        assert_eq!(resolved.path, "/7/copy/{id}");
        assert_eq!(resolved.unresolved, vec!["id"]);
    }

    #[test]
    fn test_unknown_param_ignored_and_missing_reported() {
        let resolved = resolve_path("/orgs/{org}/users/{id}", [("id", "1"), ("other", "x")]);
        assert_eq!(resolved.path, "/orgs/{org}/users/1");
        assert_eq!(resolved.unresolved, vec!["org"]);
    }
}

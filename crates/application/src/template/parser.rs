//! Placeholder parser for `{name}` syntax
//!
//! Parses URL templates to extract placeholder references with their positions.

use std::ops::Range;

/// A parsed placeholder reference in a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The placeholder name (without braces).
    pub name: String,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl Placeholder {
    /// Creates a new placeholder reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a template and extracts all placeholder references.
///
/// # Examples
///
/// ```
/// use docspec_application::template::parse_placeholders;
///
/// let refs = parse_placeholders("/users/{id}/posts/{post_id}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "id");
/// assert_eq!(refs[1].name, "post_id");
/// ```
#[must_use]
pub fn parse_placeholders(input: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut open: Option<usize> = None;

    for (i, ch) in input.char_indices() {
        match ch {
            // An inner `{` restarts the candidate.
            '{' => open = Some(i),
            '}' => {
                if let Some(start) = open.take() {
                    let name = &input[start + 1..i];
                    if is_valid_placeholder_name(name) {
                        placeholders.push(Placeholder::new(name, start..i + 1));
                    }
                }
            }
            _ => {}
        }
    }

    placeholders
}

/// Validates a placeholder name.
/// Valid names start with a letter or underscore, followed by alphanumerics,
/// underscores or hyphens.
#[must_use]
pub fn is_valid_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Returns true if the input contains any placeholder.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    !parse_placeholders(input).is_empty()
}

/// Extracts just the placeholder names.
#[must_use]
pub fn placeholder_names(input: &str) -> Vec<String> {
    parse_placeholders(input)
        .into_iter()
        .map(|p| p.name)
        .collect()
}

//! Location of the node currently being compared.

use std::fmt;

/// Accumulated textual location inside a response body.
///
/// The root is the empty string. Object keys append as `.key` (bare at the root) and array
/// indices as `[i]`, so a nested location reads like `a[0].b`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValidationPath(String);

impl ValidationPath {
    /// The empty root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Returns the path extended with an object key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    /// Returns the path extended with an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns true at the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Options attached to an API declaration.

use crate::request::RequestConfig;

/// Name, tag and summary of a declared API, plus defaults for every test of it.
///
/// The name is mandatory; declaring an API without one fails.
#[derive(Debug, Clone, Default)]
pub struct ApiDocOptions {
    /// API name, used as the suite title.
    pub name: Option<String>,
    /// Grouping tag.
    pub tag: Option<String>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Configuration every test of this API starts from.
    pub defaults: Option<RequestConfig>,
}

impl ApiDocOptions {
    /// Creates options with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the default request configuration.
    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestConfig) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Returns the name if present and not blank.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder() {
        let options = ApiDocOptions::named("Users")
            .with_tag("user")
            .with_summary("User lookup");
        assert_eq!(options.name(), Some("Users"));
        assert_eq!(options.tag.as_deref(), Some("user"));
        assert_eq!(options.summary.as_deref(), Some("User lookup"));
        assert!(options.defaults.is_none());
    }

    #[test]
    fn test_blank_name_counts_as_missing() {
        assert_eq!(ApiDocOptions::named("  ").name(), None);
        assert_eq!(ApiDocOptions::default().name(), None);
    }
}

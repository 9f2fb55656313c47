//! Documentation-link lookup for diagnostics.
//!
//! Each marker carries a link to documentation for the error it reports.
//! Lookup is a pluggable rule table keyed by message pattern, falling back
//! to the generic PPL syntax documentation when nothing matches.

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic PPL syntax documentation, the fallback for unmatched messages.
pub const PPL_DOC_URL: &str =
    "https://opensearch.org/docs/latest/search-plugins/sql/ppl/syntax/";

/// Label shown on the marker's code link.
pub const DOC_LINK_TITLE: &str = "View Documentation";

static FALLBACK: Lazy<DocLink> = Lazy::new(|| DocLink {
    title: DOC_LINK_TITLE.to_string(),
    url: PPL_DOC_URL.to_string(),
});

/// A titled documentation URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLink {
    pub title: String,
    pub url: String,
}

/// Rule table mapping error-message patterns to documentation links.
///
/// Rules are tried in registration order; the first match wins.
#[derive(Debug, Default)]
pub struct DocLinkRegistry {
    rules: Vec<(Regex, DocLink)>,
}

impl DocLinkRegistry {
    /// An empty registry: every message resolves to the generic link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern rule.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is not a valid regex.
    pub fn register(
        &mut self,
        pattern: &str,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<(), regex::Error> {
        let regex = Regex::new(pattern)?;
        self.rules.push((
            regex,
            DocLink {
                title: title.into(),
                url: url.into(),
            },
        ));
        Ok(())
    }

    /// Resolve the documentation link for an error message.
    pub fn documentation_link(&self, message: &str) -> &DocLink {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(message))
            .map(|(_, link)| link)
            .unwrap_or(&FALLBACK)
    }
}

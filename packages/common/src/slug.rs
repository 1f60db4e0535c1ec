use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize free text into a URL slug.
///
/// Alphanumerics are lowercased, every other run of characters collapses into
/// a single `-`, and leading/trailing dashes are dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Identifier used as the `utm_campaign` tag and as the permalink.
///
/// Purely numeric slugs are prefixed with `issue-`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignSlug(String);

impl CampaignSlug {
    pub fn new(slug: &str) -> Self {
        if !slug.is_empty() && slug.bytes().all(|b| b.is_ascii_digit()) {
            Self(format!("issue-{}", slug))
        } else {
            Self(slug.to_string())
        }
    }

    /// Slugify raw user input, then apply the numeric rule
    pub fn from_input(raw: &str) -> Self {
        Self::new(&slugify(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CampaignSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_slug_is_prefixed() {
        assert_eq!(CampaignSlug::new("123").as_str(), "issue-123");
    }

    #[test]
    fn test_non_numeric_slug_passes_through() {
        assert_eq!(CampaignSlug::new("my-issue").as_str(), "my-issue");
        assert_eq!(CampaignSlug::new("12a").as_str(), "12a");
        assert!(CampaignSlug::new("").is_empty());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  My Great Issue!! "), "my-great-issue");
        assert_eq!(slugify("42"), "42");
        assert_eq!(slugify("--a__b--"), "a-b");
        assert_eq!(CampaignSlug::from_input(" 42 ").as_str(), "issue-42");
    }
}

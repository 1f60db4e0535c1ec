//! Link tags: freeform entry plus a fixed catalog of known tags.

use serde::{Deserialize, Serialize};

/// Split freeform tag input on commas and whitespace.
///
/// Empty fragments are dropped. Duplicates within the text are kept.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge freeform tags with the checked known tags.
///
/// Freeform tags keep their order and come first. Checked known tags follow
/// in declaration order, skipping any value the freeform list already has.
/// Comparison is case-sensitive.
pub fn merge_tags<S: AsRef<str>>(freeform: &str, checked_known: &[S]) -> Vec<String> {
    let mut tags = split_tags(freeform);
    let freeform_len = tags.len();
    for known in checked_known {
        let known = known.as_ref();
        if !tags[..freeform_len].iter().any(|tag| tag == known) {
            tags.push(known.to_string());
        }
    }
    tags
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownTag {
    pub slug: String,
    pub title: String,
}

impl KnownTag {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }
}

const BUILTIN_TAGS: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("css", "CSS"),
    ("html", "HTML"),
    ("nodejs", "Node.js"),
    ("performance", "Performance"),
    ("accessibility", "Accessibility"),
    ("security", "Security"),
    ("tooling", "Tooling"),
    ("testing", "Testing"),
    ("design", "Design"),
    ("frameworks", "Frameworks"),
    ("es6", "ES6"),
];

/// Ordered catalog of known tags offered as checkboxes on link sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownTagCatalog(Vec<KnownTag>);

impl KnownTagCatalog {
    pub fn new(tags: Vec<KnownTag>) -> Self {
        Self(tags)
    }

    pub fn builtin() -> Self {
        Self(
            BUILTIN_TAGS
                .iter()
                .map(|(slug, title)| KnownTag::new(*slug, *title))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn get(&self, slug: &str) -> Option<&KnownTag> {
        self.0.iter().find(|tag| tag.slug == slug)
    }
}

impl Default for KnownTagCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_drops_known_duplicates() {
        assert_eq!(merge_tags("a,b", &["b", "c"]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_keeps_freeform_order_and_duplicates() {
        assert_eq!(merge_tags("z, a z", &["a"]), vec!["z", "a", "z"]);
    }

    #[test]
    fn test_merge_is_case_sensitive() {
        assert_eq!(merge_tags("CSS", &["css"]), vec!["CSS", "css"]);
    }

    #[test]
    fn test_split_ignores_empty_fragments() {
        assert_eq!(split_tags(" ,a,,  b ,"), vec!["a", "b"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = KnownTagCatalog::builtin();
        assert!(catalog.contains("css"));
        assert_eq!(catalog.get("nodejs").unwrap().title, "Node.js");
        assert!(!catalog.contains("cobol"));
    }
}

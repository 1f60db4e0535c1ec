//! # Sections
//!
//! A weekly issue is an ordered list of typed sections. The kind of a section
//! never changes after creation; switching kinds means removing the section
//! and inserting a new one.
//!
//! Sections serialize as plain records tagged by `type`:
//!
//! ```json
//! { "type": "header", "size": 2, "text": "Hi", "foreground": "#000", "background": "#fff" }
//! { "type": "markdown", "text": "**bold**" }
//! ```

use crate::error::ModelError;
use crate::result::ModelResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder attribution link seeded into new link sections
pub const DEFAULT_SOURCE_HREF: &str = "https://twitter.com/";

/// One typed content block of an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Section {
    Header(HeaderSection),
    Markdown(MarkdownSection),
    Link(LinkSection),
    Styles(StylesSection),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Header(_) => SectionKind::Header,
            Section::Markdown(_) => SectionKind::Markdown,
            Section::Link(_) => SectionKind::Link,
            Section::Styles(_) => SectionKind::Styles,
        }
    }

    /// Record a freshly created section of `kind` starts from.
    ///
    /// Link sections point their source at a placeholder attribution link;
    /// every other kind starts out empty.
    pub fn seed(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Header => Section::Header(HeaderSection::default()),
            SectionKind::Markdown => Section::Markdown(MarkdownSection::default()),
            SectionKind::Link => Section::Link(LinkSection {
                source_href: DEFAULT_SOURCE_HREF.to_string(),
                ..LinkSection::default()
            }),
            SectionKind::Styles => Section::Styles(StylesSection::default()),
        }
    }

    pub fn as_link(&self) -> Option<&LinkSection> {
        match self {
            Section::Link(link) => Some(link),
            _ => None,
        }
    }
}

/// Discriminant of [`Section`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Markdown,
    Link,
    Styles,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Header,
        SectionKind::Markdown,
        SectionKind::Link,
        SectionKind::Styles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Markdown => "markdown",
            SectionKind::Link => "link",
            SectionKind::Styles => "styles",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownSectionKind(s.to_string()))
    }
}

/// Heading size, `1` through `6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u8) -> ModelResult<Self> {
        if (1..=6).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ModelError::InvalidHeadingLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSection {
    pub size: HeadingLevel,
    pub text: String,
    pub foreground: String,
    pub background: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownSection {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkSection {
    pub subtype: LinkSubtype,
    pub title: String,
    pub href: String,
    pub foreground: String,
    pub background: String,
    pub source: String,
    pub source_href: String,
    pub image: String,
    pub sponsored: bool,
    pub tags: Vec<String>,
    pub description: String,
}

/// Placement of a link inside the issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSubtype {
    #[default]
    Original,
    Suggestion,
    Primary,
    Secondary,
    Job,
}

impl LinkSubtype {
    pub const ALL: [LinkSubtype; 5] = [
        LinkSubtype::Original,
        LinkSubtype::Suggestion,
        LinkSubtype::Primary,
        LinkSubtype::Secondary,
        LinkSubtype::Job,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkSubtype::Original => "original",
            LinkSubtype::Suggestion => "suggestion",
            LinkSubtype::Primary => "primary",
            LinkSubtype::Secondary => "secondary",
            LinkSubtype::Job => "job",
        }
    }
}

impl FromStr for LinkSubtype {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkSubtype::ALL
            .into_iter()
            .find(|subtype| subtype.as_str() == s)
            .ok_or_else(|| ModelError::UnknownLinkSubtype(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesSection {
    pub styles: String,
}

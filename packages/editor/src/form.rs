//! # Section forms
//!
//! Editable state of one section as the author sees it. Most kinds edit
//! their record directly; link sections split tags into freeform text plus
//! one checkbox per known tag.
//!
//! [`SectionForm::hydrate`] builds a form from a stored record and
//! [`SectionForm::extract`] reads the record back. Extraction never computes
//! derived values such as summaries.

use crate::mutations::MutationError;
use serde::{Deserialize, Serialize};
use weekly_common::{
    merge_tags, HeaderSection, HeadingLevel, KnownTagCatalog, LinkSection, LinkSubtype,
    MarkdownSection, Section, SectionKind, StylesSection,
};

/// Editable control of a section form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Size,
    Text,
    Foreground,
    Background,
    Subtype,
    Title,
    Href,
    Source,
    SourceHref,
    Image,
    Sponsored,
    Tags,
    Description,
    Styles,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Size => "size",
            Field::Text => "text",
            Field::Foreground => "foreground",
            Field::Background => "background",
            Field::Subtype => "subtype",
            Field::Title => "title",
            Field::Href => "href",
            Field::Source => "source",
            Field::SourceHref => "sourceHref",
            Field::Image => "image",
            Field::Sponsored => "sponsored",
            Field::Tags => "tags",
            Field::Description => "description",
            Field::Styles => "styles",
        }
    }
}

/// Known-tag checkbox of a link form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCheckbox {
    pub slug: String,
    pub title: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkForm {
    pub subtype: LinkSubtype,
    pub title: String,
    pub href: String,
    pub foreground: String,
    pub background: String,
    pub source: String,
    pub source_href: String,
    pub image: String,
    pub sponsored: bool,
    /// Freeform tag input
    pub tags_text: String,
    /// One checkbox per catalog entry, in catalog order
    pub known_tags: Vec<TagCheckbox>,
    pub description: String,
}

impl LinkForm {
    /// Build the form for `link`. Stored tags found in `catalog` become
    /// checked boxes; the rest are written into the freeform text.
    pub fn hydrate(link: &LinkSection, catalog: &KnownTagCatalog) -> Self {
        let known_tags = catalog
            .iter()
            .map(|known| TagCheckbox {
                slug: known.slug.clone(),
                title: known.title.clone(),
                checked: link.tags.iter().any(|tag| *tag == known.slug),
            })
            .collect();
        let freeform: Vec<&str> = link
            .tags
            .iter()
            .filter(|tag| !catalog.contains(tag))
            .map(String::as_str)
            .collect();

        Self {
            subtype: link.subtype,
            title: link.title.clone(),
            href: link.href.clone(),
            foreground: link.foreground.clone(),
            background: link.background.clone(),
            source: link.source.clone(),
            source_href: link.source_href.clone(),
            image: link.image.clone(),
            sponsored: link.sponsored,
            tags_text: freeform.join(", "),
            known_tags,
            description: link.description.clone(),
        }
    }

    pub fn checked_tags(&self) -> Vec<&str> {
        self.known_tags
            .iter()
            .filter(|checkbox| checkbox.checked)
            .map(|checkbox| checkbox.slug.as_str())
            .collect()
    }

    pub fn extract(&self) -> LinkSection {
        LinkSection {
            subtype: self.subtype,
            title: self.title.clone(),
            href: self.href.clone(),
            foreground: self.foreground.clone(),
            background: self.background.clone(),
            source: self.source.clone(),
            source_href: self.source_href.clone(),
            image: self.image.clone(),
            sponsored: self.sponsored,
            tags: merge_tags(&self.tags_text, &self.checked_tags()),
            description: self.description.clone(),
        }
    }

    /// Check or uncheck a known tag; returns false when the slug has no box
    pub fn set_known_tag(&mut self, slug: &str, checked: bool) -> bool {
        match self.known_tags.iter_mut().find(|checkbox| checkbox.slug == slug) {
            Some(checkbox) => {
                checkbox.checked = checked;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionForm {
    Header(HeaderSection),
    Markdown(MarkdownSection),
    Link(LinkForm),
    Styles(StylesSection),
}

impl SectionForm {
    pub fn hydrate(section: &Section, catalog: &KnownTagCatalog) -> Self {
        match section {
            Section::Header(header) => SectionForm::Header(header.clone()),
            Section::Markdown(markdown) => SectionForm::Markdown(markdown.clone()),
            Section::Link(link) => SectionForm::Link(LinkForm::hydrate(link, catalog)),
            Section::Styles(styles) => SectionForm::Styles(styles.clone()),
        }
    }

    pub fn extract(&self) -> Section {
        match self {
            SectionForm::Header(header) => Section::Header(header.clone()),
            SectionForm::Markdown(markdown) => Section::Markdown(markdown.clone()),
            SectionForm::Link(link) => Section::Link(link.extract()),
            SectionForm::Styles(styles) => Section::Styles(styles.clone()),
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            SectionForm::Header(_) => SectionKind::Header,
            SectionForm::Markdown(_) => SectionKind::Markdown,
            SectionForm::Link(_) => SectionKind::Link,
            SectionForm::Styles(_) => SectionKind::Styles,
        }
    }

    pub fn as_link(&self) -> Option<&LinkForm> {
        match self {
            SectionForm::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_link_mut(&mut self) -> Option<&mut LinkForm> {
        match self {
            SectionForm::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Whether `field` is one of this form's controls
    pub fn has_field(&self, field: Field) -> bool {
        match self {
            SectionForm::Header(_) => matches!(
                field,
                Field::Size | Field::Text | Field::Foreground | Field::Background
            ),
            SectionForm::Markdown(_) => field == Field::Text,
            SectionForm::Link(_) => !matches!(field, Field::Size | Field::Text | Field::Styles),
            SectionForm::Styles(_) => field == Field::Styles,
        }
    }

    /// Parse `value` the way its control would and store it
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), MutationError> {
        if !self.has_field(field) {
            return Err(MutationError::FieldNotApplicable {
                field,
                kind: self.kind(),
            });
        }
        let invalid = || MutationError::InvalidValue {
            field: field.as_str(),
            value: value.to_string(),
        };

        match self {
            SectionForm::Header(header) => match field {
                Field::Size => {
                    header.size = value
                        .trim()
                        .parse::<u8>()
                        .ok()
                        .and_then(|level| HeadingLevel::new(level).ok())
                        .ok_or_else(invalid)?;
                }
                Field::Text => header.text = value.to_string(),
                Field::Foreground => header.foreground = value.to_string(),
                _ => header.background = value.to_string(),
            },
            SectionForm::Markdown(markdown) => markdown.text = value.to_string(),
            SectionForm::Styles(styles) => styles.styles = value.to_string(),
            SectionForm::Link(link) => match field {
                // An empty selector falls back to the default subtype.
                Field::Subtype if value.is_empty() => link.subtype = LinkSubtype::default(),
                Field::Subtype => link.subtype = value.parse().map_err(|_| invalid())?,
                Field::Title => link.title = value.to_string(),
                Field::Href => link.href = value.to_string(),
                Field::Foreground => link.foreground = value.to_string(),
                Field::Background => link.background = value.to_string(),
                Field::Source => link.source = value.to_string(),
                Field::SourceHref => link.source_href = value.to_string(),
                Field::Image => link.image = value.to_string(),
                Field::Sponsored => link.sponsored = parse_flag(value).ok_or_else(invalid)?,
                Field::Tags => link.tags_text = value.to_string(),
                _ => link.description = value.to_string(),
            },
        }
        Ok(())
    }
}

/// Checkbox values as submitted by a form
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

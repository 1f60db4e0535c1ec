//! # Document Mutations
//!
//! Every change to an issue document goes through a [`Mutation`]. Mutations
//! validate before they touch the document, so a failed mutation leaves it
//! unchanged.
//!
//! ## Section lifecycle
//!
//! - `InsertSection` adds a placeholder at an index; the kind is fixed from
//!   then on.
//! - `CompleteRender` swaps a placeholder for its rendered form and expands
//!   it. A placeholder removed in the meantime is reported as not found.
//! - `MoveSection` relocates a section; `RemoveSection` drops it.
//!
//! ## Field edits
//!
//! `SetField` and `ToggleKnownTag` edit a rendered section's form.
//! `SetIssueField` edits slug, status, summary and the campaign flags.

use crate::document::{Document, SectionId, SectionSlot, SlotContent};
use crate::form::{parse_flag, Field, SectionForm};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use weekly_common::{IssueStatus, Section, SectionKind};

/// Issue-level field edited outside the sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueField {
    Slug,
    Status,
    Summary,
    Email,
    Tweet,
    Fb,
    Echojs,
    Hn,
    Lobsters,
}

impl IssueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueField::Slug => "slug",
            IssueField::Status => "status",
            IssueField::Summary => "summary",
            IssueField::Email => "email",
            IssueField::Tweet => "tweet",
            IssueField::Fb => "fb",
            IssueField::Echojs => "echojs",
            IssueField::Hn => "hn",
            IssueField::Lobsters => "lobsters",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert a placeholder seeded with `section` at `index`
    InsertSection {
        id: SectionId,
        index: usize,
        section: Section,
    },

    /// Replace a placeholder with its rendered form
    CompleteRender { id: SectionId, form: SectionForm },

    /// Move a section so it ends up at `index`
    MoveSection { id: SectionId, index: usize },

    RemoveSection { id: SectionId },

    SetField {
        id: SectionId,
        field: Field,
        value: String,
    },

    ToggleKnownTag {
        id: SectionId,
        slug: String,
        checked: bool,
    },

    SetIssueField { field: IssueField, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Section not found: {0}")]
    SectionNotFound(SectionId),

    #[error("Section already exists: {0}")]
    DuplicateSection(SectionId),

    #[error("Index {index} out of bounds for {len} sections")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Section has not rendered yet: {0}")]
    NotRendered(SectionId),

    #[error("Section {0} already rendered")]
    AlreadyRendered(SectionId),

    #[error("Rendered {rendered} form for a {expected} section")]
    KindMismatch {
        expected: SectionKind,
        rendered: SectionKind,
    },

    #[error("{kind} sections have no {} field", field.as_str())]
    FieldNotApplicable { field: Field, kind: SectionKind },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Released issues keep their status")]
    ReleasedStatus,
}

impl Mutation {
    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut Document) -> Result<(), MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::InsertSection { id, index, section } => {
                doc.slots.insert(
                    *index,
                    SectionSlot {
                        id: *id,
                        content: SlotContent::Placeholder(section.clone()),
                        expanded: false,
                        tags_expanded: false,
                    },
                );
            }

            Mutation::CompleteRender { id, form } => {
                let slot = doc.slot_mut(*id).ok_or(MutationError::SectionNotFound(*id))?;
                slot.content = SlotContent::Rendered(form.clone());
                slot.expanded = true;
            }

            Mutation::MoveSection { id, index } => {
                let from = doc.position(*id).ok_or(MutationError::SectionNotFound(*id))?;
                let slot = doc.slots.remove(from);
                doc.slots.insert(*index, slot);
            }

            Mutation::RemoveSection { id } => {
                doc.slots.retain(|slot| slot.id != *id);
            }

            Mutation::SetField { id, field, value } => {
                Self::form_mut(doc, *id)?.set_field(*field, value)?;
            }

            Mutation::ToggleKnownTag { id, slug, checked } => {
                let form = Self::form_mut(doc, *id)?;
                let kind = form.kind();
                let link = form.as_link_mut().ok_or(MutationError::FieldNotApplicable {
                    field: Field::Tags,
                    kind,
                })?;
                if !link.set_known_tag(slug, *checked) {
                    return Err(MutationError::UnknownTag(slug.clone()));
                }
            }

            Mutation::SetIssueField { field, value } => Self::apply_issue_field(doc, *field, value)?,
        }

        Ok(())
    }

    fn form_mut(doc: &mut Document, id: SectionId) -> Result<&mut SectionForm, MutationError> {
        doc.slot_mut(id)
            .ok_or(MutationError::SectionNotFound(id))?
            .form_mut()
            .ok_or(MutationError::NotRendered(id))
    }

    fn apply_issue_field(doc: &mut Document, field: IssueField, value: &str) -> Result<(), MutationError> {
        let invalid = || MutationError::InvalidValue {
            field: field.as_str(),
            value: value.to_string(),
        };
        let meta = &mut doc.meta;

        match field {
            IssueField::Slug => meta.slug = value.to_string(),
            IssueField::Summary => meta.summary = value.to_string(),
            IssueField::Status => meta.status = value.parse().map_err(|_| invalid())?,
            IssueField::Email => meta.email = parse_flag(value).ok_or_else(invalid)?,
            IssueField::Tweet => meta.tweet = parse_flag(value).ok_or_else(invalid)?,
            IssueField::Fb => meta.fb = parse_flag(value).ok_or_else(invalid)?,
            IssueField::Echojs => meta.echojs = parse_flag(value).ok_or_else(invalid)?,
            IssueField::Hn => meta.hn = parse_flag(value).ok_or_else(invalid)?,
            IssueField::Lobsters => meta.lobsters = parse_flag(value).ok_or_else(invalid)?,
        }
        Ok(())
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::InsertSection { id, index, .. } => {
                if doc.slot(*id).is_some() {
                    return Err(MutationError::DuplicateSection(*id));
                }
                if *index > doc.len() {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *index,
                        len: doc.len(),
                    });
                }
                Ok(())
            }

            Mutation::CompleteRender { id, form } => {
                let slot = doc.slot(*id).ok_or(MutationError::SectionNotFound(*id))?;
                if !slot.is_placeholder() {
                    return Err(MutationError::AlreadyRendered(*id));
                }
                if slot.kind() != form.kind() {
                    return Err(MutationError::KindMismatch {
                        expected: slot.kind(),
                        rendered: form.kind(),
                    });
                }
                Ok(())
            }

            Mutation::MoveSection { id, index } => {
                doc.slot(*id).ok_or(MutationError::SectionNotFound(*id))?;
                if *index >= doc.len() {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *index,
                        len: doc.len(),
                    });
                }
                Ok(())
            }

            Mutation::RemoveSection { id } => {
                doc.slot(*id).ok_or(MutationError::SectionNotFound(*id))?;
                Ok(())
            }

            Mutation::SetField { id, field, .. } => {
                let form = Self::form(doc, *id)?;
                if !form.has_field(*field) {
                    return Err(MutationError::FieldNotApplicable {
                        field: *field,
                        kind: form.kind(),
                    });
                }
                Ok(())
            }

            Mutation::ToggleKnownTag { id, slug, .. } => {
                let form = Self::form(doc, *id)?;
                let link = form.as_link().ok_or(MutationError::FieldNotApplicable {
                    field: Field::Tags,
                    kind: form.kind(),
                })?;
                if !link.known_tags.iter().any(|checkbox| checkbox.slug == *slug) {
                    return Err(MutationError::UnknownTag(slug.clone()));
                }
                Ok(())
            }

            Mutation::SetIssueField { field: IssueField::Status, value } => {
                if doc.is_released() {
                    return Err(MutationError::ReleasedStatus);
                }
                match value.parse::<IssueStatus>() {
                    Ok(IssueStatus::Draft) | Ok(IssueStatus::Ready) => Ok(()),
                    _ => Err(MutationError::InvalidValue {
                        field: IssueField::Status.as_str(),
                        value: value.clone(),
                    }),
                }
            }

            Mutation::SetIssueField { .. } => Ok(()),
        }
    }

    fn form(doc: &Document, id: SectionId) -> Result<&SectionForm, MutationError> {
        doc.slot(id)
            .ok_or(MutationError::SectionNotFound(id))?
            .form()
            .ok_or(MutationError::NotRendered(id))
    }

    /// The section this mutation targets, if any
    pub fn target(&self) -> Option<SectionId> {
        match self {
            Mutation::InsertSection { id, .. }
            | Mutation::CompleteRender { id, .. }
            | Mutation::MoveSection { id, .. }
            | Mutation::RemoveSection { id }
            | Mutation::SetField { id, .. }
            | Mutation::ToggleKnownTag { id, .. } => Some(*id),
            Mutation::SetIssueField { .. } => None,
        }
    }

    /// Whether applying this mutation changes what the preview shows.
    ///
    /// Placeholders are invisible to the preview, so inserting one is not.
    pub fn affects_preview(&self) -> bool {
        match self {
            Mutation::InsertSection { .. } => false,
            Mutation::SetIssueField { field, .. } => {
                matches!(field, IssueField::Slug | IssueField::Summary)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekly_common::{IssuePayload, KnownTagCatalog, MarkdownSection};

    fn document(kinds: &[SectionKind]) -> Document {
        let payload = IssuePayload {
            sections: kinds.iter().map(|kind| Section::seed(*kind)).collect(),
            ..IssuePayload::default()
        };
        Document::hydrate(&payload, KnownTagCatalog::builtin())
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::SetField {
            id: SectionId(3),
            field: Field::SourceHref,
            value: "https://twitter.com/ponyfoo".to_string(),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_insert_then_complete_render() {
        let mut doc = document(&[SectionKind::Header]);
        let id = doc.allocate_id();
        let seed = Section::seed(SectionKind::Markdown);

        Mutation::InsertSection { id, index: 1, section: seed.clone() }
            .apply(&mut doc)
            .unwrap();
        assert!(doc.slot(id).unwrap().is_placeholder());
        assert_eq!(doc.sections().len(), 1);

        let form = SectionForm::hydrate(&seed, doc.known_tags());
        Mutation::CompleteRender { id, form }.apply(&mut doc).unwrap();

        let slot = doc.slot(id).unwrap();
        assert!(!slot.is_placeholder());
        assert!(slot.expanded);
        assert_eq!(doc.sections()[1], seed);
    }

    #[test]
    fn test_complete_render_checks_kind() {
        let mut doc = document(&[]);
        let id = doc.allocate_id();
        Mutation::InsertSection { id, index: 0, section: Section::seed(SectionKind::Link) }
            .apply(&mut doc)
            .unwrap();

        let form = SectionForm::Markdown(MarkdownSection::default());
        let err = Mutation::CompleteRender { id, form }.apply(&mut doc).unwrap_err();
        assert_eq!(
            err,
            MutationError::KindMismatch {
                expected: SectionKind::Link,
                rendered: SectionKind::Markdown
            }
        );
        assert!(doc.slot(id).unwrap().is_placeholder());
    }

    #[test]
    fn test_move_section() {
        let mut doc = document(&[SectionKind::Header, SectionKind::Markdown, SectionKind::Link]);
        let ids = doc.ids();

        Mutation::MoveSection { id: ids[0], index: 2 }.apply(&mut doc).unwrap();
        assert_eq!(doc.ids(), vec![ids[1], ids[2], ids[0]]);

        let err = Mutation::MoveSection { id: ids[0], index: 3 }.apply(&mut doc).unwrap_err();
        assert_eq!(err, MutationError::IndexOutOfBounds { index: 3, len: 3 });
    }

    #[test]
    fn test_remove_missing_section_fails() {
        let mut doc = document(&[SectionKind::Markdown]);
        let err = Mutation::RemoveSection { id: SectionId(42) }.apply(&mut doc).unwrap_err();
        assert_eq!(err, MutationError::SectionNotFound(SectionId(42)));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_field_edits_need_rendered_section() {
        let mut doc = document(&[]);
        let id = doc.allocate_id();
        Mutation::InsertSection { id, index: 0, section: Section::seed(SectionKind::Markdown) }
            .apply(&mut doc)
            .unwrap();

        let err = Mutation::SetField { id, field: Field::Text, value: "x".to_string() }
            .apply(&mut doc)
            .unwrap_err();
        assert_eq!(err, MutationError::NotRendered(id));
    }

    #[test]
    fn test_toggle_known_tag() {
        let mut doc = document(&[SectionKind::Link]);
        let id = doc.ids()[0];

        Mutation::ToggleKnownTag { id, slug: "css".to_string(), checked: true }
            .apply(&mut doc)
            .unwrap();
        assert_eq!(doc.sections()[0].as_link().unwrap().tags, vec!["css"]);

        let err = Mutation::ToggleKnownTag { id, slug: "cobol".to_string(), checked: true }
            .apply(&mut doc)
            .unwrap_err();
        assert_eq!(err, MutationError::UnknownTag("cobol".to_string()));
    }

    #[test]
    fn test_status_selector() {
        let mut doc = document(&[]);
        Mutation::SetIssueField { field: IssueField::Status, value: "ready".to_string() }
            .apply(&mut doc)
            .unwrap();
        assert_eq!(doc.to_payload().status, IssueStatus::Ready);

        let err = Mutation::SetIssueField { field: IssueField::Status, value: "released".to_string() }
            .apply(&mut doc)
            .unwrap_err();
        assert!(matches!(err, MutationError::InvalidValue { field: "status", .. }));
    }

    #[test]
    fn test_released_issue_keeps_status() {
        let payload = IssuePayload {
            status: IssueStatus::Released,
            ..IssuePayload::default()
        };
        let mut doc = Document::hydrate(&payload, KnownTagCatalog::builtin());

        let err = Mutation::SetIssueField { field: IssueField::Status, value: "draft".to_string() }
            .apply(&mut doc)
            .unwrap_err();
        assert_eq!(err, MutationError::ReleasedStatus);
        assert_eq!(doc.to_payload().status, IssueStatus::Released);
    }

    #[test]
    fn test_campaign_flags() {
        let mut doc = document(&[]);
        Mutation::SetIssueField { field: IssueField::Hn, value: "true".to_string() }
            .apply(&mut doc)
            .unwrap();
        assert!(doc.to_payload().hn);
        assert!(Mutation::SetIssueField { field: IssueField::Hn, value: "maybe".to_string() }
            .apply(&mut doc)
            .is_err());
    }
}

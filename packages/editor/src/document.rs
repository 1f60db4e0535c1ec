//! # Issue Document
//!
//! The ordered sections of one weekly issue plus its issue-level fields.
//!
//! Every section lives in a [`SectionSlot`] with a stable [`SectionId`]. A
//! freshly dropped or cloned section starts as a placeholder holding its
//! seed record; once its form has rendered it becomes a live form. Only
//! rendered sections take part in the payload and in preview compilation.
//!
//! ```text
//! drop/click/clone → Placeholder(seed) → CompleteRender → Rendered(form)
//! ```

use crate::form::SectionForm;
use serde::{Deserialize, Serialize};
use std::fmt;
use weekly_common::{
    slugify, CampaignSlug, IssuePayload, IssueStatus, KnownTagCatalog, Section, SectionKind,
};

/// Stable identity of a section within one editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotContent {
    /// Inserted, waiting for its form to render
    Placeholder(Section),
    Rendered(SectionForm),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSlot {
    pub id: SectionId,
    pub content: SlotContent,
    /// Whether the section's content region is shown
    pub expanded: bool,
    /// Whether a link section's known-tag list is shown
    pub tags_expanded: bool,
}

impl SectionSlot {
    pub fn kind(&self) -> SectionKind {
        match &self.content {
            SlotContent::Placeholder(section) => section.kind(),
            SlotContent::Rendered(form) => form.kind(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, SlotContent::Placeholder(_))
    }

    pub fn form(&self) -> Option<&SectionForm> {
        match &self.content {
            SlotContent::Rendered(form) => Some(form),
            SlotContent::Placeholder(_) => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut SectionForm> {
        match &mut self.content {
            SlotContent::Rendered(form) => Some(form),
            SlotContent::Placeholder(_) => None,
        }
    }

    /// The section record, for rendered sections
    pub fn section(&self) -> Option<Section> {
        self.form().map(SectionForm::extract)
    }
}

/// Issue-level fields edited next to the sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueMeta {
    /// Slug as typed by the author
    pub slug: String,
    pub status: IssueStatus,
    pub summary: String,
    pub email: bool,
    pub tweet: bool,
    pub fb: bool,
    pub echojs: bool,
    pub hn: bool,
    pub lobsters: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub(crate) meta: IssueMeta,
    pub(crate) slots: Vec<SectionSlot>,
    next_id: u64,
    known_tags: KnownTagCatalog,
}

impl Document {
    /// Empty document for a new issue
    pub fn new(known_tags: KnownTagCatalog) -> Self {
        Self {
            meta: IssueMeta::default(),
            slots: Vec::new(),
            next_id: 1,
            known_tags,
        }
    }

    /// Document for an issue loaded from the store. Sections start rendered
    /// and collapsed.
    pub fn hydrate(payload: &IssuePayload, known_tags: KnownTagCatalog) -> Self {
        let mut document = Self::new(known_tags);
        document.meta = IssueMeta {
            slug: payload.slug.clone(),
            status: payload.status,
            summary: payload.summary.clone(),
            email: payload.email,
            tweet: payload.tweet,
            fb: payload.fb,
            echojs: payload.echojs,
            hn: payload.hn,
            lobsters: payload.lobsters,
        };
        for section in &payload.sections {
            let id = document.allocate_id();
            let form = SectionForm::hydrate(section, &document.known_tags);
            document.slots.push(SectionSlot {
                id,
                content: SlotContent::Rendered(form),
                expanded: false,
                tags_expanded: false,
            });
        }
        document
    }

    pub fn allocate_id(&mut self) -> SectionId {
        let id = SectionId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn meta(&self) -> &IssueMeta {
        &self.meta
    }

    pub fn known_tags(&self) -> &KnownTagCatalog {
        &self.known_tags
    }

    pub fn is_released(&self) -> bool {
        self.meta.status == IssueStatus::Released
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[SectionSlot] {
        &self.slots
    }

    pub fn ids(&self) -> Vec<SectionId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }

    pub fn position(&self, id: SectionId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    pub fn slot(&self, id: SectionId) -> Option<&SectionSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub fn slot_mut(&mut self, id: SectionId) -> Option<&mut SectionSlot> {
        self.slots.iter_mut().find(|slot| slot.id == id)
    }

    /// Ids of slots still waiting for their form
    pub fn placeholders(&self) -> Vec<(SectionId, Section)> {
        self.slots
            .iter()
            .filter_map(|slot| match &slot.content {
                SlotContent::Placeholder(seed) => Some((slot.id, seed.clone())),
                SlotContent::Rendered(_) => None,
            })
            .collect()
    }

    /// Rendered sections in document order, with their ids
    pub fn rendered_sections(&self) -> Vec<(SectionId, Section)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.section().map(|section| (slot.id, section)))
            .collect()
    }

    pub fn sections(&self) -> Vec<Section> {
        self.slots.iter().filter_map(SectionSlot::section).collect()
    }

    pub fn campaign_slug(&self) -> CampaignSlug {
        CampaignSlug::from_input(&self.meta.slug)
    }

    /// Serialize the issue for the store
    pub fn to_payload(&self) -> IssuePayload {
        IssuePayload {
            slug: slugify(&self.meta.slug),
            sections: self.sections(),
            status: self.meta.status,
            summary: self.meta.summary.clone(),
            email: self.meta.email,
            tweet: self.meta.tweet,
            fb: self.meta.fb,
            echojs: self.meta.echojs,
            hn: self.meta.hn,
            lobsters: self.meta.lobsters,
        }
    }

    /// Flip one section's content region; returns the new state
    pub fn toggle_expanded(&mut self, id: SectionId) -> Option<bool> {
        let slot = self.slot_mut(id)?;
        slot.expanded = !slot.expanded;
        Some(slot.expanded)
    }

    /// Flip a link section's known-tag list; returns the new state
    pub fn toggle_tags(&mut self, id: SectionId) -> Option<bool> {
        let slot = self.slot_mut(id)?;
        if slot.kind() != SectionKind::Link {
            return None;
        }
        slot.tags_expanded = !slot.tags_expanded;
        Some(slot.tags_expanded)
    }

    /// Expand every non-header section if all are collapsed, otherwise
    /// collapse them all. Returns whether sections are now expanded.
    pub fn toggle_all_expanded(&mut self) -> bool {
        let is_body = |slot: &SectionSlot| slot.kind() != SectionKind::Header;
        if !self.slots.iter().any(is_body) {
            return false;
        }

        let all_collapsed = self
            .slots
            .iter()
            .filter(|slot| is_body(slot))
            .all(|slot| !slot.expanded);
        for slot in self.slots.iter_mut().filter(|slot| is_body(slot)) {
            slot.expanded = all_collapsed;
        }
        all_collapsed
    }
}

//! # Post-Effect System
//!
//! Some mutations imply further edits elsewhere in the document. A
//! [`PostEffect`] looks at an applied mutation and returns the secondary
//! mutations that follow from it; [`PostEffectEngine`] applies both.
//!
//! Current effects:
//! - A header's background color becomes the foreground of the link
//!   sections directly beneath it ([`CascadeHeaderBackground`]).

use crate::document::{Document, SectionId, SectionSlot};
use crate::form::Field;
use crate::mutations::{Mutation, MutationError};
use tracing::debug;
use weekly_common::SectionKind;

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    /// Analyze the mutation and generate secondary mutations if needed
    fn analyze(&self, mutation: &Mutation, doc: &Document) -> Vec<Mutation>;
}

/// Recolor the run of link sections following a header whose background
/// changed
#[derive(Debug)]
pub struct CascadeHeaderBackground;

impl PostEffect for CascadeHeaderBackground {
    fn analyze(&self, mutation: &Mutation, doc: &Document) -> Vec<Mutation> {
        let (id, color) = match mutation {
            Mutation::SetField {
                id,
                field: Field::Background,
                value,
            } => (*id, value),
            _ => return vec![],
        };

        let Some(position) = doc.position(id) else {
            return vec![];
        };
        if doc.slots()[position].kind() != SectionKind::Header {
            return vec![];
        }

        cascade_targets(doc.slots(), position)
            .into_iter()
            .map(|target| Mutation::SetField {
                id: target,
                field: Field::Foreground,
                value: color.clone(),
            })
            .collect()
    }
}

/// Rendered link sections in the run directly after `header`.
///
/// The scan stops at the first section that is not a link, so a later
/// header and everything beneath it are left alone.
pub fn cascade_targets(slots: &[SectionSlot], header: usize) -> Vec<SectionId> {
    slots
        .iter()
        .skip(header + 1)
        .take_while(|slot| slot.kind() == SectionKind::Link)
        .filter(|slot| !slot.is_placeholder())
        .map(|slot| slot.id)
        .collect()
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(CascadeHeaderBackground)],
        }
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(&self, mutation: &Mutation, doc: &Document) -> Vec<Mutation> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(mutation, doc))
            .collect()
    }

    /// Apply a mutation with all its post-effects.
    ///
    /// Returns every mutation applied, primary first.
    pub fn apply_with_effects(
        &self,
        mutation: Mutation,
        doc: &mut Document,
    ) -> Result<Vec<Mutation>, MutationError> {
        mutation.apply(doc)?;

        let secondary = self.analyze(&mutation, doc);
        if !secondary.is_empty() {
            debug!(count = secondary.len(), "Applying post-effects");
        }

        let mut applied = vec![mutation];
        for secondary_mutation in secondary {
            secondary_mutation.apply(doc)?;
            applied.push(secondary_mutation);
        }

        Ok(applied)
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekly_common::{IssuePayload, KnownTagCatalog, Section};

    fn document(kinds: &[SectionKind]) -> Document {
        let payload = IssuePayload {
            sections: kinds.iter().map(|kind| Section::seed(*kind)).collect(),
            ..IssuePayload::default()
        };
        Document::hydrate(&payload, KnownTagCatalog::builtin())
    }

    fn foreground(doc: &Document, index: usize) -> String {
        doc.sections()[index].as_link().unwrap().foreground.clone()
    }

    #[test]
    fn test_other_mutations_have_no_effects() {
        let doc = document(&[SectionKind::Header, SectionKind::Link]);
        let engine = PostEffectEngine::new();

        let mutation = Mutation::SetField {
            id: doc.ids()[0],
            field: Field::Foreground,
            value: "#123".to_string(),
        };
        assert!(engine.analyze(&mutation, &doc).is_empty());
    }

    #[test]
    fn test_link_background_does_not_cascade() {
        let doc = document(&[SectionKind::Link, SectionKind::Link]);
        let mutation = Mutation::SetField {
            id: doc.ids()[0],
            field: Field::Background,
            value: "#123".to_string(),
        };
        assert!(PostEffectEngine::new().analyze(&mutation, &doc).is_empty());
    }

    #[test]
    fn test_cascade_stops_at_first_non_link() {
        let mut doc = document(&[
            SectionKind::Header,
            SectionKind::Link,
            SectionKind::Markdown,
            SectionKind::Link,
        ]);
        let header = doc.ids()[0];

        let applied = PostEffectEngine::new()
            .apply_with_effects(
                Mutation::SetField {
                    id: header,
                    field: Field::Background,
                    value: "#c0ffee".to_string(),
                },
                &mut doc,
            )
            .unwrap();

        assert_eq!(applied.len(), 2);
        assert_eq!(foreground(&doc, 1), "#c0ffee");
        assert_eq!(foreground(&doc, 3), "");
    }
}

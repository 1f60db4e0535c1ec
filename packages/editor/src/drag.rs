//! # Drag coordination
//!
//! Three drag contexts feed the document:
//!
//! | Context   | Source                     | Mode | Legal when                         |
//! |-----------|----------------------------|------|------------------------------------|
//! | `Palette` | section tool palette       | copy | grabbed from the palette           |
//! | `Inbox`   | pending link submissions   | copy | grabbed from the inbox             |
//! | `Reorder` | the document's own sections| move | grabbed by a section heading       |
//!
//! Each context carries at most one drag. A drag never touches the document
//! while it is in flight; dropping yields a [`DropIntent`] that the session
//! turns into a mutation, so [`DragManager::cancel`] only has to forget
//! state.

use crate::document::SectionId;
use tracing::{debug, warn};
use weekly_common::{Section, SectionKind, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragContext {
    Palette,
    Inbox,
    Reorder,
}

impl DragContext {
    pub const ALL: [DragContext; 3] = [DragContext::Palette, DragContext::Inbox, DragContext::Reorder];

    pub fn mode(&self) -> DragMode {
        match self {
            DragContext::Palette | DragContext::Inbox => DragMode::Copy,
            DragContext::Reorder => DragMode::Move,
        }
    }

    fn slot(&self) -> usize {
        match self {
            DragContext::Palette => 0,
            DragContext::Inbox => 1,
            DragContext::Reorder => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// The source stays put; a copy lands in the document
    Copy,
    Move,
}

/// Where inside a section the pointer grabbed it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabHandle {
    Heading,
    /// Any element nested inside the heading
    HeadingDescendant,
    Contents,
}

/// What the user started dragging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    Palette(SectionKind),
    Inbox { submission_id: String },
    Section { id: SectionId, handle: GrabHandle },
}

impl DragSource {
    /// The context allowed to carry this drag, if any
    pub fn context(&self) -> Option<DragContext> {
        match self {
            DragSource::Palette(_) => Some(DragContext::Palette),
            DragSource::Inbox { .. } => Some(DragContext::Inbox),
            DragSource::Section { handle, .. } => match handle {
                GrabHandle::Heading | GrabHandle::HeadingDescendant => Some(DragContext::Reorder),
                GrabHandle::Contents => None,
            },
        }
    }
}

/// Document change requested by a completed drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent {
    /// Insert a new section seeded with `section`
    Insert {
        index: usize,
        section: Section,
        origin: DragContext,
    },
    Move { id: SectionId, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveDrag {
    source: DragSource,
    over: Option<usize>,
}

/// Owns the drag contexts and their shared cancellation
#[derive(Debug, Clone, Default)]
pub struct DragManager {
    active: [Option<ActiveDrag>; 3],
    inbox: Vec<Submission>,
}

impl DragManager {
    pub fn new(inbox: Vec<Submission>) -> Self {
        Self {
            active: Default::default(),
            inbox,
        }
    }

    pub fn inbox(&self) -> &[Submission] {
        &self.inbox
    }

    pub fn set_inbox(&mut self, inbox: Vec<Submission>) {
        self.inbox = inbox;
    }

    pub fn is_active(&self, context: DragContext) -> bool {
        self.active[context.slot()].is_some()
    }

    pub fn active_contexts(&self) -> Vec<DragContext> {
        DragContext::ALL
            .into_iter()
            .filter(|context| self.is_active(*context))
            .collect()
    }

    /// Start dragging `source`.
    ///
    /// Returns the context carrying the drag, or `None` when the grab is not
    /// a legal drag or that context already has one in flight.
    pub fn begin(&mut self, source: DragSource) -> Option<DragContext> {
        let context = source.context()?;
        let slot = &mut self.active[context.slot()];
        if slot.is_some() {
            debug!(?context, "Drag already in flight");
            return None;
        }

        debug!(?context, ?source, "Drag started");
        *slot = Some(ActiveDrag { source, over: None });
        Some(context)
    }

    /// Track the document position the drag currently hovers
    pub fn hover(&mut self, context: DragContext, index: usize) -> bool {
        match &mut self.active[context.slot()] {
            Some(drag) => {
                drag.over = Some(index);
                true
            }
            None => false,
        }
    }

    /// Where the drag in `context` would land
    pub fn hovered(&self, context: DragContext) -> Option<usize> {
        self.active[context.slot()].as_ref()?.over
    }

    /// Finish the drag in `context` over document position `index`
    pub fn drop(&mut self, context: DragContext, index: usize) -> Option<DropIntent> {
        let drag = self.active[context.slot()].take()?;

        let intent = match drag.source {
            DragSource::Palette(kind) => DropIntent::Insert {
                index,
                section: Section::seed(kind),
                origin: context,
            },
            DragSource::Inbox { submission_id } => {
                let Some(submission) = self.inbox.iter().find(|s| s.id == submission_id) else {
                    warn!(%submission_id, "Dropped submission is not in the inbox");
                    return None;
                };
                DropIntent::Insert {
                    index,
                    section: Section::Link(submission.section.clone()),
                    origin: context,
                }
            }
            DragSource::Section { id, .. } => DropIntent::Move { id, index },
        };

        debug!(?context, index, "Drag dropped");
        Some(intent)
    }

    /// End the drag in `context` outside the document
    pub fn release(&mut self, context: DragContext) -> bool {
        self.active[context.slot()].take().is_some()
    }

    /// Abort every drag in flight. Returns the contexts that were cancelled.
    pub fn cancel(&mut self) -> Vec<DragContext> {
        let cancelled = self.active_contexts();
        for context in &cancelled {
            self.active[context.slot()] = None;
        }
        if !cancelled.is_empty() {
            debug!(?cancelled, "Drags cancelled");
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekly_common::LinkSection;

    fn inbox() -> Vec<Submission> {
        vec![Submission {
            id: "sub-1".to_string(),
            section: LinkSection {
                title: "Submitted".to_string(),
                href: "https://example.com/submitted".to_string(),
                ..LinkSection::default()
            },
        }]
    }

    #[test]
    fn test_reorder_requires_heading_grab() {
        let mut drags = DragManager::default();
        let id = SectionId(1);

        assert_eq!(
            drags.begin(DragSource::Section { id, handle: GrabHandle::Contents }),
            None
        );
        assert_eq!(
            drags.begin(DragSource::Section { id, handle: GrabHandle::HeadingDescendant }),
            Some(DragContext::Reorder)
        );
        assert_eq!(DragContext::Reorder.mode(), DragMode::Move);
    }

    #[test]
    fn test_one_drag_per_context() {
        let mut drags = DragManager::default();
        assert!(drags.begin(DragSource::Palette(SectionKind::Header)).is_some());
        assert!(drags.begin(DragSource::Palette(SectionKind::Link)).is_none());
        assert!(drags
            .begin(DragSource::Section { id: SectionId(1), handle: GrabHandle::Heading })
            .is_some());
        assert_eq!(drags.active_contexts(), vec![DragContext::Palette, DragContext::Reorder]);
    }

    #[test]
    fn test_palette_drop_seeds_section() {
        let mut drags = DragManager::default();
        let context = drags.begin(DragSource::Palette(SectionKind::Link)).unwrap();
        drags.hover(context, 2);
        assert_eq!(drags.hovered(context), Some(2));

        let intent = drags.drop(context, 2).unwrap();
        assert_eq!(
            intent,
            DropIntent::Insert {
                index: 2,
                section: Section::seed(SectionKind::Link),
                origin: DragContext::Palette,
            }
        );
        assert!(!drags.is_active(context));
    }

    #[test]
    fn test_inbox_drop_resolves_submission_and_keeps_it() {
        let mut drags = DragManager::new(inbox());
        let context = drags
            .begin(DragSource::Inbox { submission_id: "sub-1".to_string() })
            .unwrap();

        match drags.drop(context, 0) {
            Some(DropIntent::Insert { section: Section::Link(link), .. }) => {
                assert_eq!(link.title, "Submitted");
            }
            other => panic!("unexpected drop: {:?}", other),
        }
        assert_eq!(drags.inbox().len(), 1);
    }

    #[test]
    fn test_unknown_submission_drops_nothing() {
        let mut drags = DragManager::new(inbox());
        let context = drags
            .begin(DragSource::Inbox { submission_id: "gone".to_string() })
            .unwrap();
        assert_eq!(drags.drop(context, 0), None);
        assert!(!drags.is_active(context));
    }

    #[test]
    fn test_cancel_aborts_every_context() {
        let mut drags = DragManager::new(inbox());
        drags.begin(DragSource::Palette(SectionKind::Markdown));
        drags.begin(DragSource::Inbox { submission_id: "sub-1".to_string() });
        drags.begin(DragSource::Section { id: SectionId(4), handle: GrabHandle::Heading });

        assert_eq!(drags.cancel(), DragContext::ALL.to_vec());
        assert!(drags.active_contexts().is_empty());
        assert_eq!(drags.drop(DragContext::Reorder, 0), None);
        assert!(drags.cancel().is_empty());
    }
}

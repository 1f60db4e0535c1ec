//! # Editor Session
//!
//! Binds author input to the document. All mutable editor state lives in one
//! [`EditorSessionState`]: the document, the drag contexts, the scraping
//! toggle and the preview generation counter. Handlers take `&mut self`, so
//! edits are applied one at a time and never race.
//!
//! Every edit that changes what the preview shows bumps the generation and
//! publishes a [`PreviewSnapshot`] to the connected preview loop.

use crate::collaborators::{IssueStore, LinkMetadata, PartialRenderer, Scraper, REVIEW_PATH};
use crate::config::EditorConfig;
use crate::document::{Document, SectionId};
use crate::drag::{DragContext, DragManager, DragSource, DropIntent};
use crate::errors::EditorError;
use crate::form::{Field, SectionForm};
use crate::mutations::{IssueField, Mutation, MutationError};
use crate::post_effects::PostEffectEngine;
use crate::preview::PreviewSnapshot;
use crate::scheduler::{Debounce, Generation};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use weekly_common::{IssuePayload, IssueStatus, Section, SectionKind, Submission};

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Where the editor goes after a save or discard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub path: &'static str,
}

impl Navigation {
    pub fn review() -> Self {
        Self { path: REVIEW_PATH }
    }
}

/// Save and discard button texts for the issue's publication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationLabels {
    pub save: &'static str,
    pub save_hint: &'static str,
    /// Replacement discard button text, when it differs from the default
    pub discard: Option<(&'static str, &'static str)>,
}

impl PublicationLabels {
    pub fn for_status(status: IssueStatus) -> Self {
        match status {
            IssueStatus::Released => Self {
                save: "Save Changes",
                save_hint: "Make your modifications immediately accessible!",
                discard: Some(("Delete Issue", "Permanently delete this weekly issue")),
            },
            IssueStatus::Draft => Self {
                save: "Save Draft",
                save_hint: "You can access your drafts at any time",
                discard: None,
            },
            IssueStatus::Ready => Self {
                save: "Save & Mark Ready",
                save_hint: "Schedule this weekly issue for publication next thursday!",
                discard: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorSessionState {
    pub document: Document,
    pub drags: DragManager,
    pub scraping: bool,
    pub generation: Generation,
}

pub struct EditorSession {
    state: EditorSessionState,
    config: EditorConfig,
    effects: PostEffectEngine,
    /// Slug the issue was opened under; `None` for a new issue
    original_slug: Option<String>,
    scrapes: HashMap<SectionId, Debounce>,
    preview: Option<mpsc::UnboundedSender<PreviewSnapshot>>,
}

impl EditorSession {
    /// Session for a new, empty issue
    pub fn new(config: EditorConfig) -> Self {
        let document = Document::new(config.known_tags.clone());
        Self::with_document(document, None, config)
    }

    /// Session editing a stored issue
    pub fn open(payload: &IssuePayload, config: EditorConfig) -> Self {
        let document = Document::hydrate(payload, config.known_tags.clone());
        Self::with_document(document, Some(payload.slug.clone()), config)
    }

    fn with_document(document: Document, original_slug: Option<String>, config: EditorConfig) -> Self {
        Self {
            state: EditorSessionState {
                document,
                drags: DragManager::default(),
                scraping: true,
                generation: Generation::default(),
            },
            config,
            effects: PostEffectEngine::new(),
            original_slug,
            scrapes: HashMap::new(),
            preview: None,
        }
    }

    pub fn with_inbox(mut self, inbox: Vec<Submission>) -> Self {
        self.state.drags.set_inbox(inbox);
        self
    }

    /// Publish preview snapshots to `preview`
    pub fn connect_preview(&mut self, preview: mpsc::UnboundedSender<PreviewSnapshot>) {
        self.preview = Some(preview);
    }

    pub fn state(&self) -> &EditorSessionState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_editing(&self) -> bool {
        self.original_slug.is_some()
    }

    pub fn generation(&self) -> Generation {
        self.state.generation
    }

    /// Apply `mutation` and its post-effects, then refresh the preview if
    /// anything visible changed
    pub fn apply(&mut self, mutation: Mutation) -> Result<Vec<Mutation>, EditorError> {
        let applied = self.effects.apply_with_effects(mutation, &mut self.state.document)?;
        if applied.iter().any(Mutation::affects_preview) {
            self.request_preview();
        }
        Ok(applied)
    }

    /// The document as the next preview pass will see it
    pub fn snapshot(&self) -> PreviewSnapshot {
        let document = &self.state.document;
        PreviewSnapshot {
            generation: self.state.generation,
            slug: document.campaign_slug(),
            sections: document.rendered_sections(),
            summary: document.meta().summary.clone(),
        }
    }

    /// Bump the generation and publish a snapshot
    pub fn request_preview(&mut self) -> Generation {
        self.state.generation = self.state.generation.next();
        let stopped = match &self.preview {
            Some(preview) => preview.send(self.snapshot()).is_err(),
            None => false,
        };
        if stopped {
            debug!("Preview loop has stopped");
            self.preview = None;
        }
        self.state.generation
    }

    pub fn key_up(&mut self, key: Key) -> Vec<DragContext> {
        match key {
            Key::Escape => self.state.drags.cancel(),
            Key::Other => Vec::new(),
        }
    }

    pub fn begin_drag(&mut self, source: DragSource) -> Option<DragContext> {
        self.state.drags.begin(source)
    }

    pub fn hover_drag(&mut self, context: DragContext, index: usize) -> bool {
        self.state.drags.hover(context, index)
    }

    /// Drag ended outside the document
    pub fn release_drag(&mut self, context: DragContext) -> bool {
        self.state.drags.release(context)
    }

    /// Finish a drag over document position `index`.
    ///
    /// Returns the id of the inserted placeholder for palette and inbox
    /// drops.
    pub fn drop_drag(&mut self, context: DragContext, index: usize) -> Result<Option<SectionId>, EditorError> {
        let Some(intent) = self.state.drags.drop(context, index) else {
            return Ok(None);
        };

        match intent {
            DropIntent::Insert { index, section, .. } => {
                let index = index.min(self.state.document.len());
                self.insert_placeholder(index, section).map(Some)
            }
            DropIntent::Move { id, index } => {
                let last = self.state.document.len().saturating_sub(1);
                self.apply(Mutation::MoveSection {
                    id,
                    index: index.min(last),
                })?;
                Ok(None)
            }
        }
    }

    /// Click on a palette tool: append a new section of `kind`
    pub fn pick_tool(&mut self, kind: SectionKind) -> Result<SectionId, EditorError> {
        let index = self.state.document.len();
        self.insert_placeholder(index, Section::seed(kind))
    }

    /// Insert a copy of `id` right after it
    pub fn clone_section(&mut self, id: SectionId) -> Result<SectionId, EditorError> {
        let document = &self.state.document;
        let position = document.position(id).ok_or(MutationError::SectionNotFound(id))?;
        let section = document.slots()[position]
            .section()
            .ok_or(MutationError::NotRendered(id))?;
        self.insert_placeholder(position + 1, section)
    }

    pub fn remove_section(&mut self, id: SectionId) -> Result<(), EditorError> {
        self.apply(Mutation::RemoveSection { id })?;
        self.scrapes.remove(&id);
        Ok(())
    }

    fn insert_placeholder(&mut self, index: usize, section: Section) -> Result<SectionId, EditorError> {
        let id = self.state.document.allocate_id();
        debug!(%id, index, kind = %section.kind(), "Inserting section");
        self.apply(Mutation::InsertSection { id, index, section })?;
        Ok(id)
    }

    /// Swap a placeholder for its rendered form.
    ///
    /// Returns false when the placeholder is gone by the time its form
    /// arrives.
    pub fn complete_render(&mut self, id: SectionId, form: SectionForm) -> Result<bool, EditorError> {
        match self.apply(Mutation::CompleteRender { id, form }) {
            Ok(_) => Ok(true),
            Err(EditorError::Mutation(MutationError::SectionNotFound(_))) => {
                debug!(%id, "Rendered section was removed before it arrived");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Render every pending placeholder through `renderer`
    pub async fn render_placeholders(&mut self, renderer: &dyn PartialRenderer) -> Result<usize, EditorError> {
        let mut rendered = 0;
        for (id, seed) in self.state.document.placeholders() {
            let form = renderer.render(&seed, self.state.document.known_tags()).await?;
            if self.complete_render(id, form)? {
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    /// Edit a section field. Href edits on link sections schedule a scrape
    /// while scraping is enabled.
    pub fn set_field(&mut self, id: SectionId, field: Field, value: impl Into<String>, now: Instant) -> Result<(), EditorError> {
        self.apply(Mutation::SetField {
            id,
            field,
            value: value.into(),
        })?;

        if field == Field::Href && self.state.scraping {
            let delay = self.config.scrape_debounce;
            self.scrapes
                .entry(id)
                .or_insert_with(|| Debounce::new(delay))
                .schedule(now);
        }
        Ok(())
    }

    pub fn toggle_known_tag(&mut self, id: SectionId, slug: &str, checked: bool) -> Result<(), EditorError> {
        self.apply(Mutation::ToggleKnownTag {
            id,
            slug: slug.to_string(),
            checked,
        })?;
        Ok(())
    }

    pub fn set_issue_field(&mut self, field: IssueField, value: impl Into<String>) -> Result<(), EditorError> {
        self.apply(Mutation::SetIssueField {
            field,
            value: value.into(),
        })?;
        Ok(())
    }

    pub fn toggle_section(&mut self, id: SectionId) -> Option<bool> {
        self.state.document.toggle_expanded(id)
    }

    pub fn toggle_tags(&mut self, id: SectionId) -> Option<bool> {
        self.state.document.toggle_tags(id)
    }

    pub fn toggle_all_sections(&mut self) -> bool {
        self.state.document.toggle_all_expanded()
    }

    /// Flip scraping; turning it off drops pending scrapes
    pub fn toggle_scraping(&mut self) -> bool {
        self.state.scraping = !self.state.scraping;
        if !self.state.scraping {
            self.scrapes.clear();
        }
        info!(enabled = self.state.scraping, "Scraping toggled");
        self.state.scraping
    }

    /// Earliest pending scrape deadline
    pub fn next_scrape_deadline(&self) -> Option<Instant> {
        self.scrapes.values().filter_map(Debounce::deadline).min()
    }

    /// Link sections whose scrape is due, with the href to scrape
    pub fn due_scrapes(&mut self, now: Instant) -> Vec<(SectionId, String)> {
        let mut due: Vec<SectionId> = self
            .scrapes
            .iter_mut()
            .filter_map(|(id, debounce)| debounce.fire(now).then_some(*id))
            .collect();
        due.sort();
        self.scrapes.retain(|_, debounce| debounce.is_pending());

        due.into_iter()
            .filter_map(|id| {
                let link = self.state.document.slot(id)?.form()?.as_link()?;
                (!link.href.trim().is_empty()).then(|| (id, link.href.clone()))
            })
            .collect()
    }

    /// Fill the empty title, description and image of a link from scraped
    /// metadata. Returns whether anything changed.
    pub fn apply_scrape(&mut self, id: SectionId, metadata: &LinkMetadata) -> Result<bool, EditorError> {
        let slot = self
            .state
            .document
            .slot(id)
            .ok_or(MutationError::SectionNotFound(id))?;
        let form = slot.form().ok_or(MutationError::NotRendered(id))?;
        let link = form.as_link().ok_or(MutationError::FieldNotApplicable {
            field: Field::Href,
            kind: form.kind(),
        })?;

        let fills: Vec<(Field, &String)> = [
            (Field::Title, &link.title, &metadata.title),
            (Field::Description, &link.description, &metadata.description),
            (Field::Image, &link.image, &metadata.image),
        ]
        .into_iter()
        .filter(|(_, current, scraped)| current.trim().is_empty() && !scraped.is_empty())
        .map(|(field, _, scraped)| (field, scraped))
        .collect();

        if fills.is_empty() {
            return Ok(false);
        }

        let mutations: Vec<Mutation> = fills
            .into_iter()
            .map(|(field, value)| Mutation::SetField {
                id,
                field,
                value: value.clone(),
            })
            .collect();
        for mutation in mutations {
            self.apply(mutation)?;
        }
        Ok(true)
    }

    /// Scrape every due link through `scraper` and prefill the results.
    ///
    /// Scrape failures are logged and skipped. Returns how many sections
    /// changed.
    pub async fn run_scrapes(&mut self, scraper: &dyn Scraper, now: Instant) -> Result<usize, EditorError> {
        let mut changed = 0;
        for (id, url) in self.due_scrapes(now) {
            match scraper.scrape(&url).await {
                Ok(metadata) => {
                    // The section may have been removed while the scrape ran.
                    if self.state.document.slot(id).is_some() && self.apply_scrape(id, &metadata)? {
                        changed += 1;
                    }
                }
                Err(err) => warn!(%id, %url, error = %err, "Scrape failed"),
            }
        }
        Ok(changed)
    }

    pub fn publication(&self) -> PublicationLabels {
        PublicationLabels::for_status(self.state.document.meta().status)
    }

    pub fn discard_prompt(&self) -> String {
        let name = match &self.original_slug {
            Some(slug) => format!("/weeklies/{}", slug),
            None => "draft".to_string(),
        };
        format!("About to discard {}, are you sure?", name)
    }

    /// Create or update the issue. The document is left untouched on failure.
    pub async fn save(&self, store: &dyn IssueStore) -> Result<Navigation, EditorError> {
        let payload = self.state.document.to_payload();
        match &self.original_slug {
            Some(slug) => store.update(slug, &payload).await?,
            None => store.create(&payload).await?,
        }
        info!(slug = %payload.slug, status = payload.status.as_str(), sections = payload.sections.len(), "Issue saved");
        Ok(Navigation::review())
    }

    /// Discard the issue once the author confirmed. Stored issues are
    /// deleted; new ones are simply left.
    pub async fn discard(&self, store: &dyn IssueStore, confirmed: bool) -> Result<Option<Navigation>, EditorError> {
        if !confirmed {
            return Ok(None);
        }
        if let Some(slug) = &self.original_slug {
            store.delete(slug).await?;
            info!(%slug, "Issue deleted");
        }
        Ok(Some(Navigation::review()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_labels() {
        let mut session = EditorSession::new(EditorConfig::default());
        assert_eq!(session.publication().save, "Save Draft");

        session.set_issue_field(IssueField::Status, "ready").unwrap();
        assert_eq!(session.publication().save, "Save & Mark Ready");
        assert_eq!(session.publication().discard, None);

        let released = IssuePayload {
            slug: "40".to_string(),
            status: IssueStatus::Released,
            ..IssuePayload::default()
        };
        let session = EditorSession::open(&released, EditorConfig::default());
        let labels = session.publication();
        assert_eq!(labels.save, "Save Changes");
        assert_eq!(labels.discard.map(|(text, _)| text), Some("Delete Issue"));
    }

    #[test]
    fn test_discard_prompt_names_issue() {
        let session = EditorSession::new(EditorConfig::default());
        assert_eq!(session.discard_prompt(), "About to discard draft, are you sure?");

        let payload = IssuePayload {
            slug: "12".to_string(),
            ..IssuePayload::default()
        };
        let session = EditorSession::open(&payload, EditorConfig::default());
        assert_eq!(session.discard_prompt(), "About to discard /weeklies/12, are you sure?");
    }

    #[test]
    fn test_pick_tool_appends_placeholder() {
        let mut session = EditorSession::new(EditorConfig::default());
        let first = session.pick_tool(SectionKind::Header).unwrap();
        let second = session.pick_tool(SectionKind::Link).unwrap();

        assert_eq!(session.document().ids(), vec![first, second]);
        assert!(session.document().slot(second).unwrap().is_placeholder());
        // Placeholders do not touch the preview.
        assert_eq!(session.generation(), Generation(0));
    }

    #[test]
    fn test_complete_render_of_removed_placeholder_is_ignored() {
        let mut session = EditorSession::new(EditorConfig::default());
        let id = session.pick_tool(SectionKind::Markdown).unwrap();
        session.remove_section(id).unwrap();

        let form = SectionForm::hydrate(&Section::seed(SectionKind::Markdown), session.document().known_tags());
        assert!(!session.complete_render(id, form).unwrap());
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_clone_needs_rendered_section() {
        let mut session = EditorSession::new(EditorConfig::default());
        let id = session.pick_tool(SectionKind::Markdown).unwrap();
        let err = session.clone_section(id).unwrap_err();
        assert!(matches!(err, EditorError::Mutation(MutationError::NotRendered(_))));
    }

    #[test]
    fn test_toggle_scraping_drops_pending_scrapes() {
        let mut session = EditorSession::open(
            &IssuePayload {
                sections: vec![Section::seed(SectionKind::Link)],
                ..IssuePayload::default()
            },
            EditorConfig::default(),
        );
        let id = session.document().ids()[0];
        let now = Instant::now();

        session.set_field(id, Field::Href, "https://example.com", now).unwrap();
        assert!(session.next_scrape_deadline().is_some());

        assert!(!session.toggle_scraping());
        assert_eq!(session.next_scrape_deadline(), None);

        session.set_field(id, Field::Href, "https://example.org", now).unwrap();
        assert_eq!(session.next_scrape_deadline(), None);
    }
}

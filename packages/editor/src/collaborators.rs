//! Contracts of the services the editor talks to: the issue store, the link
//! scraper and the partial renderer that turns a seed record into a form.

use crate::errors::{EditorError, PersistenceError, ScrapeError};
use crate::form::SectionForm;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use weekly_common::{IssuePayload, KnownTagCatalog, Section};

/// Page the editor leaves for after saving or discarding
pub const REVIEW_PATH: &str = "/weekly/review";

/// Persistence of weekly issues
#[async_trait]
pub trait IssueStore: Send + Sync {
    async fn create(&self, payload: &IssuePayload) -> Result<(), PersistenceError>;

    /// Replace the issue stored under `slug`
    async fn update(&self, slug: &str, payload: &IssuePayload) -> Result<(), PersistenceError>;

    async fn delete(&self, slug: &str) -> Result<(), PersistenceError>;
}

/// Metadata scraped from a link's target page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
}

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<LinkMetadata, ScrapeError>;
}

/// Renders a freshly inserted section's editing form
#[async_trait]
pub trait PartialRenderer: Send + Sync {
    async fn render(&self, section: &Section, known_tags: &KnownTagCatalog) -> Result<SectionForm, EditorError>;
}

/// Renderer that builds the form straight from the seed record
#[derive(Debug, Clone, Copy, Default)]
pub struct FormRenderer;

#[async_trait]
impl PartialRenderer for FormRenderer {
    async fn render(&self, section: &Section, known_tags: &KnownTagCatalog) -> Result<SectionForm, EditorError> {
        Ok(SectionForm::hydrate(section, known_tags))
    }
}

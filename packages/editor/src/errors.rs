//! Error types for the editor

use thiserror::Error;
use weekly_common::ModelError;
use weekly_compiler_html::CompileError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Failure reported by the issue store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Issue not found: {0}")]
    NotFound(String),

    #[error("Issue rejected: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the link scraper
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("Invalid link: {0}")]
    InvalidUrl(String),

    #[error("Could not fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

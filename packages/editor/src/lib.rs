//! # Weekly Editor
//!
//! Section-based editing of a weekly issue and its live preview.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ input: typing, drags, clicks, Escape        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ EditorSession                               │
//! │  - DragManager: palette, inbox, reorder     │
//! │  - Mutations + post-effects on Document     │
//! │  - Generation counter, scrape debouncing    │
//! └─────────────────────────────────────────────┘
//!                     ↓ PreviewSnapshot
//! ┌─────────────────────────────────────────────┐
//! │ PreviewLoop                                 │
//! │  - PreviewScheduler: quiet window, frames   │
//! │  - PreviewPass: SectionCompiler → frame     │
//! │  - stale passes dropped                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weekly_editor::{EditorConfig, EditorSession, FormRenderer, Field};
//! use weekly_common::SectionKind;
//!
//! let mut session = EditorSession::new(EditorConfig::default());
//! let id = session.pick_tool(SectionKind::Markdown)?;
//! session.render_placeholders(&FormRenderer).await?;
//! session.set_field(id, Field::Text, "**Hello**", Instant::now())?;
//! ```

mod collaborators;
mod config;
mod document;
mod drag;
mod errors;
mod form;
mod mutations;
mod post_effects;
mod preview;
mod scheduler;
mod session;

pub use collaborators::{FormRenderer, IssueStore, LinkMetadata, PartialRenderer, Scraper, REVIEW_PATH};
pub use config::EditorConfig;
pub use document::{Document, IssueMeta, SectionId, SectionSlot, SlotContent};
pub use drag::{DragContext, DragManager, DragMode, DragSource, DropIntent, GrabHandle};
pub use errors::{EditorError, PersistenceError, ScrapeError};
pub use form::{Field, LinkForm, SectionForm, TagCheckbox};
pub use mutations::{IssueField, Mutation, MutationError};
pub use post_effects::{cascade_targets, CascadeHeaderBackground, PostEffect, PostEffectEngine};
pub use preview::{error_block, LinkDecoration, PreviewFrame, PreviewLoop, PreviewPass, PreviewSnapshot, PreviewSurface};
pub use scheduler::{Admission, Debounce, Generation, PreviewScheduler};
pub use session::{EditorSession, EditorSessionState, Key, Navigation, PublicationLabels};

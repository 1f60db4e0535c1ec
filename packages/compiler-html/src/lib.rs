//! # Weekly HTML compiler
//!
//! Turns an issue's ordered sections into the HTML of the newsletter body.
//!
//! ```ignore
//! use weekly_common::{CampaignSlug, Section, SectionKind};
//! use weekly_compiler_html::{compile_to_html, CommonMarkCompiler};
//!
//! let sections = vec![Section::seed(SectionKind::Markdown)];
//! let html = compile_to_html(&sections, &CommonMarkCompiler, &CampaignSlug::new("42")).await?;
//! ```

pub mod beautify;
pub mod compiler;
pub mod error;
pub mod link_card;
pub mod link_through;
pub mod markdown;
pub mod summary;
pub mod utils;

pub use beautify::{TextBeautifier, Typographer};
pub use compiler::{CompileOptions, IndentedStylesheetCompiler, SectionCompiler, StylesheetCompiler};
pub use error::{CompileError, CompileResult, MarkdownError, SectionError};
pub use link_card::{render_link_card, LinkCard};
pub use link_through::{link_through, LinkThrough, UTM_MEDIUM, UTM_SOURCE};
pub use markdown::{CommonMarkCompiler, MarkdownCompiler};
pub use summary::{Summary, SummaryGenerator, TextSummarizer};
pub use utils::{escape_html, html_to_text, strip_paragraph};

use weekly_common::{CampaignSlug, Section};

/// Compile `sections` with the default collaborators
pub async fn compile_to_html(
    sections: &[Section],
    markdown: &dyn MarkdownCompiler,
    slug: &CampaignSlug,
) -> CompileResult<String> {
    SectionCompiler::new()
        .compile(sections, &CompileOptions::new(markdown, slug))
        .await
}

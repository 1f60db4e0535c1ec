//! # Live preview
//!
//! A [`PreviewPass`] compiles one [`PreviewSnapshot`] of the document into a
//! [`PreviewFrame`]: the issue HTML (or an inline error block), the summary
//! panel and the per-link title decorations shown in the editor.
//!
//! [`PreviewLoop`] drives passes from a stream of snapshots through the
//! [`PreviewScheduler`], so bursts of edits coalesce and a pass that finishes
//! after a newer edit never reaches the surface.

use crate::config::EditorConfig;
use crate::document::SectionId;
use crate::scheduler::{Admission, Generation, PreviewScheduler};
use futures::future::{LocalBoxFuture, OptionFuture};
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, instrument, warn};
use weekly_common::{CampaignSlug, LinkSection, Section};
use weekly_compiler_html::{
    escape_html, strip_paragraph, CommonMarkCompiler, CompileOptions, MarkdownCompiler,
    SectionCompiler, SummaryGenerator, TextSummarizer,
};

/// Document state a preview pass compiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSnapshot {
    pub generation: Generation,
    pub slug: CampaignSlug,
    pub sections: Vec<(SectionId, Section)>,
    pub summary: String,
}

/// Title teaser shown next to a link section's heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDecoration {
    pub id: SectionId,
    /// Short summary prefixed with a dash, or empty
    pub suffix_html: String,
    /// Full title text, set only when the short summary cut something off
    pub aria_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub generation: Generation,
    /// Compiled issue, or the error block when compilation failed
    pub body_html: String,
    pub error: Option<String>,
    pub summary_html: String,
    pub links: Vec<LinkDecoration>,
}

/// Where accepted frames are shown
pub trait PreviewSurface {
    fn render(&mut self, frame: &PreviewFrame);
}

/// Inline block shown instead of the issue when compilation fails
pub fn error_block(message: &str) -> String {
    format!(r#"<pre class="wa-error">{}</pre>"#, escape_html(message))
}

#[derive(Clone)]
pub struct PreviewPass {
    compiler: SectionCompiler,
    markdown: Arc<dyn MarkdownCompiler>,
    summaries: Arc<dyn SummaryGenerator>,
    short_summary_length: usize,
}

impl PreviewPass {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            compiler: SectionCompiler::new().with_known_tags(config.known_tags.clone()),
            markdown: Arc::new(CommonMarkCompiler::new()),
            summaries: Arc::new(TextSummarizer),
            short_summary_length: config.short_summary_length,
        }
    }

    pub fn with_compiler(mut self, compiler: SectionCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_markdown(mut self, markdown: Arc<dyn MarkdownCompiler>) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn with_summaries(mut self, summaries: Arc<dyn SummaryGenerator>) -> Self {
        self.summaries = summaries;
        self
    }

    #[instrument(skip_all, fields(generation = %snapshot.generation, sections = snapshot.sections.len()))]
    pub async fn run(&self, snapshot: &PreviewSnapshot) -> PreviewFrame {
        let sections: Vec<Section> = snapshot
            .sections
            .iter()
            .map(|(_, section)| section.clone())
            .collect();
        let options = CompileOptions::new(self.markdown.as_ref(), &snapshot.slug);

        let (body_html, error) = match self.compiler.compile(&sections, &options).await {
            Ok(html) => (html, None),
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "Preview compile failed");
                (error_block(&message), Some(message))
            }
        };

        let summary_html = self
            .markdown
            .compile(&snapshot.summary, None)
            .unwrap_or_else(|err| error_block(&err.to_string()));

        let links = snapshot
            .sections
            .iter()
            .filter_map(|(id, section)| section.as_link().map(|link| self.decorate_link(*id, link)))
            .collect();

        PreviewFrame {
            generation: snapshot.generation,
            body_html,
            error,
            summary_html,
            links,
        }
    }

    pub fn decorate_link(&self, id: SectionId, link: &LinkSection) -> LinkDecoration {
        let title = match self.markdown.compile(&link.title, None) {
            Ok(html) => strip_paragraph(&html).to_string(),
            Err(_) => escape_html(&link.title),
        };
        let long = self.summaries.summarize(&title, None);
        let short = self.summaries.summarize(&title, Some(self.short_summary_length));

        let short_html = short.html.trim();
        let suffix_html = if short_html.is_empty() {
            String::new()
        } else {
            format!(" \u{2013} {}", short_html)
        };

        let long_text = long.text.trim();
        let truncated = short.text.trim().chars().count() < long_text.chars().count();

        LinkDecoration {
            id,
            suffix_html,
            aria_label: truncated.then(|| long_text.to_string()),
        }
    }
}

/// Async driver feeding snapshots through the scheduler into passes
pub struct PreviewLoop<S> {
    scheduler: PreviewScheduler,
    pass: Arc<PreviewPass>,
    surface: S,
    snapshots: mpsc::UnboundedReceiver<PreviewSnapshot>,
}

impl<S: PreviewSurface> PreviewLoop<S> {
    pub fn new(
        scheduler: PreviewScheduler,
        pass: PreviewPass,
        surface: S,
        snapshots: mpsc::UnboundedReceiver<PreviewSnapshot>,
    ) -> Self {
        Self {
            scheduler,
            pass: Arc::new(pass),
            surface,
            snapshots,
        }
    }

    /// Run until the snapshot channel closes and the last requested pass has
    /// been handled. Returns the surface.
    pub async fn run(self) -> S {
        let Self {
            mut scheduler,
            pass,
            mut surface,
            mut snapshots,
        } = self;

        let mut latest: Option<PreviewSnapshot> = None;
        let mut in_flight: Option<LocalBoxFuture<'static, PreviewFrame>> = None;
        let mut open = true;

        loop {
            if !open && in_flight.is_none() && scheduler.next_deadline().is_none() {
                break;
            }
            let deadline = scheduler.next_deadline();

            tokio::select! {
                received = snapshots.recv(), if open => match received {
                    Some(snapshot) => {
                        scheduler.request(snapshot.generation, Instant::now());
                        latest = Some(snapshot);
                    }
                    None => open = false,
                },

                Some(frame) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                    in_flight = None;
                    match scheduler.complete(frame.generation) {
                        Admission::Render => {
                            info!(generation = %frame.generation, failed = frame.error.is_some(), "Preview rendered");
                            surface.render(&frame);
                        }
                        Admission::Stale => debug!(generation = %frame.generation, "Preview frame discarded"),
                    }
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let Some(generation) = scheduler.poll(Instant::now()) else {
                        continue;
                    };
                    match latest.take() {
                        Some(snapshot) => {
                            let pass = Arc::clone(&pass);
                            in_flight = Some(async move { pass.run(&snapshot).await }.boxed_local());
                        }
                        None => {
                            scheduler.complete(generation);
                        }
                    }
                }
            }
        }

        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(title: &str) -> LinkSection {
        LinkSection {
            title: title.to_string(),
            ..LinkSection::default()
        }
    }

    #[test]
    fn test_short_title_has_no_label() {
        let pass = PreviewPass::new(&EditorConfig::default());
        let decoration = pass.decorate_link(SectionId(1), &link("Short *title*"));

        assert_eq!(decoration.suffix_html, " \u{2013} Short <em>title</em>");
        assert_eq!(decoration.aria_label, None);
    }

    #[test]
    fn test_long_title_is_labelled() {
        let pass = PreviewPass::new(&EditorConfig::default());
        let title = "A really quite long title that will not fit in thirty";
        let decoration = pass.decorate_link(SectionId(1), &link(title));

        assert!(decoration.suffix_html.ends_with('\u{2026}'));
        assert_eq!(decoration.aria_label.as_deref(), Some(title));
    }

    #[test]
    fn test_empty_title_has_no_suffix() {
        let pass = PreviewPass::new(&EditorConfig::default());
        let decoration = pass.decorate_link(SectionId(1), &link(""));
        assert_eq!(decoration.suffix_html, "");
        assert_eq!(decoration.aria_label, None);
    }

    #[tokio::test]
    async fn test_failed_compile_renders_error_block() {
        let pass = PreviewPass::new(&EditorConfig::default());
        let snapshot = PreviewSnapshot {
            generation: Generation(3),
            slug: CampaignSlug::new("3"),
            sections: vec![(
                SectionId(1),
                Section::Styles(weekly_common::StylesSection {
                    styles: "<b> red\n".to_string(),
                }),
            )],
            summary: "Hello **there**".to_string(),
        };

        let frame = pass.run(&snapshot).await;

        assert!(frame.body_html.starts_with(r#"<pre class="wa-error">styles section #0"#));
        assert!(frame.body_html.contains("&quot;&lt;b&gt;&quot;"));
        assert!(frame.error.is_some());
        assert_eq!(frame.summary_html, "<p>Hello <strong>there</strong></p>\n");
    }
}

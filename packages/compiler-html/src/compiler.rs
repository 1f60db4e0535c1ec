use crate::beautify::{TextBeautifier, Typographer};
use crate::error::{CompileError, CompileResult, SectionError};
use crate::link_card::{render_link_card, LinkCard};
use crate::link_through::LinkThrough;
use crate::markdown::MarkdownCompiler;
use crate::utils::{escape_html, strip_paragraph};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};
use weekly_common::{
    CampaignSlug, HeaderSection, KnownTagCatalog, LinkSection, MarkdownSection, Section,
    StylesSection,
};
use weekly_compiler_css::{compile_to_css, StylesheetError};

/// Compiles `styles` section source into CSS
#[async_trait]
pub trait StylesheetCompiler: Send + Sync {
    async fn compile(&self, source: &str) -> Result<String, StylesheetError>;
}

/// [`StylesheetCompiler`] backed by `weekly-compiler-css`
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentedStylesheetCompiler;

#[async_trait]
impl StylesheetCompiler for IndentedStylesheetCompiler {
    async fn compile(&self, source: &str) -> Result<String, StylesheetError> {
        compile_to_css(source)
    }
}

/// Per-pass options
#[derive(Clone, Copy)]
pub struct CompileOptions<'a> {
    pub markdown: &'a dyn MarkdownCompiler,
    pub slug: &'a CampaignSlug,
}

impl<'a> CompileOptions<'a> {
    pub fn new(markdown: &'a dyn MarkdownCompiler, slug: &'a CampaignSlug) -> Self {
        Self { markdown, slug }
    }
}

/// Turns an ordered list of sections into issue HTML.
///
/// Sections compile concurrently; the output keeps document order and the
/// first failing section fails the whole pass.
#[derive(Clone)]
pub struct SectionCompiler {
    stylesheet: Arc<dyn StylesheetCompiler>,
    beautifier: Arc<dyn TextBeautifier>,
    known_tags: KnownTagCatalog,
}

impl SectionCompiler {
    pub fn new() -> Self {
        Self {
            stylesheet: Arc::new(IndentedStylesheetCompiler),
            beautifier: Arc::new(Typographer),
            known_tags: KnownTagCatalog::builtin(),
        }
    }

    pub fn with_stylesheet_compiler(mut self, stylesheet: Arc<dyn StylesheetCompiler>) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn with_beautifier(mut self, beautifier: Arc<dyn TextBeautifier>) -> Self {
        self.beautifier = beautifier;
        self
    }

    pub fn with_known_tags(mut self, known_tags: KnownTagCatalog) -> Self {
        self.known_tags = known_tags;
        self
    }

    pub fn known_tags(&self) -> &KnownTagCatalog {
        &self.known_tags
    }

    #[instrument(skip_all, fields(sections = sections.len(), campaign = %options.slug))]
    pub async fn compile(
        &self,
        sections: &[Section],
        options: &CompileOptions<'_>,
    ) -> CompileResult<String> {
        let link_through = LinkThrough::new(options.slug.clone());

        let compiled = try_join_all(
            sections
                .iter()
                .enumerate()
                .map(|(index, section)| self.compile_section(index, section, options, &link_through)),
        )
        .await?;

        debug!(bytes = compiled.iter().map(String::len).sum::<usize>(), "Sections compiled");
        Ok(compiled.concat())
    }

    async fn compile_section(
        &self,
        index: usize,
        section: &Section,
        options: &CompileOptions<'_>,
        link_through: &LinkThrough,
    ) -> CompileResult<String> {
        let result = match section {
            Section::Header(header) => self.header_html(header, options, link_through),
            Section::Markdown(markdown) => self.markdown_html(markdown, options, link_through),
            Section::Link(link) => self.link_html(link, options, link_through),
            Section::Styles(styles) => self.styles_html(styles).await,
        };

        result.map_err(|source| {
            debug!(index, kind = %section.kind(), error = %source, "Section failed to compile");
            CompileError::Section {
                index,
                kind: section.kind(),
                source,
            }
        })
    }

    fn header_html(
        &self,
        header: &HeaderSection,
        options: &CompileOptions<'_>,
        link_through: &LinkThrough,
    ) -> Result<String, SectionError> {
        let level = header.size.get();
        let body = options.markdown.compile(&header.text, Some(link_through))?;
        Ok(format!(
            r#"<div class="wy-section-header"><h{level} class="md-markdown" style="color:{};background-color:{};padding:10px;">{}</h{level}></div>"#,
            escape_html(&header.foreground),
            escape_html(&header.background),
            body,
        ))
    }

    fn markdown_html(
        &self,
        markdown: &MarkdownSection,
        options: &CompileOptions<'_>,
        link_through: &LinkThrough,
    ) -> Result<String, SectionError> {
        let body = options.markdown.compile(&markdown.text, Some(link_through))?;
        Ok(format!(
            r#"<div class="wy-section-markdown md-markdown">{}</div>"#,
            body
        ))
    }

    fn link_html(
        &self,
        link: &LinkSection,
        options: &CompileOptions<'_>,
        link_through: &LinkThrough,
    ) -> Result<String, SectionError> {
        let title_html = options.markdown.compile(&link.title, Some(link_through))?;
        let card = LinkCard {
            title_html: strip_paragraph(&title_html).to_string(),
            description_html: options.markdown.compile(&link.description, Some(link_through))?,
            href: link_through.rewrite(&link.href),
            source: self.beautifier.beautify(&link.source),
            source_href: link_through.rewrite(&link.source_href),
            ..LinkCard::from_section(link)
        };
        Ok(render_link_card(&card, &self.known_tags))
    }

    async fn styles_html(&self, styles: &StylesSection) -> Result<String, SectionError> {
        let css = self.stylesheet.compile(&styles.styles).await?;
        Ok(format!("<style>{}</style>", css))
    }
}

impl Default for SectionCompiler {
    fn default() -> Self {
        Self::new()
    }
}

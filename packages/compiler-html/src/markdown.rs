//! Markdown collaborator.
//!
//! The default compiler is CommonMark (tables and strikethrough enabled) with
//! raw HTML escaped and script links and image sources neutralized. Every link it emits goes
//! through the campaign's [`LinkThrough`] when one is supplied.

use crate::error::MarkdownError;
use crate::link_through::LinkThrough;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Turns markdown text into an HTML fragment
pub trait MarkdownCompiler: Send + Sync {
    fn compile(&self, text: &str, link_through: Option<&LinkThrough>) -> Result<String, MarkdownError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkCompiler;

impl CommonMarkCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownCompiler for CommonMarkCompiler {
    fn compile(&self, text: &str, link_through: Option<&LinkThrough>) -> Result<String, MarkdownError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let events = Parser::new_ext(text, options).map(|event| match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let safe = sanitize_href(&dest_url);
                let dest = match link_through {
                    Some(rewriter) => rewriter.rewrite(safe),
                    None => safe.to_string(),
                };
                Event::Start(Tag::Link {
                    link_type,
                    dest_url: CowStr::from(dest),
                    title,
                    id,
                })
            }
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: CowStr::from(sanitize_href(&dest_url).to_string()),
                title,
                id,
            }),
            // Raw HTML is shown, never interpreted.
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut output = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut output, events);
        Ok(output)
    }
}

fn sanitize_href(href: &str) -> &str {
    let scheme = href.trim_start().to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("vbscript:") || scheme.starts_with("data:") {
        "#"
    } else {
        href
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekly_common::CampaignSlug;

    #[test]
    fn test_compile_emphasis() {
        let html = CommonMarkCompiler.compile("**bold**", None).unwrap();
        assert_eq!(html, "<p><strong>bold</strong></p>\n");
    }

    #[test]
    fn test_links_go_through_rewriter() {
        let rewriter = LinkThrough::new(CampaignSlug::new("9"));
        let html = CommonMarkCompiler
            .compile("[site](https://example.com/)", Some(&rewriter))
            .unwrap();
        assert!(html.contains(
            r#"href="https://example.com/?utm_source=ponyfoo+weekly&amp;utm_medium=email&amp;utm_campaign=issue-9""#
        ));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = CommonMarkCompiler.compile("hi <script>alert(1)</script>", None).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_script_links_are_neutralized() {
        let html = CommonMarkCompiler.compile("[x](javascript:alert(1))", None).unwrap();
        assert!(html.contains(r##"href="#""##));
    }

    #[test]
    fn test_script_image_sources_are_neutralized() {
        let html = CommonMarkCompiler.compile("![x](javascript:alert(1))", None).unwrap();
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r##"src="#""##));

        let html = CommonMarkCompiler.compile("![x](data:image/svg+xml;base64,PHN2Zz4=)", None).unwrap();
        assert!(!html.contains("data:"));
    }

    #[test]
    fn test_image_sources_skip_rewriter() {
        let rewriter = LinkThrough::new(CampaignSlug::new("9"));
        let html = CommonMarkCompiler
            .compile("![logo](https://example.com/logo.png)", Some(&rewriter))
            .unwrap();
        assert!(html.contains(r#"src="https://example.com/logo.png""#));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(CommonMarkCompiler.compile("", None).unwrap(), "");
    }
}

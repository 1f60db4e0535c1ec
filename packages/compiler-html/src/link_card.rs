//! Link-card template.
//!
//! A [`LinkCard`] is a link section after compilation: markdown already
//! rendered, hrefs already tracked, source text already beautified. The
//! template only escapes and lays it out.

use crate::utils::escape_html;
use weekly_common::{KnownTagCatalog, LinkSection, LinkSubtype};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCard {
    pub subtype: LinkSubtype,
    pub title_html: String,
    pub description_html: String,
    pub href: String,
    pub foreground: String,
    pub background: String,
    pub source: String,
    pub source_href: String,
    pub image: String,
    pub sponsored: bool,
    pub tags: Vec<String>,
}

impl LinkCard {
    /// Carry over the fields of `section` that need no compilation
    pub fn from_section(section: &LinkSection) -> Self {
        Self {
            subtype: section.subtype,
            foreground: section.foreground.clone(),
            background: section.background.clone(),
            image: section.image.clone(),
            sponsored: section.sponsored,
            tags: section.tags.clone(),
            ..Self::default()
        }
    }
}

pub fn render_link_card(card: &LinkCard, known_tags: &KnownTagCatalog) -> String {
    let href = escape_html(&card.href);
    let mut html = format!(
        r#"<div class="wy-section-link wy-link-{}" style="color:{};background-color:{};">"#,
        card.subtype.as_str(),
        escape_html(&card.foreground),
        escape_html(&card.background)
    );

    if !card.image.is_empty() {
        html.push_str(&format!(
            r#"<a class="wy-link-image" href="{}"><img src="{}" alt=""></a>"#,
            href,
            escape_html(&card.image)
        ));
    }

    html.push_str(&format!(
        r#"<h3 class="wy-link-title"><a href="{}" style="color:{};">{}</a>"#,
        href,
        escape_html(&card.foreground),
        card.title_html
    ));
    if card.sponsored {
        html.push_str(r#"<span class="wy-link-sponsored">Sponsor</span>"#);
    }
    html.push_str("</h3>");

    if !card.source.is_empty() {
        html.push_str(&format!(
            r#"<span class="wy-link-source">via <a href="{}">{}</a></span>"#,
            escape_html(&card.source_href),
            escape_html(&card.source)
        ));
    }

    if !card.tags.is_empty() {
        html.push_str(r#"<div class="wy-link-tags">"#);
        for tag in &card.tags {
            let (class, label) = match known_tags.get(tag) {
                Some(known) => (format!(" wy-link-tag-{}", escape_html(&known.slug)), known.title.as_str()),
                None => (String::new(), tag.as_str()),
            };
            html.push_str(&format!(
                r#"<span class="wy-link-tag{}">{}</span>"#,
                class,
                escape_html(label)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(&format!(
        r#"<div class="wy-link-description md-markdown">{}</div></div>"#,
        card.description_html
    ));

    html
}

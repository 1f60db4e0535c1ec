//! Summary collaborator: long and length-limited teasers of an HTML fragment.

use crate::utils::{escape_html, html_to_text};

/// Summary of an HTML fragment in two renditions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub html: String,
    pub text: String,
}

pub trait SummaryGenerator: Send + Sync {
    /// Summarize `html`, truncating to `limit` characters when given
    fn summarize(&self, html: &str, limit: Option<usize>) -> Summary;
}

/// Plain-text summaries ending in an ellipsis when truncated
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSummarizer;

impl SummaryGenerator for TextSummarizer {
    fn summarize(&self, html: &str, limit: Option<usize>) -> Summary {
        let text = html_to_text(html);

        match limit {
            Some(limit) if limit > 0 && text.chars().count() > limit => {
                let mut cut: String = text.chars().take(limit - 1).collect();
                cut.truncate(cut.trim_end().len());
                cut.push('\u{2026}');
                Summary {
                    html: escape_html(&cut),
                    text: cut,
                }
            }
            _ => Summary {
                html: html.trim().to_string(),
                text,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_not_truncated() {
        let summary = TextSummarizer.summarize("Hello <em>world</em>", Some(30));
        assert_eq!(summary.text, "Hello world");
        assert_eq!(summary.html, "Hello <em>world</em>");
    }

    #[test]
    fn test_long_text_is_truncated_to_budget() {
        let title = "An unreasonably long title for a weekly link";
        let summary = TextSummarizer.summarize(title, Some(30));
        assert_eq!(summary.text.chars().count(), 30);
        assert!(summary.text.ends_with('\u{2026}'));
        assert!(summary.text.chars().count() < TextSummarizer.summarize(title, None).text.chars().count());
    }

    #[test]
    fn test_unbounded_summary() {
        let summary = TextSummarizer.summarize("<strong>a &amp; b</strong>", None);
        assert_eq!(summary.text, "a & b");
    }
}

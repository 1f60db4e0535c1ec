//! # Link-through
//!
//! Tags outbound web links with campaign tracking parameters. Every existing
//! `utm_*` parameter is dropped first, so rewriting is idempotent.

use url::{form_urlencoded, Position, Url};
use weekly_common::CampaignSlug;

pub const UTM_SOURCE: &str = "ponyfoo+weekly";
pub const UTM_MEDIUM: &str = "email";

/// Link rewriter bound to one campaign
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkThrough {
    campaign: CampaignSlug,
}

impl LinkThrough {
    pub fn new(campaign: CampaignSlug) -> Self {
        Self { campaign }
    }

    pub fn campaign(&self) -> &CampaignSlug {
        &self.campaign
    }

    pub fn rewrite(&self, href: &str) -> String {
        link_through(href, &self.campaign)
    }
}

/// Rewrite `href` so it carries this newsletter's tracking parameters.
///
/// Empty links and links with a non-web scheme (`mailto:`, `ftp:`, ...) are
/// returned untouched. Relative links keep their path verbatim.
pub fn link_through(href: &str, campaign: &CampaignSlug) -> String {
    if href.is_empty() {
        return String::new();
    }

    match Url::parse(href) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                return href.to_string();
            }
            let pairs = url.query_pairs().into_owned().collect();
            let fragment = url.fragment().map(|f| format!("#{}", f)).unwrap_or_default();
            format!(
                "{}{}{}",
                &url[..Position::AfterPath],
                tracking_query(pairs, campaign),
                fragment
            )
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let (rest, fragment) = match href.find('#') {
                Some(at) => href.split_at(at),
                None => (href, ""),
            };
            let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
            let pairs = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
            format!("{}{}{}", path, tracking_query(pairs, campaign), fragment)
        }
        Err(_) => href.to_string(),
    }
}

fn tracking_query(pairs: Vec<(String, String)>, campaign: &CampaignSlug) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs.iter().filter(|(key, _)| !key.starts_with("utm_")) {
        serializer.append_pair(key, value);
    }
    serializer.append_pair("utm_source", UTM_SOURCE);
    serializer.append_pair("utm_medium", UTM_MEDIUM);
    if !campaign.is_empty() {
        serializer.append_pair("utm_campaign", campaign.as_str());
    }

    // The serializer already writes spaces as `+`; literal pluses follow suit.
    format!("?{}", serializer.finish().replace("%2B", "+"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> CampaignSlug {
        CampaignSlug::new(s)
    }

    #[test]
    fn test_adds_tracking_parameters() {
        assert_eq!(
            link_through("https://example.com/post", &slug("42")),
            "https://example.com/post?utm_source=ponyfoo+weekly&utm_medium=email&utm_campaign=issue-42"
        );
    }

    #[test]
    fn test_empty_campaign_omits_campaign_parameter() {
        assert_eq!(
            link_through("http://example.com/", &slug("")),
            "http://example.com/?utm_source=ponyfoo+weekly&utm_medium=email"
        );
    }

    #[test]
    fn test_replaces_existing_utm_parameters_and_keeps_others() {
        let rewritten = link_through(
            "https://example.com/a?utm_source=twitter&page=2&utm_medium=social#top",
            &slug("my-issue"),
        );
        assert_eq!(
            rewritten,
            "https://example.com/a?page=2&utm_source=ponyfoo+weekly&utm_medium=email&utm_campaign=my-issue#top"
        );
    }

    #[test]
    fn test_non_web_schemes_are_untouched() {
        assert_eq!(link_through("mailto:a@b.com", &slug("42")), "mailto:a@b.com");
        assert_eq!(link_through("ftp://files.example.com/x", &slug("42")), "ftp://files.example.com/x");
    }

    #[test]
    fn test_empty_href_is_untouched() {
        assert_eq!(link_through("", &slug("42")), "");
    }

    #[test]
    fn test_relative_links_keep_their_path() {
        assert_eq!(
            link_through("/articles/x?q=a+b#c", &slug("")),
            "/articles/x?q=a+b&utm_source=ponyfoo+weekly&utm_medium=email#c"
        );
    }

    #[test]
    fn test_spaces_and_pluses_become_literal_plus() {
        assert_eq!(
            link_through("https://example.com/?q=c%2B%2B%20rocks", &slug("")),
            "https://example.com/?q=c+++rocks&utm_source=ponyfoo+weekly&utm_medium=email"
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let campaign = slug("7");
        let inputs = [
            "https://example.com",
            "https://example.com/a?b=1&utm_campaign=old&utm_content=x#frag",
            "http://example.com:8080/p?q=hello%20world",
            "/relative?x=1",
            "docs/page",
            "https://example.com/?q=c%2B%2B",
            "mailto:someone@example.com",
        ];

        for input in inputs {
            let once = link_through(input, &campaign);
            let twice = link_through(&once, &campaign);
            assert_eq!(once, twice, "not idempotent for {}", input);
            assert!(once.matches("utm_source=").count() <= 1);
            assert!(once.matches("utm_campaign=").count() <= 1);
        }
    }

    #[test]
    fn test_bound_rewriter() {
        let rewriter = LinkThrough::new(slug("my-issue"));
        assert_eq!(rewriter.campaign().as_str(), "my-issue");
        assert!(rewriter.rewrite("https://a.io").ends_with("utm_campaign=my-issue"));
    }
}

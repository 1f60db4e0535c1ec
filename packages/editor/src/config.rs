//! Timing and catalog settings for an editor session.

use std::time::Duration;
use weekly_common::KnownTagCatalog;

pub const DEFAULT_PREVIEW_QUIET: Duration = Duration::from_millis(100);
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);
pub const DEFAULT_SCRAPE_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_SHORT_SUMMARY_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Edits closer together than this collapse into one preview pass
    pub preview_quiet: Duration,

    /// Preview passes start on multiples of this interval
    pub frame_interval: Duration,

    /// Delay between the last href edit and the scrape it triggers
    pub scrape_debounce: Duration,

    /// Character budget of the short link-title summary
    pub short_summary_length: usize,

    pub known_tags: KnownTagCatalog,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            preview_quiet: DEFAULT_PREVIEW_QUIET,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            scrape_debounce: DEFAULT_SCRAPE_DEBOUNCE,
            short_summary_length: DEFAULT_SHORT_SUMMARY_LENGTH,
            known_tags: KnownTagCatalog::builtin(),
        }
    }
}

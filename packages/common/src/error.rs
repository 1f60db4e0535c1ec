use thiserror::Error;

/// Errors raised while interpreting section and issue data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown section type: {0}")]
    UnknownSectionKind(String),

    #[error("Heading size must be between 1 and 6, got {0}")]
    InvalidHeadingLevel(u8),

    #[error("Unknown link subtype: {0}")]
    UnknownLinkSubtype(String),

    #[error("Unknown issue status: {0}")]
    UnknownStatus(String),
}

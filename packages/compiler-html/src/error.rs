use thiserror::Error;
use weekly_common::SectionKind;
use weekly_compiler_css::StylesheetError;

pub type CompileResult<T> = Result<T, CompileError>;

/// Failure of a whole compile pass, attributed to the section that caused it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("{kind} section #{index}: {source}")]
    Section {
        index: usize,
        kind: SectionKind,
        #[source]
        source: SectionError,
    },
}

impl CompileError {
    /// Position of the failing section in the document
    pub fn index(&self) -> usize {
        match self {
            CompileError::Section { index, .. } => *index,
        }
    }
}

/// Failure of one section's compiler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectionError {
    #[error("Stylesheet error: {0}")]
    Stylesheet(#[from] StylesheetError),

    #[error("Markdown error: {0}")]
    Markdown(#[from] MarkdownError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkdownError {
    #[error("Markdown compilation failed: {0}")]
    Render(String),
}

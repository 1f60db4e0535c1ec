use thiserror::Error;

pub type StylesheetResult<T> = Result<T, StylesheetError>;

/// Errors raised while compiling stylesheet source. Lines are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StylesheetError {
    #[error("Unexpected indentation at line {line}")]
    UnexpectedIndent { line: usize },

    #[error("Indentation at line {line} does not match any enclosing block")]
    InconsistentDedent { line: usize },

    #[error("Property \"{property}\" at line {line} is not inside a selector")]
    PropertyOutsideRule { line: usize, property: String },

    #[error("Property \"{property}\" at line {line} has no value")]
    MissingValue { line: usize, property: String },

    #[error("Undefined variable {name} at line {line}")]
    UndefinedVariable { line: usize, name: String },

    #[error("Empty selector at line {line}")]
    EmptySelector { line: usize },

    #[error("Unmatched \"}}\" at line {line}")]
    UnmatchedBrace { line: usize },

    #[error("Block opened at line {line} is never closed")]
    UnclosedBrace { line: usize },
}

impl StylesheetError {
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedIndent { line }
            | Self::InconsistentDedent { line }
            | Self::PropertyOutsideRule { line, .. }
            | Self::MissingValue { line, .. }
            | Self::UndefinedVariable { line, .. }
            | Self::EmptySelector { line }
            | Self::UnmatchedBrace { line }
            | Self::UnclosedBrace { line } => *line,
        }
    }
}

//! Translation failures.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use xlate_common::Span;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Why translation of a unit stopped.
///
/// `Unsupported` aborts only the current unit; every other variant means the
/// tree and the source text disagree or the engine broke an invariant.
#[derive(Error, Diagnostic, Debug, Clone)]
pub enum TranslateError {
    #[error("unsupported construct: {reason}")]
    #[diagnostic(code(xlate::unsupported), help("rewrite this construct or translate the unit by hand"))]
    Unsupported {
        reason: String,
        #[label("no mapping for this construct")]
        span: SourceSpan,
    },

    #[error("expected `{expected}` but found `{found}` at offset {offset}")]
    #[diagnostic(code(xlate::token_mismatch))]
    TokenMismatch {
        expected: String,
        found: String,
        offset: usize,
        #[label("source text and tree disagree here")]
        span: SourceSpan,
    },

    #[error("output buffer misuse: {0}")]
    #[diagnostic(code(xlate::buffer_discipline))]
    BufferDiscipline(String),

    #[error("internal error: {0}")]
    #[diagnostic(code(xlate::internal))]
    Internal(String),
}

impl TranslateError {
    pub fn unsupported(reason: impl Into<String>, span: Span) -> Self {
        TranslateError::Unsupported {
            reason: reason.into(),
            span: span.into(),
        }
    }

    pub fn token_mismatch(expected: &str, found: &str, offset: u32) -> Self {
        TranslateError::TokenMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            offset: offset as usize,
            span: Span::new(offset, offset + found.len() as u32).into(),
        }
    }

    /// Everything except an unsupported construct is a bug, not a property of the input.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TranslateError::Unsupported { .. })
    }

    /// The offending source span, if the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            TranslateError::Unsupported { span, .. } | TranslateError::TokenMismatch { span, .. } => {
                let start = span.offset() as u32;
                Some(Span::new(start, start + span.len() as u32))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unsupported_is_recoverable() {
        let unsupported = TranslateError::unsupported("multi-dimensional array creation", Span::new(3, 9));
        assert!(!unsupported.is_fatal());
        assert_eq!(unsupported.span(), Some(Span::new(3, 9)));
        assert_eq!(
            unsupported.to_string(),
            "unsupported construct: multi-dimensional array creation"
        );

        let mismatch = TranslateError::token_mismatch("class", "clas", 0);
        assert!(mismatch.is_fatal());
        assert!(TranslateError::BufferDiscipline("pop of empty stack".into()).is_fatal());
        assert!(TranslateError::Internal("missing binding".into()).is_fatal());
    }
}

//! Lenient diagnostics: problems that are reported but never stop a pass.

use std::fmt;

use thiserror::Error;

use crate::directive::DirectiveKind;
use crate::expr::{ExprError, LexWarning};

/// What went wrong on a directive line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    /// The condition failed to parse and was treated as false.
    #[error(transparent)]
    Expression(#[from] ExprError),
    /// The condition used a tolerated lexical irregularity.
    #[error(transparent)]
    Lexical(#[from] LexWarning),
    /// Text followed a directive that takes no further argument.
    #[error("ignoring extra text after `{directive}`: {text:?}")]
    ExtraText {
        /// The directive carrying the text.
        directive: DirectiveKind,
        /// The ignored text, trimmed.
        text: String,
    },
    /// `elif`, `else` or `endif` appeared outside any conditional group.
    #[error("`{directive}` without a matching `if`; copied as text")]
    StrayClause {
        /// The orphaned directive.
        directive: DirectiveKind,
    },
    /// `elif` or `else` appeared after the group's `else`.
    #[error("`{directive}` after `else` in the same group")]
    ClauseAfterElse {
        /// The late clause.
        directive: DirectiveKind,
    },
    /// The stream ended with conditional groups still open.
    #[error("{open} conditional group(s) not closed by `endif` before end of input")]
    Unterminated {
        /// Number of groups left open.
        open: usize,
    },
}

/// A lenient problem tied to the line where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// One-based line number of the directive.
    pub line: usize,
    /// What went wrong.
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for Diagnostic {}

/// Outcome of a successful pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Diagnostics in the order they were found.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether the pass produced no diagnostics.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub(crate) fn push(&mut self, line: usize, kind: impl Into<DiagnosticKind>) {
        let diagnostic = Diagnostic {
            line,
            kind: kind.into(),
        };
        tracing::warn!(line, "{}", diagnostic.kind);
        self.diagnostics.push(diagnostic);
    }
}

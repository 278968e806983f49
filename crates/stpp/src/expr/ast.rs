//! Syntax tree for conditions and its evaluation against a [`TagContext`].
//!
//! Binary operators carry no precedence: every operator takes the whole rest
//! of the line as its right operand, so `a && b || c` means `a && (b || c)`.
//! A run of binary operators is stored flat as a [`Expr::Chain`] and folded
//! from the right when evaluated, which keeps long chains off the call stack.
//! `Display` prints the grouping fully parenthesised.

use std::fmt;

use thiserror::Error;

use super::lexer::{Lexed, Lexer};
use super::parser::Parser;
use crate::source::ByteSource;
use crate::tags::TagContext;

/// A parsed condition line.
///
/// # Examples
///
/// ```
/// use stpp::{Condition, TagContext};
///
/// let tags: TagContext = ["A", "C"].into_iter().collect();
/// // Parsed as `A && (B || C)`.
/// let condition = Condition::parse("A && B || C")?;
/// assert!(condition.evaluate(&tags));
/// assert_eq!(condition.to_string(), "(A && (B || C))");
/// # Ok::<(), stpp::ExprError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    root: Expr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    And,
    Or,
    Xor,
}

impl BinaryOp {
    fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Self::And => lhs && rhs,
            Self::Or => lhs || rhs,
            Self::Xor => lhs ^ rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Xor => "^",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Expr {
    Tag(Vec<u8>),
    Not(Box<Expr>),
    /// `l0 op0 l1 op1 … last`, grouped as `l0 op0 (l1 op1 (… last))`.
    /// `links` is never empty.
    Chain {
        links: Vec<(Expr, BinaryOp)>,
        last: Box<Expr>,
    },
}

/// Reasons a condition line fails to parse.
///
/// A failed condition evaluates to false; the pass carries on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExprError {
    /// The line held no tokens at all.
    #[error("expected condition but got nothing")]
    Empty,
    /// A token appeared where the grammar wanted something else.
    #[error("expected {expected} but got {found} at byte {offset}")]
    Unexpected {
        /// What the grammar required at this point.
        expected: &'static str,
        /// Description of the token that was found.
        found: String,
        /// Byte offset within the condition text.
        offset: usize,
    },
    /// The line ended inside a parenthesised group.
    #[error("missing ')' for '(' at byte {offset}")]
    UnclosedParen {
        /// Byte offset of the unmatched `(`.
        offset: usize,
    },
    /// A complete condition was followed by further tokens.
    #[error("unexpected {found} at byte {offset} after complete condition")]
    TrailingTokens {
        /// Description of the first leftover token.
        found: String,
        /// Byte offset within the condition text.
        offset: usize,
    },
    /// Operators or parentheses nest beyond the parser's limit.
    #[error("condition nests deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit.
        limit: usize,
    },
}

impl Condition {
    /// Parse a single condition line.
    ///
    /// Parsing stops at the first newline. Undoubled `&` and `|` operators
    /// are accepted silently here; the engine reports them as diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] when the text is empty or malformed.
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        let mut source = ByteSource::new(text.as_bytes());
        // Reading from a byte slice cannot fail.
        let lexed = Lexer::new(&mut source).tokenize().unwrap_or_default();
        Self::from_lexed(&lexed)
    }

    pub(crate) fn from_lexed(lexed: &Lexed) -> Result<Self, ExprError> {
        let root = Parser::new(&lexed.tokens).parse_condition()?;
        Ok(Self { root })
    }

    /// Evaluate against the current tag set.
    #[must_use]
    pub fn evaluate(&self, tags: &TagContext) -> bool {
        self.root.eval(tags)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl Expr {
    pub(crate) fn eval(&self, tags: &TagContext) -> bool {
        match self {
            Self::Tag(tag) => tags.is_defined(tag),
            Self::Not(inner) => !inner.eval(tags),
            Self::Chain { links, last } => links
                .iter()
                .rev()
                .fold(last.eval(tags), |rhs, (lhs, op)| op.apply(lhs.eval(tags), rhs)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(&String::from_utf8_lossy(tag)),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Chain { links, last } => {
                for (lhs, op) in links {
                    write!(f, "({lhs} {} ", op.symbol())?;
                }
                write!(f, "{last}")?;
                for _ in links {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

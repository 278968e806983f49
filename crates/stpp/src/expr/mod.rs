//! Condition lexing, parsing, and evaluation.
//!
//! Conditions use `&&`, `||`, `^`, `!`, parentheses and bare tag names. The
//! binary operators share one precedence level and group to the right; see
//! [`Condition`] for an example of what that means in practice.
mod ast;
mod lexer;
mod parser;

pub use ast::{Condition, ExprError};
pub use lexer::LexWarning;
pub(crate) use lexer::Lexer;
pub use parser::MAX_DEPTH;

#[cfg(test)]
mod tests;

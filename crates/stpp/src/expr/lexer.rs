//! Tokenises one condition line straight off the byte source.
//!
//! The lexer stops at the first newline (which it consumes) or at the end of
//! the stream. Operators are single bytes except `&&` and `||`; a lone `&` or
//! `|` is accepted as its doubled form and reported as a [`LexWarning`]. The
//! byte that follows a lone operator is pushed back so it is lexed normally.

use std::fmt;
use std::io::{self, BufRead};

use thiserror::Error;

use crate::source::{ByteSource, is_space};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// Byte offset of the token within the condition text.
    pub(crate) start: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Tag(Vec<u8>),
    ParenOpen,
    ParenClose,
    And,
    Or,
    Xor,
    Not,
    EndOfLine,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "tag `{}`", String::from_utf8_lossy(tag)),
            Self::ParenOpen => f.write_str("'('"),
            Self::ParenClose => f.write_str("')'"),
            Self::And => f.write_str("'&&'"),
            Self::Or => f.write_str("'||'"),
            Self::Xor => f.write_str("'^'"),
            Self::Not => f.write_str("'!'"),
            Self::EndOfLine => f.write_str("end of line"),
        }
    }
}

/// Tolerated lexical irregularity in a condition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexWarning {
    /// A single `&` or `|` where the doubled operator was meant.
    #[error("operator at byte {offset} is `{expected}`, not `{found}`")]
    UndoubledOperator {
        /// The byte that was found.
        found: char,
        /// The operator it was read as.
        expected: &'static str,
        /// Byte offset within the condition text.
        offset: usize,
    },
}

/// Tokens of one condition line, terminated by [`TokenKind::EndOfLine`].
#[derive(Debug, Default)]
pub(crate) struct Lexed {
    pub(crate) tokens: Vec<Token>,
    pub(crate) warnings: Vec<LexWarning>,
}

pub(crate) struct Lexer<'s, R> {
    source: &'s mut ByteSource<R>,
    pos: usize,
    tag: Vec<u8>,
    tag_start: usize,
    lexed: Lexed,
}

impl<'s, R: BufRead> Lexer<'s, R> {
    pub(crate) fn new(source: &'s mut ByteSource<R>) -> Self {
        Self {
            source,
            pos: 0,
            tag: Vec::new(),
            tag_start: 0,
            lexed: Lexed::default(),
        }
    }

    pub(crate) fn tokenize(mut self) -> io::Result<Lexed> {
        while let Some(byte) = self.bump()? {
            let start = self.pos - 1;
            match byte {
                b'\n' => break,
                b if is_space(b) => self.flush_tag(),
                b'!' => self.push_operator(TokenKind::Not, start),
                b'^' => self.push_operator(TokenKind::Xor, start),
                b'(' => self.push_operator(TokenKind::ParenOpen, start),
                b')' => self.push_operator(TokenKind::ParenClose, start),
                b'&' => self.lex_doubled(b'&', TokenKind::And, "&&", start)?,
                b'|' => self.lex_doubled(b'|', TokenKind::Or, "||", start)?,
                other => {
                    if self.tag.is_empty() {
                        self.tag_start = start;
                    }
                    self.tag.push(other);
                }
            }
        }
        self.flush_tag();
        let end = self.pos;
        self.lexed.tokens.push(Token {
            kind: TokenKind::EndOfLine,
            start: end,
        });
        Ok(self.lexed)
    }

    fn bump(&mut self) -> io::Result<Option<u8>> {
        let byte = self.source.next_byte()?;
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    fn unbump(&mut self, byte: u8) {
        self.source.unget(byte);
        self.pos -= 1;
    }

    fn push_operator(&mut self, kind: TokenKind, start: usize) {
        self.flush_tag();
        self.lexed.tokens.push(Token { kind, start });
    }

    fn lex_doubled(
        &mut self,
        byte: u8,
        kind: TokenKind,
        expected: &'static str,
        start: usize,
    ) -> io::Result<()> {
        self.push_operator(kind, start);
        match self.bump()? {
            Some(next) if next == byte => {}
            next => {
                if let Some(next) = next {
                    self.unbump(next);
                }
                let warning = LexWarning::UndoubledOperator {
                    found: char::from(byte),
                    expected,
                    offset: start,
                };
                tracing::debug!(%warning, "accepting undoubled operator");
                self.lexed.warnings.push(warning);
            }
        }
        Ok(())
    }

    fn flush_tag(&mut self) {
        if self.tag.is_empty() {
            return;
        }
        self.lexed.tokens.push(Token {
            kind: TokenKind::Tag(std::mem::take(&mut self.tag)),
            start: self.tag_start,
        });
    }
}

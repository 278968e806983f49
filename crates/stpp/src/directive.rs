//! Directive keyword recognition.
//!
//! After the engine sees the marker byte it hands the source to [`scan`],
//! which skips optional whitespace, reads a keyword of at most
//! [`MAX_KEYWORD_LEN`] bytes and classifies it. The byte that ends the
//! keyword is pushed back, so nothing beyond the keyword is consumed.

use std::fmt;
use std::io::{self, BufRead};

use crate::source::{ByteSource, is_space};

/// Longest keyword the scanner will capture. Longer runs are cut at this
/// length and classify as [`DirectiveKind::Unknown`].
pub const MAX_KEYWORD_LEN: usize = 16;

/// Classification of a directive keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `if <condition>` opens a conditional group.
    If,
    /// `elif <condition>` adds a conditional clause to the open group.
    Elif,
    /// `else` adds the fallback clause to the open group.
    Else,
    /// `endif` closes the open group.
    Endif,
    /// `define <tag>` adds a tag to the context.
    Define,
    /// `undef <tag>` removes a tag from the context.
    Undef,
    /// Anything else; echoed back as ordinary text.
    Unknown,
}

impl DirectiveKind {
    const KEYWORDS: [Self; 6] = [
        Self::If,
        Self::Elif,
        Self::Else,
        Self::Endif,
        Self::Define,
        Self::Undef,
    ];

    /// The keyword spelling, or `None` for [`DirectiveKind::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stpp::DirectiveKind;
    ///
    /// assert_eq!(DirectiveKind::Elif.keyword(), Some("elif"));
    /// assert_eq!(DirectiveKind::Unknown.keyword(), None);
    /// ```
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::If => Some("if"),
            Self::Elif => Some("elif"),
            Self::Else => Some("else"),
            Self::Endif => Some("endif"),
            Self::Define => Some("define"),
            Self::Undef => Some("undef"),
            Self::Unknown => None,
        }
    }

    /// Classify a captured keyword by exact, case-sensitive comparison.
    ///
    /// # Examples
    ///
    /// ```
    /// use stpp::DirectiveKind;
    ///
    /// assert_eq!(DirectiveKind::classify(b"endif"), DirectiveKind::Endif);
    /// assert_eq!(DirectiveKind::classify(b"ENDIF"), DirectiveKind::Unknown);
    /// ```
    #[must_use]
    pub fn classify(keyword: &[u8]) -> Self {
        Self::KEYWORDS
            .into_iter()
            .find(|kind| kind.keyword().is_some_and(|k| k.as_bytes() == keyword))
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("<unknown>"))
    }
}

/// A directive as read from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Directive {
    pub(crate) kind: DirectiveKind,
    /// Every byte consumed after the marker: leading whitespace and keyword.
    pub(crate) raw: Vec<u8>,
}

/// Read and classify the keyword following a marker.
pub(crate) fn scan<R: BufRead>(source: &mut ByteSource<R>) -> io::Result<Directive> {
    let mut raw = Vec::new();
    let mut keyword_len = 0;
    while let Some(byte) = source.next_byte()? {
        let ends_keyword = byte == b'\n' || (is_space(byte) && keyword_len > 0);
        if ends_keyword || keyword_len == MAX_KEYWORD_LEN {
            source.unget(byte);
            break;
        }
        if !is_space(byte) {
            keyword_len += 1;
        }
        raw.push(byte);
    }
    let keyword = raw.get(raw.len() - keyword_len..).unwrap_or_default();
    let kind = DirectiveKind::classify(keyword);
    Ok(Directive { kind, raw })
}

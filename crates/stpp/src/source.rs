//! Buffered byte source shared by the scanner, the expression lexer, and the
//! engine.
//!
//! The source hands out one byte at a time and supports a single byte of
//! pushback, which is all the lookahead the directive language needs. It also
//! tracks the current line so diagnostics can point at the directive that
//! produced them.

use std::io::{self, BufRead};

/// Whitespace as understood by the directive language.
///
/// Matches the C `isspace` set, which includes the vertical tab that
/// [`u8::is_ascii_whitespace`] leaves out.
pub(crate) const fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

pub(crate) struct ByteSource<R> {
    reader: R,
    pushback: Option<u8>,
    line: usize,
}

impl<R: BufRead> ByteSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            pushback: None,
            line: 1,
        }
    }

    /// One-based line number of the next byte to be read.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.pushback.take() {
            Some(byte) => byte,
            None => {
                let Some(byte) = self.peek_reader()? else {
                    return Ok(None);
                };
                self.reader.consume(1);
                byte
            }
        };
        if byte == b'\n' {
            self.line += 1;
        }
        Ok(Some(byte))
    }

    /// Return `byte` to the front of the stream.
    ///
    /// Only one byte may be pending at a time; the caller must have just read
    /// `byte` via [`next_byte`](Self::next_byte).
    pub(crate) fn unget(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "only one byte of pushback");
        if byte == b'\n' {
            self.line -= 1;
        }
        self.pushback = Some(byte);
    }

    /// Consume the rest of the current line, newline included, and return
    /// the bytes before the newline.
    pub(crate) fn read_line_rest(&mut self) -> io::Result<Vec<u8>> {
        let mut rest = Vec::new();
        while let Some(byte) = self.next_byte()? {
            if byte == b'\n' {
                break;
            }
            rest.push(byte);
        }
        Ok(rest)
    }

    /// Consume the rest of the current line without keeping it.
    pub(crate) fn skip_line(&mut self) -> io::Result<()> {
        while let Some(byte) = self.next_byte()? {
            if byte == b'\n' {
                break;
            }
        }
        Ok(())
    }

    fn peek_reader(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

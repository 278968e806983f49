//! The conditional-inclusion state machine.
//!
//! Each open `if` group is a [`Frame`] on an explicit stack, so nesting depth
//! is bounded by memory rather than by the call stack. A group moves through
//! three states: it awaits its next clause when a clause directive is read,
//! sits in a clause body while text is copied or suppressed, and is closed
//! when its `endif` pops the frame.

use std::io::{self, BufRead, Write};

use crate::copier::StreamCopier;
use crate::diagnostics::{DiagnosticKind, Report};
use crate::directive::{self, DirectiveKind};
use crate::errors::EngineError;
use crate::expr::{Condition, Lexer};
use crate::source::{ByteSource, is_space};
use crate::tags::TagContext;

/// Marker byte that introduces a directive unless configured otherwise.
pub const DEFAULT_MARKER: u8 = b'#';

/// Entry point for running a pass over a stream.
///
/// # Examples
///
/// ```
/// use stpp::{Preprocessor, TagContext};
///
/// let mut tags: TagContext = ["A"].into_iter().collect();
/// let input = "#if A\n#if B\nX\n#endif\nY\n#endif\n";
/// let (output, report) = Preprocessor::new().process_str(input, &mut tags)?;
/// assert_eq!(output, "Y\n");
/// assert!(report.is_clean());
/// # Ok::<(), stpp::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
    marker: u8,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
        }
    }
}

impl Preprocessor {
    /// Create a preprocessor using [`DEFAULT_MARKER`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `marker` to introduce directives.
    #[must_use]
    pub fn with_marker(mut self, marker: u8) -> Self {
        self.marker = marker;
        self
    }

    /// The configured marker byte.
    #[must_use]
    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Run one forward pass from `input` to `output`.
    ///
    /// `tags` is updated in place by `define` and `undef` directives and
    /// keeps those changes after the pass.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingTagName`] when a `define` or `undef`
    /// lacks its tag, and [`EngineError::Io`] when reading or writing fails.
    /// Output written before the error is left in `output`.
    pub fn run<R, W>(
        &self,
        input: R,
        output: W,
        tags: &mut TagContext,
    ) -> Result<Report, EngineError>
    where
        R: BufRead,
        W: Write,
    {
        Engine {
            source: ByteSource::new(input),
            copier: StreamCopier::new(output),
            tags,
            frames: Vec::new(),
            report: Report::default(),
            marker: self.marker,
        }
        .run()
    }

    /// Run a pass over in-memory text and return the output as a string.
    ///
    /// Bytes that are not valid UTF-8 in the output are replaced.
    ///
    /// # Errors
    ///
    /// See [`Preprocessor::run`].
    pub fn process_str(
        &self,
        input: &str,
        tags: &mut TagContext,
    ) -> Result<(String, Report), EngineError> {
        let mut output = Vec::new();
        let report = self.run(input.as_bytes(), &mut output, tags)?;
        Ok((String::from_utf8_lossy(&output).into_owned(), report))
    }
}

/// State of one open conditional group.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// The enclosing context was already suppressed when the group opened.
    outer_ignore: bool,
    /// Some clause of this group has been true.
    matched: bool,
    /// The current clause copies its body.
    active: bool,
    seen_else: bool,
    opened_at: usize,
}

impl Frame {
    fn open(outer_ignore: bool, condition: bool, line: usize) -> Self {
        Self {
            outer_ignore,
            matched: condition,
            active: !outer_ignore && condition,
            seen_else: false,
            opened_at: line,
        }
    }

    fn enter_clause(&mut self, kind: DirectiveKind, condition: bool) {
        self.matched |= condition;
        self.active = !self.outer_ignore && condition;
        if kind == DirectiveKind::Else {
            self.seen_else = true;
        }
    }
}

struct Engine<'t, R, W> {
    source: ByteSource<R>,
    copier: StreamCopier<W>,
    tags: &'t mut TagContext,
    frames: Vec<Frame>,
    report: Report,
    marker: u8,
}

impl<R: BufRead, W: Write> Engine<'_, R, W> {
    fn run(mut self) -> Result<Report, EngineError> {
        tracing::debug!(marker = %char::from(self.marker), tags = self.tags.len(), "starting pass");
        while let Some(byte) = self.source.next_byte()? {
            if byte == self.marker {
                self.directive()?;
            } else {
                let suppressed = self.suppressed();
                self.copier.copy(byte, suppressed)?;
            }
        }
        if let Some(innermost) = self.frames.last() {
            let open = self.frames.len();
            self.report
                .push(innermost.opened_at, DiagnosticKind::Unterminated { open });
        }
        self.copier.flush()?;
        tracing::debug!(
            diagnostics = self.report.diagnostics().len(),
            "finished pass"
        );
        Ok(self.report)
    }

    /// Suppression is inherited, so only the innermost frame matters.
    fn suppressed(&self) -> bool {
        self.frames.last().is_some_and(|frame| !frame.active)
    }

    fn directive(&mut self) -> Result<(), EngineError> {
        let line = self.source.line();
        let directive = directive::scan(&mut self.source)?;
        tracing::trace!(line, kind = %directive.kind, depth = self.frames.len(), "directive");
        match directive.kind {
            DirectiveKind::If => self.open_group(line)?,
            DirectiveKind::Elif | DirectiveKind::Else => {
                self.next_clause(directive.kind, line, &directive.raw)?;
            }
            DirectiveKind::Endif => self.close_group(line, &directive.raw)?,
            DirectiveKind::Define | DirectiveKind::Undef => {
                self.update_tags(directive.kind, line)?;
            }
            DirectiveKind::Unknown => {
                let suppressed = self.suppressed();
                self.copier
                    .echo_directive(self.marker, &directive.raw, suppressed)?;
            }
        }
        Ok(())
    }

    fn open_group(&mut self, line: usize) -> io::Result<()> {
        let outer_ignore = self.suppressed();
        let condition = if outer_ignore {
            self.source.skip_line()?;
            false
        } else {
            self.read_condition(line)?
        };
        self.frames.push(Frame::open(outer_ignore, condition, line));
        tracing::debug!(line, condition, depth = self.frames.len(), "opened group");
        Ok(())
    }

    fn next_clause(&mut self, kind: DirectiveKind, line: usize, raw: &[u8]) -> io::Result<()> {
        let Some(&frame) = self.frames.last() else {
            return self.stray(kind, line, raw);
        };
        if frame.seen_else && !frame.outer_ignore {
            self.report
                .push(line, DiagnosticKind::ClauseAfterElse { directive: kind });
        }
        let condition = if frame.matched || frame.outer_ignore {
            if kind == DirectiveKind::Else {
                self.finish_line(kind, line, frame.outer_ignore)?;
            } else {
                self.source.skip_line()?;
            }
            false
        } else if kind == DirectiveKind::Else {
            self.finish_line(kind, line, false)?;
            true
        } else {
            self.read_condition(line)?
        };
        if let Some(top) = self.frames.last_mut() {
            top.enter_clause(kind, condition);
        }
        tracing::debug!(line, %kind, condition, "entered clause");
        Ok(())
    }

    fn close_group(&mut self, line: usize, raw: &[u8]) -> io::Result<()> {
        let Some(frame) = self.frames.pop() else {
            return self.stray(DirectiveKind::Endif, line, raw);
        };
        self.finish_line(DirectiveKind::Endif, line, frame.outer_ignore)?;
        tracing::debug!(line, opened_at = frame.opened_at, "closed group");
        Ok(())
    }

    /// A clause directive with no open group is passed through as text.
    fn stray(&mut self, kind: DirectiveKind, line: usize, raw: &[u8]) -> io::Result<()> {
        self.report
            .push(line, DiagnosticKind::StrayClause { directive: kind });
        let suppressed = self.suppressed();
        self.copier.echo_directive(self.marker, raw, suppressed)
    }

    /// The tag is read even inside a suppressed clause, so a missing name is
    /// fatal there too.
    fn update_tags(&mut self, kind: DirectiveKind, line: usize) -> Result<(), EngineError> {
        let rest = self.source.read_line_rest()?;
        let mut words = rest
            .split(|byte| is_space(*byte))
            .filter(|word| !word.is_empty());
        let Some(tag) = words.next() else {
            return Err(EngineError::MissingTagName {
                directive: kind,
                line,
            });
        };
        if self.suppressed() {
            return Ok(());
        }
        let extra: Vec<String> = words
            .map(|word| String::from_utf8_lossy(word).into_owned())
            .collect();
        if !extra.is_empty() {
            self.report.push(
                line,
                DiagnosticKind::ExtraText {
                    directive: kind,
                    text: extra.join(" "),
                },
            );
        }
        let changed = if kind == DirectiveKind::Define {
            self.tags.define(tag)
        } else {
            self.tags.undef(tag)
        };
        tracing::debug!(line, %kind, tag = %String::from_utf8_lossy(tag), changed, "updated tags");
        Ok(())
    }

    /// Lex, parse and evaluate the rest of the line. Malformed conditions are
    /// reported and count as false.
    fn read_condition(&mut self, line: usize) -> io::Result<bool> {
        let mut lexed = Lexer::new(&mut self.source).tokenize()?;
        for warning in std::mem::take(&mut lexed.warnings) {
            self.report.push(line, warning);
        }
        match Condition::from_lexed(&lexed) {
            Ok(condition) => {
                let value = condition.evaluate(self.tags);
                tracing::debug!(line, %condition, value, "evaluated condition");
                Ok(value)
            }
            Err(err) => {
                self.report.push(line, err);
                Ok(false)
            }
        }
    }

    /// Drop the rest of a directive line that takes no argument.
    fn finish_line(&mut self, directive: DirectiveKind, line: usize, quiet: bool) -> io::Result<()> {
        let rest = self.source.read_line_rest()?;
        if quiet {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&rest);
        let text = text.trim_matches(|c: char| u8::try_from(c).is_ok_and(is_space));
        if !text.is_empty() {
            self.report.push(
                line,
                DiagnosticKind::ExtraText {
                    directive,
                    text: text.to_owned(),
                },
            );
        }
        Ok(())
    }
}

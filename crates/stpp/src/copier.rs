//! Pass-through path for text outside recognised directives.

use std::io::{self, Write};

/// Copies ordinary bytes and unknown directives to the sink unless the
/// current clause is suppressed.
pub(crate) struct StreamCopier<W> {
    sink: W,
}

impl<W: Write> StreamCopier<W> {
    pub(crate) fn new(sink: W) -> Self {
        Self { sink }
    }

    pub(crate) fn copy(&mut self, byte: u8, suppressed: bool) -> io::Result<()> {
        if suppressed {
            return Ok(());
        }
        self.sink.write_all(&[byte])
    }

    /// Re-emit a directive the engine does not act on: the marker followed by
    /// exactly the bytes the scanner consumed. The rest of the line is still
    /// in the stream and is copied as ordinary text.
    pub(crate) fn echo_directive(
        &mut self,
        marker: u8,
        raw: &[u8],
        suppressed: bool,
    ) -> io::Result<()> {
        if suppressed {
            return Ok(());
        }
        self.sink.write_all(&[marker])?;
        self.sink.write_all(raw)
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

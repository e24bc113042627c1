use std::io::Write;

use crate::Result;
use crate::session::SyncUpdate;
use crate::update_sink::UpdateSink;

/// An `UpdateSink` that writes one JSON object per line.
///
/// Design:
/// - We stream output directly to a `Write` implementation so long
///   simulations never buffer updates in memory.
/// - Each update is flushed immediately so streaming consumers (stdout,
///   pipes, sockets) see output promptly.
///
/// Example output:
/// ```json
/// {"location":{"paragraph_index":0,"word_index":3,"word_text":"sleep."},"scroll_to":0}
/// {"location":{"paragraph_index":0,"word_index":4,"word_text":"Now,"},"scroll_to":null}
/// ```
pub struct JsonLinesSink<W: Write> {
    /// The underlying writer we stream JSON into.
    w: W,

    /// Whether the sink has been closed.
    /// Once closed, no further writes are allowed.
    closed: bool,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(w: W) -> Self {
        Self { w, closed: false }
    }
}

impl<W: Write> UpdateSink for JsonLinesSink<W> {
    fn emit(&mut self, update: &SyncUpdate) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot emit update: sink is already closed",
            ));
        }

        serde_json::to_writer(&mut self.w, update)?;
        self.w.write_all(b"\n")?;
        self.w.flush()?;
        Ok(())
    }

    /// Flush the underlying writer. Idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

//! Display surfaces for received broadcasts.

use std::io::Write;

use chatcast_protocols::ChatView;

/// In-memory message list with a fixed-height viewport.
///
/// Every broadcast is appended as its own line and the viewport jumps to the
/// bottom, so the newest line is always visible.
#[derive(Debug, Clone)]
pub struct MessageLog {
    lines: Vec<String>,
    view_height: usize,
    scroll_offset: usize,
}

impl MessageLog {
    /// Create a log showing `view_height` lines at a time (at least one).
    pub fn new(view_height: usize) -> Self {
        Self {
            lines: Vec::new(),
            view_height: view_height.max(1),
            scroll_offset: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the first visible line.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Lines currently in the viewport.
    pub fn visible(&self) -> &[String] {
        let end = (self.scroll_offset + self.view_height).min(self.lines.len());
        &self.lines[self.scroll_offset..end]
    }

    /// Scroll up by `lines`, stopping at the top.
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.lines.len().saturating_sub(self.view_height);
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(24)
    }
}

impl ChatView for MessageLog {
    fn on_broadcast_received(&mut self, display: &str) {
        self.lines.push(display.to_string());
        self.scroll_to_bottom();
    }
}

/// Writes each broadcast as one line to a terminal or any other writer.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn on_broadcast_received(&mut self, display: &str) {
        // A closed stdout is not worth tearing the client down for.
        let _ = writeln!(self.out, "{}", display).and_then(|_| self.out.flush());
    }
}

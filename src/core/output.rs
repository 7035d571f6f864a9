//! The console log: the text area every command and error writes into.

use bevy::prelude::*;

/// Line height used before a layout has been computed.
const DEFAULT_LINE_HEIGHT: f32 = 24.0 * 1.2;

/// Scrollback text shown above the input row.
///
/// Renderers read [`ConsoleLog::lines`]; the scroll controller and the
/// terminal backend watch [`ConsoleLog::appended`] to notice growth.
#[derive(Resource, Debug, Clone)]
pub struct ConsoleLog {
    lines: Vec<String>,
    appended: u64,
    line_height: f32,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            appended: 0,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl ConsoleLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line, keeping existing content. Empty lines are ignored.
    pub fn append_line(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.lines.push(text);
        self.appended += 1;
    }

    /// Remove all content, collapsing the log to zero height.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Height the log wants to render at, in the same units as the layout.
    pub fn preferred_content_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// Set the height of one rendered line.
    pub fn set_line_height(&mut self, line_height: f32) {
        self.line_height = line_height.max(0.0);
    }

    /// Height of one rendered line.
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// The current lines, oldest first.
    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The whole log joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Total number of lines ever appended. Never decreases, not even on clear.
    #[inline]
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Lines appended since `seen` (a previous value of [`Self::appended`])
    /// that are still present.
    pub fn lines_since(&self, seen: u64) -> &[String] {
        let fresh = self.appended.saturating_sub(seen) as usize;
        let start = self.lines.len().saturating_sub(fresh);
        &self.lines[start..]
    }

    /// Number of lines currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the log is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

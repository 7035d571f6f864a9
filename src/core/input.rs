//! The input line: edit buffer, caret, command history and tab completion.
//!
//! Dispatching a submitted line needs the whole `World` (callbacks get
//! `&mut World`), so [`ConsoleInput::submit`] only records and hands back the
//! raw line; execution happens in the plugin's exclusive system.

use std::time::Duration;

use bevy::prelude::*;

use super::{AcceleratingRepeater, ConsoleLog, ConsoleRegistry, KeyState, is_single_token};

/// Marker prepended to echoed operator input so it stands apart from output.
pub const PROMPT_MARKER: &str = "\\";

/// Every line submitted this session, oldest first, plus a recall cursor.
///
/// The cursor ranges over `0..=len`; `len` means "a fresh empty line".
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<String>,
    position: usize,
}

impl HistoryLog {
    /// Append a submitted line and reset the cursor past the end.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
        self.position = self.entries.len();
    }

    /// Step the cursor back. Returns the recalled line, or `None` when
    /// already at the oldest entry.
    pub fn step_back(&mut self) -> Option<&str> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(&self.entries[self.position])
    }

    /// Step the cursor forward. Returns the recalled line (empty once the
    /// cursor reaches the fresh line), or `None` when already there.
    pub fn step_forward(&mut self) -> Option<&str> {
        if self.position >= self.entries.len() {
            return None;
        }
        self.position += 1;
        Some(self.entries.get(self.position).map_or("", String::as_str))
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// All entries, oldest first.
    #[inline]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been submitted yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State of the console's input row.
///
/// The caret is a character index into the line. While a recall key is held
/// the caret is pinned: [`ConsoleInput::sync_caret`] ignores whatever the
/// text widget reports, so the widget can be forced back to [`ConsoleInput::caret`].
#[derive(Resource, Debug, Clone, Default)]
pub struct ConsoleInput {
    line: String,
    caret: usize,
    history: HistoryLog,
    previous: AcceleratingRepeater,
    next: AcceleratingRepeater,
    recall_held: bool,
}

impl ConsoleInput {
    /// Create an empty input row with the given repeat delays.
    pub fn new(initial_delay: Duration, subsequent_delay: Duration) -> Self {
        Self {
            previous: AcceleratingRepeater::new(initial_delay, subsequent_delay),
            next: AcceleratingRepeater::new(initial_delay, subsequent_delay),
            ..default()
        }
    }

    /// The current line.
    #[inline]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Mutable access for text widgets that edit the buffer in place.
    #[inline]
    pub fn line_mut(&mut self) -> &mut String {
        &mut self.line
    }

    /// Replace the line and move the caret to its end.
    pub fn set_line(&mut self, text: impl Into<String>) {
        self.line = text.into();
        self.caret = self.line.chars().count();
    }

    /// Insert text at the caret.
    pub fn insert_str(&mut self, text: &str) {
        let at = self.byte_index(self.caret);
        self.line.insert_str(at, text);
        self.caret += text.chars().count();
    }

    /// Delete the character before the caret.
    pub fn backspace(&mut self) {
        if self.caret == 0 {
            return;
        }
        let at = self.byte_index(self.caret - 1);
        self.line.remove(at);
        self.caret -= 1;
    }

    /// The caret position, in characters.
    #[inline]
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Report where the text widget's caret is. Ignored while a recall key is
    /// held, so recall can pin the caret.
    pub fn sync_caret(&mut self, caret: usize) {
        if !self.recall_held {
            self.caret = caret.min(self.line.chars().count());
        }
    }

    /// Whether a recall key was held during the last update.
    #[inline]
    pub fn recall_held(&self) -> bool {
        self.recall_held
    }

    /// Submitted lines so far.
    #[inline]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Change the recall repeat delays.
    pub fn set_repeat_delays(&mut self, initial_delay: Duration, subsequent_delay: Duration) {
        self.previous.set_delays(initial_delay, subsequent_delay);
        self.next.set_delays(initial_delay, subsequent_delay);
    }

    /// Take the current line for execution.
    ///
    /// Any non-empty line is appended verbatim to history, spaces included. The
    /// buffer is cleared and the raw line returned.
    pub fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.line);
        self.caret = 0;
        self.record(&line);
        line
    }

    /// Append a line submitted from elsewhere to history. Only the empty line
    /// is skipped.
    pub fn record(&mut self, line: &str) {
        if !line.is_empty() {
            self.history.push(line);
        }
    }

    /// Print every command and variable starting with the current token.
    ///
    /// Only runs when the line is exactly one token with no surrounding
    /// spaces. The line itself is left untouched. Returns whether anything
    /// was printed.
    pub fn complete(&self, registry: &ConsoleRegistry, log: &mut ConsoleLog) -> bool {
        if !is_single_token(&self.line) {
            return false;
        }
        let prefix = self.line.as_str();

        log.append_line(format!("{PROMPT_MARKER}{prefix}"));
        for cmd in registry.commands_with_prefix(prefix) {
            log.append_line(cmd.name());
        }
        for cvar in registry.variables_with_prefix(prefix) {
            log.append_line(format!("    {} = \"{}\"", cvar.name(), cvar.get()));
        }
        true
    }

    /// Recall the previous history entry into the line.
    pub fn recall_previous(&mut self) {
        if let Some(line) = self.history.step_back().map(str::to_owned) {
            self.set_line(line);
        }
    }

    /// Recall the next history entry, or an empty line past the newest.
    pub fn recall_next(&mut self) {
        if let Some(line) = self.history.step_forward().map(str::to_owned) {
            self.set_line(line);
        }
    }

    /// Drive history recall for one tick.
    ///
    /// Each direction has its own repeater. Holding both keys cancels both and
    /// nothing fires until one is released and pressed again.
    pub fn update_recall(&mut self, previous: KeyState, next: KeyState, delta: Duration) {
        let both = previous.pressed && next.pressed;

        if self.previous.update(previous, both, delta) {
            self.recall_previous();
        }
        if self.next.update(next, both, delta) {
            self.recall_next();
        }
        self.recall_held = previous.pressed || next.pressed;
    }

    /// Stop any recall in flight, e.g. when the input row is disabled.
    pub fn cancel_recall(&mut self) {
        self.previous.cancel();
        self.next.cancel();
        self.recall_held = false;
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.line
            .char_indices()
            .nth(chars)
            .map_or(self.line.len(), |(i, _)| i)
    }
}

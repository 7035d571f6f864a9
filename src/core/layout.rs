//! Panel geometry derived from the screen size and console settings.

use bevy::prelude::*;

use super::ConsoleLog;

/// Height of the border drawn above the input row.
pub const BORDER_TOP: f32 = 2.0;
/// Height of the border drawn below the input row.
pub const BORDER_BOTTOM: f32 = 2.0;
/// Line height as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.2;

/// Geometry the scroll controller needs for one update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub content_height: f32,
    pub viewport_height: f32,
    pub sensitivity: f32,
}

/// Derived panel geometry. Recomputed whenever the screen or config changes.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ConsoleLayout {
    /// Height of the window the panel lives in.
    pub screen_height: f32,
    /// Full panel height.
    pub panel_height: f32,
    /// Height of the single-line input row.
    pub input_row_height: f32,
    /// Input row plus both borders: what mini mode shows.
    pub input_block_height: f32,
    /// Height of one log line.
    pub line_size: f32,
    /// Whole log lines that fit above the input block.
    pub lines_visible: u32,
    /// Height of the log viewport.
    pub viewport_height: f32,
    /// Scroll distance of one page step, in content units.
    pub sensitivity: f32,
}

impl ConsoleLayout {
    /// Derive geometry for a screen of `screen_height`.
    ///
    /// `size_percent` is the share of the screen the panel covers; the line
    /// size comes from what `log` has rendered so far, or the input row when
    /// the log is empty.
    pub fn compute(screen_height: f32, size_percent: u32, font_size: f32, log: &ConsoleLog) -> Self {
        let screen_height = screen_height.max(0.0);
        let panel_height = screen_height * size_percent as f32 / 100.0;
        let input_row_height = font_size * LINE_SPACING;
        let input_block_height = (BORDER_BOTTOM + input_row_height + BORDER_TOP).min(panel_height);

        let line_size = if log.is_empty() {
            input_row_height
        } else {
            log.preferred_content_height() / log.len() as f32
        };

        // The scroll indicator takes one line above the borders.
        let text_area = panel_height - input_row_height - BORDER_TOP - input_row_height - BORDER_BOTTOM;
        let lines_visible = if line_size > 0.0 && text_area > 0.0 {
            (text_area / line_size).floor() as u32
        } else {
            0
        };

        Self {
            screen_height,
            panel_height,
            input_row_height,
            input_block_height,
            line_size,
            lines_visible,
            viewport_height: lines_visible as f32 * line_size,
            sensitivity: line_size,
        }
    }

    /// Scroll geometry for a log of `content_height`.
    pub fn scroll_metrics(&self, content_height: f32) -> ScrollMetrics {
        ScrollMetrics {
            content_height,
            viewport_height: self.viewport_height,
            sensitivity: self.sensitivity,
        }
    }
}

impl Default for ConsoleLayout {
    fn default() -> Self {
        Self::compute(720.0, 50, 24.0, &ConsoleLog::default())
    }
}

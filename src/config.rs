//! Console configuration.

use std::time::Duration;

use bevy::prelude::*;

/// Key bindings, panel geometry and timing for the console.
///
/// Changing this resource at runtime re-derives the layout on the next update.
#[derive(Resource, Reflect, Debug, Clone, PartialEq)]
#[reflect(Resource)]
pub struct ConsoleConfig {
    /// Opens and closes the console.
    pub toggle_key: KeyCode,
    /// Held together with the toggle key to open only the input row.
    pub mini_modifiers: Vec<KeyCode>,
    /// Submit the input line.
    pub submit_keys: Vec<KeyCode>,
    /// List completions for the input line.
    pub complete_key: KeyCode,
    pub history_previous_key: KeyCode,
    pub history_next_key: KeyCode,
    pub scroll_up_key: KeyCode,
    pub scroll_down_key: KeyCode,
    pub jump_to_bottom_key: KeyCode,
    /// Panel height as a percentage of the screen, 10 to 100.
    pub size_percent: u32,
    /// Font size, 8 to 64.
    pub font_size: f32,
    /// Seconds for a full open or close, 0 to 1.
    pub opening_time: f32,
    /// Panel opacity, 0 to 1.
    pub transparency: f32,
    /// Jump to the bottom whenever a line is added, even when scrolled up.
    pub scroll_down_on_adding: bool,
    /// Seconds a recall or page key is held before it starts repeating.
    pub repeat_initial_delay: f32,
    /// Seconds between repeats after that.
    pub repeat_subsequent_delay: f32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            toggle_key: KeyCode::Backquote,
            mini_modifiers: vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
            submit_keys: vec![KeyCode::Enter, KeyCode::NumpadEnter],
            complete_key: KeyCode::Tab,
            history_previous_key: KeyCode::ArrowUp,
            history_next_key: KeyCode::ArrowDown,
            scroll_up_key: KeyCode::PageUp,
            scroll_down_key: KeyCode::PageDown,
            jump_to_bottom_key: KeyCode::F3,
            size_percent: 50,
            font_size: 24.0,
            opening_time: 0.1,
            transparency: 1.0,
            scroll_down_on_adding: true,
            repeat_initial_delay: 0.5,
            repeat_subsequent_delay: 0.05,
        }
    }
}

impl ConsoleConfig {
    /// Panel size, clamped to its valid range.
    pub fn size_percent(&self) -> u32 {
        self.size_percent.clamp(10, 100)
    }

    /// Font size, clamped to its valid range.
    pub fn font_size(&self) -> f32 {
        self.font_size.clamp(8.0, 64.0)
    }

    /// Opening time, clamped to its valid range.
    pub fn opening_time(&self) -> f32 {
        self.opening_time.clamp(0.0, 1.0)
    }

    /// Transparency, clamped to its valid range.
    pub fn transparency(&self) -> f32 {
        self.transparency.clamp(0.0, 1.0)
    }

    /// The initial and subsequent repeat delays.
    pub fn repeat_delays(&self) -> (Duration, Duration) {
        (
            Duration::from_secs_f32(self.repeat_initial_delay.max(0.0)),
            Duration::from_secs_f32(self.repeat_subsequent_delay.max(0.0)),
        )
    }

    /// Whether any mini-mode modifier is held.
    pub fn mini_modifier_held(&self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.any_pressed(self.mini_modifiers.iter().copied())
    }

    /// Whether any submit key went down this tick.
    pub fn submit_pressed(&self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.any_just_pressed(self.submit_keys.iter().copied())
    }
}

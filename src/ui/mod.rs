//! The module that draws the console with egui.
//!
//! All behavior lives in the core resources; this pass only positions the
//! panel from [`ConsoleVisibility`], scrolls the log from
//! [`ScrollController`] and binds the input row to [`ConsoleInput`].

use bevy::prelude::*;
use bevy_egui::*;

use crate::config::ConsoleConfig;
use crate::core::{
    ConsoleInput, ConsoleLayout, ConsoleLog, ConsoleVisibility, PROMPT_MARKER, ScrollController,
};

/// Shown above the input row while the log is scrolled up.
pub const SCROLL_INDICATOR: &str = "v   v   v";

/// Colors used to draw the console.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ConsoleTheme {
    pub background: Color,
    pub border: Color,
    pub text: Color,
    /// Color of echoed input lines.
    pub prompt: Color,
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self {
            background: Color::srgba(0.05, 0.05, 0.08, 0.9),
            border: Color::srgb(0.35, 0.35, 0.4),
            text: Color::srgb(0.85, 0.85, 0.85),
            prompt: Color::srgb(0.55, 0.8, 1.0),
        }
    }
}

impl ConsoleTheme {
    /// Color for one log line.
    pub fn line_color(&self, line: &str) -> Color {
        if line.starts_with(PROMPT_MARKER) {
            self.prompt
        } else {
            self.text
        }
    }
}

/// Convert a Bevy color to egui, scaling its alpha by `transparency`.
pub fn to_color32(color: Color, transparency: f32) -> egui::Color32 {
    let c = color.to_srgba();
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        byte(c.red),
        byte(c.green),
        byte(c.blue),
        byte(c.alpha * transparency),
    )
}

pub(crate) fn render_console(
    mut contexts: EguiContexts,
    config: Res<ConsoleConfig>,
    theme: Res<ConsoleTheme>,
    log: Res<ConsoleLog>,
    scroll: Res<ScrollController>,
    mut layout: ResMut<ConsoleLayout>,
    mut visibility: ResMut<ConsoleVisibility>,
    mut input: ResMut<ConsoleInput>,
) -> Result<(), BevyError> {
    let ctx = contexts.ctx_mut()?;
    let screen = ctx.screen_rect();

    // Picked up by the layout pass on the next update.
    if screen.height() != layout.screen_height {
        layout.screen_height = screen.height();
    }

    let alpha = config.transparency();
    let font = egui::FontId::monospace(config.font_size());
    let top = -visibility.offset();
    let panel = egui::Rect::from_min_size(
        egui::pos2(0.0, top),
        egui::vec2(screen.width(), layout.panel_height),
    );

    egui::Area::new(egui::Id::new("bevy_dev_console"))
        .fixed_pos(panel.min)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(panel, 0.0, to_color32(theme.background, alpha));
            ui.set_width(panel.width());
            ui.set_height(panel.height());

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                let id = egui::Id::new("bevy_dev_console_input");
                let mut output = egui::TextEdit::singleline(input.line_mut())
                    .id(id)
                    .font(font.clone())
                    .text_color(to_color32(theme.text, 1.0))
                    .frame(false)
                    .desired_width(f32::INFINITY)
                    .interactive(visibility.input_enabled())
                    .lock_focus(true)
                    .show(ui);

                if input.recall_held() {
                    // Recall owns the caret while its keys are held.
                    let caret = egui::text::CCursor::new(input.caret());
                    output
                        .state
                        .cursor
                        .set_char_range(Some(egui::text::CCursorRange::one(caret)));
                    output.state.store(ui.ctx(), id);
                } else if let Some(range) = output.state.cursor.char_range() {
                    input.sync_caret(range.primary.index);
                }

                let refocus = visibility.input_enabled() && output.response.lost_focus();
                if visibility.take_focus_request() || refocus {
                    output.response.request_focus();
                }

                let border = to_color32(theme.border, alpha);
                let rule = ui.available_rect_before_wrap();
                ui.painter().hline(
                    rule.x_range(),
                    rule.bottom(),
                    egui::Stroke::new(crate::core::BORDER_TOP, border),
                );

                if !visibility.shows_log() {
                    return;
                }

                let indicator = if scroll.shows_indicator() { SCROLL_INDICATOR } else { "" };
                ui.label(egui::RichText::new(indicator).font(font.clone()).color(border));

                let overflow = (log.preferred_content_height() - layout.viewport_height).max(0.0);
                egui::ScrollArea::vertical()
                    .max_height(layout.viewport_height)
                    .auto_shrink([false, true])
                    .enable_scrolling(false)
                    .vertical_scroll_offset((1.0 - scroll.offset()) * overflow)
                    .show(ui, |ui| {
                        ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                            ui.spacing_mut().item_spacing.y = 0.0;
                            for line in log.lines() {
                                let color = to_color32(theme.line_color(line), 1.0);
                                ui.label(egui::RichText::new(line).font(font.clone()).color(color));
                            }
                        });
                    });
            });
        });

    Ok(())
}

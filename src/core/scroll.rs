//! Page-wise scrolling of the console log.

use std::time::Duration;

use bevy::prelude::*;

use super::{AcceleratingRepeater, KeyState, ScrollMetrics};

/// Offsets below this count as "at the bottom".
const BOTTOM_EPSILON: f32 = 1e-6;

/// Normalized scroll position over the log: `0.0` is the bottom, `1.0` the top.
#[derive(Resource, Debug, Clone, Default)]
pub struct ScrollController {
    offset: f32,
    up: AcceleratingRepeater,
    down: AcceleratingRepeater,
    seen: u64,
}

impl ScrollController {
    pub fn new(initial_delay: Duration, subsequent_delay: Duration) -> Self {
        Self {
            offset: 0.0,
            up: AcceleratingRepeater::new(initial_delay, subsequent_delay),
            down: AcceleratingRepeater::new(initial_delay, subsequent_delay),
            seen: 0,
        }
    }

    pub fn set_repeat_delays(&mut self, initial_delay: Duration, subsequent_delay: Duration) {
        self.up.set_delays(initial_delay, subsequent_delay);
        self.down.set_delays(initial_delay, subsequent_delay);
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, 1.0);
    }

    /// The log's appended counter as of the last [`Self::follow`].
    #[inline]
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn jump_to_bottom(&mut self) {
        self.offset = 0.0;
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset < BOTTOM_EPSILON
    }

    /// Whether the "more below" indicator should be shown.
    pub fn shows_indicator(&self) -> bool {
        !self.is_at_bottom()
    }

    /// Normalized distance of one page step. Zero when everything fits.
    pub fn step(metrics: ScrollMetrics) -> f32 {
        let overflow = metrics.content_height - metrics.viewport_height;
        if overflow <= 0.0 {
            0.0
        } else {
            metrics.sensitivity / overflow
        }
    }

    /// Drive both page keys for one tick. Returns `true` if the offset moved.
    ///
    /// A page key only starts repeating while the opposite key is up.
    pub fn update(
        &mut self,
        up: KeyState,
        down: KeyState,
        metrics: ScrollMetrics,
        delta: Duration,
    ) -> bool {
        let step = Self::step(metrics);
        let before = self.offset;

        let up_blocked = up.just_pressed && down.pressed;
        if self.up.update(up, up_blocked, delta) {
            self.set_offset(self.offset + step);
        }
        let down_blocked = down.just_pressed && up.pressed;
        if self.down.update(down, down_blocked, delta) {
            self.set_offset(self.offset - step);
        }

        self.offset != before
    }

    /// Stop both repeaters.
    pub fn cancel(&mut self) {
        self.up.cancel();
        self.down.cancel();
    }

    /// React to log growth, given the log's current
    /// [`appended`](super::ConsoleLog::appended) counter.
    ///
    /// When new lines arrived and either `stick` is set or the view was already
    /// at the bottom, the view is pinned back to the bottom.
    pub fn follow(&mut self, appended: u64, stick: bool) -> bool {
        if appended == self.seen {
            return false;
        }
        self.seen = appended;
        if stick || self.is_at_bottom() {
            self.jump_to_bottom();
            true
        } else {
            false
        }
    }
}

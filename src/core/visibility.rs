//! Open/close state machine for the console panel.
//!
//! The panel slides down from above the screen. Its position is an offset
//! measured upward from fully open: `0.0` shows the whole panel,
//! `panel_height` hides it, and `panel_height - input_height` leaves only the
//! input row visible (mini mode). Transient states interpolate that offset
//! over elapsed time and then settle into their stable target.

use bevy::prelude::*;

/// Which visibility state the console is in. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsoleState {
    /// Off-screen, input disabled.
    #[default]
    Closed,
    /// Sliding up towards `Closed`.
    Closing,
    /// Sliding down towards `Open`.
    Opening,
    /// Fully on-screen, input focused.
    Open,
    /// Only the input row on-screen, input focused.
    Mini,
    /// Sliding down towards `Mini`.
    MiniOpening,
}

impl ConsoleState {
    /// Whether this state is driven by a transition timer.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ConsoleState::Closing | ConsoleState::Opening | ConsoleState::MiniOpening
        )
    }

    /// The stable state a transient state settles into; stable states map to themselves.
    pub fn settled(self) -> Self {
        match self {
            ConsoleState::Closing => ConsoleState::Closed,
            ConsoleState::Opening => ConsoleState::Open,
            ConsoleState::MiniOpening => ConsoleState::Mini,
            stable => stable,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    start: f32,
    end: f32,
    elapsed: f32,
    duration: f32,
}

impl Transition {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    fn position(&self) -> f32 {
        self.start + (self.end - self.start) * self.progress()
    }
}

/// The panel visibility state machine.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{ConsoleState, ConsoleVisibility};
///
/// let mut panel = ConsoleVisibility::new(400.0, 40.0, 0.1);
/// panel.toggle(false);
/// assert_eq!(panel.state(), ConsoleState::Opening);
///
/// panel.tick(0.1);
/// assert_eq!(panel.state(), ConsoleState::Open);
/// assert_eq!(panel.offset(), 0.0);
/// ```
#[derive(Resource, Debug, Clone)]
pub struct ConsoleVisibility {
    state: ConsoleState,
    offset: f32,
    panel_height: f32,
    input_height: f32,
    opening_time: f32,
    transition: Option<Transition>,
    input_enabled: bool,
    focus_requested: bool,
    changes: Vec<(ConsoleState, ConsoleState)>,
}

impl ConsoleVisibility {
    /// Create a closed panel.
    ///
    /// `input_height` is the height of the strip shown in mini mode;
    /// `opening_time` is the time in seconds for a full open or close.
    pub fn new(panel_height: f32, input_height: f32, opening_time: f32) -> Self {
        let panel_height = panel_height.max(0.0);
        Self {
            state: ConsoleState::Closed,
            offset: panel_height,
            panel_height,
            input_height: input_height.clamp(0.0, panel_height),
            opening_time: opening_time.max(0.0),
            transition: None,
            input_enabled: false,
            focus_requested: false,
            changes: Vec::new(),
        }
    }

    /// The active state.
    #[inline]
    pub fn state(&self) -> ConsoleState {
        self.state
    }

    /// The panel offset from fully open, as last rendered.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Full panel height.
    #[inline]
    pub fn panel_height(&self) -> f32 {
        self.panel_height
    }

    /// Whether any part of the panel is on-screen.
    pub fn is_visible(&self) -> bool {
        self.offset < self.panel_height
    }

    /// Whether the input row accepts keys.
    #[inline]
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Whether the log area is meant to be shown (not in mini mode).
    pub fn shows_log(&self) -> bool {
        !matches!(self.state, ConsoleState::Mini | ConsoleState::MiniOpening)
    }

    /// Consume a pending request to focus the input row.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Drain the state changes since the last call, oldest first.
    pub fn drain_changes(&mut self) -> Vec<(ConsoleState, ConsoleState)> {
        std::mem::take(&mut self.changes)
    }

    /// Where the panel rests in a given state.
    pub fn target_offset(&self, state: ConsoleState) -> f32 {
        match state {
            ConsoleState::Closed | ConsoleState::Closing => self.panel_height,
            ConsoleState::Open | ConsoleState::Opening => 0.0,
            ConsoleState::Mini | ConsoleState::MiniOpening => {
                self.panel_height - self.input_height
            }
        }
    }

    /// React to the toggle key. `modifier` selects mini mode when closed.
    ///
    /// Returns the state entered.
    pub fn toggle(&mut self, modifier: bool) -> ConsoleState {
        let next = match self.state {
            ConsoleState::Closed if modifier => ConsoleState::MiniOpening,
            ConsoleState::Closed | ConsoleState::Closing => ConsoleState::Opening,
            ConsoleState::Open
            | ConsoleState::Opening
            | ConsoleState::Mini
            | ConsoleState::MiniOpening => ConsoleState::Closing,
        };
        self.set_state(next);
        next
    }

    /// Enter a state, cancelling any transition in flight.
    ///
    /// Transient states start interpolating from the current offset, so a
    /// reversal mid-slide is smooth. The duration is proportional to the
    /// distance left, which makes a mini reveal quicker than a full open by the
    /// ratio of input height to panel height.
    pub fn set_state(&mut self, state: ConsoleState) {
        self.transition = None;
        let previous = std::mem::replace(&mut self.state, state);
        let target = self.target_offset(state);

        match state {
            ConsoleState::Closed => {
                self.offset = target;
                self.input_enabled = false;
            }
            ConsoleState::Open | ConsoleState::Mini => {
                self.offset = target;
                self.input_enabled = true;
                self.focus_requested = true;
            }
            ConsoleState::Closing | ConsoleState::Opening | ConsoleState::MiniOpening => {
                self.input_enabled = false;
                let distance = (target - self.offset).abs();
                let duration = if self.panel_height > 0.0 {
                    self.opening_time * distance / self.panel_height
                } else {
                    0.0
                };
                self.transition = Some(Transition {
                    start: self.offset,
                    end: target,
                    elapsed: 0.0,
                    duration,
                });
            }
        }

        if previous != state {
            debug!("Console: {:?} -> {:?}", previous, state);
            self.changes.push((previous, state));
        }
    }

    /// Advance the transition in flight by `delta` seconds.
    ///
    /// Returns the settled state if the transition finished this tick.
    pub fn tick(&mut self, delta: f32) -> Option<ConsoleState> {
        let transition = self.transition.as_mut()?;
        transition.elapsed += delta.max(0.0);
        self.offset = transition.position();

        if transition.progress() >= 1.0 {
            let settled = self.state.settled();
            self.set_state(settled);
            Some(settled)
        } else {
            None
        }
    }

    /// Change the opening time used by later transitions.
    pub fn set_opening_time(&mut self, opening_time: f32) {
        self.opening_time = opening_time.max(0.0);
    }

    /// Apply new panel geometry.
    ///
    /// A transition in flight settles immediately; a stable state is re-entered
    /// so the panel snaps to its new resting position.
    pub fn set_layout(&mut self, panel_height: f32, input_height: f32) {
        self.panel_height = panel_height.max(0.0);
        self.input_height = input_height.clamp(0.0, self.panel_height);
        self.set_state(self.state.settled());
    }
}

impl Default for ConsoleVisibility {
    fn default() -> Self {
        Self::new(360.0, 40.0, 0.1)
    }
}

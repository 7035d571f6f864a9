//! Hold-to-repeat timing shared by history recall and page scrolling.
//!
//! A repeater fires once when its key goes down, waits an initial delay, then
//! fires again at a shorter fixed interval for as long as the key stays held.
//! It is advanced once per tick; releasing the key simply stops re-arming it.

use std::time::Duration;

use bevy::prelude::*;

/// Delay between the first and second fire.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
/// Delay between every later fire.
pub const DEFAULT_SUBSEQUENT_DELAY: Duration = Duration::from_millis(50);

/// Key state sampled once at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub just_pressed: bool,
    pub pressed: bool,
    pub just_released: bool,
}

impl KeyState {
    /// Sample a key from Bevy's keyboard input.
    pub fn read(input: &ButtonInput<KeyCode>, key: KeyCode) -> Self {
        Self {
            just_pressed: input.just_pressed(key),
            pressed: input.pressed(key),
            just_released: input.just_released(key),
        }
    }

    /// The key went down this tick.
    pub const fn down() -> Self {
        Self { just_pressed: true, pressed: true, just_released: false }
    }

    /// The key has been down since an earlier tick.
    pub const fn held() -> Self {
        Self { just_pressed: false, pressed: true, just_released: false }
    }

    /// The key came up this tick.
    pub const fn up() -> Self {
        Self { just_pressed: false, pressed: false, just_released: true }
    }
}

/// An accelerating hold-to-repeat timer.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bevy_dev_console::core::{AcceleratingRepeater, KeyState};
///
/// let mut repeat = AcceleratingRepeater::default();
/// let tick = Duration::from_millis(100);
///
/// assert!(repeat.update(KeyState::down(), false, tick)); // immediate fire
/// for _ in 0..4 {
///     assert!(!repeat.update(KeyState::held(), false, tick));
/// }
/// assert!(repeat.update(KeyState::held(), false, tick)); // 500ms elapsed
/// assert!(repeat.update(KeyState::held(), false, tick)); // then every tick
/// ```
#[derive(Debug, Clone)]
pub struct AcceleratingRepeater {
    initial_delay: Duration,
    subsequent_delay: Duration,
    timer: Option<Timer>,
}

impl Default for AcceleratingRepeater {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_DELAY, DEFAULT_SUBSEQUENT_DELAY)
    }
}

impl AcceleratingRepeater {
    /// Create an idle repeater with the given delays.
    pub fn new(initial_delay: Duration, subsequent_delay: Duration) -> Self {
        Self {
            initial_delay,
            subsequent_delay,
            timer: None,
        }
    }

    /// Change the delays. Takes effect from the next wait.
    pub fn set_delays(&mut self, initial_delay: Duration, subsequent_delay: Duration) {
        self.initial_delay = initial_delay;
        self.subsequent_delay = subsequent_delay;
    }

    /// Whether a repeat is in flight.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Start a new repeat, replacing any in flight. Always fires immediately.
    pub fn start(&mut self) -> bool {
        self.timer = Some(Timer::new(self.initial_delay, TimerMode::Once));
        true
    }

    /// Stop the repeat in flight, if any.
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    /// Advance the pending wait. `held` is the trigger predicate for this tick;
    /// when it is false the repeat stops without firing.
    ///
    /// Fires at most once per tick.
    pub fn tick(&mut self, held: bool, delta: Duration) -> bool {
        if !held {
            self.cancel();
            return false;
        }
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };

        timer.tick(delta);
        if timer.just_finished() {
            *timer = Timer::new(self.subsequent_delay, TimerMode::Once);
            true
        } else {
            false
        }
    }

    /// Drive the repeater from one key for one tick.
    ///
    /// `blocked` is set while a conflicting key is held; it cancels the repeat
    /// and prevents a new one from starting. A key pressed and released within
    /// the same tick never fires.
    pub fn update(&mut self, key: KeyState, blocked: bool, delta: Duration) -> bool {
        if blocked {
            self.cancel();
            return false;
        }
        if key.just_pressed && key.pressed {
            return self.start();
        }
        self.tick(key.pressed, delta)
    }
}

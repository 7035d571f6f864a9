//! Console messages for communication with the rest of the app.
//!
//! - App -> Console: lines to submit
//! - Console -> App: variable changes and visibility changes

use bevy::prelude::*;

use super::{ConsoleState, VarValue};

/// Submit a line to the console as if it had been typed and entered.
///
/// The line is echoed and added to history like operator input.
///
/// # Examples
///
/// ```
/// use bevy::prelude::*;
/// use bevy_dev_console::core::ConsoleInputEvent;
///
/// fn submit_command(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("Number 789"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to submit.
    pub line: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

/// Sent after a variable was assigned from the input line.
///
/// # Examples
///
/// ```
/// use bevy::prelude::*;
/// use bevy_dev_console::core::ConVarChangedEvent;
///
/// fn on_number_change(mut events: MessageReader<ConVarChangedEvent>) {
///     for event in events.read() {
///         if event.name.eq_ignore_ascii_case("Number") {
///             info!("Number changed to {}", event.new_value);
///         }
///     }
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConVarChangedEvent {
    /// The name of the variable, as registered.
    pub name: Box<str>,
    pub old_value: VarValue,
    pub new_value: VarValue,
}

impl ConVarChangedEvent {
    /// Create a new change event.
    pub fn new(name: impl Into<Box<str>>, old_value: VarValue, new_value: VarValue) -> Self {
        Self {
            name: name.into(),
            old_value,
            new_value,
        }
    }
}

/// Sent whenever the panel enters a new visibility state.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleStateChanged {
    pub from: ConsoleState,
    pub to: ConsoleState,
}

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConVarChangedEvent>()
            .add_message::<ConsoleStateChanged>();
    }
}

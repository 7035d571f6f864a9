//! Core console types, independent of any rendering backend.
//!
//! This module provides the fundamental building blocks:
//! - [`ConsoleRegistry`] - Commands and typed variables, looked up case-insensitively
//! - [`ConsoleInput`] - The input line, history recall and tab completion
//! - [`ConsoleVisibility`] - The open/close/mini state machine
//! - [`AcceleratingRepeater`] - Hold-to-repeat timing
//! - [`ScrollController`] - Page-wise log scrolling
//! - [`ConsoleLog`] - The text the console displays
//! - [`Console`] - Unified system parameter for convenient access
//! - Messages for communication with the rest of the app

mod concommand;
mod console;
mod convar;
mod error;
mod events;
mod input;
mod layout;
mod output;
mod registry;
mod repeater;
mod scroll;
mod tokenizer;
mod visibility;

pub use concommand::{CommandArgs, CommandHandler, ConCommand, handler};
pub use console::{Console, ConsoleRef};
pub use convar::{ConVar, ConVarValue, VarType, VarValue};
pub use error::ConsoleError;
pub use events::{ConVarChangedEvent, ConsoleEventsPlugin, ConsoleInputEvent, ConsoleStateChanged};
pub use input::{ConsoleInput, HistoryLog, PROMPT_MARKER};
pub use layout::{BORDER_BOTTOM, BORDER_TOP, ConsoleLayout, LINE_SPACING, ScrollMetrics};
pub use output::ConsoleLog;
pub use registry::ConsoleRegistry;
pub use repeater::{
    AcceleratingRepeater, DEFAULT_INITIAL_DELAY, DEFAULT_SUBSEQUENT_DELAY, KeyState,
};
pub use scroll::ScrollController;
pub use tokenizer::{TokenizedCommand, is_single_token, tokenize, tokenize_string};
pub use visibility::{ConsoleState, ConsoleVisibility};

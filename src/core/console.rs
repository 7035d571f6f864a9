//! Unified console API for convenient access from ordinary systems.
//!
//! The [`Console`] system parameter bundles the [`ConsoleRegistry`] and the
//! [`ConsoleLog`] behind a single ergonomic API.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    CommandArgs, ConVar, ConVarValue, ConsoleError, ConsoleLog, ConsoleRegistry, handler,
};

/// Unified console system parameter.
///
/// # Examples
///
/// ```
/// use bevy::prelude::*;
/// use bevy_dev_console::core::Console;
///
/// fn setup_console(mut console: Console) {
///     console.add_variable("gravity", 800, 800);
///     console.add_command("noclip", |_, _| info!("Noclip toggled!"));
///
///     let _ = console.set("gravity", 1000);
///     console.print("Console ready");
/// }
/// ```
#[derive(SystemParam)]
pub struct Console<'w> {
    registry: ResMut<'w, ConsoleRegistry>,
    log: ResMut<'w, ConsoleLog>,
}

impl Console<'_> {
    /// Register a command callback, composing with any already registered
    /// under the same name.
    pub fn add_command<F>(&mut self, name: &str, f: F) -> bool
    where
        F: Fn(&CommandArgs, &mut World) + Send + Sync + 'static,
    {
        self.registry.add_command(name, handler(f))
    }

    pub fn remove_command(&mut self, name: &str) -> bool {
        self.registry.remove_command(name)
    }

    /// Register a variable. The first registration of a name wins.
    pub fn add_variable<T: ConVarValue>(&mut self, name: &str, value: T, default: T) -> bool {
        self.registry.add_variable(name, value, default)
    }

    pub fn add_convar(&mut self, cvar: ConVar) -> bool {
        self.registry.add_convar(cvar)
    }

    pub fn remove_variable(&mut self, name: &str) -> bool {
        self.registry.remove_variable(name)
    }

    pub fn get<T: ConVarValue>(&self, name: &str) -> Result<T, ConsoleError> {
        self.registry.get(name)
    }

    pub fn set<T: ConVarValue>(&mut self, name: &str, value: T) -> Result<(), ConsoleError> {
        self.registry.set(name, value)
    }

    /// Append a line to the console log.
    pub fn print(&mut self, line: impl Into<String>) {
        self.log.append_line(line);
    }

    /// Empty the console log.
    pub fn clear(&mut self) {
        self.log.clear();
    }

    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConsoleRegistry {
        &mut self.registry
    }

    pub fn log(&self) -> &ConsoleLog {
        &self.log
    }
}

/// Read-only console system parameter.
///
/// Use this when you only need to read console values, not modify them.
/// This allows for better parallelism in Bevy's scheduler.
#[derive(SystemParam)]
pub struct ConsoleRef<'w> {
    registry: Res<'w, ConsoleRegistry>,
    log: Res<'w, ConsoleLog>,
}

impl ConsoleRef<'_> {
    pub fn get<T: ConVarValue>(&self, name: &str) -> Result<T, ConsoleError> {
        self.registry.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_command(name) || self.registry.contains_variable(name)
    }

    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }

    pub fn log(&self) -> &ConsoleLog {
        &self.log
    }
}

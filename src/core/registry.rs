//! Console registry for commands and variables.
//!
//! Two tables keyed by lowercased name, so lookups are case-insensitive and
//! listings come out in ascending case-insensitive order. A name lives in at
//! most one of the two tables.

use std::collections::BTreeMap;
use std::ops::Bound;

use bevy::prelude::*;

use super::{CommandHandler, ConCommand, ConVar, ConVarValue, ConsoleError, VarValue};

fn key(name: &str) -> Box<str> {
    name.to_lowercase().into_boxed_str()
}

/// Central registry for console commands and variables.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{handler, ConsoleRegistry};
///
/// let mut registry = ConsoleRegistry::new();
/// registry.add_command("Clear", handler(|_, _| {}));
/// registry.add_variable("Number", 123i32, 456);
///
/// assert!(registry.contains_command("clear"));
/// assert_eq!(registry.get::<i32>("NUMBER").unwrap(), 123);
/// ```
#[derive(Resource, Default)]
pub struct ConsoleRegistry {
    commands: BTreeMap<Box<str>, ConCommand>,
    variables: BTreeMap<Box<str>, ConVar>,
}

impl ConsoleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command callback.
    ///
    /// If the command already exists the callback is composed after the
    /// existing ones. Returns `false` only when `name` is already taken by a
    /// variable, in which case nothing is registered.
    pub fn add_command(&mut self, name: &str, handler: CommandHandler) -> bool {
        let key = key(name);
        if self.variables.contains_key(&key) {
            warn!("Console: '{}' is already a variable, command not registered", name);
            return false;
        }

        match self.commands.get_mut(&key) {
            Some(cmd) => {
                debug!("Console: composing another callback onto '{}'", name);
                cmd.compose(handler);
            }
            None => {
                self.commands.insert(key, ConCommand::new(name, handler));
            }
        }
        true
    }

    /// Remove a command and all of its callbacks. Returns whether it existed.
    pub fn remove_command(&mut self, name: &str) -> bool {
        self.commands.remove(&*key(name)).is_some()
    }

    /// Register a typed variable.
    ///
    /// The first registration wins: returns `false` and leaves the registry
    /// untouched if `name` is already a variable or a command.
    pub fn add_variable<T: ConVarValue>(&mut self, name: &str, value: T, default: T) -> bool {
        self.add_convar(ConVar::new(name, value, default))
    }

    /// Register a prebuilt variable. Same rules as [`Self::add_variable`].
    pub fn add_convar(&mut self, cvar: ConVar) -> bool {
        let key = key(cvar.name());
        if self.commands.contains_key(&key) {
            warn!("Console: '{}' is already a command, variable not registered", cvar.name());
            return false;
        }
        if self.variables.contains_key(&key) {
            debug!("Console: variable '{}' already registered, keeping the first", cvar.name());
            return false;
        }

        self.variables.insert(key, cvar);
        true
    }

    /// Remove a variable. Returns whether it existed.
    pub fn remove_variable(&mut self, name: &str) -> bool {
        self.variables.remove(&*key(name)).is_some()
    }

    /// Look up a command.
    pub fn command(&self, name: &str) -> Option<&ConCommand> {
        self.commands.get(&*key(name))
    }

    /// Look up a variable.
    pub fn variable(&self, name: &str) -> Result<&ConVar, ConsoleError> {
        self.variables
            .get(&*key(name))
            .ok_or_else(|| ConsoleError::UnknownVariable(name.to_string()))
    }

    /// Look up a variable mutably.
    pub fn variable_mut(&mut self, name: &str) -> Result<&mut ConVar, ConsoleError> {
        self.variables
            .get_mut(&*key(name))
            .ok_or_else(|| ConsoleError::UnknownVariable(name.to_string()))
    }

    /// Get a variable's current value as a Rust type.
    ///
    /// Fails with `TypeMismatch` if `T` is not the declared type.
    pub fn get<T: ConVarValue>(&self, name: &str) -> Result<T, ConsoleError> {
        Self::typed(self.variable(name)?, ConVar::get)
    }

    /// Get a variable's default value as a Rust type.
    pub fn get_default<T: ConVarValue>(&self, name: &str) -> Result<T, ConsoleError> {
        Self::typed(self.variable(name)?, ConVar::default_value)
    }

    /// Get a variable's current tagged value.
    pub fn get_value(&self, name: &str) -> Result<&VarValue, ConsoleError> {
        Ok(self.variable(name)?.get())
    }

    /// Set a variable's current value.
    pub fn set<T: ConVarValue>(&mut self, name: &str, value: T) -> Result<(), ConsoleError> {
        self.set_value(name, value.into_value())
    }

    /// Set a variable's current value from a tagged value.
    pub fn set_value(&mut self, name: &str, value: VarValue) -> Result<(), ConsoleError> {
        self.variable_mut(name)?.set(value)
    }

    /// Set a variable's default value.
    pub fn set_default<T: ConVarValue>(&mut self, name: &str, value: T) -> Result<(), ConsoleError> {
        self.variable_mut(name)?.set_default(value.into_value())
    }

    /// Parse raw text into the variable's declared type and assign it.
    pub fn set_from_str(&mut self, name: &str, text: &str) -> Result<(), ConsoleError> {
        self.variable_mut(name)?.set_from_str(text)
    }

    /// Check if a command exists.
    pub fn contains_command(&self, name: &str) -> bool {
        self.commands.contains_key(&*key(name))
    }

    /// Check if a variable exists.
    pub fn contains_variable(&self, name: &str) -> bool {
        self.variables.contains_key(&*key(name))
    }

    /// Number of registered commands.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Number of registered variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Command names in ascending case-insensitive order.
    pub fn list_commands(&self) -> impl Iterator<Item = &str> {
        self.commands.values().map(ConCommand::name)
    }

    /// Variable names in ascending case-insensitive order.
    pub fn list_variables(&self) -> impl Iterator<Item = &str> {
        self.variables.values().map(ConVar::name)
    }

    /// Iterate over all variables in name order.
    pub fn variables(&self) -> impl Iterator<Item = &ConVar> {
        self.variables.values()
    }

    /// Commands whose name starts with `prefix`, ignoring case.
    pub fn commands_with_prefix(&self, prefix: &str) -> impl Iterator<Item = &ConCommand> {
        prefix_range(&self.commands, prefix)
    }

    /// Variables whose name starts with `prefix`, ignoring case.
    pub fn variables_with_prefix(&self, prefix: &str) -> impl Iterator<Item = &ConVar> {
        prefix_range(&self.variables, prefix)
    }

    fn typed<T: ConVarValue>(
        cvar: &ConVar,
        pick: fn(&ConVar) -> &VarValue,
    ) -> Result<T, ConsoleError> {
        T::from_value(pick(cvar)).ok_or_else(|| ConsoleError::TypeMismatch {
            name: cvar.name().to_string(),
            expected: cvar.var_type(),
            found: T::TYPE,
        })
    }
}

/// Entries of a lowercase-keyed map whose key starts with `prefix`.
///
/// Keys sharing a prefix are contiguous in the map, so this is a range scan.
fn prefix_range<'a, V>(
    map: &'a BTreeMap<Box<str>, V>,
    prefix: &str,
) -> impl Iterator<Item = &'a V> + 'a {
    let prefix = prefix.to_lowercase();
    map.range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
        .take_while(move |(name, _)| name.starts_with(prefix.as_str()))
        .map(|(_, value)| value)
}

//! Console command callbacks and their arguments.

use std::sync::Arc;

use bevy::prelude::*;

/// Arguments passed to a command callback.
///
/// The console only splits the line on spaces; validating arity and content
/// is up to the callback.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    /// The raw submitted line.
    raw: &'a str,
    /// Tokens after the command name.
    args: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    /// Create new command args from a raw line and its trailing tokens.
    pub fn new(raw: &'a str, args: Vec<&'a str>) -> Self {
        Self { raw, args }
    }

    /// Get the raw submitted line.
    #[inline]
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).copied()
    }

    /// Try to parse an argument as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|s| s.parse().ok())
    }

    /// Get all arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[&str] {
        &self.args
    }

    /// Iterate over arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().copied()
    }

    /// Join all arguments with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.args.join(separator)
    }
}

impl std::ops::Index<usize> for CommandArgs<'_> {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.args[index]
    }
}

/// A command callback.
///
/// Callbacks receive the parsed arguments and mutable access to the Bevy world,
/// so they can call back into the registry or the console log. They are
/// reference counted so the executor can clone the list out of the registry
/// before running it.
pub type CommandHandler = Arc<dyn Fn(&CommandArgs, &mut World) + Send + Sync>;

/// Box a closure into a [`CommandHandler`].
pub fn handler<F>(f: F) -> CommandHandler
where
    F: Fn(&CommandArgs, &mut World) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A registered command: its display name and every callback composed onto it,
/// in registration order.
pub struct ConCommand {
    name: Box<str>,
    handlers: Vec<CommandHandler>,
}

impl ConCommand {
    /// Create a command with a single callback.
    pub fn new(name: impl Into<Box<str>>, handler: CommandHandler) -> Self {
        Self {
            name: name.into(),
            handlers: vec![handler],
        }
    }

    /// Get the name as first registered.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append another callback. Both run on invocation, oldest first.
    pub fn compose(&mut self, handler: CommandHandler) {
        self.handlers.push(handler);
    }

    /// Number of composed callbacks.
    #[inline]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Clone the callback list for execution.
    pub fn handlers(&self) -> Vec<CommandHandler> {
        self.handlers.clone()
    }
}

impl std::fmt::Debug for ConCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCommand")
            .field("name", &self.name)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_from_echo_line() {
        let raw = "Echo  two words\tthree ";
        let tokens = crate::core::tokenize(raw).expect("line has tokens");
        let args = CommandArgs::new(raw, tokens.args);
        assert_eq!(args.len(), 2);
        assert_eq!(&args[0], "two");
        assert_eq!(&args[1], "words\tthree");
        assert_eq!(args.get(2), None);
        assert_eq!(args.join("|"), "two|words\tthree");
        assert_eq!(args.raw(), raw);
    }

    #[test]
    fn test_args_typed_access() {
        let args = CommandArgs::new("Number 789 x", vec!["789", "x"]);
        assert_eq!(args.parse::<i32>(0), Some(789));
        assert_eq!(args.parse::<i32>(1), None);
        assert!(CommandArgs::new("Help", Vec::new()).is_empty());
    }

    #[test]
    fn test_compose_keeps_order() {
        let mut cmd = ConCommand::new("Foo", handler(|_, _| {}));
        cmd.compose(handler(|_, _| {}));
        assert_eq!(cmd.name(), "Foo");
        assert_eq!(cmd.handler_count(), 2);
        assert_eq!(cmd.handlers().len(), 2);
    }
}

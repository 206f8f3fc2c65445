//! Composite commands that run a fixed sequence of sub-commands.

use std::fmt;

use crate::controller::{Command, CommandFactory, command_factory};
use crate::error::Result;
use crate::notification::Notification;
use crate::notifier::{Notifier, NotifierBase};

/// A command that executes an ordered list of sub-commands.
///
/// Each sub-command is built fresh from its factory, bound to the same core as
/// the macro command and executed with the same notification. Sub-commands
/// run first-in first-out; the first error stops the sequence.
///
/// ```
/// use lattice_mvc_core::{Command, CoreRegistry, MacroCommand, Notification, Notifier, NotifierBase, Result};
///
/// #[derive(Default)]
/// struct PrepModel {
///     notifier: NotifierBase,
/// }
///
/// impl Notifier for PrepModel {
///     fn notifier(&self) -> &NotifierBase {
///         &self.notifier
///     }
/// }
///
/// impl Command for PrepModel {
///     fn execute(&self, _note: &Notification) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let registry = CoreRegistry::new();
/// let facade = registry.facade("app").unwrap();
/// facade.register_command("startup", || {
///     MacroCommand::new().with_sub_command(PrepModel::default)
/// });
/// facade.send_notification("startup", None, None).unwrap();
/// ```
#[derive(Default)]
pub struct MacroCommand {
    notifier: NotifierBase,
    sub_commands: Vec<CommandFactory>,
}

impl MacroCommand {
    /// Create a macro command with no sub-commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-command factory.
    pub fn with_sub_command<C, F>(mut self, factory: F) -> Self
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.add_sub_command(factory);
        self
    }

    /// Append a sub-command factory.
    pub fn add_sub_command<C, F>(&mut self, factory: F)
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.sub_commands.push(command_factory(factory));
    }

    /// Number of sub-commands.
    pub fn len(&self) -> usize {
        self.sub_commands.len()
    }

    /// Whether there are no sub-commands.
    pub fn is_empty(&self) -> bool {
        self.sub_commands.is_empty()
    }
}

impl Notifier for MacroCommand {
    fn notifier(&self) -> &NotifierBase {
        &self.notifier
    }
}

impl Command for MacroCommand {
    fn execute(&self, notification: &Notification) -> Result<()> {
        for factory in &self.sub_commands {
            let command = factory();
            command.notifier().bind_like(&self.notifier);
            command.execute(notification)?;
        }
        Ok(())
    }
}

impl fmt::Debug for MacroCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroCommand")
            .field("sub_commands", &self.sub_commands.len())
            .finish()
    }
}

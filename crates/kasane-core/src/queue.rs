//! The ordered batch of commands waiting to be executed.

use crate::command::ComposedCommand;
use crate::error::Result;

/// Commands in execution order.
///
/// Only [`append`](Self::append), [`remove_at`](Self::remove_at) and
/// [`clear`](Self::clear) mutate the queue. Executing a batch does not
/// empty it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    commands: Vec<ComposedCommand>,
}

impl CommandQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command at the end.
    pub fn append(&mut self, command: ComposedCommand) {
        self.commands.push(command);
    }

    /// Removes the command at `index`, keeping the order of the rest.
    ///
    /// Returns `None` and leaves the queue untouched when `index` is out of
    /// range.
    pub fn remove_at(&mut self, index: usize) -> Option<ComposedCommand> {
        if index < self.commands.len() {
            Some(self.commands.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Read-only view in execution order.
    pub fn snapshot(&self) -> &[ComposedCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pretty JSON of every entry, for the queue listing.
    pub fn render(&self) -> Result<Vec<String>> {
        self.commands
            .iter()
            .map(ComposedCommand::to_pretty_json)
            .collect()
    }
}

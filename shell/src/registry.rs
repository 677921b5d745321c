use crate::command::Command;
use crate::error::ShellError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Name-indexed set of the commands a shell can run.
///
/// Every operation takes the same lock, so commands can be registered or removed
/// from another thread while the shell loop is running.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Mutex<HashMap<String, Arc<dyn Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoned locks are recovered; every update is a single map call.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn Command>>> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a command.
    ///
    /// Fails with [`ShellError::DuplicateName`] when a command with the same name
    /// is already registered; the existing command is kept.
    pub fn register(&self, command: Arc<dyn Command>) -> Result<(), ShellError> {
        let name = command.name().to_string();
        let mut commands = self.lock();
        if commands.contains_key(&name) {
            return Err(ShellError::DuplicateName(name));
        }
        debug!(command = %name, "registered command");
        commands.insert(name, command);
        Ok(())
    }

    /// Remove the command registered under `name`, returning it if there was one.
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Command>> {
        let removed = self.lock().remove(name);
        if removed.is_some() {
            debug!(command = %name, "unregistered command");
        }
        removed
    }

    pub fn find_by_name(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// All registered commands, in no particular order.
    pub fn list(&self) -> Vec<Arc<dyn Command>> {
        self.lock().values().cloned().collect()
    }

    /// Sorted names of all registered commands.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

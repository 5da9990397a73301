//! Registry that turns module declarations into a command tree.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::module::{noop_handler, CommandModule, Handler, ModuleDef};
use super::tree::{Command, CommandId, CommandTree};
use crate::error::{Result, RouterError};

/// Collects modules during startup; [`build`](Self::build) freezes the result.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    tree: CommandTree,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module instance.
    pub fn register<M: CommandModule>(&mut self, module: M) -> Result<&mut Self> {
        self.register_shared(Arc::new(module))
    }

    /// Registers a module instance that the caller keeps a handle to.
    pub fn register_shared<M: CommandModule>(&mut self, module: Arc<M>) -> Result<&mut Self> {
        self.register_def(module.define())
    }

    /// Registers a declarative module table.
    ///
    /// The whole declaration is checked before anything is inserted, so a
    /// rejected module leaves the registry untouched.
    pub fn register_def(&mut self, def: ModuleDef) -> Result<&mut Self> {
        self.check_names(&def)?;

        let ModuleDef {
            name: module,
            group,
            default_handler,
            commands,
        } = def;

        match group {
            Some(label) => {
                let handler = default_handler.unwrap_or_else(noop_handler);
                let group_id = self.push(label.clone(), module, handler, None);
                let children: Vec<CommandId> = commands
                    .into_iter()
                    .map(|(name, handler)| self.push(name, module, handler, Some(group_id)))
                    .collect();
                debug!(
                    module,
                    group = %label,
                    subcommands = children.len(),
                    "Registered command group"
                );
                self.tree.commands[group_id.0].children = children;
                self.tree.index.insert(label, group_id);
            }
            None => {
                if default_handler.is_some() {
                    debug!(module, "Ignoring default handler of ungrouped module");
                }
                for (name, handler) in commands {
                    let id = self.push(name.clone(), module, handler, None);
                    debug!(module, command = %name, "Registered command");
                    self.tree.index.insert(name, id);
                }
            }
        }

        Ok(self)
    }

    /// Freezes the registry into an immutable tree.
    pub fn build(self) -> CommandTree {
        self.tree
    }

    /// Number of top-level commands registered so far.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    fn push(
        &mut self,
        name: String,
        module: &'static str,
        handler: Handler,
        parent: Option<CommandId>,
    ) -> CommandId {
        let id = CommandId(self.tree.commands.len());
        self.tree.commands.push(Command {
            id,
            name,
            module,
            handler,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Rejects names that collide with the index or within the module.
    fn check_names(&self, def: &ModuleDef) -> Result<()> {
        let mut seen = HashSet::new();
        match &def.group {
            Some(label) => {
                if self.tree.index.contains_key(label) {
                    return Err(RouterError::duplicate(label.as_str()));
                }
                // Subcommands share a namespace only with their siblings.
                for name in def.command_names() {
                    if !seen.insert(name) {
                        return Err(RouterError::duplicate(format!("{label} {name}")));
                    }
                }
            }
            None => {
                for name in def.command_names() {
                    if self.tree.index.contains_key(name) || !seen.insert(name) {
                        return Err(RouterError::duplicate(name));
                    }
                }
            }
        }
        Ok(())
    }
}

//! The immutable command tree produced by the registry.

use std::collections::HashMap;
use std::fmt;

use super::module::Handler;

/// Index of a descriptor inside its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) usize);

/// A routing descriptor: one name bound to one handler.
///
/// A descriptor is a group (non-empty `children`), a subcommand (`parent`
/// set), or a plain top-level command. Never both a group and a subcommand.
pub struct Command {
    pub(crate) id: CommandId,
    pub(crate) name: String,
    pub(crate) module: &'static str,
    pub(crate) handler: Handler,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
}

impl Command {
    /// This descriptor's id.
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the module that declared this command.
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// The handler bound to this command.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Parent group, for subcommands.
    pub fn parent_id(&self) -> Option<CommandId> {
        self.parent
    }

    /// Subcommand ids, in declaration order.
    pub fn child_ids(&self) -> &[CommandId] {
        &self.children
    }

    /// Whether this descriptor has subcommands.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this descriptor belongs to a group.
    pub fn is_subcommand(&self) -> bool {
        self.parent.is_some()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("module", &self.module)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Read-only set of descriptors with a top-level name index.
///
/// Built once by [`CommandRegistry::build`](super::CommandRegistry::build).
#[derive(Debug, Default)]
pub struct CommandTree {
    pub(crate) commands: Vec<Command>,
    pub(crate) index: HashMap<String, CommandId>,
}

impl CommandTree {
    /// Looks up a top-level command by exact name.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|id| self.command(*id))
    }

    /// Returns the descriptor for `id`.
    ///
    /// Ids are only handed out by the tree itself, so they are always valid.
    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Returns the group a subcommand belongs to.
    pub fn parent(&self, command: &Command) -> Option<&Command> {
        command.parent.map(|id| self.command(id))
    }

    /// Iterates over a group's subcommands in declaration order.
    pub fn children<'a>(&'a self, command: &'a Command) -> impl Iterator<Item = &'a Command> + 'a {
        command.children.iter().map(move |id| self.command(*id))
    }

    /// Finds the subcommand called `name` within `group`.
    pub fn child<'a>(&'a self, group: &'a Command, name: &str) -> Option<&'a Command> {
        self.children(group).find(|c| c.name == name)
    }

    /// Top-level commands sorted by name.
    pub fn top_level(&self) -> Vec<&Command> {
        let mut commands: Vec<_> = self.index.values().map(|id| self.command(*id)).collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        commands
    }

    /// Number of top-level commands.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no command has been registered.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Renders one line per top-level command, groups followed by their
    /// subcommands, e.g. `feed [top|status]`.
    pub fn summary(&self, prefix: &str) -> String {
        self.top_level()
            .into_iter()
            .map(|cmd| {
                if cmd.is_group() {
                    let subs: Vec<_> = self.children(cmd).map(Command::name).collect();
                    format!("{}{} [{}]", prefix, cmd.name, subs.join("|"))
                } else {
                    format!("{}{}", prefix, cmd.name)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

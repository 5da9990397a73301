//! Runtime dispatch: command name plus context to one handler call.
//!
//! Resolution is kept separate from invocation so routing decisions can be
//! tested without running handlers.

use std::sync::Arc;

use super::context::CommandContext;
use super::tree::{Command, CommandId, CommandTree};
use crate::error::{Result, RouterError};

/// Outcome of resolving a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The descriptor whose handler will run.
    pub command: CommandId,
    /// Leading argument tokens consumed by subcommand selection (0 or 1).
    pub consumed: usize,
}

/// Routes command names to handlers over a shared, immutable tree.
///
/// Cloning is cheap; every clone routes against the same tree.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tree: Arc<CommandTree>,
}

impl Dispatcher {
    /// Creates a dispatcher owning `tree`.
    pub fn new(tree: CommandTree) -> Self {
        Self::from_shared(Arc::new(tree))
    }

    /// Creates a dispatcher over an already shared tree.
    pub fn from_shared(tree: Arc<CommandTree>) -> Self {
        Self { tree }
    }

    /// The tree this dispatcher routes against.
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Resolves `name` and its arguments to a descriptor without invoking it.
    pub fn resolve<S: AsRef<str>>(&self, name: &str, arguments: &[S]) -> Result<Resolution> {
        let command = self
            .tree
            .get(name)
            .ok_or_else(|| RouterError::not_found(name))?;

        if !command.is_group() {
            if command.is_subcommand() {
                return Err(RouterError::ambiguous(name));
            }
            return Ok(Resolution {
                command: command.id(),
                consumed: 0,
            });
        }

        let subcommand = arguments
            .first()
            .and_then(|token| self.tree.child(command, token.as_ref()));

        Ok(match subcommand {
            Some(child) => Resolution {
                command: child.id(),
                consumed: 1,
            },
            // No token, or an unknown one: the group answers with the
            // arguments untouched.
            None => Resolution {
                command: command.id(),
                consumed: 0,
            },
        })
    }

    /// Resolves and runs the handler for `name`.
    ///
    /// Handler errors come back as [`RouterError::Handler`] unchanged.
    pub async fn execute(&self, name: &str, context: CommandContext) -> Result<()> {
        let resolution = self.resolve(name, context.arguments())?;
        let command = self.tree.command(resolution.command);
        self.trace(command, &resolution);

        let handler = Arc::clone(command.handler());
        handler(context.shifted(resolution.consumed))
            .await
            .map_err(RouterError::Handler)
    }

    fn trace(&self, command: &Command, resolution: &Resolution) {
        match self.tree.parent(command) {
            Some(group) => tracing::debug!(
                group = group.name(),
                subcommand = command.name(),
                module = command.module(),
                "Dispatching subcommand"
            ),
            None => tracing::debug!(
                command = command.name(),
                module = command.module(),
                consumed = resolution.consumed,
                "Dispatching command"
            ),
        }
    }
}

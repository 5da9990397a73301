//! Module capability: how a command-bearing unit declares its handlers.
//!
//! A module declares an optional default handler, any number of named
//! handlers and at most one group label. With a group label the default
//! handler answers for the group and the named handlers become its
//! subcommands; without one every named handler is a top-level command.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::context::CommandContext;
use crate::error::HandlerError;

/// Future returned by a handler invocation.
pub type HandlerFuture = BoxFuture<'static, Result<(), HandlerError>>;

/// A command handler stored directly in its descriptor.
pub type Handler = Arc<dyn Fn(CommandContext) -> HandlerFuture + Send + Sync>;

/// Boxes an async closure into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}

/// Handler that completes immediately. Used when a module has no default.
pub fn noop_handler() -> Handler {
    handler(|_| async { Ok(()) })
}

/// Binds a module method to a shared module instance.
///
/// ```ignore
/// .command("status", bind(&self, Self::status))
/// ```
pub fn bind<M, F, Fut>(module: &Arc<M>, f: F) -> Handler
where
    M: Send + Sync + 'static,
    F: Fn(Arc<M>, CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    let module = Arc::clone(module);
    handler(move |ctx| f(Arc::clone(&module), ctx))
}

/// Declarative table of one module's handlers.
pub struct ModuleDef {
    pub(crate) name: &'static str,
    pub(crate) group: Option<String>,
    pub(crate) default_handler: Option<Handler>,
    pub(crate) commands: Vec<(String, Handler)>,
}

impl ModuleDef {
    /// Starts an empty declaration for the module called `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            group: None,
            default_handler: None,
            commands: Vec::new(),
        }
    }

    /// Places every named handler of this module under `label`.
    pub fn group(mut self, label: impl Into<String>) -> Self {
        self.group = Some(label.into());
        self
    }

    /// Sets the handler answering for the group itself.
    pub fn default_handler(mut self, handler: Handler) -> Self {
        self.default_handler = Some(handler);
        self
    }

    /// Adds a named handler.
    pub fn command(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.commands.push((name.into(), handler));
        self
    }

    /// Module name, used for logging and as the descriptors' owner.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Group label, if any.
    pub fn group_label(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Declared command names, in declaration order.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for ModuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDef")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("has_default_handler", &self.default_handler.is_some())
            .field("commands", &self.command_names().collect::<Vec<_>>())
            .finish()
    }
}

/// A stateful unit whose handlers share the module instance.
///
/// Implementors describe themselves once at registration time.
pub trait CommandModule: Send + Sync + 'static {
    /// Declares this module's group label and handlers.
    fn define(self: Arc<Self>) -> ModuleDef;
}

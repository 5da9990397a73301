//! Command registration and dispatch for chatcmd.
//!
//! Modules declare their handlers once at startup; the registry links them
//! into an immutable tree, and the dispatcher routes each incoming command
//! name plus argument tokens to exactly one handler.

pub mod context;
pub mod dispatcher;
pub mod module;
pub mod registry;
pub mod tree;

pub use context::{CommandContext, Description};
pub use dispatcher::{Dispatcher, Resolution};
pub use module::{bind, handler, noop_handler, CommandModule, Handler, HandlerFuture, ModuleDef};
pub use registry::CommandRegistry;
pub use tree::{Command, CommandId, CommandTree};

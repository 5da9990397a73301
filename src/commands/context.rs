//! Per-call execution context handed to command handlers.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque description of the calling surface (channel, user, reply sink).
///
/// The router never looks inside; handlers recover the concrete type with
/// [`CommandContext::description_as`].
#[derive(Clone)]
pub struct Description(Arc<dyn Any + Send + Sync>);

impl Description {
    /// Wraps a caller-defined description value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// A description carrying nothing, for callers without a surface.
    pub fn none() -> Self {
        Self(Arc::new(()))
    }

    /// Returns the wrapped value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Description(..)")
    }
}

/// Context provided to command handlers.
///
/// Created once per incoming command and moved into the selected handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    description: Description,
    arguments: Vec<String>,
}

impl CommandContext {
    /// Creates a context from a description and the tokens after the verb.
    pub fn new<I, S>(description: Description, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description,
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a context with an empty description.
    pub fn detached<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Description::none(), arguments)
    }

    /// The opaque caller description.
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Returns the caller description as a `T`, if that is what it holds.
    pub fn description_as<T: Any>(&self) -> Option<&T> {
        self.description.downcast_ref::<T>()
    }

    /// Remaining argument tokens, in order.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// First remaining argument, if any.
    pub fn first_argument(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Drops `count` leading argument tokens, keeping the description.
    pub(crate) fn shifted(mut self, count: usize) -> Self {
        let count = count.min(self.arguments.len());
        self.arguments.drain(..count);
        self
    }
}

//! Console front end: turns chat lines into dispatcher calls.
//!
//! Splitting a line into verb and arguments happens here, on the caller side
//! of the router.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::chat::{ChatDescription, ReplySink};
use crate::commands::{CommandContext, Description, Dispatcher};
use crate::error::{HandlerError, RouterError};

/// Splits a chat line into command name and argument tokens.
///
/// Returns `None` for lines without the prefix or with nothing after it.
pub fn split_command(prefix: char, line: &str) -> Option<(&str, Vec<&str>)> {
    let rest = line.trim().strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}

/// Reads chat lines and dispatches the commands among them.
pub struct Console {
    dispatcher: Dispatcher,
    prefix: char,
    channel: String,
    user: String,
    sink: Arc<dyn ReplySink>,
}

impl Console {
    pub fn new(
        dispatcher: Dispatcher,
        prefix: char,
        channel: impl Into<String>,
        user: impl Into<String>,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            dispatcher,
            prefix,
            channel: channel.into(),
            user: user.into(),
            sink,
        }
    }

    /// Dispatches one line.
    ///
    /// Returns `Ok(false)` when the line is not a command. Dispatch errors
    /// are returned as-is for the caller to report.
    pub async fn dispatch_line(&self, line: &str) -> Result<bool, RouterError> {
        let Some((name, arguments)) = split_command(self.prefix, line) else {
            return Ok(false);
        };

        let chat = ChatDescription::new(&self.channel, &self.user, Arc::clone(&self.sink));
        let context = CommandContext::new(Description::new(chat), arguments);
        self.dispatcher.execute(name, context).await?;
        Ok(true)
    }

    /// Dispatches one line and reports failures to the channel.
    ///
    /// Unknown commands are ignored, like any chat bot does for verbs it
    /// does not know. Only a failing reply sink is returned as an error.
    pub async fn handle_line(&self, line: &str) -> Result<(), HandlerError> {
        match self.dispatch_line(line).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_user_facing() => {
                debug!("{}", e);
                Ok(())
            }
            Err(e) => {
                warn!("{}: {}", e.category(), e);
                self.sink
                    .send(&self.channel, &format!("error: {}", e))
                    .await
            }
        }
    }

    /// Handles every line from `reader` in order until EOF.
    pub async fn run<R>(&self, reader: R) -> Result<(), HandlerError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            self.handle_line(&line).await?;
        }
        Ok(())
    }
}

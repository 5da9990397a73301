//! Chat surface types handed to handlers through the command description.
//!
//! The router treats these as opaque; bundled modules downcast to
//! [`ChatDescription`] to learn who spoke where, and reply through its sink.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::commands::CommandContext;
use crate::error::HandlerError;

/// Destination for bot replies.
///
/// Implementations must be thread-safe (Send + Sync) since handlers run on
/// any runtime worker.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Sends `text` to `channel`.
    async fn send(&self, channel: &str, text: &str) -> Result<(), HandlerError>;
}

/// Who issued a command, where, and how to answer.
#[derive(Clone)]
pub struct ChatDescription {
    /// Channel the command was issued in.
    pub channel: String,
    /// Login name of the invoking user.
    pub user: String,
    /// Where replies go.
    pub sink: Arc<dyn ReplySink>,
}

impl ChatDescription {
    /// Creates a description for `user` speaking in `channel`.
    pub fn new(
        channel: impl Into<String>,
        user: impl Into<String>,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            channel: channel.into(),
            user: user.into(),
            sink,
        }
    }

    /// Recovers the chat description from a handler context.
    pub fn from_context(ctx: &CommandContext) -> Result<&Self, HandlerError> {
        ctx.description_as::<Self>()
            .ok_or_else(|| anyhow::anyhow!("command was not issued from a chat surface"))
    }

    /// Replies to the channel, addressing the invoking user.
    pub async fn mention(&self, text: impl AsRef<str>) -> Result<(), HandlerError> {
        let message = format!("@{}, {}", self.user, text.as_ref());
        self.sink.send(&self.channel, &message).await
    }
}

impl std::fmt::Debug for ChatDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatDescription")
            .field("channel", &self.channel)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Prints replies to stdout as `[channel] text`.
#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait]
impl ReplySink for StdoutSink {
    async fn send(&self, channel: &str, text: &str) -> Result<(), HandlerError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("[{channel}] {text}\n").as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Collects replies in memory.
///
/// Used for tests and for headless runs that inspect output afterwards.
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(channel, text)` pairs sent so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.lock().clone()
    }

    /// Text of the most recent reply.
    pub fn last(&self) -> Option<String> {
        self.lock().last().map(|(_, text)| text.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, String)>> {
        // A panicking writer cannot leave the Vec half-updated.
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ReplySink for MemorySink {
    async fn send(&self, channel: &str, text: &str) -> Result<(), HandlerError> {
        self.lock().push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

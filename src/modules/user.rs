//! General user commands (help, status).

use std::sync::{Arc, OnceLock};

use crate::chat::ChatDescription;
use crate::commands::{bind, CommandContext, CommandModule, ModuleDef};
use crate::error::HandlerError;

use super::store::UserStore;

/// Top-level `help` and `status` commands.
pub struct UserModule {
    store: Arc<UserStore>,
    listing: Arc<OnceLock<String>>,
}

impl UserModule {
    /// Creates the module. `listing` is filled in once the tree is built.
    pub fn new(store: Arc<UserStore>, listing: Arc<OnceLock<String>>) -> Self {
        Self { store, listing }
    }

    async fn help(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;
        let listing = self.listing.get().map(String::as_str).unwrap_or("");
        chat.mention(format!("Commands: {}", listing)).await
    }

    async fn status(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;

        let (label, record) = match ctx.first_argument() {
            Some(target) => match self.store.get(target).await {
                Some(record) => (format!("Status of {}:", record.name), record),
                None => return chat.mention("That user is not in the database").await,
            },
            None => {
                let record = self.store.update(&chat.user, |_| {}).await;
                ("Your status:".to_string(), record)
            }
        };

        chat.mention(format!(
            "{} banned - {}, permission - {}",
            label,
            if record.banned { "yes" } else { "no" },
            record.permission
        ))
        .await
    }
}

impl CommandModule for UserModule {
    fn define(self: Arc<Self>) -> ModuleDef {
        ModuleDef::new("user")
            .command("help", bind(&self, Self::help))
            .command("status", bind(&self, Self::status))
    }
}

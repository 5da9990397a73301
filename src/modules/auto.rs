//! The `auto` command group: a per-user flag kept by moderators.

use std::sync::Arc;

use crate::chat::ChatDescription;
use crate::commands::{bind, CommandContext, CommandModule, ModuleDef};
use crate::error::HandlerError;

use super::authorize;
use super::store::{Permission, UserStore};

/// `auto [user]`, `auto list`, `auto add <user>`, `auto remove <user>`.
pub struct AutoModule {
    store: Arc<UserStore>,
}

impl AutoModule {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    async fn show(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;

        let (who, record) = match ctx.first_argument() {
            Some(target) => match self.store.get(target).await {
                Some(record) => (record.name.clone(), record),
                None => return chat.mention("That user is not in the database").await,
            },
            None => (
                "You".to_string(),
                self.store.update(&chat.user, |_| {}).await,
            ),
        };

        let state = if record.auto { "auto" } else { "not auto" };
        chat.mention(format!("{} - {}", who, state)).await
    }

    async fn list(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;
        let autos = self.store.users_where(|u| u.auto).await;
        if autos.is_empty() {
            return chat.mention("No autos yet").await;
        }

        let names = autos
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        chat.mention(format!("Autos: {}", names)).await
    }

    async fn set_auto(&self, ctx: &CommandContext, auto: bool) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(ctx)?;
        let Some(target) = ctx.first_argument() else {
            let verb = if auto { "add" } else { "remove" };
            return chat.mention(format!("Usage: auto {verb} <user>")).await;
        };
        if !authorize(&self.store, chat, Permission::Moderator).await? {
            return Ok(());
        }

        let (name, was) = self
            .store
            .modify(target, |u| {
                (u.name.clone(), std::mem::replace(&mut u.auto, auto))
            })
            .await;

        let reply = match (was, auto) {
            (true, true) => format!("{} is already an auto", name),
            (false, false) => format!("{} is not an auto", name),
            (false, true) => format!("{} is now an auto", name),
            (true, false) => format!("{} is no longer an auto", name),
        };
        chat.mention(reply).await
    }

    async fn add(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        self.set_auto(&ctx, true).await
    }

    async fn remove(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        self.set_auto(&ctx, false).await
    }
}

impl CommandModule for AutoModule {
    fn define(self: Arc<Self>) -> ModuleDef {
        ModuleDef::new("auto")
            .group("auto")
            .default_handler(bind(&self, Self::show))
            .command("list", bind(&self, Self::list))
            .command("add", bind(&self, Self::add))
            .command("remove", bind(&self, Self::remove))
    }
}

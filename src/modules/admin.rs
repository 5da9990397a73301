//! Moderation commands (ban, unban, setperm).
//!
//! Each handler enforces its own permission requirement; the router has no
//! notion of who may run what.

use std::sync::Arc;

use crate::chat::ChatDescription;
use crate::commands::{bind, CommandContext, CommandModule, ModuleDef};
use crate::error::HandlerError;

use super::authorize;
use super::store::{Permission, UserStore};

/// Top-level `ban`, `unban` and `setperm` commands.
pub struct AdminModule {
    store: Arc<UserStore>,
}

impl AdminModule {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    async fn set_banned(&self, ctx: &CommandContext, banned: bool) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(ctx)?;
        let Some(target) = ctx.first_argument() else {
            let verb = if banned { "ban" } else { "unban" };
            return chat.mention(format!("Usage: {verb} <user>")).await;
        };
        if !authorize(&self.store, chat, Permission::Admin).await? {
            return Ok(());
        }

        let record = self.store.update(target, |u| u.banned = banned).await;
        tracing::info!(by = %chat.user, user = %record.name, banned, "Ban state changed");
        let outcome = if banned { "banned" } else { "unbanned" };
        chat.mention(format!("{} was {}!", record.name, outcome)).await
    }

    async fn ban(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        self.set_banned(&ctx, true).await
    }

    async fn unban(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        self.set_banned(&ctx, false).await
    }

    async fn setperm(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;
        let [target, level, ..] = ctx.arguments() else {
            return chat
                .mention("Usage: setperm <user> <admin|moderator|user>")
                .await;
        };
        if !authorize(&self.store, chat, Permission::Owner).await? {
            return Ok(());
        }

        let permission = match level.parse::<Permission>() {
            // Ownership is set in config, never granted from chat.
            Ok(Permission::Owner) | Err(_) => {
                return chat.mention(format!("Cannot grant '{}'", level)).await;
            }
            Ok(permission) => permission,
        };

        let record = self
            .store
            .update(target, |u| u.permission = permission)
            .await;
        chat.mention(format!(
            "{} now has {} rights",
            record.name, record.permission
        ))
        .await
    }
}

impl CommandModule for AdminModule {
    fn define(self: Arc<Self>) -> ModuleDef {
        ModuleDef::new("admin")
            .command("ban", bind(&self, Self::ban))
            .command("unban", bind(&self, Self::unban))
            .command("setperm", bind(&self, Self::setperm))
    }
}

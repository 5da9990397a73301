//! The `feed` command group.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::chat::ChatDescription;
use crate::commands::{bind, CommandContext, CommandModule, ModuleDef};
use crate::config::FeedConfig;
use crate::error::HandlerError;

use super::authorize;
use super::store::{Permission, UserStore};

/// Number of entries shown by `feed top`.
const TOP_LIMIT: usize = 3;

const UPDATE_USAGE: &str = "Usage: feed update <reset|count|time> <user> [value]";

/// Formats a wait as `MM:SS`, rounding partial seconds up.
fn clock(wait: Duration) -> String {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `feed [treat]`, `feed top`, `feed status [user]`, `feed add <treat>`,
/// `feed update <action> <user> [value]`.
pub struct FeedModule {
    store: Arc<UserStore>,
    menu: RwLock<Vec<String>>,
    cooldown: Duration,
}

impl FeedModule {
    pub fn new(store: Arc<UserStore>, config: &FeedConfig) -> Self {
        Self {
            store,
            menu: RwLock::new(config.treats.clone()),
            cooldown: config.cooldown(),
        }
    }

    async fn menu_text(&self) -> String {
        let menu = self.menu.read().await;
        if menu.is_empty() {
            "Nothing is on the menu".to_string()
        } else {
            format!("You can feed: {}", menu.join(", "))
        }
    }

    async fn feed(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;

        if self.store.get(&chat.user).await.is_some_and(|u| u.banned) {
            return chat.mention("You are banned, no feeding!").await;
        }

        // Also reached with an unknown subcommand token, which is not a treat.
        let Some(treat) = ctx.first_argument() else {
            return chat.mention(self.menu_text().await).await;
        };
        if !self.menu.read().await.iter().any(|t| t == treat) {
            let menu = self.menu_text().await;
            return chat
                .mention(format!("Cannot feed '{}'. {}", treat, menu))
                .await;
        }

        let now = Instant::now();
        let cooldown = self.cooldown;
        let outcome = self
            .store
            .modify(&chat.user, |u| match u.next_feed {
                Some(at) if at > now => Err(at - now),
                _ => {
                    u.fed += 1;
                    u.next_feed = Some(now + cooldown);
                    Ok(u.fed)
                }
            })
            .await;

        match outcome {
            Ok(total) => {
                chat.mention(format!("You fed {}. Total = {}", treat, total))
                    .await
            }
            Err(wait) => {
                chat.mention(format!("Next feeding in {}. Wait", clock(wait)))
                    .await
            }
        }
    }

    async fn top(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;
        let feeders = self.store.top_feeders(TOP_LIMIT).await;
        if feeders.is_empty() {
            return chat.mention("Nobody has fed yet").await;
        }

        let ranking = feeders
            .iter()
            .enumerate()
            .map(|(i, u)| format!("{}: {} ({})", i + 1, u.name, u.fed))
            .collect::<Vec<_>>()
            .join("; ");
        chat.mention(format!("Top feeders: {}", ranking)).await
    }

    async fn status(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;
        let name = ctx.first_argument().unwrap_or(chat.user.as_str());
        let fed = self.store.get(name).await.map(|u| u.fed).unwrap_or(0);

        let reply = match (fed, ctx.first_argument()) {
            (0, _) => format!("{} has not fed anyone yet", name),
            (fed, Some(_)) => format!("{} fed {} time(s)", name, fed),
            (fed, None) => format!("You fed {} time(s)", fed),
        };
        chat.mention(reply).await
    }

    async fn add(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;
        if !authorize(&self.store, chat, Permission::Moderator).await? {
            return Ok(());
        }
        let Some(treat) = ctx.first_argument() else {
            return chat.mention("Usage: feed add <treat>").await;
        };

        let added = {
            let mut menu = self.menu.write().await;
            let absent = !menu.iter().any(|t| t == treat);
            if absent {
                menu.push(treat.to_string());
            }
            absent
        };

        if !added {
            return chat
                .mention(format!("{} is already on the menu", treat))
                .await;
        }
        tracing::info!(by = %chat.user, treat, "Treat added");
        chat.mention(format!("{} added to the menu", treat)).await
    }

    async fn update(self: Arc<Self>, ctx: CommandContext) -> Result<(), HandlerError> {
        let chat = ChatDescription::from_context(&ctx)?;
        if !authorize(&self.store, chat, Permission::Owner).await? {
            return Ok(());
        }
        let [action, target, rest @ ..] = ctx.arguments() else {
            return chat.mention(UPDATE_USAGE).await;
        };
        if self.store.get(target).await.is_none() {
            return chat.mention("That user is not in the database").await;
        }

        let reply = match (action.as_str(), rest.first()) {
            ("reset", _) => {
                let record = self.store.update(target, |u| u.next_feed = None).await;
                format!("Cooldown of {} reset", record.name)
            }
            ("count", Some(value)) => match value.parse::<u64>() {
                Ok(count) => {
                    let record = self.store.update(target, |u| u.fed = count).await;
                    format!("{} now has {} feed(s)", record.name, count)
                }
                Err(_) => format!("'{}' is not a number", value),
            },
            ("time", Some(value)) => match value.parse::<u64>() {
                Ok(minutes) => {
                    let at = Instant::now() + Duration::from_secs(minutes * 60);
                    let record = self.store.update(target, |u| u.next_feed = Some(at)).await;
                    format!("{} can feed again in {} minute(s)", record.name, minutes)
                }
                Err(_) => format!("'{}' is not a number", value),
            },
            _ => UPDATE_USAGE.to_string(),
        };
        chat.mention(reply).await
    }
}

impl CommandModule for FeedModule {
    fn define(self: Arc<Self>) -> ModuleDef {
        ModuleDef::new("feed")
            .group("feed")
            .default_handler(bind(&self, Self::feed))
            .command("top", bind(&self, Self::top))
            .command("status", bind(&self, Self::status))
            .command("add", bind(&self, Self::add))
            .command("update", bind(&self, Self::update))
    }
}

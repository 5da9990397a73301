//! Integration tests for the bundled modules driven through the console.

use std::sync::Arc;
use std::time::Duration;

use chatcmd::chat::MemorySink;
use chatcmd::commands::Dispatcher;
use chatcmd::config::FeedConfig;
use chatcmd::console::Console;
use chatcmd::modules::{build_dispatcher, Permission, UserStore};
use pretty_assertions::assert_eq;

struct Bot {
    store: Arc<UserStore>,
    sink: Arc<MemorySink>,
    dispatcher: Dispatcher,
}

impl Bot {
    async fn new() -> Self {
        Self::with_cooldown(0).await
    }

    async fn with_cooldown(cooldown_secs: u64) -> Self {
        let store = Arc::new(UserStore::new());
        store
            .update("streamer", |u| u.permission = Permission::Owner)
            .await;
        let feed = FeedConfig {
            cooldown_secs,
            treats: vec!["cookie".to_string()],
        };
        Self {
            dispatcher: build_dispatcher(Arc::clone(&store), '!', &feed).unwrap(),
            store,
            sink: Arc::new(MemorySink::new()),
        }
    }

    /// A console for `user`; every console shares one dispatcher.
    fn console(&self, user: &str) -> Console {
        Console::new(
            self.dispatcher.clone(),
            '!',
            "general",
            user,
            self.sink.clone(),
        )
    }

    fn last(&self) -> String {
        self.sink.last().unwrap()
    }
}

#[tokio::test]
async fn test_help_lists_every_top_level_command() {
    let bot = Bot::new().await;
    bot.console("alice").handle_line("!help").await.unwrap();

    assert_eq!(
        bot.last(),
        "@alice, Commands: !auto [list|add|remove], !ban, !feed [top|status|add|update], \
         !help, !setperm, !status, !unban"
    );
}

#[tokio::test]
async fn test_feed_flow() {
    let bot = Bot::new().await;
    let alice = bot.console("alice");
    let bob = bot.console("bob");
    let owner = bot.console("streamer");

    alice.handle_line("!feed").await.unwrap();
    assert_eq!(bot.last(), "@alice, You can feed: cookie");

    alice.handle_line("!feed cookie").await.unwrap();
    alice.handle_line("!feed cookie").await.unwrap();
    assert_eq!(bot.last(), "@alice, You fed cookie. Total = 2");

    bob.handle_line("!feed cookie").await.unwrap();
    owner.handle_line("!feed update count bob 7").await.unwrap();
    bob.handle_line("!feed top").await.unwrap();
    assert_eq!(bot.last(), "@bob, Top feeders: 1: bob (7); 2: alice (2)");

    bob.handle_line("!feed status alice").await.unwrap();
    assert_eq!(bot.last(), "@bob, alice fed 2 time(s)");
}

#[tokio::test]
async fn test_unknown_feed_token_falls_back_to_menu() {
    let bot = Bot::new().await;
    bot.console("alice")
        .handle_line("!feed sideways")
        .await
        .unwrap();

    assert_eq!(
        bot.last(),
        "@alice, Cannot feed 'sideways'. You can feed: cookie"
    );
}

#[tokio::test]
async fn test_moderator_extends_menu() {
    let bot = Bot::new().await;
    let owner = bot.console("streamer");
    let dave = bot.console("dave");

    dave.handle_line("!feed add pizza").await.unwrap();
    assert_eq!(bot.last(), "@dave, This requires moderator rights");

    owner.handle_line("!setperm dave moderator").await.unwrap();
    dave.handle_line("!feed add pizza").await.unwrap();
    assert_eq!(bot.last(), "@dave, pizza added to the menu");

    dave.handle_line("!feed pizza").await.unwrap();
    assert_eq!(bot.last(), "@dave, You fed pizza. Total = 1");
}

#[tokio::test(start_paused = true)]
async fn test_feed_cooldown_and_owner_reset() {
    let bot = Bot::with_cooldown(300).await;
    let alice = bot.console("alice");
    let owner = bot.console("streamer");

    alice.handle_line("!feed cookie").await.unwrap();
    tokio::time::advance(Duration::from_secs(60)).await;
    alice.handle_line("!feed cookie").await.unwrap();
    assert_eq!(bot.last(), "@alice, Next feeding in 04:00. Wait");

    owner.handle_line("!feed update reset alice").await.unwrap();
    alice.handle_line("!feed cookie").await.unwrap();
    assert_eq!(bot.last(), "@alice, You fed cookie. Total = 2");
}

#[tokio::test]
async fn test_banned_user_cannot_feed() {
    let bot = Bot::new().await;
    let owner = bot.console("streamer");
    let carol = bot.console("carol");

    owner.handle_line("!ban carol").await.unwrap();
    assert_eq!(bot.last(), "@streamer, carol was banned!");

    carol.handle_line("!feed cookie").await.unwrap();
    assert_eq!(bot.last(), "@carol, You are banned, no feeding!");

    carol.handle_line("!status").await.unwrap();
    assert_eq!(
        bot.last(),
        "@carol, Your status: banned - yes, permission - user"
    );

    owner.handle_line("!unban carol").await.unwrap();
    carol.handle_line("!feed cookie").await.unwrap();
    assert_eq!(bot.last(), "@carol, You fed cookie. Total = 1");
}

#[tokio::test]
async fn test_setperm_by_owner_grants_admin() {
    let bot = Bot::new().await;
    let owner = bot.console("streamer");
    let dave = bot.console("dave");

    dave.handle_line("!ban eve").await.unwrap();
    assert_eq!(bot.last(), "@dave, This requires admin rights");

    owner.handle_line("!setperm dave admin").await.unwrap();
    assert_eq!(bot.last(), "@streamer, dave now has admin rights");
    assert_eq!(bot.store.permission("dave").await, Permission::Admin);

    dave.handle_line("!ban eve").await.unwrap();
    assert_eq!(bot.last(), "@dave, eve was banned!");

    dave.handle_line("!setperm eve admin").await.unwrap();
    assert_eq!(bot.last(), "@dave, This requires owner rights");
}

#[tokio::test]
async fn test_auto_group() {
    let bot = Bot::new().await;
    let owner = bot.console("streamer");
    let alice = bot.console("alice");

    owner.handle_line("!auto add alice").await.unwrap();
    assert_eq!(bot.last(), "@streamer, alice is now an auto");

    alice.handle_line("!auto").await.unwrap();
    assert_eq!(bot.last(), "@alice, You - auto");

    alice.handle_line("!auto list").await.unwrap();
    assert_eq!(bot.last(), "@alice, Autos: alice");
}

#[tokio::test]
async fn test_unknown_command_and_plain_chat_are_silent() {
    let bot = Bot::new().await;
    let alice = bot.console("alice");

    alice.handle_line("!top").await.unwrap();
    alice.handle_line("!dance").await.unwrap();
    alice.handle_line("good morning chat").await.unwrap();

    assert!(bot.sink.sent().is_empty());
}

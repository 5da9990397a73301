//! Bundled command modules.
//!
//! These run on top of an in-memory [`UserStore`] and cover every routing
//! shape: plain top-level commands (`user`, `admin`) and command groups
//! with a default handler (`feed`, `auto`).

pub mod admin;
pub mod auto;
pub mod feed;
pub mod store;
pub mod user;

use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

pub use admin::AdminModule;
pub use auto::AutoModule;
pub use feed::FeedModule;
pub use store::{Permission, UserRecord, UserStore};
pub use user::UserModule;

use crate::chat::ChatDescription;
use crate::commands::{CommandRegistry, Dispatcher};
use crate::config::FeedConfig;
use crate::error::{HandlerError, Result};

/// Registers the bundled modules and returns a dispatcher over them.
///
/// `prefix` is only used to render the `help` listing.
pub fn build_dispatcher(
    store: Arc<UserStore>,
    prefix: char,
    feed: &FeedConfig,
) -> Result<Dispatcher> {
    let listing = Arc::new(OnceLock::new());

    let mut registry = CommandRegistry::new();
    registry
        .register(UserModule::new(Arc::clone(&store), Arc::clone(&listing)))?
        .register(AdminModule::new(Arc::clone(&store)))?
        .register(FeedModule::new(Arc::clone(&store), feed))?
        .register(AutoModule::new(store))?;

    let tree = registry.build();
    let summary = tree.summary(&prefix.to_string());
    info!(commands = tree.len(), "Command tree built");

    if listing
        .set(summary.lines().collect::<Vec<_>>().join(", "))
        .is_err()
    {
        warn!("Help listing was already set");
    }

    Ok(Dispatcher::new(tree))
}

/// Replies with a refusal unless the caller holds `required`.
pub(crate) async fn authorize(
    store: &UserStore,
    chat: &ChatDescription,
    required: Permission,
) -> std::result::Result<bool, HandlerError> {
    if store.permission(&chat.user).await.allows(required) {
        return Ok(true);
    }
    chat.mention(format!("This requires {} rights", required))
        .await?;
    Ok(false)
}

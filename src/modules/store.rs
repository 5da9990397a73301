//! In-memory user state shared by the bundled modules.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Permission level of a chat user, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    Owner,
    Admin,
    Moderator,
    #[default]
    User,
}

impl Permission {
    fn rank(self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Admin => 2,
            Self::Moderator => 1,
            Self::User => 0,
        }
    }

    /// Whether this level grants everything `required` grants.
    pub fn allows(self, required: Permission) -> bool {
        self.rank() >= required.rank()
    }

    /// Returns the permission as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::User => "user",
        }
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "moderator" | "mod" => Ok(Self::Moderator),
            "user" => Ok(Self::User),
            _ => Err(format!("Unknown permission level: {}", s)),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored state of one chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub permission: Permission,
    pub banned: bool,
    /// Number of feedings so far.
    pub fed: u64,
    /// Earliest time the user may feed again.
    pub next_feed: Option<Instant>,
    pub auto: bool,
}

impl UserRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            permission: Permission::default(),
            banned: false,
            fed: 0,
            next_feed: None,
            auto: false,
        }
    }
}

/// User records keyed by lowercase login name.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `name`, if the user is known.
    pub async fn get(&self, name: &str) -> Option<UserRecord> {
        self.users.read().await.get(&name.to_lowercase()).cloned()
    }

    /// Applies `f` to the record for `name`, creating it first if needed,
    /// and returns the updated record.
    pub async fn update<F>(&self, name: &str, f: F) -> UserRecord
    where
        F: FnOnce(&mut UserRecord),
    {
        self.modify(name, |record| {
            f(record);
            record.clone()
        })
        .await
    }

    /// Runs `f` on the record for `name` under the write lock, creating the
    /// record first if needed.
    pub async fn modify<F, T>(&self, name: &str, f: F) -> T
    where
        F: FnOnce(&mut UserRecord) -> T,
    {
        let key = name.to_lowercase();
        let mut users = self.users.write().await;
        let record = users
            .entry(key)
            .or_insert_with_key(|key| UserRecord::new(key));
        f(record)
    }

    /// Users matching `filter`, sorted by name.
    pub async fn users_where<F>(&self, filter: F) -> Vec<UserRecord>
    where
        F: Fn(&UserRecord) -> bool,
    {
        let users = self.users.read().await;
        let mut matching: Vec<_> = users.values().filter(|u| filter(u)).cloned().collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        matching
    }

    /// Permission of `name`; unknown users are plain users.
    pub async fn permission(&self, name: &str) -> Permission {
        self.get(name)
            .await
            .map(|u| u.permission)
            .unwrap_or_default()
    }

    /// Up to `limit` users with the highest feed totals, highest first.
    pub async fn top_feeders(&self, limit: usize) -> Vec<UserRecord> {
        let users = self.users.read().await;
        let mut feeders: Vec<_> = users
            .values()
            .filter(|u| u.fed > 0)
            .cloned()
            .collect();
        feeders.sort_by(|a, b| b.fed.cmp(&a.fed).then_with(|| a.name.cmp(&b.name)));
        feeders.truncate(limit);
        feeders
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod parser;

pub use parser::ParseError;

pub const WATCH_EVENT: &str = "WatchEvent";
pub const PULL_REQUEST_EVENT: &str = "PullRequestEvent";

/// The four record kinds of the dataset, in ingestion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Actor,
    Commit,
    Event,
    Repo,
}

impl EntityKind {
    /// Order in which sources must be consumed so that every pending
    /// back-reference map is filled before the pass that drains it.
    pub const LOAD_ORDER: [EntityKind; 4] = [
        EntityKind::Actor,
        EntityKind::Commit,
        EntityKind::Event,
        EntityKind::Repo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Actor => "actor",
            EntityKind::Commit => "commit",
            EntityKind::Event => "event",
            EntityKind::Repo => "repo",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    /// Ids of the events this actor authored, in event load order.
    #[serde(skip)]
    pub events: Vec<i64>,
}

impl Actor {
    /// Non-automated account check based on common bot naming conventions.
    ///
    /// Anyone can put "bot" in their name, so this misclassifies some humans
    /// and misses some bots. Only the exact suffixes `[bot]`, `-bot`, `Bot`
    /// and the infix `-bot-` are treated as automated.
    pub fn is_active_user(&self) -> bool {
        let name = self.username.as_str();
        !(name.ends_with("[bot]")
            || name.ends_with("-bot")
            || name.ends_with("Bot")
            || name.contains("-bot-"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub events: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub actor_id: i64,
    pub repo_id: i64,
    /// SHAs of attached commits, empty for anything but pushes.
    #[serde(skip)]
    pub commits: Vec<String>,
}

impl Event {
    pub fn is_watch_event(&self) -> bool {
        self.event_type == WATCH_EVENT
    }

    pub fn is_pull_request_event(&self) -> bool {
        self.event_type == PULL_REQUEST_EVENT
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub event_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(name: &str) -> Actor {
        Actor {
            id: 1,
            username: name.to_string(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_bot_suffixes_are_excluded() {
        for name in ["foo[bot]", "foo-bot", "fooBot", "a-bot-b", "dependabot[bot]"] {
            assert!(!actor(name).is_active_user(), "{} should be a bot", name);
        }
    }

    #[test]
    fn test_bot_heuristic_is_suffix_specific() {
        for name in ["foobot", "botfoo", "robotics", "bot-foo", "Botanist"] {
            assert!(actor(name).is_active_user(), "{} should be active", name);
        }
    }

    #[test]
    fn test_event_type_predicates() {
        let mut event = Event {
            id: 7,
            event_type: "WatchEvent".to_string(),
            actor_id: 1,
            repo_id: 2,
            commits: vec!["a".to_string(), "b".to_string()],
        };
        assert!(event.is_watch_event());
        assert!(!event.is_pull_request_event());
        assert_eq!(event.commit_count(), 2);

        event.event_type = "PullRequestEvent".to_string();
        assert!(event.is_pull_request_event());

        // tags are compared exactly
        event.event_type = "watchevent".to_string();
        assert!(!event.is_watch_event());
    }
}

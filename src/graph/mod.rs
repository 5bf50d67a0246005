use crate::model::{Actor, Commit, Event, Repo};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fully linked, read-only view over one loaded dataset.
///
/// Entities reference each other by id; back-references (`Actor::events`,
/// `Repo::events`, `Event::commits`) are resolved through the graph. The
/// maps are ordered by id so every scan over them is reproducible.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    actors: BTreeMap<i64, Actor>,
    repos: BTreeMap<i64, Repo>,
    events: BTreeMap<i64, Event>,
    commits: BTreeMap<String, Commit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub actors: usize,
    pub repos: usize,
    pub events: usize,
    pub commits: usize,
}

impl EntityGraph {
    pub(crate) fn from_parts(
        actors: BTreeMap<i64, Actor>,
        repos: BTreeMap<i64, Repo>,
        events: BTreeMap<i64, Event>,
        commits: BTreeMap<String, Commit>,
    ) -> Self {
        Self {
            actors,
            repos,
            events,
            commits,
        }
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn repos(&self) -> impl Iterator<Item = &Repo> {
        self.repos.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn commits(&self) -> impl Iterator<Item = &Commit> {
        self.commits.values()
    }

    pub fn actor(&self, id: i64) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn repo(&self, id: i64) -> Option<&Repo> {
        self.repos.get(&id)
    }

    pub fn event(&self, id: i64) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn commit(&self, sha: &str) -> Option<&Commit> {
        self.commits.get(sha)
    }

    pub fn actor_events<'g>(&'g self, actor: &'g Actor) -> impl Iterator<Item = &'g Event> + 'g {
        self.resolve_events(&actor.events)
    }

    pub fn repo_events<'g>(&'g self, repo: &'g Repo) -> impl Iterator<Item = &'g Event> + 'g {
        self.resolve_events(&repo.events)
    }

    fn resolve_events<'g>(&'g self, ids: &'g [i64]) -> impl Iterator<Item = &'g Event> + 'g {
        ids.iter().filter_map(move |id| self.events.get(id))
    }

    pub fn count_repo_events_where<F>(&self, repo: &Repo, predicate: F) -> usize
    where
        F: Fn(&Event) -> bool,
    {
        self.repo_events(repo).filter(|e| predicate(*e)).count()
    }

    pub fn count_actor_events_where<F>(&self, actor: &Actor, predicate: F) -> usize
    where
        F: Fn(&Event) -> bool,
    {
        self.actor_events(actor).filter(|e| predicate(*e)).count()
    }

    /// Total commits pushed to a repository across all of its events.
    pub fn count_repo_commits(&self, repo: &Repo) -> usize {
        self.repo_events(repo).map(Event::commit_count).sum()
    }

    /// Total commits pushed by an actor across all of their events.
    pub fn count_actor_commits(&self, actor: &Actor) -> usize {
        self.actor_events(actor).map(Event::commit_count).sum()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            actors: self.actors.len(),
            repos: self.repos.len(),
            events: self.events.len(),
            commits: self.commits.len(),
        }
    }
}

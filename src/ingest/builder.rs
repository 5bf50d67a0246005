use super::*;
use crate::graph::EntityGraph;
use crate::model::{Actor, Commit, Event, Repo};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Loads all four entity kinds from `source` and links them.
///
/// Passes run strictly in [`EntityKind::LOAD_ORDER`]: commits leave a
/// pending event→commits map that the event pass drains, and the event
/// pass leaves pending repo→events and actor→events maps that the repo
/// pass and the final actor fix-up drain.
pub fn build_graph<S>(source: &mut S) -> Result<EntityGraph, IngestionFailure>
where
    S: RecordSource + ?Sized,
{
    let mut builder = GraphBuilder::default();

    for kind in EntityKind::LOAD_ORDER {
        let origin = source.origin(kind);
        info!("Started loading data from file {}", origin);

        let mut count = 0usize;
        source
            .for_each_record(kind, &mut |record| {
                count += 1;
                builder.ingest(kind, &origin, record)
            })
            .map_err(|cause| IngestionFailure { kind, cause })?;

        if kind == EntityKind::Event {
            builder.attach_actor_events();
        }

        info!("Done loading data from file {} ({} records)", origin, count);
    }

    Ok(builder.finish())
}

#[derive(Default)]
struct GraphBuilder {
    actors: BTreeMap<i64, Actor>,
    repos: BTreeMap<i64, Repo>,
    events: BTreeMap<i64, Event>,
    commits: BTreeMap<String, Commit>,

    // Inverse indices keyed by ids whose owning entity may not be loaded yet.
    pending_event_commits: HashMap<i64, Vec<String>>,
    pending_repo_events: HashMap<i64, Vec<i64>>,
    pending_actor_events: HashMap<i64, Vec<i64>>,
}

impl GraphBuilder {
    fn ingest(
        &mut self,
        kind: EntityKind,
        origin: &str,
        record: RawRecord,
    ) -> Result<(), IngestError> {
        let malformed = |cause| IngestError::MalformedRecord {
            origin: origin.to_string(),
            line: record.line,
            cause,
        };

        let fields = record.fields.as_slice();
        match kind {
            EntityKind::Actor => self.add_actor(Actor::from_fields(fields).map_err(malformed)?),
            EntityKind::Commit => self.add_commit(Commit::from_fields(fields).map_err(malformed)?),
            EntityKind::Event => self.add_event(Event::from_fields(fields).map_err(malformed)?),
            EntityKind::Repo => self.add_repo(Repo::from_fields(fields).map_err(malformed)?),
        }

        Ok(())
    }

    fn add_actor(&mut self, actor: Actor) {
        if let Some(previous) = self.actors.insert(actor.id, actor) {
            warn!("Duplicate actor id {}, keeping the last record", previous.id);
        }
    }

    fn add_commit(&mut self, commit: Commit) {
        if let Some(previous) = self.commits.remove(&commit.sha) {
            warn!("Duplicate commit {}, keeping the last record", previous.sha);
            withdraw(&mut self.pending_event_commits, &previous.event_id, &previous.sha);
        }

        self.pending_event_commits
            .entry(commit.event_id)
            .or_default()
            .push(commit.sha.clone());
        self.commits.insert(commit.sha.clone(), commit);
    }

    fn add_event(&mut self, mut event: Event) {
        let id = event.id;

        if let Some(previous) = self.events.remove(&id) {
            warn!("Duplicate event id {}, keeping the last record", id);
            // The overwritten record already claimed the pending commits.
            event.commits = previous.commits;
            withdraw(&mut self.pending_repo_events, &previous.repo_id, &id);
            withdraw(&mut self.pending_actor_events, &previous.actor_id, &id);
        } else {
            event.commits = self.pending_event_commits.remove(&id).unwrap_or_default();
        }

        self.pending_repo_events.entry(event.repo_id).or_default().push(id);
        self.pending_actor_events.entry(event.actor_id).or_default().push(id);
        self.events.insert(id, event);
    }

    fn add_repo(&mut self, mut repo: Repo) {
        repo.events = match self.repos.remove(&repo.id) {
            Some(previous) => {
                warn!("Duplicate repo id {}, keeping the last record", previous.id);
                previous.events
            }
            None => self.pending_repo_events.remove(&repo.id).unwrap_or_default(),
        };
        self.repos.insert(repo.id, repo);
    }

    fn attach_actor_events(&mut self) {
        for actor in self.actors.values_mut() {
            actor.events = self.pending_actor_events.remove(&actor.id).unwrap_or_default();
        }
    }

    fn finish(self) -> EntityGraph {
        let orphan_commits: usize = self.pending_event_commits.values().map(Vec::len).sum();
        if orphan_commits > 0 {
            debug!("{} commits reference events that were never loaded", orphan_commits);
        }
        let orphan_events: usize = self.pending_repo_events.values().map(Vec::len).sum();
        if orphan_events > 0 {
            debug!("{} events reference repos that were never loaded", orphan_events);
        }
        let unowned_events: usize = self.pending_actor_events.values().map(Vec::len).sum();
        if unowned_events > 0 {
            debug!("{} events reference actors that were never loaded", unowned_events);
        }

        EntityGraph::from_parts(self.actors, self.repos, self.events, self.commits)
    }
}

fn withdraw<K, V>(pending: &mut HashMap<K, Vec<V>>, key: &K, value: &V)
where
    K: Eq + std::hash::Hash,
    V: PartialEq,
{
    if let Some(list) = pending.get_mut(key) {
        if let Some(pos) = list.iter().position(|v| v == value) {
            list.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> MemorySource {
        MemorySource::new()
            .with_rows(EntityKind::Actor, [["1", "alice"], ["2", "bob"], ["3", "ci[bot]"]])
            .with_rows(
                EntityKind::Commit,
                [
                    ["c1", "first", "100"],
                    ["c2", "second", "100"],
                    ["c3", "third", "102"],
                ],
            )
            .with_rows(
                EntityKind::Event,
                [
                    ["100", "PushEvent", "1", "10"],
                    ["101", "WatchEvent", "2", "10"],
                    ["102", "PushEvent", "2", "11"],
                    ["103", "PullRequestEvent", "3", "11"],
                ],
            )
            .with_rows(EntityKind::Repo, [["10", "acme/widgets"], ["11", "acme/gadgets"], ["12", "acme/empty"]])
    }

    #[test]
    fn test_links_every_back_reference() {
        let mut source = dataset();
        let graph = build_graph(&mut source).unwrap();

        assert_eq!(graph.event(100).unwrap().commits, vec!["c1", "c2"]);
        assert_eq!(graph.event(101).unwrap().commits, Vec::<String>::new());
        assert_eq!(graph.event(102).unwrap().commits, vec!["c3"]);

        assert_eq!(graph.repo(10).unwrap().events, vec![100, 101]);
        assert_eq!(graph.repo(11).unwrap().events, vec![102, 103]);
        assert!(graph.repo(12).unwrap().events.is_empty());

        assert_eq!(graph.actor(1).unwrap().events, vec![100]);
        assert_eq!(graph.actor(2).unwrap().events, vec![101, 102]);
        assert_eq!(graph.actor(3).unwrap().events, vec![103]);
    }

    #[test]
    fn test_every_event_and_commit_has_exactly_one_owner() {
        let mut source = dataset();
        let graph = build_graph(&mut source).unwrap();

        for event in graph.events() {
            let by_actor = graph.actors().filter(|a| a.events.contains(&event.id)).count();
            let by_repo = graph.repos().filter(|r| r.events.contains(&event.id)).count();
            assert_eq!(by_actor, 1, "event {} actor owners", event.id);
            assert_eq!(by_repo, 1, "event {} repo owners", event.id);
        }
        for commit in graph.commits() {
            let owners = graph.events().filter(|e| e.commits.contains(&commit.sha)).count();
            assert_eq!(owners, 1, "commit {} owners", commit.sha);
            assert!(graph.event(commit.event_id).unwrap().commits.contains(&commit.sha));
        }
    }

    #[test]
    fn test_malformed_record_aborts_with_context() {
        let mut source = dataset().with_rows(EntityKind::Event, [["104", "PushEvent", "two", "10"]]);
        let failure = build_graph(&mut source).unwrap_err();

        assert_eq!(failure.kind, EntityKind::Event);
        match failure.cause {
            IngestError::MalformedRecord { origin, line, cause } => {
                assert_eq!(origin, "memory:event");
                assert_eq!(line, 5);
                assert!(matches!(cause, ParseError::InvalidInteger { field: "actor_id", .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_events_with_unknown_owners_stay_unlinked() {
        let mut source = MemorySource::new()
            .with_rows(EntityKind::Actor, [["1", "alice"]])
            .with_rows(EntityKind::Event, [["100", "WatchEvent", "9", "99"]])
            .with_rows(EntityKind::Repo, [["10", "acme/widgets"]]);
        let graph = build_graph(&mut source).unwrap();

        assert!(graph.event(100).is_some());
        assert!(graph.actor(1).unwrap().events.is_empty());
        assert!(graph.repo(10).unwrap().events.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_last_record_and_single_ownership() {
        let mut source = MemorySource::new()
            .with_rows(EntityKind::Actor, [["1", "alice"], ["2", "bob"], ["1", "alice-renamed"]])
            .with_rows(EntityKind::Commit, [["c1", "old", "100"], ["c1", "new", "101"]])
            .with_rows(
                EntityKind::Event,
                [
                    ["100", "PushEvent", "1", "10"],
                    ["101", "PushEvent", "1", "10"],
                    ["100", "PushEvent", "2", "11"],
                ],
            )
            .with_rows(EntityKind::Repo, [["10", "acme/widgets"], ["11", "acme/gadgets"], ["11", "acme/gizmos"]]);
        let graph = build_graph(&mut source).unwrap();

        assert_eq!(graph.actor(1).unwrap().username, "alice-renamed");
        assert_eq!(graph.commit("c1").unwrap().message, "new");
        assert!(graph.event(100).unwrap().commits.is_empty());
        assert_eq!(graph.event(101).unwrap().commits, vec!["c1"]);

        assert_eq!(graph.actor(1).unwrap().events, vec![101]);
        assert_eq!(graph.actor(2).unwrap().events, vec![100]);
        assert_eq!(graph.repo(10).unwrap().events, vec![101]);

        let gadgets = graph.repo(11).unwrap();
        assert_eq!(gadgets.name, "acme/gizmos");
        assert_eq!(gadgets.events, vec![100]);
    }

    #[test]
    fn test_empty_sources_build_an_empty_graph() {
        let mut source = MemorySource::new();
        let graph = build_graph(&mut source).unwrap();
        assert_eq!(graph.summary().events, 0);
        assert_eq!(graph.summary().actors, 0);
    }
}

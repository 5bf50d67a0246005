use serde::Serialize;

pub mod ranker;

pub use ranker::{no_tie_break, top_n, Ranked};

use crate::graph::{EntityGraph, GraphSummary};
use crate::model::{Actor, Event, Repo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRanking<'g> {
    pub repo: &'g Repo,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRanking<'g> {
    pub user: &'g Actor,
    pub pr_count: usize,
    pub commit_count: usize,
}

/// The three fixed reports, in presentation order.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'g> {
    pub top_n: usize,
    pub summary: GraphSummary,
    pub active_users_by_pull_requests: Vec<UserRanking<'g>>,
    pub repos_by_watch_events: Vec<RepoRanking<'g>>,
    pub repos_by_commits: Vec<RepoRanking<'g>>,
}

impl<'g> AnalysisReport<'g> {
    pub fn assemble(graph: &'g EntityGraph, n: usize) -> Self {
        Self {
            top_n: n,
            summary: graph.summary(),
            active_users_by_pull_requests: active_users_by_pull_requests(graph, n),
            repos_by_watch_events: repos_by_watch_events(graph, n),
            repos_by_commits: repos_by_commits(graph, n),
        }
    }
}

/// Repositories with the most stars ("WatchEvent"s).
pub fn repos_by_watch_events(graph: &EntityGraph, n: usize) -> Vec<RepoRanking<'_>> {
    top_n(
        graph.repos(),
        n,
        |repo| graph.count_repo_events_where(repo, Event::is_watch_event),
        no_tie_break,
    )
    .into_iter()
    .map(|r| RepoRanking {
        repo: r.item,
        count: r.score,
    })
    .collect()
}

/// Repositories with the most commits pushed across all their events.
pub fn repos_by_commits(graph: &EntityGraph, n: usize) -> Vec<RepoRanking<'_>> {
    top_n(
        graph.repos(),
        n,
        |repo| graph.count_repo_commits(repo),
        no_tie_break,
    )
    .into_iter()
    .map(|r| RepoRanking {
        repo: r.item,
        count: r.score,
    })
    .collect()
}

/// Non-bot users with the most pull requests; more commits wins a tie.
pub fn active_users_by_pull_requests(graph: &EntityGraph, n: usize) -> Vec<UserRanking<'_>> {
    // Commit totals are computed once per candidate rather than per comparison.
    let candidates = graph
        .actors()
        .filter(|actor| actor.is_active_user())
        .map(|actor| (actor, graph.count_actor_commits(actor)));

    top_n(
        candidates,
        n,
        |(actor, _)| graph.count_actor_events_where(actor, Event::is_pull_request_event),
        |(_, a_commits), (_, b_commits)| b_commits.cmp(a_commits),
    )
    .into_iter()
    .map(|r| UserRanking {
        user: r.item.0,
        pr_count: r.score,
        commit_count: r.item.1,
    })
    .collect()
}

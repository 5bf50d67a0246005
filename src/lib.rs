//! HubPulse: loads an exported GitHub activity dataset (actors, commits,
//! events, repos) into an in-memory graph and ranks users and repositories.

pub mod analysis;
pub mod config;
pub mod graph;
pub mod ingest;
pub mod model;
pub mod output;
pub mod preflight;

pub use analysis::AnalysisReport;
pub use graph::EntityGraph;
pub use ingest::{build_graph, CsvDirectory, IngestionFailure, RecordSource};

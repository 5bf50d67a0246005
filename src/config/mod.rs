use crate::model::EntityKind;
use anyhow::{Context, Result};
use ::config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "HUBPULSE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub actors_file: String,
    pub commits_file: String,
    pub events_file: String,
    pub repos_file: String,
    pub has_headers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub top_n: usize,
    pub default_format: String,
    pub color_output: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            actors_file: "actors.csv".to_string(),
            commits_file: "commits.csv".to_string(),
            events_file: "events.csv".to_string(),
            repos_file: "repos.csv".to_string(),
            has_headers: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            default_format: "text".to_string(),
            color_output: true,
        }
    }
}

impl DataConfig {
    pub fn file_name(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Actor => &self.actors_file,
            EntityKind::Commit => &self.commits_file,
            EntityKind::Event => &self.events_file,
            EntityKind::Repo => &self.repos_file,
        }
    }

    /// Required file names, in load order.
    pub fn required_files(&self) -> Vec<&str> {
        EntityKind::LOAD_ORDER
            .iter()
            .map(|kind| self.file_name(*kind))
            .collect()
    }
}

impl Config {
    /// Defaults, then the optional file, then `HUBPULSE__SECTION__KEY` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&Self::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = ::config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| match path {
                Some(path) => format!("Failed to load configuration from {}", path.display()),
                None => "Failed to load configuration".to_string(),
            })
    }
}

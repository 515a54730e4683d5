// Adapters layer: concrete implementations of the domain ports (files, http, storage).

pub mod file_source;
pub mod http_source;
pub mod storage;

pub use file_source::FileSource;
pub use http_source::HttpSource;
pub use storage::LocalStorage;

use crate::config::{SourceConfig, SourceKind};
use crate::domain::model::{Match, Scope, Team};
use crate::domain::ports::{MatchSource, TeamSource};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use std::time::Duration;

/// Either source, picked at runtime from configuration.
#[derive(Debug, Clone)]
pub enum DataSource {
    File(FileSource),
    Http(HttpSource),
}

impl DataSource {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        match config.kind {
            SourceKind::File => {
                let teams = validate_required_field("source.teams_file", &config.teams_file)?;
                let matches =
                    validate_required_field("source.matches_file", &config.matches_file)?;
                Ok(DataSource::File(FileSource::new(teams, matches)))
            }
            SourceKind::Http => {
                let base_url = validate_required_field("source.base_url", &config.base_url)?;
                Ok(DataSource::Http(
                    HttpSource::new(base_url.as_str())
                        .with_token(config.token.clone())
                        .with_timeout(config.timeout_seconds.map(Duration::from_secs)),
                ))
            }
        }
    }
}

#[async_trait]
impl TeamSource for DataSource {
    async fn teams(&self, scope: Scope) -> Result<Vec<Team>> {
        match self {
            DataSource::File(source) => source.teams(scope).await,
            DataSource::Http(source) => source.teams(scope).await,
        }
    }
}

#[async_trait]
impl MatchSource for DataSource {
    async fn finished_matches(&self, scope: Scope) -> Result<Vec<Match>> {
        match self {
            DataSource::File(source) => source.finished_matches(scope).await,
            DataSource::Http(source) => source.finished_matches(scope).await,
        }
    }
}

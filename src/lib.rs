pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{DataSource, FileSource, HttpSource, LocalStorage};
pub use app::{RankingRun, RankingService, StandingsTable};
pub use config::toml_config::TomlConfig;
pub use core::{compute_standings, Anomaly, HeadToHead, Standings, StandingsEngine, StandingsError};
pub use domain::model::{
    Match, MatchStatus, OutputFormat, RankingPolicy, Scope, StandingsRow, Team, TeamRef,
};
pub use utils::error::{RankingError, Result};

pub mod aggregator;
pub mod score;
pub mod standings;
pub mod tiebreak;

pub use crate::domain::model::{Match, RankingPolicy, Scope, StandingsRow, Team};
pub use crate::domain::ports::{ConfigProvider, MatchSource, Storage, TeamSource};
pub use crate::utils::error::Result;
pub use aggregator::{Anomaly, HeadToHead};
pub use standings::{compute_standings, Standings, StandingsEngine, StandingsError};

pub mod ranking_service;
pub mod report;

pub use ranking_service::{RankingRun, RankingService};
pub use report::{StandingsTable, TableLine};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TeamId = i64;
pub type PoolId = i64;
pub type MatchId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    /// 企業 / 公司名稱
    pub name: String,
    #[serde(default)]
    pub pool_id: Option<PoolId>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pool_id: None,
        }
    }

    pub fn in_pool(mut self, pool_id: PoolId) -> Self {
        self.pool_id = Some(pool_id);
        self
    }
}

/// A match participant as carried on the match record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
    #[serde(default)]
    pub name: String,
}

impl From<&Team> for TeamRef {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, MatchStatus::Finished)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::InProgress => "IN_PROGRESS",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Cancelled => "CANCELLED",
            MatchStatus::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(MatchStatus::Scheduled),
            "IN_PROGRESS" => Ok(MatchStatus::InProgress),
            "FINISHED" => Ok(MatchStatus::Finished),
            "CANCELLED" => Ok(MatchStatus::Cancelled),
            other => Err(format!("unknown match status: {}", other)),
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub team_a: TeamRef,
    pub team_b: TeamRef,
    pub status: MatchStatus,
    /// A 隊的局分字串，例如 "4-6,5-7"；每盤取第二個數字為 A 隊局數
    #[serde(default)]
    pub score_a: Option<String>,
    #[serde(default)]
    pub score_b: Option<String>,
}

impl Match {
    /// Builds a finished match between two teams with the given score strings.
    pub fn finished(
        id: MatchId,
        team_a: &Team,
        team_b: &Team,
        score_a: Option<&str>,
        score_b: Option<&str>,
    ) -> Self {
        Self {
            id,
            team_a: TeamRef::from(team_a),
            team_b: TeamRef::from(team_b),
            status: MatchStatus::Finished,
            score_a: score_a.map(str::to_string),
            score_b: score_b.map(str::to_string),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}

/// One team's line in a computed table.
///
/// `points` is filled in by the ranking policy: one per win for pool
/// rankings, three per win for company rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub team_id: TeamId,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_for: u32,
    pub sets_against: u32,
    pub games_for: u32,
    pub games_against: u32,
    pub points: u32,
}

impl StandingsRow {
    pub fn empty(team_id: TeamId, name: impl Into<String>) -> Self {
        Self {
            team_id,
            name: name.into(),
            played: 0,
            wins: 0,
            losses: 0,
            sets_for: 0,
            sets_against: 0,
            games_for: 0,
            games_against: 0,
            points: 0,
        }
    }

    pub fn set_diff(&self) -> i64 {
        i64::from(self.sets_for) - i64::from(self.sets_against)
    }

    pub fn game_diff(&self) -> i64 {
        i64::from(self.games_for) - i64::from(self.games_against)
    }

    pub fn is_blank(&self) -> bool {
        self.played == 0
            && self.wins == 0
            && self.losses == 0
            && self.sets_for == 0
            && self.sets_against == 0
            && self.games_for == 0
            && self.games_against == 0
    }
}

/// Which teams a ranking is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "id")]
pub enum Scope {
    Pool(PoolId),
    All,
}

impl Scope {
    pub fn from_pool(pool_id: Option<PoolId>) -> Self {
        pool_id.map(Scope::Pool).unwrap_or(Scope::All)
    }

    pub fn contains(&self, team: &Team) -> bool {
        match self {
            Scope::Pool(pool_id) => team.pool_id == Some(*pool_id),
            Scope::All => true,
        }
    }

    /// 用於輸出檔名，例如 "pool-3" / "all"
    pub fn file_stem(&self) -> String {
        match self {
            Scope::Pool(pool_id) => format!("pool-{}", pool_id),
            Scope::All => "all".to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Pool(pool_id) => write!(f, "pool {}", pool_id),
            Scope::All => f.write_str("all teams"),
        }
    }
}

/// The two ranking variants the backend knows about. Callers pick one
/// explicitly; nothing is inferred from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Rows per team, 1 point per win, head-to-head before set/game differential.
    #[default]
    #[serde(alias = "pool")]
    PoolHeadToHead,
    /// Rows per company name, 3 points per win, alphabetical final tie-break.
    #[serde(alias = "company")]
    CompanyPoints,
}

impl RankingPolicy {
    pub fn points_per_win(self) -> u32 {
        match self {
            RankingPolicy::PoolHeadToHead => 1,
            RankingPolicy::CompanyPoints => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankingPolicy::PoolHeadToHead => "pool_head_to_head",
            RankingPolicy::CompanyPoints => "company_points",
        }
    }
}

impl FromStr for RankingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pool" | "pool_head_to_head" | "pool-head-to-head" => Ok(RankingPolicy::PoolHeadToHead),
            "company" | "company_points" | "company-points" => Ok(RankingPolicy::CompanyPoints),
            other => Err(format!(
                "unknown ranking policy '{}', expected 'pool' or 'company'",
                other
            )),
        }
    }
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Tsv, OutputFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unsupported output format '{}', expected one of: csv, tsv, json",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

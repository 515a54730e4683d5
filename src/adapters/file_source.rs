use crate::domain::model::{Match, MatchId, MatchStatus, PoolId, Scope, Team, TeamId, TeamRef};
use crate::domain::ports::{MatchSource, TeamSource};
use crate::utils::error::{RankingError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Reads teams and matches from exported JSON or CSV files.
///
/// JSON files hold arrays in the backend's wire shape. CSV files use flat
/// snake_case headers:
///
/// - teams: `id,name,pool_id`
/// - matches: `id,team_a_id,team_a_name,team_b_id,team_b_name,status,score_a,score_b`
///
/// Score columns hold commas, so they must be quoted.
#[derive(Debug, Clone)]
pub struct FileSource {
    teams_path: PathBuf,
    matches_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct TeamCsvRow {
    id: TeamId,
    name: String,
    #[serde(default)]
    pool_id: Option<PoolId>,
}

#[derive(Debug, Deserialize)]
struct MatchCsvRow {
    id: MatchId,
    team_a_id: TeamId,
    #[serde(default)]
    team_a_name: String,
    team_b_id: TeamId,
    #[serde(default)]
    team_b_name: String,
    status: String,
    #[serde(default)]
    score_a: Option<String>,
    #[serde(default)]
    score_b: Option<String>,
}

impl From<TeamCsvRow> for Team {
    fn from(row: TeamCsvRow) -> Self {
        Team {
            id: row.id,
            name: row.name,
            pool_id: row.pool_id,
        }
    }
}

impl From<MatchCsvRow> for Match {
    fn from(row: MatchCsvRow) -> Self {
        Match {
            id: row.id,
            team_a: TeamRef {
                id: row.team_a_id,
                name: row.team_a_name,
            },
            team_b: TeamRef {
                id: row.team_b_id,
                name: row.team_b_name,
            },
            status: row.status.parse().unwrap_or(MatchStatus::Unknown),
            score_a: row.score_a,
            score_b: row.score_b,
        }
    }
}

enum DataFormat {
    Json,
    Csv,
}

impl FileSource {
    pub fn new(teams_path: impl Into<PathBuf>, matches_path: impl Into<PathBuf>) -> Self {
        Self {
            teams_path: teams_path.into(),
            matches_path: matches_path.into(),
        }
    }

    async fn load_teams(&self) -> Result<Vec<Team>> {
        match data_format(&self.teams_path)? {
            DataFormat::Json => read_json(&self.teams_path).await,
            DataFormat::Csv => Ok(read_csv::<TeamCsvRow>(&self.teams_path)
                .await?
                .into_iter()
                .map(Team::from)
                .collect()),
        }
    }

    async fn load_matches(&self) -> Result<Vec<Match>> {
        match data_format(&self.matches_path)? {
            DataFormat::Json => read_json(&self.matches_path).await,
            DataFormat::Csv => Ok(read_csv::<MatchCsvRow>(&self.matches_path)
                .await?
                .into_iter()
                .map(Match::from)
                .collect()),
        }
    }
}

#[async_trait]
impl TeamSource for FileSource {
    async fn teams(&self, scope: Scope) -> Result<Vec<Team>> {
        let teams: Vec<Team> = self
            .load_teams()
            .await?
            .into_iter()
            .filter(|team| scope.contains(team))
            .collect();
        tracing::debug!(
            "Loaded {} teams for {} from {}",
            teams.len(),
            scope,
            self.teams_path.display()
        );
        Ok(teams)
    }
}

#[async_trait]
impl MatchSource for FileSource {
    async fn finished_matches(&self, scope: Scope) -> Result<Vec<Match>> {
        let in_scope: HashSet<TeamId> = self.teams(scope).await?.iter().map(|t| t.id).collect();
        let all = self.load_matches().await?;
        let total = all.len();

        let matches: Vec<Match> = all
            .into_iter()
            .filter(|m| m.is_finished())
            .filter(|m| in_scope.contains(&m.team_a.id) && in_scope.contains(&m.team_b.id))
            .collect();
        tracing::debug!(
            "Kept {} of {} matches from {}",
            matches.len(),
            total,
            self.matches_path.display()
        );
        Ok(matches)
    }
}

fn data_format(path: &Path) -> Result<DataFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(DataFormat::Json),
        Some("csv") => Ok(DataFormat::Csv),
        _ => Err(RankingError::DataFileError {
            path: path.display().to_string(),
            reason: "expected a .json or .csv file".to_string(),
        }),
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|e| RankingError::DataFileError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

async fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = tokio::fs::read(path).await?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes.as_slice());

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

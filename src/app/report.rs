use crate::core::Standings;
use crate::domain::model::{OutputFormat, RankingPolicy, Scope, TeamId};
use crate::utils::error::{RankingError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// One rendered line of the table, position included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLine {
    pub position: usize,
    pub team_id: TeamId,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_for: u32,
    pub sets_against: u32,
    pub set_diff: i64,
    pub games_for: u32,
    pub games_against: u32,
    pub game_diff: i64,
    pub points: u32,
}

impl TableLine {
    pub const HEADERS: [&'static str; 13] = [
        "position",
        "team_id",
        "name",
        "played",
        "wins",
        "losses",
        "sets_for",
        "sets_against",
        "set_diff",
        "games_for",
        "games_against",
        "game_diff",
        "points",
    ];
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsTable {
    pub scope: Scope,
    pub policy: RankingPolicy,
    pub generated_at: DateTime<Utc>,
    pub lines: Vec<TableLine>,
}

impl StandingsTable {
    pub fn new(scope: Scope, standings: &Standings) -> Self {
        let lines = standings
            .positions()
            .map(|(position, row)| TableLine {
                position,
                team_id: row.team_id,
                name: row.name.clone(),
                played: row.played,
                wins: row.wins,
                losses: row.losses,
                sets_for: row.sets_for,
                sets_against: row.sets_against,
                set_diff: row.set_diff(),
                games_for: row.games_for,
                games_against: row.games_against,
                game_diff: row.game_diff(),
                points: row.points,
            })
            .collect();

        Self {
            scope,
            policy: standings.policy,
            generated_at: Utc::now(),
            lines,
        }
    }

    /// 檔名，例如 "standings-pool-3.csv"
    pub fn file_name(&self, format: OutputFormat) -> String {
        format!("standings-{}.{}", self.scope.file_stem(), format.extension())
    }

    pub fn render(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Csv => self.render_delimited(b','),
            OutputFormat::Tsv => self.render_delimited(b'\t'),
            OutputFormat::Json => Ok(serde_json::to_vec_pretty(self)?),
        }
    }

    fn render_delimited(&self, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(TableLine::HEADERS)?;
        for line in &self.lines {
            writer.serialize(line)?;
        }

        writer
            .into_inner()
            .map_err(|e| RankingError::IoError(e.into_error()))
    }

    /// Bundles the given formats into one ZIP archive.
    pub fn render_archive(&self, formats: &[OutputFormat]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for format in formats {
            let body = self.render(*format)?;
            zip.start_file(self.file_name(*format), SimpleFileOptions::default())?;
            zip.write_all(&body)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Fixed-width text for terminals.
    pub fn to_text(&self) -> String {
        let name_width = self
            .lines
            .iter()
            .map(|line| line.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        let mut out = format!(
            "{:>3}  {:<name_width$}  {:>2} {:>2} {:>2}  {:>7} {:>4}  {:>7} {:>4}  {:>3}\n",
            "#", "Team", "P", "W", "L", "Sets", "+/-", "Games", "+/-", "Pts",
        );
        for line in &self.lines {
            out.push_str(&format!(
                "{:>3}  {:<name_width$}  {:>2} {:>2} {:>2}  {:>7} {:>+4}  {:>7} {:>+4}  {:>3}\n",
                line.position,
                line.name,
                line.played,
                line.wins,
                line.losses,
                format!("{}-{}", line.sets_for, line.sets_against),
                line.set_diff,
                format!("{}-{}", line.games_for, line.games_against),
                line.game_diff,
                line.points,
            ));
        }
        out
    }
}

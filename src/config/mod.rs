pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_data_file, validate_positive_number, validate_required_field, validate_url,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use crate::domain::model::{OutputFormat, PoolId, RankingPolicy, Scope};
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SourceKind {
    #[default]
    File,
    Http,
}

/// Where teams and matches come from. Shared by the CLI flags and `[source]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub teams_file: Option<String>,
    pub matches_file: Option<String>,
}

impl SourceConfig {
    pub fn validate_source(&self) -> Result<()> {
        match self.kind {
            SourceKind::File => {
                let teams = validate_required_field("source.teams_file", &self.teams_file)?;
                validate_data_file("source.teams_file", teams)?;
                let matches = validate_required_field("source.matches_file", &self.matches_file)?;
                validate_data_file("source.matches_file", matches)?;
            }
            SourceKind::Http => {
                let base_url = validate_required_field("source.base_url", &self.base_url)?;
                validate_url("source.base_url", base_url)?;
                if let Some(timeout) = self.timeout_seconds {
                    validate_positive_number("source.timeout_seconds", timeout, 1)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "pool-standings")]
#[command(about = "Compute ranked standings for a tournament pool")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of the flags below
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "file")]
    pub source: SourceKind,

    #[arg(long, help = "Teams file (.json or .csv)")]
    pub teams: Option<String>,

    #[arg(long, help = "Matches file (.json or .csv)")]
    pub matches: Option<String>,

    #[arg(long, help = "Tournament backend base URL")]
    pub api_base_url: Option<String>,

    /// Bearer token; falls back to STANDINGS_API_TOKEN
    #[arg(long)]
    pub api_token: Option<String>,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Pool to rank; omit to rank every team")]
    pub pool: Option<PoolId>,

    #[arg(long, default_value = "pool", help = "Ranking policy: pool | company")]
    pub policy: RankingPolicy,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<OutputFormat>,

    #[arg(long, help = "Bundle all outputs into this ZIP file name")]
    pub archive: Option<String>,

    #[arg(long, help = "Print the table to stdout")]
    pub print: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log per-phase timing and memory")]
    pub monitor: bool,

    #[arg(long, help = "Validate and show the plan without fetching anything")]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            kind: self.source,
            base_url: self.api_base_url.clone(),
            token: self
                .api_token
                .clone()
                .or_else(|| std::env::var("STANDINGS_API_TOKEN").ok()),
            timeout_seconds: Some(self.timeout_seconds),
            teams_file: self.teams.clone(),
            matches_file: self.matches.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn scope(&self) -> Scope {
        Scope::from_pool(self.pool)
    }

    fn policy(&self) -> RankingPolicy {
        self.policy
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats.clone()
    }

    fn archive_name(&self) -> Option<String> {
        self.archive.clone()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.source_config().validate_source()?;
        validate_path("output_path", &self.output_path)?;
        if self.formats.is_empty() {
            return Err(crate::utils::error::RankingError::InvalidConfigValueError {
                field: "formats".to_string(),
                value: String::new(),
                reason: "At least one output format is required".to_string(),
            });
        }
        if let Some(archive) = &self.archive {
            crate::utils::validation::validate_file_extensions("archive", &[archive.clone()], &["zip"])?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_and_parsing() {
        let config = CliConfig::try_parse_from([
            "pool-standings",
            "--teams",
            "teams.csv",
            "--matches",
            "matches.csv",
            "--pool",
            "4",
            "--policy",
            "company",
            "--formats",
            "csv,json",
        ])
        .unwrap();

        assert_eq!(config.scope(), Scope::Pool(4));
        assert_eq!(config.policy(), RankingPolicy::CompanyPoints);
        assert_eq!(config.output_formats(), vec![OutputFormat::Csv, OutputFormat::Json]);
        assert_eq!(config.source, SourceKind::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_source_requires_base_url() {
        let config =
            CliConfig::try_parse_from(["pool-standings", "--source", "http", "--pool", "1"]).unwrap();
        assert!(config.validate().is_err());

        let config = CliConfig::try_parse_from([
            "pool-standings",
            "--source",
            "http",
            "--api-base-url",
            "https://tournament.example.com/api",
        ])
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.scope(), Scope::All);
    }

    #[test]
    fn test_bad_format_and_archive_rejected() {
        assert!(CliConfig::try_parse_from(["pool-standings", "--formats", "xml"]).is_err());

        let config = CliConfig::try_parse_from([
            "pool-standings",
            "--teams",
            "t.json",
            "--matches",
            "m.json",
            "--archive",
            "standings.tar",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}

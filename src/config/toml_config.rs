use crate::config::SourceConfig;
use crate::domain::model::{OutputFormat, PoolId, RankingPolicy, Scope};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RankingError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

static ENV_VAR: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingConfig {
    /// 省略時排名所有隊伍
    pub pool_id: Option<PoolId>,
    #[serde(default)]
    pub policy: RankingPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RankingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RankingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        self.source.validate_source()?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validation::validate_non_empty_string("load.compression.filename", &compression.filename)?;
            validation::validate_file_extensions(
                "load.compression.filename",
                &[compression.filename.clone()],
                &["zip"],
            )?;
        }

        if let Some(token) = &self.source.token {
            if token.contains("${") {
                return Err(RankingError::ConfigValidationError {
                    field: "source.token".to_string(),
                    message: format!("environment variable in '{}' is not set", token),
                });
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn scope(&self) -> Scope {
        Scope::from_pool(self.ranking.pool_id)
    }

    fn policy(&self) -> RankingPolicy {
        self.ranking.policy
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        // 驗證過的設定不會有無效格式
        self.load
            .output_formats
            .iter()
            .filter_map(|f| f.parse().ok())
            .collect()
    }

    fn archive_name(&self) -> Option<String> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.clone())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

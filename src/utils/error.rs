use crate::core::standings::StandingsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    ApiStatusError { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data file error in {path}: {reason}")]
    DataFileError { path: String, reason: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Standings computation rejected its input: {0}")]
    StandingsError(#[from] StandingsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Data,
    Engine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 程式結束碼，一律非零
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl RankingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RankingError::ApiError(_) | RankingError::ApiStatusError { .. } => {
                ErrorCategory::Network
            }
            RankingError::IoError(_) | RankingError::ZipError(_) => ErrorCategory::Storage,
            RankingError::ConfigValidationError { .. }
            | RankingError::InvalidConfigValueError { .. }
            | RankingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RankingError::CsvError(_)
            | RankingError::SerializationError(_)
            | RankingError::DataFileError { .. } => ErrorCategory::Data,
            RankingError::StandingsError(_) => ErrorCategory::Engine,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Engine => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            RankingError::ApiError(e) => e.is_timeout() || e.is_connect(),
            RankingError::ApiStatusError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RankingError::ApiError(_) => {
                "Check that the tournament backend is reachable and retry".to_string()
            }
            RankingError::ApiStatusError { status: 401 | 403, .. } => {
                "Check the API token (--api-token or source.token)".to_string()
            }
            RankingError::ApiStatusError { status: 404, .. } => {
                "Check the pool id and the API base URL".to_string()
            }
            RankingError::ApiStatusError { .. } => {
                "The backend rejected the request; retry later".to_string()
            }
            RankingError::IoError(_) | RankingError::ZipError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            RankingError::CsvError(_)
            | RankingError::SerializationError(_)
            | RankingError::DataFileError { .. } => {
                "Check the teams/matches files: JSON arrays or CSV with a header row".to_string()
            }
            RankingError::ConfigValidationError { .. }
            | RankingError::InvalidConfigValueError { .. }
            | RankingError::MissingConfigError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            RankingError::StandingsError(_) => {
                "Each team may appear only once in the scope; fix the team list".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch tournament data: {}", self),
            ErrorCategory::Storage => format!("Could not write standings: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not read tournament data: {}", self),
            ErrorCategory::Engine => format!("Could not compute standings: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankingError>;

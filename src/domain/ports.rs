use crate::domain::model::{Match, OutputFormat, RankingPolicy, Scope, Team};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Team lookup collaborator: every team belonging to a scope.
#[async_trait]
pub trait TeamSource: Send + Sync {
    async fn teams(&self, scope: Scope) -> Result<Vec<Team>>;
}

/// Match lookup collaborator: finished matches whose teams lie in the scope.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn finished_matches(&self, scope: Scope) -> Result<Vec<Match>>;
}

/// Report sink; the engine only ever writes.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn scope(&self) -> Scope;
    fn policy(&self) -> RankingPolicy;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    /// 若設定則把所有輸出打包成單一 ZIP
    fn archive_name(&self) -> Option<String>;
}

use crate::app::report::StandingsTable;
use crate::core::{Anomaly, ConfigProvider, MatchSource, StandingsEngine, Storage, TeamSource};
use crate::domain::model::{RankingPolicy, Scope};
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;

/// Result of a full fetch → compute → write run.
#[derive(Debug, Clone)]
pub struct RankingRun {
    pub table: StandingsTable,
    pub anomalies: Vec<Anomaly>,
    pub written: Vec<String>,
}

/// Wires the lookup collaborators, the engine and report storage together.
pub struct RankingService<Src, S>
where
    Src: TeamSource + MatchSource,
    S: Storage,
{
    source: Src,
    storage: S,
    monitor: PhaseMonitor,
}

impl<Src, S> RankingService<Src, S>
where
    Src: TeamSource + MatchSource,
    S: Storage,
{
    pub fn new(source: Src, storage: S) -> Self {
        Self::new_with_monitoring(source, storage, false)
    }

    pub fn new_with_monitoring(source: Src, storage: S, monitoring: bool) -> Self {
        Self {
            source,
            storage,
            monitor: PhaseMonitor::new(monitoring),
        }
    }

    pub fn monitor(&self) -> &PhaseMonitor {
        &self.monitor
    }

    /// 抓取資料並計算排名，不寫出任何檔案
    pub async fn compute(
        &self,
        scope: Scope,
        policy: RankingPolicy,
    ) -> Result<(StandingsTable, Vec<Anomaly>)> {
        tracing::info!("🚀 Computing {} standings for {}", policy, scope);

        let teams = self.source.teams(scope).await?;
        let matches = self.source.finished_matches(scope).await?;
        tracing::info!(
            "Fetched {} teams and {} finished matches",
            teams.len(),
            matches.len()
        );
        self.monitor.mark("fetch");

        let standings = StandingsEngine::new(policy).compute(&teams, &matches)?;
        for anomaly in &standings.anomalies {
            tracing::warn!(match_id = anomaly.match_id(), "⚠️ {}", anomaly);
        }
        let excluded = standings
            .anomalies
            .iter()
            .filter(|a| a.excludes_match())
            .count();
        tracing::debug!(
            rows = standings.rows.len(),
            anomalies = standings.anomalies.len(),
            excluded,
            decided = standings.head_to_head.total(),
            "Standings computed"
        );
        self.monitor.mark("compute");

        let table = StandingsTable::new(scope, &standings);
        Ok((table, standings.anomalies))
    }

    pub async fn run<C: ConfigProvider>(&self, config: &C) -> Result<RankingRun> {
        let (table, anomalies) = self.compute(config.scope(), config.policy()).await?;

        let formats = config.output_formats();
        let mut written = Vec::new();

        match config.archive_name() {
            Some(archive) => {
                let bytes = table.render_archive(&formats)?;
                tracing::debug!("Writing archive {} ({} bytes)", archive, bytes.len());
                self.storage.write_file(&archive, &bytes).await?;
                written.push(format!("{}/{}", config.output_path(), archive));
            }
            None => {
                for format in &formats {
                    let name = table.file_name(*format);
                    let bytes = table.render(*format)?;
                    tracing::debug!("Writing {} ({} bytes)", name, bytes.len());
                    self.storage.write_file(&name, &bytes).await?;
                    written.push(format!("{}/{}", config.output_path(), name));
                }
            }
        }
        self.monitor.mark("load");
        self.monitor.log_final_stats();

        tracing::info!("✅ Standings written: {}", written.join(", "));
        Ok(RankingRun {
            table,
            anomalies,
            written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Match, OutputFormat, Team};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockSource {
        teams: Vec<Team>,
        matches: Vec<Match>,
    }

    #[async_trait]
    impl TeamSource for MockSource {
        async fn teams(&self, scope: Scope) -> Result<Vec<Team>> {
            Ok(self
                .teams
                .iter()
                .filter(|t| scope.contains(t))
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl MatchSource for MockSource {
        async fn finished_matches(&self, _scope: Scope) -> Result<Vec<Match>> {
            Ok(self.matches.clone())
        }
    }

    struct MockConfig {
        archive: Option<String>,
    }

    impl ConfigProvider for MockConfig {
        fn scope(&self) -> Scope {
            Scope::Pool(1)
        }

        fn policy(&self) -> RankingPolicy {
            RankingPolicy::PoolHeadToHead
        }

        fn output_path(&self) -> &str {
            "./out"
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            vec![OutputFormat::Csv, OutputFormat::Json]
        }

        fn archive_name(&self) -> Option<String> {
            self.archive.clone()
        }
    }

    fn source() -> MockSource {
        let acme = Team::new(1, "Acme").in_pool(1);
        let globex = Team::new(2, "Globex").in_pool(1);
        let outsider = Team::new(9, "Initech").in_pool(2);
        MockSource {
            matches: vec![
                Match::finished(1, &acme, &globex, Some("6-3,6-4"), Some("3-6,4-6")),
                Match::finished(2, &acme, &outsider, Some("0-6,0-6"), Some("6-0,6-0")),
            ],
            teams: vec![acme, globex, outsider],
        }
    }

    #[tokio::test]
    async fn test_compute_ranks_scope_and_reports_anomalies() {
        let service = RankingService::new(source(), MockStorage::new());

        let (table, anomalies) = service
            .compute(Scope::Pool(1), RankingPolicy::PoolHeadToHead)
            .await
            .unwrap();

        assert_eq!(table.lines.len(), 2);
        assert_eq!(table.lines[0].name, "Globex");
        assert_eq!(table.lines[1].played, 1);
        assert_eq!(anomalies, vec![Anomaly::OutOfScope { match_id: 2, team_id: 9 }]);
    }

    #[tokio::test]
    async fn test_run_writes_one_file_per_format() {
        let storage = MockStorage::new();
        let service = RankingService::new(source(), storage.clone());

        let run = service.run(&MockConfig { archive: None }).await.unwrap();

        assert_eq!(
            run.written,
            vec!["./out/standings-pool-1.csv", "./out/standings-pool-1.json"]
        );
        let csv_body = storage.get_file("standings-pool-1.csv").await.unwrap();
        assert!(String::from_utf8(csv_body).unwrap().contains("Globex"));
        assert!(storage.get_file("standings-pool-1.json").await.is_some());
    }

    #[tokio::test]
    async fn test_run_bundles_archive_when_requested() {
        let storage = MockStorage::new();
        let service = RankingService::new_with_monitoring(source(), storage.clone(), true);

        let run = service
            .run(&MockConfig {
                archive: Some("standings.zip".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(run.written, vec!["./out/standings.zip"]);
        assert!(storage.get_file("standings.zip").await.is_some());
        assert!(storage.get_file("standings-pool-1.csv").await.is_none());
        let phases: Vec<String> = service.monitor().phases().into_iter().map(|p| p.phase).collect();
        assert_eq!(phases, vec!["fetch", "compute", "load"]);
    }

    #[test]
    fn test_company_policy_awards_three_points() {
        let service = RankingService::new(source(), MockStorage::new());

        let (table, _) = tokio_test::block_on(service.compute(Scope::All, RankingPolicy::CompanyPoints))
            .unwrap();

        assert_eq!(table.policy, RankingPolicy::CompanyPoints);
        // both on 3 points, Globex ahead on set differential
        assert_eq!(table.lines[0].name, "Globex");
        assert_eq!(table.lines[1].name, "Acme");
        assert_eq!(table.lines[1].points, 3);
        assert_eq!(table.lines[2].name, "Initech");
        assert_eq!(table.lines[2].points, 0);
    }
}

use crate::domain::model::{Match, Scope, Team};
use crate::domain::ports::{MatchSource, TeamSource};
use crate::utils::error::{RankingError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Team and match lookups against the tournament backend's REST API.
///
/// - `GET {base}/pools/{id}/teams` or `GET {base}/teams`
/// - `GET {base}/matches?status=FINISHED[&poolId={id}]`
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(query);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Making API request to: {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(RankingError::ApiStatusError {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TeamSource for HttpSource {
    async fn teams(&self, scope: Scope) -> Result<Vec<Team>> {
        let path = match scope {
            Scope::Pool(pool_id) => format!("/pools/{}/teams", pool_id),
            Scope::All => "/teams".to_string(),
        };
        self.get_json(&path, &[]).await
    }
}

#[async_trait]
impl MatchSource for HttpSource {
    async fn finished_matches(&self, scope: Scope) -> Result<Vec<Match>> {
        let mut query = vec![("status", "FINISHED".to_string())];
        if let Scope::Pool(pool_id) = scope {
            query.push(("poolId", pool_id.to_string()));
        }

        let mut matches: Vec<Match> = self.get_json("/matches", &query).await?;
        let returned = matches.len();
        matches.retain(Match::is_finished);
        if matches.len() != returned {
            tracing::warn!(
                "Backend returned {} unfinished matches for a finished-only query; dropped",
                returned - matches.len()
            );
        }
        Ok(matches)
    }
}

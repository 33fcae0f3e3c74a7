// Judge API client
//
// Thin async client over the judge's HTTP surface. Every failure maps to
// `SessionError::NetworkFailure`; the session core treats those as
// recoverable and never retries - retry policy, if any ever exists,
// belongs here and not in the core.

pub mod models;

use crate::session::{ProblemId, Result, SessionError};
use models::{
    Card, ProblemDetail, ProblemSummary, RunRequest, RunResult, SubmitRequest, SubmitResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// How long a judge call may take before the client gives up. Submission
/// runs real code server-side, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct JudgeClient {
    http: reqwest::Client,
    base_url: String,
}

/// One of the three search modes the judge exposes
#[derive(Debug, Clone)]
pub enum SearchQuery {
    Difficulty(String),
    Tag(String),
    Text(String),
}

impl SearchQuery {
    fn as_param(&self) -> (&'static str, &str) {
        match self {
            SearchQuery::Difficulty(v) => ("difficulty", v),
            SearchQuery::Tag(v) => ("tag", v),
            SearchQuery::Text(v) => ("q", v),
        }
    }

    /// Human-readable list title, mirroring the legacy client's headers
    pub fn title(&self) -> String {
        match self {
            SearchQuery::Difficulty(v) => format!("Difficulty: {v}"),
            SearchQuery::Tag(v) => format!("Topic: {v}"),
            SearchQuery::Text(v) => format!("Search: \"{v}\""),
        }
    }
}

impl JudgeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn cards(&self) -> Result<Vec<Card>> {
        self.get_json("/questions/cards", &[]).await
    }

    pub async fn card_questions(&self, card_id: u32) -> Result<Vec<ProblemSummary>> {
        self.get_json(&format!("/questions/cards/{card_id}/questions"), &[])
            .await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ProblemSummary>> {
        self.get_json("/questions/search", &[query.as_param()]).await
    }

    pub async fn question(&self, id: ProblemId) -> Result<ProblemDetail> {
        self.get_json(&format!("/questions/{id}"), &[]).await
    }

    pub async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResult> {
        self.post_json("/submit", request).await
    }

    pub async fn run(&self, request: &RunRequest) -> Result<RunResult> {
        self.post_json("/submit/run", request).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(network_failure)?
            .error_for_status()
            .map_err(network_failure)?;

        response.json().await.map_err(network_failure)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(network_failure)?
            .error_for_status()
            .map_err(network_failure)?;

        response.json().await.map_err(network_failure)
    }
}

fn network_failure(e: reqwest::Error) -> SessionError {
    SessionError::NetworkFailure(e.to_string())
}

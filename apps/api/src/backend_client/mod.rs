/// Backend Client — fetches vector-search match responses from the parsing backend.
///
/// The backend owns resume parsing and semantic search; this service only
/// asks it for the chunks relevant to a resume and reconciles them locally.
/// One attempt per call: the caller decides whether to retry.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::matching::MatchResponse;
use crate::models::resume::ResumeData;

/// Path of the backend's resume-to-jobs search endpoint.
pub const RESUME_MATCH_PATH: &str = "/api/jobrole/resume-match-jobs/";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend rejected credentials")]
    Unauthorized,

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ResumeMatchRequest<'a> {
    resume_data: &'a ResumeData,
}

/// Error envelope the backend uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
}

/// Source of match responses. Carried in `AppState` as `Arc<dyn MatchBackend>`
/// so handlers can run against a stub in tests.
#[async_trait]
pub trait MatchBackend: Send + Sync {
    /// Runs the backend's semantic search for `resume`. `bearer_token` is
    /// forwarded as-is when the caller supplied one.
    async fn fetch_matches(
        &self,
        resume: &ResumeData,
        bearer_token: Option<&str>,
    ) -> Result<MatchResponse, BackendError>;
}

/// HTTP implementation talking to the real backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn match_url(&self) -> String {
        format!("{}{}", self.base_url, RESUME_MATCH_PATH)
    }
}

#[async_trait]
impl MatchBackend for BackendClient {
    async fn fetch_matches(
        &self,
        resume: &ResumeData,
        bearer_token: Option<&str>,
    ) -> Result<MatchResponse, BackendError> {
        let mut request = self
            .client
            .post(self.match_url())
            .header("content-type", "application/json")
            .json(&ResumeMatchRequest {
                resume_data: resume,
            });
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend returned 401 for resume match");
            return Err(BackendError::Unauthorized);
        }

        let body = response.text().await?;

        if !status.is_success() {
            warn!("Backend returned {}: {}", status, body);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: MatchResponse = serde_json::from_str(&body)?;
        debug!(
            "Backend match response: status={}, message={:?}",
            parsed.status, parsed.message
        );
        Ok(parsed)
    }
}

/// Pulls `message` out of a backend error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<BackendErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}

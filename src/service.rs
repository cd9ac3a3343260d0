//! Fetch layer used by the card front end.
//!
//! Either asks a running proxy for `/info`, talks to GitHub directly, or hands
//! back the fixed mock record when external calls are disabled.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Result, SnapRepoError, MSG_FETCH_FAILED};
use crate::github::GitHubClient;
use crate::models::{ApiResponse, RepoRef, Repository};
use crate::repo_url::parse_github_url;

/// Simulated latency of the mock backend.
pub const MOCK_DELAY: Duration = Duration::from_millis(500);

const MSG_NO_DATA: &str = "No repository data returned";

#[derive(Debug, Clone)]
pub enum Backend {
    /// Call a proxy exposing `GET {api_url}/info`.
    Proxy { client: Client, api_url: String },
    /// Call the GitHub API from this process.
    Direct(GitHubClient),
    /// Serve [`Repository::mock`] after `delay`.
    Mock { delay: Duration },
}

#[derive(Debug, Clone)]
pub struct RepositoryService {
    backend: Backend,
}

impl RepositoryService {
    pub fn proxy(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("SnapRepo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(RepositoryService {
            backend: Backend::Proxy {
                client,
                api_url: api_url.into().trim_end_matches('/').to_string(),
            },
        })
    }

    pub fn direct(client: GitHubClient) -> Self {
        RepositoryService {
            backend: Backend::Direct(client),
        }
    }

    pub fn mock(delay: Duration) -> Self {
        RepositoryService {
            backend: Backend::Mock { delay },
        }
    }

    /// Owner and repository name from a pasted link.
    pub fn extract_details(link: &str) -> Result<RepoRef> {
        parse_github_url(link)
    }

    pub async fn fetch_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        match &self.backend {
            Backend::Mock { delay } => {
                debug!(owner, repo, "external calls disabled, serving mock repository");
                tokio::time::sleep(*delay).await;
                Ok(Repository::mock())
            }
            Backend::Direct(github) => github.fetch_repository(owner, repo).await,
            Backend::Proxy { client, api_url } => {
                fetch_from_proxy(client, api_url, owner, repo).await
            }
        }
    }
}

async fn fetch_from_proxy(client: &Client, api_url: &str, owner: &str, repo: &str) -> Result<Repository> {
    let url = format!("{}/info", api_url);
    info!(url = %url, owner, repo, "requesting repository from proxy");

    let response = client
        .get(&url)
        .query(&[("owner", owner), ("repo", repo)])
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;

    // Error envelopes come back with non-2xx statuses; read them all the same
    let envelope: ApiResponse<Repository> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(SnapRepoError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }
        Err(e) => return Err(e.into()),
    };

    if !envelope.success || envelope.error.is_some() {
        let message = envelope
            .error
            .unwrap_or_else(|| MSG_FETCH_FAILED.to_string());
        return Err(match status.as_u16() {
            404 => SnapRepoError::NotFound(message),
            403 => SnapRepoError::RateLimitExceeded(message),
            _ => SnapRepoError::ApiError(message),
        });
    }

    envelope
        .data
        .ok_or_else(|| SnapRepoError::ApiError(MSG_NO_DATA.to_string()))
}

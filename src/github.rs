use crate::error::{Result, SnapRepoError};
use crate::models::{Repository, MAX_TOP_LANGUAGES};
use crate::types::GitHubRepo;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Thin client for the two GitHub endpoints the proxy needs.
///
/// The bearer token is looked up in the process environment on every request,
/// so rotating it does not require a restart. A missing or empty token means
/// unauthenticated requests with GitHub's lower rate limit.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token_env: String,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("SnapRepo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
        })
    }

    /// Read the token from a different environment variable.
    pub fn with_token_env(mut self, name: impl Into<String>) -> Self {
        self.token_env = name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a token is present in the environment right now.
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");

        let response = self.authorize(request).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::NOT_FOUND => {
                Err(SnapRepoError::NotFound(format!("Resource not found: {}", url)))
            }
            reqwest::StatusCode::FORBIDDEN => {
                let remaining = response
                    .headers()
                    .get("X-RateLimit-Remaining")
                    .and_then(|h| h.to_str().ok())
                    .map(str::to_string)
                    .unwrap_or_else(|| "unknown".to_string());
                Err(SnapRepoError::RateLimitExceeded(format!(
                    "GitHub refused {} (remaining quota: {})",
                    url, remaining
                )))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(SnapRepoError::Upstream {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }

    pub async fn get_repository_info(&self, owner: &str, repo: &str) -> Result<GitHubRepo> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);
        let response = self.make_request(&url).await?;
        let repo_data: GitHubRepo = response.json().await?;
        Ok(repo_data)
    }

    /// Language names in the order GitHub lists them, truncated to the top five.
    pub async fn get_languages(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);
        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let languages: Map<String, Value> = serde_json::from_str(&body)?;

        Ok(languages.keys().take(MAX_TOP_LANGUAGES).cloned().collect())
    }

    /// Fetch repository metadata and its languages, reshaped for the card.
    ///
    /// Failure of the languages call is swallowed: the primary `language`
    /// field stands in when present, otherwise the list is empty.
    pub async fn fetch_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        let repo_data = self.get_repository_info(owner, repo).await?;

        let top_languages = match self.get_languages(owner, repo).await {
            Ok(languages) => languages,
            Err(e) => {
                warn!(owner, repo, error = %e, "languages lookup failed, using primary language");
                repo_data.language.clone().into_iter().collect()
            }
        };

        debug!(owner, repo, languages = ?top_languages, "fetched repository");
        Ok(Repository::from_github(repo_data, top_languages))
    }
}

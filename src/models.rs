use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::GitHubRepo;

/// Placeholder used when a repository has no description upstream.
pub const NO_DESCRIPTION: &str = "No description";

/// Number of languages kept from the GitHub languages breakdown.
pub const MAX_TOP_LANGUAGES: usize = 5;

/// Repository summary returned by the proxy and painted onto a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub link: String,
    pub owner: String,
    #[serde(alias = "repo")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub watchers: u64,
    #[serde(default)]
    pub issues: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_languages: Option<Vec<String>>,
    #[serde(alias = "avatar")]
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Reshape a raw GitHub payload, applying the documented field defaults.
    pub fn from_github(repo: GitHubRepo, top_languages: Vec<String>) -> Self {
        let description = repo
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Repository {
            link: repo.html_url,
            owner: repo.owner.login,
            name: repo.name,
            description: Some(description),
            stars: repo.stargazers_count.unwrap_or(0),
            forks: repo.forks_count.unwrap_or(0),
            watchers: repo.watchers_count.unwrap_or(0),
            issues: repo.open_issues_count.unwrap_or(0),
            top_languages: Some(top_languages),
            avatar_url: repo.owner.avatar_url,
            updated_at: repo.updated_at,
        }
    }

    /// Fixed record served when external calls are disabled.
    pub fn mock() -> Self {
        Repository {
            link: "https://github.com/torvalds/linux".to_string(),
            owner: "torvalds".to_string(),
            name: "linux".to_string(),
            description: Some("Linux kernel source tree".to_string()),
            stars: 212_000,
            forks: 59_600,
            watchers: 0,
            issues: 5_000,
            top_languages: None,
            avatar_url: "https://avatars.githubusercontent.com/u/1024025?v=4".to_string(),
            updated_at: None,
        }
    }
}

/// Envelope wrapping every proxy response.
///
/// Exactly one of `data` (on success) or `error` (on failure) is set; the
/// constructors are the only way this crate builds one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            error: Some(message.into()),
            data: None,
        }
    }
}

/// Owner and repository name pulled out of a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoRef {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

use chrono::{DateTime, Utc};
use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub watchers_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub language: Option<String>,
    pub owner: GitHubOwner,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    pub avatar_url: String,
}
